//! glaze CLI: demo chat shell and headless replay for the chrome engine

use clap::{Parser, Subcommand};
use glaze_engine::{
    Chrome, ChromeConfig, Document, PageEvent, Script, ScriptAction, Selector, CONFIG_FILE,
};
use glaze_tui::HostPage;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Chat chrome engine with a demo TUI shell
#[derive(Parser)]
#[command(name = "glaze")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to glaze.json in the working directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the demo chat shell (default when no command specified)
    Tui,

    /// Run a scripted session headlessly and print a reconciliation trace
    Replay {
        /// Script file (JSON)
        script: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default glaze.json config
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    match cli.command {
        None | Some(Commands::Tui) => {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            if let Err(e) = rt.block_on(glaze_tui::run_tui(config)) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Replay { script, json }) => {
            cmd_replay(config, &script, json);
        }
        Some(Commands::Init { force }) => {
            cmd_init(force);
        }
    }
}

fn load_config(path: Option<&Path>) -> ChromeConfig {
    match path {
        Some(path) => match ChromeConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => {
            let default_path = Path::new(CONFIG_FILE);
            if default_path.exists() {
                match ChromeConfig::load(default_path) {
                    Ok(config) => config,
                    Err(e) => {
                        eprintln!("Error loading {CONFIG_FILE}: {e}");
                        std::process::exit(1);
                    }
                }
            } else {
                ChromeConfig::default()
            }
        }
    }
}

fn cmd_init(force: bool) {
    let path = Path::new(CONFIG_FILE);
    if path.exists() && !force {
        println!("Config already exists at {CONFIG_FILE} (use --force to overwrite)");
        return;
    }

    match ChromeConfig::default().save(path) {
        Ok(()) => println!("Created {CONFIG_FILE}"),
        Err(e) => {
            eprintln!("Failed to write config: {e}");
            std::process::exit(1);
        }
    }
}

/// One line of replay output.
#[derive(Serialize)]
struct TraceEntry {
    at_ms: u64,
    action: String,
    empty: bool,
    placement: String,
    passes: usize,
}

fn cmd_replay(config: ChromeConfig, script_path: &Path, json: bool) {
    let script = match Script::load(script_path) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("Error loading script {}: {e}", script_path.display());
            std::process::exit(1);
        }
    };

    let mut doc = Document::new();
    let page = HostPage::build(&mut doc);
    let mut chrome = Chrome::new(config);
    chrome.attach(&mut doc);

    let mut trace = Vec::new();
    for step in &script.steps {
        chrome.tick(&mut doc, Duration::from_millis(step.at_ms));
        apply_step(&mut doc, &page, &mut chrome, &step.action);
        let passes = chrome.pump(&mut doc);
        trace.push(TraceEntry {
            at_ms: step.at_ms,
            action: step.action.label().to_string(),
            empty: chrome.is_empty(&doc),
            placement: chrome.placement(&doc).to_string(),
            passes,
        });
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&trace).expect("failed to serialize")
        );
        return;
    }

    let name = script.name.as_deref().unwrap_or("session");
    println!("Replay: {name} ({} steps)\n", trace.len());
    for entry in &trace {
        println!(
            "t={:>6}ms  {:<18} empty={:<5} placement={:<8} passes={}",
            entry.at_ms, entry.action, entry.empty, entry.placement, entry.passes
        );
    }
    println!(
        "\nFinal: empty={}, placement={}",
        chrome.is_empty(&doc),
        chrome.placement(&doc)
    );
}

fn apply_step(doc: &mut Document, page: &HostPage, chrome: &mut Chrome, action: &ScriptAction) {
    match action {
        ScriptAction::UserMessage { text } => page.push_user_message(doc, text),
        ScriptAction::AssistantMessage { text } => page.push_assistant_message(doc, text),
        ScriptAction::ClearChat => page.clear_chat(doc),
        ScriptAction::HashChange => chrome.handle_event(doc, PageEvent::HashChange),
        ScriptAction::PopState => chrome.handle_event(doc, PageEvent::PopState),
        ScriptAction::Click { target } => match Selector::parse(target) {
            Ok(selector) => match doc.query(&selector) {
                Some(node) => chrome.click(doc, node),
                None => eprintln!("click target not found: {target}"),
            },
            Err(e) => eprintln!("bad click target {target}: {e}"),
        },
    }
}
