mod command;
mod helper;
mod render;
mod repl;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use orc_application::{SessionOrchestrator, SourceEditor};
use orc_core::highlight::Highlighter as SourceHighlighter;
use orc_core::session::SessionState;
use orc_infrastructure::{ConfigService, ExportWriter, OrcPaths, TomlKeyValueStore};
use orc_interaction::RubyApiClient;

use crate::command::Command;
use crate::helper::CliHelper;
use crate::repl::{Flow, Repl};

/// Logs go to a daily file so they never interleave with the prompt.
fn init_logging(logs_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(logs_dir)?;
    let appender = tracing_appender::rolling::daily(logs_dir, "orc.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,hyper=warn,h2=warn,reqwest=warn,rustls=warn,rustyline=warn")
    });
    let file_layer = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(file_layer.with_filter(filter))
        .init();

    Ok(guard)
}

/// Entry point of the ORC REPL.
///
/// Restores the persisted session, then reads commands until `:quit` or EOF.
/// Each action is awaited before the next line is read.
#[tokio::main]
async fn main() -> Result<()> {
    // ===== Backend Initialization =====
    let paths = OrcPaths::new(None);
    let _log_guard = init_logging(&paths.logs_dir()?)?;

    let config_service = ConfigService::new(paths);
    let config = config_service.get_config()?;
    let state_file = config_service.state_file(&config)?;
    tracing::info!(base_url = %config.base_url, state_file = ?state_file, "Starting ORC");

    let store = Arc::new(TomlKeyValueStore::new(state_file));
    let session = SessionState::load(store).into_shared();
    let client = Arc::new(RubyApiClient::from_config(&config));
    let orchestrator = SessionOrchestrator::new(client, session.clone());
    let editor = SourceEditor::open(session).await;
    let exports = ExportWriter::new(
        config
            .export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(".")),
    );

    tracing::info!(dir = ?exports.dir(), "Export directory");
    let exports_banner = format!("Exports go to {}", exports.dir().display());

    let mut repl = Repl::new(orchestrator, editor, exports, SourceHighlighter::new()?);

    // ===== REPL Setup =====
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new(SourceHighlighter::new()?)));

    println!("{}", "=== ORC REPL ===".bright_magenta().bold());
    println!("{}", config.base_url.bright_black());
    println!("{}", exports_banner.bright_black());
    println!(
        "{}",
        "Type ':help' for commands. Plain lines are appended to the source.".bright_black()
    );
    println!();

    // Show where the restored session left off.
    let (_, listing) = repl.execute(Command::Show).await?;
    println!("{}\n", listing);

    // ===== Main REPL Loop =====
    loop {
        match rl.readline("orc> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                let command = match Command::parse(line.trim_end()) {
                    Ok(command) => command,
                    Err(e) => {
                        eprintln!("{}", format!("{}", e).red());
                        continue;
                    }
                };

                match repl.execute(command).await {
                    Ok((flow, message)) => {
                        if !message.is_empty() {
                            println!("{}", message);
                        }
                        if flow == Flow::Quit {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Command failed: {:#}", e);
                        eprintln!("{}", format!("Error: {:#}", e).red());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type ':quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    tracing::info!("ORC REPL stopped");
    Ok(())
}
