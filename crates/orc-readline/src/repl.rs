//! Command execution against the session.

use anyhow::{Context as _, Result, bail};
use colored::Colorize;
use orc_application::{ActionOutcome, CompileMode, SessionOrchestrator, SourceEditor};
use orc_core::export::ExportKind;
use orc_core::highlight::Highlighter as SourceHighlighter;
use orc_core::session::SessionSnapshot;
use orc_infrastructure::ExportWriter;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;

use crate::command::{Command, help_text};
use crate::render;

/// Whether the loop keeps reading lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Repl {
    orchestrator: SessionOrchestrator,
    editor: SourceEditor,
    exports: ExportWriter,
    highlighter: SourceHighlighter,
}

impl Repl {
    pub fn new(
        orchestrator: SessionOrchestrator,
        editor: SourceEditor,
        exports: ExportWriter,
        highlighter: SourceHighlighter,
    ) -> Self {
        Self {
            orchestrator,
            editor,
            exports,
            highlighter,
        }
    }

    async fn snapshot(&self) -> SessionSnapshot {
        self.orchestrator.session().lock().await.snapshot()
    }

    /// Executes one command and returns the text to print.
    pub async fn execute(&mut self, command: Command) -> Result<(Flow, String)> {
        let message = match command {
            Command::Quit => return Ok((Flow::Quit, "Goodbye!".bright_green().to_string())),
            Command::Help => help_text().to_string(),
            Command::Compile => {
                let report = self.orchestrator.compile(CompileMode::Display).await?;
                self.report(report.outcome).await
            }
            Command::Run => {
                let outcome = self.orchestrator.run().await?;
                self.report(outcome).await
            }
            Command::Visualize => {
                let outcome = self.orchestrator.visualize().await?;
                let snapshot = self.snapshot().await;
                match outcome {
                    ActionOutcome::Succeeded => snapshot.visualization,
                    _ => self.report(outcome).await,
                }
            }
            Command::Input(input) => {
                self.orchestrator
                    .session()
                    .lock()
                    .await
                    .set_simulation_input(input);
                "Simulation input set.".bright_black().to_string()
            }
            Command::Load(path) => {
                let text = tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("failed to read {}", path.display()))?;
                self.editor.replace(text).await;
                self.show()
            }
            Command::Append(line) => {
                let text = if self.editor.text().is_empty() {
                    line
                } else {
                    format!("{}\n{}", self.editor.text(), line)
                };
                self.editor.replace(text).await;
                String::new()
            }
            Command::Show => self.show(),
            Command::Comment { first, last } => {
                let line_count = self.editor.document().line_count();
                if first > line_count {
                    bail!("the source has only {} lines", line_count);
                }
                let outcome = self.editor.toggle_comment(first, last).await;
                tracing::info!(direction = ?outcome.direction, lines = outcome.lines, "Toggled comments");
                self.show()
            }
            Command::Undo => {
                if !self.editor.undo().await {
                    bail!("nothing to undo");
                }
                self.show()
            }
            Command::Redo => {
                if !self.editor.redo().await {
                    bail!("nothing to redo");
                }
                self.show()
            }
            Command::Rotate => {
                let rotated = self
                    .orchestrator
                    .session()
                    .lock()
                    .await
                    .rotate_visualization();
                if !rotated {
                    bail!("no visualization; run :viz first");
                }
                self.snapshot().await.visualization
            }
            Command::Export(kind) => {
                let content = self.export_content(kind).await?;
                let path = self.exports.write(kind, &content)?;
                format!("Wrote {}", path.display()).bright_black().to_string()
            }
            Command::Reset => {
                self.orchestrator.session().lock().await.reset();
                self.editor.reload().await;
                "Session reset.".bright_black().to_string()
            }
            Command::Status => render::render_status(&self.snapshot().await),
        };
        Ok((Flow::Continue, message))
    }

    fn show(&self) -> String {
        render::render_source(&self.highlighter, self.editor.text())
    }

    async fn report(&self, outcome: ActionOutcome) -> String {
        let snapshot = self.snapshot().await;
        match outcome {
            ActionOutcome::Superseded => "Result discarded: the session changed meanwhile."
                .yellow()
                .to_string(),
            _ => format!(
                "{}\n{}",
                render::render_task_id(&snapshot),
                render::render_output(&snapshot)
            ),
        }
    }

    async fn export_content(&self, kind: ExportKind) -> Result<String> {
        match kind {
            ExportKind::Source => Ok(self.editor.text().to_string()),
            ExportKind::VisualizationDot | ExportKind::VisualizationSvg => {
                let graph = self.snapshot().await.visualization;
                if graph.is_empty() {
                    bail!("no visualization; run :viz first");
                }
                if kind == ExportKind::VisualizationSvg {
                    render_svg(&graph).await
                } else {
                    Ok(graph)
                }
            }
        }
    }
}

/// Renders a graph description to SVG with the Graphviz `dot` executable.
async fn render_svg(graph: &str) -> Result<String> {
    let mut child = tokio::process::Command::new("dot")
        .arg("-Tsvg")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .context("failed to start Graphviz 'dot' (is it installed?)")?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(graph.as_bytes()).await?;
    }

    let output = child.wait_with_output().await?;
    if !output.status.success() {
        bail!(
            "Graphviz 'dot' failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
