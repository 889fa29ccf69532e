//! Session orchestrator.
//!
//! Implements the composite actions (compile, compile → run,
//! compile → visualize) on top of a [`RemoteCompiler`] and writes their
//! results into the shared session.

use orc_core::compiler::{CompileResponse, RemoteCompiler};
use orc_core::error::Result;
use orc_core::session::{ActionTicket, OutputLabel, SharedSession};
use std::sync::Arc;

/// Whether a successful compile writes its artifact to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileMode {
    /// Show the compiled artifact as `Compile Output`.
    Display,
    /// Leave the output untouched; used when compile is a prerequisite of
    /// run or visualize.
    Silent,
}

/// How a composite action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Succeeded,
    /// The compile step reported a diagnostic; dependent steps were skipped.
    Failed,
    /// A newer action (or a reset) started while this one was in flight; its
    /// results were discarded.
    Superseded,
}

/// Result of a compile action, with the raw response for callers that need
/// the task identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileReport {
    pub outcome: ActionOutcome,
    pub response: CompileResponse,
}

impl CompileReport {
    pub fn is_success(&self) -> bool {
        self.outcome == ActionOutcome::Succeeded
    }
}

/// Sequences remote calls and maps their results into the session.
///
/// Transport errors are returned unchanged and leave the session as it was at
/// the failing step. Only one remote call of an action is in flight at a time
/// and the session lock is never held across a call.
#[derive(Clone)]
pub struct SessionOrchestrator {
    compiler: Arc<dyn RemoteCompiler>,
    session: SharedSession,
}

impl SessionOrchestrator {
    pub fn new(compiler: Arc<dyn RemoteCompiler>, session: SharedSession) -> Self {
        Self { compiler, session }
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Compiles the current source.
    pub async fn compile(&self, mode: CompileMode) -> Result<CompileReport> {
        let ticket = self.session.lock().await.begin_action();
        self.compile_step(ticket, mode).await
    }

    /// Compiles silently, then runs the task with the simulation input.
    pub async fn run(&self) -> Result<ActionOutcome> {
        let ticket = self.session.lock().await.begin_action();

        let report = self.compile_step(ticket, CompileMode::Silent).await?;
        if !report.is_success() {
            return Ok(report.outcome);
        }

        let input = {
            let mut session = self.session.lock().await;
            if !session.is_current(ticket) {
                return Ok(ActionOutcome::Superseded);
            }
            session.clear_visualization();
            session.simulation_input().to_string()
        };

        let task_id = report.response.task_id;
        tracing::debug!(%task_id, "Running task");
        let response = self.compiler.run(&task_id, &input).await?;

        let mut session = self.session.lock().await;
        if !session.is_current(ticket) {
            tracing::debug!(generation = ticket.generation(), "Discarding stale run result");
            return Ok(ActionOutcome::Superseded);
        }

        if let Some(refreshed) = response.refreshed_task_id() {
            session.adopt_task_id(refreshed);
        }
        if !response.err.is_empty() {
            session.set_output(OutputLabel::RunError, &response.err);
        }
        session.set_output(OutputLabel::RunOutput, &response.output);

        Ok(ActionOutcome::Succeeded)
    }

    /// Compiles silently, then fetches the graph description of the task.
    pub async fn visualize(&self) -> Result<ActionOutcome> {
        let ticket = self.session.lock().await.begin_action();

        let report = self.compile_step(ticket, CompileMode::Silent).await?;
        if !report.is_success() {
            return Ok(report.outcome);
        }

        let input = self.session.lock().await.simulation_input().to_string();
        let task_id = report.response.task_id;
        tracing::debug!(%task_id, "Requesting visualization");
        let response = self.compiler.visualize(&task_id, &input).await?;

        let mut session = self.session.lock().await;
        if !session.is_current(ticket) {
            tracing::debug!(
                generation = ticket.generation(),
                "Discarding stale visualization"
            );
            return Ok(ActionOutcome::Superseded);
        }
        session.set_visualization(response.output);

        Ok(ActionOutcome::Succeeded)
    }

    async fn compile_step(&self, ticket: ActionTicket, mode: CompileMode) -> Result<CompileReport> {
        let (source, task_id) = {
            let mut session = self.session.lock().await;
            session.clear_visualization();
            (
                session.source_text().to_string(),
                session.task_id().map(str::to_string),
            )
        };

        tracing::debug!(?mode, task_id = ?task_id, "Compiling");
        let response = self.compiler.compile(&source, task_id.as_deref()).await?;

        let mut session = self.session.lock().await;
        if !session.is_current(ticket) {
            tracing::debug!(
                generation = ticket.generation(),
                "Discarding stale compile result"
            );
            return Ok(CompileReport {
                outcome: ActionOutcome::Superseded,
                response,
            });
        }

        // The service may allocate a task before reporting a diagnostic.
        session.adopt_task_id(response.task_id.clone());

        if !response.is_success() {
            session.set_output(OutputLabel::CompileError, &response.compile_err);
            return Ok(CompileReport {
                outcome: ActionOutcome::Failed,
                response,
            });
        }

        if mode == CompileMode::Display {
            session.set_output(OutputLabel::CompileOutput, &response.rbs);
        }

        Ok(CompileReport {
            outcome: ActionOutcome::Succeeded,
            response,
        })
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod orchestrator_test;
