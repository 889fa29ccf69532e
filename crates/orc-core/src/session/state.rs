use super::model::{OutputLabel, SessionSnapshot};
use crate::storage::{CODE_KEY, KeyValueStore, TASK_ID_KEY};
use crate::viz;
use chrono::{DateTime, Local};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};

/// Session state shared between the orchestrator and the front-end.
///
/// The lock is only held for the duration of a single update, never across a
/// remote call.
pub type SharedSession = Arc<Mutex<SessionState>>;

/// Generation number handed out when a composite action starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ActionTicket(u64);

impl ActionTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// The client-side session: source buffer, task identifier, last output and
/// visualization.
///
/// Every setter is one atomic update followed by exactly one snapshot
/// published to subscribers. `source_text` and `task_id` are written through
/// to the key-value store.
pub struct SessionState {
    current: SessionSnapshot,
    store: Arc<dyn KeyValueStore>,
    generation: u64,
    notifier: watch::Sender<SessionSnapshot>,
}

impl SessionState {
    /// Creates the session, restoring the persisted source and task identifier.
    ///
    /// Unreadable entries fall back to the defaults.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mut current = SessionSnapshot::default();

        match store.get(CODE_KEY) {
            Ok(Some(code)) if !code.is_empty() => current.source_text = code,
            Ok(_) => {}
            Err(e) => tracing::warn!("Failed to restore source text: {}", e),
        }
        match store.get(TASK_ID_KEY) {
            Ok(Some(task_id)) => current.task_id = task_id,
            Ok(None) => {}
            Err(e) => tracing::warn!("Failed to restore task id: {}", e),
        }

        tracing::debug!(task_id = %current.task_id, "Session loaded");

        let (notifier, _) = watch::channel(current.clone());
        Self {
            current,
            store,
            generation: 0,
            notifier,
        }
    }

    /// Wraps the session for sharing with the orchestrator.
    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    /// Subscribes to snapshots published after every update.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.notifier.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.current.clone()
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn source_text(&self) -> &str {
        &self.current.source_text
    }

    /// The current task identifier, or `None` before the first compile.
    pub fn task_id(&self) -> Option<&str> {
        Some(self.current.task_id.as_str()).filter(|id| !id.is_empty())
    }

    pub fn simulation_input(&self) -> &str {
        &self.current.simulation_input
    }

    pub fn last_output(&self) -> &str {
        &self.current.last_output
    }

    pub fn output_label(&self) -> OutputLabel {
        self.current.output_label
    }

    pub fn visualization(&self) -> &str {
        &self.current.visualization
    }

    // ============================================================================
    // Updates
    // ============================================================================

    /// Replaces the source buffer and persists it.
    pub fn set_source_text(&mut self, text: impl Into<String>) {
        self.current.source_text = text.into();
        self.persist(CODE_KEY, &self.current.source_text);
        self.publish();
    }

    /// Adopts a task identifier returned by the remote service and persists it.
    pub fn adopt_task_id(&mut self, task_id: impl Into<String>) {
        self.current.task_id = task_id.into();
        self.persist(TASK_ID_KEY, &self.current.task_id);
        self.publish();
    }

    pub fn set_simulation_input(&mut self, input: impl Into<String>) {
        self.current.simulation_input = input.into();
        self.publish();
    }

    /// Sets label and output together; the output is stamped with the
    /// completion time.
    pub fn set_output(&mut self, label: OutputLabel, text: &str) {
        self.set_output_at(label, text, Local::now());
    }

    /// Same as [`set_output`](Self::set_output) with an explicit timestamp.
    pub fn set_output_at(&mut self, label: OutputLabel, text: &str, at: DateTime<Local>) {
        self.current.output_label = label;
        self.current.last_output = stamp_output(text, at);
        self.publish();
    }

    pub fn clear_visualization(&mut self) {
        if self.current.visualization.is_empty() {
            return;
        }
        self.current.visualization.clear();
        self.publish();
    }

    pub fn set_visualization(&mut self, payload: impl Into<String>) {
        self.current.visualization = payload.into();
        self.publish();
    }

    /// Flips the visualization between top-to-bottom and left-to-right layout.
    ///
    /// Returns `false` when there is no visualization.
    pub fn rotate_visualization(&mut self) -> bool {
        match viz::rotate(&self.current.visualization) {
            Some(rotated) => {
                self.current.visualization = rotated;
                self.publish();
                true
            }
            None => false,
        }
    }

    /// Restores the default source text, clears every derived field and
    /// removes the persisted entries.
    pub fn reset(&mut self) {
        self.current = SessionSnapshot::default();
        for key in [CODE_KEY, TASK_ID_KEY] {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!("Failed to remove '{}' from storage: {}", key, e);
            }
        }
        // In-flight actions must not write into the fresh session.
        self.generation += 1;
        self.publish();
    }

    // ============================================================================
    // Action generations
    // ============================================================================

    /// Starts a composite action. Any ticket handed out earlier becomes stale.
    pub fn begin_action(&mut self) -> ActionTicket {
        self.generation += 1;
        ActionTicket(self.generation)
    }

    /// Whether results of the action holding `ticket` may still be applied.
    pub fn is_current(&self, ticket: ActionTicket) -> bool {
        ticket.0 == self.generation
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!("Failed to persist '{}': {}", key, e);
        }
    }

    fn publish(&self) {
        self.notifier.send_replace(self.current.clone());
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("current", &self.current)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

/// Appends the completion time to an output text.
pub fn stamp_output(text: &str, at: DateTime<Local>) -> String {
    format!("{}\nProduced at: {}", text, at.format("%-m/%-d/%Y, %-I:%M:%S %p"))
}
