//! Application layer for ORC.
//!
//! Coordinates the domain session with the remote compiler port:
//! `SessionOrchestrator` runs the compile/run/visualize actions and
//! `SourceEditor` keeps the edited document and the session source in step.

pub mod orchestrator;
pub mod source_editor;

pub use orchestrator::{ActionOutcome, CompileMode, CompileReport, SessionOrchestrator};
pub use source_editor::SourceEditor;
