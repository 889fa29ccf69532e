use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Source text a fresh session starts with.
pub const DEFAULT_SOURCE: &str =
    "INCLUDE \"prelude.rby\". \n\n# Your code here...\ncurrent = VAR x . x $rel (`add` <x,x>).";

/// How the current output should be framed for the user.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
pub enum OutputLabel {
    #[strum(serialize = "Compile Output")]
    CompileOutput,
    #[strum(serialize = "Compile Error")]
    CompileError,
    #[strum(serialize = "Run Output")]
    RunOutput,
    #[strum(serialize = "Run Error")]
    RunError,
    #[default]
    #[strum(serialize = "Output")]
    Output,
}

impl OutputLabel {
    pub fn is_error(self) -> bool {
        matches!(self, Self::CompileError | Self::RunError)
    }
}

/// Point-in-time copy of every session field.
///
/// Observers receive one of these after each atomic update, so a label is
/// always paired with the output it was written with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub source_text: String,
    /// Empty until the remote service has assigned a task.
    pub task_id: String,
    pub simulation_input: String,
    pub last_output: String,
    pub output_label: OutputLabel,
    /// Graph description from the last successful visualize; empty otherwise.
    pub visualization: String,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            source_text: DEFAULT_SOURCE.to_string(),
            task_id: String::new(),
            simulation_input: String::new(),
            last_output: String::new(),
            output_label: OutputLabel::default(),
            visualization: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_label_display() {
        assert_eq!(OutputLabel::CompileOutput.to_string(), "Compile Output");
        assert_eq!(OutputLabel::RunError.to_string(), "Run Error");
        assert_eq!(OutputLabel::default().to_string(), "Output");
    }

    #[test]
    fn test_label_from_str() {
        assert_eq!(
            OutputLabel::from_str("Compile Error").unwrap(),
            OutputLabel::CompileError
        );
        assert!(OutputLabel::from_str("Viz Output").is_err());
    }

    #[test]
    fn test_default_snapshot() {
        let snapshot = SessionSnapshot::default();
        assert_eq!(snapshot.source_text, DEFAULT_SOURCE);
        assert!(snapshot.task_id.is_empty());
        assert_eq!(snapshot.output_label, OutputLabel::Output);
        assert!(!snapshot.output_label.is_error());
    }
}
