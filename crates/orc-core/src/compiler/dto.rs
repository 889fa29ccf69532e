use serde::{Deserialize, Serialize};

/// Body of `POST {base}/ruby/compile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileRequest {
    pub code: String,
    /// Existing task to recompile into. Omitted for a fresh session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

/// Response of `POST {base}/ruby/compile`.
///
/// An empty `compile_err` means the compilation succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileResponse {
    #[serde(default)]
    pub task_id: String,
    #[serde(default)]
    pub compile_err: String,
    /// Compiled artifact text.
    #[serde(default)]
    pub rbs: String,
}

impl CompileResponse {
    pub fn is_success(&self) -> bool {
        self.compile_err.is_empty()
    }
}

/// Body of `POST {base}/ruby/run`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    pub task_id: String,
    pub input: String,
}

/// Response of `POST {base}/ruby/run`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResponse {
    #[serde(default)]
    pub output: String,
    /// Non-fatal diagnostic. Older deployments name this field `error`.
    #[serde(default, alias = "error")]
    pub err: String,
    /// Refreshed task identifier, when the service rotates it per run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

impl RunResponse {
    /// Returns the refreshed task identifier if the service sent a non-empty one.
    pub fn refreshed_task_id(&self) -> Option<&str> {
        self.task_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Body of `POST {base}/ruby/viz`.
pub type VizRequest = RunRequest;

/// Response of `POST {base}/ruby/viz`: opaque graph-description text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VizResponse {
    #[serde(default)]
    pub output: String,
}
