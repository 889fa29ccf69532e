use super::dto::{CompileResponse, RunResponse, VizResponse};
use crate::error::Result;
use async_trait::async_trait;
use strum::{AsRefStr, Display};

/// The three operations exposed by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum RemoteOperation {
    Compile,
    Run,
    #[strum(serialize = "viz")]
    Visualize,
}

impl RemoteOperation {
    /// Path of the endpoint relative to the base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::Compile => "/ruby/compile",
            Self::Run => "/ruby/run",
            Self::Visualize => "/ruby/viz",
        }
    }
}

/// Request/response access to the remote compiler, runner and visualizer.
///
/// Every call is one round trip with no retry. Compile and run diagnostics are
/// part of the `Ok` payload; `Err` is reserved for transport failures.
#[async_trait]
pub trait RemoteCompiler: Send + Sync {
    /// Compiles `source`, recompiling into `task_id` when one is given.
    async fn compile(&self, source: &str, task_id: Option<&str>) -> Result<CompileResponse>;

    /// Runs a previously compiled task with the given simulation input.
    async fn run(&self, task_id: &str, input: &str) -> Result<RunResponse>;

    /// Renders the compiled task as a graph description.
    async fn visualize(&self, task_id: &str, input: &str) -> Result<VizResponse>;
}
