//! Remote compiler port.
//!
//! - `dto`: request/response bodies of the `/ruby/*` HTTP contract
//! - `port`: the `RemoteCompiler` trait the orchestrator drives

mod dto;
mod port;

pub use dto::{
    CompileRequest, CompileResponse, RunRequest, RunResponse, VizRequest, VizResponse,
};
pub use port::{RemoteCompiler, RemoteOperation};
