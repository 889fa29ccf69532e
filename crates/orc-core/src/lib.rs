//! Domain layer of the ORC client.
//!
//! - `session`: client-side session state with persistence and change notification
//! - `compiler`: port and wire types of the remote compile/run/viz service
//! - `editor`: line document model and the comment-toggle command
//! - `storage`: key-value port backing the persisted session fields
//! - `highlight`, `viz`, `export`: front-end helpers

pub mod compiler;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod highlight;
pub mod session;
pub mod storage;
pub mod viz;

// Re-export common error type
pub use error::OrcError;
