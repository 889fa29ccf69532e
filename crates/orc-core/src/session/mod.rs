//! Session domain module.
//!
//! - `model`: session snapshot, output labels, default source
//! - `state`: the mutable session with persistence and change notification

mod model;
mod state;

pub use model::{DEFAULT_SOURCE, OutputLabel, SessionSnapshot};
pub use state::{ActionTicket, SessionState, SharedSession, stamp_output};
