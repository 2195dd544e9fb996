//! HTTP API module.
//!
//! Query handling, response types and the axum server.

pub mod count;
pub mod server;
pub mod types;

pub use count::{constraints_from_params, evaluate, handle, CountOutcome};
pub use server::{router, start_server, AppState};
pub use types::*;
