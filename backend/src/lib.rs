//! # Tally - count matching rows of a CSV dataset over HTTP
//!
//! Tally loads a CSV file into memory once and answers
//! `GET /count?column=value&...` with the number of rows matching every
//! constraint, ignoring case.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│   Dataset   │◀────│  GET /count │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │ (immutable) │     │   (axum)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tally::{start_server, Dataset, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config: ServerConfig = /* from clap */;
//!     let dataset = Dataset::load(&config.dataset.data_path).unwrap();
//!     start_server(&config, dataset).await.unwrap();
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`parser`] - CSV decoding with auto-detection
//! - [`dataset`] - In-memory table and occurrence counting
//! - [`api`] - Query handling and HTTP server
//! - [`config`] - Startup settings

pub mod config;
pub mod error;

pub mod parser;

pub mod dataset;

pub mod api;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, CsvError, DatasetError, ServerError};

pub use parser::{decode_content, detect_delimiter, detect_encoding, parse_bytes, parse_str, Table};

pub use dataset::{Constraints, Dataset, Record};

pub use api::{
    constraints_from_params, evaluate, router, start_server, AppState, CountOutcome,
    CountResponse, HealthResponse, UnknownFieldsResponse,
};

pub use config::{DatasetConfig, ServerConfig};
