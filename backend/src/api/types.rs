//! JSON bodies returned by the HTTP API.
//!
//! Field names are part of the wire contract; `unknown fields` really does
//! contain a space.

use serde::{Deserialize, Serialize};

/// Successful `/count` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: usize,
}

/// `/count` response when parameters name columns the dataset lacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownFieldsResponse {
    /// Lowercased, sorted, de-duplicated
    #[serde(rename = "unknown fields")]
    pub unknown_fields: Vec<String>,
}

/// `/health` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub records: usize,
    pub columns: Vec<String>,
}
