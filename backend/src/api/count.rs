//! Query parameter handling for `GET /count`.
//!
//! Turns decoded query pairs into a constraint map, checks every key against
//! the dataset's columns and either counts or reports the unknown keys.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use super::types::{CountResponse, UnknownFieldsResponse};
use crate::dataset::{Constraints, Dataset};

/// Result of evaluating one count query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountOutcome {
    /// All keys were known columns
    Count(usize),
    /// Sorted lowercased keys that matched no column
    UnknownFields(Vec<String>),
}

/// Build a constraint map from query pairs in arrival order.
///
/// Keys are lowercased; values are left as given. When a key repeats
/// (ignoring case) the last value wins.
pub fn constraints_from_params<I, K, V>(params: I) -> Constraints
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut constraints = Constraints::new();
    for (key, value) in params {
        constraints.insert(key.as_ref().to_lowercase(), value.into());
    }
    constraints
}

/// Validate `params` against `dataset` and count the matching records.
pub fn evaluate<I, K, V>(params: I, dataset: &Dataset) -> CountOutcome
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let constraints = constraints_from_params(params);

    // BTreeMap keys are already sorted and unique.
    let unknown: Vec<String> = constraints
        .keys()
        .filter(|key| !dataset.has_column(key))
        .cloned()
        .collect();

    if !unknown.is_empty() {
        tracing::info!(fields = ?unknown, "rejected query with unknown fields");
        return CountOutcome::UnknownFields(unknown);
    }

    let count = dataset.occurrences(&constraints);
    tracing::debug!(constraints = ?constraints, count, "counted occurrences");

    CountOutcome::Count(count)
}

/// Validate, count and render the HTTP response.
pub fn handle<I, K, V>(params: I, dataset: &Dataset) -> Response
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    evaluate(params, dataset).into_response()
}

impl IntoResponse for CountOutcome {
    fn into_response(self) -> Response {
        // axum's Json sets `Content-Type: application/json` with no charset.
        match self {
            CountOutcome::Count(count) => {
                (StatusCode::OK, Json(CountResponse { count })).into_response()
            }
            CountOutcome::UnknownFields(unknown_fields) => (
                StatusCode::BAD_REQUEST,
                Json(UnknownFieldsResponse { unknown_fields }),
            )
                .into_response(),
        }
    }
}
