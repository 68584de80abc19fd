//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic 1-based pagination parameters (`?page=&page_size=`).
///
/// Values are clamped via `campus_core::pagination` before use.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Turn an optional query string into a filter value: empty and
/// whitespace-only inputs mean "no filter".
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
