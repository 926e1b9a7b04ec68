//! Read-only listings with client-side filters.

use serde::Serialize;

pub mod medias;
pub mod network_interfaces;
pub mod templates;
pub mod users;

/// Result of a data source read: a stable ID plus the matching records.
///
#[derive(Debug, Clone, Serialize)]
pub struct Listing<T> {
    pub id: String,
    pub items: Vec<T>,
}

impl<T> Listing<T> {
    pub fn new(id: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            id: id.into(),
            items,
        }
    }
}

/// Case-insensitive substring match. An unset or empty filter matches
/// everything.
///
pub(crate) fn contains_ignore_case(value: &str, filter: &Option<String>) -> bool {
    match filter.as_deref() {
        None | Some("") => true,
        Some(filter) => value.to_lowercase().contains(&filter.to_lowercase()),
    }
}

/// Case-sensitive substring match. An unset or empty filter matches
/// everything.
///
pub(crate) fn contains(value: &str, filter: &Option<String>) -> bool {
    match filter.as_deref() {
        None | Some("") => true,
        Some(filter) => value.contains(filter),
    }
}

/// Exact match against an optional remote value. An unset or empty filter
/// matches everything.
///
pub(crate) fn equals(value: Option<&str>, filter: &Option<String>) -> bool {
    match filter.as_deref() {
        None | Some("") => true,
        Some(filter) => value == Some(filter),
    }
}
