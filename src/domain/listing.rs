//! Listing envelope shared by every resource: request descriptor, server
//! pagination metadata, response body and summary counts.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::filter::Filterable;

/// Reads an explicit `null` as the type's default, like a missing key.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Record returned by a list endpoint.
pub trait ListItem: Filterable {
    /// Stable backend identifier.
    fn id(&self) -> &str;
    fn is_active(&self) -> bool;
}

/// Server-authoritative pagination metadata.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

/// Body of `GET /{resource}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Total / active / inactive counts shown next to a list.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Default)]
pub struct Stats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
}

impl Stats {
    /// Counts a set of items partitioned by their active flag.
    pub fn from_items<T: ListItem>(items: &[T]) -> Self {
        let active = items.iter().filter(|item| item.is_active()).count() as u64;
        let total = items.len() as u64;
        Self {
            total,
            active,
            inactive: total - active,
        }
    }
}

/// Request descriptor of a paginated list call.
///
/// `page` and `limit` are always at least one; filter parameters keep their
/// insertion order and a repeated name replaces the earlier value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    page: u32,
    limit: u32,
    params: Vec<(&'static str, String)>,
}

impl ListQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            params: Vec::new(),
        }
    }

    /// Sets a filter parameter.
    pub fn param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name, value)),
        }
        self
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Value of a parameter, including `page` and `limit`.
    pub fn get(&self, name: &str) -> Option<String> {
        match name {
            "page" => Some(self.page.to_string()),
            "limit" => Some(self.limit.to_string()),
            _ => self
                .params
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| v.clone()),
        }
    }

    /// Ordered `(name, value)` pairs, `page` and `limit` first.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];
        pairs.extend(self.params.iter().cloned());
        pairs
    }
}
