//! Builds list and count requests from the active predicates of a screen.

use serde::{Deserialize, Serialize};

use crate::domain::filter::{Field, PredicateSet};
use crate::domain::listing::ListQuery;

/// Where the predicates of a resource are evaluated.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FilterSupport {
    /// Sent as query parameters.
    #[default]
    Server,
    /// Evaluated over the fetched page; nothing is sent.
    Client,
}

/// List request for `page`, forced to page one when `reset_page` is set.
pub fn build_list_query(
    page: u32,
    limit: u32,
    predicates: &PredicateSet,
    reset_page: bool,
    support: FilterSupport,
) -> ListQuery {
    let page = if reset_page { 1 } else { page };
    let query = ListQuery::new(page, limit);
    match support {
        FilterSupport::Server => predicates
            .query_params()
            .fold(query, |query, (name, value)| query.param(name, value)),
        FilterSupport::Client => query,
    }
}

/// Count-only request: one row per page, the activity predicate replaced by
/// `active`.
pub fn build_stats_query(
    predicates: &PredicateSet,
    support: FilterSupport,
    active: Option<bool>,
) -> ListQuery {
    let query = build_list_query(1, 1, &predicates.without(Field::Active), true, support);
    match active {
        Some(flag) => query.param(Field::Active.param(), flag.to_string()),
        None => query,
    }
}
