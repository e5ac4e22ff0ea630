//! Total / active / inactive counts of a listing.

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::domain::listing::{ListQuery, Stats};
use crate::repository::ResourceReader;
use crate::resource::ResourceKind;
use crate::session::BearerToken;

/// How stats are derived for a resource.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatsStrategy {
    /// Counted over the displayed page.
    #[default]
    Client,
    /// Three count-only requests with the activity flag unset, `true` and
    /// `false`.
    Backend,
}

/// Count requests of the backend strategy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsQueries {
    pub total: ListQuery,
    pub active: ListQuery,
    pub inactive: ListQuery,
}

async fn count<G>(gateway: &G, kind: ResourceKind, token: &BearerToken, query: &ListQuery) -> u64
where
    G: ResourceReader,
{
    match gateway.fetch_page::<IgnoredAny>(kind, token, query).await {
        Ok(response) => response.pagination.map_or(0, |p| p.total_items),
        Err(err) => {
            log::warn!("Count request for {} failed: {err}", kind.label());
            0
        }
    }
}

/// Runs the three count requests concurrently. A failed branch counts as 0.
pub async fn backend_stats<G>(
    gateway: &G,
    kind: ResourceKind,
    token: &BearerToken,
    queries: &StatsQueries,
) -> Stats
where
    G: ResourceReader,
{
    let (total, active, inactive) = tokio::join!(
        count(gateway, kind, token, &queries.total),
        count(gateway, kind, token, &queries.active),
        count(gateway, kind, token, &queries.inactive),
    );

    Stats {
        total,
        active,
        inactive,
    }
}
