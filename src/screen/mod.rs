//! Generic list screen: filters, page cursor, cached page, stats and the
//! edit modal of one resource, plus the fetch cycle that refreshes them.
//!
//! A fetch runs in three steps so no lock is held over the network call:
//! [`ListScreen::plan_fetch`] bumps the generation and builds the requests,
//! [`execute`] performs them, and [`ListScreen::apply`] stores the outcome
//! only when its generation is still the latest one issued.

use serde::de::DeserializeOwned;

use crate::domain::filter::FilterState;
use crate::domain::listing::{ListItem, ListQuery, ListResponse, Pagination, Stats};
use crate::domain::types::ResourceId;
use crate::dto::listing::{EditView, ListPageData, ScreenPage};
use crate::forms::EditDraft;
use crate::models::config::ScreenSettings;
use crate::pagination::PageLinks;
use crate::repository::ResourceReader;
use crate::repository::errors::{ApiError, ApiResult};
use crate::resource::{Resource, ResourceKind};
use crate::session::BearerToken;

pub mod edit;
pub mod query;
pub mod stats;
pub mod store;

use edit::{EditError, EditState, merge_payload};
use query::{FilterSupport, build_list_query, build_stats_query};
use stats::{StatsQueries, StatsStrategy, backend_stats};

pub use store::{ConsoleScreens, ScreenStore};

/// Requests of one fetch, tagged with the generation that issued them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchPlan {
    pub generation: u64,
    pub kind: ResourceKind,
    pub list: ListQuery,
    /// Present under the backend stats strategy.
    pub stats: Option<StatsQueries>,
}

/// Settled result of a [`FetchPlan`].
#[derive(Debug)]
pub struct FetchOutcome<T> {
    pub generation: u64,
    pub result: ApiResult<ListResponse<T>>,
    pub stats: Option<Stats>,
}

/// Performs the requests of `plan`. Without a token nothing is sent.
pub async fn execute<G, T>(
    gateway: &G,
    token: Option<&BearerToken>,
    plan: FetchPlan,
) -> FetchOutcome<T>
where
    G: ResourceReader,
    T: DeserializeOwned,
{
    let Some(token) = token else {
        return FetchOutcome {
            generation: plan.generation,
            result: Err(ApiError::MissingCredential),
            stats: None,
        };
    };

    let (result, stats) = match &plan.stats {
        Some(queries) => {
            let (result, stats) = tokio::join!(
                gateway.fetch_page::<T>(plan.kind, token, &plan.list),
                backend_stats(gateway, plan.kind, token, queries),
            );
            (result, Some(stats))
        }
        None => (gateway.fetch_page::<T>(plan.kind, token, &plan.list).await, None),
    };

    FetchOutcome {
        generation: plan.generation,
        result,
        stats,
    }
}

/// State of one resource listing for one session.
pub struct ListScreen<R: Resource> {
    settings: ScreenSettings,
    filters: R::Filters,
    page: u32,
    items: Vec<R::Item>,
    pagination: Option<Pagination>,
    stats: Stats,
    options: Vec<String>,
    error: Option<String>,
    loading: bool,
    generation: u64,
    edit: EditState<R::Draft>,
}

impl<R: Resource> ListScreen<R> {
    pub fn new(settings: ScreenSettings) -> Self {
        Self {
            settings,
            filters: R::Filters::default(),
            page: 1,
            items: Vec::new(),
            pagination: None,
            stats: Stats::default(),
            options: Vec::new(),
            error: None,
            loading: false,
            generation: 0,
            edit: EditState::Closed,
        }
    }

    pub fn filters(&self) -> &R::Filters {
        &self.filters
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Displayed rows.
    pub fn items(&self) -> &[R::Item] {
        &self.items
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn edit(&self) -> &EditState<R::Draft> {
        &self.edit
    }

    /// Issues a new generation for the current filters and page.
    pub fn plan_fetch(&mut self, reset_page: bool) -> FetchPlan {
        if reset_page {
            self.page = 1;
        }
        self.generation += 1;
        self.loading = true;

        let predicates = self.filters.predicates();
        let support = self.settings.filtering;
        let list = build_list_query(
            self.page,
            self.settings.page_size,
            &predicates,
            reset_page,
            support,
        );
        let stats = match self.settings.stats {
            StatsStrategy::Client => None,
            StatsStrategy::Backend => Some(StatsQueries {
                total: build_stats_query(&predicates, support, None),
                active: build_stats_query(&predicates, support, Some(true)),
                inactive: build_stats_query(&predicates, support, Some(false)),
            }),
        };

        FetchPlan {
            generation: self.generation,
            kind: R::KIND,
            list,
            stats,
        }
    }

    /// Stores a settled fetch. Returns `false` when a newer fetch was issued
    /// in the meantime and the outcome was dropped.
    pub fn apply(&mut self, outcome: FetchOutcome<R::Item>) -> bool {
        if outcome.generation != self.generation {
            log::debug!(
                "Dropping stale {} fetch {} (latest {})",
                R::KIND.label(),
                outcome.generation,
                self.generation
            );
            return false;
        }
        self.loading = false;

        match outcome.result {
            Ok(response) => {
                let mut fetched = response.data;
                if let Some(limit) = response.pagination.as_ref().map(|p| p.limit as usize) {
                    fetched.truncate(limit.max(1));
                }
                self.options = R::options(&fetched);
                self.items = match self.settings.filtering {
                    FilterSupport::Server => fetched,
                    FilterSupport::Client => self.filters.predicates().apply(&fetched),
                };
                self.pagination = response.pagination;
                if let Some(pagination) = &self.pagination {
                    self.page = pagination.page.max(1);
                }
                self.stats = outcome
                    .stats
                    .unwrap_or_else(|| Stats::from_items(&self.items));
                self.error = None;
            }
            Err(err) => {
                log::warn!("Failed to fetch {}: {err}", R::KIND.label());
                self.items.clear();
                self.options.clear();
                self.pagination = None;
                self.stats = Stats::default();
                self.error = Some(err.user_message(R::KIND.label(), R::KIND.singular()));
            }
        }
        true
    }

    /// Replaces the filters; the next fetch starts on page one.
    pub fn set_filters(&mut self, filters: R::Filters) -> FetchPlan {
        self.filters = filters;
        self.plan_fetch(true)
    }

    /// Restores the default filters and page one without fetching.
    pub fn clear_filters(&mut self) {
        self.filters = R::Filters::default();
        self.page = 1;
    }

    pub fn reset_filters(&mut self) -> FetchPlan {
        self.clear_filters();
        self.plan_fetch(true)
    }

    pub fn go_to_page(&mut self, page: u32) -> FetchPlan {
        self.page = page.max(1);
        self.plan_fetch(false)
    }

    /// `None` when the server reported no next page.
    pub fn next(&mut self) -> Option<FetchPlan> {
        let pagination = self.pagination.as_ref().filter(|p| p.has_next_page)?;
        let page = pagination.page.max(1) + 1;
        Some(self.go_to_page(page))
    }

    /// `None` when the server reported no previous page.
    pub fn prev(&mut self) -> Option<FetchPlan> {
        let pagination = self.pagination.as_ref().filter(|p| p.has_prev_page)?;
        let page = pagination.page.saturating_sub(1);
        Some(self.go_to_page(page))
    }

    fn cached(&self, id: &str) -> Option<&R::Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Opens the modal prefilled from the cached row `id`.
    pub fn open_edit(&mut self, id: &str) -> Result<(), EditError> {
        let item = self
            .cached(id)
            .ok_or_else(|| EditError::NotCached(id.to_string()))?;
        self.edit = EditState::Open {
            draft: R::Draft::prefill(item),
            error: None,
        };
        Ok(())
    }

    pub fn close_edit(&mut self) {
        self.edit = EditState::Closed;
    }

    /// Validates a submitted draft. The modal stays open with the draft; on a
    /// rule failure it also shows the message.
    pub fn begin_save(
        &mut self,
        draft: R::Draft,
    ) -> Result<<R::Draft as EditDraft>::Payload, EditError> {
        if self.cached(draft.id()).is_none() {
            return Err(EditError::NotCached(draft.id().to_string()));
        }
        let validated = draft.validate();
        let error = validated.as_ref().err().map(ToString::to_string);
        self.edit = EditState::Open { draft, error };
        validated.map_err(EditError::from)
    }

    /// Reconciles the cached row after the update request settled.
    pub fn finish_save(
        &mut self,
        id: &ResourceId,
        payload: &<R::Draft as EditDraft>::Payload,
        result: ApiResult<()>,
    ) -> Result<(), EditError> {
        if let Err(err) = result {
            let message = err.user_message(R::KIND.label(), R::KIND.singular());
            if let EditState::Open { error, .. } = &mut self.edit {
                *error = Some(message);
            }
            return Ok(());
        }

        let position = self
            .items
            .iter()
            .position(|item| item.id() == id.as_str())
            .ok_or_else(|| EditError::NotCached(id.as_str().to_string()))?;
        let merged = merge_payload(&self.items[position], payload)?;
        self.items[position] = merged;

        if self.settings.stats == StatsStrategy::Client {
            self.stats = Stats::from_items(&self.items);
        }
        self.edit = EditState::Closed;
        Ok(())
    }

    /// Render data of the current state.
    pub fn snapshot(&self) -> ScreenPage<R> {
        ListPageData {
            filters: self.filters.clone(),
            items: self.items.clone(),
            pagination: self.pagination.clone(),
            links: PageLinks::new(self.pagination.as_ref()),
            stats: self.stats,
            options: self.options.clone(),
            error: self.error.clone(),
            loading: self.loading,
            edit: match &self.edit {
                EditState::Open { draft, error } => Some(EditView {
                    draft: draft.clone(),
                    error: error.clone(),
                }),
                EditState::Closed => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::filter::{ActivityFilter, ContextFilters, UserFilters};
    use crate::domain::user::User;
    use crate::forms::ValidationFailure;
    use crate::repository::fake::FakeGateway;
    use crate::resource::{RiskContexts, Users};

    fn settings(filtering: FilterSupport, stats: StatsStrategy) -> ScreenSettings {
        ScreenSettings {
            page_size: 2,
            filtering,
            stats,
        }
    }

    fn pagination(page: u32, total_pages: u32) -> Pagination {
        Pagination {
            page,
            limit: 2,
            total_items: u64::from(total_pages) * 2,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }

    fn user(id: &str, name: &str, active: bool) -> User {
        User {
            id: id.into(),
            username: id.into(),
            name: name.into(),
            email: format!("{id}@example.com"),
            is_active: active,
            roles: vec!["viewer".into()],
            ..User::default()
        }
    }

    fn ok_outcome<T>(generation: u64, data: Vec<T>, pagination: Pagination) -> FetchOutcome<T> {
        FetchOutcome {
            generation,
            result: Ok(ListResponse {
                message: None,
                data,
                pagination: Some(pagination),
            }),
            stats: None,
        }
    }

    fn loaded_users() -> ListScreen<Users> {
        let mut screen = ListScreen::<Users>::new(settings(FilterSupport::Server, StatsStrategy::Client));
        let plan = screen.plan_fetch(false);
        screen.apply(ok_outcome(
            plan.generation,
            vec![user("u-1", "Ana", true), user("u-2", "Budi", false)],
            pagination(1, 3),
        ));
        screen
    }

    #[test]
    fn successful_fetch_populates_the_screen() {
        let screen = loaded_users();
        assert_eq!(screen.items().len(), 2);
        assert_eq!(
            screen.stats(),
            Stats {
                total: 2,
                active: 1,
                inactive: 1
            }
        );
        assert!(!screen.is_loading());
        assert!(screen.error().is_none());
        assert_eq!(screen.snapshot().options, vec!["viewer"]);
    }

    #[test]
    fn rows_beyond_the_page_size_are_dropped() {
        let mut screen = ListScreen::<Users>::new(settings(FilterSupport::Server, StatsStrategy::Client));
        let plan = screen.plan_fetch(false);
        screen.apply(ok_outcome(
            plan.generation,
            vec![user("a", "A", true), user("b", "B", true), user("c", "C", true)],
            pagination(1, 2),
        ));
        assert_eq!(screen.items().len(), 2);
    }

    #[test]
    fn unauthenticated_clears_previous_state() {
        let mut screen = loaded_users();
        let plan = screen.plan_fetch(false);
        screen.apply(FetchOutcome {
            generation: plan.generation,
            result: Err(ApiError::Unauthenticated),
            stats: None,
        });
        assert!(screen.items().is_empty());
        assert!(screen.pagination().is_none());
        assert_eq!(screen.stats(), Stats::default());
        assert!(
            screen
                .error()
                .is_some_and(|message| message.contains("token is missing or invalid"))
        );
    }

    #[test]
    fn stale_outcomes_are_discarded() {
        let mut screen = ListScreen::<Users>::new(settings(FilterSupport::Server, StatsStrategy::Client));
        let first = screen.plan_fetch(false);
        let second = screen.plan_fetch(false);

        assert!(screen.apply(ok_outcome(
            second.generation,
            vec![user("new", "New", true)],
            pagination(1, 1),
        )));
        assert!(!screen.apply(ok_outcome(
            first.generation,
            vec![user("old", "Old", true)],
            pagination(1, 1),
        )));
        assert_eq!(screen.items()[0].id, "new");
    }

    #[test]
    fn loading_stays_set_until_the_latest_fetch_settles() {
        let mut screen = ListScreen::<Users>::new(settings(FilterSupport::Server, StatsStrategy::Client));
        let first = screen.plan_fetch(false);
        let _second = screen.plan_fetch(false);
        screen.apply(ok_outcome(first.generation, Vec::new(), pagination(1, 1)));
        assert!(screen.is_loading());
    }

    #[test]
    fn navigation_respects_server_flags() {
        let mut screen = loaded_users();
        assert!(screen.prev().is_none());

        let plan = screen.next().unwrap();
        assert_eq!(plan.list.page(), 2);
        screen.apply(ok_outcome(plan.generation, vec![user("u-3", "Citra", true)], pagination(2, 3)));

        let plan = screen.prev().unwrap();
        assert_eq!(plan.list.page(), 1);

        assert_eq!(screen.go_to_page(0).list.page(), 1);
    }

    #[test]
    fn new_filters_restart_on_page_one() {
        let mut screen = loaded_users();
        screen.go_to_page(3);
        let plan = screen.set_filters(UserFilters {
            active: ActivityFilter::Active,
            ..UserFilters::default()
        });
        assert_eq!(plan.list.page(), 1);
        assert_eq!(plan.list.get("isActive").as_deref(), Some("true"));

        let plan = screen.reset_filters();
        assert_eq!(screen.filters(), &UserFilters::default());
        assert_eq!(plan.list.get("isActive"), None);
    }

    #[test]
    fn backend_strategy_plans_count_queries() {
        let mut screen =
            ListScreen::<Users>::new(settings(FilterSupport::Server, StatsStrategy::Backend));
        let plan = screen.plan_fetch(false);
        let stats = plan.stats.unwrap();
        assert_eq!(stats.total.limit(), 1);
        assert_eq!(stats.active.get("isActive").as_deref(), Some("true"));
        assert_eq!(stats.inactive.get("isActive").as_deref(), Some("false"));
    }

    #[test]
    fn client_filtering_narrows_the_fetched_page() {
        let mut screen = ListScreen::<RiskContexts>::new(settings(
            FilterSupport::Client,
            StatsStrategy::Client,
        ));
        let plan = screen.set_filters(ContextFilters {
            period: "2024".into(),
            ..ContextFilters::default()
        });
        assert_eq!(plan.list.get("period"), None);

        let contexts: Vec<_> = [(2023, 2025, true), (2025, 2026, false)]
            .into_iter()
            .enumerate()
            .map(|(n, (start, end, active))| crate::domain::context::RiskContext {
                id: format!("ctx-{n}"),
                period_start: Some(start),
                period_end: Some(end),
                is_active: active,
                ..Default::default()
            })
            .collect();
        screen.apply(ok_outcome(plan.generation, contexts, pagination(1, 1)));

        assert_eq!(screen.items().len(), 1);
        assert_eq!(screen.items()[0].id, "ctx-0");
        assert_eq!(screen.stats().total, 1);
        assert_eq!(screen.snapshot().options, vec!["2023", "2025", "2026"]);
    }

    #[test]
    fn edit_opens_only_for_cached_rows() {
        let mut screen = loaded_users();
        assert_eq!(
            screen.open_edit("missing"),
            Err(EditError::NotCached("missing".into()))
        );
        screen.open_edit("u-2").unwrap();
        assert_eq!(screen.edit().draft().map(|d| d.name.as_str()), Some("Budi"));
        screen.close_edit();
        assert!(!screen.edit().is_open());
    }

    #[test]
    fn invalid_draft_keeps_modal_open_with_message() {
        let mut screen = loaded_users();
        screen.open_edit("u-1").unwrap();
        let mut draft = screen.edit().draft().cloned().unwrap();
        draft.name = " ".into();

        assert_eq!(
            screen.begin_save(draft),
            Err(EditError::Invalid(ValidationFailure::NameRequired))
        );
        assert_eq!(screen.edit().error(), Some("Name is required."));
    }

    #[test]
    fn saved_payload_is_merged_into_the_matching_row_only() {
        let mut screen = loaded_users();
        let before_other = screen.items()[1].clone();
        screen.open_edit("u-1").unwrap();
        let mut draft = screen.edit().draft().cloned().unwrap();
        draft.name = "Ana Maria".into();
        draft.is_active = false;
        draft.roles = vec!["admin".into()];

        let payload = screen.begin_save(draft).unwrap();
        let id = ResourceId::new("u-1").unwrap();
        screen.finish_save(&id, &payload, Ok(())).unwrap();

        let saved = &screen.items()[0];
        assert_eq!(saved.name, "Ana Maria");
        assert_eq!(saved.roles, vec!["admin"]);
        assert!(!saved.is_active);
        assert_eq!(saved.username, "u-1");
        assert_eq!(screen.items()[1], before_other);
        assert_eq!(screen.stats().inactive, 2);
        assert!(!screen.edit().is_open());
    }

    #[test]
    fn rejected_update_surfaces_server_message() {
        let mut screen = loaded_users();
        screen.open_edit("u-1").unwrap();
        let draft = screen.edit().draft().cloned().unwrap();
        let payload = screen.begin_save(draft).unwrap();
        let id = ResourceId::new("u-1").unwrap();

        screen
            .finish_save(
                &id,
                &payload,
                Err(ApiError::UpdateRejected {
                    status: Some(409),
                    message: Some("Email already registered".into()),
                }),
            )
            .unwrap();
        assert!(screen.edit().is_open());
        assert_eq!(screen.edit().error(), Some("Email already registered"));
        assert_eq!(screen.items()[0].name, "Ana");
    }

    #[actix_web::test]
    async fn missing_token_issues_no_request() {
        let gateway = FakeGateway::new();
        let mut screen = loaded_users();
        let plan = screen.plan_fetch(false);

        let outcome = execute::<_, User>(&gateway, None, plan).await;
        screen.apply(outcome);

        assert!(gateway.calls().is_empty());
        assert_eq!(
            screen.error(),
            Some("Access token not found. Please log in again.")
        );
    }

    #[actix_web::test]
    async fn execute_runs_list_and_counts_together() {
        let gateway = FakeGateway::new().on_list(|_, query| {
            let data: Value = json!([{"id": "u-1", "name": "Ana", "isActive": true}]);
            let total = match query.get("isActive").as_deref() {
                Some("true") => 7,
                Some("false") => 3,
                _ => 10,
            };
            Ok(crate::repository::fake::list_body(data, total))
        });
        let mut screen =
            ListScreen::<Users>::new(settings(FilterSupport::Server, StatsStrategy::Backend));
        let token = BearerToken::new("good-token").unwrap();

        let plan = screen.plan_fetch(false);
        let outcome = execute(&gateway, Some(&token), plan).await;
        assert!(screen.apply(outcome));

        assert_eq!(gateway.calls().len(), 4);
        assert_eq!(
            screen.stats(),
            Stats {
                total: 10,
                active: 7,
                inactive: 3
            }
        );
        assert_eq!(screen.items().len(), 1);
    }
}
