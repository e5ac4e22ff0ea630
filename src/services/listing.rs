use crate::domain::types::ResourceId;
use crate::dto::listing::ScreenPage;
use crate::forms::EditDraft;
use crate::repository::errors::ApiError;
use crate::repository::{ResourceReader, ResourceWriter};
use crate::resource::Resource;
use crate::screen::edit::EditError;
use crate::screen::{FetchOutcome, ListScreen, ScreenStore, execute};
use crate::services::{ServiceError, ServiceResult};
use crate::session::SessionContext;

/// User action on a list screen.
#[derive(Debug)]
pub enum ListAction<F> {
    /// Fetch the current page with the current filters.
    Refresh,
    /// Render the cached state.
    View,
    Search(F),
    Page(u32),
    Next,
    Prev,
}

/// Applies `action`, fetches when it calls for it, and returns the screen.
pub async fn load_list<R, G>(
    store: &ScreenStore<R>,
    gateway: &G,
    session: &SessionContext,
    action: ListAction<R::Filters>,
) -> ScreenPage<R>
where
    R: Resource,
    G: ResourceReader,
{
    if session.token().is_none() {
        return signed_out_page(store);
    }

    let key = session.screen_key();
    let plan = store.with(key, |screen| match action {
        ListAction::Refresh => Some(screen.plan_fetch(false)),
        ListAction::View => None,
        ListAction::Search(filters) => Some(screen.set_filters(filters)),
        ListAction::Page(page) => Some(screen.go_to_page(page)),
        ListAction::Next => screen.next(),
        ListAction::Prev => screen.prev(),
    });

    if let Some(plan) = plan {
        let outcome = execute::<G, R::Item>(gateway, session.token(), plan).await;
        store.with(key, |screen| screen.apply(outcome));
    }

    store.with(key, |screen| screen.snapshot())
}

/// Screen of a session without a token, rendered without keeping any state.
fn signed_out_page<R: Resource>(store: &ScreenStore<R>) -> ScreenPage<R> {
    let mut screen = ListScreen::<R>::new(store.settings());
    let plan = screen.plan_fetch(false);
    screen.apply(FetchOutcome {
        generation: plan.generation,
        result: Err(ApiError::MissingCredential),
        stats: None,
    });
    screen.snapshot()
}

/// Restores default filters; the next list request fetches page one.
pub fn reset_filters<R: Resource>(store: &ScreenStore<R>, session: &SessionContext) {
    store.with_existing(session.screen_key(), |screen| screen.clear_filters());
}

/// Opens the edit modal for a row of the cached page.
pub fn open_edit<R: Resource>(
    store: &ScreenStore<R>,
    session: &SessionContext,
    id: &str,
) -> ServiceResult<ScreenPage<R>> {
    store
        .with_existing(session.screen_key(), |screen| {
            screen.open_edit(id).map_err(|err| {
                log::info!("Cannot edit {} {id}: {err}", R::KIND.singular());
                ServiceError::NotFound
            })?;
            Ok(screen.snapshot())
        })
        .unwrap_or(Err(ServiceError::NotFound))
}

pub fn close_edit<R: Resource>(store: &ScreenStore<R>, session: &SessionContext) {
    store.with_existing(session.screen_key(), |screen| screen.close_edit());
}

/// Result of submitting an edit modal.
pub enum SaveOutcome<R: Resource> {
    Saved,
    /// The modal stays open; the page carries the message.
    Rejected(ScreenPage<R>),
}

/// Validates and submits a draft, then reconciles the cached row.
pub async fn save_edit<R, G>(
    store: &ScreenStore<R>,
    gateway: &G,
    session: &SessionContext,
    draft: R::Draft,
) -> ServiceResult<SaveOutcome<R>>
where
    R: Resource,
    G: ResourceWriter,
{
    let key = session.screen_key();
    let id = ResourceId::new(draft.id()).map_err(|_| ServiceError::NotFound)?;

    let begun = store
        .with_existing(key, |screen| screen.begin_save(draft))
        .unwrap_or_else(|| Err(EditError::NotCached(id.as_str().to_string())));
    let payload = match begun {
        Ok(payload) => payload,
        Err(EditError::Invalid(failure)) => {
            log::info!("Rejected {} {} edit: {failure}", R::KIND.singular(), id.as_str());
            let page = store.with_existing(key, |screen| screen.snapshot());
            return page.map(SaveOutcome::Rejected).ok_or(ServiceError::NotFound);
        }
        Err(EditError::NotCached(_)) => return Err(ServiceError::NotFound),
        Err(err) => return Err(ServiceError::Form(err.to_string())),
    };

    let result = match session.token() {
        Some(token) => gateway.patch_item(R::KIND, token, &id, &payload).await,
        None => Err(ApiError::MissingCredential),
    };
    let saved = result.is_ok();

    let page = store
        .with_existing(key, |screen| {
            screen
                .finish_save(&id, &payload, result)
                .map(|()| screen.snapshot())
        })
        .unwrap_or_else(|| Err(EditError::NotCached(id.as_str().to_string())));
    match page {
        Ok(_) if saved => Ok(SaveOutcome::Saved),
        Ok(page) => Ok(SaveOutcome::Rejected(page)),
        // Saved on the server but no longer on the cached page.
        Err(EditError::NotCached(_)) => Ok(SaveOutcome::Saved),
        Err(err) => {
            log::error!("Failed to reconcile {} {}: {err}", R::KIND.singular(), id.as_str());
            Err(ServiceError::Form(err.to_string()))
        }
    }
}
