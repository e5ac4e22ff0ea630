use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::dto::listing::ScreenPage;
use crate::models::config::ServerConfig;
use crate::repository::HttpGateway;
use crate::resource::Resource;
use crate::screen::ScreenStore;
use crate::services::ServiceError;
use crate::services::listing::{self as listing_service, ListAction, SaveOutcome, load_list};
use crate::session::SessionContext;

pub mod contexts;
pub mod main;
pub mod users;

/// Maps a flash level to the CSS alert class.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Context shared by every page: alerts, the header user and the nav state.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    session: &SessionContext,
    current_page: &str,
    auth_service_url: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    let hint = session.untrusted_display_hint();
    context.insert("display_name", hint.label());
    context.insert("display_email", &hint.email);
    context.insert("authenticated", &session.is_authenticated());
    context.insert("current_page", current_page);
    context.insert("home_url", auth_service_url);
    context
}

/// Renders the list template of `R` for a screen snapshot.
pub fn render_screen<R: Resource>(
    tera: &Tera,
    mut context: Context,
    page: &ScreenPage<R>,
) -> HttpResponse {
    context.insert("screen", page);
    context.insert("base_path", R::KIND.screen_path());
    context.insert("label", R::KIND.label());
    context.insert("singular", R::KIND.singular());
    render_template(tera, R::KIND.template(), &context)
}

fn nav_key<R: Resource>() -> &'static str {
    R::KIND.screen_path().trim_start_matches('/')
}

/// Runs a list action and renders the resulting screen.
pub async fn respond_list<R: Resource>(
    store: &ScreenStore<R>,
    gateway: &HttpGateway,
    session: &SessionContext,
    action: ListAction<R::Filters>,
    flash_messages: &IncomingFlashMessages,
    server_config: &ServerConfig,
    tera: &Tera,
) -> HttpResponse {
    let page = load_list(store, gateway, session, action).await;
    let context = base_context(
        flash_messages,
        session,
        nav_key::<R>(),
        &server_config.auth_service_url,
    );
    render_screen::<R>(tera, context, &page)
}

/// Renders the cached screen with the edit modal of `id` open.
pub fn respond_open_edit<R: Resource>(
    store: &ScreenStore<R>,
    session: &SessionContext,
    id: &str,
    flash_messages: &IncomingFlashMessages,
    server_config: &ServerConfig,
    tera: &Tera,
) -> HttpResponse {
    match listing_service::open_edit(store, session, id) {
        Ok(page) => {
            let context = base_context(
                flash_messages,
                session,
                nav_key::<R>(),
                &server_config.auth_service_url,
            );
            render_screen::<R>(tera, context, &page)
        }
        Err(_) => {
            FlashMessage::error(format!("The {} is not on the current page.", R::KIND.singular()))
                .send();
            redirect(R::KIND.screen_path())
        }
    }
}

/// Submits an edit. A saved edit redirects to the cached view, a rejected
/// one re-renders the open modal.
pub async fn respond_save<R: Resource>(
    store: &ScreenStore<R>,
    gateway: &HttpGateway,
    session: &SessionContext,
    draft: R::Draft,
    flash_messages: &IncomingFlashMessages,
    server_config: &ServerConfig,
    tera: &Tera,
) -> HttpResponse {
    let view_path = format!("{}/view", R::KIND.screen_path());
    match listing_service::save_edit(store, gateway, session, draft).await {
        Ok(SaveOutcome::Saved) => {
            FlashMessage::success(format!("The {} was updated.", R::KIND.singular())).send();
            redirect(&view_path)
        }
        Ok(SaveOutcome::Rejected(page)) => {
            let context = base_context(
                flash_messages,
                session,
                nav_key::<R>(),
                &server_config.auth_service_url,
            );
            render_screen::<R>(tera, context, &page)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error(format!("The {} is not on the current page.", R::KIND.singular()))
                .send();
            redirect(R::KIND.screen_path())
        }
        Err(err) => {
            log::error!("Failed to save the {}: {err}", R::KIND.singular());
            FlashMessage::error(format!("Failed to update {}. Please try again.", R::KIND.singular()))
                .send();
            redirect(&view_path)
        }
    }
}
