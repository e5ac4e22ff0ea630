use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::filter::UserFilters;
use crate::forms::user::EditUserForm;
use crate::models::config::ServerConfig;
use crate::repository::HttpGateway;
use crate::resource::Users;
use crate::routes::{redirect, respond_list, respond_open_edit, respond_save};
use crate::screen::ConsoleScreens;
use crate::services::listing::{self as listing_service, ListAction};
use crate::session::SessionContext;

async fn list(
    action: ListAction<UserFilters>,
    session: SessionContext,
    screens: web::Data<ConsoleScreens>,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> HttpResponse {
    respond_list::<Users>(
        &screens.users,
        gateway.get_ref(),
        &session,
        action,
        &flash_messages,
        &server_config,
        &tera,
    )
    .await
}

#[get("/users")]
pub async fn show_users(
    session: SessionContext,
    screens: web::Data<ConsoleScreens>,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    list(ListAction::Refresh, session, screens, gateway, flash_messages, server_config, tera).await
}

#[get("/users/view")]
pub async fn view_users(
    session: SessionContext,
    screens: web::Data<ConsoleScreens>,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    list(ListAction::View, session, screens, gateway, flash_messages, server_config, tera).await
}

#[get("/users/search")]
pub async fn search_users(
    filters: web::Query<UserFilters>,
    session: SessionContext,
    screens: web::Data<ConsoleScreens>,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let action = ListAction::Search(filters.into_inner());
    list(action, session, screens, gateway, flash_messages, server_config, tera).await
}

#[post("/users/reset")]
pub async fn reset_users(
    session: SessionContext,
    screens: web::Data<ConsoleScreens>,
) -> impl Responder {
    listing_service::reset_filters(&screens.users, &session);
    redirect("/users")
}

#[get("/users/page/{page}")]
pub async fn users_page(
    page: web::Path<u32>,
    session: SessionContext,
    screens: web::Data<ConsoleScreens>,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let action = ListAction::Page(page.into_inner());
    list(action, session, screens, gateway, flash_messages, server_config, tera).await
}

#[get("/users/next")]
pub async fn next_users(
    session: SessionContext,
    screens: web::Data<ConsoleScreens>,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    list(ListAction::Next, session, screens, gateway, flash_messages, server_config, tera).await
}

#[get("/users/prev")]
pub async fn prev_users(
    session: SessionContext,
    screens: web::Data<ConsoleScreens>,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    list(ListAction::Prev, session, screens, gateway, flash_messages, server_config, tera).await
}

#[get("/users/{id}/edit")]
pub async fn edit_user(
    id: web::Path<String>,
    session: SessionContext,
    screens: web::Data<ConsoleScreens>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    respond_open_edit::<Users>(
        &screens.users,
        &session,
        &id,
        &flash_messages,
        &server_config,
        &tera,
    )
}

/// Role checkboxes repeat the `roles` key, which `web::Form` cannot collect,
/// so the body is decoded with `serde_html_form`.
#[post("/users/{id}/edit")]
#[allow(clippy::too_many_arguments)]
pub async fn save_user(
    id: web::Path<String>,
    body: web::Bytes,
    session: SessionContext,
    screens: web::Data<ConsoleScreens>,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let form: EditUserForm = match serde_html_form::from_bytes(&body) {
        Ok(form) => form,
        Err(err) => {
            log::error!("Failed to parse user form: {err}");
            FlashMessage::error("Invalid form submission.").send();
            return redirect("/users/view");
        }
    };

    respond_save::<Users>(
        &screens.users,
        gateway.get_ref(),
        &session,
        form.into_draft(&id),
        &flash_messages,
        &server_config,
        &tera,
    )
    .await
}

#[post("/users/edit/close")]
pub async fn close_user_edit(
    session: SessionContext,
    screens: web::Data<ConsoleScreens>,
) -> impl Responder {
    listing_service::close_edit(&screens.users, &session);
    redirect("/users/view")
}
