use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::domain::filter::ContextFilters;
use crate::forms::context::EditContextForm;
use crate::models::config::ServerConfig;
use crate::repository::HttpGateway;
use crate::resource::RiskContexts;
use crate::routes::{redirect, respond_list, respond_open_edit, respond_save};
use crate::screen::ConsoleScreens;
use crate::services::listing::{self as listing_service, ListAction};
use crate::session::SessionContext;

async fn list(
    action: ListAction<ContextFilters>,
    session: SessionContext,
    screens: web::Data<ConsoleScreens>,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> HttpResponse {
    respond_list::<RiskContexts>(
        &screens.contexts,
        gateway.get_ref(),
        &session,
        action,
        &flash_messages,
        &server_config,
        &tera,
    )
    .await
}

#[get("/contexts")]
pub async fn show_contexts(
    session: SessionContext,
    screens: web::Data<ConsoleScreens>,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    list(ListAction::Refresh, session, screens, gateway, flash_messages, server_config, tera).await
}

#[get("/contexts/view")]
pub async fn view_contexts(
    session: SessionContext,
    screens: web::Data<ConsoleScreens>,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    list(ListAction::View, session, screens, gateway, flash_messages, server_config, tera).await
}

#[get("/contexts/search")]
pub async fn search_contexts(
    filters: web::Query<ContextFilters>,
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

#[post("/contexts/reset")]
pub async fn reset_contexts(
    session: SessionContext,
    screens: web::Data<ConsoleScreens>,
) -> impl Responder {
    listing_service::reset_filters(&screens.contexts, &session);
    redirect("/contexts")
}

#[get("/contexts/page/{page}")]
pub async fn contexts_page(
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

#[get("/contexts/next")]
pub async fn next_contexts(
    session: SessionContext,
    screens: web::Data<ConsoleScreens>,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    list(ListAction::Next, session, screens, gateway, flash_messages, server_config, tera).await
}

#[get("/contexts/prev")]
pub async fn prev_contexts(
    session: SessionContext,
    screens: web::Data<ConsoleScreens>,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    list(ListAction::Prev, session, screens, gateway, flash_messages, server_config, tera).await
}

#[get("/contexts/{id}/edit")]
pub async fn edit_context(
    id: web::Path<String>,
    session: SessionContext,
    screens: web::Data<ConsoleScreens>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    respond_open_edit::<RiskContexts>(
        &screens.contexts,
        &session,
        &id,
        &flash_messages,
        &server_config,
        &tera,
    )
}

#[post("/contexts/{id}/edit")]
#[allow(clippy::too_many_arguments)]
pub async fn save_context(
    id: web::Path<String>,
    web::Form(form): web::Form<EditContextForm>,
    session: SessionContext,
    screens: web::Data<ConsoleScreens>,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    respond_save::<RiskContexts>(
        &screens.contexts,
        gateway.get_ref(),
        &session,
        form.into_draft(&id),
        &flash_messages,
        &server_config,
        &tera,
    )
    .await
}

#[post("/contexts/edit/close")]
pub async fn close_context_edit(
    session: SessionContext,
    screens: web::Data<ConsoleScreens>,
) -> impl Responder {
    listing_service::close_edit(&screens.contexts, &session);
    redirect("/contexts/view")
}
