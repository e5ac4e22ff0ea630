use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::login::LoginForm;
use crate::models::config::ServerConfig;
use crate::routes::{base_context, redirect, render_template};
use crate::screen::ConsoleScreens;
use crate::services::session as session_service;
use crate::session::SessionContext;

const HOME: &str = "/contexts";

#[get("/")]
pub async fn index() -> impl Responder {
    redirect(HOME)
}

#[get("/login")]
pub async fn show_login(
    session: SessionContext,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(
        &flash_messages,
        &session,
        "login",
        &server_config.auth_service_url,
    );
    render_template(&tera, "main/login.html", &context)
}

fn establish(session: &Session, screens: &ConsoleScreens, form: LoginForm) -> HttpResponse {
    match session_service::login(session, screens, form) {
        Ok(_) => {
            FlashMessage::success("Signed in.").send();
            redirect(HOME)
        }
        Err(err) => {
            log::warn!("Login rejected: {err}");
            FlashMessage::error(err.to_string()).send();
            redirect("/login")
        }
    }
}

#[post("/login")]
pub async fn login(
    session: Session,
    screens: web::Data<ConsoleScreens>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    establish(&session, &screens, form)
}

/// Redirect target of the identity service: `?token=…&username=…`.
#[get("/auth/callback")]
pub async fn auth_callback(
    session: Session,
    screens: web::Data<ConsoleScreens>,
    web::Query(form): web::Query<LoginForm>,
) -> impl Responder {
    establish(&session, &screens, form)
}

#[post("/logout")]
pub async fn logout(session: Session, screens: web::Data<ConsoleScreens>) -> impl Responder {
    session_service::logout(&session, &screens);
    redirect("/login")
}
