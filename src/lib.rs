//! Administrative console for a risk-management platform: lists, filters
//! and edits platform users and risk contexts held by a REST backend.

pub mod domain;
pub mod forms;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod pagination;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod resource;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod screen;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "server")]
pub mod session;

#[cfg(feature = "server")]
pub use server::{configure, run};

#[cfg(feature = "server")]
mod server {
    use std::time::Duration;

    use actix_cors::Cors;
    use actix_files::Files;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use tera::Tera;

    use crate::models::config::ServerConfig;
    use crate::repository::HttpGateway;
    use crate::routes::contexts::{
        close_context_edit, contexts_page, edit_context, next_contexts, prev_contexts,
        reset_contexts, save_context, search_contexts, show_contexts, view_contexts,
    };
    use crate::routes::main::{auth_callback, index, login, logout, show_login};
    use crate::routes::users::{
        close_user_edit, edit_user, next_users, prev_users, reset_users, save_user, search_users,
        show_users, users_page, view_users,
    };
    use crate::screen::ConsoleScreens;

    /// Registers every console route.
    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.service(index)
            .service(show_login)
            .service(login)
            .service(auth_callback)
            .service(logout)
            .service(show_users)
            .service(view_users)
            .service(search_users)
            .service(reset_users)
            .service(users_page)
            .service(next_users)
            .service(prev_users)
            .service(close_user_edit)
            .service(edit_user)
            .service(save_user)
            .service(show_contexts)
            .service(view_contexts)
            .service(search_contexts)
            .service(reset_contexts)
            .service(contexts_page)
            .service(next_contexts)
            .service(prev_contexts)
            .service(close_context_edit)
            .service(edit_context)
            .service(save_context);
    }

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        let gateway = HttpGateway::new(
            &server_config.api_base_url,
            Duration::from_secs(server_config.request_timeout_secs),
        )
        .map_err(|e| std::io::Error::other(format!("Failed to build API client: {e}")))?;
        log::info!("Using API at {}", gateway.base_url());

        // Screens are shared by every worker.
        let screens = web::Data::new(ConsoleScreens::new(&server_config));
        let gateway = web::Data::new(gateway);

        // Keys and stores for sessions and flash messages.
        let secret_key = Key::from(server_config.secret.as_bytes());

        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

        let bind_address = (server_config.address.clone(), server_config.port);

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(message_framework.clone())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                        .cookie_secure(false) // set to true in prod
                        .cookie_domain(Some(format!(".{}", server_config.domain)))
                        .build(),
                )
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .service(Files::new("/assets", "./assets"))
                .configure(configure)
                .app_data(web::Data::new(tera.clone()))
                .app_data(gateway.clone())
                .app_data(screens.clone())
                .app_data(web::Data::new(server_config.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
