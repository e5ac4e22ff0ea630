use actix_session::Session;
use validator::Validate;

use crate::forms::login::LoginForm;
use crate::screen::ConsoleScreens;
use crate::session::{BearerToken, SCREEN_KEY, SessionContext};
use crate::services::{ServiceError, ServiceResult};

/// Stores the token handed over by the identity service. Screens of the
/// previous session are dropped.
pub fn login(
    session: &Session,
    screens: &ConsoleScreens,
    form: LoginForm,
) -> ServiceResult<SessionContext> {
    if let Err(err) = form.validate() {
        log::warn!("Failed to validate login form: {err}");
        return Err(ServiceError::Form("Access token is required.".to_string()));
    }

    let (token, username) = form.normalized();
    let token = BearerToken::new(token)
        .ok_or_else(|| ServiceError::Form("Access token is required.".to_string()))?;

    if let Ok(Some(previous)) = session.get::<String>(SCREEN_KEY) {
        screens.discard(&previous);
    }

    SessionContext::establish(session, token, username).map_err(|err| {
        log::error!("Failed to store session: {err}");
        ServiceError::Session(err.to_string())
    })
}

/// Clears the session and the screens it owned.
pub fn logout(session: &Session, screens: &ConsoleScreens) {
    if let Some(key) = SessionContext::clear(session) {
        screens.discard(&key);
    }
}
