//! Per-browser session context: the bearer token used for backend calls, an
//! optional display name and the key of the session's list screens.

use std::fmt::{Debug, Formatter};
use std::future::{Ready, ready};

use actix_session::{Session, SessionExt, SessionInsertError};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use jsonwebtoken::{DecodingKey, Validation, decode, decode_header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session key holding the bearer token.
pub const TOKEN_KEY: &str = "access_token";
/// Key written by older console builds; still read on load.
pub const LEGACY_TOKEN_KEY: &str = "accessToken";
pub const USERNAME_KEY: &str = "auth_username";
pub const SCREEN_KEY: &str = "screen_key";

const FALLBACK_DISPLAY_NAME: &str = "User";

/// Opaque credential attached as `Authorization: Bearer <token>`.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Returns `None` for blank input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into().trim().to_string();
        if raw.is_empty() { None } else { Some(Self(raw)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value of the `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl Debug for BearerToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// Name and email read from the token payload without verifying it.
///
/// Only ever used for display; never consult it for access decisions.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct UntrustedDisplayHint {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UntrustedDisplayHint {
    /// Label for the header dropdown.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(FALLBACK_DISPLAY_NAME)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
struct DisplayClaims {
    name: Option<String>,
    username: Option<String>,
    email: Option<String>,
}

/// Decodes the payload segment of a JWT, skipping signature and expiry checks.
fn decode_display_claims(token: &BearerToken) -> Option<UntrustedDisplayHint> {
    let header = decode_header(token.as_str()).ok()?;
    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<DisplayClaims>(token.as_str(), &DecodingKey::from_secret(&[]), &validation)
        .map_err(|err| log::debug!("Token payload is not a readable JWT: {err}"))
        .ok()?;

    Some(UntrustedDisplayHint {
        name: data.claims.name.or(data.claims.username),
        email: data.claims.email,
    })
}

/// Explicit session state handed to services and the gateway.
#[derive(Clone, Debug)]
pub struct SessionContext {
    token: Option<BearerToken>,
    username: Option<String>,
    screen_key: String,
}

impl SessionContext {
    pub fn new(token: Option<BearerToken>, username: Option<String>, screen_key: String) -> Self {
        Self {
            token,
            username,
            screen_key,
        }
    }

    /// Reads the session, tolerating the legacy token key. A missing screen
    /// key is generated and stored.
    pub fn load(session: &Session) -> Self {
        let read = |key: &str| {
            session
                .get::<String>(key)
                .map_err(|err| log::warn!("Failed to read session key {key}: {err}"))
                .ok()
                .flatten()
        };

        let token = read(TOKEN_KEY)
            .or_else(|| read(LEGACY_TOKEN_KEY))
            .and_then(BearerToken::new);
        let username = read(USERNAME_KEY);
        let screen_key = match read(SCREEN_KEY) {
            Some(key) => key,
            None => {
                let key = Uuid::new_v4().to_string();
                if let Err(err) = session.insert(SCREEN_KEY, &key) {
                    log::warn!("Failed to store screen key: {err}");
                }
                key
            }
        };

        Self {
            token,
            username,
            screen_key,
        }
    }

    /// Stores a freshly issued token, replacing any previous session state.
    pub fn establish(
        session: &Session,
        token: BearerToken,
        username: Option<String>,
    ) -> Result<Self, SessionInsertError> {
        session.renew();
        session.remove(LEGACY_TOKEN_KEY);
        session.insert(TOKEN_KEY, token.as_str())?;
        match &username {
            Some(name) => session.insert(USERNAME_KEY, name)?,
            None => {
                session.remove(USERNAME_KEY);
            }
        }
        let screen_key = Uuid::new_v4().to_string();
        session.insert(SCREEN_KEY, &screen_key)?;

        Ok(Self {
            token: Some(token),
            username,
            screen_key,
        })
    }

    /// Drops the whole session and returns the screen key it owned.
    pub fn clear(session: &Session) -> Option<String> {
        let screen_key = session.get::<String>(SCREEN_KEY).ok().flatten();
        session.purge();
        screen_key
    }

    pub fn token(&self) -> Option<&BearerToken> {
        self.token.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn screen_key(&self) -> &str {
        &self.screen_key
    }

    /// Display name and email; the stored username wins over token claims.
    pub fn untrusted_display_hint(&self) -> UntrustedDisplayHint {
        let decoded = self
            .token
            .as_ref()
            .and_then(decode_display_claims)
            .unwrap_or_default();
        UntrustedDisplayHint {
            name: self.username.clone().or(decoded.name),
            email: decoded.email,
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::load(&req.get_session())))
    }
}
