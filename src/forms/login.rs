use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
/// Token handed over by the identity service, either pasted into the login
/// form or passed to the callback URL.
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub token: String,
    /// Optional display name stored next to the token.
    #[serde(default)]
    pub username: Option<String>,
}

impl LoginForm {
    /// Trimmed token and username, with blank usernames dropped.
    pub fn normalized(self) -> (String, Option<String>) {
        let username = self
            .username
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        (self.token.trim().to_string(), username)
    }
}
