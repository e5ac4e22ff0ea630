use serde_json::Value;
use thiserror::Error;

/// Failures of a backend call, classified for display.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No token in the session; the request was never sent.
    #[error("access token is missing")]
    MissingCredential,

    /// Backend answered 401.
    #[error("access token is missing or invalid")]
    Unauthenticated,

    /// Any other status, or a transport failure when `status` is `None`.
    #[error("request failed with status {status:?}")]
    FetchFailed { status: Option<u16> },

    #[error("unreadable response: {0}")]
    Decode(String),

    /// Partial update refused; `message` comes from the response body.
    #[error("update rejected with status {status:?}")]
    UpdateRejected {
        status: Option<u16>,
        message: Option<String>,
    },

    #[error("client error: {0}")]
    Client(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Message shown to the user. `resource` is the plural label of the
    /// listed records, `record` the singular one.
    pub fn user_message(&self, resource: &str, record: &str) -> String {
        match self {
            ApiError::MissingCredential => "Access token not found. Please log in again.".to_string(),
            ApiError::Unauthenticated => {
                "HTTP 401: access token is missing or invalid. Please log in again.".to_string()
            }
            ApiError::FetchFailed { status } => {
                let status = status.map_or_else(|| "unknown".to_string(), |s| s.to_string());
                format!("Failed to fetch {resource} from the API (HTTP {status}).")
            }
            ApiError::Decode(_) => {
                format!("Failed to fetch {resource} from the API (invalid response).")
            }
            ApiError::UpdateRejected { message, .. } => message
                .clone()
                .unwrap_or_else(|| format!("Failed to update {record}. Please try again.")),
            ApiError::Client(_) => format!("Failed to reach the API for {resource}."),
        }
    }
}

/// Extracts a display message from an error body: `errors`, then `message`,
/// then `error.message` or a plain `error` string.
pub fn message_from_body(body: &Value) -> Option<String> {
    let text = |value: &Value| -> Option<String> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Array(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.clone()),
                        Value::Object(_) => item.get("message").and_then(Value::as_str).map(str::to_string),
                        _ => None,
                    })
                    .collect();
                if parts.is_empty() { None } else { Some(parts.join(" ")) }
            }
            _ => None,
        }
    };

    body.get("errors")
        .and_then(text)
        .or_else(|| body.get("message").and_then(text))
        .or_else(|| {
            let error = body.get("error")?;
            error.get("message").and_then(text).or_else(|| text(error))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unauthenticated_message_mentions_token() {
        let message = ApiError::Unauthenticated.user_message("users", "user");
        assert!(message.contains("401"));
        assert!(message.contains("token is missing or invalid"));
    }

    #[test]
    fn fetch_failure_carries_status_when_known() {
        let known = ApiError::FetchFailed { status: Some(503) };
        assert_eq!(
            known.user_message("risk contexts", "risk context"),
            "Failed to fetch risk contexts from the API (HTTP 503)."
        );
        let unknown = ApiError::FetchFailed { status: None };
        assert!(unknown.user_message("users", "user").contains("HTTP unknown"));
    }

    #[test]
    fn update_rejection_prefers_server_message() {
        let rejected = ApiError::UpdateRejected {
            status: Some(409),
            message: Some("Code already used".into()),
        };
        assert_eq!(rejected.user_message("users", "user"), "Code already used");
        let silent = ApiError::UpdateRejected {
            status: None,
            message: None,
        };
        assert_eq!(
            silent.user_message("risk contexts", "risk context"),
            "Failed to update risk context. Please try again."
        );
    }

    #[test]
    fn body_message_lookup_order() {
        assert_eq!(
            message_from_body(&json!({"errors": ["code taken"], "message": "Bad Request"})),
            Some("code taken".to_string())
        );
        assert_eq!(
            message_from_body(&json!({"message": "Bad Request"})),
            Some("Bad Request".to_string())
        );
        assert_eq!(
            message_from_body(&json!({"error": {"message": "period overlaps"}})),
            Some("period overlaps".to_string())
        );
        assert_eq!(message_from_body(&json!({"error": "nope"})), Some("nope".to_string()));
        assert_eq!(message_from_body(&json!({"status": 500})), None);
    }
}
