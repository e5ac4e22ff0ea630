//! Modal edit state of a list screen.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::forms::ValidationFailure;

/// `Closed`, or a modal showing a draft and an optional error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditState<D> {
    Closed,
    Open { draft: D, error: Option<String> },
}

impl<D> Default for EditState<D> {
    fn default() -> Self {
        EditState::Closed
    }
}

impl<D> EditState<D> {
    pub fn is_open(&self) -> bool {
        matches!(self, EditState::Open { .. })
    }

    pub fn draft(&self) -> Option<&D> {
        match self {
            EditState::Open { draft, .. } => Some(draft),
            EditState::Closed => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            EditState::Open { error, .. } => error.as_deref(),
            EditState::Closed => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    /// The id is not on the cached page.
    #[error("record {0} is not on the current page")]
    NotCached(String),

    #[error(transparent)]
    Invalid(#[from] ValidationFailure),

    #[error("failed to merge the update: {0}")]
    Merge(String),
}

/// Overlays the top-level fields of `payload` on `item`.
pub fn merge_payload<T, P>(item: &T, payload: &P) -> Result<T, EditError>
where
    T: Serialize + DeserializeOwned,
    P: Serialize,
{
    let merge_err = |err: serde_json::Error| EditError::Merge(err.to_string());

    let mut merged = serde_json::to_value(item).map_err(merge_err)?;
    let Value::Object(fields) = serde_json::to_value(payload).map_err(merge_err)? else {
        return Err(EditError::Merge("payload is not an object".to_string()));
    };
    let Value::Object(target) = &mut merged else {
        return Err(EditError::Merge("record is not an object".to_string()));
    };
    target.extend(fields);

    serde_json::from_value(merged).map_err(merge_err)
}
