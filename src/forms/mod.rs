//! Form definitions and edit drafts backing the console routes.

use std::fmt::Debug;

use serde::Serialize;
use thiserror::Error;

pub mod context;
pub mod login;
pub mod user;

/// First failing rule of an edit draft. The message is shown in the modal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("Name is required.")]
    NameRequired,

    #[error("Code is required.")]
    CodeRequired,

    #[error("Code may only contain uppercase letters, digits and underscores, e.g. RISK_2026.")]
    CodeShape,

    #[error("Period start and end are required.")]
    PeriodRequired,

    #[error("Period start must not be later than period end.")]
    PeriodOrder,

    #[error("Matrix size must be 4 or 5.")]
    MatrixSize,

    #[error("Risk appetite level is required.")]
    RiskAppetiteRequired,

    #[error("Risk appetite level must be LOW, MEDIUM or HIGH.")]
    RiskAppetiteUnknown,

    #[error("A valid email address is required.")]
    EmailInvalid,

    #[error("Select at least one role.")]
    RoleRequired,
}

/// Editable copy of a listed record, alive while its modal is open.
pub trait EditDraft: Clone + Debug + Serialize {
    type Item;
    /// Body of the partial-update request.
    type Payload: Clone + Debug + Serialize;

    /// Copies the editable fields of `item`, filling defaults for gaps.
    fn prefill(item: &Self::Item) -> Self;

    fn id(&self) -> &str;

    /// Applies the rules in order and returns the payload, or the first failure.
    fn validate(&self) -> Result<Self::Payload, ValidationFailure>;
}
