//! Edit model of a risk context.

use serde::{Deserialize, Serialize};

use crate::domain::context::RiskContext;
use crate::domain::types::{
    ContextCode, ItemName, MatrixSize, RiskAppetiteLevel, TypeConstraintError,
};
use crate::forms::{EditDraft, ValidationFailure};

const DEFAULT_MATRIX_SIZE: i64 = 5;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// Form posted by the risk context modal.
pub struct EditContextForm {
    pub name: String,
    pub code: String,
    pub description: String,
    /// Raw year input; blank when the user cleared it.
    pub period_start: String,
    pub period_end: String,
    pub matrix_size: String,
    pub risk_appetite_level: String,
    pub risk_appetite_description: String,
    /// Checkbox value, present only when ticked.
    pub is_active: Option<String>,
}

/// Draft of a risk context edit.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ContextDraft {
    pub id: String,
    pub name: String,
    pub code: String,
    pub description: String,
    pub period_start: Option<i32>,
    pub period_end: Option<i32>,
    pub matrix_size: i64,
    pub risk_appetite_level: String,
    pub risk_appetite_description: String,
    pub is_active: bool,
}

/// Fields sent with `PATCH /konteks/{id}`.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContextPayload {
    pub name: ItemName,
    pub code: ContextCode,
    pub description: String,
    pub period_start: i32,
    pub period_end: i32,
    pub matrix_size: MatrixSize,
    pub risk_appetite_level: RiskAppetiteLevel,
    pub risk_appetite_description: String,
    pub is_active: bool,
}

impl EditContextForm {
    /// Builds the draft for the record `id` from the posted values.
    pub fn into_draft(self, id: &str) -> ContextDraft {
        ContextDraft {
            id: id.to_string(),
            name: self.name,
            code: self.code,
            description: self.description,
            period_start: self.period_start.trim().parse().ok(),
            period_end: self.period_end.trim().parse().ok(),
            // An unparsable size fails the matrix rule.
            matrix_size: self.matrix_size.trim().parse().unwrap_or_default(),
            risk_appetite_level: self.risk_appetite_level,
            risk_appetite_description: self.risk_appetite_description,
            is_active: self.is_active.is_some(),
        }
    }
}

impl EditDraft for ContextDraft {
    type Item = RiskContext;
    type Payload = ContextPayload;

    fn prefill(item: &RiskContext) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            code: item.code.clone(),
            description: item.description.clone().unwrap_or_default(),
            period_start: item.period_start,
            period_end: item.period_end,
            matrix_size: item.matrix_size.unwrap_or(DEFAULT_MATRIX_SIZE),
            risk_appetite_level: item
                .risk_appetite_level
                .clone()
                .unwrap_or_else(|| RiskAppetiteLevel::default().to_string()),
            risk_appetite_description: item.risk_appetite_description.clone().unwrap_or_default(),
            is_active: item.is_active,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<ContextPayload, ValidationFailure> {
        let name = ItemName::new(self.name.as_str()).map_err(|_| ValidationFailure::NameRequired)?;

        let code = ContextCode::new(self.code.as_str()).map_err(|err| match err {
            TypeConstraintError::EmptyString => ValidationFailure::CodeRequired,
            _ => ValidationFailure::CodeShape,
        })?;

        let (period_start, period_end) = match (self.period_start, self.period_end) {
            (Some(start), Some(end)) if start != 0 && end != 0 => (start, end),
            _ => return Err(ValidationFailure::PeriodRequired),
        };
        if period_start > period_end {
            return Err(ValidationFailure::PeriodOrder);
        }

        let matrix_size =
            MatrixSize::try_from(self.matrix_size).map_err(|_| ValidationFailure::MatrixSize)?;

        if self.risk_appetite_level.trim().is_empty() {
            return Err(ValidationFailure::RiskAppetiteRequired);
        }
        let risk_appetite_level = self
            .risk_appetite_level
            .parse::<RiskAppetiteLevel>()
            .map_err(|_| ValidationFailure::RiskAppetiteUnknown)?;

        Ok(ContextPayload {
            name,
            code,
            description: self.description.trim().to_string(),
            period_start,
            period_end,
            matrix_size,
            risk_appetite_level,
            risk_appetite_description: self.risk_appetite_description.trim().to_string(),
            is_active: self.is_active,
        })
    }
}
