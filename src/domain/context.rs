use serde::{Deserialize, Serialize};

use crate::domain::filter::{Attribute, Field, Filterable};
use crate::domain::listing::{ListItem, null_as_default};

/// Number of child records attached to a risk context.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextCounts {
    #[serde(deserialize_with = "null_as_default")]
    pub risk_categories: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub risk_matrices: u64,
}

/// Risk context as returned by `GET /konteks`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskContext {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
    pub description: Option<String>,
    pub period_start: Option<i32>,
    pub period_end: Option<i32>,
    pub matrix_size: Option<i64>,
    pub risk_appetite_level: Option<String>,
    pub risk_appetite_description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    #[serde(rename = "_count", skip_serializing_if = "Option::is_none")]
    pub counts: Option<ContextCounts>,
}

impl RiskContext {
    /// Every year mentioned by the context period, used for the period dropdown.
    pub fn period_years(&self) -> impl Iterator<Item = i32> {
        self.period_start.into_iter().chain(self.period_end)
    }
}

impl Filterable for RiskContext {
    fn attribute(&self, field: Field) -> Attribute<'_> {
        match field {
            Field::Name => Attribute::Text(&self.name),
            Field::Code => Attribute::Text(&self.code),
            Field::RiskAppetiteLevel => self
                .risk_appetite_level
                .as_deref()
                .map_or(Attribute::Missing, Attribute::Text),
            Field::MatrixSize => self.matrix_size.map_or(Attribute::Missing, Attribute::Number),
            Field::Active => Attribute::Flag(self.is_active),
            Field::Period => match (self.period_start, self.period_end) {
                (Some(start), Some(end)) => Attribute::Span(start, end),
                _ => Attribute::Missing,
            },
            _ => Attribute::Missing,
        }
    }
}

impl ListItem for RiskContext {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::ListResponse;

    #[test]
    fn deserializes_backend_shape() {
        let body = r#"{
            "id": "ctx-1",
            "name": "Operational",
            "code": "OPS_2025",
            "periodStart": 2024,
            "periodEnd": 2026,
            "matrixSize": 5,
            "riskAppetiteLevel": "HIGH",
            "isActive": true,
            "_count": {"riskCategories": 3, "riskMatrices": 1}
        }"#;
        let context: RiskContext = serde_json::from_str(body).unwrap();
        assert_eq!(context.period_years().collect::<Vec<_>>(), vec![2024, 2026]);
        assert_eq!(context.counts.as_ref().unwrap().risk_categories, 3);
        assert!(matches!(
            context.attribute(Field::Period),
            Attribute::Span(2024, 2026)
        ));
    }

    #[test]
    fn null_fields_read_as_defaults() {
        let body = r#"{
            "message": "ok",
            "data": [
                {"id": "ctx-1", "name": null, "code": null, "isActive": null,
                 "periodStart": null, "_count": {"riskCategories": null, "riskMatrices": 2}},
                {"id": "ctx-2", "name": "Strategic", "code": "STRAT", "isActive": true}
            ]
        }"#;
        let page: ListResponse<RiskContext> = serde_json::from_str(body).unwrap();
        assert_eq!(page.data.len(), 2);
        let first = &page.data[0];
        assert_eq!(first.name, "");
        assert_eq!(first.code, "");
        assert!(!first.is_active);
        assert_eq!(first.period_start, None);
        assert_eq!(
            first.counts,
            Some(ContextCounts {
                risk_categories: 0,
                risk_matrices: 2,
            })
        );
        assert!(page.data[1].is_active);
    }

    #[test]
    fn missing_period_is_not_a_span() {
        let context = RiskContext {
            period_start: Some(2024),
            ..RiskContext::default()
        };
        assert!(matches!(context.attribute(Field::Period), Attribute::Missing));
    }
}
