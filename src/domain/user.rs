use serde::{Deserialize, Serialize};

use crate::domain::filter::{Attribute, Field, Filterable};
use crate::domain::listing::{ListItem, null_as_default};

/// Platform user as returned by `GET /users`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_active: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_verified: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Filterable for User {
    fn attribute(&self, field: Field) -> Attribute<'_> {
        match field {
            Field::Name => Attribute::Text(&self.name),
            Field::Username => Attribute::Text(&self.username),
            Field::Role => Attribute::Tags(&self.roles),
            Field::Active => Attribute::Flag(self.is_active),
            Field::Verified => Attribute::Flag(self.is_verified),
            _ => Attribute::Missing,
        }
    }
}

impl ListItem for User {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}
