//! Edit model of a platform user.

use serde::{Deserialize, Serialize};

use crate::domain::types::{ItemName, RoleName, UserEmail};
use crate::domain::user::User;
use crate::forms::{EditDraft, ValidationFailure};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// Form posted by the user modal. `roles` repeats once per ticked role.
pub struct EditUserForm {
    pub name: String,
    pub email: String,
    pub roles: Vec<String>,
    pub is_active: Option<String>,
}

/// Draft of a user edit.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct UserDraft {
    pub id: String,
    pub name: String,
    pub email: String,
    pub roles: Vec<String>,
    pub is_active: bool,
}

/// Fields sent with `PATCH /users/{id}`.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub name: ItemName,
    pub email: UserEmail,
    pub roles: Vec<RoleName>,
    pub is_active: bool,
}

impl EditUserForm {
    pub fn into_draft(self, id: &str) -> UserDraft {
        UserDraft {
            id: id.to_string(),
            name: self.name,
            email: self.email,
            roles: self.roles,
            is_active: self.is_active.is_some(),
        }
    }
}

impl EditDraft for UserDraft {
    type Item = User;
    type Payload = UserPayload;

    fn prefill(item: &User) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            email: item.email.clone(),
            roles: item.roles.clone(),
            is_active: item.is_active,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<UserPayload, ValidationFailure> {
        let name = ItemName::new(self.name.as_str()).map_err(|_| ValidationFailure::NameRequired)?;
        let email =
            UserEmail::new(self.email.as_str()).map_err(|_| ValidationFailure::EmailInvalid)?;

        let mut roles: Vec<RoleName> = self
            .roles
            .iter()
            .filter_map(|role| RoleName::new(role.as_str()).ok())
            .collect();
        roles.sort_unstable();
        roles.dedup();
        if roles.is_empty() {
            return Err(ValidationFailure::RoleRequired);
        }

        Ok(UserPayload {
            name,
            email,
            roles,
            is_active: self.is_active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> UserDraft {
        UserDraft {
            id: "u-1".into(),
            name: "Ana".into(),
            email: "Ana@Example.com".into(),
            roles: vec!["auditor".into(), "admin".into(), "admin".into()],
            is_active: true,
        }
    }

    #[test]
    fn payload_normalizes_email_and_roles() {
        let payload = draft().validate().unwrap();
        assert_eq!(payload.email.as_str(), "ana@example.com");
        let roles: Vec<_> = payload.roles.iter().map(|r| r.as_str()).collect();
        assert_eq!(roles, vec!["admin", "auditor"]);
    }

    #[test]
    fn name_is_checked_before_email() {
        let draft = UserDraft {
            name: String::new(),
            email: "broken".into(),
            ..draft()
        };
        assert_eq!(draft.validate(), Err(ValidationFailure::NameRequired));
    }

    #[test]
    fn email_and_roles_are_required() {
        let bad_email = UserDraft {
            email: "broken".into(),
            roles: Vec::new(),
            ..draft()
        };
        assert_eq!(bad_email.validate(), Err(ValidationFailure::EmailInvalid));

        let no_roles = UserDraft {
            roles: vec!["  ".into()],
            ..draft()
        };
        assert_eq!(no_roles.validate(), Err(ValidationFailure::RoleRequired));
    }

    #[cfg(feature = "server")]
    #[test]
    fn repeated_role_fields_deserialize_into_a_list() {
        let form: EditUserForm =
            serde_html_form::from_str("name=Ana&email=a%40b.io&roles=admin&roles=auditor")
                .unwrap();
        assert_eq!(form.roles, vec!["admin", "auditor"]);
        assert!(form.is_active.is_none());
    }
}
