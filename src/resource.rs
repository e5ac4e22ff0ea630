//! Resource descriptors: one per backend collection listed by the console.

use std::collections::BTreeSet;
use std::fmt::Debug;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::context::RiskContext;
use crate::domain::filter::{ContextFilters, FilterState, UserFilters};
use crate::domain::listing::ListItem;
use crate::domain::user::User;
use crate::forms::EditDraft;
use crate::forms::context::ContextDraft;
use crate::forms::user::UserDraft;

/// Backend collections known to the console.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ResourceKind {
    Users,
    RiskContexts,
}

impl ResourceKind {
    /// Path of the collection relative to the API base URL.
    pub const fn path(self) -> &'static str {
        match self {
            ResourceKind::Users => "/users",
            ResourceKind::RiskContexts => "/konteks",
        }
    }

    /// Plural label used in messages.
    pub const fn label(self) -> &'static str {
        match self {
            ResourceKind::Users => "users",
            ResourceKind::RiskContexts => "risk contexts",
        }
    }

    pub const fn singular(self) -> &'static str {
        match self {
            ResourceKind::Users => "user",
            ResourceKind::RiskContexts => "risk context",
        }
    }

    /// Tera template of the list screen.
    pub const fn template(self) -> &'static str {
        match self {
            ResourceKind::Users => "users/index.html",
            ResourceKind::RiskContexts => "contexts/index.html",
        }
    }

    /// Path prefix of the console screen.
    pub const fn screen_path(self) -> &'static str {
        match self {
            ResourceKind::Users => "/users",
            ResourceKind::RiskContexts => "/contexts",
        }
    }
}

/// Descriptor binding a record type to its filters and edit draft.
pub trait Resource: 'static {
    type Item: ListItem + Clone + Debug + Serialize + DeserializeOwned;
    type Filters: FilterState + Clone + Debug + Default + PartialEq + Serialize;
    type Draft: EditDraft<Item = Self::Item>;

    const KIND: ResourceKind;

    /// Dropdown options derived from a fetched page, sorted and distinct.
    fn options(items: &[Self::Item]) -> Vec<String>;
}

pub struct Users;

impl Resource for Users {
    type Item = User;
    type Filters = UserFilters;
    type Draft = UserDraft;

    const KIND: ResourceKind = ResourceKind::Users;

    fn options(items: &[User]) -> Vec<String> {
        items
            .iter()
            .flat_map(|user| user.roles.iter().cloned())
            .filter(|role| !role.trim().is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

pub struct RiskContexts;

impl Resource for RiskContexts {
    type Item = RiskContext;
    type Filters = ContextFilters;
    type Draft = ContextDraft;

    const KIND: ResourceKind = ResourceKind::RiskContexts;

    /// Years named as a period start or end.
    fn options(items: &[RiskContext]) -> Vec<String> {
        items
            .iter()
            .flat_map(|context| context.period_start.into_iter().chain(context.period_end))
            .collect::<BTreeSet<i32>>()
            .into_iter()
            .map(|year| year.to_string())
            .collect()
    }
}
