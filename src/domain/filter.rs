//! Predicate sets shared by server-side query building and client-side
//! narrowing of a fetched page.
//!
//! A filter state (one per resource) turns the current UI selections into a
//! [`PredicateSet`]. The same set is either rendered into query parameters or
//! evaluated against each item, so both paths always agree on the meaning of
//! a filter.

use serde::{Deserialize, Serialize};

/// Sentinel selection meaning "apply no constraint".
pub const ALL: &str = "ALL";

/// Filterable attribute of a listed record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Username,
    Code,
    Role,
    RiskAppetiteLevel,
    MatrixSize,
    Active,
    Verified,
    Period,
}

impl Field {
    /// Query-parameter name understood by the backend.
    pub const fn param(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Username => "username",
            Field::Code => "code",
            Field::Role => "role",
            Field::RiskAppetiteLevel => "riskAppetiteLevel",
            Field::MatrixSize => "matrixSize",
            Field::Active => "isActive",
            Field::Verified => "isVerified",
            Field::Period => "period",
        }
    }
}

/// Value of a record attribute as seen by a predicate.
#[derive(Debug, Clone, Copy)]
pub enum Attribute<'a> {
    Text(&'a str),
    Tags(&'a [String]),
    Number(i64),
    Flag(bool),
    Span(i32, i32),
    Missing,
}

/// Records that expose their attributes to predicates.
pub trait Filterable {
    fn attribute(&self, field: Field) -> Attribute<'_>;
}

/// Test applied to a single attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Condition {
    /// Case-insensitive substring.
    Contains(String),
    /// Exact match on text or number, membership on tag lists.
    Equals(String),
    /// Boolean flag equality.
    Is(bool),
    /// `start <= year <= end` on a period span.
    Covers(i32),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Predicate {
    pub field: Field,
    pub condition: Condition,
}

impl Predicate {
    pub fn contains(field: Field, needle: &str) -> Self {
        Self {
            field,
            condition: Condition::Contains(needle.to_string()),
        }
    }

    pub fn equals(field: Field, value: impl Into<String>) -> Self {
        Self {
            field,
            condition: Condition::Equals(value.into()),
        }
    }

    pub fn is(field: Field, flag: bool) -> Self {
        Self {
            field,
            condition: Condition::Is(flag),
        }
    }

    pub fn covers(field: Field, year: i32) -> Self {
        Self {
            field,
            condition: Condition::Covers(year),
        }
    }

    /// Value sent as the query parameter for this predicate.
    pub fn query_value(&self) -> String {
        match &self.condition {
            Condition::Contains(needle) => needle.clone(),
            Condition::Equals(value) => value.clone(),
            Condition::Is(flag) => flag.to_string(),
            Condition::Covers(year) => year.to_string(),
        }
    }

    /// Evaluates the predicate against one attribute value.
    pub fn holds(&self, attribute: Attribute<'_>) -> bool {
        match (&self.condition, attribute) {
            (Condition::Contains(needle), Attribute::Text(text)) => {
                text.to_lowercase().contains(&needle.to_lowercase())
            }
            (Condition::Equals(value), Attribute::Text(text)) => text == value,
            (Condition::Equals(value), Attribute::Number(number)) => number.to_string() == *value,
            (Condition::Equals(value), Attribute::Tags(tags)) => tags.iter().any(|t| t == value),
            (Condition::Is(flag), Attribute::Flag(actual)) => actual == *flag,
            // An absent flag reads as `false`.
            (Condition::Is(flag), Attribute::Missing) => !*flag,
            (Condition::Covers(year), Attribute::Span(start, end)) => start <= *year && *year <= end,
            _ => false,
        }
    }
}

/// Conjunction of predicates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PredicateSet(Vec<Predicate>);

impl PredicateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, predicate: Predicate) {
        self.0.push(predicate);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Predicate> {
        self.0.iter()
    }

    /// Returns a copy of the set with every predicate on `field` removed.
    pub fn without(&self, field: Field) -> Self {
        Self(self.0.iter().filter(|p| p.field != field).cloned().collect())
    }

    /// `true` when every predicate holds for the item.
    pub fn matches<T: Filterable + ?Sized>(&self, item: &T) -> bool {
        self.0.iter().all(|p| p.holds(item.attribute(p.field)))
    }

    /// Narrows a page to the items matching every predicate.
    pub fn apply<T: Filterable + Clone>(&self, items: &[T]) -> Vec<T> {
        if self.is_empty() {
            return items.to_vec();
        }
        items.iter().filter(|item| self.matches(*item)).cloned().collect()
    }

    /// `(name, value)` pairs in predicate order.
    pub fn query_params(&self) -> impl Iterator<Item = (&'static str, String)> + '_ {
        self.0.iter().map(|p| (p.field.param(), p.query_value()))
    }
}

impl FromIterator<Predicate> for PredicateSet {
    fn from_iter<I: IntoIterator<Item = Predicate>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// UI selections of a listing screen.
pub trait FilterState {
    /// Active predicates for the current selections.
    fn predicates(&self) -> PredicateSet;
}

/// Returns the trimmed selection, or `None` for empty input and the sentinel.
pub fn selection(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == ALL {
        None
    } else {
        Some(trimmed)
    }
}

/// Returns the trimmed search text, or `None` when it is blank.
pub fn search_text(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn all() -> String {
    ALL.to_string()
}

/// Tri-state selection for the `isActive` flag.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl ActivityFilter {
    pub fn predicate(self) -> Option<Predicate> {
        match self {
            ActivityFilter::All => None,
            ActivityFilter::Active => Some(Predicate::is(Field::Active, true)),
            ActivityFilter::Inactive => Some(Predicate::is(Field::Active, false)),
        }
    }
}

/// Tri-state selection for the `isVerified` flag.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerificationFilter {
    #[default]
    All,
    Verified,
    Unverified,
}

impl VerificationFilter {
    pub fn predicate(self) -> Option<Predicate> {
        match self {
            VerificationFilter::All => None,
            VerificationFilter::Verified => Some(Predicate::is(Field::Verified, true)),
            VerificationFilter::Unverified => Some(Predicate::is(Field::Verified, false)),
        }
    }
}

/// Filters of the users screen.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UserFilters {
    pub name: String,
    pub username: String,
    pub role: String,
    pub active: ActivityFilter,
    pub verified: VerificationFilter,
}

impl Default for UserFilters {
    fn default() -> Self {
        Self {
            name: String::new(),
            username: String::new(),
            role: all(),
            active: ActivityFilter::All,
            verified: VerificationFilter::All,
        }
    }
}

impl FilterState for UserFilters {
    fn predicates(&self) -> PredicateSet {
        let mut set = PredicateSet::new();
        if let Some(name) = search_text(&self.name) {
            set.push(Predicate::contains(Field::Name, name));
        }
        if let Some(username) = search_text(&self.username) {
            set.push(Predicate::contains(Field::Username, username));
        }
        if let Some(role) = selection(&self.role) {
            set.push(Predicate::equals(Field::Role, role));
        }
        set.extend(self.active.predicate());
        set.extend(self.verified.predicate());
        set
    }
}

/// Filters of the risk contexts screen.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContextFilters {
    pub name: String,
    pub code: String,
    pub period: String,
    pub risk_appetite: String,
    pub matrix_size: String,
    pub active: ActivityFilter,
}

impl Default for ContextFilters {
    fn default() -> Self {
        Self {
            name: String::new(),
            code: String::new(),
            period: all(),
            risk_appetite: all(),
            matrix_size: all(),
            active: ActivityFilter::All,
        }
    }
}

impl FilterState for ContextFilters {
    fn predicates(&self) -> PredicateSet {
        let mut set = PredicateSet::new();
        if let Some(name) = search_text(&self.name) {
            set.push(Predicate::contains(Field::Name, name));
        }
        if let Some(code) = search_text(&self.code) {
            set.push(Predicate::contains(Field::Code, code));
        }
        if let Some(level) = selection(&self.risk_appetite) {
            set.push(Predicate::equals(Field::RiskAppetiteLevel, level));
        }
        if let Some(size) = selection(&self.matrix_size) {
            set.push(Predicate::equals(Field::MatrixSize, size));
        }
        set.extend(self.active.predicate());
        // A year that does not parse constrains nothing.
        if let Some(year) = selection(&self.period).and_then(|y| y.parse::<i32>().ok()) {
            set.push(Predicate::covers(Field::Period, year));
        }
        set
    }
}

impl Extend<Predicate> for PredicateSet {
    fn extend<I: IntoIterator<Item = Predicate>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}
