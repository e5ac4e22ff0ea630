//! Strongly-typed value objects used by domain entities and edit payloads.
//!
//! These wrappers enforce basic invariants (non-empty identifiers, normalized
//! email, shaped codes) so that once a value reaches an update payload it can
//! be sent to the backend as-is.
use std::fmt::{Display, Formatter};
use std::{ops::Deref, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Code contains characters outside `A-Z`, `0-9` and `_`.
    #[error("invalid code: {0}")]
    InvalidCode(String),
    /// Matrix size is not one of the supported dimensions.
    #[error("unsupported matrix size: {0}")]
    InvalidMatrixSize(i64),
    /// Risk appetite level is not one of LOW, MEDIUM or HIGH.
    #[error("unknown risk appetite level: {0}")]
    InvalidRiskAppetite(String),
}

/// Normalizes and validates an email string.
fn normalize_email<S: Into<String>>(email: S) -> Result<String, TypeConstraintError> {
    let normalized = email.into().trim().to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let trimmed = value.into().trim().to_string();
                if trimmed.is_empty() {
                    return Err(TypeConstraintError::EmptyString);
                }
                Ok(Self(trimmed))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(ResourceId, "Backend identifier of a listed record.");
non_empty_string_newtype!(ItemName, "Display name of a user or risk context.");
non_empty_string_newtype!(RoleName, "Name of a platform role.");

/// Lower-cased and validated email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct UserEmail(String);

impl UserEmail {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_email(email)?;
        Ok(Self(normalized))
    }

    /// Borrow the email as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserEmail {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Risk context code made of uppercase letters, digits and underscores.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ContextCode(String);

impl ContextCode {
    /// Trims the input and checks it against `^[A-Z0-9_]+$`.
    pub fn new<S: Into<String>>(code: S) -> Result<Self, TypeConstraintError> {
        let trimmed = code.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        let shaped = trimmed
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
        if !shaped {
            return Err(TypeConstraintError::InvalidCode(trimmed));
        }
        Ok(Self(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ContextCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Supported risk matrix dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum MatrixSize {
    Four,
    #[default]
    Five,
}

impl MatrixSize {
    /// Matrix edge length as sent to the backend.
    pub const fn get(self) -> i64 {
        match self {
            MatrixSize::Four => 4,
            MatrixSize::Five => 5,
        }
    }
}

impl TryFrom<i64> for MatrixSize {
    type Error = TypeConstraintError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(MatrixSize::Four),
            5 => Ok(MatrixSize::Five),
            other => Err(TypeConstraintError::InvalidMatrixSize(other)),
        }
    }
}

impl Serialize for MatrixSize {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.get())
    }
}

/// Risk appetite classification of a context.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskAppetiteLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskAppetiteLevel {
    /// Options offered in the filter dropdown, highest first.
    pub const ALL: [RiskAppetiteLevel; 3] = [
        RiskAppetiteLevel::High,
        RiskAppetiteLevel::Medium,
        RiskAppetiteLevel::Low,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            RiskAppetiteLevel::Low => "LOW",
            RiskAppetiteLevel::Medium => "MEDIUM",
            RiskAppetiteLevel::High => "HIGH",
        }
    }
}

impl Display for RiskAppetiteLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskAppetiteLevel {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "LOW" => Ok(RiskAppetiteLevel::Low),
            "MEDIUM" => Ok(RiskAppetiteLevel::Medium),
            "HIGH" => Ok(RiskAppetiteLevel::High),
            other => Err(TypeConstraintError::InvalidRiskAppetite(other.to_string())),
        }
    }
}
