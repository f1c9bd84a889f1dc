//! Validation failures raised by entity constructors and attribute inputs.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required attribute was not supplied.
    MissingField {
        entity: &'static str,
        field: &'static str,
    },
    /// A text attribute was empty or whitespace only.
    EmptyField {
        entity: &'static str,
        field: &'static str,
    },
    /// Identifiers are assigned by SQLite and are always positive.
    NonPositiveId {
        entity: &'static str,
        field: &'static str,
        value: i64,
    },
    /// An update carried no recognised attribute.
    NoChanges { entity: &'static str },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { entity, field } => {
                write!(f, "{entity}.{field} is required")
            }
            Self::EmptyField { entity, field } => {
                write!(f, "{entity}.{field} must not be empty")
            }
            Self::NonPositiveId {
                entity,
                field,
                value,
            } => write!(f, "{entity}.{field} must be positive, got {value}"),
            Self::NoChanges { entity } => write!(f, "{entity} update carries no attributes"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_id(
    entity: &'static str,
    field: &'static str,
    value: i64,
) -> Result<i64, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NonPositiveId {
            entity,
            field,
            value,
        });
    }
    Ok(value)
}

pub(crate) fn require_text(
    entity: &'static str,
    field: &'static str,
    value: String,
) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { entity, field });
    }
    Ok(value)
}

pub(crate) fn require_present<T>(
    entity: &'static str,
    field: &'static str,
    value: Option<T>,
) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField { entity, field })
}
