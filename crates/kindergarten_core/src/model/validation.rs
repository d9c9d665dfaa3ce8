//! Field validation shared by model write paths.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Validation failure raised before any SQL mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required text field is empty after trimming.
    EmptyField(&'static str),
    /// Email does not look like `name@domain.tld`.
    InvalidEmail(String),
    /// Numeric measurement must be strictly positive.
    NonPositive { field: &'static str, value: f64 },
    /// Integer field must not be negative.
    Negative { field: &'static str, value: i64 },
    /// A date precedes the date it must follow.
    DateOrder {
        earlier: &'static str,
        later: &'static str,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "`{field}` must not be empty"),
            Self::InvalidEmail(value) => write!(f, "invalid email address `{value}`"),
            Self::NonPositive { field, value } => {
                write!(f, "`{field}` must be positive, got {value}")
            }
            Self::Negative { field, value } => {
                write!(f, "`{field}` must not be negative, got {value}")
            }
            Self::DateOrder { earlier, later } => {
                write!(f, "`{later}` must not be earlier than `{earlier}`")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

pub(crate) fn optional_text(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(value) => require_text(field, value),
        None => Ok(()),
    }
}

pub(crate) fn optional_email(value: Option<&str>) -> Result<(), ValidationError> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() && !EMAIL_RE.is_match(value) => {
            Err(ValidationError::InvalidEmail(value.to_string()))
        }
        _ => Ok(()),
    }
}

pub(crate) fn optional_positive(
    field: &'static str,
    value: Option<f64>,
) -> Result<(), ValidationError> {
    match value {
        Some(value) if value <= 0.0 || value.is_nan() => {
            Err(ValidationError::NonPositive { field, value })
        }
        _ => Ok(()),
    }
}

/// Joins name parts as `last first [middle]`.
pub(crate) fn full_name(last: &str, first: &str, middle: Option<&str>) -> String {
    match middle.map(str::trim).filter(|value| !value.is_empty()) {
        Some(middle) => format!("{last} {first} {middle}"),
        None => format!("{last} {first}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{full_name, optional_email, optional_positive, require_text, ValidationError};

    #[test]
    fn require_text_rejects_blank_values() {
        assert_eq!(
            require_text("last_name", "   "),
            Err(ValidationError::EmptyField("last_name"))
        );
        assert!(require_text("last_name", "Ivanova").is_ok());
    }

    #[test]
    fn email_check_ignores_missing_and_blank() {
        assert!(optional_email(None).is_ok());
        assert!(optional_email(Some("")).is_ok());
        assert!(optional_email(Some("mom@example.org")).is_ok());
        assert!(matches!(
            optional_email(Some("not-an-email")),
            Err(ValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn measurements_must_be_positive() {
        assert!(optional_positive("height", Some(101.5)).is_ok());
        assert!(optional_positive("height", None).is_ok());
        assert!(optional_positive("weight", Some(0.0)).is_err());
    }

    #[test]
    fn full_name_skips_blank_middle_name() {
        assert_eq!(full_name("Petrov", "Ivan", Some(" ")), "Petrov Ivan");
        assert_eq!(
            full_name("Petrov", "Ivan", Some("Sergeevich")),
            "Petrov Ivan Sergeevich"
        );
    }
}
