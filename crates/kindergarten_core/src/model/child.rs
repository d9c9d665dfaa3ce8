//! Child domain model.
//!
//! # Invariants
//! - `last_name`, `first_name` are non-empty.
//! - `enrollment_date` is not earlier than `birth_date`.
//! - `group_id = None` means the child is not assigned to any group.

use crate::model::validation::{full_name, optional_text, require_text, ValidationError};
use crate::model::{ChildId, GroupId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub fn as_code(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "M" | "MALE" => Ok(Self::Male),
            "F" | "FEMALE" => Ok(Self::Female),
            other => Err(format!("unknown gender `{other}`; expected M|F")),
        }
    }
}

/// Input for enrolling a new child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChild {
    pub last_name: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub group_id: Option<GroupId>,
    pub enrollment_date: NaiveDate,
    /// Picture/letter marking the child's locker.
    pub locker_symbol: Option<String>,
}

impl NewChild {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(
            &self.last_name,
            &self.first_name,
            self.birth_date,
            self.enrollment_date,
            self.locker_symbol.as_deref(),
        )
    }
}

/// Persisted child record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    pub child_id: ChildId,
    pub last_name: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub group_id: Option<GroupId>,
    pub enrollment_date: NaiveDate,
    pub locker_symbol: Option<String>,
    pub created_at: i64,
}

impl Child {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(
            &self.last_name,
            &self.first_name,
            self.birth_date,
            self.enrollment_date,
            self.locker_symbol.as_deref(),
        )
    }

    pub fn full_name(&self) -> String {
        full_name(&self.last_name, &self.first_name, self.middle_name.as_deref())
    }
}

fn validate_fields(
    last_name: &str,
    first_name: &str,
    birth_date: NaiveDate,
    enrollment_date: NaiveDate,
    locker_symbol: Option<&str>,
) -> Result<(), ValidationError> {
    require_text("last_name", last_name)?;
    require_text("first_name", first_name)?;
    optional_text("locker_symbol", locker_symbol)?;
    if enrollment_date < birth_date {
        return Err(ValidationError::DateOrder {
            earlier: "birth_date",
            later: "enrollment_date",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Gender, NewChild};
    use crate::model::validation::ValidationError;
    use chrono::NaiveDate;

    fn sample() -> NewChild {
        NewChild {
            last_name: "Smirnova".to_string(),
            first_name: "Alisa".to_string(),
            middle_name: None,
            birth_date: NaiveDate::from_ymd_opt(2020, 5, 1).unwrap(),
            gender: Gender::Female,
            group_id: None,
            enrollment_date: NaiveDate::from_ymd_opt(2023, 9, 1).unwrap(),
            locker_symbol: Some("sun".to_string()),
        }
    }

    #[test]
    fn enrollment_before_birth_is_rejected() {
        let mut child = sample();
        child.enrollment_date = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        assert!(matches!(
            child.validate(),
            Err(ValidationError::DateOrder { .. })
        ));
    }

    #[test]
    fn blank_locker_symbol_is_rejected() {
        let mut child = sample();
        child.locker_symbol = Some(" ".to_string());
        assert_eq!(
            child.validate(),
            Err(ValidationError::EmptyField("locker_symbol"))
        );
    }

    #[test]
    fn gender_parses_codes_and_words() {
        assert_eq!("m".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert!("x".parse::<Gender>().is_err());
    }
}
