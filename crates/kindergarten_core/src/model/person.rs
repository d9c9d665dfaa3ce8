//! Staff and guardian records.
//!
//! Teachers and parents share the name/contact shape but live in separate
//! tables and are never interchangeable.

use crate::model::validation::{full_name, optional_email, require_text, ValidationError};
use crate::model::{ChildId, ParentId, TeacherId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Name and contact fields common to teachers and parents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub last_name: String,
    pub first_name: String,
    pub middle_name: Option<String>,
}

impl PersonName {
    pub fn new(last_name: impl Into<String>, first_name: impl Into<String>) -> Self {
        Self {
            last_name: last_name.into(),
            first_name: first_name.into(),
            middle_name: None,
        }
    }

    pub fn full_name(&self) -> String {
        full_name(&self.last_name, &self.first_name, self.middle_name.as_deref())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("last_name", &self.last_name)?;
        require_text("first_name", &self.first_name)
    }
}

/// Editable teacher fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherProfile {
    #[serde(flatten)]
    pub name: PersonName,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub education: Option<String>,
    /// Years of work experience.
    pub experience: Option<i64>,
}

impl TeacherProfile {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.name.validate()?;
        optional_email(self.email.as_deref())?;
        if let Some(value) = self.experience.filter(|value| *value < 0) {
            return Err(ValidationError::Negative {
                field: "experience",
                value,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub teacher_id: TeacherId,
    #[serde(flatten)]
    pub profile: TeacherProfile,
    pub created_at: i64,
}

/// Editable parent fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentProfile {
    #[serde(flatten)]
    pub name: PersonName,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl ParentProfile {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.name.validate()?;
        optional_email(self.email.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parent {
    pub parent_id: ParentId,
    #[serde(flatten)]
    pub profile: ParentProfile,
    pub created_at: i64,
}

/// One side of a parent/child link together with its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guardianship {
    pub parent_id: ParentId,
    pub child_id: ChildId,
    /// Free label such as "mother", "father", "guardian".
    pub relationship: String,
}

impl Guardianship {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("relationship", &self.relationship)
    }
}
