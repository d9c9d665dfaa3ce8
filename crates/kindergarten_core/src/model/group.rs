//! Group domain model.

use crate::model::validation::{require_text, ValidationError};
use crate::model::{GroupId, TeacherId};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Age bracket a group is formed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeCategory {
    /// 1-3 years.
    Nursery,
    /// 3-4 years.
    Junior,
    /// 4-5 years.
    Middle,
    /// 5-6 years.
    Senior,
    /// 6-7 years, the year before school.
    Preparatory,
}

impl AgeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nursery => "nursery",
            Self::Junior => "junior",
            Self::Middle => "middle",
            Self::Senior => "senior",
            Self::Preparatory => "preparatory",
        }
    }

    /// Inclusive-exclusive age range in years.
    pub fn age_range(self) -> (u8, u8) {
        match self {
            Self::Nursery => (1, 3),
            Self::Junior => (3, 4),
            Self::Middle => (4, 5),
            Self::Senior => (5, 6),
            Self::Preparatory => (6, 7),
        }
    }
}

impl Display for AgeCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (from, to) = self.age_range();
        write!(f, "{} ({from}-{to})", self.as_str())
    }
}

impl FromStr for AgeCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "nursery" => Ok(Self::Nursery),
            "junior" => Ok(Self::Junior),
            "middle" => Ok(Self::Middle),
            "senior" => Ok(Self::Senior),
            "preparatory" => Ok(Self::Preparatory),
            other => Err(format!(
                "unknown age category `{other}`; expected nursery|junior|middle|senior|preparatory"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    pub group_name: String,
    pub age_category: AgeCategory,
    /// Primary teacher; also linked in the group/teacher join table.
    pub teacher_id: Option<TeacherId>,
}

impl NewGroup {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("group_name", &self.group_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub group_id: GroupId,
    pub group_name: String,
    pub age_category: AgeCategory,
    pub teacher_id: Option<TeacherId>,
    pub created_at: i64,
}

impl Group {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("group_name", &self.group_name)
    }
}
