//! Attendance domain model.
//!
//! # Responsibility
//! - Define the per-day attendance status and its toggle cycle.
//! - Define the persisted attendance row shape.
//!
//! # Invariants
//! - At most one `AttendanceRecord` exists per `(child_id, date)`.
//! - A missing record means `AttendanceStatus::Present`; that default is
//!   never written to storage implicitly.
//! - Toggle order is fixed: Present -> Absent -> Sick -> Present.

use crate::model::{ChildId, RecordId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Attendance state of one child on one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Child attended. Also the implicit state when no record exists.
    #[default]
    Present,
    /// Child did not attend.
    Absent,
    /// Child did not attend because of illness.
    Sick,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 3] = [Self::Present, Self::Absent, Self::Sick];

    /// Returns the state a journal cell moves to when toggled.
    pub fn next(self) -> Self {
        match self {
            Self::Present => Self::Absent,
            Self::Absent => Self::Sick,
            Self::Sick => Self::Present,
        }
    }

    /// Stable storage/CLI code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Sick => "sick",
        }
    }

    /// One-letter mark used by the journal grid.
    pub fn mark(self) -> char {
        match self {
            Self::Present => '+',
            Self::Absent => '-',
            Self::Sick => 'S',
        }
    }
}

impl Display for AttendanceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            "sick" => Ok(Self::Sick),
            other => Err(format!(
                "unknown attendance status `{other}`; expected present|absent|sick"
            )),
        }
    }
}

/// Persisted attendance row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub record_id: RecordId,
    pub child_id: ChildId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    /// Free text; `None` when the caller gave no notes.
    pub notes: Option<String>,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds, bumped on every upsert.
    pub updated_at: i64,
}

/// Applies the absent-row default at the read boundary.
pub fn resolve_status(record: Option<&AttendanceRecord>) -> AttendanceStatus {
    record.map_or(AttendanceStatus::default(), |record| record.status)
}

#[cfg(test)]
mod tests {
    use super::{resolve_status, AttendanceStatus};

    #[test]
    fn toggle_cycles_in_fixed_order() {
        assert_eq!(AttendanceStatus::Present.next(), AttendanceStatus::Absent);
        assert_eq!(AttendanceStatus::Absent.next(), AttendanceStatus::Sick);
        assert_eq!(AttendanceStatus::Sick.next(), AttendanceStatus::Present);
    }

    #[test]
    fn three_toggles_return_to_start() {
        for status in AttendanceStatus::ALL {
            assert_eq!(status.next().next().next(), status);
        }
    }

    #[test]
    fn missing_record_resolves_to_present() {
        assert_eq!(resolve_status(None), AttendanceStatus::Present);
    }

    #[test]
    fn parse_accepts_mixed_case() {
        assert_eq!(
            " Sick ".parse::<AttendanceStatus>().unwrap(),
            AttendanceStatus::Sick
        );
        assert!("late".parse::<AttendanceStatus>().is_err());
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&AttendanceStatus::Absent).unwrap();
        assert_eq!(json, "\"absent\"");
    }
}
