//! Core records engine for the kindergarten registry.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod kindergarten;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError};
pub use kindergarten::Kindergarten;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::attendance::{resolve_status, AttendanceRecord, AttendanceStatus};
pub use model::child::{Child, Gender, NewChild};
pub use model::group::{AgeCategory, Group, NewGroup};
pub use model::medical::{MedicalCard, MedicalRecord};
pub use model::person::{Guardianship, Parent, ParentProfile, PersonName, Teacher, TeacherProfile};
pub use model::validation::ValidationError;
pub use model::{ChildId, GroupId, ParentId, RecordId, TeacherId};
pub use repo::attendance_repo::{AttendanceStore, SqliteAttendanceRepository};
pub use repo::child_repo::{ChildListQuery, ChildRepository, GroupFilter, SqliteChildRepository};
pub use repo::error::{RepoError, RepoResult};
pub use repo::group_repo::{GroupRepository, SqliteGroupRepository};
pub use repo::medical_repo::{MedicalRepository, SqliteMedicalRepository};
pub use repo::parent_repo::{LinkedChild, LinkedParent, ParentRepository, SqliteParentRepository};
pub use repo::teacher_repo::{SqliteTeacherRepository, TeacherRepository};
pub use service::attendance_service::{AttendanceService, DailyAttendanceRow};
pub use service::journal_service::{
    JournalAggregator, JournalError, JournalRow, MonthlyJournal, StatusTally,
};
pub use service::summary_service::{KindergartenSummary, SummaryService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
