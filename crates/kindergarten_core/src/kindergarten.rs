//! Connection-owning facade over every repository and service.
//!
//! # Responsibility
//! - Own the single SQLite connection for the process.
//! - Hand out repositories and services bound to that connection.
//!
//! # Invariants
//! - The connection is opened (and migrated) only through `open*`.
//! - Every accessor borrows the connection; nothing outlives the facade.

use crate::db::{open_db, open_db_in_memory, DbError, DbResult};
use crate::repo::attendance_repo::SqliteAttendanceRepository;
use crate::repo::child_repo::SqliteChildRepository;
use crate::repo::group_repo::SqliteGroupRepository;
use crate::repo::medical_repo::SqliteMedicalRepository;
use crate::repo::parent_repo::SqliteParentRepository;
use crate::repo::teacher_repo::SqliteTeacherRepository;
use crate::service::attendance_service::AttendanceService;
use crate::service::journal_service::JournalAggregator;
use crate::service::summary_service::SummaryService;
use log::info;
use rusqlite::Connection;
use std::path::Path;

pub type SqliteAttendanceService<'conn> =
    AttendanceService<SqliteAttendanceRepository<'conn>, SqliteChildRepository<'conn>>;
pub type SqliteJournalAggregator<'conn> =
    JournalAggregator<SqliteAttendanceRepository<'conn>, SqliteChildRepository<'conn>>;
pub type SqliteSummaryService<'conn> = SummaryService<
    SqliteAttendanceRepository<'conn>,
    SqliteChildRepository<'conn>,
    SqliteGroupRepository<'conn>,
    SqliteTeacherRepository<'conn>,
    SqliteParentRepository<'conn>,
>;

/// Kindergarten records store bound to one database.
pub struct Kindergarten {
    conn: Connection,
}

impl Kindergarten {
    /// Opens (creating when needed) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Closes the connection, surfacing errors `Drop` would swallow.
    pub fn close(self) -> DbResult<()> {
        self.conn
            .close()
            .map_err(|(_, err)| DbError::Sqlite(err))?;
        info!("event=db_close module=db status=ok");
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn children(&self) -> SqliteChildRepository<'_> {
        SqliteChildRepository::new(&self.conn)
    }

    pub fn groups(&self) -> SqliteGroupRepository<'_> {
        SqliteGroupRepository::new(&self.conn)
    }

    pub fn teachers(&self) -> SqliteTeacherRepository<'_> {
        SqliteTeacherRepository::new(&self.conn)
    }

    pub fn parents(&self) -> SqliteParentRepository<'_> {
        SqliteParentRepository::new(&self.conn)
    }

    pub fn medical(&self) -> SqliteMedicalRepository<'_> {
        SqliteMedicalRepository::new(&self.conn)
    }

    pub fn attendance_store(&self) -> SqliteAttendanceRepository<'_> {
        SqliteAttendanceRepository::new(&self.conn)
    }

    pub fn attendance(&self) -> SqliteAttendanceService<'_> {
        AttendanceService::new(self.attendance_store(), self.children())
    }

    pub fn journal(&self) -> SqliteJournalAggregator<'_> {
        JournalAggregator::new(self.attendance_store(), self.children())
    }

    pub fn summary(&self) -> SqliteSummaryService<'_> {
        SummaryService::new(
            self.attendance_store(),
            self.children(),
            self.groups(),
            self.teachers(),
            self.parents(),
        )
    }
}
