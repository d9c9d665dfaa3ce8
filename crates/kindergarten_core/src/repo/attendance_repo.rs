//! Attendance ledger contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist exactly one status row per `(child_id, date)`.
//! - Serve the per-day reads used by the daily sheet and monthly journal.
//!
//! # Invariants
//! - Writes go through `upsert_record`; there is no plain insert path, so the
//!   composite unique index is never violated by callers.
//! - Reads return `None` for a missing row. Mapping that to `Present` is the
//!   caller's job (`model::attendance::resolve_status`).
//! - Last writer wins; no concurrency control beyond SQLite transactions.

use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::ChildId;
use crate::repo::codec::{clean_text, date_to_db, get_date, row_exists, NOW_MS_SQL};
use crate::repo::error::{RepoError, RepoResult};
use chrono::NaiveDate;
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const ATTENDANCE_SELECT_SQL: &str = "SELECT
    record_id,
    child_id,
    date,
    status,
    notes,
    created_at,
    updated_at
FROM attendance_records";

/// Storage contract for the attendance ledger.
pub trait AttendanceStore {
    /// Inserts or overwrites the status row for `(child_id, date)`.
    ///
    /// Returns the row as stored after the write.
    fn upsert_record(
        &self,
        child_id: ChildId,
        date: NaiveDate,
        status: AttendanceStatus,
        notes: Option<&str>,
    ) -> RepoResult<AttendanceRecord>;

    /// Gets the row for `(child_id, date)` if one was ever written.
    fn get_record(&self, child_id: ChildId, date: NaiveDate)
        -> RepoResult<Option<AttendanceRecord>>;

    /// Gets every stored row for the given children on one day.
    fn list_for_children_on_date(
        &self,
        child_ids: &[ChildId],
        date: NaiveDate,
    ) -> RepoResult<Vec<AttendanceRecord>>;

    /// Gets one child's rows in the inclusive `[from, to]` range, oldest first.
    fn list_for_child(
        &self,
        child_id: ChildId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepoResult<Vec<AttendanceRecord>>;
}

/// SQLite-backed attendance ledger.
pub struct SqliteAttendanceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAttendanceRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AttendanceStore for SqliteAttendanceRepository<'_> {
    fn upsert_record(
        &self,
        child_id: ChildId,
        date: NaiveDate,
        status: AttendanceStatus,
        notes: Option<&str>,
    ) -> RepoResult<AttendanceRecord> {
        if !row_exists(self.conn, "children", "child_id", child_id)? {
            return Err(RepoError::NotFound {
                entity: "child",
                id: child_id,
            });
        }

        self.conn.execute(
            &format!(
                "INSERT INTO attendance_records (child_id, date, status, notes)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (child_id, date) DO UPDATE SET
                    status = excluded.status,
                    notes = excluded.notes,
                    updated_at = {NOW_MS_SQL};"
            ),
            params![child_id, date_to_db(date), status.as_str(), clean_text(notes)],
        )?;
        debug!(
            "event=attendance_upsert module=attendance status=ok child_id={} date={} value={}",
            child_id, date, status
        );

        self.get_record(child_id, date)?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "attendance row for child {child_id} on {date} missing after upsert"
            ))
        })
    }

    fn get_record(
        &self,
        child_id: ChildId,
        date: NaiveDate,
    ) -> RepoResult<Option<AttendanceRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ATTENDANCE_SELECT_SQL}
             WHERE child_id = ?1
               AND date = ?2;"
        ))?;

        let mut rows = stmt.query(params![child_id, date_to_db(date)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_attendance_row(row)?));
        }

        Ok(None)
    }

    fn list_for_children_on_date(
        &self,
        child_ids: &[ChildId],
        date: NaiveDate,
    ) -> RepoResult<Vec<AttendanceRecord>> {
        if child_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; child_ids.len()].join(", ");
        let sql = format!(
            "{ATTENDANCE_SELECT_SQL}
             WHERE date = ?
               AND child_id IN ({placeholders})
             ORDER BY child_id ASC;"
        );
        let mut bind_values: Vec<Value> = Vec::with_capacity(child_ids.len() + 1);
        bind_values.push(Value::Text(date_to_db(date)));
        bind_values.extend(child_ids.iter().map(|id| Value::Integer(*id)));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_attendance_row(row)?);
        }

        Ok(records)
    }

    fn list_for_child(
        &self,
        child_id: ChildId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepoResult<Vec<AttendanceRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ATTENDANCE_SELECT_SQL}
             WHERE child_id = ?1
               AND date BETWEEN ?2 AND ?3
             ORDER BY date ASC;"
        ))?;

        let mut rows = stmt.query(params![child_id, date_to_db(from), date_to_db(to)])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_attendance_row(row)?);
        }

        Ok(records)
    }
}

fn parse_attendance_row(row: &Row<'_>) -> RepoResult<AttendanceRecord> {
    let status_text: String = row.get("status")?;
    let status = status_text.parse::<AttendanceStatus>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in attendance_records.status"
        ))
    })?;

    Ok(AttendanceRecord {
        record_id: row.get("record_id")?,
        child_id: row.get("child_id")?,
        date: get_date(row, "date")?,
        status,
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
