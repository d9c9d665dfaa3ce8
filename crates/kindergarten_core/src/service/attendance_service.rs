//! Daily attendance use-case service.
//!
//! # Responsibility
//! - Build the per-group daily sheet shown when taking attendance.
//! - Forward status changes to the attendance ledger.
//!
//! # Invariants
//! - Every child in the group appears on the sheet exactly once.
//! - Children without a stored row are reported as `Present` with empty
//!   notes and no record id.

use crate::model::attendance::{resolve_status, AttendanceRecord, AttendanceStatus};
use crate::model::child::Child;
use crate::model::{ChildId, GroupId, RecordId};
use crate::repo::attendance_repo::AttendanceStore;
use crate::repo::child_repo::ChildRepository;
use crate::repo::error::RepoResult;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// One line of the daily sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyAttendanceRow {
    pub child: Child,
    pub status: AttendanceStatus,
    pub notes: String,
    /// `None` when the status is the implicit default.
    pub record_id: Option<RecordId>,
}

pub struct AttendanceService<A: AttendanceStore, C: ChildRepository> {
    attendance: A,
    children: C,
}

impl<A: AttendanceStore, C: ChildRepository> AttendanceService<A, C> {
    pub fn new(attendance: A, children: C) -> Self {
        Self {
            attendance,
            children,
        }
    }

    /// Lists every child of `group_id` with its status on `date`.
    pub fn daily_sheet(
        &self,
        group_id: GroupId,
        date: NaiveDate,
    ) -> RepoResult<Vec<DailyAttendanceRow>> {
        build_daily_sheet(&self.attendance, &self.children, group_id, date)
    }

    /// Records `status` for one child on one day, overwriting any earlier mark.
    pub fn mark(
        &self,
        child_id: ChildId,
        date: NaiveDate,
        status: AttendanceStatus,
        notes: Option<&str>,
    ) -> RepoResult<AttendanceRecord> {
        self.attendance.upsert_record(child_id, date, status, notes)
    }

    /// Effective status for one child on one day.
    pub fn status_on(&self, child_id: ChildId, date: NaiveDate) -> RepoResult<AttendanceStatus> {
        let record = self.attendance.get_record(child_id, date)?;
        Ok(resolve_status(record.as_ref()))
    }

    /// Stored rows of one child in `[from, to]`, oldest first.
    pub fn history(
        &self,
        child_id: ChildId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepoResult<Vec<AttendanceRecord>> {
        self.attendance.list_for_child(child_id, from, to)
    }
}

pub(crate) fn build_daily_sheet<A: AttendanceStore, C: ChildRepository>(
    attendance: &A,
    children: &C,
    group_id: GroupId,
    date: NaiveDate,
) -> RepoResult<Vec<DailyAttendanceRow>> {
    let roster = children.list_children_by_group(group_id)?;
    let child_ids: Vec<ChildId> = roster.iter().map(|child| child.child_id).collect();
    let mut by_child: HashMap<ChildId, AttendanceRecord> = attendance
        .list_for_children_on_date(&child_ids, date)?
        .into_iter()
        .map(|record| (record.child_id, record))
        .collect();

    Ok(roster
        .into_iter()
        .map(|child| {
            let record = by_child.remove(&child.child_id);
            DailyAttendanceRow {
                status: resolve_status(record.as_ref()),
                notes: record
                    .as_ref()
                    .and_then(|record| record.notes.clone())
                    .unwrap_or_default(),
                record_id: record.map(|record| record.record_id),
                child,
            }
        })
        .collect())
}
