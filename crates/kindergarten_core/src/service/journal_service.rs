//! Monthly attendance journal.
//!
//! # Responsibility
//! - Aggregate one group's attendance into a day x child grid for a month.
//! - Apply the cell toggle cycle and persist every toggle.
//!
//! # Invariants
//! - A journal for N children and D days holds exactly N x D cells.
//! - Cells with no stored row hold `AttendanceStatus::Present`.
//! - Rows follow the roster order (last name, first name); only children
//!   currently in the group get a row, whatever their history.
//! - Toggle order: Present -> Absent -> Sick -> Present.
//! - A toggled cell carries no notes.

use crate::model::attendance::{resolve_status, AttendanceStatus};
use crate::model::child::Child;
use crate::model::{ChildId, GroupId};
use crate::repo::attendance_repo::AttendanceStore;
use crate::repo::child_repo::ChildRepository;
use crate::repo::error::RepoError;
use chrono::{Datelike, NaiveDate};
use log::info;
use serde::Serialize;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Errors from journal operations.
#[derive(Debug)]
pub enum JournalError {
    /// `month` outside 1..=12 or `year` outside the calendar range.
    InvalidMonth { year: i32, month: u32 },
    /// Toggle target is not part of the loaded grid.
    CellOutOfRange { child_id: ChildId, date: NaiveDate },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for JournalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMonth { year, month } => write!(f, "invalid month {year}-{month:02}"),
            Self::CellOutOfRange { child_id, date } => {
                write!(f, "no journal cell for child {child_id} on {date}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for JournalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for JournalError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Per-status counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusTally {
    pub present: u32,
    pub absent: u32,
    pub sick: u32,
}

impl StatusTally {
    pub fn add(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Sick => self.sick += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.present + self.absent + self.sick
    }
}

/// One child's line of the journal, in day order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalRow {
    pub child_id: ChildId,
    pub full_name: String,
    pub statuses: Vec<AttendanceStatus>,
    pub tally: StatusTally,
}

/// Fully resolved attendance grid of one group for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyJournal {
    pub group_id: GroupId,
    pub year: i32,
    pub month: u32,
    days: Vec<NaiveDate>,
    children: Vec<Child>,
    cells: HashMap<(ChildId, NaiveDate), AttendanceStatus>,
}

impl MonthlyJournal {
    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Status of one cell, `None` when the cell is outside the grid.
    pub fn status(&self, child_id: ChildId, date: NaiveDate) -> Option<AttendanceStatus> {
        self.cells.get(&(child_id, date)).copied()
    }

    /// Statuses of one child in day order.
    pub fn row(&self, child_id: ChildId) -> Option<Vec<AttendanceStatus>> {
        if !self.children.iter().any(|child| child.child_id == child_id) {
            return None;
        }
        Some(
            self.days
                .iter()
                .map(|day| self.status(child_id, *day).unwrap_or_default())
                .collect(),
        )
    }

    /// All rows in roster order with per-child totals.
    pub fn rows(&self) -> Vec<JournalRow> {
        self.children
            .iter()
            .map(|child| {
                let statuses = self.row(child.child_id).unwrap_or_default();
                let mut tally = StatusTally::default();
                statuses.iter().for_each(|status| tally.add(*status));
                JournalRow {
                    child_id: child.child_id,
                    full_name: child.full_name(),
                    statuses,
                    tally,
                }
            })
            .collect()
    }

    /// Totals across the group for one day.
    pub fn day_tally(&self, date: NaiveDate) -> StatusTally {
        let mut tally = StatusTally::default();
        for child in &self.children {
            if let Some(status) = self.status(child.child_id, date) {
                tally.add(status);
            }
        }
        tally
    }

    fn set(&mut self, child_id: ChildId, date: NaiveDate, status: AttendanceStatus) {
        self.cells.insert((child_id, date), status);
    }
}

/// Builds monthly journals and applies cell toggles.
pub struct JournalAggregator<A: AttendanceStore, C: ChildRepository> {
    attendance: A,
    children: C,
}

impl<A: AttendanceStore, C: ChildRepository> JournalAggregator<A, C> {
    pub fn new(attendance: A, children: C) -> Self {
        Self {
            attendance,
            children,
        }
    }

    /// Loads the whole month for `group_id` eagerly.
    ///
    /// Issues one attendance query per calendar day and merges the rows into
    /// a `(child_id, date)` lookup before defaulting the gaps to `Present`.
    pub fn build_month(
        &self,
        group_id: GroupId,
        year: i32,
        month: u32,
    ) -> Result<MonthlyJournal, JournalError> {
        let started_at = Instant::now();
        let days = month_days(year, month)?;
        let children = self.children.list_children_by_group(group_id)?;
        let child_ids: Vec<ChildId> = children.iter().map(|child| child.child_id).collect();

        let mut stored = HashMap::new();
        for day in &days {
            for record in self.attendance.list_for_children_on_date(&child_ids, *day)? {
                stored.insert((record.child_id, record.date), record);
            }
        }

        let mut cells = HashMap::with_capacity(children.len() * days.len());
        for child_id in &child_ids {
            for day in &days {
                let key = (*child_id, *day);
                cells.insert(key, resolve_status(stored.get(&key)));
            }
        }

        info!(
            "event=journal_build module=journal status=ok group_id={} year={} month={} children={} cells={} duration_ms={}",
            group_id,
            year,
            month,
            children.len(),
            cells.len(),
            started_at.elapsed().as_millis()
        );

        Ok(MonthlyJournal {
            group_id,
            year,
            month,
            days,
            children,
            cells,
        })
    }

    /// Advances one loaded cell and persists the new status.
    ///
    /// A toggle clears the notes stored for that day.
    pub fn toggle(
        &self,
        journal: &mut MonthlyJournal,
        child_id: ChildId,
        date: NaiveDate,
    ) -> Result<AttendanceStatus, JournalError> {
        let current = journal
            .status(child_id, date)
            .ok_or(JournalError::CellOutOfRange { child_id, date })?;
        let next = self.persist_next(child_id, date, current)?;
        journal.set(child_id, date, next);
        Ok(next)
    }

    /// Advances one cell using the stored status, without a loaded grid.
    pub fn toggle_cell(
        &self,
        child_id: ChildId,
        date: NaiveDate,
    ) -> Result<AttendanceStatus, JournalError> {
        let record = self.attendance.get_record(child_id, date)?;
        self.persist_next(child_id, date, resolve_status(record.as_ref()))
    }

    fn persist_next(
        &self,
        child_id: ChildId,
        date: NaiveDate,
        current: AttendanceStatus,
    ) -> Result<AttendanceStatus, JournalError> {
        let next = current.next();
        self.attendance.upsert_record(child_id, date, next, None)?;
        Ok(next)
    }
}

/// Every calendar day of `year-month` in order.
pub fn month_days(year: i32, month: u32) -> Result<Vec<NaiveDate>, JournalError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(JournalError::InvalidMonth { year, month })?;
    Ok(first
        .iter_days()
        .take_while(|day| day.month() == month)
        .collect())
}
