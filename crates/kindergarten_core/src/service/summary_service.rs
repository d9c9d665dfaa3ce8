//! Registry headcounts and one day's attendance across every group.
//!
//! Attendance is tallied per group roster, so children without a group are
//! part of `children` but never part of `attendance`.

use crate::repo::attendance_repo::AttendanceStore;
use crate::repo::child_repo::{ChildListQuery, ChildRepository};
use crate::repo::error::RepoResult;
use crate::repo::group_repo::GroupRepository;
use crate::repo::parent_repo::ParentRepository;
use crate::repo::teacher_repo::TeacherRepository;
use crate::service::attendance_service::build_daily_sheet;
use crate::service::journal_service::StatusTally;
use chrono::NaiveDate;
use log::info;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindergartenSummary {
    pub date: NaiveDate,
    pub children: usize,
    pub groups: usize,
    pub teachers: usize,
    pub parents: usize,
    /// Grouped children by resolved status on `date`; no row counts as present.
    pub attendance: StatusTally,
}

pub struct SummaryService<A, C, G, T, P> {
    attendance: A,
    children: C,
    groups: G,
    teachers: T,
    parents: P,
}

impl<A, C, G, T, P> SummaryService<A, C, G, T, P>
where
    A: AttendanceStore,
    C: ChildRepository,
    G: GroupRepository,
    T: TeacherRepository,
    P: ParentRepository,
{
    pub fn new(attendance: A, children: C, groups: G, teachers: T, parents: P) -> Self {
        Self {
            attendance,
            children,
            groups,
            teachers,
            parents,
        }
    }

    pub fn summary(&self, date: NaiveDate) -> RepoResult<KindergartenSummary> {
        let groups = self.groups.list_groups()?;
        let mut attendance = StatusTally::default();
        for group in &groups {
            for row in build_daily_sheet(&self.attendance, &self.children, group.group_id, date)? {
                attendance.add(row.status);
            }
        }

        let summary = KindergartenSummary {
            date,
            children: self.children.list_children(&ChildListQuery::default())?.len(),
            groups: groups.len(),
            teachers: self.teachers.list_teachers()?.len(),
            parents: self.parents.list_parents()?.len(),
            attendance,
        };
        info!(
            "event=summary_build module=attendance status=ok groups={} present={} absent={} sick={}",
            summary.groups,
            attendance.present,
            attendance.absent,
            attendance.sick
        );
        Ok(summary)
    }

    /// Children marked or defaulted present on `date`.
    pub fn present_on(&self, date: NaiveDate) -> RepoResult<u32> {
        Ok(self.summary(date)?.attendance.present)
    }
}
