//! Output formatting utilities

use chrono::Datelike;
use kindergarten_core::{
    Child, DailyAttendanceRow, Group, KindergartenSummary, MonthlyJournal, Teacher,
};
use serde_json::{json, Value};

/// Format groups for display.
pub fn format_group_list(groups: &[Group]) -> String {
    if groups.is_empty() {
        return "No groups found".to_string();
    }

    let mut output = String::new();
    for group in groups {
        let teacher = group
            .teacher_id
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        output.push_str(&format!(
            "{:>4}  {:<24} {:<24} teacher={}\n",
            group.group_id,
            group.group_name,
            group.age_category.to_string(),
            teacher
        ));
    }
    output
}

pub fn format_teacher_list(teachers: &[Teacher]) -> String {
    if teachers.is_empty() {
        return "No teachers found".to_string();
    }

    let mut output = String::new();
    for teacher in teachers {
        output.push_str(&format!(
            "{:>4}  {:<32} {}\n",
            teacher.teacher_id,
            teacher.profile.name.full_name(),
            teacher.profile.email.as_deref().unwrap_or("")
        ));
    }
    output
}

pub fn format_child_list(children: &[Child]) -> String {
    if children.is_empty() {
        return "No children found".to_string();
    }

    let mut output = String::new();
    for child in children {
        let group = child
            .group_id
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        output.push_str(&format!(
            "{:>4}  {:<32} {}  {}  group={}\n",
            child.child_id,
            child.full_name(),
            child.birth_date.format("%Y-%m-%d"),
            child.gender.as_code(),
            group
        ));
    }
    output
}

/// Format one group's attendance for a single day.
pub fn format_daily_sheet(rows: &[DailyAttendanceRow]) -> String {
    if rows.is_empty() {
        return "No children in this group".to_string();
    }

    let mut output = String::new();
    for row in rows {
        output.push_str(&format!(
            "{:>4}  {:<32} {:<8} {}\n",
            row.child.child_id,
            row.child.full_name(),
            row.status.as_str(),
            row.notes
        ));
    }
    output
}

pub fn format_summary(summary: &KindergartenSummary) -> String {
    format!(
        "Date:      {}\nChildren:  {}\nGroups:    {}\nTeachers:  {}\nParents:   {}\nPresent:   {}\nAbsent:    {}\nSick:      {}\n",
        summary.date.format("%Y-%m-%d"),
        summary.children,
        summary.groups,
        summary.teachers,
        summary.parents,
        summary.attendance.present,
        summary.attendance.absent,
        summary.attendance.sick
    )
}

/// Render the month grid: one line per child, one mark per day, then totals.
pub fn format_journal(journal: &MonthlyJournal) -> String {
    let rows = journal.rows();
    if rows.is_empty() {
        return format!(
            "{}-{:02}: no children in group {}",
            journal.year, journal.month, journal.group_id
        );
    }

    let name_width = rows
        .iter()
        .map(|row| row.full_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Child".len());

    let mut output = format!("{:<name_width$} ", "Child");
    for day in journal.days() {
        output.push_str(&format!("{:>3}", day.day()));
    }
    output.push_str("    +   -   S\n");

    for row in rows {
        output.push_str(&format!("{:<name_width$} ", row.full_name));
        for status in &row.statuses {
            output.push_str(&format!("{:>3}", status.mark()));
        }
        output.push_str(&format!(
            " {:>4}{:>4}{:>4}\n",
            row.tally.present, row.tally.absent, row.tally.sick
        ));
    }
    output
}

pub fn journal_json(journal: &MonthlyJournal) -> Value {
    let days: Vec<String> = journal
        .days()
        .iter()
        .map(|day| day.format("%Y-%m-%d").to_string())
        .collect();
    json!({
        "group_id": journal.group_id,
        "year": journal.year,
        "month": journal.month,
        "days": days,
        "rows": journal.rows(),
    })
}
