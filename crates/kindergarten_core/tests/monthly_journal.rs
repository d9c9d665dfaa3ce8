use chrono::NaiveDate;
use kindergarten_core::{
    AgeCategory, AttendanceStatus, AttendanceStore, ChildRepository, Gender, GroupRepository,
    JournalError, Kindergarten, NewChild, NewGroup,
};

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

fn create_group(kg: &Kindergarten, name: &str) -> i64 {
    kg.groups()
        .create_group(&NewGroup {
            group_name: name.to_string(),
            age_category: AgeCategory::Senior,
            teacher_id: None,
        })
        .unwrap()
}

fn enroll(kg: &Kindergarten, last_name: &str, group_id: i64) -> i64 {
    kg.children()
        .create_child(&NewChild {
            last_name: last_name.to_string(),
            first_name: "Kid".to_string(),
            middle_name: None,
            birth_date: date("2019-06-15"),
            gender: Gender::Male,
            group_id: Some(group_id),
            enrollment_date: date("2022-09-01"),
            locker_symbol: None,
        })
        .unwrap()
}

#[test]
fn empty_ledger_yields_full_present_grid() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let group_id = create_group(&kg, "Stars");
    let first = enroll(&kg, "Antonov", group_id);
    let second = enroll(&kg, "Bykov", group_id);

    let journal = kg.journal().build_month(group_id, 2024, 4).unwrap();

    assert_eq!(journal.days().len(), 30);
    assert_eq!(journal.children().len(), 2);
    assert_eq!(journal.cell_count(), 2 * 30);
    for child_id in [first, second] {
        let row = journal.row(child_id).unwrap();
        assert_eq!(row.len(), 30);
        assert!(row.iter().all(|status| *status == AttendanceStatus::Present));
    }
}

#[test]
fn grid_has_n_times_d_cells_and_merges_stored_rows() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let group_id = create_group(&kg, "Stars");
    let first = enroll(&kg, "Antonov", group_id);
    let second = enroll(&kg, "Bykov", group_id);
    let third = enroll(&kg, "Gromov", group_id);
    let store = kg.attendance_store();
    store
        .upsert_record(first, date("2024-03-05"), AttendanceStatus::Sick, None)
        .unwrap();
    store
        .upsert_record(third, date("2024-03-31"), AttendanceStatus::Absent, None)
        .unwrap();
    // Outside the requested month.
    store
        .upsert_record(second, date("2024-04-01"), AttendanceStatus::Absent, None)
        .unwrap();

    let journal = kg.journal().build_month(group_id, 2024, 3).unwrap();

    assert_eq!(journal.cell_count(), 3 * 31);
    assert_eq!(
        journal.status(first, date("2024-03-05")),
        Some(AttendanceStatus::Sick)
    );
    assert_eq!(
        journal.status(third, date("2024-03-31")),
        Some(AttendanceStatus::Absent)
    );
    assert_eq!(
        journal.status(second, date("2024-03-31")),
        Some(AttendanceStatus::Present)
    );
    assert_eq!(journal.status(second, date("2024-04-01")), None);

    let day_tally = journal.day_tally(date("2024-03-05"));
    assert_eq!(day_tally.present, 2);
    assert_eq!(day_tally.sick, 1);

    let rows = journal.rows();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].child_id, first);
    assert_eq!(rows[0].tally.sick, 1);
    assert_eq!(rows[0].tally.total(), 31);
}

#[test]
fn toggle_cycles_and_persists_each_step() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let group_id = create_group(&kg, "Stars");
    let child_id = enroll(&kg, "Antonov", group_id);
    let journal_service = kg.journal();
    let mut journal = journal_service.build_month(group_id, 2024, 3).unwrap();
    let day = date("2024-03-05");

    let expected = [
        AttendanceStatus::Absent,
        AttendanceStatus::Sick,
        AttendanceStatus::Present,
    ];
    for status in expected {
        let next = journal_service.toggle(&mut journal, child_id, day).unwrap();
        assert_eq!(next, status);
        assert_eq!(journal.status(child_id, day), Some(status));
        let stored = kg.attendance_store().get_record(child_id, day).unwrap().unwrap();
        assert_eq!(stored.status, status);
    }

    let reloaded = journal_service.build_month(group_id, 2024, 3).unwrap();
    assert_eq!(reloaded, journal);
}

#[test]
fn toggle_clears_stored_notes() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let group_id = create_group(&kg, "Stars");
    let child_id = enroll(&kg, "Antonov", group_id);
    let day = date("2024-03-05");
    let first = kg
        .attendance_store()
        .upsert_record(child_id, day, AttendanceStatus::Absent, Some("family trip"))
        .unwrap();

    let next = kg.journal().toggle_cell(child_id, day).unwrap();
    assert_eq!(next, AttendanceStatus::Sick);

    let stored = kg.attendance_store().get_record(child_id, day).unwrap().unwrap();
    assert_eq!(stored.status, AttendanceStatus::Sick);
    assert_eq!(stored.notes, None);
    assert_eq!(stored.record_id, first.record_id);
}

#[test]
fn toggle_outside_grid_is_rejected() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let group_id = create_group(&kg, "Stars");
    let child_id = enroll(&kg, "Antonov", group_id);
    let journal_service = kg.journal();
    let mut journal = journal_service.build_month(group_id, 2024, 3).unwrap();

    let err = journal_service
        .toggle(&mut journal, child_id, date("2024-04-01"))
        .unwrap_err();
    assert!(matches!(err, JournalError::CellOutOfRange { .. }));
    assert!(kg
        .attendance_store()
        .get_record(child_id, date("2024-04-01"))
        .unwrap()
        .is_none());
}

#[test]
fn invalid_month_is_rejected() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let group_id = create_group(&kg, "Stars");

    let err = kg.journal().build_month(group_id, 2024, 13).unwrap_err();
    assert!(matches!(err, JournalError::InvalidMonth { .. }));
}

#[test]
fn detached_child_leaves_journal_but_keeps_history() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let group_id = create_group(&kg, "Stars");
    let staying = enroll(&kg, "Antonov", group_id);
    let leaving = enroll(&kg, "Bykov", group_id);
    let day = date("2024-03-05");
    kg.attendance_store()
        .upsert_record(leaving, day, AttendanceStatus::Sick, None)
        .unwrap();

    kg.children().transfer_child(leaving, None).unwrap();

    let journal = kg.journal().build_month(group_id, 2024, 3).unwrap();
    assert_eq!(journal.children().len(), 1);
    assert_eq!(journal.children()[0].child_id, staying);
    assert!(journal.row(leaving).is_none());
    assert_eq!(journal.cell_count(), 31);

    let history = kg.attendance_store().get_record(leaving, day).unwrap().unwrap();
    assert_eq!(history.status, AttendanceStatus::Sick);
}

#[test]
fn group_without_children_yields_empty_grid() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let group_id = create_group(&kg, "Empty");

    let journal = kg.journal().build_month(group_id, 2024, 2).unwrap();
    assert_eq!(journal.days().len(), 29);
    assert_eq!(journal.cell_count(), 0);
    assert!(journal.rows().is_empty());
}
