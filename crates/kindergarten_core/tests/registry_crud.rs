use chrono::NaiveDate;
use kindergarten_core::{
    AgeCategory, AttendanceStatus, AttendanceStore, ChildListQuery, ChildRepository, Gender,
    GroupFilter, GroupRepository, Guardianship, Kindergarten, MedicalCard, MedicalRepository,
    NewChild, NewGroup, ParentProfile, ParentRepository, PersonName, RepoError, TeacherProfile,
    TeacherRepository, ValidationError,
};

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

fn new_child(last_name: &str, first_name: &str, group_id: Option<i64>) -> NewChild {
    NewChild {
        last_name: last_name.to_string(),
        first_name: first_name.to_string(),
        middle_name: None,
        birth_date: date("2020-04-04"),
        gender: Gender::Female,
        group_id,
        enrollment_date: date("2023-09-01"),
        locker_symbol: None,
    }
}

fn new_group(name: &str, teacher_id: Option<i64>) -> NewGroup {
    NewGroup {
        group_name: name.to_string(),
        age_category: AgeCategory::Junior,
        teacher_id,
    }
}

fn teacher(last_name: &str, email: Option<&str>) -> TeacherProfile {
    TeacherProfile {
        name: PersonName::new(last_name, "Anna"),
        email: email.map(str::to_string),
        experience: Some(7),
        ..TeacherProfile::default()
    }
}

#[test]
fn child_create_get_update_roundtrip() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let repo = kg.children();
    let mut input = new_child("Morozova", "Eva", None);
    input.middle_name = Some("Igorevna".to_string());
    input.locker_symbol = Some("apple".to_string());

    let id = repo.create_child(&input).unwrap();
    let mut loaded = repo.get_child(id).unwrap().unwrap();
    assert_eq!(loaded.full_name(), "Morozova Eva Igorevna");
    assert_eq!(loaded.birth_date, date("2020-04-04"));
    assert_eq!(loaded.gender, Gender::Female);
    assert_eq!(loaded.locker_symbol.as_deref(), Some("apple"));

    loaded.first_name = "Eveline".to_string();
    loaded.gender = Gender::Male;
    repo.update_child(&loaded).unwrap();
    let reloaded = repo.get_child(id).unwrap().unwrap();
    assert_eq!(reloaded.first_name, "Eveline");
    assert_eq!(reloaded.gender, Gender::Male);
}

#[test]
fn child_validation_blocks_write() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let err = kg
        .children()
        .create_child(&new_child("  ", "Eva", None))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyField("last_name"))
    ));
}

#[test]
fn child_in_unknown_group_is_not_found() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let err = kg
        .children()
        .create_child(&new_child("Morozova", "Eva", Some(77)))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: "group",
            id: 77
        }
    ));
}

#[test]
fn child_listing_filters_and_orders() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let group_id = kg.groups().create_group(&new_group("Bees", None)).unwrap();
    let repo = kg.children();
    let zaitsev = repo.create_child(&new_child("Zaitseva", "Olga", Some(group_id))).unwrap();
    let abramova = repo.create_child(&new_child("Abramova", "Nina", Some(group_id))).unwrap();
    let loner = repo.create_child(&new_child("Kuznetsova", "Olga", None)).unwrap();

    let in_group: Vec<i64> = repo
        .list_children_by_group(group_id)
        .unwrap()
        .iter()
        .map(|child| child.child_id)
        .collect();
    assert_eq!(in_group, vec![abramova, zaitsev]);

    let unassigned = repo.list_children_without_group().unwrap();
    assert_eq!(unassigned.len(), 1);
    assert_eq!(unassigned[0].child_id, loner);

    let olgas = repo
        .list_children(&ChildListQuery {
            group: GroupFilter::Any,
            search: Some("olg".to_string()),
        })
        .unwrap();
    assert_eq!(olgas.len(), 2);

    let blank_search = repo
        .list_children(&ChildListQuery {
            group: GroupFilter::Any,
            search: Some("   ".to_string()),
        })
        .unwrap();
    assert_eq!(blank_search.len(), 3);
}

#[test]
fn transfers_move_children_between_groups() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let groups = kg.groups();
    let from = groups.create_group(&new_group("Bees", None)).unwrap();
    let to = groups.create_group(&new_group("Ants", None)).unwrap();
    let repo = kg.children();
    let first = repo.create_child(&new_child("Abramova", "Nina", Some(from))).unwrap();
    let second = repo.create_child(&new_child("Belova", "Ira", Some(from))).unwrap();

    assert_eq!(repo.bulk_transfer(&[first, second], Some(to)).unwrap(), 2);
    assert!(repo.list_children_by_group(from).unwrap().is_empty());
    assert_eq!(repo.list_children_by_group(to).unwrap().len(), 2);

    repo.transfer_child(first, None).unwrap();
    assert_eq!(repo.get_child(first).unwrap().unwrap().group_id, None);

    let err = repo.transfer_child(999, Some(to)).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "child", .. }));
    assert_eq!(repo.bulk_transfer(&[], Some(to)).unwrap(), 0);
}

#[test]
fn used_locker_symbols_can_exclude_one_child() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let group_id = kg.groups().create_group(&new_group("Bees", None)).unwrap();
    let repo = kg.children();
    let mut first = new_child("Abramova", "Nina", Some(group_id));
    first.locker_symbol = Some("car".to_string());
    let first_id = repo.create_child(&first).unwrap();
    let mut second = new_child("Belova", "Ira", Some(group_id));
    second.locker_symbol = Some("ball".to_string());
    repo.create_child(&second).unwrap();
    repo.create_child(&new_child("Chernova", "Lia", Some(group_id))).unwrap();

    assert_eq!(
        repo.used_locker_symbols(group_id, None).unwrap(),
        vec!["ball".to_string(), "car".to_string()]
    );
    assert_eq!(
        repo.used_locker_symbols(group_id, Some(first_id)).unwrap(),
        vec!["ball".to_string()]
    );
}

#[test]
fn deleting_child_cascades_dependent_rows() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let child_id = kg.children().create_child(&new_child("Abramova", "Nina", None)).unwrap();
    let parent_id = kg
        .parents()
        .create_parent(&ParentProfile {
            name: PersonName::new("Abramov", "Oleg"),
            ..ParentProfile::default()
        })
        .unwrap();
    kg.parents()
        .link_child(&Guardianship {
            parent_id,
            child_id,
            relationship: "father".to_string(),
        })
        .unwrap();
    kg.medical()
        .save_medical_record(child_id, &MedicalCard::default())
        .unwrap();
    kg.attendance_store()
        .upsert_record(child_id, date("2024-03-05"), AttendanceStatus::Sick, None)
        .unwrap();

    kg.children().delete_child(child_id).unwrap();

    assert!(kg.children().get_child(child_id).unwrap().is_none());
    assert!(kg.parents().list_children_of(parent_id).unwrap().is_empty());
    assert!(kg.medical().get_medical_record(child_id).unwrap().is_none());
    assert!(kg
        .attendance_store()
        .get_record(child_id, date("2024-03-05"))
        .unwrap()
        .is_none());
    assert!(kg.parents().get_parent(parent_id).unwrap().is_some());

    let err = kg.children().delete_child(child_id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "child", .. }));
}

#[test]
fn group_primary_teacher_is_linked_and_listed() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let lead = kg.teachers().create_teacher(&teacher("Orlova", None)).unwrap();
    let helper = kg.teachers().create_teacher(&teacher("Belova", None)).unwrap();
    let groups = kg.groups();
    let group_id = groups.create_group(&new_group("Bees", Some(lead))).unwrap();

    groups.assign_teacher(group_id, helper).unwrap();
    groups.assign_teacher(group_id, helper).unwrap();

    let names: Vec<String> = groups
        .list_group_teachers(group_id)
        .unwrap()
        .iter()
        .map(|teacher| teacher.profile.name.last_name.clone())
        .collect();
    assert_eq!(names, vec!["Belova".to_string(), "Orlova".to_string()]);

    groups.unassign_teacher(group_id, lead).unwrap();
    assert_eq!(groups.get_group(group_id).unwrap().unwrap().teacher_id, None);
    assert_eq!(groups.list_group_teachers(group_id).unwrap().len(), 1);
}

#[test]
fn group_update_and_listing_by_name() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let groups = kg.groups();
    let bees = groups.create_group(&new_group("Bees", None)).unwrap();
    groups.create_group(&new_group("Ants", None)).unwrap();

    let mut group = groups.get_group(bees).unwrap().unwrap();
    group.group_name = "Bumblebees".to_string();
    group.age_category = AgeCategory::Preparatory;
    groups.update_group(&group).unwrap();

    let names: Vec<String> = groups
        .list_groups()
        .unwrap()
        .into_iter()
        .map(|group| group.group_name)
        .collect();
    assert_eq!(names, vec!["Ants".to_string(), "Bumblebees".to_string()]);
    assert_eq!(
        groups.get_group(bees).unwrap().unwrap().age_category,
        AgeCategory::Preparatory
    );
}

#[test]
fn deleting_group_detaches_children() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let lead = kg.teachers().create_teacher(&teacher("Orlova", None)).unwrap();
    let group_id = kg.groups().create_group(&new_group("Bees", Some(lead))).unwrap();
    let child_id = kg
        .children()
        .create_child(&new_child("Abramova", "Nina", Some(group_id)))
        .unwrap();

    kg.groups().delete_group(group_id).unwrap();

    assert!(kg.groups().get_group(group_id).unwrap().is_none());
    let child = kg.children().get_child(child_id).unwrap().unwrap();
    assert_eq!(child.group_id, None);
    assert!(kg.teachers().get_teacher(lead).unwrap().is_some());
}

#[test]
fn deleting_teacher_clears_primary_reference() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let lead = kg.teachers().create_teacher(&teacher("Orlova", None)).unwrap();
    let group_id = kg.groups().create_group(&new_group("Bees", Some(lead))).unwrap();

    kg.teachers().delete_teacher(lead).unwrap();

    let group = kg.groups().get_group(group_id).unwrap().unwrap();
    assert_eq!(group.teacher_id, None);
    assert!(kg.groups().list_group_teachers(group_id).unwrap().is_empty());
}

#[test]
fn teacher_search_matches_contacts_and_rejects_bad_email() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let repo = kg.teachers();
    repo.create_teacher(&teacher("Orlova", Some("orlova@garden.org"))).unwrap();
    repo.create_teacher(&teacher("Belova", None)).unwrap();

    assert_eq!(repo.search_teachers("GARDEN").unwrap().len(), 1);
    assert_eq!(repo.search_teachers("").unwrap().len(), 2);

    let err = repo
        .create_teacher(&teacher("Petrova", Some("broken")))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::InvalidEmail(_))
    ));
}
