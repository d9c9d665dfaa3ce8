use chrono::NaiveDate;
use kindergarten_core::{
    ChildRepository, Gender, Guardianship, Kindergarten, MedicalCard, MedicalRepository,
    NewChild, ParentProfile, ParentRepository, PersonName, RepoError, ValidationError,
};

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

fn enroll(kg: &Kindergarten, last_name: &str) -> i64 {
    kg.children()
        .create_child(&NewChild {
            last_name: last_name.to_string(),
            first_name: "Mila".to_string(),
            middle_name: None,
            birth_date: date("2021-01-01"),
            gender: Gender::Female,
            group_id: None,
            enrollment_date: date("2023-09-01"),
            locker_symbol: None,
        })
        .unwrap()
}

fn parent(kg: &Kindergarten, last_name: &str, first_name: &str) -> i64 {
    kg.parents()
        .create_parent(&ParentProfile {
            name: PersonName::new(last_name, first_name),
            phone: Some("+7 900 000 00 00".to_string()),
            ..ParentProfile::default()
        })
        .unwrap()
}

#[test]
fn guardianship_links_are_visible_from_both_sides() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let first_child = enroll(&kg, "Sokolova");
    let second_child = enroll(&kg, "Abramova");
    let mother = parent(&kg, "Sokolova", "Irina");
    let repo = kg.parents();

    for (child_id, relationship) in [(first_child, "mother"), (second_child, "guardian")] {
        repo.link_child(&Guardianship {
            parent_id: mother,
            child_id,
            relationship: relationship.to_string(),
        })
        .unwrap();
    }

    let children = repo.list_children_of(mother).unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].child.child_id, second_child);
    assert_eq!(children[0].relationship, "guardian");

    let parents = repo.list_parents_of(first_child).unwrap();
    assert_eq!(parents.len(), 1);
    assert_eq!(parents[0].parent.parent_id, mother);
    assert_eq!(parents[0].relationship, "mother");
}

#[test]
fn relinking_replaces_relationship_label() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let child_id = enroll(&kg, "Sokolova");
    let parent_id = parent(&kg, "Sokolov", "Pavel");
    let repo = kg.parents();

    let mut link = Guardianship {
        parent_id,
        child_id,
        relationship: "guardian".to_string(),
    };
    repo.link_child(&link).unwrap();
    link.relationship = "father".to_string();
    repo.link_child(&link).unwrap();

    let parents = repo.list_parents_of(child_id).unwrap();
    assert_eq!(parents.len(), 1);
    assert_eq!(parents[0].relationship, "father");

    repo.unlink_child(parent_id, child_id).unwrap();
    assert!(repo.list_parents_of(child_id).unwrap().is_empty());
}

#[test]
fn link_requires_existing_rows_and_label() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let child_id = enroll(&kg, "Sokolova");
    let parent_id = parent(&kg, "Sokolov", "Pavel");
    let repo = kg.parents();

    let missing_parent = repo
        .link_child(&Guardianship {
            parent_id: 500,
            child_id,
            relationship: "father".to_string(),
        })
        .unwrap_err();
    assert!(matches!(
        missing_parent,
        RepoError::NotFound {
            entity: "parent",
            ..
        }
    ));

    let blank_label = repo
        .link_child(&Guardianship {
            parent_id,
            child_id,
            relationship: " ".to_string(),
        })
        .unwrap_err();
    assert!(matches!(
        blank_label,
        RepoError::Validation(ValidationError::EmptyField("relationship"))
    ));
}

#[test]
fn parent_update_search_and_delete() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let child_id = enroll(&kg, "Sokolova");
    let parent_id = parent(&kg, "Sokolov", "Pavel");
    parent(&kg, "Ivanova", "Daria");
    let repo = kg.parents();

    let mut profile = repo.get_parent(parent_id).unwrap().unwrap().profile;
    profile.email = Some("pavel@example.com".to_string());
    repo.update_parent(parent_id, &profile).unwrap();

    let found = repo.search_parents("example").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].profile.name.full_name(), "Sokolov Pavel");
    assert_eq!(repo.search_parents("900").unwrap().len(), 2);

    repo.link_child(&Guardianship {
        parent_id,
        child_id,
        relationship: "father".to_string(),
    })
    .unwrap();
    repo.delete_parent(parent_id).unwrap();
    assert!(repo.get_parent(parent_id).unwrap().is_none());
    assert!(repo.list_parents_of(child_id).unwrap().is_empty());
    assert_eq!(repo.list_parents().unwrap().len(), 1);
}

#[test]
fn medical_card_is_created_then_replaced() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let child_id = enroll(&kg, "Sokolova");
    let repo = kg.medical();
    assert!(repo.get_medical_record(child_id).unwrap().is_none());

    let created = repo
        .save_medical_record(
            child_id,
            &MedicalCard {
                blood_type: Some("A(II) Rh+".to_string()),
                allergies: Some("peanuts".to_string()),
                height: Some(98.5),
                weight: Some(15.2),
                last_checkup: Some(date("2024-01-20")),
                ..MedicalCard::default()
            },
        )
        .unwrap();
    assert_eq!(created.card.allergies.as_deref(), Some("peanuts"));
    assert_eq!(created.card.last_checkup, Some(date("2024-01-20")));

    let updated = repo
        .save_medical_record(
            child_id,
            &MedicalCard {
                blood_type: Some("A(II) Rh+".to_string()),
                height: Some(101.0),
                ..MedicalCard::default()
            },
        )
        .unwrap();
    assert_eq!(updated.record_id, created.record_id);
    assert_eq!(updated.card.allergies, None);
    assert_eq!(updated.card.height, Some(101.0));
}

#[test]
fn medical_card_validation_and_missing_child() {
    let kg = Kindergarten::open_in_memory().unwrap();
    let child_id = enroll(&kg, "Sokolova");
    let repo = kg.medical();

    let invalid = repo
        .save_medical_record(
            child_id,
            &MedicalCard {
                weight: Some(-3.0),
                ..MedicalCard::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        invalid,
        RepoError::Validation(ValidationError::NonPositive { field: "weight", .. })
    ));

    let missing = repo
        .save_medical_record(999, &MedicalCard::default())
        .unwrap_err();
    assert!(matches!(missing, RepoError::NotFound { entity: "child", .. }));
}

#[test]
fn facade_close_releases_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kindergarten.db");

    let kg = Kindergarten::open(&path).unwrap();
    let child_id = enroll(&kg, "Sokolova");
    kg.close().unwrap();

    let reopened = Kindergarten::open(&path).unwrap();
    assert!(reopened.children().get_child(child_id).unwrap().is_some());
}
