use family_kiosk::types::*;

#[test]
fn collection_as_str_roundtrip() {
    for collection in Collection::ALL {
        let s = collection.as_str();
        let parsed = Collection::from_str(s)
            .unwrap_or_else(|| panic!("failed to parse Collection from '{}'", s));
        assert_eq!(collection, parsed, "roundtrip failed for Collection::{}", s);
    }
}

#[test]
fn collection_from_str_accepts_singular_and_case() {
    assert_eq!(Collection::from_str("Person"), Some(Collection::People));
    assert_eq!(Collection::from_str(" quiz "), Some(Collection::Quizzes));
    assert!(Collection::from_str("letters").is_none());
    assert!(Collection::from_str("").is_none());
}

#[test]
fn record_id_accepts_numbers_and_strings() {
    let ids: Vec<RecordId> = serde_json::from_str(r#"[7, "p-7"]"#).unwrap();
    assert_eq!(ids, vec![RecordId::Number(7), RecordId::Text("p-7".to_string())]);
    assert_eq!(serde_json::to_string(&ids).unwrap(), r#"[7,"p-7"]"#);
    assert_ne!(RecordId::Number(1), RecordId::Text("1".to_string()));
}

#[test]
fn record_id_parse_prefers_integers() {
    assert_eq!(RecordId::parse(" 12 "), RecordId::Number(12));
    assert_eq!(RecordId::parse("abc"), RecordId::Text("abc".to_string()));
}

#[test]
fn split_names_trims_and_drops_empty() {
    assert_eq!(split_names(" Alice , ,Bob,"), vec!["Alice", "Bob"]);
    assert!(split_names("").is_empty());
    assert!(split_names(" , ").is_empty());
}

#[test]
fn parse_date_requires_iso_format() {
    assert!(parse_date("2020-02-29").is_some());
    assert!(parse_date("2021-02-29").is_none());
    assert!(parse_date("02/03/2020").is_none());
    assert!(parse_date("").is_none());
}

#[test]
fn person_deceased_accepts_truthy_values() {
    for (raw, expected) in [
        ("true", true),
        ("\"yes\"", true),
        ("\"YES\"", true),
        ("\"y\"", false),
        ("1", true),
        ("\"no\"", false),
        ("0", false),
        ("\"\"", false),
        ("null", false),
    ] {
        let json = format!(r#"{{"id": 1, "name": "A", "deceased": {raw}}}"#);
        let person: Person = serde_json::from_str(&json).unwrap();
        assert_eq!(person.deceased, expected, "deceased from {raw}");
    }
}

#[test]
fn person_missing_fields_default_to_empty() {
    let person: Person = serde_json::from_str(r#"{"id": 3}"#).unwrap();
    assert_eq!(person, Person::new(3, ""));
}

#[test]
fn null_text_fields_read_as_empty() {
    let person: Person =
        serde_json::from_str(r#"{"id": 1, "name": "Bob", "nickname": null, "parents": null}"#)
            .unwrap();
    assert_eq!(person.nickname, "");
    assert_eq!(person.parents, "");

    let photo: Photo = serde_json::from_str(r#"{"id": 1, "file": "a.jpg", "desc": null}"#).unwrap();
    assert_eq!(photo.desc, None);
    assert_eq!(photo.field("desc"), None);
}

#[test]
fn scalar_text_fields_read_as_text() {
    let photo: Photo =
        serde_json::from_str(r#"{"id": 1, "file": "a.jpg", "desc": 42, "date": true}"#).unwrap();
    assert_eq!(photo.desc.as_deref(), Some("42"));
    assert_eq!(photo.date.as_deref(), Some("true"));

    let quiz: Quiz =
        serde_json::from_str(r#"{"id": 1, "question": "Year?", "answer": 1987}"#).unwrap();
    assert_eq!(quiz.answer, "1987");
}

#[test]
fn structured_values_in_text_fields_are_rejected() {
    let result = serde_json::from_str::<Person>(r#"{"id": 1, "name": {"first": "Bob"}}"#);
    assert!(result.is_err());
}

#[test]
fn photo_tags_from_array_or_string() {
    let from_array: Photo =
        serde_json::from_str(r#"{"id": 1, "tags": ["Bob", 1987]}"#).unwrap();
    assert_eq!(
        from_array.tags,
        Some(vec!["Bob".to_string(), "1987".to_string()])
    );

    let from_string: Photo = serde_json::from_str(r#"{"id": 2, "tags": "Bob, Alice"}"#).unwrap();
    assert_eq!(
        from_string.tags,
        Some(vec!["Bob".to_string(), "Alice".to_string()])
    );

    let untagged: Photo = serde_json::from_str(r#"{"id": 3}"#).unwrap();
    assert_eq!(untagged.tags, None);
    assert_eq!(untagged.field("tags"), None);
}

#[test]
fn unknown_keys_survive_a_round_trip() {
    let json = r#"{"id":1,"name":"Rex","microchip":"A-1","vet":{"name":"Dr. No"}}"#;
    let pet: Pet = serde_json::from_str(json).unwrap();
    assert_eq!(
        pet.field("microchip"),
        Some(FieldValue::Text("A-1".to_string()))
    );

    let written: serde_json::Value = serde_json::to_value(&pet).unwrap();
    assert_eq!(written["microchip"], "A-1");
    assert_eq!(written["vet"]["name"], "Dr. No");
}

#[test]
fn name_references_per_record_type() {
    let person = Person {
        parents: "Ann, Ben".to_string(),
        spouses: "Cy".to_string(),
        ..Person::new(1, "Dee")
    };
    let refs = person.name_references();
    assert_eq!(refs[0], ("parents", vec!["Ann".to_string(), "Ben".to_string()]));
    assert_eq!(refs[1], ("spouses", vec!["Cy".to_string()]));

    let story = Story {
        about: "Dee".to_string(),
        ..Story::new(1, "Summer")
    };
    assert_eq!(story.name_references(), vec![("about", vec!["Dee".to_string()])]);

    let quiz = Quiz {
        about: "Dee".to_string(),
        ..Quiz::new(1, "Q", "A")
    };
    assert!(quiz.name_references().is_empty());
}

#[test]
fn resolution_report_completeness() {
    let mut report = ResolutionReport::default();
    assert!(report.is_complete());
    report.unresolved.push("Carol".to_string());
    assert!(!report.is_complete());
}
