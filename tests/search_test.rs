use family_kiosk::errors::KioskError;
use family_kiosk::search::SearchEngine;
use family_kiosk::types::*;

fn sample_people() -> Vec<Person> {
    vec![
        Person {
            nickname: "Bobby".to_string(),
            birth_date: "1950-03-04".to_string(),
            ..Person::new(1, "Bob Smith")
        },
        Person {
            birth_date: "1922-07-01".to_string(),
            death_date: "1999-12-31".to_string(),
            deceased: true,
            ..Person::new(2, "Alice Smith")
        },
        Person {
            nickname: "Ally".to_string(),
            ..Person::new(3, "Alice Jones")
        },
    ]
}

fn sample_photos() -> Vec<Photo> {
    vec![
        Photo {
            date: Some("2020-06-01".to_string()),
            tags: Some(vec!["Bob Smith".to_string(), "Alice Jones".to_string()]),
            desc: Some("Picnic at the lake".to_string()),
            ..Photo::new(1, "picnic.jpg")
        },
        Photo {
            date: Some("1999-01-01".to_string()),
            desc: Some("Old house".to_string()),
            ..Photo::new(2, "house.png")
        },
        Photo {
            date: Some("not-a-date".to_string()),
            tags: Some(vec!["Grandpa".to_string()]),
            ..Photo::new(3, "scan-001.jpg")
        },
    ]
}

#[test]
fn test_find_people_partial_and_exact() {
    let people = vec![Person {
        nickname: "Bobby".to_string(),
        ..Person::new(1, "Bob Smith")
    }];
    let engine = SearchEngine::default().with_people(&people);

    assert_eq!(engine.find_people_by_name("bob", false).len(), 1);
    assert_eq!(engine.find_people_by_name("Bob Smith", true).len(), 1);
    assert!(engine.find_people_by_name("Smith", true).is_empty());
}

#[test]
fn test_find_people_matches_nickname() {
    let people = sample_people();
    let engine = SearchEngine::default().with_people(&people);

    let results = engine.find_people_by_name("ally", true);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Alice Jones");
}

#[test]
fn test_find_people_is_case_and_whitespace_insensitive() {
    let people = sample_people();
    let engine = SearchEngine::default().with_people(&people);

    let padded = engine.find_people_by_name(" bob ", false);
    let upper = engine.find_people_by_name("BOB", false);
    assert_eq!(padded, upper);
    assert_eq!(padded.len(), 1);
}

#[test]
fn test_exact_results_are_subset_of_partial() {
    let people = sample_people();
    let engine = SearchEngine::default().with_people(&people);

    for query in ["alice", "Alice Smith", "smith", "Bobby", "", "zed"] {
        let partial = engine.find_people_by_name(query, false);
        for person in engine.find_people_by_name(query, true) {
            assert!(
                partial.iter().any(|p| p.id == person.id),
                "exact match for '{}' missing from partial results",
                query
            );
        }
    }
}

#[test]
fn test_empty_query_matches_everyone_partially() {
    let people = sample_people();
    let engine = SearchEngine::default().with_people(&people);
    assert_eq!(engine.find_people_by_name("", false).len(), people.len());
}

#[test]
fn test_person_exists_agrees_with_find() {
    let people = sample_people();
    let engine = SearchEngine::default().with_people(&people);

    for query in ["alice", "smith", "carol", "  BOBBY "] {
        assert_eq!(
            engine.person_exists(query),
            !engine.find_people_by_name(query, false).is_empty()
        );
    }
    assert!(!engine.person_exists("carol"));
}

#[test]
fn test_person_summary() {
    let people = sample_people();
    let engine = SearchEngine::default().with_people(&people);

    assert_eq!(
        engine.get_person_summary(&people[0]),
        "Bob Smith (1950-03-04-) [Living] [Bobby]"
    );
    assert_eq!(
        engine.get_person_summary(&people[1]),
        "Alice Smith (1922-07-01-1999-12-31) [Deceased]"
    );
}

#[test]
fn test_get_people_by_ids_keeps_collection_order() {
    let people = sample_people();
    let engine = SearchEngine::default().with_people(&people);

    let ids = vec![RecordId::Number(3), RecordId::Number(1), RecordId::Number(42)];
    let names: Vec<&str> = engine
        .get_people_by_ids(&ids)
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["Bob Smith", "Alice Jones"]);
}

#[test]
fn test_find_pets_by_name() {
    let pets = vec![Pet::new(1, "Rex"), Pet::new(2, "Rexy"), Pet::new(3, "Tom")];
    let engine = SearchEngine::default().with_pets(&pets);

    assert_eq!(engine.find_pets_by_name("rex", false).len(), 2);
    assert_eq!(engine.find_pets_by_name(" REX ", true).len(), 1);
    assert!(engine.pet_exists("tom"));
    assert!(!engine.pet_exists("felix"));
}

#[test]
fn test_photo_by_tag_matches_any_element_and_skips_untagged() {
    let photos = sample_photos();
    let engine = SearchEngine::default().with_photos(&photos);

    let results = engine.get_photo_by("tags", Some("jones"), false);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, RecordId::Number(1));

    // Photo 2 has no tags field at all and must not match even an empty query.
    let everything_tagged = engine.get_photo_by("tags", None, false);
    let ids: Vec<&RecordId> = everything_tagged.iter().map(|p| &p.id).collect();
    assert_eq!(ids, vec![&RecordId::Number(1), &RecordId::Number(3)]);
}

#[test]
fn test_photo_by_tag_exact_compares_whole_elements() {
    let photos = sample_photos();
    let engine = SearchEngine::default().with_photos(&photos);

    assert!(engine.get_photo_by_tag("bob", true).is_empty());
    assert_eq!(engine.get_photo_by_tag("BOB SMITH", true).len(), 1);
}

#[test]
fn test_photo_convenience_lookups() {
    let photos = sample_photos();
    let engine = SearchEngine::default().with_photos(&photos);

    assert_eq!(engine.get_photo_by_filename("house.png", true).len(), 1);
    assert!(engine.get_photo_by_filename("house", true).is_empty());
    assert_eq!(engine.get_photo_by_date("2020-06-01", true).len(), 1);
    assert_eq!(engine.get_photo_by_desc("lake", false).len(), 1);
}

#[test]
fn test_photo_by_unknown_key_uses_extra_fields() {
    let mut photo = Photo::new(9, "x.jpg");
    photo
        .extra
        .insert("year".to_string(), serde_json::Value::from(1987));
    let photos = vec![photo, Photo::new(10, "y.jpg")];
    let engine = SearchEngine::default().with_photos(&photos);

    let results = engine.get_photo_by("year", Some("1987"), true);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, RecordId::Number(9));
}

#[test]
fn test_date_range_is_inclusive_and_skips_bad_dates() {
    let stories = vec![
        Story {
            date: "2020-01-01".to_string(),
            ..Story::new(1, "New year")
        },
        Story {
            date: "2020-12-31".to_string(),
            ..Story::new(2, "Old year")
        },
        Story {
            date: "2021-01-01".to_string(),
            ..Story::new(3, "Too late")
        },
        Story {
            date: "not-a-date".to_string(),
            ..Story::new(4, "Undated")
        },
        Story::new(5, "No date at all"),
    ];
    let engine = SearchEngine::default().with_stories(&stories);

    let results = engine
        .get_stories_by_date_range("2020-01-01", "2020-12-31")
        .unwrap();
    let titles: Vec<&str> = results.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["New year", "Old year"]);
}

#[test]
fn test_date_range_rejects_bad_bounds() {
    let photos = sample_photos();
    let engine = SearchEngine::default().with_photos(&photos);

    let err = engine
        .get_photos_by_date_range("bad", "2020-12-31")
        .unwrap_err();
    assert!(matches!(err, KioskError::InvalidDate { ref value, .. } if value == "bad"));

    let err = engine
        .get_photos_by_date_range("2020-01-01", "2020/12/31")
        .unwrap_err();
    assert!(matches!(err, KioskError::InvalidDate { .. }));
}

#[test]
fn test_date_range_over_any_collection_and_key() {
    let people = sample_people();
    let engine = SearchEngine::default();

    let born_early = engine
        .get_items_by_date_range(&people, "1900-01-01", "1949-12-31", "birth_date")
        .unwrap();
    assert_eq!(born_early.len(), 1);
    assert_eq!(born_early[0].name, "Alice Smith");
}

#[test]
fn test_photo_date_range() {
    let photos = sample_photos();
    let engine = SearchEngine::default().with_photos(&photos);

    let results = engine
        .get_photos_by_date_range("1990-01-01", "2000-01-01")
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].file.as_deref(), Some("house.png"));
}

#[test]
fn test_quizzes_never_match_on_about() {
    let quizzes = vec![
        Quiz {
            about: "Bob Smith".to_string(),
            ..Quiz::new(1, "Where was Grandpa born?", "Ohio")
        },
        Quiz {
            alt_answer: "Bob".to_string(),
            ..Quiz::new(2, "Who built the shed?", "Robert")
        },
    ];
    let engine = SearchEngine::default().with_quizzes(&quizzes);

    let results = engine.find_quizzes_by_text("bob smith", false);
    assert!(results.is_empty());

    let results = engine.find_quizzes_by_text("bob", true);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, RecordId::Number(2));

    assert_eq!(engine.find_quizzes_by_text("grandpa", false).len(), 1);
}

#[test]
fn test_default_engine_is_empty() {
    let engine = SearchEngine::default();
    assert!(engine.find_people_by_name("", false).is_empty());
    assert!(engine.get_photo_by("tags", None, false).is_empty());
    assert!(engine
        .get_stories_by_date_range("2000-01-01", "2001-01-01")
        .unwrap()
        .is_empty());
}
