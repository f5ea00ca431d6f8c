//! Plain-text and JSON renderings of records for the command line.

use serde::Serialize;

use crate::search::person_summary;
use crate::types::*;

/// Formats a list of people, one summary line each, prefixed by id.
pub fn format_people(people: &[&Person]) -> String {
    people
        .iter()
        .map(|person| format!("#{} {}", person.id, person_summary(person)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_pets(pets: &[&Pet]) -> String {
    pets.iter()
        .map(|pet| {
            let mut line = format!("#{} {}", pet.id, pet.name);
            let kind: Vec<&str> = [pet.species.as_str(), pet.breed.as_str()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect();
            if !kind.is_empty() {
                line.push_str(&format!(" ({})", kind.join(", ")));
            }
            if !pet.owners.is_empty() {
                line.push_str(&format!(" - owners: {}", pet.owners));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_stories(stories: &[&Story]) -> String {
    stories
        .iter()
        .map(|story| {
            let mut line = format!("#{} {}", story.id, story.title);
            if !story.date.is_empty() {
                line.push_str(&format!(" [{}]", story.date));
            }
            if !story.about.is_empty() {
                line.push_str(&format!(" - about: {}", story.about));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_photos(photos: &[&Photo]) -> String {
    photos
        .iter()
        .map(|photo| {
            let mut line = format!("#{} {}", photo.id, photo.file.as_deref().unwrap_or("?"));
            if let Some(date) = &photo.date {
                line.push_str(&format!(" [{}]", date));
            }
            if let Some(tags) = &photo.tags {
                if !tags.is_empty() {
                    line.push_str(&format!(" - tags: {}", tags.join(", ")));
                }
            }
            if let Some(desc) = &photo.desc {
                if !desc.is_empty() {
                    line.push_str(&format!("\n  {}", desc));
                }
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_quizzes(quizzes: &[&Quiz]) -> String {
    quizzes
        .iter()
        .map(|quiz| {
            let mut line = format!("#{} Q: {}\n  A: {}", quiz.id, quiz.question, quiz.answer);
            if !quiz.alt_answer.is_empty() {
                line.push_str(&format!(" (or: {})", quiz.alt_answer));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Describes the outcome of a resolution pass.
pub fn format_report(report: &ResolutionReport) -> String {
    let mut out = String::new();
    for link in &report.resolved {
        out.push_str(&format!(
            "  {}: {} -> #{}\n",
            link.field, link.name, link.person_id
        ));
    }
    if !report.created.is_empty() {
        let ids: Vec<String> = report.created.iter().map(|id| format!("#{id}")).collect();
        out.push_str(&format!("  created: {}\n", ids.join(", ")));
    }
    if !report.unresolved.is_empty() {
        out.push_str(&format!("  unresolved: {}\n", report.unresolved.join(", ")));
    }
    out
}

/// Formats any serializable value as pretty-printed JSON.
pub fn format_as_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_people_prefixes_id() {
        let person = Person {
            nickname: "Bobby".to_string(),
            ..Person::new(1, "Bob Smith")
        };
        assert_eq!(format_people(&[&person]), "#1 Bob Smith (-) [Living] [Bobby]");
    }

    #[test]
    fn test_format_report_lists_unresolved() {
        let report = ResolutionReport {
            resolved: vec![ResolvedReference {
                field: "parents".to_string(),
                name: "Bob".to_string(),
                person_id: RecordId::Number(2),
            }],
            unresolved: vec!["Carol".to_string()],
            created: vec![],
        };
        let text = format_report(&report);
        assert!(text.contains("parents: Bob -> #2"));
        assert!(text.contains("unresolved: Carol"));
        assert!(!text.contains("created"));
    }

    #[test]
    fn test_format_photos_without_optional_fields() {
        let photo = Photo {
            file: None,
            ..Photo::new(4, "x.jpg")
        };
        assert_eq!(format_photos(&[&photo]), "#4 ?");
    }

    #[test]
    fn test_json_output() {
        let pet = Pet::new(1, "Rex");
        let parsed: serde_json::Value = serde_json::from_str(&format_as_json(&[&pet])).unwrap();
        assert_eq!(parsed[0]["name"], "Rex");
    }
}
