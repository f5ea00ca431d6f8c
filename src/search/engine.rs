use crate::errors::{KioskError, Result};
use crate::types::*;

/// Photo fields with a dedicated lookup helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoField {
    File,
    Tags,
    Date,
    Desc,
}

#[allow(clippy::should_implement_trait)]
impl PhotoField {
    /// Returns the JSON key of this field.
    pub fn key(&self) -> &'static str {
        match self {
            PhotoField::File => "file",
            PhotoField::Tags => "tags",
            PhotoField::Date => "date",
            PhotoField::Desc => "desc",
        }
    }

    /// Whether lookups on this field compare whole values by default.
    ///
    /// File names and dates are looked up exactly; tags and descriptions by
    /// substring.
    pub fn default_exact(&self) -> bool {
        matches!(self, PhotoField::File | PhotoField::Date)
    }

    /// Parses a field key, returning `None` for keys without a helper.
    pub fn from_str(s: &str) -> Option<PhotoField> {
        match s {
            "file" => Some(PhotoField::File),
            "tags" => Some(PhotoField::Tags),
            "date" => Some(PhotoField::Date),
            "desc" => Some(PhotoField::Desc),
            _ => None,
        }
    }
}

/// Read-only search over borrowed views of the five collections.
///
/// The engine is a bundle of slices and costs nothing to build, so callers
/// build a fresh one from the live stores for every query and always see
/// the current records.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchEngine<'a> {
    people: &'a [Person],
    pets: &'a [Pet],
    stories: &'a [Story],
    photos: &'a [Photo],
    quizzes: &'a [Quiz],
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl<'a> SearchEngine<'a> {
    /// Creates an engine over the given collections.
    pub fn new(
        people: &'a [Person],
        pets: &'a [Pet],
        stories: &'a [Story],
        photos: &'a [Photo],
        quizzes: &'a [Quiz],
    ) -> Self {
        Self {
            people,
            pets,
            stories,
            photos,
            quizzes,
        }
    }

    /// Replaces the people view.
    pub fn with_people(mut self, people: &'a [Person]) -> Self {
        self.people = people;
        self
    }

    /// Replaces the pets view.
    pub fn with_pets(mut self, pets: &'a [Pet]) -> Self {
        self.pets = pets;
        self
    }

    /// Replaces the stories view.
    pub fn with_stories(mut self, stories: &'a [Story]) -> Self {
        self.stories = stories;
        self
    }

    /// Replaces the photos view.
    pub fn with_photos(mut self, photos: &'a [Photo]) -> Self {
        self.photos = photos;
        self
    }

    /// Replaces the quizzes view.
    pub fn with_quizzes(mut self, quizzes: &'a [Quiz]) -> Self {
        self.quizzes = quizzes;
        self
    }

    /// Returns the people this engine searches.
    pub fn people(&self) -> &'a [Person] {
        self.people
    }

    /// Returns the pets this engine searches.
    pub fn pets(&self) -> &'a [Pet] {
        self.pets
    }

    /// Returns the stories this engine searches.
    pub fn stories(&self) -> &'a [Story] {
        self.stories
    }

    /// Returns the photos this engine searches.
    pub fn photos(&self) -> &'a [Photo] {
        self.photos
    }

    /// Returns the quizzes this engine searches.
    pub fn quizzes(&self) -> &'a [Quiz] {
        self.quizzes
    }
}

// ---------------------------------------------------------------------------
// People and pets
// ---------------------------------------------------------------------------

impl<'a> SearchEngine<'a> {
    /// Returns every person whose name or nickname matches `name`.
    ///
    /// Matching ignores case and surrounding whitespace of the query. With
    /// `exact == false` the query only has to be contained in the field, so
    /// an empty query matches everyone.
    pub fn find_people_by_name(&self, name: &str, exact: bool) -> Vec<&'a Person> {
        let needle = normalize(name);
        self.people
            .iter()
            .filter(|person| {
                text_matches(&person.name, &needle, exact)
                    || text_matches(&person.nickname, &needle, exact)
            })
            .collect()
    }

    /// Returns `true` if a partial name match finds anyone.
    pub fn person_exists(&self, name: &str) -> bool {
        !self.find_people_by_name(name, false).is_empty()
    }

    /// Short one-line description used in listings and pickers.
    pub fn get_person_summary(&self, person: &Person) -> String {
        person_summary(person)
    }

    /// Returns the people whose id is in `ids`, in collection order.
    pub fn get_people_by_ids(&self, ids: &[RecordId]) -> Vec<&'a Person> {
        self.people
            .iter()
            .filter(|person| ids.contains(&person.id))
            .collect()
    }

    /// Same matching rules as people, against the pet name only.
    pub fn find_pets_by_name(&self, name: &str, exact: bool) -> Vec<&'a Pet> {
        let needle = normalize(name);
        self.pets
            .iter()
            .filter(|pet| text_matches(&pet.name, &needle, exact))
            .collect()
    }

    /// Returns `true` if a partial pet name match finds anything.
    pub fn pet_exists(&self, name: &str) -> bool {
        !self.find_pets_by_name(name, false).is_empty()
    }
}

// ---------------------------------------------------------------------------
// Photos
// ---------------------------------------------------------------------------

impl<'a> SearchEngine<'a> {
    /// Generic photo filter on the field `key`.
    ///
    /// - Photos without the field are skipped.
    /// - List fields (tags) match when any element matches.
    /// - Any other value is compared through its string form.
    ///
    /// A missing search value behaves like an empty string.
    pub fn get_photo_by(&self, key: &str, value: Option<&str>, exact: bool) -> Vec<&'a Photo> {
        let needle = normalize(value.unwrap_or_default());
        self.photos
            .iter()
            .filter(|photo| match photo.field(key) {
                None => false,
                Some(FieldValue::List(items)) => {
                    items.iter().any(|item| text_matches(item, &needle, exact))
                }
                Some(FieldValue::Text(text)) => text_matches(&text, &needle, exact),
            })
            .collect()
    }

    /// Looks photos up by file name.
    pub fn get_photo_by_filename(&self, filename: &str, exact: bool) -> Vec<&'a Photo> {
        self.get_photo_by(PhotoField::File.key(), Some(filename), exact)
    }

    /// Looks photos up by tag; any tag in the list may match.
    pub fn get_photo_by_tag(&self, tag: &str, exact: bool) -> Vec<&'a Photo> {
        self.get_photo_by(PhotoField::Tags.key(), Some(tag), exact)
    }

    /// Looks photos up by their `date` text.
    pub fn get_photo_by_date(&self, date: &str, exact: bool) -> Vec<&'a Photo> {
        self.get_photo_by(PhotoField::Date.key(), Some(date), exact)
    }

    /// Looks photos up by description.
    pub fn get_photo_by_desc(&self, desc: &str, exact: bool) -> Vec<&'a Photo> {
        self.get_photo_by(PhotoField::Desc.key(), Some(desc), exact)
    }
}

// ---------------------------------------------------------------------------
// Date ranges
// ---------------------------------------------------------------------------

impl<'a> SearchEngine<'a> {
    /// Returns the items whose `date_key` field falls within
    /// `start_date..=end_date`, in input order.
    ///
    /// Both bounds must be `YYYY-MM-DD`; otherwise the call fails before any
    /// item is looked at. Items with a missing or malformed date are left out
    /// without error.
    pub fn get_items_by_date_range<'r, T: Record>(
        &self,
        items: &'r [T],
        start_date: &str,
        end_date: &str,
        date_key: &str,
    ) -> Result<Vec<&'r T>> {
        let start = parse_bound(start_date)?;
        let end = parse_bound(end_date)?;

        Ok(items
            .iter()
            .filter(|item| match item.field(date_key) {
                Some(FieldValue::Text(text)) => match parse_date(&text) {
                    Some(date) => start <= date && date <= end,
                    None => false,
                },
                _ => false,
            })
            .collect())
    }

    /// Photos whose `date` falls within the inclusive range.
    pub fn get_photos_by_date_range(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<&'a Photo>> {
        self.get_items_by_date_range(self.photos, start_date, end_date, "date")
    }

    /// Stories whose `date` falls within the inclusive range.
    pub fn get_stories_by_date_range(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<&'a Story>> {
        self.get_items_by_date_range(self.stories, start_date, end_date, "date")
    }
}

// ---------------------------------------------------------------------------
// Quizzes
// ---------------------------------------------------------------------------

impl<'a> SearchEngine<'a> {
    /// Matches quiz question, answer and alternate answer text.
    ///
    /// `about` is not consulted: quizzes are never found
    /// through person names.
    pub fn find_quizzes_by_text(&self, text: &str, exact: bool) -> Vec<&'a Quiz> {
        let needle = normalize(text);
        self.quizzes
            .iter()
            .filter(|quiz| {
                [&quiz.question, &quiz.answer, &quiz.alt_answer]
                    .iter()
                    .any(|field| text_matches(field, &needle, exact))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Formats `"{name} ({birth}-{death}) [{status}] [{nickname}]"`, leaving out
/// the nickname bracket when there is no nickname.
pub fn person_summary(person: &Person) -> String {
    let status = if person.deceased { "Deceased" } else { "Living" };
    let mut summary = format!(
        "{} ({}-{}) [{}]",
        person.name, person.birth_date, person.death_date, status
    );
    if !person.nickname.is_empty() {
        summary.push_str(&format!(" [{}]", person.nickname));
    }
    summary
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Case-insensitive comparison of a stored value against an already
/// normalized needle.
fn text_matches(candidate: &str, needle: &str, exact: bool) -> bool {
    let candidate = candidate.to_lowercase();
    if exact {
        candidate == needle
    } else {
        candidate.contains(needle)
    }
}

fn parse_bound(value: &str) -> Result<chrono::NaiveDate> {
    parse_date(value).ok_or_else(|| KioskError::InvalidDate {
        value: value.to_string(),
        message: "invalid date format, use YYYY-MM-DD".to_string(),
    })
}
