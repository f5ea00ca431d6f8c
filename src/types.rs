use std::fmt;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Calendar date format used by every date field in the archive.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` date, returning `None` for anything else.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Identifier of a record within its collection.
///
/// Kept untagged so that files written by hand with either numeric or string
/// ids load unchanged. `1` and `"1"` are distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    /// Parses command-line input: integers become `Number`, anything else `Text`.
    pub fn parse(input: &str) -> RecordId {
        let trimmed = input.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => RecordId::Number(n),
            Err(_) => RecordId::Text(trimmed.to_string()),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Number(value)
    }
}

impl From<i32> for RecordId {
    fn from(value: i32) -> Self {
        RecordId::Number(i64::from(value))
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId::Text(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

/// The five record collections kept by the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    People,
    Pets,
    Stories,
    Photos,
    Quizzes,
}

#[allow(clippy::should_implement_trait)]
impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::People,
        Collection::Pets,
        Collection::Stories,
        Collection::Photos,
        Collection::Quizzes,
    ];

    /// Returns the string representation of this collection.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::People => "people",
            Collection::Pets => "pets",
            Collection::Stories => "stories",
            Collection::Photos => "photos",
            Collection::Quizzes => "quizzes",
        }
    }

    /// Parses a collection name (plural or singular), returning `None` for
    /// unrecognized values.
    pub fn from_str(s: &str) -> Option<Collection> {
        match s.trim().to_lowercase().as_str() {
            "people" | "person" => Some(Collection::People),
            "pets" | "pet" => Some(Collection::Pets),
            "stories" | "story" => Some(Collection::Stories),
            "photos" | "photo" => Some(Collection::Photos),
            "quizzes" | "quiz" => Some(Collection::Quizzes),
            _ => None,
        }
    }

    /// Default file name of the collection inside the data directory.
    pub fn default_file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field value as seen by the generic filters: plain text or a list of
/// string-rendered elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

/// Renders a JSON value the way generic filters compare it. JSON `null`
/// counts as absent.
pub fn field_from_json(value: &Value) -> Option<FieldValue> {
    match value {
        Value::Null => None,
        Value::Array(items) => Some(FieldValue::List(items.iter().map(json_text).collect())),
        other => Some(FieldValue::Text(json_text(other))),
    }
}

fn json_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Splits a comma-separated name list into trimmed, non-empty names.
pub fn split_names(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Behaviour shared by every stored record type.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Collection this record type lives in.
    const COLLECTION: Collection;

    fn id(&self) -> &RecordId;

    /// Looks up a field by its JSON key. Returns `None` when the record has
    /// no such field.
    fn field(&self, key: &str) -> Option<FieldValue>;

    /// Free-text person references carried by this record, as
    /// `(field name, names)` pairs.
    fn name_references(&self) -> Vec<(&'static str, Vec<String>)> {
        Vec::new()
    }
}

fn text(value: &str) -> Option<FieldValue> {
    Some(FieldValue::Text(value.to_string()))
}

fn optional_text(value: &Option<String>) -> Option<FieldValue> {
    value.as_deref().and_then(text)
}

/// Accepts strings and renders numbers and booleans as text. `null` reads
/// as `None`; arrays and objects are rejected.
fn deserialize_optional_text<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value @ (Value::Array(_) | Value::Object(_)) => Err(serde::de::Error::custom(format!(
            "expected text, found {value}"
        ))),
        scalar => Ok(Some(json_text(&scalar))),
    }
}

fn deserialize_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_optional_text(deserializer)?.unwrap_or_default())
}

/// Accepts booleans, numbers and the strings `true`, `yes` and `1`.
fn deserialize_truthy<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "yes" | "1"
        ),
        _ => false,
    })
}

/// Accepts either a JSON array (elements rendered as strings) or a
/// comma-separated string.
fn deserialize_tags<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::String(s) => Some(split_names(&s)),
        Value::Array(items) => Some(items.iter().map(json_text).collect()),
        other => Some(vec![json_text(&other)]),
    })
}

/// A family member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: RecordId,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub nickname: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub birth_date: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub death_date: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub gender: String,
    /// Former names (maiden names and the like), comma separated.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub prev_names: String,
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub deceased: bool,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub parents: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub spouses: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub children: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub ex_spouses: String,
    /// Adopted children and stepchildren.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub nonbio_children: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub stories: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub photo_tags: String,
    /// Keys this version does not model; written back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Person {
    /// Creates a person with every optional field empty.
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            nickname: String::new(),
            birth_date: String::new(),
            death_date: String::new(),
            gender: String::new(),
            prev_names: String::new(),
            deceased: false,
            parents: String::new(),
            spouses: String::new(),
            children: String::new(),
            ex_spouses: String::new(),
            nonbio_children: String::new(),
            stories: String::new(),
            photo_tags: String::new(),
            extra: Map::new(),
        }
    }
}

impl Record for Person {
    const COLLECTION: Collection = Collection::People;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "id" => text(&self.id.to_string()),
            "name" => text(&self.name),
            "nickname" => text(&self.nickname),
            "birth_date" => text(&self.birth_date),
            "death_date" => text(&self.death_date),
            "gender" => text(&self.gender),
            "prev_names" => text(&self.prev_names),
            "deceased" => text(&self.deceased.to_string()),
            "parents" => text(&self.parents),
            "spouses" => text(&self.spouses),
            "children" => text(&self.children),
            "ex_spouses" => text(&self.ex_spouses),
            "nonbio_children" => text(&self.nonbio_children),
            "stories" => text(&self.stories),
            "photo_tags" => text(&self.photo_tags),
            other => self.extra.get(other).and_then(field_from_json),
        }
    }

    fn name_references(&self) -> Vec<(&'static str, Vec<String>)> {
        vec![
            ("parents", split_names(&self.parents)),
            ("spouses", split_names(&self.spouses)),
            ("children", split_names(&self.children)),
            ("ex_spouses", split_names(&self.ex_spouses)),
            ("nonbio_children", split_names(&self.nonbio_children)),
        ]
    }
}

/// A family pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: RecordId,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub species: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub breed: String,
    /// Owner names, comma separated.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub owners: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub birth_date: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub notes: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Pet {
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            species: String::new(),
            breed: String::new(),
            owners: String::new(),
            birth_date: String::new(),
            notes: String::new(),
            extra: Map::new(),
        }
    }
}

impl Record for Pet {
    const COLLECTION: Collection = Collection::Pets;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "id" => text(&self.id.to_string()),
            "name" => text(&self.name),
            "species" => text(&self.species),
            "breed" => text(&self.breed),
            "owners" => text(&self.owners),
            "birth_date" => text(&self.birth_date),
            "notes" => text(&self.notes),
            other => self.extra.get(other).and_then(field_from_json),
        }
    }

    fn name_references(&self) -> Vec<(&'static str, Vec<String>)> {
        vec![("owners", split_names(&self.owners))]
    }
}

/// A written family story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: RecordId,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub title: String,
    /// Names of the people the story is about, comma separated.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub about: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub text: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub date: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Story {
    pub fn new(id: impl Into<RecordId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            about: String::new(),
            text: String::new(),
            date: String::new(),
            extra: Map::new(),
        }
    }
}

impl Record for Story {
    const COLLECTION: Collection = Collection::Stories;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "id" => text(&self.id.to_string()),
            "title" => text(&self.title),
            "about" => text(&self.about),
            "text" => text(&self.text),
            "date" => text(&self.date),
            other => self.extra.get(other).and_then(field_from_json),
        }
    }

    fn name_references(&self) -> Vec<(&'static str, Vec<String>)> {
        vec![("about", split_names(&self.about))]
    }
}

/// A photo and its metadata.
///
/// Fields are optional so that a photo without, say, a `tags` key is told
/// apart from one with an empty tag list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: RecordId,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub file: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,
    /// People (or other labels) shown in the photo.
    #[serde(
        default,
        deserialize_with = "deserialize_tags",
        skip_serializing_if = "Option::is_none"
    )]
    pub tags: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub desc: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Photo {
    pub fn new(id: impl Into<RecordId>, file: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            file: Some(file.into()),
            date: None,
            tags: None,
            desc: None,
            extra: Map::new(),
        }
    }
}

impl Record for Photo {
    const COLLECTION: Collection = Collection::Photos;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "id" => text(&self.id.to_string()),
            "file" => optional_text(&self.file),
            "date" => optional_text(&self.date),
            "tags" => self.tags.clone().map(FieldValue::List),
            "desc" => optional_text(&self.desc),
            other => self.extra.get(other).and_then(field_from_json),
        }
    }

    fn name_references(&self) -> Vec<(&'static str, Vec<String>)> {
        let names = self
            .tags
            .iter()
            .flatten()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();
        vec![("tags", names)]
    }
}

/// A quiz question shown on the kiosk.
///
/// Quizzes never take part in person-name matching, so `about` is not a
/// name reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: RecordId,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub question: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub answer: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub alt_answer: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub about: String,
    /// Marks a humorous question.
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub joke: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Quiz {
    pub fn new(
        id: impl Into<RecordId>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            answer: answer.into(),
            alt_answer: String::new(),
            about: String::new(),
            joke: false,
            extra: Map::new(),
        }
    }
}

impl Record for Quiz {
    const COLLECTION: Collection = Collection::Quizzes;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "id" => text(&self.id.to_string()),
            "question" => text(&self.question),
            "answer" => text(&self.answer),
            "alt_answer" => text(&self.alt_answer),
            "about" => text(&self.about),
            "joke" => text(&self.joke.to_string()),
            other => self.extra.get(other).and_then(field_from_json),
        }
    }
}

/// Per-collection record counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveStats {
    pub people: usize,
    pub pets: usize,
    pub stories: usize,
    pub photos: usize,
    pub quizzes: usize,
}

/// A reference that was linked to exactly one person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedReference {
    /// Field the name was found in (e.g. `parents`).
    pub field: String,
    /// The name as typed by the operator.
    pub name: String,
    pub person_id: RecordId,
}

/// Outcome of a reference resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub resolved: Vec<ResolvedReference>,
    /// Names that still match nobody after the creation prompts.
    pub unresolved: Vec<String>,
    /// Ids of people created during the pass.
    pub created: Vec<RecordId>,
}

impl ResolutionReport {
    /// Returns `true` when every referenced name ended up linked.
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}
