use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::info;

use crate::config::{load_config, save_config, KioskConfig};
use crate::errors::Result;
use crate::resolution::{Prompter, ReferenceResolver};
use crate::search::SearchEngine;
use crate::store::{JsonStore, RecordStore};
use crate::types::*;

/// Central orchestrator that owns the five collections of an archive.
pub struct Kiosk {
    people: JsonStore<Person>,
    pets: JsonStore<Pet>,
    stories: JsonStore<Story>,
    photos: JsonStore<Photo>,
    quizzes: JsonStore<Quiz>,
    config: KioskConfig,
    data_dir: PathBuf,
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl Kiosk {
    /// Initializes an archive in `data_dir`.
    ///
    /// Writes the configuration and creates an empty array file for every
    /// collection that does not have one yet. Existing files are kept.
    pub fn init(data_dir: &Path) -> Result<Self> {
        let config = load_config(data_dir)?;
        save_config(data_dir, &config)?;

        let kiosk = Self::load(data_dir, config)?;
        for collection in Collection::ALL {
            let path = kiosk.config.collection_path(data_dir, collection);
            if !path.exists() {
                kiosk.flush(collection)?;
            }
        }
        info!(data_dir = %data_dir.display(), "initialized archive");
        Ok(kiosk)
    }

    /// Opens the archive in `data_dir`. Missing collection files read as
    /// empty collections.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let config = load_config(data_dir)?;
        Self::load(data_dir, config)
    }

    /// Creates an archive that lives only in memory.
    pub fn in_memory() -> Self {
        Self {
            people: JsonStore::in_memory(),
            pets: JsonStore::in_memory(),
            stories: JsonStore::in_memory(),
            photos: JsonStore::in_memory(),
            quizzes: JsonStore::in_memory(),
            config: KioskConfig::default(),
            data_dir: PathBuf::new(),
        }
    }

    fn load(data_dir: &Path, config: KioskConfig) -> Result<Self> {
        Ok(Self {
            people: JsonStore::open(&config.collection_path(data_dir, Collection::People))?,
            pets: JsonStore::open(&config.collection_path(data_dir, Collection::Pets))?,
            stories: JsonStore::open(&config.collection_path(data_dir, Collection::Stories))?,
            photos: JsonStore::open(&config.collection_path(data_dir, Collection::Photos))?,
            quizzes: JsonStore::open(&config.collection_path(data_dir, Collection::Quizzes))?,
            config,
            data_dir: data_dir.to_path_buf(),
        })
    }

    fn flush(&self, collection: Collection) -> Result<()> {
        match collection {
            Collection::People => self.people.flush(),
            Collection::Pets => self.pets.flush(),
            Collection::Stories => self.stories.flush(),
            Collection::Photos => self.photos.flush(),
            Collection::Quizzes => self.quizzes.flush(),
        }
    }
}

// ---------------------------------------------------------------------------
// Data entry
// ---------------------------------------------------------------------------

impl Kiosk {
    /// Stores a person, then resolves the names in its relationship fields.
    ///
    /// A duplicate id fails before anything is resolved.
    pub fn add_person<P: Prompter + ?Sized>(
        &mut self,
        person: Person,
        prompter: &mut P,
    ) -> Result<ResolutionReport> {
        let references = person.name_references();
        self.people.add(person)?;
        ReferenceResolver::new(&mut self.people, prompter).resolve_fields(&references)
    }

    /// Stores a pet, then resolves its owners.
    pub fn add_pet<P: Prompter + ?Sized>(
        &mut self,
        pet: Pet,
        prompter: &mut P,
    ) -> Result<ResolutionReport> {
        let references = pet.name_references();
        self.pets.add(pet)?;
        ReferenceResolver::new(&mut self.people, prompter).resolve_fields(&references)
    }

    /// Stores a story, then resolves who it is about.
    pub fn add_story<P: Prompter + ?Sized>(
        &mut self,
        story: Story,
        prompter: &mut P,
    ) -> Result<ResolutionReport> {
        let references = story.name_references();
        self.stories.add(story)?;
        ReferenceResolver::new(&mut self.people, prompter).resolve_fields(&references)
    }

    /// Stores a photo, then resolves its tags.
    pub fn add_photo<P: Prompter + ?Sized>(
        &mut self,
        photo: Photo,
        prompter: &mut P,
    ) -> Result<ResolutionReport> {
        let references = photo.name_references();
        self.photos.add(photo)?;
        ReferenceResolver::new(&mut self.people, prompter).resolve_fields(&references)
    }

    /// Stores a quiz. Quizzes carry no person references.
    pub fn add_quiz(&mut self, quiz: Quiz) -> Result<()> {
        self.quizzes.add(quiz)
    }

    /// Merges `partial` onto a record.
    pub fn update(
        &mut self,
        collection: Collection,
        id: &RecordId,
        partial: &Map<String, Value>,
    ) -> Result<()> {
        match collection {
            Collection::People => self.people.update(id, partial),
            Collection::Pets => self.pets.update(id, partial),
            Collection::Stories => self.stories.update(id, partial),
            Collection::Photos => self.photos.update(id, partial),
            Collection::Quizzes => self.quizzes.update(id, partial),
        }
    }

    /// Deletes a record. References to it elsewhere are left as they are.
    pub fn delete(&mut self, collection: Collection, id: &RecordId) -> Result<()> {
        match collection {
            Collection::People => self.people.delete(id),
            Collection::Pets => self.pets.delete(id),
            Collection::Stories => self.stories.delete(id),
            Collection::Photos => self.photos.delete(id),
            Collection::Quizzes => self.quizzes.delete(id),
        }
    }

    /// Returns the id the next record of `collection` would get.
    pub fn next_id(&self, collection: Collection) -> RecordId {
        match collection {
            Collection::People => self.people.next_id(),
            Collection::Pets => self.pets.next_id(),
            Collection::Stories => self.stories.next_id(),
            Collection::Photos => self.photos.next_id(),
            Collection::Quizzes => self.quizzes.next_id(),
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl Kiosk {
    /// Returns a search engine over the current contents of every collection.
    pub fn search(&self) -> SearchEngine<'_> {
        SearchEngine::new(
            self.people.get_all(),
            self.pets.get_all(),
            self.stories.get_all(),
            self.photos.get_all(),
            self.quizzes.get_all(),
        )
    }

    /// Returns a single record as JSON, or `None` if the id is unknown.
    pub fn get_json(&self, collection: Collection, id: &RecordId) -> Result<Option<Value>> {
        let value = match collection {
            Collection::People => self.people.get_by_id(id).map(serde_json::to_value),
            Collection::Pets => self.pets.get_by_id(id).map(serde_json::to_value),
            Collection::Stories => self.stories.get_by_id(id).map(serde_json::to_value),
            Collection::Photos => self.photos.get_by_id(id).map(serde_json::to_value),
            Collection::Quizzes => self.quizzes.get_by_id(id).map(serde_json::to_value),
        };
        Ok(value.transpose()?)
    }

    /// Returns the number of records in each collection.
    pub fn stats(&self) -> ArchiveStats {
        ArchiveStats {
            people: self.people.len(),
            pets: self.pets.len(),
            stories: self.stories.len(),
            photos: self.photos.len(),
            quizzes: self.quizzes.len(),
        }
    }

    pub fn people(&self) -> &JsonStore<Person> {
        &self.people
    }

    pub fn pets(&self) -> &JsonStore<Pet> {
        &self.pets
    }

    pub fn stories(&self) -> &JsonStore<Story> {
        &self.stories
    }

    pub fn photos(&self) -> &JsonStore<Photo> {
        &self.photos
    }

    pub fn quizzes(&self) -> &JsonStore<Quiz> {
        &self.quizzes
    }

    /// Returns a reference to the current configuration.
    pub fn get_config(&self) -> &KioskConfig {
        &self.config
    }

    /// Returns the data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
