use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::{KioskError, Result};
use crate::types::{Record, RecordId};

/// Key-value access to one collection of records.
///
/// Search and resolution only go through this trait, so the JSON backend
/// can be replaced without touching them.
pub trait RecordStore<T: Record> {
    /// Returns every record in stored order.
    fn get_all(&self) -> &[T];

    /// Adds a record. Fails with `DuplicateId` if the id is taken.
    fn add(&mut self, record: T) -> Result<()>;

    /// Merges the keys of `partial` onto the record with the given id.
    fn update(&mut self, id: &RecordId, partial: &Map<String, Value>) -> Result<()>;

    /// Removes the record with the given id.
    fn delete(&mut self, id: &RecordId) -> Result<()>;

    /// Retrieves a single record by id.
    fn get_by_id(&self, id: &RecordId) -> Option<&T> {
        self.get_all().iter().find(|record| record.id() == id)
    }

    /// Returns the next free integer id: one past the largest integer id,
    /// or `1` for a collection without integer ids.
    fn next_id(&self) -> RecordId {
        let max = self
            .get_all()
            .iter()
            .filter_map(|record| match record.id() {
                RecordId::Number(n) => Some(*n),
                RecordId::Text(_) => None,
            })
            .max()
            .unwrap_or(0);
        RecordId::Number(max + 1)
    }
}

/// Collection backed by a JSON array file.
///
/// Mutations are all-or-nothing: when the rewrite fails, neither the file nor
/// the in-memory records change.
#[derive(Debug, Clone)]
pub struct JsonStore<T> {
    path: Option<PathBuf>,
    records: Vec<T>,
}

impl<T: Record> JsonStore<T> {
    /// Opens the collection stored at `path`. A missing or blank file is an
    /// empty collection.
    pub fn open(path: &Path) -> Result<Self> {
        let records = if path.exists() {
            let contents = fs::read_to_string(path).map_err(|e| KioskError::Store {
                message: format!("failed to read {}: {e}", T::COLLECTION),
                path: path.display().to_string(),
            })?;
            if contents.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str::<Vec<T>>(&contents).map_err(|e| KioskError::Store {
                    message: format!("failed to parse {}: {e}", T::COLLECTION),
                    path: path.display().to_string(),
                })?
            }
        } else {
            Vec::new()
        };

        let store = Self {
            path: Some(path.to_path_buf()),
            records,
        };
        if let Some(id) = store.first_duplicate_id() {
            warn!(
                collection = T::COLLECTION.as_str(),
                %id,
                "store file contains duplicate ids; lookups return the first"
            );
        }
        debug!(
            collection = T::COLLECTION.as_str(),
            count = store.records.len(),
            path = %path.display(),
            "opened store"
        );
        Ok(store)
    }

    /// Creates a collection that lives only in memory and never touches disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            records: Vec::new(),
        }
    }

    /// Creates an in-memory collection pre-filled with `records`.
    ///
    /// Fails with `DuplicateId` if two records share an id.
    pub fn with_records(records: Vec<T>) -> Result<Self> {
        let store = Self {
            path: None,
            records,
        };
        match store.first_duplicate_id() {
            Some(id) => Err(duplicate::<T>(&id)),
            None => Ok(store),
        }
    }

    /// Returns the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Writes the current records to disk, creating the file if needed.
    pub fn flush(&self) -> Result<()> {
        self.write(&self.records)
    }

    fn first_duplicate_id(&self) -> Option<RecordId> {
        let mut seen = std::collections::HashSet::new();
        self.records
            .iter()
            .map(|record| record.id())
            .find(|id| !seen.insert(*id))
            .cloned()
    }

    fn position(&self, id: &RecordId) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    /// Persists `records` and, only on success, makes them current.
    fn commit(&mut self, records: Vec<T>) -> Result<()> {
        self.write(&records)?;
        self.records = records;
        Ok(())
    }

    /// Serializes the whole array with two-space indentation through a
    /// temporary file and a rename.
    fn write(&self, records: &[T]) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| KioskError::Store {
                    message: format!("failed to create data directory: {e}"),
                    path: parent.display().to_string(),
                })?;
            }
        }

        let json = serde_json::to_string_pretty(records)?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|e| KioskError::Store {
            message: format!("failed to write temporary file: {e}"),
            path: tmp_path.display().to_string(),
        })?;
        fs::rename(&tmp_path, path).map_err(|e| KioskError::Store {
            message: format!("failed to replace store file: {e}"),
            path: path.display().to_string(),
        })?;

        debug!(
            collection = T::COLLECTION.as_str(),
            count = records.len(),
            path = %path.display(),
            "saved store"
        );
        Ok(())
    }
}

impl<T: Record> RecordStore<T> for JsonStore<T> {
    fn get_all(&self) -> &[T] {
        &self.records
    }

    fn add(&mut self, record: T) -> Result<()> {
        if self.position(record.id()).is_some() {
            return Err(duplicate::<T>(record.id()));
        }
        let mut records = self.records.clone();
        records.push(record);
        self.commit(records)
    }

    fn update(&mut self, id: &RecordId, partial: &Map<String, Value>) -> Result<()> {
        let index = self.position(id).ok_or_else(|| not_found::<T>(id))?;

        let mut value = serde_json::to_value(&self.records[index])?;
        if let Value::Object(fields) = &mut value {
            for (key, new_value) in partial {
                fields.insert(key.clone(), new_value.clone());
            }
        }
        let updated: T = serde_json::from_value(value).map_err(|e| KioskError::Validation {
            message: format!("update of {} {id} produces an invalid record: {e}", T::COLLECTION),
        })?;

        if updated.id() != id && self.position(updated.id()).is_some() {
            return Err(duplicate::<T>(updated.id()));
        }

        let mut records = self.records.clone();
        records[index] = updated;
        self.commit(records)
    }

    fn delete(&mut self, id: &RecordId) -> Result<()> {
        let index = self.position(id).ok_or_else(|| not_found::<T>(id))?;
        let mut records = self.records.clone();
        records.remove(index);
        self.commit(records)
    }
}

fn duplicate<T: Record>(id: &RecordId) -> KioskError {
    KioskError::DuplicateId {
        collection: T::COLLECTION.as_str().to_string(),
        id: id.to_string(),
    }
}

fn not_found<T: Record>(id: &RecordId) -> KioskError {
    KioskError::NotFound {
        collection: T::COLLECTION.as_str().to_string(),
        id: id.to_string(),
    }
}
