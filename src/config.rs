use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{KioskError, Result};
use crate::types::Collection;

/// Name of the configuration file stored inside the data directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Data directory used when none is given on the command line.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Configuration for an archive data directory.
///
/// Maps each collection to the JSON file that holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KioskConfig {
    /// Schema version of the configuration.
    pub version: u32,
    pub people_file: String,
    pub pets_file: String,
    pub stories_file: String,
    pub photos_file: String,
    pub quizzes_file: String,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            version: 1,
            people_file: Collection::People.default_file_name(),
            pets_file: Collection::Pets.default_file_name(),
            stories_file: Collection::Stories.default_file_name(),
            photos_file: Collection::Photos.default_file_name(),
            quizzes_file: Collection::Quizzes.default_file_name(),
        }
    }
}

impl KioskConfig {
    /// Returns the file name configured for a collection.
    pub fn file_name(&self, collection: Collection) -> &str {
        match collection {
            Collection::People => &self.people_file,
            Collection::Pets => &self.pets_file,
            Collection::Stories => &self.stories_file,
            Collection::Photos => &self.photos_file,
            Collection::Quizzes => &self.quizzes_file,
        }
    }

    /// Returns the full path of a collection file inside `data_dir`.
    pub fn collection_path(&self, data_dir: &Path, collection: Collection) -> PathBuf {
        data_dir.join(self.file_name(collection))
    }
}

/// Returns the path to the configuration file within the data directory.
pub fn get_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILENAME)
}

/// Loads the configuration from disk.
///
/// If the configuration file does not exist, returns the default
/// configuration.
pub fn load_config(data_dir: &Path) -> Result<KioskConfig> {
    let config_path = get_config_path(data_dir);

    if !config_path.exists() {
        return Ok(KioskConfig::default());
    }

    let contents = fs::read_to_string(&config_path).map_err(|e| KioskError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    let config: KioskConfig =
        serde_json::from_str(&contents).map_err(|e| KioskError::Config {
            message: format!(
                "failed to parse config file '{}': {}",
                config_path.display(),
                e
            ),
        })?;

    Ok(config)
}

/// Saves the configuration to disk using an atomic write.
///
/// Writes to a temporary file first and then renames it to the final location.
pub fn save_config(data_dir: &Path, config: &KioskConfig) -> Result<()> {
    fs::create_dir_all(data_dir).map_err(|e| KioskError::Config {
        message: format!(
            "failed to create data directory '{}': {}",
            data_dir.display(),
            e
        ),
    })?;

    let config_path = get_config_path(data_dir);
    let tmp_path = config_path.with_extension("tmp");

    let json = serde_json::to_string_pretty(config).map_err(|e| KioskError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, &json).map_err(|e| KioskError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, &config_path).map_err(|e| KioskError::Config {
        message: format!(
            "failed to rename temporary config file '{}' to '{}': {}",
            tmp_path.display(),
            config_path.display(),
            e
        ),
    })?;

    Ok(())
}
