//! Small key-value store persisted as a JSON object.
//!
//! Holds the last submitted city and country and the dark-mode flag.
//! Read once at startup; every setter writes through to disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CITY_KEY: &str = "user_city";
const COUNTRY_KEY: &str = "user_country";
const DARK_MODE_KEY: &str = "dark_mode";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl LocalStore {
    /// Opens the store; a missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match Self::read(&path) {
            Ok(values) => values,
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable store {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    fn read(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn write(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        self.write()
    }

    pub fn city(&self) -> Option<&str> {
        self.values.get(CITY_KEY).map(String::as_str)
    }

    pub fn country(&self) -> Option<&str> {
        self.values.get(COUNTRY_KEY).map(String::as_str)
    }

    pub fn set_location(&mut self, city: &str, country: &str) -> Result<(), StoreError> {
        self.values.insert(CITY_KEY.to_string(), city.to_string());
        self.set(COUNTRY_KEY, country.to_string())
    }

    /// `None` when the user has never toggled the theme.
    pub fn dark_mode(&self) -> Option<bool> {
        self.values.get(DARK_MODE_KEY).map(|v| v == "true")
    }

    pub fn set_dark_mode(&mut self, dark: bool) -> Result<(), StoreError> {
        self.set(DARK_MODE_KEY, dark.to_string())
    }
}
