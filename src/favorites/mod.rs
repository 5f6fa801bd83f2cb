//! Favorites storage
//!
//! Liked places, kept as a JSON array in the XDG data directory
//! (~/.local/share/trander/favorites.json). Every mutation is written back
//! immediately.

use crate::config::defaults::APP_DIR_NAME;
use crate::error::{Error, Result};
use crate::places::Place;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const FAVORITES_FILE_NAME: &str = "favorites.json";

/// A saved place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: String,
    pub name: String,
    pub address: String,

    /// When the place was saved; absent in older files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
}

impl Favorite {
    /// Project a place into a favorite
    pub fn from_place(place: &Place) -> Self {
        Self {
            id: place.id.clone(),
            name: place.display_name().to_string(),
            address: place.display_address().to_string(),
            added_at: Some(Utc::now()),
        }
    }
}

/// Favorites storage manager
#[derive(Debug)]
pub struct FavoritesStore {
    entries: Vec<Favorite>,
    path: PathBuf,
}

impl FavoritesStore {
    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Storage("Could not determine data directory".to_string()))
    }

    /// Get the favorites file path
    pub fn favorites_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join(FAVORITES_FILE_NAME))
    }

    /// Load favorites from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(Self::favorites_path()?)
    }

    /// Load favorites from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        let entries = if path.exists() {
            read_entries(&path)?
        } else {
            Vec::new()
        };

        debug!("Loaded {} favorites from {}", entries.len(), path.display());
        Ok(Self { entries, path })
    }

    /// Write favorites to disk
    pub fn save(&self) -> Result<()> {
        write_entries(&self.path, &self.entries)
    }

    /// Add the place if absent, remove it if present
    ///
    /// Returns the new membership state. Nothing changes if the write fails.
    pub fn toggle(&mut self, place: &Place) -> Result<bool> {
        let mut entries = self.entries.clone();
        let now_favorite = match self.position(&place.id) {
            Some(idx) => {
                entries.remove(idx);
                false
            }
            None => {
                entries.push(Favorite::from_place(place));
                true
            }
        };

        self.commit(entries)?;
        Ok(now_favorite)
    }

    /// Remove by id; returns the removed favorite
    pub fn remove(&mut self, id: &str) -> Result<Option<Favorite>> {
        let Some(idx) = self.position(id) else {
            return Ok(None);
        };
        let mut entries = self.entries.clone();
        let removed = entries.remove(idx);
        self.commit(entries)?;
        Ok(Some(removed))
    }

    /// Remove all favorites
    pub fn clear(&mut self) -> Result<()> {
        self.commit(Vec::new())
    }

    /// Persist `entries`, then adopt them
    fn commit(&mut self, entries: Vec<Favorite>) -> Result<()> {
        write_entries(&self.path, &entries)?;
        self.entries = entries;
        Ok(())
    }

    pub fn list(&self) -> &[Favorite] {
        &self.entries
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|f| f.id == id)
    }
}

fn write_entries(path: &Path, entries: &[Favorite]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::Storage(format!("Failed to create data directory: {}", e)))?;
    }

    let content = serde_json::to_string_pretty(entries)
        .map_err(|e| Error::Storage(format!("Failed to serialize favorites: {}", e)))?;

    fs::write(path, content)
        .map_err(|e| Error::Storage(format!("Failed to write favorites file: {}", e)))
}

fn read_entries(path: &Path) -> Result<Vec<Favorite>> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Storage(format!("Failed to read favorites file: {}", e)))?;

    let mut entries: Vec<Favorite> = serde_json::from_str(&content)
        .map_err(|e| Error::Storage(format!("Failed to parse favorites file: {}", e)))?;

    // keep the first of any duplicate ids
    let mut seen = std::collections::HashSet::new();
    entries.retain(|f| seen.insert(f.id.clone()));
    Ok(entries)
}
