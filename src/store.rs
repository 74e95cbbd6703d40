//! JSON file storage for members, rooms and timing slots.
//!
//! Each collection lives in its own file inside a data directory:
//! `members.json`, `rooms.json` and `timings.json`, each holding a JSON
//! array. Reads are lenient: a missing or unreadable file is treated as an
//! empty collection. Writes replace the whole file with pretty-printed JSON.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Result, RosterError};
use crate::models::{Member, Room, TimingSlot};

/// A stored collection, keyed by logical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Members,
    Rooms,
    Timings,
}

impl Collection {
    /// All collections, in storage order.
    pub const ALL: [Collection; 3] = [Self::Members, Self::Rooms, Self::Timings];

    /// Logical name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Members => "members",
            Self::Rooms => "rooms",
            Self::Timings => "timings",
        }
    }

    /// File name inside the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Members => "members.json",
            Self::Rooms => "rooms.json",
            Self::Timings => "timings.json",
        }
    }
}

/// Directory-backed JSON store.
#[derive(Debug, Clone)]
pub struct DataStore {
    dir: PathBuf,
}

impl DataStore {
    /// Opens a store, creating the data directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| RosterError::io(&dir, e))?;
        debug!(dir = %dir.display(), "opened data store");
        Ok(Self { dir })
    }

    /// The data directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a collection file.
    pub fn path(&self, collection: Collection) -> PathBuf {
        self.dir.join(collection.file_name())
    }

    /// Reads a collection.
    ///
    /// Returns an empty list when the file is missing, unreadable, or does
    /// not hold a JSON array of `T`.
    pub fn load<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        let path = self.path(collection);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "could not read {} data",
                    collection.name()
                );
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<T>>(&text) {
            Ok(items) => items,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "could not parse {} data",
                    collection.name()
                );
                Vec::new()
            }
        }
    }

    /// Replaces a collection with `items`.
    pub fn save<T: Serialize>(&self, collection: Collection, items: &[T]) -> Result<()> {
        let path = self.path(collection);
        let json = serde_json::to_string_pretty(items).map_err(|source| RosterError::Encode {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|e| RosterError::io(&path, e))?;
        debug!(path = %path.display(), count = items.len(), "saved {}", collection.name());
        Ok(())
    }

    /// Creates any missing collection file.
    ///
    /// A missing file is copied from `defaults_dir` when present there,
    /// otherwise it is created holding `[]`. Existing files are left as is.
    pub fn ensure_defaults(&self, defaults_dir: Option<&Path>) -> Result<()> {
        for collection in Collection::ALL {
            let target = self.path(collection);
            if target.exists() {
                continue;
            }
            let source = defaults_dir.map(|d| d.join(collection.file_name()));
            match source {
                Some(source) if source.exists() => {
                    fs::copy(&source, &target).map_err(|e| RosterError::io(&source, e))?;
                    info!(from = %source.display(), to = %target.display(), "copied default data");
                }
                _ => {
                    fs::write(&target, "[]").map_err(|e| RosterError::io(&target, e))?;
                    info!(path = %target.display(), "created empty data file");
                }
            }
        }
        Ok(())
    }

    /// Reads all members.
    pub fn members(&self) -> Vec<Member> {
        self.load(Collection::Members)
    }

    /// Reads all rooms.
    pub fn rooms(&self) -> Vec<Room> {
        self.load(Collection::Rooms)
    }

    /// Reads all timing slots.
    pub fn timings(&self) -> Vec<TimingSlot> {
        self.load(Collection::Timings)
    }

    /// Replaces all members.
    pub fn save_members(&self, members: &[Member]) -> Result<()> {
        self.save(Collection::Members, members)
    }

    /// Replaces all rooms.
    pub fn save_rooms(&self, rooms: &[Room]) -> Result<()> {
        self.save(Collection::Rooms, rooms)
    }

    /// Replaces all timing slots.
    pub fn save_timings(&self, timings: &[TimingSlot]) -> Result<()> {
        self.save(Collection::Timings, timings)
    }
}
