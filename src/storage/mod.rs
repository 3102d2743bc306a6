//! Storage layer for Console Trax
//!
//! All entities live in in-memory repositories and are persisted together as
//! one JSON document (`data/store.json`), written atomically on every commit.
//! Photo binaries are side files managed by [`PhotoFiles`].

pub mod file_io;
pub mod init;
pub mod owned;
pub mod parts;
pub mod photo_files;
pub mod supplies;
pub mod units;

pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use owned::{OwnedRepository, UnitOwned};
pub use parts::PartRepository;
pub use photo_files::PhotoFiles;
pub use supplies::SupplyRepository;
pub use units::UnitRepository;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::paths::TraxPaths;
use crate::error::{TraxError, TraxResult};
use crate::models::{
    Part, PartId, PartUse, Photo, Supply, Task, TimeEntry, Unit, UnitId,
};

/// Current version of the store document layout
pub const STORE_SCHEMA_VERSION: u32 = 1;

/// The persisted form of the whole entity store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default = "default_store_schema")]
    pub schema_version: u32,
    #[serde(default)]
    pub units: Vec<Unit>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub time_entries: Vec<TimeEntry>,
    #[serde(default)]
    pub part_uses: Vec<PartUse>,
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default)]
    pub supplies: Vec<Supply>,
}

fn default_store_schema() -> u32 {
    STORE_SCHEMA_VERSION
}

impl StoreDocument {
    pub fn empty() -> Self {
        Self {
            schema_version: STORE_SCHEMA_VERSION,
            ..Default::default()
        }
    }
}

/// Everything removed by a cascading unit delete
#[derive(Debug, Clone)]
pub struct RemovedUnit {
    pub unit: Unit,
    pub tasks: Vec<Task>,
    pub photos: Vec<Photo>,
    pub time_entries: Vec<TimeEntry>,
    pub part_uses: Vec<PartUse>,
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: TraxPaths,
    pub units: UnitRepository,
    pub tasks: OwnedRepository<Task>,
    pub photos: OwnedRepository<Photo>,
    pub time_entries: OwnedRepository<TimeEntry>,
    pub part_uses: OwnedRepository<PartUse>,
    pub parts: PartRepository,
    pub supplies: SupplyRepository,
    photo_files: PhotoFiles,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: TraxPaths) -> Result<Self, TraxError> {
        paths.ensure_directories()?;

        Ok(Self {
            units: UnitRepository::new(),
            tasks: OwnedRepository::new(),
            photos: OwnedRepository::new(),
            time_entries: OwnedRepository::new(),
            part_uses: OwnedRepository::new(),
            parts: PartRepository::new(),
            supplies: SupplyRepository::new(),
            photo_files: PhotoFiles::new(paths.photos_dir()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &TraxPaths {
        &self.paths
    }

    /// Photo side-file store
    pub fn photo_files(&self) -> &PhotoFiles {
        &self.photo_files
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), TraxError> {
        let doc: StoreDocument = read_json(self.paths.store_file())?;
        if doc.schema_version > STORE_SCHEMA_VERSION {
            return Err(TraxError::Storage(format!(
                "Store was written by a newer version (schema {}, supported {})",
                doc.schema_version, STORE_SCHEMA_VERSION
            )));
        }
        self.install(doc)?;
        debug!(units = self.units.count()?, parts = self.parts.count()?, "loaded store");
        Ok(())
    }

    /// Capture the current state of every repository
    pub fn snapshot(&self) -> Result<StoreDocument, TraxError> {
        Ok(StoreDocument {
            schema_version: STORE_SCHEMA_VERSION,
            units: self.units.get_all()?,
            tasks: self.tasks.get_all()?,
            photos: self.photos.get_all()?,
            time_entries: self.time_entries.get_all()?,
            part_uses: self.part_uses.get_all()?,
            parts: self.parts.get_all()?,
            supplies: self.supplies.get_all()?,
        })
    }

    /// Replace every repository's contents with a document
    pub fn install(&self, doc: StoreDocument) -> Result<(), TraxError> {
        self.units.replace_all(doc.units)?;
        self.tasks.replace_all(doc.tasks)?;
        self.photos.replace_all(doc.photos)?;
        self.time_entries.replace_all(doc.time_entries)?;
        self.part_uses.replace_all(doc.part_uses)?;
        self.parts.replace_all(doc.parts)?;
        self.supplies.replace_all(doc.supplies)?;
        Ok(())
    }

    /// Empty every repository (in memory only until the next commit)
    pub fn wipe_all(&self) -> Result<(), TraxError> {
        self.install(StoreDocument::empty())
    }

    /// Persist the current state as one atomic write
    pub fn commit(&self) -> Result<(), TraxError> {
        let doc = self.snapshot()?;
        write_json_atomic(self.paths.store_file(), &doc)
    }

    /// Run a set of mutations as one unit of work
    ///
    /// The closure's changes are committed together. If the closure or the
    /// commit fails, the in-memory state is reset to what it was before the
    /// call and the error is returned.
    pub fn transaction<F, R>(&self, f: F) -> TraxResult<R>
    where
        F: FnOnce(&Storage) -> TraxResult<R>,
    {
        let before = self.snapshot()?;

        match f(self).and_then(|value| self.commit().map(|_| value)) {
            Ok(value) => Ok(value),
            Err(e) => {
                if let Err(rollback_err) = self.install(before) {
                    error!(error = %rollback_err, "failed to roll back in-memory state");
                }
                debug!(error = %e, "transaction rolled back");
                Err(e)
            }
        }
    }

    /// Remove a unit and everything it owns
    ///
    /// Part uses are dropped without crediting stock back. Photo side files
    /// are left for the caller to remove once the commit succeeds.
    pub fn delete_unit(&self, id: UnitId) -> Result<RemovedUnit, TraxError> {
        let unit = self
            .units
            .get(id)?
            .ok_or_else(|| TraxError::unit_not_found(id.to_string()))?;

        let removed = RemovedUnit {
            tasks: self.tasks.delete_for_unit(id)?,
            photos: self.photos.delete_for_unit(id)?,
            time_entries: self.time_entries.delete_for_unit(id)?,
            part_uses: self.part_uses.delete_for_unit(id)?,
            unit,
        };
        self.units.delete(id)?;

        info!(
            unit = %removed.unit.title,
            tasks = removed.tasks.len(),
            photos = removed.photos.len(),
            time_entries = removed.time_entries.len(),
            part_uses = removed.part_uses.len(),
            "deleted unit"
        );
        Ok(removed)
    }

    /// Remove a part, detaching it from every use that references it
    ///
    /// Returns the removed part and how many uses were detached.
    pub fn delete_part(&self, id: PartId) -> Result<(Part, usize), TraxError> {
        let part = self
            .parts
            .get(id)?
            .ok_or_else(|| TraxError::part_not_found(id.to_string()))?;

        let detached = self
            .part_uses
            .modify_where(|u| u.part_id == Some(id), |u| u.part_id = None)?;
        self.parts.delete(id)?;

        Ok((part, detached))
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}
