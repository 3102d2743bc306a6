//! Side-file storage for photo binaries
//!
//! Photo records in the entity store only carry a filename; the bytes live
//! in the photos directory under that name.
//!
//! Bulk replacement (restore) writes into a staging directory first and
//! only moves files into place once the new store is committed.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::{TraxError, TraxResult};

use super::file_io::write_bytes_atomic;

/// Subdirectory of the photo directory holding staged payloads
const STAGING_DIR: &str = ".restore-staging";

/// Reads and writes photo payloads by filename
#[derive(Debug, Clone)]
pub struct PhotoFiles {
    dir: PathBuf,
}

impl PhotoFiles {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Resolve a filename inside the photo directory
    ///
    /// Rejects names that could escape the directory.
    pub fn path_for(&self, filename: &str) -> TraxResult<PathBuf> {
        validate_filename(filename)?;
        Ok(self.dir.join(filename))
    }

    pub fn exists(&self, filename: &str) -> bool {
        self.path_for(filename).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Read a photo's bytes
    pub fn read(&self, filename: &str) -> TraxResult<Vec<u8>> {
        let path = self.path_for(filename)?;
        fs::read(&path).map_err(|e| {
            TraxError::Io(format!("Failed to read photo {}: {}", path.display(), e))
        })
    }

    /// Write a photo's bytes, replacing any existing file
    pub fn write(&self, filename: &str, bytes: &[u8]) -> TraxResult<()> {
        let path = self.path_for(filename)?;
        write_bytes_atomic(&path, bytes)
    }

    /// Delete a photo file. A file that is already gone is not an error.
    pub fn remove(&self, filename: &str) -> TraxResult<()> {
        let path = self.path_for(filename)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TraxError::Io(format!(
                "Failed to delete photo {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn staging_dir(&self) -> PathBuf {
        self.dir.join(STAGING_DIR)
    }

    /// Write a payload to the staging area without touching the live file
    pub fn stage(&self, filename: &str, bytes: &[u8]) -> TraxResult<()> {
        validate_filename(filename)?;
        let staging = self.staging_dir();
        fs::create_dir_all(&staging).map_err(|e| {
            TraxError::Backup(format!(
                "Failed to create staging directory {}: {}",
                staging.display(),
                e
            ))
        })?;
        write_bytes_atomic(staging.join(filename), bytes)
            .map_err(|e| TraxError::Backup(format!("Failed to stage photo {}: {}", filename, e)))
    }

    /// Move every staged payload over its live file, then drop the staging area
    pub fn promote_staged(&self) -> TraxResult<usize> {
        let staging = self.staging_dir();
        if !staging.exists() {
            return Ok(0);
        }

        let entries = fs::read_dir(&staging).map_err(|e| {
            TraxError::Backup(format!("Failed to read {}: {}", staging.display(), e))
        })?;

        let mut promoted = 0;
        for entry in entries {
            let entry = entry.map_err(|e| TraxError::Backup(e.to_string()))?;
            let target = self.dir.join(entry.file_name());
            fs::rename(entry.path(), &target).map_err(|e| {
                TraxError::Backup(format!(
                    "Failed to move photo into {}: {}",
                    target.display(),
                    e
                ))
            })?;
            promoted += 1;
        }

        self.discard_staged()?;
        Ok(promoted)
    }

    /// Delete anything left in the staging area
    pub fn discard_staged(&self) -> TraxResult<()> {
        match fs::remove_dir_all(self.staging_dir()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TraxError::Backup(format!(
                "Failed to clear photo staging area: {}",
                e
            ))),
        }
    }

    pub fn has_staged(&self) -> bool {
        self.staging_dir().exists()
    }
}

fn validate_filename(filename: &str) -> TraxResult<()> {
    let invalid = filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename == STAGING_DIR
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains('\0');

    if invalid {
        return Err(TraxError::Validation(format!(
            "Invalid photo filename: '{}'",
            filename
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_read_remove() {
        let temp_dir = TempDir::new().unwrap();
        let files = PhotoFiles::new(temp_dir.path().join("photos"));

        files.write("front.jpg", b"jpeg-bytes").unwrap();
        assert!(files.exists("front.jpg"));
        assert_eq!(files.read("front.jpg").unwrap(), b"jpeg-bytes");

        files.remove("front.jpg").unwrap();
        assert!(!files.exists("front.jpg"));

        // Removing again is fine
        files.remove("front.jpg").unwrap();
    }

    #[test]
    fn test_read_missing_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let files = PhotoFiles::new(temp_dir.path().to_path_buf());
        assert!(files.read("missing.jpg").is_err());
    }

    #[test]
    fn test_staged_payload_replaces_live_file_only_on_promote() {
        let temp_dir = TempDir::new().unwrap();
        let files = PhotoFiles::new(temp_dir.path().join("photos"));
        files.write("front.jpg", &[1, 2, 3]).unwrap();

        files.stage("front.jpg", &[9, 9, 9]).unwrap();
        files.stage("back.jpg", &[]).unwrap();
        assert_eq!(files.read("front.jpg").unwrap(), vec![1, 2, 3]);
        assert!(!files.exists("back.jpg"));

        assert_eq!(files.promote_staged().unwrap(), 2);
        assert_eq!(files.read("front.jpg").unwrap(), vec![9, 9, 9]);
        assert_eq!(files.read("back.jpg").unwrap(), Vec::<u8>::new());
        assert!(!files.has_staged());
    }

    #[test]
    fn test_discard_staged_keeps_live_files() {
        let temp_dir = TempDir::new().unwrap();
        let files = PhotoFiles::new(temp_dir.path().join("photos"));
        files.write("front.jpg", &[1, 2, 3]).unwrap();

        files.stage("front.jpg", &[9, 9, 9]).unwrap();
        files.discard_staged().unwrap();

        assert!(!files.has_staged());
        assert_eq!(files.read("front.jpg").unwrap(), vec![1, 2, 3]);
        assert_eq!(files.promote_staged().unwrap(), 0);
    }

    #[test]
    fn test_rejects_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let files = PhotoFiles::new(temp_dir.path().to_path_buf());

        assert!(files.path_for("../escape.jpg").unwrap_err().is_validation());
        assert!(files.path_for("a/b.jpg").is_err());
        assert!(files.path_for("").is_err());
        assert!(files.path_for("..").is_err());
        assert!(files.path_for(STAGING_DIR).is_err());
    }
}
