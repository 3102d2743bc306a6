//! Photo CLI commands

use clap::Subcommand;
use std::path::PathBuf;

use crate::error::{TraxError, TraxResult};
use crate::services::UnitService;
use crate::storage::Storage;

use super::{resolve_unit, single_match};

/// Photo subcommands
#[derive(Subcommand)]
pub enum PhotoCommands {
    /// Attach a JPEG to a unit
    Add {
        /// Unit title or ID
        unit: String,
        /// Image file to copy in
        file: PathBuf,
        /// Caption
        #[arg(short, long, default_value = "")]
        caption: String,
    },
    /// Remove a photo and its image file
    Remove {
        /// Photo ID
        photo: String,
    },
}

/// Handle a photo command
pub fn handle_photo_command(storage: &Storage, cmd: PhotoCommands) -> TraxResult<()> {
    let service = UnitService::new(storage);

    match cmd {
        PhotoCommands::Add {
            unit,
            file,
            caption,
        } => {
            let found = resolve_unit(storage, &unit)?;
            let photo = service.add_photo_from_path(found.id, &file, &caption)?;
            println!("Added photo to {}: {}", found.title, photo.filename);
            println!("  ID: {}", photo.id);
        }

        PhotoCommands::Remove { photo } => {
            let matches = storage.photos.find_where(|p| p.id.matches(&photo))?;
            let found = single_match(matches, &photo, TraxError::photo_not_found)?;
            let removed = service.remove_photo(found.id)?;
            println!("Removed photo: {}", removed.filename);
        }
    }

    Ok(())
}
