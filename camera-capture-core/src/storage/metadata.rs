use std::fs;
use std::path::{Path, PathBuf};

use crate::models::capture::PhotoMetadata;
use crate::models::error::StorageError;

/// Write photo metadata as a JSON sidecar file.
///
/// Creates `{photo_path}.metadata.json` alongside the image.
pub fn write_sidecar(metadata: &PhotoMetadata, photo_path: &Path) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| StorageError(format!("failed to serialize metadata: {}", e)))?;
    fs::write(sidecar_path(photo_path), json)
        .map_err(|e| StorageError(format!("failed to write metadata: {}", e)))?;
    Ok(())
}

/// Read photo metadata from a JSON sidecar file.
pub fn read_sidecar(photo_path: &Path) -> Result<PhotoMetadata, StorageError> {
    let json = fs::read_to_string(sidecar_path(photo_path))
        .map_err(|e| StorageError(format!("failed to read metadata: {}", e)))?;
    let metadata: PhotoMetadata = serde_json::from_str(&json)
        .map_err(|e| StorageError(format!("failed to parse metadata: {}", e)))?;
    Ok(metadata)
}

fn sidecar_path(photo_path: &Path) -> PathBuf {
    photo_path.with_extension("metadata.json")
}
