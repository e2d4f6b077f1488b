use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::config::LensFacing;

/// One still-capture request.
///
/// The mirror flag is fixed when the request is built: the sensor active at
/// construction time determines it, not the sensor active when the device
/// resolves the capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    /// Destination file the device should write the image to.
    pub destination: PathBuf,

    /// Horizontally mirror the saved image. Set iff the front sensor was
    /// active when the request was built.
    pub mirror: bool,
}

impl CaptureRequest {
    pub fn new(destination: PathBuf, facing: LensFacing) -> Self {
        Self {
            destination,
            mirror: facing == LensFacing::Front,
        }
    }
}

/// Metadata stored alongside a saved photo.
///
/// Serializable for the JSON sidecar written next to the image file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    pub id: String,
    pub created_at: String,
    pub file_path: String,
    pub mirrored: bool,
    pub lens_facing: LensFacing,
    pub mime_type: String,
}

impl PhotoMetadata {
    /// Build metadata at request-construction time. Everything except the
    /// final file path is fixed here.
    pub fn for_request(request: &CaptureRequest, facing: LensFacing, mime_type: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            file_path: request.destination.to_string_lossy().into_owned(),
            mirrored: request.mirror,
            lens_facing: facing,
            mime_type: mime_type.to_string(),
        }
    }

    /// Rewrite the file path for captures the runtime relocated.
    pub fn relocated(mut self, path: &Path) -> Self {
        self.file_path = path.to_string_lossy().into_owned();
        self
    }
}

/// A successfully saved still image.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedPhoto {
    pub path: PathBuf,
    pub metadata: PhotoMetadata,
}
