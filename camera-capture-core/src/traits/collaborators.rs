use std::path::Path;

use crate::models::geometry::Rotation;

/// Render target for the live preview.
///
/// The session only supplies this handle to the device runtime at bind
/// time; pixels never pass through this crate.
pub trait PreviewSurface: Send + Sync {
    /// Stable identifier of the underlying surface, for logging.
    fn surface_id(&self) -> String;
}

/// Media index announcement: makes a saved photo discoverable.
///
/// Invoked once per successful capture. Completion is the collaborator's
/// concern and never affects the capture result.
pub trait MediaScanner: Send + Sync {
    fn announce(&self, path: &Path, mime_type: &str);
}

/// Access to the display the session renders on.
pub trait DisplayMetrics: Send + Sync {
    /// Current pixel bounds as (width, height).
    fn bounds(&self) -> (u32, u32);

    /// Current display rotation.
    fn rotation(&self) -> Rotation;
}
