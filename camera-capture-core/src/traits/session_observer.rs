use crate::models::capture::SavedPhoto;
use crate::models::error::CaptureFailure;
use crate::models::state::{CameraError, CameraState, RecoveryHint};

/// Event observer for camera session notifications.
///
/// State and error notifications fire from whichever thread delivers the
/// device-runtime callback; capture notifications fire from the background
/// worker. All are fire-and-forget; implementations should marshal to the
/// UI thread if needed and must not block.
pub trait CameraObserver: Send + Sync {
    /// Called for every device state notification, including repeats.
    fn on_state_changed(&self, state: CameraState);

    /// Called when a state notification carries an error, after the state
    /// notification for the same update.
    fn on_camera_error(&self, error: CameraError, recovery: RecoveryHint);

    /// Called when a still capture completes and the photo is saved.
    fn on_photo_saved(&self, photo: &SavedPhoto);

    /// Called when a still capture fails.
    fn on_capture_failed(&self, failure: &CaptureFailure);
}
