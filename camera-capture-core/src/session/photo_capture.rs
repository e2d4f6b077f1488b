use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::capture::{CaptureRequest, PhotoMetadata, SavedPhoto};
use crate::models::config::LensFacing;
use crate::models::diagnostics::SessionDiagnostics;
use crate::storage::{metadata, output};
use crate::traits::camera_provider::CameraHandle;
use crate::traits::collaborators::MediaScanner;

use super::executor::CameraExecutor;
use super::state_monitor::CameraStateMonitor;

/// Coordinates still-photo capture: destination naming, metadata tagging,
/// and the single-resolution hand-off of the result.
///
/// Each request resolves exactly once, to a saved photo or a failure,
/// through the session observers. Failures are never retried here.
pub struct PhotoCapture {
    output_directory: PathBuf,
    scanner: Arc<dyn MediaScanner>,
    executor: CameraExecutor,
    monitor: Arc<CameraStateMonitor>,
    diagnostics: Arc<Mutex<SessionDiagnostics>>,
}

impl PhotoCapture {
    pub fn new(
        output_directory: PathBuf,
        scanner: Arc<dyn MediaScanner>,
        executor: CameraExecutor,
        monitor: Arc<CameraStateMonitor>,
        diagnostics: Arc<Mutex<SessionDiagnostics>>,
    ) -> Self {
        Self {
            output_directory,
            scanner,
            executor,
            monitor,
            diagnostics,
        }
    }

    /// Begin one capture on the given camera. Returns the destination path
    /// chosen for the request; the outcome arrives through the observers.
    ///
    /// The mirror flag and lens facing are sampled here, not when the
    /// device resolves the capture.
    pub fn capture(&self, camera: Arc<dyn CameraHandle>, facing: LensFacing) -> PathBuf {
        let destination = output::timestamped_photo_path(&self.output_directory);
        let request = CaptureRequest::new(destination.clone(), facing);
        let sampled = PhotoMetadata::for_request(&request, facing, output::mime_for_path(&destination));

        let scanner = Arc::clone(&self.scanner);
        let monitor = Arc::clone(&self.monitor);
        let diagnostics = Arc::clone(&self.diagnostics);
        let fallback = request.destination.clone();

        // The blocking device call runs on the worker, off the owning
        // context.
        self.executor.execute(move || {
            camera.take_picture(
                request,
                Box::new(move |outcome| match outcome {
                    Ok(saved_location) => {
                        let path = saved_location.unwrap_or(fallback);
                        let photo = SavedPhoto {
                            metadata: sampled.relocated(&path),
                            path,
                        };
                        log::debug!("photo capture succeeded: {}", photo.path.display());

                        if let Err(e) = metadata::write_sidecar(&photo.metadata, &photo.path) {
                            log::warn!("metadata sidecar not written: {}", e);
                        }
                        scanner.announce(&photo.path, &photo.metadata.mime_type);

                        diagnostics.lock().captures_succeeded += 1;
                        for observer in monitor.observers() {
                            observer.on_photo_saved(&photo);
                        }
                    }
                    Err(failure) => {
                        log::error!("photo capture failed: {}", failure);
                        diagnostics.lock().captures_failed += 1;
                        for observer in monitor.observers() {
                            observer.on_capture_failed(&failure);
                        }
                    }
                }),
            );
        });

        destination
    }
}
