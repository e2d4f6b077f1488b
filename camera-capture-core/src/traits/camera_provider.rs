use std::path::PathBuf;
use std::sync::Arc;

use crate::models::capture::CaptureRequest;
use crate::models::config::{CaptureMode, LensFacing, UseCaseConfig};
use crate::models::error::{BindError, CaptureFailure};
use crate::models::geometry::Rotation;
use crate::models::state::{CameraError, CameraState};
use crate::session::executor::CameraExecutor;

use super::camera_frame::FrameConsumer;
use super::collaborators::PreviewSurface;

/// Callback receiving the resolved camera provider. Fires exactly once; the
/// implementation may invoke it inline or later from another thread.
pub type ProviderReady =
    Box<dyn FnOnce(Result<Arc<dyn CameraProvider>, String>) + Send + 'static>;

/// Callback receiving the outcome of one still-capture request. Fires
/// exactly once. `Ok(None)` means the device wrote to the requested
/// destination; `Ok(Some(path))` is a runtime-chosen location.
pub type PhotoCallback =
    Box<dyn FnOnce(Result<Option<PathBuf>, CaptureFailure>) + Send + 'static>;

/// Entry point to the device runtime.
///
/// Injected at session construction instead of resolved from a
/// process-wide singleton.
pub trait ProviderSource: Send + Sync {
    /// Request the provider. `on_ready` fires exactly once, possibly from
    /// another thread.
    fn request_provider(&self, on_ready: ProviderReady);
}

/// Observer of raw device state notifications for a bound camera.
pub trait CameraStateObserver: Send + Sync {
    fn on_state_changed(&self, state: CameraState, error: Option<CameraError>);
}

/// Live preview pipeline: the device renders frames into `surface`.
pub struct PreviewUseCase {
    pub config: UseCaseConfig,
    pub surface: Arc<dyn PreviewSurface>,
}

/// Still-image pipeline.
pub struct CaptureUseCase {
    pub config: UseCaseConfig,
    pub mode: CaptureMode,
}

/// Per-frame analysis pipeline: the device delivers every available frame
/// to `consumer.analyze` on `executor`, serially, in arrival order.
pub struct AnalysisUseCase {
    pub config: UseCaseConfig,
    pub consumer: Arc<dyn FrameConsumer>,
    pub executor: CameraExecutor,
}

/// The three pipeline configurations bound to the device as one atomic
/// group.
pub struct UseCaseGroup {
    pub preview: PreviewUseCase,
    pub capture: CaptureUseCase,
    pub analysis: AnalysisUseCase,
}

/// A resolved camera provider: sensor probing, binding, unbinding.
pub trait CameraProvider: Send + Sync {
    /// Whether a sensor with the given facing is available.
    fn has_camera(&self, facing: LensFacing) -> bool;

    /// Atomically bind the use-case group to the sensor selected by
    /// `facing`. The caller must `unbind_all` first; providers reject
    /// overlapping binds.
    fn bind(
        &self,
        facing: LensFacing,
        group: UseCaseGroup,
    ) -> Result<Box<dyn CameraHandle>, BindError>;

    /// Release every bound use case. No-op when nothing is bound.
    fn unbind_all(&self);
}

/// A camera with a bound use-case group.
pub trait CameraHandle: Send + Sync {
    /// Subscribe to device state notifications. The most recent update, if
    /// any, is replayed to the new observer.
    fn observe_state(&self, observer: Arc<dyn CameraStateObserver>);

    /// Update the target rotation of the capture and analysis pipelines in
    /// place. The preview pipeline is not reconstructed.
    fn set_target_rotation(&self, rotation: Rotation);

    /// Begin one still capture. The device resolves `on_done` exactly once.
    fn take_picture(&self, request: CaptureRequest, on_done: PhotoCallback);
}
