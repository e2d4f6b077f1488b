//! # camera-capture-core
//!
//! Platform-agnostic camera session core library.
//!
//! Binds three concurrent capture pipelines (live preview, still capture,
//! per-frame luminance analysis) to an owning session, tracks device state
//! transitions, and coordinates still-photo capture. Device runtimes
//! implement the `CameraProvider` traits and plug into the generic
//! `CameraSession`.
//!
//! ## Architecture
//!
//! ```text
//! camera-capture-core (this crate)
//! ├── traits/     ← ProviderSource, CameraProvider, CameraHandle,
//! │                 CameraFrame, CameraObserver, collaborator boundaries
//! ├── models/     ← CameraState, CameraError, SessionError, SessionConfig,
//! │                 AspectRatio, capture request/result types
//! ├── analysis/   ← LuminosityAnalyzer (luminance + frame-rate window)
//! ├── session/    ← CameraSession, CameraExecutor, CameraStateMonitor,
//! │                 PhotoCapture
//! └── storage/    ← timestamped output files, metadata sidecars
//! ```

pub mod analysis;
pub mod models;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use analysis::luminosity::{AnalysisUpdate, LumaListener, LuminosityAnalyzer};
pub use models::capture::{CaptureRequest, PhotoMetadata, SavedPhoto};
pub use models::config::{CaptureMode, LensFacing, SessionConfig, UseCaseConfig};
pub use models::diagnostics::SessionDiagnostics;
pub use models::error::{BindError, CaptureFailure, SessionError, StorageError};
pub use models::geometry::{AspectRatio, Rotation};
pub use models::state::{CameraError, CameraState, RecoveryHint};
pub use session::controller::CameraSession;
pub use session::executor::CameraExecutor;
pub use session::state_monitor::CameraStateMonitor;
pub use traits::camera_frame::{CameraFrame, FrameConsumer};
pub use traits::camera_provider::{
    AnalysisUseCase, CameraHandle, CameraProvider, CameraStateObserver, CaptureUseCase,
    PhotoCallback, PreviewUseCase, ProviderReady, ProviderSource, UseCaseGroup,
};
pub use traits::collaborators::{DisplayMetrics, MediaScanner, PreviewSurface};
pub use traits::session_observer::CameraObserver;
