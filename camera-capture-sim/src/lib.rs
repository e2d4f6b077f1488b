//! # camera-capture-sim
//!
//! Synthetic camera backend for camera-capture-kit.
//!
//! Provides:
//! - `SyntheticProviderSource`: deferred provider resolution from a helper
//!   thread
//! - `SyntheticCameraProvider`: bind/unbind with state notification
//!   emission and frame production through the bound analysis executor
//! - `gradient`: deterministic luma planes with a known mean
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//! use camera_capture_core::{CameraSession, SessionConfig};
//! use camera_capture_sim::{SyntheticCameraProvider, SyntheticCameraSpec, SyntheticProviderSource};
//!
//! let provider = SyntheticCameraProvider::new(SyntheticCameraSpec::default());
//! let source = Arc::new(SyntheticProviderSource::new(provider));
//! let mut session = CameraSession::new(source, display, surface, scanner, SessionConfig::default())?;
//! session.start_session()?;
//! ```

pub mod gradient;
pub mod synthetic_camera;

pub use synthetic_camera::{SyntheticCameraProvider, SyntheticCameraSpec, SyntheticProviderSource};
