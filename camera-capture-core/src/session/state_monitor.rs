use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::state::{CameraError, CameraState};
use crate::traits::camera_provider::CameraStateObserver;
use crate::traits::session_observer::CameraObserver;

/// Classifies raw device state notifications and fans them out to session
/// observers.
///
/// The device runtime drives transitions; this component only observes.
/// Repeated or out-of-order notifications are all forwarded, none rejected.
/// Each update produces exactly one state notification and, when an error
/// is attached, exactly one error notification after it.
pub struct CameraStateMonitor {
    observers: Mutex<Vec<Arc<dyn CameraObserver>>>,
    last_state: Mutex<Option<CameraState>>,
}

impl CameraStateMonitor {
    pub fn new() -> Self {
        Self {
            observers: Mutex::new(Vec::new()),
            last_state: Mutex::new(None),
        }
    }

    pub fn add_observer(&self, observer: Arc<dyn CameraObserver>) {
        self.observers.lock().push(observer);
    }

    pub fn clear_observers(&self) {
        self.observers.lock().clear();
    }

    /// Snapshot of the registered observers, in registration order.
    pub fn observers(&self) -> Vec<Arc<dyn CameraObserver>> {
        self.observers.lock().clone()
    }

    /// The most recently observed device state.
    pub fn last_state(&self) -> Option<CameraState> {
        *self.last_state.lock()
    }
}

impl Default for CameraStateMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraStateObserver for CameraStateMonitor {
    fn on_state_changed(&self, state: CameraState, error: Option<CameraError>) {
        log::debug!("camera state: {:?}", state);
        *self.last_state.lock() = Some(state);

        let observers = self.observers();
        for observer in &observers {
            observer.on_state_changed(state);
        }

        if let Some(error) = error {
            let recovery = error.recovery();
            log::warn!("camera error: {} ({:?})", error, recovery);
            for observer in &observers {
                observer.on_camera_error(error, recovery);
            }
        }
    }
}
