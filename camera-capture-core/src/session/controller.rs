use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::analysis::luminosity::{LumaListener, LuminosityAnalyzer};
use crate::models::config::{LensFacing, SessionConfig, UseCaseConfig};
use crate::models::diagnostics::SessionDiagnostics;
use crate::models::error::{CaptureFailure, SessionError};
use crate::models::geometry::{AspectRatio, Rotation};
use crate::models::state::CameraState;
use crate::traits::camera_frame::FrameConsumer;
use crate::traits::camera_provider::{
    AnalysisUseCase, CameraHandle, CameraProvider, CameraStateObserver, CaptureUseCase,
    PreviewUseCase, ProviderSource, UseCaseGroup,
};
use crate::traits::collaborators::{DisplayMetrics, MediaScanner, PreviewSurface};
use crate::traits::session_observer::CameraObserver;

use super::executor::CameraExecutor;
use super::photo_capture::PhotoCapture;
use super::state_monitor::CameraStateMonitor;

/// Single authority for the capture session lifecycle.
///
/// Owns the provider handle, the three use-case configurations, the state
/// monitor, the analyzer, and the background worker. Binding and unbinding
/// always run on the calling (owning) context, per the device-runtime
/// contract; frame analysis and blocking device calls run on the worker.
///
/// Exactly one use-case group is bound at a time: every rebind fully
/// unbinds the previous group first.
pub struct CameraSession {
    source: Arc<dyn ProviderSource>,
    display: Arc<dyn DisplayMetrics>,
    preview_surface: Arc<dyn PreviewSurface>,
    config: SessionConfig,

    executor: CameraExecutor,
    monitor: Arc<CameraStateMonitor>,
    analyzer: Arc<LuminosityAnalyzer>,
    diagnostics: Arc<Mutex<SessionDiagnostics>>,
    photo_capture: PhotoCapture,

    provider: Option<Arc<dyn CameraProvider>>,
    lens_facing: LensFacing,
    camera: Option<Arc<dyn CameraHandle>>,
}

impl CameraSession {
    pub fn new(
        source: Arc<dyn ProviderSource>,
        display: Arc<dyn DisplayMetrics>,
        preview_surface: Arc<dyn PreviewSurface>,
        scanner: Arc<dyn MediaScanner>,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        config
            .validate()
            .map_err(SessionError::InvalidConfiguration)?;

        let executor = CameraExecutor::new();
        let monitor = Arc::new(CameraStateMonitor::new());
        let diagnostics = Arc::new(Mutex::new(SessionDiagnostics::default()));
        let photo_capture = PhotoCapture::new(
            config.output_directory.clone(),
            scanner,
            executor.clone(),
            Arc::clone(&monitor),
            Arc::clone(&diagnostics),
        );

        Ok(Self {
            source,
            display,
            preview_surface,
            config,
            executor,
            monitor,
            analyzer: Arc::new(LuminosityAnalyzer::new()),
            diagnostics,
            photo_capture,
            provider: None,
            lens_facing: LensFacing::Back,
            camera: None,
        })
    }

    /// Resolve the device provider, select a sensor, and bind the use
    /// cases.
    ///
    /// Suspends until the provider's happens-once completion callback
    /// fires. With no camera available at all the session cannot start and
    /// the error is surfaced. A binding failure, by contrast, is logged
    /// and leaves the session started but unbound; `bind_use_cases` may be
    /// retried.
    pub fn start_session(&mut self) -> Result<(), SessionError> {
        let (tx, rx) = mpsc::channel();
        self.source.request_provider(Box::new(move |result| {
            let _ = tx.send(result);
        }));
        let provider = rx
            .recv()
            .map_err(|_| SessionError::ProviderUnavailable("provider callback dropped".into()))?
            .map_err(SessionError::ProviderUnavailable)?;

        self.lens_facing = Self::select_facing(provider.as_ref(), self.config.preferred_facing)
            .ok_or(SessionError::NoCameraAvailable)?;
        log::debug!("camera provider resolved, facing {:?}", self.lens_facing);
        self.provider = Some(provider);

        // Session stays unbound on failure; the caller may rebind after
        // adjusting, e.g. on the next configuration change.
        let _ = self.bind_use_cases();
        Ok(())
    }

    fn select_facing(
        provider: &dyn CameraProvider,
        preferred: Option<LensFacing>,
    ) -> Option<LensFacing> {
        if let Some(facing) = preferred {
            if provider.has_camera(facing) {
                return Some(facing);
            }
        }
        if provider.has_camera(LensFacing::Back) {
            Some(LensFacing::Back)
        } else if provider.has_camera(LensFacing::Front) {
            Some(LensFacing::Front)
        } else {
            None
        }
    }

    /// Build fresh use-case configurations from the current display state
    /// and bind them, fully unbinding any previous group first.
    pub fn bind_use_cases(&mut self) -> Result<(), SessionError> {
        let provider = self.provider.as_ref().ok_or(SessionError::NotStarted)?;

        let (width, height) = self.display.bounds();
        let aspect_ratio = AspectRatio::for_dimensions(width, height);
        let rotation = self.display.rotation();
        log::debug!(
            "screen metrics {}x{}, target ratio {:?}, rotation {:?}",
            width,
            height,
            aspect_ratio,
            rotation
        );

        let use_case_config = UseCaseConfig {
            aspect_ratio,
            rotation,
        };
        let group = UseCaseGroup {
            preview: PreviewUseCase {
                config: use_case_config,
                surface: Arc::clone(&self.preview_surface),
            },
            capture: CaptureUseCase {
                config: use_case_config,
                mode: self.config.capture_mode,
            },
            analysis: AnalysisUseCase {
                config: use_case_config,
                consumer: Arc::clone(&self.analyzer) as Arc<dyn FrameConsumer>,
                executor: self.executor.clone(),
            },
        };

        // The previous group must be fully released before the next bind.
        provider.unbind_all();
        self.camera = None;
        self.diagnostics.lock().unbinds += 1;

        match provider.bind(self.lens_facing, group) {
            Ok(camera) => {
                let camera: Arc<dyn CameraHandle> = Arc::from(camera);
                camera.observe_state(Arc::clone(&self.monitor) as Arc<dyn CameraStateObserver>);
                self.camera = Some(camera);
                self.diagnostics.lock().binds += 1;
                Ok(())
            }
            Err(e) => {
                log::error!("use case binding failed: {}", e);
                Err(SessionError::BindingFailed(e))
            }
        }
    }

    /// Toggle the active sensor and rebind. Never leaves two sensors
    /// bound.
    pub fn switch_camera(&mut self) -> Result<(), SessionError> {
        if self.provider.is_none() {
            return Err(SessionError::NotStarted);
        }
        self.lens_facing = self.lens_facing.toggled();
        self.diagnostics.lock().camera_switches += 1;
        self.bind_use_cases()
    }

    /// Whether both sensors are available to switch between. Probe
    /// failures count as unavailable.
    pub fn can_switch_cameras(&self) -> bool {
        match &self.provider {
            Some(provider) => {
                provider.has_camera(LensFacing::Back) && provider.has_camera(LensFacing::Front)
            }
            None => false,
        }
    }

    /// Propagate a display rotation to the bound capture and analysis
    /// pipelines. Cheap in-place update; no rebind, the preview is not
    /// reconstructed.
    pub fn on_orientation_changed(&self, rotation: Rotation) {
        if let Some(camera) = &self.camera {
            log::debug!("rotation changed: {:?}", rotation);
            camera.set_target_rotation(rotation);
            self.diagnostics.lock().rotation_updates += 1;
        }
    }

    /// Begin one still capture; the outcome arrives through the
    /// observers. Returns the destination path chosen for the request.
    pub fn take_photo(&self) -> Result<PathBuf, CaptureFailure> {
        let camera = self.camera.clone().ok_or(CaptureFailure::NotBound)?;
        Ok(self.photo_capture.capture(camera, self.lens_facing))
    }

    /// Release everything: unbind, drain and join the worker, drop
    /// listeners. Safe to call before `start_session` completed, and safe
    /// to call more than once.
    pub fn teardown(&mut self) {
        if let Some(provider) = self.provider.take() {
            provider.unbind_all();
            self.diagnostics.lock().unbinds += 1;
        }
        self.camera = None;

        // The worker drains queued analysis before session state goes away.
        self.executor.shutdown();

        self.monitor.clear_observers();
        self.analyzer.clear_listeners();
    }

    pub fn add_observer(&self, observer: Arc<dyn CameraObserver>) {
        self.monitor.add_observer(observer);
    }

    pub fn add_luma_listener(&self, listener: LumaListener) {
        self.analyzer.add_listener(listener);
    }

    pub fn lens_facing(&self) -> LensFacing {
        self.lens_facing
    }

    pub fn is_bound(&self) -> bool {
        self.camera.is_some()
    }

    /// The most recently observed device state, if any notification
    /// arrived yet.
    pub fn camera_state(&self) -> Option<CameraState> {
        self.monitor.last_state()
    }

    pub fn frames_analyzed(&self) -> u64 {
        self.analyzer.frames_analyzed()
    }

    pub fn diagnostics(&self) -> SessionDiagnostics {
        *self.diagnostics.lock()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use crate::models::capture::{CaptureRequest, SavedPhoto};
    use crate::models::error::BindError;
    use crate::models::state::{CameraError, RecoveryHint};
    use crate::traits::camera_provider::PhotoCallback;

    use super::*;

    #[derive(Default)]
    struct HandleState {
        rotations: Mutex<Vec<Rotation>>,
        pending_capture: Mutex<Option<(CaptureRequest, PhotoCallback)>>,
        observer: Mutex<Option<Arc<dyn CameraStateObserver>>>,
    }

    struct MockHandle {
        state: Arc<HandleState>,
    }

    impl CameraHandle for MockHandle {
        fn observe_state(&self, observer: Arc<dyn CameraStateObserver>) {
            *self.state.observer.lock() = Some(observer);
        }

        fn set_target_rotation(&self, rotation: Rotation) {
            self.state.rotations.lock().push(rotation);
        }

        fn take_picture(&self, request: CaptureRequest, on_done: PhotoCallback) {
            *self.state.pending_capture.lock() = Some((request, on_done));
        }
    }

    struct MockProvider {
        back: bool,
        front: bool,
        fail_bind: Mutex<bool>,
        events: Mutex<Vec<&'static str>>,
        bound: Mutex<Option<LensFacing>>,
        handle_state: Arc<HandleState>,
    }

    impl MockProvider {
        fn new(back: bool, front: bool) -> Arc<Self> {
            Arc::new(Self {
                back,
                front,
                fail_bind: Mutex::new(false),
                events: Mutex::new(Vec::new()),
                bound: Mutex::new(None),
                handle_state: Arc::new(HandleState::default()),
            })
        }
    }

    impl CameraProvider for MockProvider {
        fn has_camera(&self, facing: LensFacing) -> bool {
            match facing {
                LensFacing::Back => self.back,
                LensFacing::Front => self.front,
            }
        }

        fn bind(
            &self,
            facing: LensFacing,
            _group: UseCaseGroup,
        ) -> Result<Box<dyn CameraHandle>, BindError> {
            self.events.lock().push("bind");
            if *self.fail_bind.lock() {
                return Err(BindError::Device("mock bind rejection".into()));
            }
            *self.bound.lock() = Some(facing);
            Ok(Box::new(MockHandle {
                state: Arc::clone(&self.handle_state),
            }))
        }

        fn unbind_all(&self) {
            self.events.lock().push("unbind");
            *self.bound.lock() = None;
        }
    }

    struct ImmediateSource(Arc<MockProvider>);

    impl ProviderSource for ImmediateSource {
        fn request_provider(&self, on_ready: crate::traits::camera_provider::ProviderReady) {
            on_ready(Ok(self.0.clone()));
        }
    }

    struct DeferredSource(Arc<MockProvider>);

    impl ProviderSource for DeferredSource {
        fn request_provider(&self, on_ready: crate::traits::camera_provider::ProviderReady) {
            let provider = self.0.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(10));
                on_ready(Ok(provider));
            });
        }
    }

    struct FailingSource;

    impl ProviderSource for FailingSource {
        fn request_provider(&self, on_ready: crate::traits::camera_provider::ProviderReady) {
            on_ready(Err("runtime not installed".into()));
        }
    }

    struct FixedDisplay;

    impl DisplayMetrics for FixedDisplay {
        fn bounds(&self) -> (u32, u32) {
            (1080, 1920)
        }

        fn rotation(&self) -> Rotation {
            Rotation::Deg0
        }
    }

    struct NullSurface;

    impl PreviewSurface for NullSurface {
        fn surface_id(&self) -> String {
            "test-surface".into()
        }
    }

    struct NullScanner;

    impl MediaScanner for NullScanner {
        fn announce(&self, _path: &std::path::Path, _mime_type: &str) {}
    }

    fn session_with(
        source: Arc<dyn ProviderSource>,
        config: SessionConfig,
    ) -> CameraSession {
        CameraSession::new(
            source,
            Arc::new(FixedDisplay),
            Arc::new(NullSurface),
            Arc::new(NullScanner),
            config,
        )
        .unwrap()
    }

    fn started_session(provider: Arc<MockProvider>) -> CameraSession {
        let mut session = session_with(
            Arc::new(ImmediateSource(provider)),
            SessionConfig {
                output_directory: std::env::temp_dir(),
                ..Default::default()
            },
        );
        session.start_session().unwrap();
        session
    }

    #[test]
    fn start_selects_back_camera_by_default() {
        let provider = MockProvider::new(true, true);
        let session = started_session(provider.clone());

        assert_eq!(session.lens_facing(), LensFacing::Back);
        assert!(session.is_bound());
        assert_eq!(*provider.bound.lock(), Some(LensFacing::Back));
    }

    #[test]
    fn start_falls_back_to_front_camera() {
        let provider = MockProvider::new(false, true);
        let session = started_session(provider);

        assert_eq!(session.lens_facing(), LensFacing::Front);
        assert!(session.is_bound());
    }

    #[test]
    fn start_fails_without_any_camera() {
        let provider = MockProvider::new(false, false);
        let mut session = session_with(
            Arc::new(ImmediateSource(provider)),
            SessionConfig::default(),
        );

        assert_eq!(session.start_session(), Err(SessionError::NoCameraAvailable));
        assert!(!session.is_bound());
    }

    #[test]
    fn preferred_facing_is_honored_when_available() {
        let provider = MockProvider::new(true, true);
        let mut session = session_with(
            Arc::new(ImmediateSource(provider)),
            SessionConfig {
                preferred_facing: Some(LensFacing::Front),
                output_directory: std::env::temp_dir(),
                ..Default::default()
            },
        );
        session.start_session().unwrap();

        assert_eq!(session.lens_facing(), LensFacing::Front);
    }

    #[test]
    fn deferred_provider_resolution_completes() {
        let provider = MockProvider::new(true, false);
        let mut session = session_with(
            Arc::new(DeferredSource(provider)),
            SessionConfig::default(),
        );

        session.start_session().unwrap();
        assert!(session.is_bound());
    }

    #[test]
    fn provider_failure_is_surfaced() {
        let mut session = session_with(Arc::new(FailingSource), SessionConfig::default());

        assert_eq!(
            session.start_session(),
            Err(SessionError::ProviderUnavailable(
                "runtime not installed".into()
            ))
        );
    }

    #[test]
    fn rebind_unbinds_before_every_bind() {
        let provider = MockProvider::new(true, true);
        let mut session = started_session(provider.clone());

        // Simulated configuration change: rebind with fresh configs.
        session.bind_use_cases().unwrap();

        assert_eq!(
            *provider.events.lock(),
            vec!["unbind", "bind", "unbind", "bind"]
        );
        assert!(session.is_bound());
        assert_eq!(*provider.bound.lock(), Some(LensFacing::Back));
        let diagnostics = session.diagnostics();
        assert_eq!(diagnostics.binds, 2);
        assert_eq!(diagnostics.unbinds, 2);
    }

    #[test]
    fn binding_failure_leaves_session_unbound_and_retryable() {
        let provider = MockProvider::new(true, true);
        *provider.fail_bind.lock() = true;
        let mut session = session_with(
            Arc::new(ImmediateSource(provider.clone())),
            SessionConfig::default(),
        );

        // Start succeeds; the binding failure is logged, not propagated.
        session.start_session().unwrap();
        assert!(!session.is_bound());

        *provider.fail_bind.lock() = false;
        session.bind_use_cases().unwrap();
        assert!(session.is_bound());
    }

    #[test]
    fn switch_camera_toggles_facing_and_rebinds() {
        let provider = MockProvider::new(true, true);
        let mut session = started_session(provider.clone());

        session.switch_camera().unwrap();

        assert_eq!(session.lens_facing(), LensFacing::Front);
        assert_eq!(*provider.bound.lock(), Some(LensFacing::Front));
        assert_eq!(session.diagnostics().camera_switches, 1);
    }

    #[test]
    fn switch_before_start_is_rejected() {
        let provider = MockProvider::new(true, true);
        let mut session = session_with(
            Arc::new(ImmediateSource(provider)),
            SessionConfig::default(),
        );

        assert_eq!(session.switch_camera(), Err(SessionError::NotStarted));
        assert_eq!(session.lens_facing(), LensFacing::Back);
    }

    #[test]
    fn can_switch_requires_both_sensors() {
        let both = started_session(MockProvider::new(true, true));
        assert!(both.can_switch_cameras());

        let back_only = started_session(MockProvider::new(true, false));
        assert!(!back_only.can_switch_cameras());

        let unstarted = session_with(
            Arc::new(ImmediateSource(MockProvider::new(true, true))),
            SessionConfig::default(),
        );
        assert!(!unstarted.can_switch_cameras());
    }

    #[test]
    fn orientation_change_updates_rotation_without_rebinding() {
        let provider = MockProvider::new(true, true);
        let session = started_session(provider.clone());
        let events_before = provider.events.lock().len();

        session.on_orientation_changed(Rotation::Deg270);

        assert_eq!(provider.events.lock().len(), events_before);
        assert_eq!(*provider.handle_state.rotations.lock(), vec![Rotation::Deg270]);
        assert_eq!(session.diagnostics().rotation_updates, 1);
    }

    #[test]
    fn orientation_change_before_bind_is_a_no_op() {
        let session = session_with(
            Arc::new(ImmediateSource(MockProvider::new(true, true))),
            SessionConfig::default(),
        );

        session.on_orientation_changed(Rotation::Deg90);
        assert_eq!(session.diagnostics().rotation_updates, 0);
    }

    #[test]
    fn state_notifications_flow_through_the_monitor() {
        let provider = MockProvider::new(true, true);
        let session = started_session(provider.clone());

        let observer = provider
            .handle_state
            .observer
            .lock()
            .clone()
            .expect("monitor subscribed at bind");
        observer.on_state_changed(CameraState::Open, None);

        assert_eq!(session.camera_state(), Some(CameraState::Open));
    }

    #[test]
    fn take_photo_requires_a_bound_session() {
        let session = session_with(
            Arc::new(ImmediateSource(MockProvider::new(true, true))),
            SessionConfig::default(),
        );

        assert_eq!(session.take_photo(), Err(CaptureFailure::NotBound));
    }

    #[test]
    fn mirror_flag_survives_switch_before_resolution() {
        let provider = MockProvider::new(true, true);
        let mut session = session_with(
            Arc::new(ImmediateSource(provider.clone())),
            SessionConfig {
                preferred_facing: Some(LensFacing::Front),
                output_directory: std::env::temp_dir(),
                ..Default::default()
            },
        );
        session.start_session().unwrap();

        struct SavedRecorder {
            saved: Mutex<Vec<SavedPhoto>>,
            signal: mpsc::Sender<()>,
        }
        impl CameraObserver for SavedRecorder {
            fn on_state_changed(&self, _state: CameraState) {}
            fn on_camera_error(&self, _error: CameraError, _recovery: RecoveryHint) {}
            fn on_photo_saved(&self, photo: &SavedPhoto) {
                self.saved.lock().push(photo.clone());
                let _ = self.signal.send(());
            }
            fn on_capture_failed(&self, _failure: &CaptureFailure) {}
        }
        let (tx, rx) = mpsc::channel();
        let recorder = Arc::new(SavedRecorder {
            saved: Mutex::new(Vec::new()),
            signal: tx,
        });
        session.add_observer(recorder.clone());

        session.take_photo().unwrap();
        // Wait for the worker to hand the request to the device.
        while provider.handle_state.pending_capture.lock().is_none() {
            thread::sleep(Duration::from_millis(1));
        }

        // The sensor switches while the capture is in flight.
        session.switch_camera().unwrap();
        assert_eq!(session.lens_facing(), LensFacing::Back);

        let (request, on_done) = provider.handle_state.pending_capture.lock().take().unwrap();
        assert!(request.mirror);
        on_done(Ok(None));
        rx.recv().unwrap();

        let saved = recorder.saved.lock();
        assert!(saved[0].metadata.mirrored);
        let _ = std::fs::remove_file(saved[0].path.with_extension("metadata.json"));
    }

    #[test]
    fn teardown_before_start_is_safe() {
        let mut session = session_with(
            Arc::new(ImmediateSource(MockProvider::new(true, true))),
            SessionConfig::default(),
        );

        session.teardown();
        session.teardown();
        assert!(!session.is_bound());
    }

    #[test]
    fn teardown_unbinds_and_stops_the_worker() {
        let provider = MockProvider::new(true, true);
        let mut session = started_session(provider.clone());

        session.teardown();

        assert!(!session.is_bound());
        assert_eq!(*provider.bound.lock(), None);
        assert_eq!(session.take_photo(), Err(CaptureFailure::NotBound));
    }
}
