//! Synthetic camera provider.
//!
//! Emulates a device runtime end to end: deferred provider resolution,
//! atomic use-case binding with state notification emission, a frame
//! producer thread feeding the analysis executor at a fixed cadence, and a
//! still-capture path that writes the current synthetic frame to the
//! requested destination.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use camera_capture_core::{
    BindError, CameraError, CameraFrame, CameraHandle, CameraProvider, CameraState,
    CameraStateObserver, CaptureFailure, CaptureRequest, LensFacing, PhotoCallback,
    ProviderReady, ProviderSource, Rotation, UseCaseGroup,
};

use crate::gradient;

/// Shape and cadence of the synthetic device.
#[derive(Debug, Clone)]
pub struct SyntheticCameraSpec {
    pub has_back: bool,
    pub has_front: bool,
    /// Luma plane dimensions as (width, height).
    pub frame_size: (usize, usize),
    /// Delay between produced frames.
    pub frame_interval: Duration,
    /// Frames produced per bind; the producer idles once the quota is
    /// spent.
    pub frames_per_bind: u64,
    /// Resolve still captures with a failure instead of writing the file.
    pub fail_captures: bool,
}

impl Default for SyntheticCameraSpec {
    fn default() -> Self {
        Self {
            has_back: true,
            has_front: true,
            frame_size: (32, 24),
            frame_interval: Duration::from_millis(5),
            frames_per_bind: 24,
            fail_captures: false,
        }
    }
}

/// Provider resolution through a helper thread, mimicking the runtime's
/// completion future: the callback fires once, later, from another thread.
pub struct SyntheticProviderSource {
    provider: Arc<SyntheticCameraProvider>,
}

impl SyntheticProviderSource {
    pub fn new(provider: Arc<SyntheticCameraProvider>) -> Self {
        Self { provider }
    }
}

impl ProviderSource for SyntheticProviderSource {
    fn request_provider(&self, on_ready: ProviderReady) {
        let provider = Arc::clone(&self.provider);
        thread::Builder::new()
            .name("synthetic-provider-resolve".into())
            .spawn(move || {
                on_ready(Ok(provider as Arc<dyn CameraProvider>));
            })
            .expect("failed to spawn provider resolve thread");
    }
}

/// State shared between a bound handle, its producer thread, and the
/// provider.
struct HandleShared {
    spec: SyntheticCameraSpec,
    observers: Mutex<Vec<Arc<dyn CameraStateObserver>>>,
    last_update: Mutex<Option<(CameraState, Option<CameraError>)>>,
    rotation: Mutex<Rotation>,
    running: AtomicBool,
    frames_emitted: Arc<AtomicU64>,
    frames_released: Arc<AtomicU64>,
}

impl HandleShared {
    fn emit(&self, state: CameraState, error: Option<CameraError>) {
        *self.last_update.lock() = Some((state, error));
        let observers = self.observers.lock().clone();
        for observer in observers {
            observer.on_state_changed(state, error);
        }
    }
}

struct BoundCamera {
    shared: Arc<HandleShared>,
    producer: Option<JoinHandle<()>>,
}

/// Synthetic camera provider with bind/unbind bookkeeping.
pub struct SyntheticCameraProvider {
    spec: SyntheticCameraSpec,
    bound: Mutex<Option<BoundCamera>>,
    bind_count: AtomicU64,
    unbind_count: AtomicU64,
    frames_emitted: Arc<AtomicU64>,
    frames_released: Arc<AtomicU64>,
}

impl SyntheticCameraProvider {
    pub fn new(spec: SyntheticCameraSpec) -> Arc<Self> {
        Arc::new(Self {
            spec,
            bound: Mutex::new(None),
            bind_count: AtomicU64::new(0),
            unbind_count: AtomicU64::new(0),
            frames_emitted: Arc::new(AtomicU64::new(0)),
            frames_released: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn bind_count(&self) -> u64 {
        self.bind_count.load(Ordering::SeqCst)
    }

    pub fn unbind_count(&self) -> u64 {
        self.unbind_count.load(Ordering::SeqCst)
    }

    /// Frames handed to the analysis executor across all binds.
    pub fn frames_emitted(&self) -> u64 {
        self.frames_emitted.load(Ordering::SeqCst)
    }

    /// Frames released back by the analyzer across all binds.
    pub fn frames_released(&self) -> u64 {
        self.frames_released.load(Ordering::SeqCst)
    }
}

impl CameraProvider for SyntheticCameraProvider {
    fn has_camera(&self, facing: LensFacing) -> bool {
        match facing {
            LensFacing::Back => self.spec.has_back,
            LensFacing::Front => self.spec.has_front,
        }
    }

    fn bind(
        &self,
        facing: LensFacing,
        group: UseCaseGroup,
    ) -> Result<Box<dyn CameraHandle>, BindError> {
        if !self.has_camera(facing) {
            return Err(BindError::CameraUnavailable(format!("{:?}", facing)));
        }

        let mut bound = self.bound.lock();
        if bound.is_some() {
            return Err(BindError::UnsupportedCombination(
                "use cases already bound; unbind first".into(),
            ));
        }

        log::debug!(
            "binding synthetic {:?} camera, surface {}, ratio {:?}",
            facing,
            group.preview.surface.surface_id(),
            group.preview.config.aspect_ratio
        );

        let shared = Arc::new(HandleShared {
            spec: self.spec.clone(),
            observers: Mutex::new(Vec::new()),
            last_update: Mutex::new(None),
            rotation: Mutex::new(group.capture.config.rotation),
            running: AtomicBool::new(true),
            frames_emitted: Arc::clone(&self.frames_emitted),
            frames_released: Arc::clone(&self.frames_released),
        });

        let producer = {
            let shared = Arc::clone(&shared);
            let consumer = Arc::clone(&group.analysis.consumer);
            let executor = group.analysis.executor.clone();
            thread::Builder::new()
                .name("synthetic-camera-frames".into())
                .spawn(move || {
                    shared.emit(CameraState::Opening, None);
                    shared.emit(CameraState::Open, None);

                    let (width, height) = shared.spec.frame_size;
                    let start = Instant::now();
                    let mut produced = 0u64;
                    while shared.running.load(Ordering::SeqCst)
                        && produced < shared.spec.frames_per_bind
                    {
                        thread::sleep(shared.spec.frame_interval);
                        if !shared.running.load(Ordering::SeqCst) {
                            break;
                        }

                        let frame = SyntheticFrame {
                            timestamp_ms: start.elapsed().as_millis() as u64,
                            data: gradient::luma_plane(width, height),
                            released: AtomicBool::new(false),
                            release_counter: Arc::clone(&shared.frames_released),
                        };
                        shared.frames_emitted.fetch_add(1, Ordering::SeqCst);

                        let consumer = Arc::clone(&consumer);
                        executor.execute(move || consumer.analyze(Box::new(frame)));
                        produced += 1;
                    }
                })
                .expect("failed to spawn synthetic frame producer")
        };

        *bound = Some(BoundCamera {
            shared: Arc::clone(&shared),
            producer: Some(producer),
        });
        self.bind_count.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(SyntheticHandle { facing, shared }))
    }

    fn unbind_all(&self) {
        self.unbind_count.fetch_add(1, Ordering::SeqCst);

        let camera = self.bound.lock().take();
        if let Some(mut camera) = camera {
            camera.shared.running.store(false, Ordering::SeqCst);
            if let Some(producer) = camera.producer.take() {
                let _ = producer.join();
            }
            camera.shared.emit(CameraState::Closing, None);
            camera.shared.emit(CameraState::Closed, None);
        }
    }
}

struct SyntheticHandle {
    facing: LensFacing,
    shared: Arc<HandleShared>,
}

impl CameraHandle for SyntheticHandle {
    fn observe_state(&self, observer: Arc<dyn CameraStateObserver>) {
        // Late subscribers get the most recent update replayed.
        let last = *self.shared.last_update.lock();
        if let Some((state, error)) = last {
            observer.on_state_changed(state, error);
        }
        self.shared.observers.lock().push(observer);
    }

    fn set_target_rotation(&self, rotation: Rotation) {
        log::debug!("synthetic {:?} camera rotation -> {:?}", self.facing, rotation);
        *self.shared.rotation.lock() = rotation;
    }

    fn take_picture(&self, request: CaptureRequest, on_done: PhotoCallback) {
        if self.shared.spec.fail_captures {
            on_done(Err(CaptureFailure::Device("synthetic capture failure".into())));
            return;
        }

        let (width, height) = self.shared.spec.frame_size;
        let data = gradient::luma_plane(width, height);
        match std::fs::write(&request.destination, &data) {
            Ok(()) => on_done(Ok(None)),
            Err(e) => on_done(Err(CaptureFailure::Device(format!(
                "write to {} failed: {}",
                request.destination.display(),
                e
            )))),
        }
    }
}

/// One producer-stamped frame. Release is tracked so tests can prove the
/// analyzer never leaks a frame.
struct SyntheticFrame {
    timestamp_ms: u64,
    data: Vec<u8>,
    released: AtomicBool,
    release_counter: Arc<AtomicU64>,
}

impl CameraFrame for SyntheticFrame {
    fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    fn luma_plane(&self) -> &[u8] {
        &self.data
    }

    fn release(&self) {
        if self.released.swap(true, Ordering::SeqCst) {
            log::error!("synthetic frame released twice");
            return;
        }
        self.release_counter.fetch_add(1, Ordering::SeqCst);
    }
}
