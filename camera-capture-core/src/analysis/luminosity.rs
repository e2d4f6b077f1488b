use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::traits::camera_frame::{CameraFrame, FrameConsumer};

/// Number of timestamps kept for the moving-average frame rate.
const FRAME_RATE_WINDOW: usize = 8;

/// Per-frame analysis result delivered to listeners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisUpdate {
    /// Unweighted mean of the luminance plane's raw byte samples, in
    /// `[0, 255]`.
    pub luminance: f64,

    /// Moving-average frame rate. `None` until the window holds at least
    /// two distinct timestamps.
    pub frames_per_second: Option<f64>,
}

/// Listener invoked synchronously for every analyzed frame.
pub type LumaListener = Arc<dyn Fn(AnalysisUpdate) + Send + Sync + 'static>;

/// Worker-confined analysis state: the timestamp window and the reusable
/// luminance copy buffer.
struct AnalysisState {
    frame_timestamps: VecDeque<u64>,
    data: Vec<u8>,
    frame_counter: u64,
}

/// Computes average luminance and a windowed frame-rate estimate for every
/// frame the device delivers.
///
/// `analyze` runs on the session's single worker thread, so frames are
/// processed strictly in arrival order. Every path through `analyze`
/// releases the frame before returning; a retained frame stalls the
/// producer.
pub struct LuminosityAnalyzer {
    listeners: Mutex<Vec<LumaListener>>,
    state: Mutex<AnalysisState>,
}

impl LuminosityAnalyzer {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            state: Mutex::new(AnalysisState {
                frame_timestamps: VecDeque::with_capacity(FRAME_RATE_WINDOW),
                data: Vec::new(),
                frame_counter: 0,
            }),
        }
    }

    /// Register a listener. Listeners run synchronously in registration
    /// order on the worker thread.
    pub fn add_listener(&self, listener: LumaListener) {
        self.listeners.lock().push(listener);
    }

    pub fn clear_listeners(&self) {
        self.listeners.lock().clear();
    }

    /// Frames analyzed since construction. Frames dropped on the
    /// no-listener path are not counted.
    pub fn frames_analyzed(&self) -> u64 {
        self.state.lock().frame_counter
    }

    /// Moving-average rate from the oldest and newest window timestamps:
    /// `1000 / (span_ms / max(1, len - 1))`. Deliberately not a
    /// per-interval average.
    fn frame_rate(window: &VecDeque<u64>) -> Option<f64> {
        let (Some(&first), Some(&last)) = (window.front(), window.back()) else {
            return None;
        };
        if window.len() < 2 {
            return None;
        }
        let span_ms = last.saturating_sub(first);
        if span_ms == 0 {
            return None;
        }
        let mean_interval_ms = span_ms as f64 / (window.len() - 1).max(1) as f64;
        Some(1000.0 / mean_interval_ms)
    }
}

impl Default for LuminosityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameConsumer for LuminosityAnalyzer {
    fn analyze(&self, frame: Box<dyn CameraFrame>) {
        let listeners = self.listeners.lock().clone();

        // No listeners: skip the computation, but the frame still goes back.
        if listeners.is_empty() {
            frame.release();
            return;
        }

        let update = {
            let mut state = self.state.lock();

            state.frame_timestamps.push_back(frame.timestamp_ms());
            while state.frame_timestamps.len() > FRAME_RATE_WINDOW {
                state.frame_timestamps.pop_front();
            }
            let frames_per_second = Self::frame_rate(&state.frame_timestamps);

            // Reuse the copy buffer; it is resized only when the plane
            // length changes.
            let plane = frame.luma_plane();
            if state.data.len() != plane.len() {
                state.data.resize(plane.len(), 0);
            }
            state.data.copy_from_slice(plane);

            let luminance = if state.data.is_empty() {
                0.0
            } else {
                state.data.iter().map(|&b| u64::from(b)).sum::<u64>() as f64
                    / state.data.len() as f64
            };

            state.frame_counter += 1;
            if state.frame_counter % FRAME_RATE_WINDOW as u64 == 0 {
                if let Some(fps) = frames_per_second {
                    log::debug!("frames per second: {:.2}", fps);
                }
            }

            AnalysisUpdate {
                luminance,
                frames_per_second,
            }
        };

        for listener in &listeners {
            // A panicking listener must not block the remaining listeners
            // or the release of the frame.
            if panic::catch_unwind(AssertUnwindSafe(|| listener(update))).is_err() {
                log::error!("luminance listener panicked");
            }
        }

        frame.release();
    }
}
