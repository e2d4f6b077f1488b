use thiserror::Error;

/// Operating state reported by the camera runtime for a bound device.
///
/// Normal operation is linear:
/// ```text
/// pending-open → opening → open → closing → closed
/// ```
/// Transitions are driven by the device runtime, not by this crate. Any
/// state may recur and notifications may arrive out of order; none are
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraState {
    /// The camera is waiting for another client to release the device.
    PendingOpen,
    Opening,
    Open,
    Closing,
    Closed,
}

impl CameraState {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Device-level error accompanying a state notification.
///
/// State and error are independent axes: an error may arrive together with
/// any state. Errors are observational and never abort the session by
/// themselves.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraError {
    #[error("stream configuration error")]
    StreamConfig,
    #[error("camera in use")]
    CameraInUse,
    #[error("max cameras in use")]
    MaxCamerasInUse,
    #[error("other recoverable error")]
    OtherRecoverable,
    #[error("camera disabled")]
    CameraDisabled,
    #[error("camera fatal error")]
    FatalError,
    #[error("do not disturb mode enabled")]
    DoNotDisturbEnabled,
}

/// Operator-facing recovery classification for a [`CameraError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecoveryHint {
    /// Resolvable by a user action, e.g. closing another camera app or
    /// rebinding with an adjusted configuration.
    UserAction,
    /// Requires intervention outside this app, e.g. re-enabling the camera
    /// in system settings or rebooting the device.
    ExternalIntervention,
}

impl CameraError {
    /// Map a numeric runtime error code into the closed error set.
    ///
    /// Codes outside the known range classify as [`CameraError::OtherRecoverable`]
    /// rather than being dropped.
    pub fn from_raw(code: u32) -> Self {
        match code {
            1 => Self::StreamConfig,
            2 => Self::CameraInUse,
            3 => Self::MaxCamerasInUse,
            4 => Self::CameraDisabled,
            5 => Self::FatalError,
            6 => Self::DoNotDisturbEnabled,
            _ => Self::OtherRecoverable,
        }
    }

    pub fn recovery(&self) -> RecoveryHint {
        match self {
            Self::StreamConfig
            | Self::CameraInUse
            | Self::MaxCamerasInUse
            | Self::OtherRecoverable => RecoveryHint::UserAction,
            Self::CameraDisabled | Self::FatalError | Self::DoNotDisturbEnabled => {
                RecoveryHint::ExternalIntervention
            }
        }
    }
}
