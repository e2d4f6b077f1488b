pub mod controller;
pub mod executor;
pub mod photo_capture;
pub mod state_monitor;
