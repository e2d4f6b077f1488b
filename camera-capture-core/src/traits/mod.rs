pub mod camera_frame;
pub mod camera_provider;
pub mod collaborators;
pub mod session_observer;
