// Config, frame and landmark types live in posehold-protocol; the engine exposes them under its own paths.
pub use posehold_protocol::config;
pub use posehold_protocol::fingerprint;
pub use posehold_protocol::frame;
pub use posehold_protocol::landmarks;

// Internal Modules
pub mod clock;
pub mod consts;
pub mod controller;
pub mod error;
pub mod events;
pub mod geometry;
pub mod loader;
pub mod presets;
pub mod reward;
pub mod scorer;
pub mod session;
pub mod simulate;
pub mod stability;
pub mod trace;
pub mod validation;

pub use self::controller::SessionController;
pub use self::error::{PhResult, PoseHoldError};
