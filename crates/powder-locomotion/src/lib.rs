//! Slope-relative rider locomotion: ground probe, local gravity, tangent-frame velocity
//! integration, jump, speed clamp and obstacle slow-down.

pub mod params;
pub mod ground;
pub mod engine;

pub use params::{JumpAxis, LocoParams};
pub use ground::{probe_ground, GroundInfo};
pub use engine::{LocoStepReport, LocomotionEngine, ObstacleHit, TangentFrame};
