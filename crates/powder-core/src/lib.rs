pub mod scalar;
pub mod ids;
pub mod types;
pub mod time;
pub mod step_ctx;
pub mod rng;
pub mod error;
pub mod input;

pub use scalar::Scalar;
pub use ids::{BodyId, ColliderId};
pub use types::{
    Vec3, Isometry, vec3, iso,
    project_on_plane, look_rotation, slerp_dir, move_towards, wrap_degrees, lerp_t,
};
pub use time::{FixedStep, StepStats};
pub use step_ctx::StepCtx;
pub use rng::XorShift64;
pub use error::ParamError;
pub use input::InputIntent;
pub use glam::Quat;
