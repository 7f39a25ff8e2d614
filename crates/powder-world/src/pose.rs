use powder_core::Vec3;
use serde::{Deserialize, Serialize};

/// Coarse pose for an external animation layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiderPose { Ride, Bomb, Shaky, Jump, Air, SpinGrab, FlipGrab, Idle }

/// Relative speed at which boosting switches to the tucked pose.
pub const BOMB_REL_SPEED: f32 = 0.4;
const IDLE_SPEED: f32 = 0.5;
const RISING_DOT: f32 = 0.2;

#[derive(Copy, Clone, Debug, Default)]
pub struct PoseInputs {
    pub grounded: bool,
    pub braking: bool,
    pub boosting: bool,
    pub vel: Vec3,
    pub max_speed: f32,
    pub ground_normal: Vec3,
    pub doing_trick: bool,
    pub flat_spin: bool,
}

pub fn classify(p: &PoseInputs) -> RiderPose {
    let speed = p.vel.length();
    if !p.grounded {
        if p.doing_trick {
            return if p.flat_spin { RiderPose::SpinGrab } else { RiderPose::FlipGrab };
        }
        let rising = p.vel.try_normalize().map_or(0.0, |d| d.dot(p.ground_normal));
        return if rising > RISING_DOT { RiderPose::Jump } else { RiderPose::Air };
    }
    if speed < IDLE_SPEED { return RiderPose::Idle; }
    let rel = if p.max_speed > 0.0 { (speed / p.max_speed).clamp(0.0, 1.0) } else { 0.0 };
    if p.boosting && !p.braking && rel >= BOMB_REL_SPEED { return RiderPose::Bomb; }
    if p.braking { RiderPose::Shaky } else { RiderPose::Ride }
}
