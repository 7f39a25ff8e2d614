use powder_core::ParamError;
use powder_gravity::GravityParams;
use serde::{Deserialize, Serialize};

/// Direction of the jump impulse.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JumpAxis {
    /// Average of world up and the ground normal.
    #[default]
    Blended,
    /// Straight off the slope; leaves the in-plane velocity untouched.
    Normal,
    WorldUp,
}

/// Locomotion tunables. Angles are degrees, rates are per second.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocoParams {
    pub gravity: GravityParams,

    pub always_accelerate: bool,
    pub push_acceleration: f32,
    pub max_speed: f32,
    pub base_friction: f32,
    pub carve_extra_friction: f32,
    pub brake_extra_friction: f32,

    pub brake_strength: f32,
    pub boost_acceleration: f32,
    pub boost_max_speed_multiplier: f32,

    pub turn_rate_deg: f32,
    pub body_align_rate: f32,

    pub jump_force: f32,
    pub jump_axis: JumpAxis,

    /// How far below the base the probe still counts as ground.
    pub ground_check_distance: f32,
    /// Probe sphere starts this far above the base.
    pub probe_lift: f32,
    pub probe_radius: f32,
    pub normal_smoothing_rate: f32,

    /// Planar speed above which the ride direction follows velocity.
    pub ride_dir_min_speed: f32,
    /// Planar speed below which steering and braking are ignored.
    pub moving_epsilon: f32,
    pub steer_epsilon: f32,
    /// |steering| above which carve friction kicks in.
    pub carve_threshold: f32,
    /// throttle below -this means brake.
    pub brake_threshold: f32,
    /// throttle above this pushes when `always_accelerate` is off.
    pub accelerate_threshold: f32,

    /// Overlap radius used against obstacle triggers.
    pub body_radius: f32,
    pub hit_slow_factor: f32,
    pub hit_min_speed_after: f32,
    pub hit_cooldown: f32,
}

impl Default for LocoParams {
    fn default() -> Self {
        Self {
            gravity: GravityParams::default(),
            always_accelerate: true,
            push_acceleration: 12.0,
            max_speed: 35.0,
            base_friction: 5.0,
            carve_extra_friction: 8.0,
            brake_extra_friction: 16.0,
            brake_strength: 18.0,
            boost_acceleration: 20.0,
            boost_max_speed_multiplier: 1.2,
            turn_rate_deg: 90.0,
            body_align_rate: 8.0,
            jump_force: 8.0,
            jump_axis: JumpAxis::Blended,
            ground_check_distance: 0.4,
            probe_lift: 0.2,
            probe_radius: 0.2,
            normal_smoothing_rate: 15.0,
            ride_dir_min_speed: 0.5,
            moving_epsilon: 0.1,
            steer_epsilon: 0.01,
            carve_threshold: 0.1,
            brake_threshold: 0.1,
            accelerate_threshold: 0.1,
            body_radius: 0.4,
            hit_slow_factor: 0.4,
            hit_min_speed_after: 5.0,
            hit_cooldown: 0.3,
        }
    }
}

impl LocoParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        self.gravity.validate()?;
        for (field, v) in [
            ("push_acceleration", self.push_acceleration),
            ("max_speed", self.max_speed),
            ("base_friction", self.base_friction),
            ("carve_extra_friction", self.carve_extra_friction),
            ("brake_extra_friction", self.brake_extra_friction),
            ("brake_strength", self.brake_strength),
            ("boost_acceleration", self.boost_acceleration),
            ("turn_rate_deg", self.turn_rate_deg),
            ("body_align_rate", self.body_align_rate),
            ("jump_force", self.jump_force),
            ("ground_check_distance", self.ground_check_distance),
            ("probe_lift", self.probe_lift),
            ("probe_radius", self.probe_radius),
            ("normal_smoothing_rate", self.normal_smoothing_rate),
            ("ride_dir_min_speed", self.ride_dir_min_speed),
            ("moving_epsilon", self.moving_epsilon),
            ("steer_epsilon", self.steer_epsilon),
            ("carve_threshold", self.carve_threshold),
            ("brake_threshold", self.brake_threshold),
            ("accelerate_threshold", self.accelerate_threshold),
            ("body_radius", self.body_radius),
            ("hit_min_speed_after", self.hit_min_speed_after),
            ("hit_cooldown", self.hit_cooldown),
        ] {
            ParamError::check_non_negative(field, v)?;
        }
        ParamError::check_range("boost_max_speed_multiplier", self.boost_max_speed_multiplier, 1.0, 10.0)?;
        ParamError::check_range("hit_slow_factor", self.hit_slow_factor, 0.0, 1.0)?;
        Ok(())
    }
}

/// Unscaled speed constants, kept so multiplier changes never compound.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct SpeedBase {
    pub max_speed: f32,
    pub push_acceleration: f32,
    pub boost_acceleration: f32,
}

impl SpeedBase {
    pub(crate) fn of(p: &LocoParams) -> Self {
        Self { max_speed: p.max_speed, push_acceleration: p.push_acceleration, boost_acceleration: p.boost_acceleration }
    }
    pub(crate) fn apply(&self, p: &mut LocoParams, mul: f32) {
        p.max_speed = self.max_speed * mul;
        p.push_acceleration = self.push_acceleration * mul;
        p.boost_acceleration = self.boost_acceleration * mul;
    }
}
