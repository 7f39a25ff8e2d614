//! Slope-local gravity: a stick term into the slope plus a downhill pull along it while
//! grounded, plain downward acceleration while airborne.

use powder_core::{project_on_plane, ParamError, Vec3};
use serde::{Deserialize, Serialize};

/// World down. The ground probe casts along this axis too.
pub const DOWN: Vec3 = Vec3::NEG_Y;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityParams {
    /// Downhill pull along the slope plane (m/s^2).
    pub slope_gravity: f32,
    /// Pull into the slope along -normal (m/s^2).
    pub stick_gravity: f32,
    /// Straight-down acceleration while airborne (m/s^2).
    pub air_gravity: f32,
}

impl Default for GravityParams {
    fn default() -> Self { Self { slope_gravity: 25.0, stick_gravity: 40.0, air_gravity: 30.0 } }
}

impl GravityParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        ParamError::check_non_negative("slope_gravity", self.slope_gravity)?;
        ParamError::check_non_negative("stick_gravity", self.stick_gravity)?;
        ParamError::check_non_negative("air_gravity", self.air_gravity)?;
        Ok(())
    }
}

#[derive(Copy, Clone, Debug)]
pub enum Support {
    /// In contact; `normal` is the smoothed slope normal (unit).
    Grounded { normal: Vec3 },
    Airborne,
}

/// The two grounded terms, kept apart for telemetry.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SlopeGravity {
    pub stick: Vec3,
    pub downhill: Vec3,
}

/// Grounded decomposition. On flat ground the downhill term vanishes.
#[inline]
pub fn decompose(params: &GravityParams, normal: Vec3) -> SlopeGravity {
    let downhill = project_on_plane(DOWN, normal).normalize_or_zero();
    SlopeGravity {
        stick: -normal * params.stick_gravity,
        downhill: downhill * params.slope_gravity,
    }
}

#[inline]
pub fn eval(params: &GravityParams, support: Support) -> Vec3 {
    match support {
        Support::Grounded { normal } => {
            let g = decompose(params, normal);
            g.stick + g.downhill
        }
        Support::Airborne => DOWN * params.air_gravity,
    }
}
