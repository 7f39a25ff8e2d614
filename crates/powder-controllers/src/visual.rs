use powder_core::{look_rotation, lerp_t, project_on_plane, ParamError, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::tricks::TrickState;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualParams {
    /// Roll into the turn at full steering (deg).
    pub lean_deg: f32,
    /// Display slerp rate (1/s).
    pub lean_rate: f32,
    pub brake_yaw_deg: f32,
    pub brake_rate: f32,
    pub brake_back_lean_deg: f32,
    /// Fixed yaw between the physics frame and the mesh (deg).
    pub mesh_offset_deg: f32,
    pub upright_rate: f32,
}

impl Default for VisualParams {
    fn default() -> Self {
        Self {
            lean_deg: 25.0,
            lean_rate: 15.0,
            brake_yaw_deg: 90.0,
            brake_rate: 10.0,
            brake_back_lean_deg: 20.0,
            mesh_offset_deg: -90.0,
            upright_rate: 10.0,
        }
    }
}

impl VisualParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        ParamError::check_finite("lean_deg", self.lean_deg)?;
        ParamError::check_finite("brake_yaw_deg", self.brake_yaw_deg)?;
        ParamError::check_finite("brake_back_lean_deg", self.brake_back_lean_deg)?;
        ParamError::check_finite("mesh_offset_deg", self.mesh_offset_deg)?;
        ParamError::check_non_negative("lean_rate", self.lean_rate)?;
        ParamError::check_non_negative("brake_rate", self.brake_rate)?;
        ParamError::check_non_negative("upright_rate", self.upright_rate)?;
        Ok(())
    }
}

/// Everything the blend reads for one frame.
#[derive(Copy, Clone, Debug)]
pub struct VisualInput {
    pub physics_rot: Quat,
    pub ground_normal: Vec3,
    pub grounded: bool,
    pub braking: bool,
    pub steering: f32,
    /// Trick phase is airborne (set at takeoff, cleared at landing).
    pub in_air: bool,
    pub flip_deg: f32,
    pub spin_deg: f32,
    pub takeoff_rot: Quat,
}

impl VisualInput {
    pub fn new(physics_rot: Quat, ground_normal: Vec3, grounded: bool, braking: bool, steering: f32, tricks: &TrickState) -> Self {
        Self {
            physics_rot,
            ground_normal,
            grounded,
            braking: grounded && braking,
            steering,
            in_air: tricks.airborne(),
            flip_deg: tricks.flip_angle,
            spin_deg: tricks.spin_angle,
            takeoff_rot: tricks.takeoff_rot,
        }
    }
}

/// Display orientation, kept apart from the physics orientation.
///
/// target = base * brake yaw * lean * (spin * flip) * mesh offset, optionally pulled upright on the
/// slope while grounded; the display slerps toward it.
#[derive(Copy, Clone, Debug)]
pub struct VisualBlend {
    params: VisualParams,
    brake_yaw: f32,
    target: Quat,
    display: Quat,
}

impl VisualBlend {
    pub fn new(params: VisualParams, initial: Quat) -> Self {
        let offset = Quat::from_rotation_y(params.mesh_offset_deg.to_radians());
        let rot = (initial * offset).normalize();
        Self { params, brake_yaw: 0.0, target: rot, display: rot }
    }

    #[inline] pub fn params(&self) -> &VisualParams { &self.params }
    #[inline] pub fn display(&self) -> Quat { self.display }
    #[inline] pub fn target(&self) -> Quat { self.target }
    #[inline] pub fn brake_yaw(&self) -> f32 { self.brake_yaw }

    pub fn update(&mut self, inp: &VisualInput, dt: f32) -> Quat {
        let p = &self.params;
        let on_ground = inp.grounded && !inp.in_air;

        let lean = if on_ground && !inp.braking {
            -inp.steering * p.lean_deg
        } else if inp.grounded && inp.braking {
            -p.brake_back_lean_deg
        } else {
            0.0
        };

        let brake_target = if inp.grounded && inp.braking { p.brake_yaw_deg } else { 0.0 };
        self.brake_yaw += (brake_target - self.brake_yaw) * lerp_t(p.brake_rate, dt);

        let base = if inp.in_air { inp.takeoff_rot } else { inp.physics_rot };
        let brake = Quat::from_rotation_y(self.brake_yaw.to_radians());
        let roll = Quat::from_rotation_z(lean.to_radians());
        let trick = Quat::from_rotation_y(inp.spin_deg.to_radians()) * Quat::from_rotation_x(inp.flip_deg.to_radians());
        let offset = Quat::from_rotation_y(p.mesh_offset_deg.to_radians());
        let mut target = (base * brake * roll * trick * offset).normalize();

        if on_ground {
            let n = inp.ground_normal.try_normalize().unwrap_or(Vec3::Y);
            let mut flat = project_on_plane(target * Vec3::Z, n);
            if flat.length_squared() < 1.0e-4 {
                flat = project_on_plane(target * Vec3::X, n);
            }
            if flat.length_squared() > 1.0e-4 {
                if let Some(upright) = look_rotation(flat, n) {
                    target = target.slerp(upright, lerp_t(p.upright_rate, dt));
                }
            }
        }

        self.target = target;
        self.display = self.display.slerp(target, lerp_t(p.lean_rate, dt)).normalize();
        self.display
    }
}
