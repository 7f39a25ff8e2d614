use powder_core::{BodyId, Isometry, Quat, Scalar, Vec3};

/// Input descriptor when creating a body.
#[derive(Copy, Clone, Debug)]
pub struct BodyDesc {
    pub id: BodyId,
    pub pose: Isometry,
    pub lin_vel: Vec3,
}

/// Position, orientation and linear velocity, as read by telemetry.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RigidState {
    pub pos: Vec3,
    pub rot: Quat,
    pub lin_vel: Vec3,
}

/// The single rigid body the rider controller drives.
///
/// Accelerations queue up during a physics tick and are applied by `integrate`; velocity
/// writes and velocity changes take effect immediately.
#[derive(Clone, Debug)]
pub struct RigidBody {
    id: BodyId,
    pos: Vec3,
    rot: Quat,
    linvel: Vec3,
    acc: Vec3,
}

impl RigidBody {
    pub fn new(desc: BodyDesc) -> Self {
        Self { id: desc.id, pos: desc.pose.pos, rot: desc.pose.rot.normalize(), linvel: desc.lin_vel, acc: Vec3::ZERO }
    }

    #[inline] pub fn id(&self) -> BodyId { self.id }

    #[inline] pub fn pose(&self) -> Isometry { Isometry { pos: self.pos, rot: self.rot } }
    #[inline] pub fn set_pose(&mut self, iso: Isometry) {
        self.pos = iso.pos;
        self.rot = iso.rot.normalize();
    }
    #[inline] pub fn position(&self) -> Vec3 { self.pos }
    #[inline] pub fn set_position(&mut self, p: Vec3) { self.pos = p; }
    #[inline] pub fn rotation(&self) -> Quat { self.rot }
    #[inline] pub fn set_rotation(&mut self, q: Quat) { self.rot = q.normalize(); }

    #[inline] pub fn vel(&self) -> Vec3 { self.linvel }
    #[inline] pub fn set_vel(&mut self, v: Vec3) { self.linvel = v; }

    #[inline] pub fn state(&self) -> RigidState { RigidState { pos: self.pos, rot: self.rot, lin_vel: self.linvel } }

    /// Queue an acceleration for the next `integrate`.
    #[inline] pub fn add_acceleration(&mut self, a: Vec3) { self.acc += a; }
    #[inline] pub fn pending_acceleration(&self) -> Vec3 { self.acc }

    /// Instant velocity change, independent of mass.
    #[inline] pub fn apply_velocity_change(&mut self, dv: Vec3) { self.linvel += dv; }

    /// Semi-implicit Euler; clears the queued acceleration.
    pub fn integrate(&mut self, dt: Scalar) {
        self.linvel += self.acc * dt;
        self.pos += self.linvel * dt;
        self.acc = Vec3::ZERO;
    }
}
