use powder_core::{BodyId, ColliderId, Vec3};

/// One candidate surface under a downward sphere cast.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GroundHit {
    pub point: Vec3,
    pub normal: Vec3,
    /// Distance travelled by the sphere before touching; 0 when it started in contact.
    pub distance: f32,
    /// Body owning the surface, `None` for static scenery.
    pub owner: Option<BodyId>,
    /// Stable ordering key for tie-breaks.
    pub index: usize,
}

/// Downward shape queries against whatever the rider slides on.
pub trait GroundProbe {
    /// Push every surface hit by a sphere of `radius` cast from `origin` straight down by up to
    /// `max_dist`. Self-rejection is the caller's job; report everything.
    fn cast_down(&self, origin: Vec3, radius: f32, max_dist: f32, out: &mut Vec<GroundHit>);

    /// Highest supporting surface height under `p` (ignoring surfaces owned by `ignore`) whose
    /// top is no higher than `p.y + step_up`, with its normal.
    fn surface_below(&self, p: Vec3, step_up: f32, ignore: BodyId) -> Option<(f32, Vec3)>;
}

/// Overlap with an obstacle-category collider.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ObstacleContact {
    pub id: ColliderId,
    /// Closest point on the obstacle to the query center.
    pub point: Vec3,
}

pub trait ObstacleQuery {
    fn overlapping_obstacles(&self, center: Vec3, radius: f32, out: &mut Vec<ObstacleContact>);
}
