use powder_core::Vec3;
use serde::{Deserialize, Serialize};

/// Something chasing the rider. Only sees the rider's position.
pub trait Pursuer {
    /// Advance by `dt`; true once the rider is caught.
    fn advance(&mut self, rider_pos: Vec3, dt: f32) -> bool;

    /// Start a new run with the rider at `rider_pos`.
    fn reset(&mut self, _rider_pos: Vec3) {}

    fn position(&self) -> Option<Vec3> { None }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaserParams {
    pub base_speed: f32,
    pub speed_ramp: f32,
    pub max_speed: f32,
    /// Spawn distance uphill of the rider.
    pub start_offset: f32,
    pub catch_distance: f32,
    /// Beyond this distance the chaser runs at `chase_speed`.
    pub chase_threshold: f32,
    pub chase_speed: f32,
    /// Rider travel between breadcrumbs.
    pub sample_distance: f32,
    pub waypoint_epsilon: f32,
    /// Direction the chaser rolls when it has no breadcrumbs left.
    pub downhill: Vec3,
}

impl Default for ChaserParams {
    fn default() -> Self {
        Self {
            base_speed: 20.0,
            speed_ramp: 0.2,
            max_speed: 50.0,
            start_offset: 100.0,
            catch_distance: 5.0,
            chase_threshold: 200.0,
            chase_speed: 50.0,
            sample_distance: 50.0,
            waypoint_epsilon: 2.0,
            downhill: Vec3::Z,
        }
    }
}

/// Follows a breadcrumb trail of rider positions, speeding up over time.
#[derive(Clone, Debug)]
pub struct Chaser {
    params: ChaserParams,
    pos: Vec3,
    trail: Vec<Vec3>,
    last_crumb: Vec3,
    elapsed: f32,
    caught: bool,
}

impl Chaser {
    pub fn new(params: ChaserParams, rider_pos: Vec3) -> Self {
        let mut c = Self { params, pos: rider_pos, trail: Vec::new(), last_crumb: rider_pos, elapsed: 0.0, caught: false };
        c.reset(rider_pos);
        c
    }

    #[inline] pub fn caught(&self) -> bool { self.caught }

    fn speed(&self, dist: f32) -> f32 {
        let p = &self.params;
        if dist > p.chase_threshold { p.chase_speed } else { (p.base_speed + p.speed_ramp * self.elapsed).min(p.max_speed) }
    }
}

impl Pursuer for Chaser {
    fn advance(&mut self, rider_pos: Vec3, dt: f32) -> bool {
        if self.caught { return true; }
        self.elapsed += dt;

        if rider_pos.distance(self.last_crumb) >= self.params.sample_distance {
            self.trail.push(rider_pos);
            self.last_crumb = rider_pos;
        }

        let step = self.speed(self.pos.distance(rider_pos)) * dt;
        match self.trail.first().copied() {
            Some(target) => {
                let to = target - self.pos;
                let d = to.length();
                if d <= self.params.waypoint_epsilon {
                    self.trail.remove(0);
                } else {
                    self.pos += to / d * d.min(step);
                }
            }
            None => self.pos += self.params.downhill.normalize_or_zero() * step,
        }

        if self.pos.distance(rider_pos) <= self.params.catch_distance {
            self.caught = true;
            tracing::debug!(pos = ?self.pos, "rider caught");
        }
        self.caught
    }

    fn reset(&mut self, rider_pos: Vec3) {
        self.pos = rider_pos - self.params.downhill.normalize_or_zero() * self.params.start_offset;
        self.trail.clear();
        self.trail.push(rider_pos);
        self.last_crumb = rider_pos;
        self.elapsed = 0.0;
        self.caught = false;
    }

    fn position(&self) -> Option<Vec3> { Some(self.pos) }
}
