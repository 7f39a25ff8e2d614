use powder_core::{slerp_dir, lerp_t, BodyId, Vec3};
use powder_geom::{pick_better, SweepHit};
use powder_terrain::{GroundHit, GroundProbe};

use crate::params::LocoParams;

/// Result of the downward probe, refreshed every physics tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GroundInfo {
    pub grounded: bool,
    /// Grounded flag of the previous tick.
    pub was_grounded: bool,
    /// Raw hit normal; up when nothing was hit.
    pub normal: Vec3,
    /// `normal` relaxed over time. Always unit length.
    pub smoothed_normal: Vec3,
    /// Probe distance to the hit surface, if any.
    pub distance: Option<f32>,
}

impl Default for GroundInfo {
    fn default() -> Self {
        Self { grounded: false, was_grounded: false, normal: Vec3::Y, smoothed_normal: Vec3::Y, distance: None }
    }
}

impl GroundInfo {
    #[inline] pub fn just_landed(&self) -> bool { self.grounded && !self.was_grounded }
    #[inline] pub fn just_left(&self) -> bool { !self.grounded && self.was_grounded }

    /// Fold one probe result in. Smoothing runs whether or not anything was hit, so a one-tick
    /// contact loss does not snap the velocity frame.
    pub fn update(&mut self, hit: Option<(Vec3, f32)>, smoothing_rate: f32, dt: f32) {
        self.was_grounded = self.grounded;
        match hit {
            Some((n, d)) => {
                self.grounded = true;
                self.normal = n;
                self.distance = Some(d);
            }
            None => {
                self.grounded = false;
                self.normal = Vec3::Y;
                self.distance = None;
            }
        }
        self.smoothed_normal = slerp_dir(self.smoothed_normal, self.normal, lerp_t(smoothing_rate, dt));
    }
}

/// Nearest usable surface under `base`: hits owned by `me` are skipped, distance ties go to the
/// lower index. Returns `(unit normal, distance)`.
pub fn probe_ground(
    probe: &impl GroundProbe,
    base: Vec3,
    me: BodyId,
    p: &LocoParams,
    scratch: &mut Vec<GroundHit>,
) -> Option<(Vec3, f32)> {
    scratch.clear();
    let origin = base + Vec3::Y * p.probe_lift;
    let reach = (p.probe_lift - p.probe_radius).max(0.0) + p.ground_check_distance;
    probe.cast_down(origin, p.probe_radius, reach, scratch);

    let mut best: Option<SweepHit> = None;
    for h in scratch.iter() {
        if h.owner == Some(me) { continue; }
        let n = h.normal.normalize_or_zero();
        if n == Vec3::ZERO || !n.is_finite() || !h.distance.is_finite() { continue; }
        best = pick_better(best, SweepHit { toi: h.distance, normal: n, target_index: h.index });
    }
    best.map(|b| (b.normal, b.toi))
}
