use powder_core::Vec3;
use crate::aabb::Aabb;

fn ray_aabb_slab(origin: Vec3, dir: Vec3, aabb: &Aabb) -> Option<(f32, Vec3)> {
    let inv = Vec3::new(
        if dir.x.abs() > 1e-9 { 1.0 / dir.x } else { 1.0e9 },
        if dir.y.abs() > 1e-9 { 1.0 / dir.y } else { 1.0e9 },
        if dir.z.abs() > 1e-9 { 1.0 / dir.z } else { 1.0e9 },
    );
    let t1 = (aabb.min - origin) * inv;
    let t2 = (aabb.max - origin) * inv;
    let tmin = t1.min(t2);
    let tmax = t1.max(t2);
    let mut t_enter = tmin.x; let mut n = Vec3::new(if t1.x > t2.x { 1.0 } else { -1.0 }, 0.0, 0.0);
    if tmin.y > t_enter { t_enter = tmin.y; n = Vec3::new(0.0, if t1.y > t2.y { 1.0 } else { -1.0 }, 0.0); }
    if tmin.z > t_enter { t_enter = tmin.z; n = Vec3::new(0.0, 0.0, if t1.z > t2.z { 1.0 } else { -1.0 }); }
    let t_exit = tmax.x.min(tmax.y).min(tmax.z);
    if t_enter <= t_exit && t_exit >= 0.0 && (0.0..=1.0).contains(&t_enter) { Some((t_enter, n)) } else { None }
}

fn expand_aabb(aabb: &Aabb, r: f32) -> Aabb { let e = Vec3::splat(r); Aabb { min: aabb.min - e, max: aabb.max + e } }

/// Sphere of radius `r` moving by `motion` from `p0`. Returns `(toi in [0,1], face normal)`.
/// A sphere already overlapping the box reports `toi = 0` with an up normal.
pub fn sweep_sphere_vs_aabb(p0: Vec3, motion: Vec3, r: f32, aabb: &Aabb) -> Option<(f32, Vec3)> {
    let e = expand_aabb(aabb, r);
    if e.contains(p0) { return Some((0.0, Vec3::Y)); }
    if motion.length_squared() < 1e-12 { return None; }
    ray_aabb_slab(p0, motion, &e)
}

#[derive(Copy, Clone, Debug)]
pub struct SweepHit { pub toi: f32, pub normal: Vec3, pub target_index: usize }

/// Earliest hit wins; ties go to the lower index so probe results never depend on float noise.
pub fn pick_better(cur: Option<SweepHit>, cand: SweepHit) -> Option<SweepHit> {
    match cur {
        None => Some(cand),
        Some(b) => {
            if cand.toi < b.toi - 1e-9 { return Some(cand); }
            if (cand.toi - b.toi).abs() <= 1e-9 && cand.target_index < b.target_index { return Some(cand); }
            Some(b)
        }
    }
}
