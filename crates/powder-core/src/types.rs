use glam::{Mat3, Quat};
use crate::Scalar;

pub type Vec3 = glam::Vec3;

#[inline] pub fn vec3(x: Scalar, y: Scalar, z: Scalar) -> Vec3 { Vec3::new(x, y, z) }
#[inline] pub fn iso(pos: Vec3, rot: Quat) -> Isometry { Isometry { pos, rot } }

/// Body frame convention: +X right, +Y up, +Z forward.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Isometry { pub pos: Vec3, pub rot: Quat }

impl Default for Isometry {
    fn default() -> Self { Self { pos: Vec3::ZERO, rot: Quat::IDENTITY } }
}

impl Isometry {
    #[inline] pub fn forward(&self) -> Vec3 { self.rot * Vec3::Z }
    #[inline] pub fn right(&self) -> Vec3 { self.rot * Vec3::X }
    #[inline] pub fn up(&self) -> Vec3 { self.rot * Vec3::Y }
}

/// Remove the component of `v` along the unit normal `n`.
#[inline]
pub fn project_on_plane(v: Vec3, n: Vec3) -> Vec3 { v - n * v.dot(n) }

/// Rotation whose +Z looks along `forward` and whose +Y is as close to `up` as possible.
/// `None` when `forward` is zero or parallel to `up`; callers pick their own fallback axis.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let f = forward.normalize_or_zero();
    if f == Vec3::ZERO { return None; }
    let r = up.cross(f);
    if r.length_squared() < 1.0e-8 { return None; }
    let r = r.normalize();
    let u = f.cross(r);
    Some(Quat::from_mat3(&Mat3::from_cols(r, u, f)).normalize())
}

/// Spherical step from unit `a` toward unit `b` by fraction `t`. Always returns a unit vector;
/// degenerate input falls back to `a` (or +Y if `a` itself is unusable).
pub fn slerp_dir(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    let a = a.normalize_or_zero();
    let a = if a == Vec3::ZERO { Vec3::Y } else { a };
    let b = b.normalize_or_zero();
    if b == Vec3::ZERO { return a; }
    let arc = Quat::from_rotation_arc(a, b);
    let out = (Quat::IDENTITY.slerp(arc, t.clamp(0.0, 1.0)) * a).normalize_or_zero();
    if out == Vec3::ZERO || !out.is_finite() { a } else { out }
}

/// Step `cur` toward `target` by at most `max_delta`, landing exactly on it.
#[inline]
pub fn move_towards(cur: f32, target: f32, max_delta: f32) -> f32 {
    let d = target - cur;
    if d.abs() <= max_delta { target } else { cur + d.signum() * max_delta }
}

/// Wrap degrees into [-180, 180].
#[inline]
pub fn wrap_degrees(a: f32) -> f32 {
    let w = (a + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if w > 180.0 { w - 360.0 } else { w }
}

/// Frame-rate scaled blend factor, clamped the way lerp/slerp expect it.
#[inline]
pub fn lerp_t(rate: f32, dt: f32) -> f32 { (rate * dt).clamp(0.0, 1.0) }

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool { (a - b).length() < 1.0e-4 }

    #[test]
    fn look_rotation_maps_axes() {
        let q = look_rotation(Vec3::X, Vec3::Y).expect("valid basis");
        assert!(close(q * Vec3::Z, Vec3::X));
        assert!(close(q * Vec3::Y, Vec3::Y));
        assert!(close(q * Vec3::X, -Vec3::Z));
    }

    #[test]
    fn look_rotation_on_slope_keeps_up_on_normal() {
        let n = vec3(0.0, 1.0, 0.5).normalize();
        let fwd = project_on_plane(Vec3::Z, n).normalize();
        let q = look_rotation(fwd, n).expect("valid basis");
        assert!(close(q * Vec3::Y, n));
        assert!(close(q * Vec3::Z, fwd));
    }

    #[test]
    fn look_rotation_degenerate_is_none() {
        assert!(look_rotation(Vec3::Y, Vec3::Y).is_none());
        assert!(look_rotation(Vec3::ZERO, Vec3::Y).is_none());
    }

    #[test]
    fn slerp_dir_stays_unit() {
        let a = Vec3::Y;
        let b = vec3(0.0, 0.2, 1.0).normalize();
        let mut cur = a;
        for _ in 0..50 {
            cur = slerp_dir(cur, b, 0.3);
            assert!((cur.length() - 1.0).abs() < 1.0e-5);
        }
        assert!((cur - b).length() < 1.0e-3);
        let opp = slerp_dir(Vec3::Y, Vec3::NEG_Y, 0.5);
        assert!((opp.length() - 1.0).abs() < 1.0e-5);
        assert_eq!(slerp_dir(Vec3::Y, Vec3::ZERO, 0.5), Vec3::Y);
    }

    #[test]
    fn wrap_degrees_range() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert!((wrap_degrees(540.0) - 180.0).abs() < 1e-4 || (wrap_degrees(540.0) + 180.0).abs() < 1e-4);
        assert!((wrap_degrees(-370.0) + 10.0).abs() < 1e-4);
        assert!((wrap_degrees(725.0) - 5.0).abs() < 1e-4);
        for i in -2000..2000 {
            let w = wrap_degrees(i as f32 * 1.7);
            assert!((-180.0..=180.0).contains(&w));
        }
    }

    #[test]
    fn move_towards_never_overshoots() {
        assert_eq!(move_towards(1.0, 0.0, 5.0), 0.0);
        assert_eq!(move_towards(10.0, 0.0, 3.0), 7.0);
        assert_eq!(move_towards(-10.0, 0.0, 3.0), -7.0);
    }

    #[test]
    fn wrap_and_slerp_hold_for_any_input() {
        bolero::check!().with_type::<(f32, (f32, f32, f32), (f32, f32, f32), f32)>().for_each(|&(a, (ax, ay, az), (bx, by, bz), t)| {
            if a.is_finite() && a.abs() < 1.0e6 {
                let w = wrap_degrees(a);
                assert!((-180.0..=180.0).contains(&w), "{a} -> {w}");
            }
            let (va, vb) = (Vec3::new(ax, ay, az), Vec3::new(bx, by, bz));
            if !(va.is_finite() && vb.is_finite() && t.is_finite()) { return; }
            let usable = |v: Vec3| (1.0e-6..1.0e12).contains(&v.length_squared());
            if !usable(va) || !(usable(vb) || vb == Vec3::ZERO) { return; }
            let out = slerp_dir(va, vb, t);
            assert!((out.length() - 1.0).abs() < 1.0e-3, "{va} {vb} {t} -> {out}");
        });
    }
}
