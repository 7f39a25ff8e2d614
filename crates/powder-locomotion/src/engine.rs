use powder_core::{look_rotation, lerp_t, move_towards, project_on_plane, ColliderId, InputIntent, Quat, StepCtx, Vec3};
use powder_dynamics::RigidBody;
use powder_gravity::{eval, Support};
use powder_terrain::{GroundHit, GroundProbe, ObstacleContact, ObstacleQuery};
use tracing::debug;

use crate::ground::{probe_ground, GroundInfo};
use crate::params::{JumpAxis, LocoParams, SpeedBase};

/// Below this speed an obstacle hit leaves velocity alone.
const HIT_MIN_SPEED: f32 = 0.1;

/// What happened during one physics step.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LocoStepReport {
    pub took_off: bool,
    pub landed: bool,
    pub jumped: bool,
    pub braking: bool,
    pub hit: Option<ObstacleHit>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ObstacleHit {
    pub id: ColliderId,
    /// Closest point on the obstacle to the body.
    pub point: Vec3,
    pub speed_before: f32,
    pub speed_after: f32,
}

/// Tangent-frame decomposition from the last grounded step, kept for telemetry and tests.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TangentFrame {
    pub forward: Vec3,
    pub right: Vec3,
    pub normal: Vec3,
    pub forward_speed: f32,
    pub side_speed: f32,
    pub normal_speed: f32,
}

/// Slope-relative rider locomotion over a single rigid body.
///
/// One `step` per physics tick: probe, local gravity, ground movement, jump, clamp, obstacle
/// response, integration, ground contact.
#[derive(Clone, Debug)]
pub struct LocomotionEngine {
    params: LocoParams,
    base: SpeedBase,
    speed_multiplier: f32,

    ground: GroundInfo,
    ride_dir: Vec3,
    frame: TangentFrame,
    braking: bool,
    boosting: bool,
    jump_latched: bool,

    last_hit_time: Option<f32>,
    prev_overlaps: Vec<ColliderId>,

    hits: Vec<GroundHit>,
    contacts: Vec<ObstacleContact>,
}

impl LocomotionEngine {
    pub fn new(params: LocoParams) -> Self {
        Self {
            params,
            base: SpeedBase::of(&params),
            speed_multiplier: 1.0,
            ground: GroundInfo::default(),
            ride_dir: Vec3::Z,
            frame: TangentFrame::default(),
            braking: false,
            boosting: false,
            jump_latched: false,
            last_hit_time: None,
            prev_overlaps: Vec::new(),
            hits: Vec::with_capacity(8),
            contacts: Vec::with_capacity(8),
        }
    }

    #[inline] pub fn params(&self) -> &LocoParams { &self.params }
    #[inline] pub fn ground(&self) -> &GroundInfo { &self.ground }
    #[inline] pub fn grounded(&self) -> bool { self.ground.grounded }
    #[inline] pub fn ride_direction(&self) -> Vec3 { self.ride_dir }
    #[inline] pub fn tangent_frame(&self) -> &TangentFrame { &self.frame }
    #[inline] pub fn braking(&self) -> bool { self.braking }
    #[inline] pub fn boosting(&self) -> bool { self.boosting }
    #[inline] pub fn speed_multiplier(&self) -> f32 { self.speed_multiplier }

    /// Current speed cap, boost included.
    #[inline] pub fn max_speed(&self) -> f32 {
        self.params.max_speed * if self.boosting { self.params.boost_max_speed_multiplier } else { 1.0 }
    }

    /// Scale max speed, push and boost from their unscaled values. Non-finite or negative
    /// multipliers are ignored.
    pub fn set_speed_multiplier(&mut self, mul: f32) {
        if !mul.is_finite() || mul < 0.0 { return; }
        self.speed_multiplier = mul;
        self.base.apply(&mut self.params, mul);
    }

    /// Replace the tunables; the current speed multiplier is re-applied on top.
    pub fn set_params(&mut self, params: LocoParams) {
        self.params = params;
        self.base = SpeedBase::of(&params);
        self.base.apply(&mut self.params, self.speed_multiplier);
    }

    /// Forget contact and latch state, e.g. after teleporting the body.
    pub fn reset(&mut self, forward: Vec3) {
        self.ground = GroundInfo::default();
        self.ride_dir = project_on_plane(forward, Vec3::Y).try_normalize().unwrap_or(Vec3::Z);
        self.frame = TangentFrame::default();
        self.braking = false;
        self.boosting = false;
        self.jump_latched = false;
        self.last_hit_time = None;
        self.prev_overlaps.clear();
    }

    pub fn step<W>(&mut self, body: &mut RigidBody, world: &W, input: InputIntent, ctx: StepCtx) -> LocoStepReport
    where
        W: GroundProbe + ObstacleQuery,
    {
        let input = input.sanitized();
        let dt = ctx.dt;
        let mut report = LocoStepReport::default();

        self.probe(body, world, dt);
        report.took_off = self.ground.just_left();
        report.landed = self.ground.just_landed();
        if report.landed { debug!(tick = ctx.tick, "landed"); }
        if report.took_off { debug!(tick = ctx.tick, "took off"); }

        self.apply_local_gravity(body);

        self.boosting = input.boost;
        if self.ground.grounded {
            self.ground_movement(body, &input, dt);
        } else {
            self.braking = false;
            self.ride_dir = heading_on_plane(self.ride_dir, body.pose().forward(), self.ground.smoothed_normal);
        }
        report.braking = self.braking;

        if input.jump_pressed {
            report.jumped = self.handle_jump(body);
            if report.jumped { debug!(tick = ctx.tick, vel = ?body.vel(), "jump"); }
        }

        self.clamp_speed(body);
        report.hit = self.respond_to_obstacles(body, world, ctx.time);

        body.integrate(dt);
        self.resolve_ground_contact(body, world);
        report
    }

    /* ---------- probe + gravity ---------- */

    fn probe(&mut self, body: &RigidBody, world: &impl GroundProbe, dt: f32) {
        let hit = probe_ground(world, body.position(), body.id(), &self.params, &mut self.hits);
        self.ground.update(hit, self.params.normal_smoothing_rate, dt);
        if self.ground.just_landed() {
            self.jump_latched = false;
        }
    }

    fn apply_local_gravity(&self, body: &mut RigidBody) {
        let support = if self.ground.grounded {
            Support::Grounded { normal: self.ground.smoothed_normal }
        } else {
            Support::Airborne
        };
        body.add_acceleration(eval(&self.params.gravity, support));
    }

    /* ---------- ground movement ---------- */

    fn ground_movement(&mut self, body: &mut RigidBody, input: &InputIntent, dt: f32) {
        let p = &self.params;
        let n = self.ground.smoothed_normal;
        let vel = body.vel();

        let mut planar = project_on_plane(vel, n);
        let planar_speed = planar.length();

        self.ride_dir = if planar_speed > p.ride_dir_min_speed {
            planar / planar_speed
        } else {
            heading_on_plane(self.ride_dir, body.pose().forward(), n)
        };

        let moving = planar_speed > p.moving_epsilon;
        self.braking = input.throttle < -p.brake_threshold && moving;

        if !self.braking && input.steering.abs() > p.steer_epsilon && moving {
            let turn = Quat::from_axis_angle(n, (input.steering * p.turn_rate_deg * dt).to_radians());
            self.ride_dir = (turn * self.ride_dir).normalize();
            planar = turn * planar;
        }

        let fwd = self.ride_dir;
        let right = n.cross(fwd);
        let mut forward_speed = planar.dot(fwd);
        let mut side_speed = planar.dot(right);
        let normal_speed = vel.dot(n);

        let mut friction = p.base_friction;
        if input.steering.abs() > p.carve_threshold { friction += p.carve_extra_friction; }
        if self.braking { friction += p.brake_extra_friction; }
        side_speed = move_towards(side_speed, 0.0, friction * dt);

        forward_speed = move_towards(forward_speed, 0.0, 0.5 * p.base_friction * dt);

        let accelerate = if p.always_accelerate { !self.braking } else { input.throttle > p.accelerate_threshold };
        if accelerate { forward_speed += p.push_acceleration * dt; }
        if input.boost && !self.braking { forward_speed += p.boost_acceleration * dt; }

        if self.braking {
            forward_speed = move_towards(forward_speed, 0.0, p.brake_strength * dt);
        }

        body.set_vel(fwd * forward_speed + right * side_speed + n * normal_speed);
        self.frame = TangentFrame { forward: fwd, right, normal: n, forward_speed, side_speed, normal_speed };

        if let Some(target) = look_rotation(fwd, n) {
            body.set_rotation(body.rotation().slerp(target, lerp_t(p.body_align_rate, dt)));
        }
    }

    /* ---------- jump / clamp ---------- */

    /// Fires at most once per ground-contact interval. Returns whether the impulse was applied.
    fn handle_jump(&mut self, body: &mut RigidBody) -> bool {
        if !self.ground.grounded || self.jump_latched { return false; }
        self.jump_latched = true;

        let n = self.ground.normal;
        let vel = body.vel();
        let into = vel.dot(n);
        if into < 0.0 { body.set_vel(vel - n * into); }

        let dir = match self.params.jump_axis {
            JumpAxis::Blended => (Vec3::Y + n).try_normalize().unwrap_or(Vec3::Y),
            JumpAxis::Normal => n,
            JumpAxis::WorldUp => Vec3::Y,
        };
        body.apply_velocity_change(dir * self.params.jump_force);
        true
    }

    fn clamp_speed(&self, body: &mut RigidBody) {
        let cap = self.max_speed();
        let vel = body.vel();
        let speed = vel.length();
        if speed > cap && speed > 0.0 {
            body.set_vel(vel * (cap / speed));
        }
    }

    /* ---------- obstacles ---------- */

    /// Slow the body on the first tick it overlaps an obstacle, unless still cooling down from the
    /// last hit. A hit never speeds the body up.
    pub fn respond_to_obstacles(&mut self, body: &mut RigidBody, world: &impl ObstacleQuery, time: f32) -> Option<ObstacleHit> {
        self.contacts.clear();
        world.overlapping_obstacles(body.position(), self.params.body_radius, &mut self.contacts);
        self.contacts.sort_by_key(|c| c.id);

        let entered = self.contacts.iter().find(|c| !self.prev_overlaps.contains(&c.id)).copied();
        self.prev_overlaps.clear();
        self.prev_overlaps.extend(self.contacts.iter().map(|c| c.id));

        let contact = entered?;
        if let Some(last) = self.last_hit_time {
            if time < last + self.params.hit_cooldown { return None; }
        }
        self.last_hit_time = Some(time);

        let vel = body.vel();
        let speed = vel.length();
        let mut speed_after = speed;
        if speed > HIT_MIN_SPEED {
            speed_after = (speed * self.params.hit_slow_factor).max(self.params.hit_min_speed_after).min(speed);
            body.set_vel(vel * (speed_after / speed));
        }
        debug!(id = %contact.id, speed, speed_after, "obstacle hit");
        Some(ObstacleHit { id: contact.id, point: contact.point, speed_before: speed, speed_after })
    }

    /* ---------- contact ---------- */

    /// Lift a body that sank into the surface back onto it and drop its into-surface velocity.
    fn resolve_ground_contact(&self, body: &mut RigidBody, world: &impl GroundProbe) {
        let pos = body.position();
        let Some((h, n)) = world.surface_below(pos, self.params.probe_lift, body.id()) else { return; };
        if pos.y >= h { return; }
        body.set_position(Vec3::new(pos.x, h, pos.z));
        let vel = body.vel();
        let into = vel.dot(n);
        if into < 0.0 { body.set_vel(vel - n * into); }
    }
}

/// Unit heading in the plane of `n`: the previous heading, else the body forward, else any
/// direction orthogonal to `n`.
fn heading_on_plane(prev: Vec3, forward: Vec3, n: Vec3) -> Vec3 {
    project_on_plane(prev, n)
        .try_normalize()
        .or_else(|| project_on_plane(forward, n).try_normalize())
        .unwrap_or_else(|| n.any_orthonormal_vector())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{UVec2, Vec2};
    use powder_core::{iso, vec3, BodyId, Isometry};
    use powder_dynamics::BodyDesc;
    use powder_geom::Shape;
    use powder_terrain::{Category, Course, HeightField};

    const DT: f32 = 0.02;

    fn flat() -> Course {
        Course::with_terrain(HeightField::incline(UVec2::new(64, 64), Vec2::ONE, 0.0), vec3(-32.0, 0.0, -32.0))
    }

    fn body_at(pos: Vec3, vel: Vec3) -> RigidBody {
        RigidBody::new(BodyDesc { id: BodyId(1), pose: iso(pos, Quat::IDENTITY), lin_vel: vel })
    }

    fn ctx(tick: u64) -> StepCtx { StepCtx::new(DT, tick, tick as f32 * DT) }

    fn coasting() -> LocoParams { LocoParams { always_accelerate: false, ..LocoParams::default() } }

    /// Engine that has already settled on the ground.
    fn settled(params: LocoParams, course: &Course, body: &mut RigidBody) -> LocomotionEngine {
        let mut e = LocomotionEngine::new(params);
        let v = body.vel();
        for t in 0..50 {
            body.set_vel(v);
            e.step(body, course, InputIntent::default(), ctx(t));
        }
        body.set_vel(v);
        e
    }

    #[test]
    fn rest_on_flat_ground_stays_at_rest() {
        let course = flat();
        let mut b = body_at(Vec3::ZERO, Vec3::ZERO);
        let mut e = LocomotionEngine::new(coasting());
        for t in 0..200 {
            e.step(&mut b, &course, InputIntent::default(), ctx(t));
            assert!(e.grounded());
            assert!(b.vel().length() <= 0.5 * 5.0 * DT + 1.0e-4);
        }
        assert!(b.vel().length() < 1.0e-4);
        assert!(b.position().y.abs() < 1.0e-4);
    }

    #[test]
    fn coasting_speed_decays_to_zero() {
        let course = flat();
        let mut b = body_at(Vec3::ZERO, vec3(0.0, 0.0, 2.0));
        let mut e = LocomotionEngine::new(coasting());
        let mut last = f32::INFINITY;
        for t in 0..400 {
            e.step(&mut b, &course, InputIntent::default(), ctx(t));
            let s = b.vel().length();
            assert!(s <= last + 1.0e-5);
            last = s;
        }
        assert!(last < 1.0e-4);
    }

    #[test]
    fn recomposition_preserves_normal_component() {
        let course = flat();
        let mut b = body_at(Vec3::ZERO, vec3(1.0, 0.0, 6.0));
        let mut e = settled(coasting(), &course, &mut b);
        b.set_vel(vec3(1.0, -0.3, 6.0));
        let n = e.ground().smoothed_normal;
        let before = b.vel().dot(n);
        let input = InputIntent { steering: 0.7, boost: true, ..InputIntent::default() };
        e.ground_movement(&mut b, &input, DT);
        assert!((b.vel().dot(n) - before).abs() < 1.0e-5);
        assert!((e.tangent_frame().normal_speed - before).abs() < 1.0e-5);
    }

    #[test]
    fn braking_reaches_zero_without_overshoot() {
        let course = flat();
        let mut b = body_at(Vec3::ZERO, vec3(0.0, 0.0, 10.0));
        let mut e = settled(LocoParams::default(), &course, &mut b);
        let brake = InputIntent { throttle: -1.0, boost: true, ..InputIntent::default() };
        let mut last = e.tangent_frame().forward_speed.abs().max(10.0);
        let mut reached = false;
        for t in 0..200 {
            e.step(&mut b, &course, brake, ctx(t));
            let f = e.tangent_frame().forward_speed;
            assert!(f >= 0.0, "forward speed flipped sign: {f}");
            assert!(f.abs() <= last + 1.0e-5);
            last = f.abs();
            if f == 0.0 { reached = true; break; }
        }
        assert!(reached);
        assert!(b.vel().length() < 1.0e-3);
    }

    #[test]
    fn steering_turns_ride_direction_by_turn_rate() {
        let course = flat();
        let mut b = body_at(Vec3::ZERO, vec3(0.0, 0.0, 10.0));
        let mut e = settled(coasting(), &course, &mut b);
        let input = InputIntent { steering: 1.0, ..InputIntent::default() };
        e.ground_movement(&mut b, &input, DT);
        let turned = Vec3::Z.angle_between(e.ride_direction()).to_degrees();
        assert!((turned - 90.0 * DT).abs() < 1.0e-2, "turned {turned}");
        // positive steering turns right (+X)
        assert!(e.ride_direction().x > 0.0);
        assert!(e.tangent_frame().side_speed.abs() < 1.0e-4);
        assert!((e.tangent_frame().forward_speed - (10.0 - 0.5 * 5.0 * DT)).abs() < 1.0e-4);
    }

    #[test]
    fn ride_direction_follows_velocity_before_steering() {
        let course = flat();
        let mut b = body_at(Vec3::ZERO, vec3(10.0, 0.0, 0.0));
        let mut e = settled(coasting(), &course, &mut b);
        // stale heading pointing elsewhere; velocity wins, then steering applies on top
        e.ride_dir = Vec3::Z;
        let input = InputIntent { steering: 1.0, ..InputIntent::default() };
        e.ground_movement(&mut b, &input, DT);
        let expected = Quat::from_axis_angle(Vec3::Y, (90.0 * DT).to_radians()) * Vec3::X;
        assert!((e.ride_direction() - expected).length() < 1.0e-4);
    }

    #[test]
    fn slow_ride_direction_keeps_heading() {
        let course = flat();
        let mut b = body_at(Vec3::ZERO, vec3(0.1, 0.0, 0.0));
        let mut e = settled(coasting(), &course, &mut b);
        e.ride_dir = vec3(0.0, 0.0, 1.0);
        e.ground_movement(&mut b, &InputIntent::default(), DT);
        assert!((e.ride_direction() - Vec3::Z).length() < 1.0e-5);
    }

    #[test]
    fn degenerate_heading_falls_back_to_orthogonal() {
        let course = flat();
        let mut b = body_at(Vec3::ZERO, Vec3::ZERO);
        let mut e = settled(coasting(), &course, &mut b);
        // both the old heading and the body forward point along the normal
        e.ride_dir = Vec3::Y;
        b.set_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2));
        assert!(b.pose().forward().dot(Vec3::Y) > 0.999);
        e.ground_movement(&mut b, &InputIntent { steering: 1.0, ..InputIntent::default() }, DT);
        let d = e.ride_direction();
        assert!(d.is_finite());
        assert!((d.length() - 1.0).abs() < 1.0e-5);
        assert!(d.dot(Vec3::Y).abs() < 1.0e-5);
        assert!(b.vel().is_finite() && b.rotation().is_finite());
    }

    #[test]
    fn ride_direction_stays_in_the_smoothed_plane_while_airborne() {
        let course = Course::with_terrain(HeightField::incline(UVec2::new(64, 256), Vec2::ONE, 0.5), vec3(-32.0, 0.0, 0.0));
        let y0 = course.terrain_height_normal(0.0, 4.0).map(|(h, _)| h).unwrap_or(0.0);
        let mut b = body_at(vec3(0.0, y0, 4.0), Vec3::ZERO);
        let mut e = LocomotionEngine::new(coasting());
        let mut airborne = 0;
        for t in 0..200u64 {
            let input = InputIntent { jump_pressed: t == 100, ..InputIntent::default() };
            e.step(&mut b, &course, input, ctx(t));
            let d = e.ride_direction();
            assert!((d.length() - 1.0).abs() < 1.0e-4);
            assert!(d.dot(e.ground().smoothed_normal).abs() < 1.0e-3, "tick {t}: {}", d.dot(e.ground().smoothed_normal));
            if t > 100 && !e.grounded() { airborne += 1; }
        }
        assert!(airborne > 5, "jump never left the slope");
    }

    #[test]
    fn jump_fires_once_per_contact() {
        let course = flat();
        let mut b = body_at(Vec3::ZERO, vec3(0.0, 0.0, 5.0));
        let mut e = settled(coasting(), &course, &mut b);
        let jump = InputIntent { jump_pressed: true, ..InputIntent::default() };
        let mut jumps = 0;
        let mut took_off = false;
        let mut landed = false;
        for t in 0..300 {
            let r = e.step(&mut b, &course, jump, ctx(t));
            took_off |= r.took_off;
            if r.landed {
                // latch cleared on touchdown, so a held press fires again right away
                assert!(r.jumped);
                landed = true;
                break;
            }
            if r.jumped { jumps += 1; }
        }
        assert!(took_off && landed);
        assert_eq!(jumps, 1);
    }

    #[test]
    fn jump_along_normal_only_changes_normal_axis() {
        let slope = vec3(0.0, 1.0, -0.4).normalize();
        let mut e = LocomotionEngine::new(LocoParams { jump_axis: JumpAxis::Normal, ..LocoParams::default() });
        e.ground = GroundInfo { grounded: true, was_grounded: true, normal: slope, smoothed_normal: slope, distance: Some(0.0) };
        let mut b = body_at(Vec3::ZERO, vec3(0.5, -2.0, 7.0));
        let planar_before = project_on_plane(b.vel(), slope);
        assert!(e.handle_jump(&mut b));
        let planar_after = project_on_plane(b.vel(), slope);
        assert!((planar_after - planar_before).length() < 1.0e-5);
        assert!((b.vel().dot(slope) - 8.0).abs() < 1.0e-4);
    }

    #[test]
    fn blended_jump_on_flat_ground_is_vertical() {
        let course = flat();
        let mut b = body_at(Vec3::ZERO, vec3(0.0, 0.0, 4.0));
        let mut e = settled(coasting(), &course, &mut b);
        b.set_vel(vec3(0.0, -1.0, 4.0));
        assert!(e.handle_jump(&mut b));
        assert!((b.vel() - vec3(0.0, 8.0, 4.0)).length() < 1.0e-4);
    }

    #[test]
    fn speed_clamp_respects_boost() {
        let mut e = LocomotionEngine::new(LocoParams::default());
        let mut b = body_at(Vec3::ZERO, vec3(0.0, 0.0, 100.0));
        e.clamp_speed(&mut b);
        assert!((b.vel().length() - 35.0).abs() < 1.0e-3);
        e.boosting = true;
        b.set_vel(vec3(0.0, 0.0, 100.0));
        e.clamp_speed(&mut b);
        assert!((b.vel().length() - 42.0).abs() < 1.0e-3);
    }

    #[test]
    fn speed_multiplier_does_not_compound() {
        let mut e = LocomotionEngine::new(LocoParams::default());
        e.set_speed_multiplier(2.0);
        e.set_speed_multiplier(2.0);
        assert_eq!(e.params().max_speed, 70.0);
        assert_eq!(e.params().push_acceleration, 24.0);
        e.set_speed_multiplier(1.0);
        assert_eq!(e.params().boost_acceleration, 20.0);
        e.set_speed_multiplier(f32::NAN);
        assert_eq!(e.speed_multiplier(), 1.0);
    }

    #[test]
    fn obstacle_hit_on_enter_with_cooldown() {
        let mut course = flat();
        let a = course.add_collider(Shape::Box { hx: 0.5, hy: 0.5, hz: 0.5 }, Isometry { pos: vec3(0.0, 0.5, 0.0), rot: Quat::IDENTITY }, None, Category::Obstacle);
        let mut e = LocomotionEngine::new(LocoParams::default());
        let mut b = body_at(Vec3::ZERO, vec3(0.0, 0.0, 20.0));

        let hit = e.respond_to_obstacles(&mut b, &course, 1.0).expect("hit");
        assert_eq!(hit.id, a);
        assert!((hit.speed_after - 8.0).abs() < 1.0e-4);
        assert!((b.vel().length() - 8.0).abs() < 1.0e-4);

        // still overlapping: not a new hit
        assert!(e.respond_to_obstacles(&mut b, &course, 1.05).is_none());

        let away = vec3(10.0, 0.0, 10.0);
        b.set_position(away);
        assert!(e.respond_to_obstacles(&mut b, &course, 1.1).is_none());
        // re-entry inside the cooldown is ignored
        b.set_position(Vec3::ZERO);
        assert!(e.respond_to_obstacles(&mut b, &course, 1.2).is_none());
        b.set_position(away);
        assert!(e.respond_to_obstacles(&mut b, &course, 1.25).is_none());
        b.set_position(Vec3::ZERO);
        let hit = e.respond_to_obstacles(&mut b, &course, 1.4).expect("hit after cooldown");
        assert!((hit.speed_after - 5.0).abs() < 1.0e-4);
    }

    #[test]
    fn obstacle_hit_never_speeds_up() {
        let mut course = flat();
        course.add_collider(Shape::Sphere { r: 0.5 }, Isometry { pos: vec3(0.0, 0.5, 0.0), rot: Quat::IDENTITY }, None, Category::Obstacle);
        let mut e = LocomotionEngine::new(LocoParams::default());
        let mut b = body_at(Vec3::ZERO, vec3(0.0, 0.0, 3.0));
        let hit = e.respond_to_obstacles(&mut b, &course, 0.0).expect("hit");
        assert!((hit.speed_after - 3.0).abs() < 1.0e-5);
    }

    #[test]
    fn own_solid_parts_are_not_ground() {
        let mut course = Course::new();
        course.add_collider(Shape::Box { hx: 0.5, hy: 0.1, hz: 0.5 }, Isometry { pos: vec3(0.0, -0.1, 0.0), rot: Quat::IDENTITY }, Some(BodyId(1)), Category::Solid);
        let mut b = body_at(Vec3::ZERO, Vec3::ZERO);
        let mut e = LocomotionEngine::new(LocoParams::default());
        let r = e.step(&mut b, &course, InputIntent::default(), ctx(0));
        assert!(!e.grounded() && !r.landed);
        assert!(b.vel().y < 0.0);
    }

    #[test]
    fn downhill_pull_accelerates_on_slope() {
        let course = Course::with_terrain(HeightField::incline(UVec2::new(64, 64), Vec2::ONE, 0.3), vec3(-32.0, 0.0, -32.0));
        let y0 = course.terrain_height_normal(0.0, 0.0).map(|(h, _)| h).unwrap_or(0.0);
        let mut b = body_at(vec3(0.0, y0, 0.0), Vec3::ZERO);
        let mut e = LocomotionEngine::new(coasting());
        for t in 0..50 { e.step(&mut b, &course, InputIntent::default(), ctx(t)); }
        assert!(e.grounded());
        assert!(b.vel().z > 1.0);
        assert!(b.vel().length() <= e.max_speed() + 1.0e-3);
    }
}
