use std::cell::RefCell;
use std::rc::Rc;

use glam::{UVec2, Vec2};
use powder_core::{iso, vec3, Isometry, Quat, Vec3};
use powder_geom::Shape;
use powder_locomotion::LocoParams;
use powder_terrain::{Category, Course, HeightField};
use powder_viz::LedgerEvent;
use powder_world::*;

const DT: f32 = 1.0 / 50.0;

#[derive(Clone, Default)]
struct Shared(Rc<RefCell<Vec<ScoreEvent>>>);

impl ScoreSink for Shared {
    fn award(&mut self, ev: ScoreEvent) { self.0.borrow_mut().push(ev); }
}

fn flat_course() -> Course {
    Course::with_terrain(HeightField::incline(UVec2::new(128, 128), Vec2::ONE, 0.0), vec3(-64.0, 0.0, -64.0))
}

fn coasting() -> RiderConfig {
    RiderConfig { loco: LocoParams { always_accelerate: false, ..LocoParams::default() }, ..RiderConfig::default() }
}

fn spawn() -> Isometry { iso(Vec3::ZERO, Quat::IDENTITY) }

#[test]
fn idle_rider_on_flat_ground_stays_put() {
    let mut s = SessionBuilder::new(flat_course()).rider(coasting()).spawn(spawn()).build().expect("valid config");
    let mut ticks = 0;
    for _ in 0..100 {
        let rep = s.frame(DT);
        ticks += rep.physics_ticks;
        assert!(rep.scores.is_empty());
    }
    assert!(ticks >= 98);
    let r = s.rider();
    assert!(r.grounded());
    assert!(r.speed() < 1.0e-3);
    assert!(r.position().length() < 1.0e-3);
    assert_eq!(r.pose(), RiderPose::Idle);
    let display = r.display_rotation().expect("visual blend on by default");
    assert!((display * Vec3::Z - Vec3::NEG_X).length() < 1.0e-2);
}

#[test]
fn jump_flip_and_land_scores_through_the_sink() {
    let sink = Shared::default();
    let cfg = RiderConfig {
        loco: LocoParams { always_accelerate: false, jump_force: 14.0, ..LocoParams::default() },
        trick_speed_multiplier: 2.0,
        ..RiderConfig::default()
    };
    let mut s = SessionBuilder::new(flat_course())
        .rider(cfg)
        .spawn(spawn())
        .sink(Box::new(sink.clone()))
        .build()
        .expect("valid config");

    for _ in 0..10 { s.frame(DT); }
    s.set_input(InputIntent { jump_pressed: true, ..InputIntent::default() });

    let (mut jumped, mut took_off, mut landed, mut armed) = (false, false, false, false);
    let mut trick_events = Vec::new();
    for _ in 0..200 {
        let rep = s.frame(DT);
        jumped |= rep.jumped;
        took_off |= rep.took_off;
        armed |= rep.trick_armed;
        trick_events.extend(rep.scores.iter().filter(|e| e.kind != ScoreKind::Speed).copied());
        if rep.landed && took_off { landed = true; break; }
        // press the trick button only once actually airborne
        let airborne = !s.rider().grounded();
        s.set_input(InputIntent { trick_held: airborne, throttle: if airborne { 1.0 } else { 0.0 }, ..InputIntent::default() });
    }
    assert!(jumped && took_off && armed && landed);
    assert!(!trick_events.is_empty());
    assert!(trick_events.iter().all(|e| e.kind == ScoreKind::FrontFlip && e.points == 15));

    // after recovery the flip angle is back to neutral
    s.set_input(InputIntent::default());
    for _ in 0..30 { s.frame(DT); }
    assert_eq!(s.rider().trick_state().flip_angle, 0.0);

    let received: Vec<_> = sink.0.borrow().iter().filter(|e| e.kind == ScoreKind::FrontFlip).copied().collect();
    assert_eq!(received, trick_events);
    assert_eq!(s.summary().trick_points, 15 * trick_events.len() as u32);
    assert!(s.summary().airtime > 0.3);
}

#[test]
fn rider_without_visual_still_rides_and_scores() {
    let cfg = RiderConfig {
        loco: LocoParams { always_accelerate: false, jump_force: 14.0, ..LocoParams::default() },
        trick_speed_multiplier: 2.0,
        visual: None,
        ..RiderConfig::default()
    };
    let mut s = SessionBuilder::new(flat_course()).rider(cfg).spawn(spawn()).build().expect("valid config");
    for _ in 0..10 { s.frame(DT); }
    s.set_input(InputIntent { jump_pressed: true, ..InputIntent::default() });

    let (mut took_off, mut landed) = (false, false);
    for _ in 0..200 {
        let rep = s.frame(DT);
        took_off |= rep.took_off;
        if rep.landed && took_off { landed = true; break; }
        let airborne = !s.rider().grounded();
        s.set_input(InputIntent { trick_held: airborne, throttle: if airborne { 1.0 } else { 0.0 }, ..InputIntent::default() });
        assert!(s.rider().display_rotation().is_none());
        assert!(s.rider().telemetry().display_rot.is_none());
    }
    assert!(landed);
    assert!(s.summary().trick_points > 0);
    assert!(s.rider().position().is_finite());
}

#[test]
fn ledger_ticks_match_the_physics_step() {
    let mut s = SessionBuilder::new(flat_course()).rider(coasting()).spawn(spawn()).build().expect("valid config");
    for _ in 0..10 { s.frame(DT); }
    s.set_input(InputIntent { jump_pressed: true, ..InputIntent::default() });
    let mut rep = s.frame(DT);
    for _ in 0..3 {
        if rep.jumped { break; }
        rep = s.frame(DT);
    }
    assert!(rep.jumped);
    let fired = s.ledger().iter().find_map(|ev| match ev {
        LedgerEvent::JumpFired { tick, .. } => Some(*tick),
        _ => None,
    });
    let fired = fired.expect("jump logged");
    let first = s.tick_index() - rep.physics_ticks as u64;
    assert!((first..s.tick_index()).contains(&fired), "jump at {fired}, frame ran {first}..{}", s.tick_index());
}

#[test]
fn obstacle_slows_rider_and_is_consumed() {
    let mut course = flat_course();
    course.add_collider(Shape::Box { hx: 2.0, hy: 1.0, hz: 0.5 }, iso(vec3(0.0, 1.0, 6.0), Quat::IDENTITY), None, Category::Obstacle);
    let mut s = SessionBuilder::new(course).rider(coasting()).spawn(spawn()).build().expect("valid config");
    s.frame(DT);
    s.rider_mut().body_mut().set_vel(vec3(0.0, 0.0, 15.0));

    let mut hit_frame = None;
    for i in 0..100 {
        let rep = s.frame(DT);
        if !rep.hits.is_empty() {
            assert!(s.ledger().iter().any(|e| matches!(e, LedgerEvent::ObstacleHit { speed_after, .. } if (*speed_after - 6.0).abs() < 0.5)));
            hit_frame = Some(i);
            break;
        }
    }
    assert!(hit_frame.is_some());
    assert_eq!(s.course().obstacle_count(), 0);
    assert!(s.rider().speed() < 7.0);
    assert_eq!(s.summary().stats.obstacle_hits, 1);
}

#[test]
fn pursuer_catch_disables_rider_once() {
    let chaser = Chaser::new(ChaserParams { start_offset: 10.0, ..ChaserParams::default() }, Vec3::ZERO);
    let mut s = SessionBuilder::new(flat_course())
        .rider(coasting())
        .spawn(spawn())
        .pursuer(Box::new(chaser))
        .build()
        .expect("valid config");

    let mut caught = 0;
    for _ in 0..200 {
        if s.frame(DT).caught { caught += 1; }
    }
    assert_eq!(caught, 1);
    assert!(s.caught());
    assert!(!s.rider().enabled());

    let frozen = s.rider().position();
    let rep = s.frame(DT);
    assert_eq!(rep.physics_ticks, 0);
    assert!(rep.scores.is_empty());
    assert_eq!(s.rider().position(), frozen);

    s.restart(spawn());
    assert!(s.rider().enabled() && !s.caught());
    assert!(s.frame(DT).physics_ticks <= 1);
}

#[test]
fn speed_score_tracks_distance() {
    let mut s = SessionBuilder::new(flat_course())
        .rider(RiderConfig::default())
        .spawn(spawn())
        .config(SessionConfig { speed_score_multiplier: 1.0, ..SessionConfig::default() })
        .build()
        .expect("valid config");
    let mut points = 0;
    for _ in 0..150 {
        points += s.frame(DT).scores.iter().filter(|e| e.kind == ScoreKind::Speed).map(|e| e.points).sum::<u32>();
    }
    // pushing on flat ground: points ~ distance travelled
    let dist = s.rider().position().z;
    assert!(dist > 5.0);
    assert!((points as f32 - dist).abs() < 3.0, "points {points} dist {dist}");
    assert_eq!(points, s.summary().speed_points);
}

#[test]
fn invalid_config_is_rejected() {
    let bad = RiderConfig { speed_multiplier: -1.0, ..RiderConfig::default() };
    assert!(SessionBuilder::new(flat_course()).rider(bad).build().is_err());
    let bad = SessionConfig { max_substeps: 0, ..SessionConfig::default() };
    assert!(SessionBuilder::new(flat_course()).config(bad).build().is_err());
}
