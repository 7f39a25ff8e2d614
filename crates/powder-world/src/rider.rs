use powder_controllers::{ScoreEvent, ScoreSink, TrickController, TrickState, TrickUpdate, VisualBlend, VisualInput};
use powder_core::{BodyId, InputIntent, Isometry, Quat, StepCtx, Vec3};
use powder_dynamics::{BodyDesc, RigidBody, RigidState};
use powder_locomotion::{GroundInfo, LocoStepReport, LocomotionEngine};
use powder_terrain::{GroundProbe, ObstacleQuery};

use crate::config::RiderConfig;
use crate::pose::{classify, PoseInputs, RiderPose};

/// Read-only snapshot for cameras, UI and audio.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Telemetry {
    pub state: RigidState,
    pub display_rot: Option<Quat>,
    pub grounded: bool,
    pub ground_normal: Vec3,
    pub ride_direction: Vec3,
    pub braking: bool,
    pub boosting: bool,
    pub speed: f32,
    pub max_speed: f32,
    pub pose: RiderPose,
}

/// One rider: rigid body, locomotion, tricks and an optional display orientation.
///
/// Input setters only record intent. `physics_tick` runs at the fixed rate, `frame_tick` once
/// per rendered frame.
pub struct Rider {
    body: RigidBody,
    engine: LocomotionEngine,
    tricks: TrickController,
    visual: Option<VisualBlend>,
    sink: Option<Box<dyn ScoreSink>>,

    input: InputIntent,
    jump_pending: bool,
    enabled: bool,
    scored: Vec<ScoreEvent>,
}

impl Rider {
    pub fn new(id: BodyId, pose: Isometry, cfg: &RiderConfig) -> Self {
        let mut engine = LocomotionEngine::new(cfg.loco);
        engine.set_speed_multiplier(cfg.speed_multiplier);
        engine.reset(pose.forward());
        let mut tricks = TrickController::new(cfg.tricks);
        tricks.set_trick_speed_multiplier(cfg.trick_speed_multiplier);
        Self {
            body: RigidBody::new(BodyDesc { id, pose, lin_vel: Vec3::ZERO }),
            engine,
            tricks,
            visual: cfg.visual.map(|p| VisualBlend::new(p, pose.rot)),
            sink: None,
            input: InputIntent::default(),
            jump_pending: false,
            enabled: true,
            scored: Vec::new(),
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn ScoreSink>) -> Self {
        self.sink = Some(sink);
        self
    }
    pub fn set_sink(&mut self, sink: Option<Box<dyn ScoreSink>>) { self.sink = sink; }

    /* ---------- input ---------- */

    pub fn set_steering(&mut self, v: f32) { self.input.steering = v; }
    pub fn set_throttle(&mut self, v: f32) { self.input.throttle = v; }
    pub fn set_boost(&mut self, held: bool) { self.input.boost = held; }
    pub fn set_trick_held(&mut self, held: bool) { self.input.trick_held = held; }
    /// Edge: consumed by the next physics tick whether or not a jump happens.
    pub fn press_jump(&mut self) { self.jump_pending = true; }

    /// Replace the whole snapshot; `jump_pressed` queues a press.
    pub fn set_input(&mut self, input: InputIntent) {
        self.input = InputIntent { jump_pressed: false, ..input };
        if input.jump_pressed { self.jump_pending = true; }
    }
    #[inline] pub fn input(&self) -> InputIntent { self.input }

    /* ---------- lifecycle ---------- */

    #[inline] pub fn enabled(&self) -> bool { self.enabled }
    pub fn set_enabled(&mut self, on: bool) {
        if on != self.enabled { tracing::debug!(enabled = on, "rider enabled changed"); }
        self.enabled = on;
    }

    pub fn set_speed_multiplier(&mut self, mul: f32) { self.engine.set_speed_multiplier(mul); }
    pub fn set_trick_speed_multiplier(&mut self, mul: f32) { self.tricks.set_trick_speed_multiplier(mul); }

    /// Teleport, stop and forget contact/trick state.
    pub fn respawn(&mut self, pose: Isometry) {
        self.body.set_pose(pose);
        self.body.set_vel(Vec3::ZERO);
        self.engine.reset(pose.forward());
        self.tricks.reset();
        if let Some(v) = &mut self.visual { *v = VisualBlend::new(*v.params(), pose.rot); }
        self.input = InputIntent::default();
        self.jump_pending = false;
        self.enabled = true;
    }

    /* ---------- ticks ---------- */

    pub fn physics_tick<W>(&mut self, world: &W, ctx: StepCtx) -> LocoStepReport
    where
        W: GroundProbe + ObstacleQuery,
    {
        if !self.enabled { return LocoStepReport::default(); }
        let input = InputIntent { jump_pressed: self.jump_pending, ..self.input };
        self.jump_pending = false;
        self.engine.step(&mut self.body, world, input, ctx)
    }

    /// Trick state machine and display blend. Score events go to the sink and are also returned
    /// through `take_scored`.
    pub fn frame_tick(&mut self, dt: f32) -> TrickUpdate {
        self.scored.clear();
        if !self.enabled { return TrickUpdate::default(); }
        let input = self.input.sanitized();
        let grounded = self.engine.grounded();
        let rot = self.body.rotation();
        let anchor = self.body.position();

        let up = self.tricks.update(dt, grounded, &input, rot, anchor, Some(&mut self.scored as &mut dyn ScoreSink));
        if let Some(sink) = self.sink.as_deref_mut() {
            for ev in &self.scored { sink.award(*ev); }
        }

        if let Some(v) = &mut self.visual {
            let g = self.engine.ground();
            let inp = VisualInput::new(rot, g.smoothed_normal, grounded, self.engine.braking(), input.steering, self.tricks.state());
            v.update(&inp, dt);
        }
        up
    }

    /// Forward an externally produced award (e.g. speed score) to the sink.
    pub fn award(&mut self, ev: ScoreEvent) {
        if let Some(sink) = self.sink.as_deref_mut() { sink.award(ev); }
    }

    /// Trick awards from the last `frame_tick`.
    #[inline] pub fn scored(&self) -> &[ScoreEvent] { &self.scored }

    /* ---------- telemetry ---------- */

    #[inline] pub fn id(&self) -> BodyId { self.body.id() }
    #[inline] pub fn body(&self) -> &RigidBody { &self.body }
    #[inline] pub fn body_mut(&mut self) -> &mut RigidBody { &mut self.body }
    #[inline] pub fn engine(&self) -> &LocomotionEngine { &self.engine }
    #[inline] pub fn tricks(&self) -> &TrickController { &self.tricks }
    #[inline] pub fn trick_state(&self) -> &TrickState { self.tricks.state() }
    #[inline] pub fn ground(&self) -> &GroundInfo { self.engine.ground() }
    #[inline] pub fn position(&self) -> Vec3 { self.body.position() }
    #[inline] pub fn rotation(&self) -> Quat { self.body.rotation() }
    #[inline] pub fn velocity(&self) -> Vec3 { self.body.vel() }
    #[inline] pub fn speed(&self) -> f32 { self.body.vel().length() }
    #[inline] pub fn max_speed(&self) -> f32 { self.engine.max_speed() }
    #[inline] pub fn grounded(&self) -> bool { self.engine.grounded() }
    #[inline] pub fn braking(&self) -> bool { self.engine.braking() }
    #[inline] pub fn display_rotation(&self) -> Option<Quat> { self.visual.as_ref().map(|v| v.display()) }

    pub fn pose(&self) -> RiderPose {
        classify(&PoseInputs {
            grounded: self.engine.grounded(),
            braking: self.engine.braking(),
            boosting: self.engine.boosting(),
            vel: self.body.vel(),
            max_speed: self.engine.params().max_speed,
            ground_normal: self.engine.ground().normal,
            doing_trick: self.tricks.is_doing_trick(),
            flat_spin: self.tricks.is_flat_spin(),
        })
    }

    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            state: self.body.state(),
            display_rot: self.display_rotation(),
            grounded: self.engine.grounded(),
            ground_normal: self.engine.ground().normal,
            ride_direction: self.engine.ride_direction(),
            braking: self.engine.braking(),
            boosting: self.engine.boosting(),
            speed: self.speed(),
            max_speed: self.max_speed(),
            pose: self.pose(),
        }
    }
}

impl std::fmt::Debug for Rider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rider")
            .field("body", &self.body)
            .field("enabled", &self.enabled)
            .field("has_sink", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}
