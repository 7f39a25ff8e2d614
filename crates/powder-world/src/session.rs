use powder_controllers::{ScoreEvent, ScoreKind, ScoreSink};
use powder_core::{BodyId, ColliderId, FixedStep, InputIntent, Isometry, ParamError, StepCtx, StepStats};
use powder_terrain::Course;
use powder_viz::{Ledger, LedgerEvent};
use tracing::{debug, warn};

use crate::config::{RiderConfig, SessionConfig};
use crate::pursuit::Pursuer;
use crate::rider::Rider;
use crate::speed_score::SpeedScore;

/// What one `Session::frame` did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub physics_ticks: u32,
    pub took_off: bool,
    pub landed: bool,
    pub jumped: bool,
    pub trick_armed: bool,
    /// Every award this frame, tricks and speed alike.
    pub scores: Vec<ScoreEvent>,
    pub hits: Vec<ColliderId>,
    pub caught: bool,
}

impl FrameReport {
    pub fn points(&self) -> u32 { self.scores.iter().map(|s| s.points).sum() }
}

/// Run totals.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub stats: StepStats,
    pub time: f32,
    pub airtime: f32,
    pub trick_points: u32,
    pub speed_points: u32,
    pub top_speed: f32,
}

pub struct SessionBuilder {
    course: Course,
    cfg: SessionConfig,
    rider_cfg: RiderConfig,
    spawn: Isometry,
    sink: Option<Box<dyn ScoreSink>>,
    pursuer: Option<Box<dyn Pursuer>>,
}

impl SessionBuilder {
    pub fn new(course: Course) -> Self {
        Self {
            course,
            cfg: SessionConfig::default(),
            rider_cfg: RiderConfig::default(),
            spawn: Isometry::default(),
            sink: None,
            pursuer: None,
        }
    }

    pub fn config(mut self, cfg: SessionConfig) -> Self { self.cfg = cfg; self }
    pub fn rider(mut self, cfg: RiderConfig) -> Self { self.rider_cfg = cfg; self }
    pub fn spawn(mut self, pose: Isometry) -> Self { self.spawn = pose; self }
    pub fn sink(mut self, sink: Box<dyn ScoreSink>) -> Self { self.sink = Some(sink); self }
    pub fn pursuer(mut self, p: Box<dyn Pursuer>) -> Self { self.pursuer = Some(p); self }

    pub fn build(self) -> Result<Session, ParamError> {
        self.cfg.validate()?;
        self.rider_cfg.validate()?;
        let mut rider = Rider::new(BodyId(0), self.spawn, &self.rider_cfg);
        rider.set_sink(self.sink);
        let mut pursuer = self.pursuer;
        if let Some(p) = pursuer.as_deref_mut() { p.reset(self.spawn.pos); }
        Ok(Session {
            fixed: FixedStep::new(self.cfg.fixed_dt, self.cfg.max_substeps),
            ledger: Ledger::new(self.cfg.ledger_cap),
            speed_score: SpeedScore::new(self.cfg.speed_score_multiplier),
            course: self.course,
            rider,
            pursuer,
            cfg: self.cfg,
            tick: 0,
            time: 0.0,
            caught: false,
            air_start: None,
            summary: RunSummary::default(),
        })
    }
}

/// A course, one rider and an optional pursuer, driven one rendered frame at a time.
pub struct Session {
    cfg: SessionConfig,
    course: Course,
    rider: Rider,
    pursuer: Option<Box<dyn Pursuer>>,
    fixed: FixedStep,
    ledger: Ledger,
    speed_score: SpeedScore,
    tick: u64,
    time: f32,
    caught: bool,
    air_start: Option<f32>,
    summary: RunSummary,
}

impl Session {
    #[inline] pub fn rider(&self) -> &Rider { &self.rider }
    #[inline] pub fn rider_mut(&mut self) -> &mut Rider { &mut self.rider }
    #[inline] pub fn course(&self) -> &Course { &self.course }
    #[inline] pub fn course_mut(&mut self) -> &mut Course { &mut self.course }
    #[inline] pub fn ledger(&self) -> &Ledger { &self.ledger }
    #[inline] pub fn config(&self) -> &SessionConfig { &self.cfg }
    #[inline] pub fn tick_index(&self) -> u64 { self.tick }
    #[inline] pub fn time(&self) -> f32 { self.time }
    #[inline] pub fn caught(&self) -> bool { self.caught }
    #[inline] pub fn summary(&self) -> RunSummary { self.summary }
    #[inline] pub fn pursuer(&self) -> Option<&dyn Pursuer> { self.pursuer.as_deref() }

    pub fn set_input(&mut self, input: InputIntent) { self.rider.set_input(input); }

    /// Physics ticks owed by `frame_dt`, then the per-frame trick/visual pass, speed score and
    /// pursuit. A disabled rider freezes everything.
    pub fn frame(&mut self, frame_dt: f32) -> FrameReport {
        let mut rep = FrameReport::default();
        self.ledger.clear();
        if !self.rider.enabled() { return rep; }

        let ticks = self.fixed.advance(frame_dt);
        for _ in 0..ticks {
            self.physics_tick(&mut rep);
        }
        rep.physics_ticks = ticks;
        let tick = self.last_tick();

        let up = self.rider.frame_tick(frame_dt);
        if up.armed {
            rep.trick_armed = true;
            self.ledger.push(LedgerEvent::TrickArmed { tick });
        }
        for ev in self.rider.scored() {
            self.ledger.push(LedgerEvent::Score { tick, kind: ev.kind, points: ev.points });
            self.summary.trick_points += ev.points;
            rep.scores.push(*ev);
        }

        let pos = self.rider.position();
        let speed_points = self.speed_score.update(self.rider.speed(), frame_dt);
        if speed_points > 0 {
            let ev = ScoreEvent { points: speed_points, kind: ScoreKind::Speed, anchor: pos };
            self.rider.award(ev);
            self.summary.speed_points += speed_points;
            rep.scores.push(ev);
        }
        self.summary.stats.score_events += rep.scores.len() as u32;

        if let Some(p) = self.pursuer.as_deref_mut() {
            if !self.caught && p.advance(pos, frame_dt) {
                self.caught = true;
                rep.caught = true;
                self.rider.set_enabled(false);
                self.speed_score.set_game_over(true);
                self.ledger.push(LedgerEvent::Caught { tick, pos });
                debug!(tick, "session over: caught");
            }
        }
        rep
    }

    fn physics_tick(&mut self, rep: &mut FrameReport) {
        let dt = self.fixed.dt;
        let ctx = StepCtx::new(dt, self.tick, self.time);
        let tick = ctx.tick;
        let r = self.rider.physics_tick(&self.course, ctx);
        self.tick += 1;
        self.time += dt;
        self.summary.stats.physics_ticks += 1;
        self.summary.time = self.time;
        self.summary.top_speed = self.summary.top_speed.max(self.rider.speed());

        let pos = self.rider.position();
        if r.took_off {
            rep.took_off = true;
            self.air_start = Some(self.time);
            self.ledger.push(LedgerEvent::Takeoff { tick, pos, speed: self.rider.speed() });
        }
        if r.landed {
            rep.landed = true;
            let airtime = self.air_start.take().map_or(0.0, |t0| self.time - t0);
            self.summary.airtime += airtime;
            self.ledger.push(LedgerEvent::Landing { tick, pos, airtime });
        }
        if r.jumped {
            rep.jumped = true;
            self.ledger.push(LedgerEvent::JumpFired { tick, vel: self.rider.velocity() });
        }
        if let Some(hit) = r.hit {
            rep.hits.push(hit.id);
            self.summary.stats.obstacle_hits += 1;
            self.ledger.push(LedgerEvent::ObstacleHit {
                tick,
                id: hit.id.0,
                speed_before: hit.speed_before,
                speed_after: hit.speed_after,
            });
            if self.cfg.consume_obstacles {
                self.course.remove_collider(hit.id);
            }
        }

        if self.cfg.debug.should_print(self.tick) {
            self.print_debug_block();
        }
        if self.cfg.debug.should_dump(self.tick) {
            if let Err(e) = self.ledger.write_jsonl(&self.cfg.dump_dir, self.tick) {
                warn!(error = %e, "ledger dump failed");
            }
        }
    }

    /// Index of the most recent physics tick; frame-level ledger events carry it.
    #[inline] fn last_tick(&self) -> u64 { self.tick.saturating_sub(1) }

    fn print_debug_block(&self) {
        let t = self.rider.telemetry();
        debug!(
            tick = self.tick,
            pos = ?t.state.pos,
            speed = t.speed,
            grounded = t.grounded,
            pose = ?t.pose,
            "rider status"
        );
        for ev in self.ledger.iter().take(self.cfg.debug.max_lines) {
            debug!(?ev, "ledger");
        }
    }

    /// Start a new run at `pose`. The course keeps whatever obstacles were consumed.
    pub fn restart(&mut self, pose: Isometry) {
        self.rider.respawn(pose);
        if let Some(p) = self.pursuer.as_deref_mut() { p.reset(pose.pos); }
        self.speed_score.reset_run();
        self.fixed.reset();
        self.caught = false;
        self.air_start = None;
        self.summary = RunSummary::default();
        self.ledger.clear();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("tick", &self.tick)
            .field("time", &self.time)
            .field("caught", &self.caught)
            .field("rider", &self.rider)
            .finish_non_exhaustive()
    }
}
