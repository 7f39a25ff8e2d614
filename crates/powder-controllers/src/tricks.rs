use powder_core::{move_towards, wrap_degrees, InputIntent, ParamError, Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::score::{ScoreEvent, ScoreKind, ScoreSink};

/// Which axis wins when steering and throttle are both past the deadzone while armed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrickPriority {
    /// Spin when |steering| >= |throttle|, otherwise flip.
    #[default]
    SpinDominant,
    /// Any spin input suppresses flips.
    SpinExclusive,
    /// Both axes rotate at once.
    Additive,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrickParams {
    /// deg/s
    pub flip_speed: f32,
    /// deg/s at full steering
    pub spin_speed: f32,
    pub deadzone: f32,
    /// deg/s back to neutral once grounded
    pub recovery_speed: f32,
    /// Fraction of 360 degrees worth one award.
    pub score_threshold: f32,
    pub front_flip_points: u32,
    pub back_flip_points: u32,
    pub spin_points: u32,
    pub priority: TrickPriority,
}

impl Default for TrickParams {
    fn default() -> Self {
        Self {
            flip_speed: 360.0,
            spin_speed: 360.0,
            deadzone: 0.25,
            recovery_speed: 720.0,
            score_threshold: 0.7,
            front_flip_points: 15,
            back_flip_points: 10,
            spin_points: 5,
            priority: TrickPriority::SpinDominant,
        }
    }
}

impl TrickParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        ParamError::check_non_negative("flip_speed", self.flip_speed)?;
        ParamError::check_non_negative("spin_speed", self.spin_speed)?;
        ParamError::check_range("deadzone", self.deadzone, 0.0, 1.0)?;
        ParamError::check_non_negative("recovery_speed", self.recovery_speed)?;
        ParamError::check_range("score_threshold", self.score_threshold, 0.1, 1.0)?;
        Ok(())
    }

    #[inline] fn threshold_deg(&self) -> f32 { 360.0 * self.score_threshold }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrickPhase { Grounded, AirborneUnarmed, AirborneArmed }

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrickKind { Flip, Spin }

/// Per-jump rotation state. Angles are degrees and unbounded while airborne.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrickState {
    pub phase: TrickPhase,
    /// About the lateral axis; positive is a front flip.
    pub flip_angle: f32,
    /// About the vertical axis; positive turns right.
    pub spin_angle: f32,
    pub last_flip_angle: f32,
    pub last_spin_angle: f32,
    pub front_flip_deg: f32,
    pub back_flip_deg: f32,
    pub spin_deg: f32,
    /// Physics orientation at takeoff; trick rotation is applied relative to it.
    pub takeoff_rot: Quat,
    /// Axis that rotated this tick, if any.
    pub active: Option<TrickKind>,
}

impl Default for TrickState {
    fn default() -> Self { Self::grounded() }
}

impl TrickState {
    pub fn grounded() -> Self {
        Self {
            phase: TrickPhase::Grounded,
            flip_angle: 0.0,
            spin_angle: 0.0,
            last_flip_angle: 0.0,
            last_spin_angle: 0.0,
            front_flip_deg: 0.0,
            back_flip_deg: 0.0,
            spin_deg: 0.0,
            takeoff_rot: Quat::IDENTITY,
            active: None,
        }
    }

    fn takeoff(rot: Quat) -> Self {
        Self { phase: TrickPhase::AirborneUnarmed, takeoff_rot: rot, ..Self::grounded() }
    }

    #[inline] pub fn airborne(&self) -> bool { self.phase != TrickPhase::Grounded }
}

/// Side effects of one `TrickController::update`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TrickUpdate {
    pub took_off: bool,
    pub landed: bool,
    pub armed: bool,
    pub events: u32,
    pub points: u32,
}

/// Aerial trick state machine. Runs once per frame tick, after input sampling.
#[derive(Clone, Debug)]
pub struct TrickController {
    params: TrickParams,
    base_flip_speed: f32,
    base_spin_speed: f32,
    trick_speed_multiplier: f32,
    state: TrickState,
    prev_grounded: bool,
    prev_trick_held: bool,
}

impl TrickController {
    pub fn new(params: TrickParams) -> Self {
        Self {
            params,
            base_flip_speed: params.flip_speed,
            base_spin_speed: params.spin_speed,
            trick_speed_multiplier: 1.0,
            state: TrickState::grounded(),
            prev_grounded: true,
            prev_trick_held: false,
        }
    }

    #[inline] pub fn params(&self) -> &TrickParams { &self.params }
    #[inline] pub fn state(&self) -> &TrickState { &self.state }
    #[inline] pub fn phase(&self) -> TrickPhase { self.state.phase }
    #[inline] pub fn trick_speed_multiplier(&self) -> f32 { self.trick_speed_multiplier }

    /// Armed and rotating this tick.
    #[inline] pub fn is_doing_trick(&self) -> bool {
        self.state.phase == TrickPhase::AirborneArmed && self.state.active.is_some()
    }
    #[inline] pub fn is_flat_spin(&self) -> bool { self.state.active == Some(TrickKind::Spin) }

    /// Rescales flip and spin speeds from their unscaled values.
    pub fn set_trick_speed_multiplier(&mut self, mul: f32) {
        if !mul.is_finite() || mul < 0.0 { return; }
        self.trick_speed_multiplier = mul;
        self.params.flip_speed = self.base_flip_speed * mul;
        self.params.spin_speed = self.base_spin_speed * mul;
    }

    pub fn reset(&mut self) {
        self.state = TrickState::grounded();
        self.prev_grounded = true;
        self.prev_trick_held = false;
    }

    pub fn update(
        &mut self,
        dt: f32,
        grounded: bool,
        input: &InputIntent,
        physics_rot: Quat,
        anchor: Vec3,
        mut sink: Option<&mut dyn ScoreSink>,
    ) -> TrickUpdate {
        let mut out = TrickUpdate::default();
        let held = input.trick_held;
        let pressed = held && !self.prev_trick_held;
        let just_left = !grounded && self.prev_grounded;
        let just_landed = grounded && !self.prev_grounded;
        self.prev_trick_held = held;
        self.prev_grounded = grounded;

        if just_left {
            self.state = TrickState::takeoff(physics_rot);
            out.took_off = true;
            trace!("trick state reset at takeoff");
        }
        if just_landed {
            self.land();
            out.landed = true;
        }

        let st = &mut self.state;
        match st.phase {
            TrickPhase::AirborneUnarmed if pressed => {
                st.phase = TrickPhase::AirborneArmed;
                out.armed = true;
                debug!("trick armed");
            }
            TrickPhase::AirborneArmed if !held => st.phase = TrickPhase::AirborneUnarmed,
            _ => {}
        }

        st.active = None;
        if st.phase == TrickPhase::AirborneArmed {
            self.rotate(input, dt);
        }

        if self.state.airborne() {
            self.score(anchor, &mut sink, &mut out);
        } else {
            let step = self.params.recovery_speed * dt;
            self.state.flip_angle = move_towards(self.state.flip_angle, 0.0, step);
            self.state.spin_angle = move_towards(self.state.spin_angle, 0.0, step);
        }

        self.state.last_flip_angle = self.state.flip_angle;
        self.state.last_spin_angle = self.state.spin_angle;
        out
    }

    /// Wrap both angles into [-180, 180] so recovery takes the short way back. Partial
    /// accumulators are dropped with the jump.
    fn land(&mut self) {
        let st = &mut self.state;
        st.phase = TrickPhase::Grounded;
        st.flip_angle = wrap_degrees(st.flip_angle);
        st.spin_angle = wrap_degrees(st.spin_angle);
        st.last_flip_angle = st.flip_angle;
        st.last_spin_angle = st.spin_angle;
        st.front_flip_deg = 0.0;
        st.back_flip_deg = 0.0;
        st.spin_deg = 0.0;
        st.active = None;
        debug!(flip = st.flip_angle, spin = st.spin_angle, "trick landed");
    }

    fn rotate(&mut self, input: &InputIntent, dt: f32) {
        let p = &self.params;
        let (h, v) = (input.steering, input.throttle);
        let want_spin = h.abs() > p.deadzone;
        let want_flip = v.abs() > p.deadzone;
        let (spin, flip) = match p.priority {
            TrickPriority::SpinDominant => {
                if want_spin && h.abs() >= v.abs() { (true, false) } else { (false, want_flip) }
            }
            TrickPriority::SpinExclusive => (want_spin, want_flip && !want_spin),
            TrickPriority::Additive => (want_spin, want_flip),
        };

        let st = &mut self.state;
        if spin { st.spin_angle += p.spin_speed * h * dt; }
        if flip { st.flip_angle += p.flip_speed * v.signum() * dt; }
        st.active = if spin { Some(TrickKind::Spin) } else if flip { Some(TrickKind::Flip) } else { None };
    }

    fn score(&mut self, anchor: Vec3, sink: &mut Option<&mut dyn ScoreSink>, out: &mut TrickUpdate) {
        let th = self.params.threshold_deg();
        let st = &mut self.state;
        let d_flip = st.flip_angle - st.last_flip_angle;
        let d_spin = st.spin_angle - st.last_spin_angle;
        if d_flip > 0.0 { st.front_flip_deg += d_flip; } else { st.back_flip_deg -= d_flip; }
        st.spin_deg += d_spin.abs();

        let mut award = |acc: &mut f32, points: u32, kind: ScoreKind| {
            if th <= 0.0 { return; }
            while *acc >= th {
                *acc -= th;
                out.events += 1;
                out.points += points;
                debug!(?kind, points, "trick scored");
                if let Some(s) = sink.as_deref_mut() {
                    s.award(ScoreEvent { points, kind, anchor });
                }
            }
        };
        award(&mut st.front_flip_deg, self.params.front_flip_points, ScoreKind::FrontFlip);
        award(&mut st.back_flip_deg, self.params.back_flip_points, ScoreKind::BackFlip);
        award(&mut st.spin_deg, self.params.spin_points, ScoreKind::Spin);
    }
}
