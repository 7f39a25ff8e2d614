/// Converts variable frame time into whole fixed physics ticks.
///
/// Leftover time carries to the next frame. At most `max_substeps` ticks run per frame; time
/// beyond that is dropped so a long stall cannot spiral.
#[derive(Copy, Clone, Debug)]
pub struct FixedStep {
    pub dt: f32,
    pub max_substeps: u32,
    acc: f32,
}

impl FixedStep {
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        Self { dt: dt.max(1.0e-4), max_substeps: max_substeps.max(1), acc: 0.0 }
    }

    /// Feed one frame; returns how many physics ticks to run now.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if !(frame_dt > 0.0) { return 0; }
        self.acc += frame_dt;
        let mut n = 0;
        while self.acc >= self.dt && n < self.max_substeps {
            self.acc -= self.dt;
            n += 1;
        }
        if n == self.max_substeps && self.acc >= self.dt { self.acc %= self.dt; }
        n
    }

    /// Fraction of a tick left over; useful for render interpolation.
    #[inline] pub fn alpha(&self) -> f32 { self.acc / self.dt }
    #[inline] pub fn reset(&mut self) { self.acc = 0.0; }
}

impl Default for FixedStep {
    fn default() -> Self { Self::new(1.0 / 50.0, 8) }
}

/// Running counters for the two-phase loop.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    pub physics_ticks: u32,
    pub score_events: u32,
    pub obstacle_hits: u32,
}
