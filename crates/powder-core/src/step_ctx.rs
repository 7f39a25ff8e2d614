/// Per-tick context handed to every physics-phase stage.
#[derive(Copy, Clone, Debug)]
pub struct StepCtx {
    pub dt: f32,
    pub tick: u64,
    /// Simulated seconds since the loop started (sum of physics dt).
    pub time: f32,
}

impl StepCtx {
    pub fn new(dt: f32, tick: u64, time: f32) -> Self { Self { dt, tick, time } }
}
