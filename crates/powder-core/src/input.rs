/// Latest sampled player intent. The physics tick reads a snapshot of this; it is not a queue,
/// so toggles between two physics ticks coalesce to the last value.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct InputIntent {
    /// -1 (left) .. 1 (right).
    pub steering: f32,
    /// -1 (brake / pull back) .. 1 (push / lean forward).
    pub throttle: f32,
    pub boost: bool,
    /// Edge event; cleared once a physics tick has consumed it.
    pub jump_pressed: bool,
    pub trick_held: bool,
}

impl InputIntent {
    /// Axes clamped to [-1, 1]; NaN reads as centered.
    pub fn sanitized(self) -> Self {
        let axis = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) };
        Self { steering: axis(self.steering), throttle: axis(self.throttle), ..self }
    }
}
