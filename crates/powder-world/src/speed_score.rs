/// Accrues `speed * multiplier * dt` and pays out whole points only; the fraction carries over.
#[derive(Copy, Clone, Debug)]
pub struct SpeedScore {
    multiplier: f32,
    remainder: f32,
    sent: u32,
    game_over: bool,
}

impl SpeedScore {
    pub fn new(multiplier: f32) -> Self {
        Self { multiplier, remainder: 0.0, sent: 0, game_over: false }
    }

    /// Points newly earned this frame.
    pub fn update(&mut self, speed: f32, dt: f32) -> u32 {
        if self.game_over || !speed.is_finite() || !(dt > 0.0) { return 0; }
        self.remainder += speed.max(0.0) * self.multiplier * dt;
        let whole = self.remainder.floor();
        self.remainder -= whole;
        let delta = whole as u32;
        self.sent = self.sent.saturating_add(delta);
        delta
    }

    pub fn set_game_over(&mut self, over: bool) { self.game_over = over; }
    #[inline] pub fn game_over(&self) -> bool { self.game_over }
    #[inline] pub fn total(&self) -> u32 { self.sent }

    pub fn reset_run(&mut self) {
        self.game_over = false;
        self.remainder = 0.0;
        self.sent = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pays_whole_points_and_carries_fraction() {
        let mut s = SpeedScore::new(5.0);
        // 10 m/s * 5 * 0.01 = 0.5 per frame
        assert_eq!(s.update(10.0, 0.01), 0);
        assert_eq!(s.update(10.0, 0.01), 1);
        assert_eq!(s.update(10.0, 0.01), 0);
        let mut paid = 1;
        for _ in 0..97 { paid += s.update(10.0, 0.01); }
        assert_eq!(paid, 50);
        assert_eq!(s.total(), 50);
    }

    #[test]
    fn small_increments_survive_a_large_total() {
        let mut s = SpeedScore::new(5.0);
        assert_eq!(s.update(1.0e6, 4.0), 20_000_000);
        let mut paid = 0;
        for _ in 0..100 { paid += s.update(10.0, 0.01); }
        assert_eq!(paid, 50);
        assert_eq!(s.total(), 20_000_050);
    }

    #[test]
    fn game_over_stops_and_reset_restarts() {
        let mut s = SpeedScore::new(5.0);
        s.update(20.0, 1.0);
        s.set_game_over(true);
        assert_eq!(s.update(20.0, 1.0), 0);
        assert_eq!(s.total(), 100);
        s.reset_run();
        assert!(!s.game_over());
        assert_eq!(s.update(2.0, 1.0), 10);
    }
}
