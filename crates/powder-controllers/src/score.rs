use powder_core::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreKind { FrontFlip, BackFlip, Spin, Speed }

/// Points handed to whoever keeps the score. `anchor` is where the rider was when they were earned.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub points: u32,
    pub kind: ScoreKind,
    pub anchor: Vec3,
}

/// Receives score events. Injected by the owner of the rider; nothing global.
pub trait ScoreSink {
    fn award(&mut self, ev: ScoreEvent);
}

impl ScoreSink for Vec<ScoreEvent> {
    #[inline] fn award(&mut self, ev: ScoreEvent) { self.push(ev); }
}
