//! Assembly layer: a `Rider` (locomotion + tricks + display blend) on a `Course`, driven by a
//! fixed-step `Session` with speed scoring and an optional pursuer.

mod config;
mod pose;
mod pursuit;
mod rider;
mod session;
mod speed_score;

pub use config::{RiderConfig, SessionConfig};
pub use pose::{classify, PoseInputs, RiderPose, BOMB_REL_SPEED};
pub use pursuit::{Chaser, ChaserParams, Pursuer};
pub use rider::{Rider, Telemetry};
pub use session::{FrameReport, RunSummary, Session, SessionBuilder};
pub use speed_score::SpeedScore;

pub use powder_controllers::{ScoreEvent, ScoreKind, ScoreSink};
pub use powder_core::InputIntent;
