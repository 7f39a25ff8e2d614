mod score;
mod tricks;
mod visual;

pub use score::{ScoreEvent, ScoreKind, ScoreSink};
pub use tricks::{TrickController, TrickKind, TrickParams, TrickPhase, TrickPriority, TrickState, TrickUpdate};
pub use visual::{VisualBlend, VisualInput, VisualParams};
