//! Debug cadence settings and a bounded event ledger that can be dumped as JSONL.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use powder_controllers::ScoreKind;
use powder_core::Vec3;
use serde::{Deserialize, Serialize};

/// How chatty a run is. Zero disables the matching output.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSettings {
    /// Print a status block every N physics ticks.
    pub print_every: u32,
    /// Dump the ledger every N physics ticks.
    pub json_every: u32,
    /// Max ledger lines echoed per status block.
    pub max_lines: usize,
}

impl Default for DebugSettings {
    fn default() -> Self { Self { print_every: 0, json_every: 0, max_lines: 8 } }
}

impl DebugSettings {
    #[inline] pub fn should_print(&self, tick: u64) -> bool { self.print_every != 0 && tick % self.print_every as u64 == 0 }
    #[inline] pub fn should_dump(&self, tick: u64) -> bool { self.json_every != 0 && tick % self.json_every as u64 == 0 }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "ev", rename_all = "snake_case")]
pub enum LedgerEvent {
    Takeoff { tick: u64, pos: Vec3, speed: f32 },
    Landing { tick: u64, pos: Vec3, airtime: f32 },
    JumpFired { tick: u64, vel: Vec3 },
    TrickArmed { tick: u64 },
    Score { tick: u64, kind: ScoreKind, points: u32 },
    ObstacleHit { tick: u64, id: u32, speed_before: f32, speed_after: f32 },
    Caught { tick: u64, pos: Vec3 },
}

impl LedgerEvent {
    pub fn tick(&self) -> u64 {
        use LedgerEvent::*;
        match *self {
            Takeoff { tick, .. } | Landing { tick, .. } | JumpFired { tick, .. } | TrickArmed { tick }
            | Score { tick, .. } | ObstacleHit { tick, .. } | Caught { tick, .. } => tick,
        }
    }
}

/// Fixed-capacity event log. Pushes past capacity are counted and dropped.
#[derive(Clone, Debug)]
pub struct Ledger {
    cap: usize,
    events: Vec<LedgerEvent>,
    dropped: u64,
}

impl Ledger {
    pub fn new(cap: usize) -> Self { Self { cap, events: Vec::with_capacity(cap.min(1024)), dropped: 0 } }

    #[inline] pub fn push(&mut self, ev: LedgerEvent) {
        if self.events.len() < self.cap { self.events.push(ev); } else { self.dropped += 1; }
    }
    #[inline] pub fn clear(&mut self) { self.events.clear(); }
    #[inline] pub fn len(&self) -> usize { self.events.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.events.is_empty() }
    #[inline] pub fn dropped(&self) -> u64 { self.dropped }
    pub fn iter(&self) -> impl Iterator<Item = &LedgerEvent> + '_ { self.events.iter() }

    /// One JSON object per line.
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
        for ev in &self.events {
            serde_json::to_writer(&mut w, ev)?;
            w.write_all(b"\n")?;
        }
        w.flush()
    }

    /// Writes `<dir>/ledger_<tick>.jsonl`, creating `dir` if needed.
    pub fn write_jsonl(&self, dir: impl AsRef<Path>, tick: u64) -> io::Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("ledger_{tick:08}.jsonl"));
        self.write_to(BufWriter::new(File::create(&path)?))?;
        tracing::trace!(path = %path.display(), n = self.events.len(), "ledger dumped");
        Ok(path)
    }
}
