//! JSON rider descriptors -> validated rider and session configs.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use powder_controllers::{TrickParams, VisualParams};
use powder_locomotion::LocoParams;
use powder_viz::DebugSettings;
use powder_world::{RiderConfig, SessionConfig};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RiderDescriptor {
    /// Physics tick (s).
    pub dt: f32,
    pub max_substeps: u32,
    pub loco: LocoParams,
    pub tricks: TrickParams,
    /// Run without a display orientation when false.
    pub visual_enabled: bool,
    pub visual: VisualParams,
    pub upgrades: UpgradeBlock,
    pub scoring: ScoringBlock,
    pub debug: DebugSettings,
}

impl Default for RiderDescriptor {
    fn default() -> Self {
        let s = SessionConfig::default();
        Self {
            dt: s.fixed_dt,
            max_substeps: s.max_substeps,
            loco: LocoParams::default(),
            tricks: TrickParams::default(),
            visual_enabled: true,
            visual: VisualParams::default(),
            upgrades: UpgradeBlock::default(),
            scoring: ScoringBlock::default(),
            debug: s.debug,
        }
    }
}

/// Garage upgrades applied on top of the base tunables.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct UpgradeBlock {
    pub speed_multiplier: f32,
    pub trick_speed_multiplier: f32,
}

impl Default for UpgradeBlock {
    fn default() -> Self { Self { speed_multiplier: 1.0, trick_speed_multiplier: 1.0 } }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ScoringBlock {
    pub speed_multiplier: f32,
    pub consume_obstacles: bool,
}

impl Default for ScoringBlock {
    fn default() -> Self { Self { speed_multiplier: 5.0, consume_obstacles: true } }
}

pub fn parse(json: &str) -> Result<RiderDescriptor> {
    serde_json::from_str(json).context("rider descriptor is not valid JSON for this schema")
}

pub fn load(path: impl AsRef<Path>) -> Result<(RiderConfig, SessionConfig)> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let d = parse(&text).with_context(|| format!("parsing {}", path.display()))?;
    validate_and_build(&d)
}

pub fn validate_and_build(d: &RiderDescriptor) -> Result<(RiderConfig, SessionConfig)> {
    if !(d.dt > 0.0 && d.dt <= 0.1) { return Err(anyhow!("dt out of range: {}", d.dt)); }
    if d.max_substeps == 0 || d.max_substeps > 64 { return Err(anyhow!("max_substeps out of range: {}", d.max_substeps)); }

    let rider = RiderConfig {
        loco: d.loco,
        tricks: d.tricks,
        visual: d.visual_enabled.then_some(d.visual),
        speed_multiplier: d.upgrades.speed_multiplier,
        trick_speed_multiplier: d.upgrades.trick_speed_multiplier,
    };
    d.loco.validate().context("loco")?;
    d.tricks.validate().context("tricks")?;
    if d.visual_enabled { d.visual.validate().context("visual")?; }
    rider.validate().context("upgrades")?;

    let session = SessionConfig {
        fixed_dt: d.dt,
        max_substeps: d.max_substeps,
        consume_obstacles: d.scoring.consume_obstacles,
        speed_score_multiplier: d.scoring.speed_multiplier,
        debug: d.debug,
        ..SessionConfig::default()
    };
    session.validate().context("scoring")?;
    Ok((rider, session))
}
