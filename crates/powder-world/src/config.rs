use powder_controllers::{TrickParams, VisualParams};
use powder_core::ParamError;
use powder_locomotion::LocoParams;
use powder_viz::DebugSettings;
use serde::{Deserialize, Serialize};

/// Everything needed to assemble one rider.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiderConfig {
    pub loco: LocoParams,
    pub tricks: TrickParams,
    /// `None` runs without a display orientation.
    pub visual: Option<VisualParams>,
    pub speed_multiplier: f32,
    pub trick_speed_multiplier: f32,
}

impl Default for RiderConfig {
    fn default() -> Self {
        Self {
            loco: LocoParams::default(),
            tricks: TrickParams::default(),
            visual: Some(VisualParams::default()),
            speed_multiplier: 1.0,
            trick_speed_multiplier: 1.0,
        }
    }
}

impl RiderConfig {
    pub fn validate(&self) -> Result<(), ParamError> {
        self.loco.validate()?;
        self.tricks.validate()?;
        if let Some(v) = &self.visual { v.validate()?; }
        ParamError::check_range("speed_multiplier", self.speed_multiplier, 0.0, 10.0)?;
        ParamError::check_range("trick_speed_multiplier", self.trick_speed_multiplier, 0.0, 10.0)?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Physics tick length (s).
    pub fixed_dt: f32,
    pub max_substeps: u32,
    /// Remove an obstacle from the course once it has slowed the rider.
    pub consume_obstacles: bool,
    /// Speed score per (m/s * s).
    pub speed_score_multiplier: f32,
    pub debug: DebugSettings,
    pub ledger_cap: usize,
    /// Where ledger dumps go when `debug.json_every` is set.
    pub dump_dir: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 50.0,
            max_substeps: 8,
            consume_obstacles: true,
            speed_score_multiplier: 5.0,
            debug: DebugSettings::default(),
            ledger_cap: 4096,
            dump_dir: "out".into(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ParamError> {
        ParamError::check_range("fixed_dt", self.fixed_dt, 1.0e-4, 1.0)?;
        if self.max_substeps == 0 {
            return Err(ParamError::OutOfRange { field: "max_substeps", value: 0.0, lo: 1.0, hi: f32::MAX });
        }
        ParamError::check_non_negative("speed_score_multiplier", self.speed_score_multiplier)?;
        Ok(())
    }
}
