use serde::{Deserialize, Serialize};
use std::path::Path;

use stickmotion_common::Level;

use crate::cache::DEFAULT_CAPACITY;
use crate::error::{MotionError, Result};

/// Breath cycle length in seconds for each level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreathCycles {
    pub beginner: f32,
    pub advanced: f32,
    pub expert: f32,
}

impl Default for BreathCycles {
    fn default() -> Self {
        Self {
            beginner: 6.0,
            advanced: 5.0,
            expert: 4.0,
        }
    }
}

impl BreathCycles {
    pub fn for_level(&self, level: Level) -> f32 {
        match level {
            Level::Beginner => self.beginner,
            Level::Advanced => self.advanced,
            Level::Expert => self.expert,
        }
    }
}

/// Tunables of the synthesis pipeline, every field has a default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of cached animations, 0 disables the cache
    pub cache_capacity: usize,
    /// Bound of the cosmetic position jitter in canvas units
    pub jitter_amplitude: f32,
    /// Fixed seed for the jitter, a random one is drawn per call when absent
    pub jitter_seed: Option<u64>,
    /// Duration multiplier for slow pace cues
    pub slow_factor: f32,
    /// Duration multiplier for fast pace cues
    pub fast_factor: f32,
    /// Activation multiplier for emphasis cues
    pub emphasis_factor: f32,
    pub breath_cycles: BreathCycles,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CAPACITY,
            jitter_amplitude: 0.5,
            jitter_seed: None,
            slow_factor: 1.3,
            fast_factor: 0.8,
            emphasis_factor: 1.25,
            breath_cycles: BreathCycles::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_file<P: AsRef<Path>>(filepath: P) -> Result<Self> {
        let string = std::fs::read_to_string(filepath.as_ref())?;
        Self::from_str(string)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str<S: AsRef<str>>(string: S) -> Result<Self> {
        let config = serde_json::from_str::<Self>(string.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.jitter_amplitude.is_finite() && self.jitter_amplitude >= 0.0) {
            return Err(MotionError::Config(format!(
                "jitter_amplitude must be a non-negative number, got {}",
                self.jitter_amplitude
            )));
        }
        if !(self.slow_factor.is_finite() && self.slow_factor > 1.0) {
            return Err(MotionError::Config(format!(
                "slow_factor must be greater than 1, got {}",
                self.slow_factor
            )));
        }
        if !(self.fast_factor > 0.0 && self.fast_factor < 1.0) {
            return Err(MotionError::Config(format!(
                "fast_factor must be in (0, 1), got {}",
                self.fast_factor
            )));
        }
        if !(self.emphasis_factor.is_finite() && self.emphasis_factor >= 1.0) {
            return Err(MotionError::Config(format!(
                "emphasis_factor must be at least 1, got {}",
                self.emphasis_factor
            )));
        }
        let cycles = self.breath_cycles;
        for (name, value) in [
            ("beginner", cycles.beginner),
            ("advanced", cycles.advanced),
            ("expert", cycles.expert),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(MotionError::Config(format!(
                    "breath cycle for {name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}
