//! Motor configuration from TOML.

use heapless::String;
use serde::Deserialize;

use crate::error::ConfigError;

use super::truncated;
use super::units::{step_interval_from_rate, Microsteps, StepInterval};

/// Static configuration of one H-bridge stepper.
///
/// Describes the wiring and the initial runtime settings. Pins themselves are
/// handed to the builder; this only records what the board is expected to
/// provide.
#[derive(Debug, Clone, Deserialize)]
pub struct MotorConfig {
    /// Human-readable name (max 32 chars).
    pub name: String<32>,

    /// Swap which commutation-table traversal direction counts as positive.
    #[serde(default)]
    pub invert_direction: bool,

    /// Initial micro-step resolution (1 = full step, 2 = half step).
    #[serde(default)]
    pub microsteps: Microsteps,

    /// Initial step interval in nanoseconds.
    #[serde(default)]
    pub step_interval_ns: Option<u64>,

    /// Initial step rate, alternative to `step_interval_ns`.
    #[serde(default)]
    pub steps_per_second: Option<f32>,

    /// Whether the board wires a driver enable line.
    #[serde(default)]
    pub has_enable_line: bool,
}

impl MotorConfig {
    /// Create a configuration with defaults for everything but the name.
    pub fn new(name: &str) -> Self {
        Self {
            name: truncated(name),
            invert_direction: false,
            microsteps: Microsteps::FULL,
            step_interval_ns: None,
            steps_per_second: None,
            has_enable_line: false,
        }
    }

    /// Resolve the configured initial step interval, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is zero, the rate is invalid, or both
    /// forms are given.
    pub fn initial_step_interval(&self) -> Result<Option<StepInterval>, ConfigError> {
        match (self.step_interval_ns, self.steps_per_second) {
            (Some(_), Some(_)) => Err(ConfigError::ConflictingStepTiming(self.name.clone())),
            (Some(0), None) => Err(ConfigError::ZeroStepInterval),
            (Some(ns), None) => Ok(Some(StepInterval::from_ticks(ns))),
            (None, Some(rate)) => step_interval_from_rate(rate).map(Some),
            (None, None) => Ok(None),
        }
    }
}
