//! Builder pattern for HBridgeStepper.

use crate::config::units::{Microsteps, StepInterval};
use crate::config::{truncated, validate_motor, MotorConfig, SystemConfig};
use crate::error::{ConfigError, Error, MotorError, Result};
use crate::scheduler::StepScheduler;

use super::commutation;
use super::driver::HBridgeStepper;
use super::lines::ControlLines;

/// Builder for creating HBridgeStepper instances.
pub struct HBridgeStepperBuilder<L, S>
where
    L: ControlLines,
    S: StepScheduler,
{
    lines: Option<L>,
    scheduler: Option<S>,
    name: Option<heapless::String<32>>,
    microsteps: Microsteps,
    invert_direction: bool,
    step_interval: Option<StepInterval>,
    require_enable: bool,
    config_error: Option<Error>,
}

impl<L, S> Default for HBridgeStepperBuilder<L, S>
where
    L: ControlLines,
    S: StepScheduler,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<L, S> HBridgeStepperBuilder<L, S>
where
    L: ControlLines,
    S: StepScheduler,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            lines: None,
            scheduler: None,
            name: None,
            microsteps: Microsteps::FULL,
            invert_direction: false,
            step_interval: None,
            require_enable: false,
            config_error: None,
        }
    }

    /// Set the control lines.
    pub fn lines(mut self, lines: L) -> Self {
        self.lines = Some(lines);
        self
    }

    /// Set the step scheduler.
    pub fn scheduler(mut self, scheduler: S) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Set the motor name.
    ///
    /// Names longer than 32 bytes are cut at a character boundary.
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(truncated(name));
        self
    }

    /// Set the initial micro-step resolution.
    pub fn microsteps(mut self, microsteps: Microsteps) -> Self {
        self.microsteps = microsteps;
        self
    }

    /// Set direction inversion.
    pub fn invert_direction(mut self, invert: bool) -> Self {
        self.invert_direction = invert;
        self
    }

    /// Set the initial step interval.
    ///
    /// Without one, motion requests fail with `InvalidState` until
    /// [`HBridgeStepper::set_microstep_interval`] is called.
    pub fn step_interval(mut self, interval: StepInterval) -> Self {
        self.step_interval = Some(interval);
        self
    }

    /// Configure from a MotorConfig.
    ///
    /// Invalid settings are reported by [`build`](Self::build).
    pub fn from_motor_config(mut self, config: &MotorConfig) -> Self {
        if let Err(e) = validate_motor(config) {
            self.config_error = Some(e);
            return self;
        }
        self.name = Some(config.name.clone());
        self.microsteps = config.microsteps;
        self.invert_direction = config.invert_direction;
        self.require_enable = config.has_enable_line;
        if let Ok(Some(interval)) = config.initial_step_interval() {
            self.step_interval = Some(interval);
        }
        self
    }

    /// Configure from SystemConfig by motor key.
    pub fn from_config(self, config: &SystemConfig, motor_key: &str) -> Result<Self> {
        let motor_config = config.motor(motor_key).ok_or_else(|| {
            Error::Config(ConfigError::MotorNotFound(
                truncated(motor_key),
            ))
        })?;

        Ok(self.from_motor_config(motor_config))
    }

    /// Build the HBridgeStepper.
    ///
    /// # Errors
    ///
    /// Returns an error if lines or scheduler are missing, the configuration
    /// asks for an enable line the lines don't have, or the resolution or
    /// interval is unusable.
    pub fn build(self) -> Result<HBridgeStepper<L, S>> {
        if let Some(e) = self.config_error {
            return Err(e);
        }

        let lines = self
            .lines
            .ok_or(Error::Config(ConfigError::MissingControlLine("control lines")))?;

        if self.require_enable && !lines.has_enable() {
            return Err(Error::Config(ConfigError::MissingControlLine("enable line")));
        }

        let scheduler = self
            .scheduler
            .ok_or(Error::Config(ConfigError::MissingControlLine("scheduler")))?;

        let step_gap = commutation::step_gap(self.microsteps).ok_or(Error::Motor(
            MotorError::UnsupportedResolution(self.microsteps.value()),
        ))?;

        if matches!(self.step_interval, Some(i) if i.ticks() == 0) {
            return Err(Error::Motor(MotorError::InvalidArgument));
        }

        let name = self.name.unwrap_or_else(|| truncated("motor"));
        log_info!(
            "{}: built, 1/{} stepping, inverted={}",
            name.as_str(),
            self.microsteps.value(),
            self.invert_direction
        );

        Ok(HBridgeStepper::new(
            lines,
            scheduler,
            name,
            self.invert_direction,
            step_gap,
            self.step_interval,
        ))
    }
}

impl<L, S> HBridgeStepper<L, S>
where
    L: ControlLines,
    S: StepScheduler,
{
    /// Start building a motor.
    pub fn builder() -> HBridgeStepperBuilder<L, S> {
        HBridgeStepperBuilder::new()
    }
}
