//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::units::Microsteps;
use super::{truncated, MotorConfig, SystemConfig};

/// Validate a system configuration.
///
/// Checks:
/// - Micro-step resolution is full or half step
/// - Step timing is either absent, a non-zero interval, or a valid rate
/// - Motor display names are unique
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    for motor in config.motors.values() {
        validate_motor(motor)?;
    }

    for (i, motor) in config.motors.values().enumerate() {
        let name = motor.name.as_str();
        if config
            .motors
            .values()
            .skip(i + 1)
            .any(|other| other.name.as_str() == name)
        {
            return Err(Error::Config(ConfigError::DuplicateMotorName(truncated(name))));
        }
    }

    Ok(())
}

pub(crate) fn validate_motor(config: &MotorConfig) -> Result<()> {
    if config.microsteps != Microsteps::FULL && config.microsteps != Microsteps::HALF {
        return Err(Error::Config(ConfigError::InvalidMicrosteps(
            config.microsteps.value(),
        )));
    }

    config.initial_step_interval()?;

    Ok(())
}
