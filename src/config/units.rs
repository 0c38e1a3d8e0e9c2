//! Unit types for step timing and resolution.
//!
//! Provides type-safe representations of step intervals and micro-step
//! divisors so that nanoseconds, rates and resolution levels cannot be
//! mixed up at call sites.

use serde::Deserialize;

use crate::error::ConfigError;

/// Time between two consecutive steps.
///
/// Nanosecond resolution, 64-bit backing so that very slow rates do not
/// overflow.
pub type StepInterval = fugit::NanosDurationU64;

const NANOS_PER_SEC: f32 = 1_000_000_000.0;

/// Convert a step rate in steps per second into a [`StepInterval`].
///
/// The result is rounded to the nearest nanosecond.
///
/// # Errors
///
/// Returns `ConfigError::InvalidStepRate` if the rate is not a finite value
/// greater than zero, or so high that the interval rounds to zero.
pub fn step_interval_from_rate(steps_per_second: f32) -> Result<StepInterval, ConfigError> {
    if !steps_per_second.is_finite() || steps_per_second <= 0.0 {
        return Err(ConfigError::InvalidStepRate(steps_per_second));
    }

    let nanos = libm::roundf(NANOS_PER_SEC / steps_per_second);
    if nanos < 1.0 {
        return Err(ConfigError::InvalidStepRate(steps_per_second));
    }

    Ok(StepInterval::from_ticks(nanos as u64))
}

/// Microstep divisor (1, 2, 4, 8, 16, 32, 64, 128, 256).
///
/// Validated at construction to be a power of 2 within the valid range.
/// Drivers decide which of these levels they actually support; the H-bridge
/// commutation table only covers [`Microsteps::FULL`] and [`Microsteps::HALF`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Microsteps(u16);

impl Microsteps {
    /// Full step (no microstepping).
    pub const FULL: Self = Self(1);
    /// Half step.
    pub const HALF: Self = Self(2);
    /// Quarter step.
    pub const QUARTER: Self = Self(4);
    /// Eighth step.
    pub const EIGHTH: Self = Self(8);
    /// Sixteenth step.
    pub const SIXTEENTH: Self = Self(16);
    /// Thirty-second step.
    pub const THIRTY_SECOND: Self = Self(32);
    /// Sixty-fourth step.
    pub const SIXTY_FOURTH: Self = Self(64);
    /// 128th step.
    pub const ONE_TWENTY_EIGHTH: Self = Self(128);
    /// 256th step (maximum resolution).
    pub const TWO_FIFTY_SIXTH: Self = Self(256);

    /// Valid microstep values.
    const VALID_VALUES: [u16; 9] = [1, 2, 4, 8, 16, 32, 64, 128, 256];

    /// Create a new Microsteps value with validation.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidMicrosteps` if the value is not a valid power of 2.
    pub fn new(value: u16) -> Result<Self, ConfigError> {
        if Self::VALID_VALUES.contains(&value) {
            Ok(Self(value))
        } else {
            Err(ConfigError::InvalidMicrosteps(value))
        }
    }

    /// Get the raw divisor value.
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Check if a value is valid.
    #[inline]
    pub fn is_valid(value: u16) -> bool {
        Self::VALID_VALUES.contains(&value)
    }
}

impl Default for Microsteps {
    fn default() -> Self {
        Self::FULL
    }
}

impl TryFrom<u16> for Microsteps {
    type Error = ConfigError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Microsteps {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use core::fmt::Write;
        let value = u16::deserialize(deserializer)?;
        Microsteps::new(value).map_err(|e| {
            let mut buf = heapless::String::<128>::new();
            let _ = write!(buf, "{}", e);
            serde::de::Error::custom(buf.as_str())
        })
    }
}
