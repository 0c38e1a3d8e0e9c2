//! Configuration module for hbridge-stepper.
//!
//! Provides types for loading and validating motor configurations from TOML
//! files (with `std` feature) or pre-parsed data.

mod motor;
mod system;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use motor::MotorConfig;
pub use system::SystemConfig;
pub use validation::validate_config;
pub(crate) use validation::validate_motor;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

/// Copy `s` into a fixed-capacity string, dropping whatever does not fit.
pub(crate) fn truncated<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

// Re-export unit types at config level
pub use units::{step_interval_from_rate, Microsteps, StepInterval};
