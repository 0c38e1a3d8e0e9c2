//! # hbridge-stepper
//!
//! Open-loop commutation and motion sequencing for 4-wire steppers driven
//! through an H-bridge, with embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Full and half stepping**: eight-row commutation table walked with a
//!   stride of 2 or 1
//! - **Position and velocity runs**: `move_by`, `move_to`, `run`, `stop`
//! - **Timer agnostic**: steps are armed through a [`StepScheduler`]; the
//!   timer owner calls [`HBridgeStepper::on_step`] on expiry
//! - **Shared safely**: all state sits behind one `critical-section` mutex,
//!   so callers and the step handler can run in different contexts
//! - **no_std compatible**: core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hbridge_stepper::{Direction, GpioLines, HBridgeStepper, ManualScheduler, StepInterval};
//!
//! let motor = HBridgeStepper::builder()
//!     .lines(GpioLines::new([a, b, c, d]).with_enable(en))
//!     .scheduler(ManualScheduler::new())
//!     .step_interval(StepInterval::millis(2))
//!     .build()?;
//!
//! motor.enable()?;
//! motor.move_by(200)?;
//!
//! // From the timer interrupt:
//! motor.on_step();
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `log` (default): Routes internal logging to the `log` facade
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[macro_use]
mod logging;

// Core modules
pub mod config;
pub mod error;
pub mod motor;
pub mod scheduler;

// Re-exports for ergonomic API
pub use config::{validate_config, MotorConfig, SystemConfig};
pub use error::{Error, Result};
pub use motor::{
    ControlLines, Direction, EventCallback, GpioLines, HBridgeStepper, HBridgeStepperBuilder,
    MotorStatus, RunMode, StepperEvent,
};
pub use scheduler::{ManualScheduler, StepScheduler, TimerScheduler};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Microsteps, StepInterval};
