//! Step scheduling.
//!
//! The stepper never owns a timer interrupt. It asks a [`StepScheduler`] to
//! arm a single deferred step, and whoever services that timer calls
//! [`HBridgeStepper::on_step`](crate::HBridgeStepper::on_step) when it
//! expires.

mod manual;
mod timer;

pub use manual::ManualScheduler;
pub use timer::TimerScheduler;

use crate::config::units::StepInterval;
use crate::error::SchedulerError;

/// Deferred-step capability.
pub trait StepScheduler {
    /// Arm the next step to fire after `delay`.
    ///
    /// Replaces any step that is already armed.
    fn arm(&mut self, delay: StepInterval) -> Result<(), SchedulerError>;

    /// Cancel the armed step, if any.
    ///
    /// Succeeds when nothing is armed. Returns `SchedulerError::Busy` if the
    /// step already started and can no longer be withdrawn.
    fn cancel(&mut self) -> Result<(), SchedulerError>;

    /// Whether a step is armed and has not started yet.
    fn is_armed(&self) -> bool;

    /// Mark the armed step as started.
    ///
    /// Called by the step handler before it does anything else.
    fn expire(&mut self);

    /// Whether the armed step's delay has elapsed.
    ///
    /// For schedulers that are polled rather than interrupt driven. The
    /// default never reports expiry.
    fn has_expired(&mut self) -> bool {
        false
    }
}
