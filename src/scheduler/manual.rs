//! Scheduler driven by hand.
//!
//! Used for simulation and host tests: it records what the stepper asked for
//! and leaves it to the caller to decide when time passes.

use crate::config::units::StepInterval;
use crate::error::SchedulerError;

use super::StepScheduler;

/// Records arm requests; the caller fires steps explicitly.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    armed: Option<StepInterval>,
    last_delay: Option<StepInterval>,
    arm_count: u32,
    cancel_failure: Option<SchedulerError>,
}

impl ManualScheduler {
    /// Create an idle scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay of the currently armed step.
    pub fn pending(&self) -> Option<StepInterval> {
        self.armed
    }

    /// Delay passed to the most recent `arm` call.
    pub fn last_delay(&self) -> Option<StepInterval> {
        self.last_delay
    }

    /// Number of `arm` calls so far.
    pub fn arm_count(&self) -> u32 {
        self.arm_count
    }

    /// Make the next `cancel` fail with `err`, as if the step had already
    /// started running.
    pub fn fail_next_cancel(&mut self, err: SchedulerError) {
        self.cancel_failure = Some(err);
    }
}

impl StepScheduler for ManualScheduler {
    fn arm(&mut self, delay: StepInterval) -> Result<(), SchedulerError> {
        self.armed = Some(delay);
        self.last_delay = Some(delay);
        self.arm_count = self.arm_count.saturating_add(1);
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), SchedulerError> {
        if let Some(err) = self.cancel_failure.take() {
            return Err(err);
        }
        self.armed = None;
        Ok(())
    }

    fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    fn expire(&mut self) {
        self.armed = None;
    }
}
