//! Scheduler backed by a `fugit-timer` peripheral.

use fugit::TimerDurationU32 as TimerDuration;
use fugit_timer::Timer;

use crate::config::units::StepInterval;
use crate::error::SchedulerError;

use super::StepScheduler;

/// Adapts a one-shot hardware timer to [`StepScheduler`].
///
/// The timer runs at `TIMER_HZ`; step intervals are converted to ticks and
/// saturate at the timer's 32-bit range. A zero delay is armed as a single
/// tick so the step still goes through the timer.
pub struct TimerScheduler<T, const TIMER_HZ: u32>
where
    T: Timer<TIMER_HZ>,
{
    timer: T,
    armed: bool,
}

impl<T, const TIMER_HZ: u32> TimerScheduler<T, TIMER_HZ>
where
    T: Timer<TIMER_HZ>,
{
    /// Wrap a timer.
    pub fn new(timer: T) -> Self {
        Self { timer, armed: false }
    }

    /// Give back the timer.
    pub fn release(self) -> T {
        self.timer
    }

    fn ticks(delay: StepInterval) -> TimerDuration<TIMER_HZ> {
        let ticks = u128::from(delay.ticks()) * u128::from(TIMER_HZ) / 1_000_000_000;
        let ticks = u32::try_from(ticks).unwrap_or(u32::MAX).max(1);
        TimerDuration::<TIMER_HZ>::from_ticks(ticks)
    }
}

impl<T, const TIMER_HZ: u32> StepScheduler for TimerScheduler<T, TIMER_HZ>
where
    T: Timer<TIMER_HZ>,
{
    fn arm(&mut self, delay: StepInterval) -> Result<(), SchedulerError> {
        self.timer.start(Self::ticks(delay)).map_err(|_| {
            log_warn!("timer start failed");
            SchedulerError::Timer
        })?;
        self.armed = true;
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), SchedulerError> {
        if !self.armed {
            return Ok(());
        }
        self.timer.cancel().map_err(|_| {
            log_warn!("timer cancel failed");
            SchedulerError::Timer
        })?;
        self.armed = false;
        Ok(())
    }

    fn is_armed(&self) -> bool {
        self.armed
    }

    fn expire(&mut self) {
        self.armed = false;
    }

    fn has_expired(&mut self) -> bool {
        if !self.armed {
            return false;
        }
        match self.timer.wait() {
            Ok(()) => true,
            Err(nb::Error::WouldBlock) => false,
            Err(nb::Error::Other(_)) => {
                log_warn!("timer wait failed");
                false
            }
        }
    }
}
