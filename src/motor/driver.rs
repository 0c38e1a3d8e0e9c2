//! H-bridge stepper driver.
//!
//! Generic over the control lines and the step scheduler. All runtime state
//! lives behind one critical-section mutex, so the public operations can be
//! called from any thread while the step handler runs from the timer
//! context.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::config::units::{Microsteps, StepInterval};
use crate::error::{MotorError, Result};
use crate::scheduler::StepScheduler;

use super::commutation;
use super::lines::ControlLines;
use super::state::{Direction, MotorStatus, RunMode, RuntimeState, StepOutcome, StepperEvent};

/// Event callback.
///
/// Receives the motor that raised the event, the event, and the user data
/// registered with it. Runs outside the critical section, so it may call
/// back into the motor.
pub type EventCallback<L, S> = fn(&HBridgeStepper<L, S>, StepperEvent, usize);

struct Inner<L, S>
where
    L: ControlLines,
    S: StepScheduler,
{
    lines: L,
    scheduler: S,
    state: RuntimeState,
    callback: Option<(EventCallback<L, S>, usize)>,
}

/// Open-loop 4-wire stepper driven through an H-bridge.
///
/// Generic over:
/// - `L`: control lines (see [`GpioLines`](super::GpioLines))
/// - `S`: step scheduler (see [`crate::scheduler`])
///
/// Motion requests return as soon as the first step is armed. Each armed
/// step ends in a call to [`on_step`](Self::on_step) from whoever services
/// the scheduler.
pub struct HBridgeStepper<L, S>
where
    L: ControlLines,
    S: StepScheduler,
{
    /// Motor name for logging/debugging.
    name: heapless::String<32>,

    /// Walk the commutation table backwards for positive motion.
    invert_direction: bool,

    inner: Mutex<RefCell<Inner<L, S>>>,
}

impl<L, S> HBridgeStepper<L, S>
where
    L: ControlLines,
    S: StepScheduler,
{
    /// Create a motor in the `Idle` state.
    pub(crate) fn new(
        lines: L,
        scheduler: S,
        name: heapless::String<32>,
        invert_direction: bool,
        step_gap: u8,
        step_interval: Option<StepInterval>,
    ) -> Self {
        Self {
            name,
            invert_direction,
            inner: Mutex::new(RefCell::new(Inner {
                lines,
                scheduler,
                state: RuntimeState::new(step_gap, step_interval),
                callback: None,
            })),
        }
    }

    /// Get the motor name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Whether positive motion walks the commutation table backwards.
    #[inline]
    pub fn invert_direction(&self) -> bool {
        self.invert_direction
    }

    fn locked<R>(&self, f: impl FnOnce(&mut Inner<L, S>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    fn notify(&self, fired: Option<(EventCallback<L, S>, usize)>, event: StepperEvent) {
        if let Some((callback, user_data)) = fired {
            callback(self, event, user_data);
        }
    }

    /// Drive the enable line active.
    ///
    /// # Errors
    ///
    /// `MotorError::NotSupported` without an enable line.
    pub fn enable(&self) -> Result<()> {
        self.locked(|inner| inner.lines.set_enable(true))?;
        log_debug!("{}: enabled", self.name());
        Ok(())
    }

    /// Drive the enable line inactive.
    ///
    /// Does not stop a running sequence: armed steps keep advancing phase and
    /// position while the bridge is unpowered.
    ///
    /// # Errors
    ///
    /// `MotorError::NotSupported` without an enable line.
    pub fn disable(&self) -> Result<()> {
        self.locked(|inner| inner.lines.set_enable(false))?;
        log_debug!("{}: disabled", self.name());
        Ok(())
    }

    /// Select full-step or half-step commutation.
    ///
    /// # Errors
    ///
    /// `MotorError::UnsupportedResolution` for anything other than
    /// [`Microsteps::FULL`] or [`Microsteps::HALF`]; the current resolution is
    /// kept.
    pub fn set_micro_step_res(&self, res: Microsteps) -> Result<()> {
        let gap = commutation::step_gap(res).ok_or_else(|| {
            log_debug!("{}: rejected resolution 1/{}", self.name(), res.value());
            MotorError::UnsupportedResolution(res.value())
        })?;
        self.locked(|inner| inner.state.step_gap = gap);
        Ok(())
    }

    /// Current micro-step resolution.
    pub fn micro_step_res(&self) -> Microsteps {
        self.locked(|inner| commutation::resolution(inner.state.step_gap))
    }

    /// Overwrite the absolute position without moving.
    pub fn set_reference_position(&self, value: i32) {
        self.locked(|inner| inner.state.position.set(value));
    }

    /// Absolute position in steps.
    pub fn actual_position(&self) -> i32 {
        self.locked(|inner| inner.state.position.steps())
    }

    /// Register or clear the event callback.
    ///
    /// Takes effect from the next event on.
    pub fn set_event_callback(&self, callback: Option<EventCallback<L, S>>, user_data: usize) {
        self.locked(|inner| inner.callback = callback.map(|cb| (cb, user_data)));
    }

    /// Set the time between steps.
    ///
    /// A step that is already armed keeps its schedule; the new interval
    /// applies from the next re-arm.
    ///
    /// # Errors
    ///
    /// `MotorError::InvalidArgument` for a zero interval; the previous
    /// interval is kept.
    pub fn set_microstep_interval(&self, interval: StepInterval) -> Result<()> {
        if interval.ticks() == 0 {
            log_debug!("{}: rejected zero step interval", self.name());
            return Err(MotorError::InvalidArgument.into());
        }
        self.locked(|inner| inner.state.step_interval = Some(interval));
        Ok(())
    }

    /// Move by a relative number of steps.
    ///
    /// `delta == 0` cancels any armed step and reports `StepsCompleted`
    /// straight away, whether or not the motor was moving. If the step can
    /// no longer be withdrawn it is left to run and ignored.
    ///
    /// # Errors
    ///
    /// - `MotorError::InvalidState` if no step interval is configured
    /// - the scheduler's error if the first step cannot be armed
    pub fn move_by(&self, delta: i32) -> Result<()> {
        let fired = self.locked(|inner| -> Result<_> {
            if inner.state.step_interval.is_none() {
                log_debug!("{}: move_by before step interval set", self.name());
                return Err(MotorError::InvalidState.into());
            }

            if delta == 0 {
                if inner.scheduler.cancel().is_err() {
                    log_debug!("{}: cancel lost race, step will be ignored", self.name());
                    // The step still runs but finds the motor idle
                    inner.scheduler.expire();
                }
                inner.state.run_mode = RunMode::Idle;
                inner.state.remaining_steps = 0;
                return Ok(inner.callback);
            }

            inner.state.begin_position(delta);
            Self::arm_first(inner)?;
            Ok(None)
        })?;

        if delta == 0 {
            self.notify(fired, StepperEvent::StepsCompleted);
        } else {
            log_debug!("{}: move_by {}", self.name(), delta);
        }
        Ok(())
    }

    /// Move to an absolute position.
    ///
    /// # Errors
    ///
    /// Same as [`move_by`](Self::move_by).
    pub fn move_to(&self, target: i32) -> Result<()> {
        let delta = self.locked(|inner| inner.state.position.steps_to(target));
        self.move_by(delta)
    }

    /// Step continuously in `direction` until [`stop`](Self::stop).
    ///
    /// # Errors
    ///
    /// Same as [`move_by`](Self::move_by).
    pub fn run(&self, direction: Direction) -> Result<()> {
        self.locked(|inner| -> Result<()> {
            if inner.state.step_interval.is_none() {
                log_debug!("{}: run before step interval set", self.name());
                return Err(MotorError::InvalidState.into());
            }
            inner.state.begin_velocity(direction);
            Self::arm_first(inner)
        })?;
        log_debug!("{}: run {:?}", self.name(), direction);
        Ok(())
    }

    fn arm_first(inner: &mut Inner<L, S>) -> Result<()> {
        if let Err(e) = inner.scheduler.arm(StepInterval::from_ticks(0)) {
            inner.state.run_mode = RunMode::Idle;
            return Err(e.into());
        }
        Ok(())
    }

    /// Cancel the armed step and report `Stopped`.
    ///
    /// Stopping an idle motor still reports `Stopped`.
    ///
    /// # Errors
    ///
    /// Returns the scheduler's cancellation error unchanged. In that case
    /// the step runs anyway, the run mode is left as it was and no event is
    /// raised.
    pub fn stop(&self) -> Result<()> {
        let fired = self.locked(|inner| -> Result<_> {
            inner.scheduler.cancel()?;
            inner.state.run_mode = RunMode::Idle;
            Ok(inner.callback)
        });

        match fired {
            Ok(fired) => {
                log_debug!("{}: stopped", self.name());
                self.notify(fired, StepperEvent::Stopped);
                Ok(())
            }
            Err(e) => {
                log_warn!("{}: stop failed, step already running", self.name());
                Err(e)
            }
        }
    }

    /// Whether a step is armed.
    pub fn is_moving(&self) -> bool {
        self.locked(|inner| inner.scheduler.is_armed())
    }

    /// Step handler. Call once per scheduler expiry.
    ///
    /// Drives one commutation-table row, advances phase and position, and
    /// either re-arms or finishes the sequence. An expiry that arrives after
    /// the motor went idle is ignored.
    ///
    /// A failed pin write is logged but does not stop the sequence: phase
    /// and position advance as if the row had been driven.
    pub fn on_step(&self) {
        let invert = self.invert_direction;
        let fired = self.locked(|inner| {
            inner.scheduler.expire();

            let phase = match inner.state.begin_step() {
                Some(phase) => phase,
                None => {
                    log_trace!("stale step expiry ignored");
                    return None;
                }
            };

            if inner.lines.apply(commutation::levels(phase)).is_err() {
                log_warn!("pin write failed at phase {}", phase);
            }

            match inner.state.finish_step(invert) {
                StepOutcome::Rearm(interval) => {
                    if inner.scheduler.arm(interval).is_err() {
                        log_warn!("re-arm failed, motor idle");
                        inner.state.run_mode = RunMode::Idle;
                    }
                    None
                }
                StepOutcome::Completed => {
                    log_debug!("steps completed at {}", inner.state.position.steps());
                    inner.callback
                }
            }
        });

        self.notify(fired, StepperEvent::StepsCompleted);
    }

    /// Run the step handler if the scheduler reports the armed step expired.
    ///
    /// For polled schedulers such as
    /// [`TimerScheduler`](crate::scheduler::TimerScheduler). Returns whether
    /// a step was handled.
    pub fn poll(&self) -> bool {
        let expired = self.locked(|inner| inner.scheduler.has_expired());
        if expired {
            self.on_step();
        }
        expired
    }

    /// Snapshot of the runtime state.
    pub fn status(&self) -> MotorStatus {
        self.locked(|inner| inner.state.status())
    }

    /// Run `f` on the scheduler inside the critical section.
    pub fn with_scheduler<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        self.locked(|inner| f(&mut inner.scheduler))
    }

    /// Run `f` on the control lines inside the critical section.
    pub fn with_lines<R>(&self, f: impl FnOnce(&mut L) -> R) -> R {
        self.locked(|inner| f(&mut inner.lines))
    }

    /// Give back the control lines and the scheduler.
    pub fn release(self) -> (L, S) {
        let inner = self.inner.into_inner().into_inner();
        (inner.lines, inner.scheduler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;

    #[derive(Default)]
    struct Recorder {
        rows: heapless::Vec<[bool; 4], 16>,
        current: [bool; 4],
        writes: usize,
    }

    impl ControlLines for Recorder {
        fn set_line(&mut self, index: usize, level: bool) -> core::result::Result<(), MotorError> {
            self.current[index] = level;
            self.writes += 1;
            if index == 3 {
                let _ = self.rows.push(self.current);
            }
            Ok(())
        }

        fn set_enable(&mut self, _level: bool) -> core::result::Result<(), MotorError> {
            Err(MotorError::NotSupported)
        }

        fn has_enable(&self) -> bool {
            false
        }
    }

    fn motor(step_gap: u8) -> HBridgeStepper<Recorder, ManualScheduler> {
        HBridgeStepper::new(
            Recorder::default(),
            ManualScheduler::new(),
            heapless::String::try_from("test").unwrap(),
            false,
            step_gap,
            Some(StepInterval::from_ticks(1_000)),
        )
    }

    #[test]
    fn test_full_step_rows() {
        let motor = motor(2);
        motor.move_by(4).unwrap();
        while motor.is_moving() {
            motor.on_step();
        }

        let (lines, scheduler) = motor.release();
        let expected: [[bool; 4]; 4] = [0, 2, 4, 6].map(commutation::levels);
        assert_eq!(lines.rows.as_slice(), &expected);
        assert_eq!(scheduler.arm_count(), 4);
    }

    #[test]
    fn test_first_step_is_immediate() {
        let motor = motor(2);
        motor.move_by(2).unwrap();
        assert_eq!(
            motor.with_scheduler(|s| s.pending()),
            Some(StepInterval::from_ticks(0))
        );

        motor.on_step();
        assert_eq!(
            motor.with_scheduler(|s| s.pending()),
            Some(StepInterval::from_ticks(1_000))
        );
    }

    #[test]
    fn test_stale_expiry_after_stop() {
        let motor = motor(1);
        motor.run(Direction::Positive).unwrap();
        motor.stop().unwrap();
        motor.on_step();

        assert_eq!(motor.actual_position(), 0);
        assert_eq!(motor.with_lines(|l| l.writes), 0);
    }

    #[test]
    fn test_disable_without_line() {
        let motor = motor(2);
        assert_eq!(
            motor.disable(),
            Err(crate::Error::Motor(MotorError::NotSupported))
        );
    }
}
