//! Runtime state of the motion controller.
//!
//! Plain data plus the transitions the step handler applies to it. Holds no
//! pins and no scheduler, so every transition can be tested on its own.

use crate::config::units::{Microsteps, StepInterval};

use super::commutation;
use super::position::Position;

/// Logical direction of motion, in the caller's sign convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Increasing position.
    #[default]
    Positive,
    /// Decreasing position.
    Negative,
}

impl Direction {
    /// Get direction from a signed step count (zero counts as positive).
    #[inline]
    pub fn from_steps(steps: i32) -> Self {
        if steps >= 0 {
            Direction::Positive
        } else {
            Direction::Negative
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Direction::Positive => 1,
            Direction::Negative => -1,
        }
    }
}

/// What the controller is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunMode {
    /// No step armed.
    #[default]
    Idle,
    /// Counting down a finite number of steps.
    Position,
    /// Stepping until stopped.
    Velocity,
}

/// Events delivered to the registered callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepperEvent {
    /// A position run issued its last step, or `move_by(0)` was requested.
    StepsCompleted,
    /// `stop()` cancelled the sequence.
    Stopped,
}

/// What follows a step that was just issued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum StepOutcome {
    /// Step issued, arm the next one after this interval.
    Rearm(StepInterval),
    /// Step issued and the position run is done.
    Completed,
}

/// Snapshot of the controller state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorStatus {
    /// Current run mode.
    pub run_mode: RunMode,
    /// Direction of the current or last motion.
    pub direction: Direction,
    /// Commutation-table row that the next step will drive.
    pub phase_index: u8,
    /// Signed steps left in a position run.
    pub remaining_steps: i32,
    /// Absolute position in steps.
    pub actual_position: i32,
    /// Configured step interval, if any.
    pub step_interval: Option<StepInterval>,
    /// Current micro-step resolution.
    pub microsteps: Microsteps,
}

#[derive(Debug, Clone)]
pub(crate) struct RuntimeState {
    pub run_mode: RunMode,
    pub direction: Direction,
    pub phase: u8,
    pub step_gap: u8,
    pub remaining_steps: i32,
    pub position: Position,
    pub step_interval: Option<StepInterval>,
}

impl RuntimeState {
    pub fn new(step_gap: u8, step_interval: Option<StepInterval>) -> Self {
        Self {
            run_mode: RunMode::Idle,
            direction: Direction::Positive,
            phase: 0,
            step_gap,
            remaining_steps: 0,
            position: Position::default(),
            step_interval,
        }
    }

    /// Enter position mode for `delta` steps.
    pub fn begin_position(&mut self, delta: i32) {
        self.run_mode = RunMode::Position;
        self.remaining_steps = delta;
        self.direction = Direction::from_steps(delta);
    }

    /// Enter velocity mode.
    pub fn begin_velocity(&mut self, direction: Direction) {
        self.run_mode = RunMode::Velocity;
        self.direction = direction;
    }

    /// Start a step: count it down and return the table row to drive.
    ///
    /// Returns `None` when idle, i.e. the expiry is stale.
    pub fn begin_step(&mut self) -> Option<u8> {
        match self.run_mode {
            RunMode::Idle => None,
            RunMode::Position => {
                self.count_down();
                Some(self.phase)
            }
            RunMode::Velocity => Some(self.phase),
        }
    }

    /// Finish a step whose row has been driven.
    pub fn finish_step(&mut self, invert: bool) -> StepOutcome {
        self.advance(invert);
        self.after_step()
    }

    /// Move `remaining_steps` one unit toward zero.
    pub fn count_down(&mut self) {
        if self.remaining_steps > 0 {
            self.remaining_steps -= 1;
        } else if self.remaining_steps < 0 {
            self.remaining_steps += 1;
        }
    }

    /// Advance phase and position by one step.
    ///
    /// `invert` flips which way the table is walked but not the sign applied
    /// to the position counter.
    pub fn advance(&mut self, invert: bool) {
        let forward = (self.direction == Direction::Positive) != invert;
        self.phase = if forward {
            commutation::next_phase(self.phase, self.step_gap)
        } else {
            commutation::prev_phase(self.phase, self.step_gap)
        };

        match self.direction {
            Direction::Positive => self.position.increment(),
            Direction::Negative => self.position.decrement(),
        }
    }

    /// Decide what follows a step that was just issued.
    pub fn after_step(&mut self) -> StepOutcome {
        match (self.run_mode, self.step_interval) {
            (RunMode::Position, _) if self.remaining_steps == 0 => {
                self.run_mode = RunMode::Idle;
                StepOutcome::Completed
            }
            (_, Some(interval)) => StepOutcome::Rearm(interval),
            // Interval can't be cleared once set; treat as finished
            (_, None) => {
                self.run_mode = RunMode::Idle;
                StepOutcome::Completed
            }
        }
    }

    pub fn status(&self) -> MotorStatus {
        MotorStatus {
            run_mode: self.run_mode,
            direction: self.direction,
            phase_index: self.phase,
            remaining_steps: self.remaining_steps,
            actual_position: self.position.steps(),
            step_interval: self.step_interval,
            microsteps: commutation::resolution(self.step_gap),
        }
    }
}
