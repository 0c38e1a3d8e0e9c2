//! Shared test fixtures.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use hbridge_stepper::error::MotorError;
use hbridge_stepper::{
    ControlLines, EventCallback, HBridgeStepper, ManualScheduler, StepInterval, StepScheduler,
    StepperEvent,
};

/// Control lines that remember every row driven.
#[derive(Debug, Default)]
pub struct Recorder {
    pub rows: Vec<[bool; 4]>,
    pub writes: usize,
    pub enabled: Option<bool>,
    pub with_enable: bool,
    pub fail_writes: bool,
    current: [bool; 4],
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enable() -> Self {
        Self {
            with_enable: true,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }
}

impl ControlLines for Recorder {
    fn set_line(&mut self, index: usize, level: bool) -> Result<(), MotorError> {
        self.writes += 1;
        self.current[index] = level;
        if index == 3 {
            self.rows.push(self.current);
        }
        if self.fail_writes {
            return Err(MotorError::PinError);
        }
        Ok(())
    }

    fn set_enable(&mut self, level: bool) -> Result<(), MotorError> {
        if !self.with_enable {
            return Err(MotorError::NotSupported);
        }
        self.enabled = Some(level);
        Ok(())
    }

    fn has_enable(&self) -> bool {
        self.with_enable
    }
}

pub type TestMotor = HBridgeStepper<Recorder, ManualScheduler>;

pub const INTERVAL: StepInterval = StepInterval::from_ticks(1_000);

static EVENTS: Mutex<Vec<(usize, StepperEvent)>> = Mutex::new(Vec::new());
static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

fn record<L: ControlLines, S: StepScheduler>(
    _motor: &HBridgeStepper<L, S>,
    event: StepperEvent,
    id: usize,
) {
    EVENTS.lock().unwrap().push((id, event));
}

/// Register the recording callback under a fresh id.
pub fn watch<L: ControlLines, S: StepScheduler>(motor: &HBridgeStepper<L, S>) -> usize {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    motor.set_event_callback(Some(record::<L, S> as EventCallback<L, S>), id);
    id
}

/// Events recorded for `id`, in order.
pub fn events(id: usize) -> Vec<StepperEvent> {
    EVENTS
        .lock()
        .unwrap()
        .iter()
        .filter(|(i, _)| *i == id)
        .map(|(_, e)| *e)
        .collect()
}

/// Motor with a recording line set, manual scheduler and 1 µs interval.
pub fn motor(microsteps: hbridge_stepper::Microsteps, invert: bool) -> TestMotor {
    HBridgeStepper::builder()
        .lines(Recorder::new())
        .scheduler(ManualScheduler::new())
        .microsteps(microsteps)
        .invert_direction(invert)
        .step_interval(INTERVAL)
        .build()
        .unwrap()
}

/// Fire armed steps until the motor goes idle or `limit` steps ran.
pub fn run_until_idle<L: ControlLines, S: StepScheduler>(
    motor: &HBridgeStepper<L, S>,
    limit: usize,
) -> usize {
    let mut fired = 0;
    while motor.is_moving() && fired < limit {
        motor.on_step();
        fired += 1;
    }
    fired
}
