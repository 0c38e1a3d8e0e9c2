//! Basic motor control example.
//!
//! Builds a half-stepping motor over mock pins, runs a relative move, a
//! velocity run and a return to home, servicing the manual scheduler from the
//! main loop the way a timer interrupt would.

use std::cell::Cell;
use std::rc::Rc;

use hbridge_stepper::{
    Direction, EventCallback, GpioLines, HBridgeStepper, ManualScheduler, Microsteps,
    StepInterval, StepperEvent,
};

/// Mock output pin for demonstration. Clones share the level.
#[derive(Clone)]
struct MockPin {
    state: Rc<Cell<bool>>,
}

impl MockPin {
    fn new() -> Self {
        Self {
            state: Rc::new(Cell::new(false)),
        }
    }

    fn level(&self) -> u8 {
        u8::from(self.state.get())
    }
}

impl embedded_hal::digital::OutputPin for MockPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.state.set(true);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.state.set(false);
        Ok(())
    }
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = core::convert::Infallible;
}

type DemoMotor = HBridgeStepper<GpioLines<MockPin, MockPin>, ManualScheduler>;

fn on_event(motor: &DemoMotor, event: StepperEvent, _user_data: usize) {
    println!("  [{}] {:?} at {}", motor.name(), event, motor.actual_position());
}

/// Fire armed steps until the motor is idle or `max_steps` have run.
fn service(motor: &DemoMotor, probes: &[MockPin; 4], max_steps: usize) {
    let mut fired = 0;
    while fired < max_steps {
        let Some(delay) = motor.with_scheduler(|s| s.pending()) else {
            break;
        };
        std::thread::sleep(std::time::Duration::from_nanos(delay.ticks()));
        motor.on_step();
        fired += 1;

        let levels: Vec<u8> = probes.iter().map(MockPin::level).collect();
        println!(
            "  position {:>3}: lines {:?} next phase {}",
            motor.actual_position(),
            levels,
            motor.status().phase_index
        );
    }
}

fn main() {
    println!("=== Basic Motor Control Example ===\n");

    let pins = [MockPin::new(), MockPin::new(), MockPin::new(), MockPin::new()];
    let probes = pins.clone();
    let lines = GpioLines::new(pins).with_enable(MockPin::new());

    let motor: DemoMotor = HBridgeStepper::builder()
        .name("demo_motor")
        .lines(lines)
        .scheduler(ManualScheduler::new())
        .microsteps(Microsteps::HALF)
        .step_interval(StepInterval::millis(2))
        .build()
        .expect("Failed to build motor");

    motor.set_event_callback(Some(on_event as EventCallback<_, _>), 0);
    motor.enable().expect("Failed to enable driver");

    println!("Motor created: {}", motor.name());
    println!("Resolution: 1/{}", motor.micro_step_res().value());
    println!("Initial position: {} steps\n", motor.actual_position());

    println!("Relative move of +6 half steps:");
    motor.move_by(6).expect("Failed to start move");
    service(&motor, &probes, 100);

    println!("\nVelocity run backwards, stopped after 4 steps:");
    motor.run(Direction::Negative).expect("Failed to start run");
    service(&motor, &probes, 4);
    motor.stop().expect("Failed to stop");

    println!("\nSwitch to full steps and return home:");
    motor
        .set_micro_step_res(Microsteps::FULL)
        .expect("Failed to change resolution");
    motor.move_to(0).expect("Failed to start move");
    service(&motor, &probes, 100);

    motor.disable().expect("Failed to disable driver");
    println!("\nFinal status: {:?}", motor.status());
    println!("=== Example Complete ===");
}
