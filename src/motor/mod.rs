//! Motor module for hbridge-stepper.
//!
//! Provides the H-bridge stepper driver, its commutation table, control-line
//! abstraction and position tracking.

mod builder;
pub mod commutation;
mod driver;
mod lines;
mod position;
mod state;

pub use builder::HBridgeStepperBuilder;
pub use driver::{EventCallback, HBridgeStepper};
pub use lines::{ControlLines, GpioLines, NoEnable};
pub use position::Position;
pub use state::{Direction, MotorStatus, RunMode, StepperEvent};
