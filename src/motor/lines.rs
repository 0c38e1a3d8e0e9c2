//! Control and enable lines of the H-bridge.
//!
//! The motion controller only needs "drive line i to a level" and "drive the
//! enable line". [`ControlLines`] is that capability; [`GpioLines`] provides it
//! over embedded-hal output pins.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin, PinState};

use crate::error::MotorError;

use super::commutation::NUM_CONTROL_LINES;

/// Pin driver capability consumed by the stepper.
pub trait ControlLines {
    /// Drive control line `index` (0..4) to `level`.
    fn set_line(&mut self, index: usize, level: bool) -> Result<(), MotorError>;

    /// Drive the enable line.
    ///
    /// Returns `MotorError::NotSupported` if there is no enable line.
    fn set_enable(&mut self, level: bool) -> Result<(), MotorError>;

    /// Whether an enable line is wired.
    fn has_enable(&self) -> bool;

    /// Apply one commutation-table row to all control lines.
    ///
    /// Every line is written even if an earlier one fails; the first error is
    /// returned.
    fn apply(&mut self, levels: [bool; NUM_CONTROL_LINES]) -> Result<(), MotorError> {
        let mut result = Ok(());
        for (index, level) in levels.into_iter().enumerate() {
            if let Err(e) = self.set_line(index, level) {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }
}

/// Placeholder for boards without a driver enable line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnable;

impl ErrorType for NoEnable {
    type Error = Infallible;
}

impl OutputPin for NoEnable {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Four control pins plus an optional enable pin.
///
/// Generic over:
/// - `P`: control pin type (must implement `OutputPin`)
/// - `EN`: enable pin type (defaults to [`NoEnable`])
pub struct GpioLines<P, EN = NoEnable>
where
    P: OutputPin,
    EN: OutputPin,
{
    control: [P; NUM_CONTROL_LINES],
    enable: Option<EN>,
}

impl<P> GpioLines<P, NoEnable>
where
    P: OutputPin,
{
    /// Create lines without an enable pin.
    ///
    /// Pin order matches the commutation-table columns.
    pub fn new(control: [P; NUM_CONTROL_LINES]) -> Self {
        Self {
            control,
            enable: None,
        }
    }

    /// Add an enable pin.
    pub fn with_enable<EN: OutputPin>(self, enable: EN) -> GpioLines<P, EN> {
        GpioLines {
            control: self.control,
            enable: Some(enable),
        }
    }
}

impl<P, EN> GpioLines<P, EN>
where
    P: OutputPin,
    EN: OutputPin,
{
    /// Give back the pins.
    pub fn release(self) -> ([P; NUM_CONTROL_LINES], Option<EN>) {
        (self.control, self.enable)
    }
}

impl<P, EN> ControlLines for GpioLines<P, EN>
where
    P: OutputPin,
    EN: OutputPin,
{
    fn set_line(&mut self, index: usize, level: bool) -> Result<(), MotorError> {
        let pin = self.control.get_mut(index).ok_or(MotorError::InvalidArgument)?;
        pin.set_state(PinState::from(level))
            .map_err(|_| MotorError::PinError)
    }

    fn set_enable(&mut self, level: bool) -> Result<(), MotorError> {
        let pin = self.enable.as_mut().ok_or(MotorError::NotSupported)?;
        pin.set_state(PinState::from(level))
            .map_err(|_| MotorError::PinError)
    }

    fn has_enable(&self) -> bool {
        self.enable.is_some()
    }
}
