//! Half-step commutation table for 4-wire H-bridge steppers.
//!
//! One electrical cycle is eight rows. Even rows energise two coils (the
//! full-step sequence), odd rows energise one (the in-between half steps).

use crate::config::units::Microsteps;

/// Number of control lines driven by the table.
pub const NUM_CONTROL_LINES: usize = 4;

/// Number of rows in one electrical cycle.
pub const CYCLE_LEN: u8 = 8;

const HALF_STEP_TABLE: [[bool; NUM_CONTROL_LINES]; CYCLE_LEN as usize] = [
    [true, true, false, false],
    [false, true, false, false],
    [false, true, true, false],
    [false, false, true, false],
    [false, false, true, true],
    [false, false, false, true],
    [true, false, false, true],
    [true, false, false, false],
];

/// Line levels for a given phase index.
///
/// `phase` must be in `0..CYCLE_LEN`.
#[inline]
pub fn levels(phase: u8) -> [bool; NUM_CONTROL_LINES] {
    HALF_STEP_TABLE[usize::from(phase)]
}

/// Table stride for a micro-step resolution.
///
/// Returns `None` for resolutions the table cannot produce.
#[inline]
pub fn step_gap(res: Microsteps) -> Option<u8> {
    match res {
        Microsteps::FULL => Some(2),
        Microsteps::HALF => Some(1),
        _ => None,
    }
}

/// Inverse of [`step_gap`].
#[inline]
pub fn resolution(step_gap: u8) -> Microsteps {
    if step_gap == 1 {
        Microsteps::HALF
    } else {
        Microsteps::FULL
    }
}

/// Advance a phase index by `gap` rows, wrapping at the end of the cycle.
#[inline]
pub fn next_phase(phase: u8, gap: u8) -> u8 {
    let next = phase + gap;
    if next >= CYCLE_LEN {
        next - CYCLE_LEN
    } else {
        next
    }
}

/// Retreat a phase index by `gap` rows, wrapping at the start of the cycle.
#[inline]
pub fn prev_phase(phase: u8, gap: u8) -> u8 {
    if phase < gap {
        phase + CYCLE_LEN - gap
    } else {
        phase - gap
    }
}
