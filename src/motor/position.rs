//! Absolute position counter.

/// Absolute step counter.
///
/// Counts one unit per issued step regardless of micro-step resolution, in
/// the caller-visible sign convention. Wraps on overflow, like a hardware
/// position register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    steps: i32,
}

impl Position {
    /// Create a position counter at a specific value.
    #[inline]
    pub const fn at(steps: i32) -> Self {
        Self { steps }
    }

    /// Current position in steps.
    #[inline]
    pub const fn steps(&self) -> i32 {
        self.steps
    }

    /// Overwrite the position.
    #[inline]
    pub fn set(&mut self, steps: i32) {
        self.steps = steps;
    }

    /// Move by one step in the positive direction.
    #[inline]
    pub fn increment(&mut self) {
        self.steps = self.steps.wrapping_add(1);
    }

    /// Move by one step in the negative direction.
    #[inline]
    pub fn decrement(&mut self) {
        self.steps = self.steps.wrapping_sub(1);
    }

    /// Signed distance to a target position.
    #[inline]
    pub fn steps_to(&self, target: i32) -> i32 {
        target.wrapping_sub(self.steps)
    }
}
