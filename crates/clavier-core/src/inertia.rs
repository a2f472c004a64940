//! Inertia parameters: values that ramp toward a target in fixed steps.
//!
//! An [`Inertia`] holds the value the DSP reads (`get`) and the value it is
//! heading for (`target`). The owner decides how often a step happens; the
//! filter core steps once per millisecond of audio, so a ramp length of 20
//! means "reach the target in 20 ms".
//!
//! ## Write styles
//!
//! - [`Inertia::set_inertia`] schedules a ramp of `length` steps
//! - [`Inertia::set_now`] snaps immediately and cancels any ramp
//!
//! ## Usage
//!
//! ```rust
//! use clavier_core::Inertia;
//!
//! let mut cutoff = Inertia::new(20.0, 4);
//! cutoff.set_inertia(320.0);
//!
//! // Geometric ramp: 20 -> 40 -> 80 -> 160 -> 320
//! for _ in 0..4 {
//!     cutoff.step();
//! }
//! assert_eq!(cutoff.get(), 320.0);
//! assert!(!cutoff.is_active());
//! ```

use libm::powf;

/// A value that ramps toward its target over a fixed number of steps.
///
/// Ramps between two strictly positive values are geometric (constant ratio
/// per step), which sounds even for frequencies and gains. Any ramp touching
/// zero or a negative value is linear.
#[derive(Debug, Clone)]
pub struct Inertia {
    /// Value read by the DSP
    value: f32,
    /// Value being ramped toward
    target: f32,
    /// Steps per ramp
    length: u32,
    /// Steps left in the running ramp
    remaining: u32,
    /// Per-step ratio (geometric) or increment (linear)
    delta: f32,
    geometric: bool,
}

impl Inertia {
    /// Create an inertia parameter resting at `initial`.
    ///
    /// # Arguments
    /// * `initial` - Starting value and target
    /// * `length` - Ramp length in steps (0 = no smoothing)
    pub fn new(initial: f32, length: u32) -> Self {
        Self {
            value: initial,
            target: initial,
            length,
            remaining: 0,
            delta: 0.0,
            geometric: false,
        }
    }

    /// Schedule a ramp from the current value toward `target`.
    ///
    /// Setting the target it already has is a no-op, so a running ramp keeps
    /// its pace. With a zero ramp length the value snaps.
    pub fn set_inertia(&mut self, target: f32) {
        if target == self.target {
            return;
        }
        self.target = target;

        if self.length == 0 {
            self.value = target;
            self.remaining = 0;
            return;
        }

        let steps = self.length as f32;
        self.geometric = self.value > 0.0 && target > 0.0;
        self.delta = if self.geometric {
            powf(target / self.value, 1.0 / steps)
        } else {
            (target - self.value) / steps
        };
        self.remaining = self.length;
    }

    /// Set value and target immediately, cancelling any ramp.
    #[inline]
    pub fn set_now(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.remaining = 0;
    }

    /// Advance the ramp by one step and return the new value.
    ///
    /// The final step lands exactly on the target.
    #[inline]
    pub fn step(&mut self) -> f32 {
        if self.remaining > 0 {
            self.remaining -= 1;
            if self.remaining == 0 {
                self.value = self.target;
            } else if self.geometric {
                self.value *= self.delta;
            } else {
                self.value += self.delta;
            }
        }
        self.value
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> f32 {
        self.value
    }

    /// Target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Whether a ramp is in progress.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    /// Ramp length in steps.
    #[inline]
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Change the ramp length. A running ramp finishes at its old pace.
    pub fn set_length(&mut self, length: u32) {
        self.length = length;
    }
}

impl Default for Inertia {
    fn default() -> Self {
        Self::new(0.0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_length_snaps() {
        let mut param = Inertia::new(1.0, 0);
        param.set_inertia(5.0);
        assert_eq!(param.get(), 5.0);
        assert!(!param.is_active());
    }

    #[test]
    fn ramp_takes_exactly_length_steps() {
        let mut param = Inertia::new(100.0, 20);
        param.set_inertia(1000.0);

        for i in 0..19 {
            param.step();
            assert!(param.is_active(), "still ramping after step {i}");
            assert!(param.get() > 100.0 && param.get() < 1000.0);
        }
        param.step();
        assert_eq!(param.get(), 1000.0);
        assert!(!param.is_active());
    }

    #[test]
    fn geometric_ramp_has_constant_ratio() {
        let mut param = Inertia::new(10.0, 3);
        param.set_inertia(80.0);

        let a = param.step();
        let b = param.step();
        assert!((a - 20.0).abs() < 1e-3, "got {a}");
        assert!((b - 40.0).abs() < 1e-3, "got {b}");
        assert_eq!(param.step(), 80.0);
    }

    #[test]
    fn ramp_through_zero_is_linear() {
        let mut param = Inertia::new(-1.0, 4);
        param.set_inertia(1.0);

        assert!((param.step() - -0.5).abs() < 1e-6);
        assert!((param.step() - 0.0).abs() < 1e-6);
        assert!((param.step() - 0.5).abs() < 1e-6);
        assert_eq!(param.step(), 1.0);
    }

    #[test]
    fn set_now_cancels_ramp() {
        let mut param = Inertia::new(1.0, 10);
        param.set_inertia(32.0);
        param.step();

        param.set_now(1.0);
        assert_eq!(param.get(), 1.0);
        assert_eq!(param.target(), 1.0);
        assert!(!param.is_active());
    }

    #[test]
    fn same_target_keeps_running_ramp() {
        let mut param = Inertia::new(1.0, 4);
        param.set_inertia(2.0);
        param.step();
        param.step();

        param.set_inertia(2.0);
        param.step();
        param.step();
        assert_eq!(param.get(), 2.0);
        assert!(!param.is_active());
    }

    #[test]
    fn retarget_mid_ramp_starts_from_current_value() {
        let mut param = Inertia::new(0.0, 2);
        param.set_inertia(2.0);
        param.step(); // 1.0

        param.set_inertia(0.0);
        assert!((param.step() - 0.5).abs() < 1e-6);
        assert_eq!(param.step(), 0.0);
    }

    #[test]
    fn set_length_applies_to_next_ramp() {
        let mut param = Inertia::new(1.0, 2);
        param.set_inertia(4.0);
        param.set_length(8);
        param.step();
        assert_eq!(param.step(), 4.0);

        param.set_inertia(1.0);
        for _ in 0..7 {
            param.step();
        }
        assert!(param.is_active());
        assert_eq!(param.step(), 1.0);
    }
}
