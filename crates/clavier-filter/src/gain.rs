//! Velocity-to-gain compensation per filter mode.
//!
//! Bandpass cascades lose loudness as their slope steepens, so each bandpass
//! mode gets its own velocity-driven gain ceiling. Every other mode runs at
//! unity gain regardless of velocity.
//!
//! | mode | gain at velocity 127 |
//! |---|---|
//! | `Bp6` | `MAX_GAIN` (32) |
//! | `Bp12` | `MAX_GAIN / 6.0` |
//! | `Bp18` | `MAX_GAIN / 10.5` |
//! | other | `MIN_GAIN` (1) |
//!
//! Each cascade stage carries this gain (see
//! [`InertiaFilterCore::calculate_filter`](crate::InertiaFilterCore::calculate_filter)),
//! so the divisors bring all three bandpass slopes to a similar overall boost.

use crate::mapping::velocity_fraction;
use crate::mode::FilterMode;

/// Gain with no boost.
pub const MIN_GAIN: f32 = 1.0;

/// Gain ceiling of the 6 dB bandpass.
pub const MAX_GAIN: f32 = 32.0;

/// Ceiling divisor for the 12 dB bandpass.
pub const BP12_GAIN_DIVISOR: f32 = 6.0;

/// Ceiling divisor for the 18 dB bandpass.
pub const BP18_GAIN_DIVISOR: f32 = 10.5;

/// Gain reached at full velocity in `mode`.
pub fn mode_max_gain(mode: FilterMode) -> f32 {
    match mode {
        FilterMode::Bp6 => MAX_GAIN,
        FilterMode::Bp12 => MAX_GAIN / BP12_GAIN_DIVISOR,
        FilterMode::Bp18 => MAX_GAIN / BP18_GAIN_DIVISOR,
        _ => MIN_GAIN,
    }
}

/// Instantaneous gain for `velocity` in `mode`.
///
/// Bandpass modes ramp linearly from [`MIN_GAIN`] at velocity 0 to
/// [`mode_max_gain`] at 127. Other modes, and an undecodable mode (`None`),
/// return exactly [`MIN_GAIN`].
///
/// ```rust
/// use clavier_filter::{FilterMode, compensated_gain};
///
/// assert_eq!(compensated_gain(Some(FilterMode::Bp6), 127), 32.0);
/// assert_eq!(compensated_gain(Some(FilterMode::Lp24), 127), 1.0);
/// assert_eq!(compensated_gain(None, 127), 1.0);
/// ```
pub fn compensated_gain(mode: Option<FilterMode>, velocity: u8) -> f32 {
    match mode {
        Some(mode) if mode.is_bandpass() => {
            velocity_fraction(velocity) * (mode_max_gain(mode) - MIN_GAIN) + MIN_GAIN
        }
        _ => MIN_GAIN,
    }
}
