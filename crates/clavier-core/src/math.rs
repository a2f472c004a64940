//! Mathematical utility functions for DSP.
//!
//! Allocation-free helpers shared by the filter core and the response graph.

use libm::{expf, logf};

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use clavier_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// # Example
/// ```rust
/// use clavier_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Map a linear amplitude onto the response-graph vertical axis.
///
/// One graph unit spans a factor of 256 (about 48 dB); unity gain sits at
/// 0.4.
#[inline]
pub fn amplitude_to_graph(amplitude: f32) -> f32 {
    const INV_LN_256: f32 = 1.0 / (8.0 * core::f32::consts::LN_2);
    logf(amplitude.max(1e-10)) * INV_LN_256 + 0.4
}

/// Samples per millisecond, never less than one.
#[inline]
pub fn samples_per_ms(sample_rate: f32) -> u32 {
    let samples = (sample_rate / 1000.0) as u32;
    samples.max(1)
}

/// Flush denormals to zero.
///
/// Replaces values below 1e-20 with zero so that decaying filter tails never
/// reach the IEEE 754 subnormal range.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}
