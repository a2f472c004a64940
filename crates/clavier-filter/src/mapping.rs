//! Note and velocity mappings.
//!
//! Pure `f32` functions evaluated with `libm`, so the audio path and any
//! display of the cutoff compute bit-identical values for the same inputs.

/// Highest MIDI velocity.
pub const MAX_VELOCITY: u8 = 127;

/// Added to the resonance span before scaling by velocity.
///
/// Keeps the velocity multiplier's span strictly positive when the
/// max-resonance control sits at its minimum, so the resonance channel is
/// never pinned to a single value across note-on and note-off.
pub const RESONANCE_EPSILON: f32 = 0.001;

/// Convert a (possibly fractional) MIDI note plus detune to Hz.
///
/// Equal temperament, A4 (note 69) = 440 Hz.
///
/// # Arguments
/// * `semitone` - MIDI note number, transposition already added
/// * `detune_cents` - Fine offset in cents (100 cents = 1 semitone)
///
/// ```rust
/// use clavier_filter::note_to_hz;
///
/// assert!((note_to_hz(69.0, 0.0) - 440.0).abs() < 1e-3);
/// assert!((note_to_hz(57.0, 0.0) - 220.0).abs() < 1e-3);
/// assert!((note_to_hz(69.0, 100.0) - note_to_hz(70.0, 0.0)).abs() < 1e-3);
/// ```
#[inline]
pub fn note_to_hz(semitone: f32, detune_cents: f32) -> f32 {
    440.0 * libm::exp2f((semitone - 69.0 + detune_cents / 100.0) / 12.0)
}

/// Velocity as a fraction of the full MIDI range.
#[inline]
pub fn velocity_fraction(velocity: u8) -> f32 {
    f32::from(velocity.min(MAX_VELOCITY)) / f32::from(MAX_VELOCITY)
}

/// Map velocity onto the resonance range.
///
/// `(v / 127) * (max_resonance - min_resonance + ε) + min_resonance`, with
/// `ε =` [`RESONANCE_EPSILON`]. Velocity 0 gives exactly `min_resonance`, and
/// the result never drops below it, even for a `max_resonance` under the floor.
///
/// # Arguments
/// * `velocity` - MIDI velocity, clamped to 127
/// * `max_resonance` - Current max-resonance control value
/// * `min_resonance` - Declared minimum of the max-resonance control
#[inline]
pub fn velocity_to_resonance(velocity: u8, max_resonance: f32, min_resonance: f32) -> f32 {
    let span = max_resonance - min_resonance + RESONANCE_EPSILON;
    (velocity_fraction(velocity) * span + min_resonance).max(min_resonance)
}
