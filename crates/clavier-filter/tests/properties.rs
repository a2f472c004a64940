//! Property-based tests for the filter voice.
//!
//! Uses proptest to check the note and velocity mappings and that the voice
//! stays stable for any parameter setting and note sequence.

use clavier_core::{Effect, ParameterInfo};
use clavier_filter::{
    FilterMode, Filterclavier, MAX_GAIN, MIN_GAIN, MidiTarget, PARAM_DETUNE, PARAM_MAX_RESONANCE,
    PARAM_MODE, PARAM_TRANSPOSE, compensated_gain, note_to_hz, velocity_to_resonance,
};
use proptest::prelude::*;

const SR: f32 = 48000.0;
const MIN_RES: f32 = 0.707;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Higher notes map to strictly higher cutoffs for any fixed offset.
    #[test]
    fn note_to_hz_is_monotonic(
        note in 0u8..127,
        transpose in -48i32..=48,
        detune in -100.0f32..=100.0,
    ) {
        let t = transpose as f32;
        let low = note_to_hz(f32::from(note) + t, detune);
        let high = note_to_hz(f32::from(note) + 1.0 + t, detune);
        prop_assert!(high > low);
    }

    /// Twelve semitones up doubles the frequency.
    #[test]
    fn octave_law(note in -49.0f32..=175.0) {
        let ratio = note_to_hz(note + 12.0, 0.0) / note_to_hz(note, 0.0);
        prop_assert!((ratio - 2.0).abs() < 1e-4);
    }

    /// Resonance stays inside its declared span for every velocity.
    #[test]
    fn resonance_bounded(velocity in 0u8..=127, max_res in MIN_RES..=32.0f32) {
        let q = velocity_to_resonance(velocity, max_res, MIN_RES);
        prop_assert!(q >= MIN_RES);
        prop_assert!(q <= max_res + 0.001 + 1e-5);
    }

    /// Gain never leaves [1, 32], and only bandpass modes boost.
    #[test]
    fn gain_bounded(velocity in 0u8..=255, mode_idx in 0usize..FilterMode::COUNT) {
        let mode = FilterMode::ALL[mode_idx];
        let gain = compensated_gain(Some(mode), velocity);
        prop_assert!((MIN_GAIN..=MAX_GAIN).contains(&gain));
        if !mode.is_bandpass() {
            prop_assert_eq!(gain, 1.0);
        }
    }

    /// Any valid parameter setting and note sequence yields finite output.
    #[test]
    fn voice_output_finite(
        input in prop::collection::vec(-1.0f32..=1.0, 64..512),
        notes in prop::collection::vec((0u8..=127, 0u8..=127, any::<bool>()), 1..8),
        mode_idx in 0usize..FilterMode::COUNT,
        transpose in -48.0f32..=48.0,
        detune in -100.0f32..=100.0,
        max_res in MIN_RES..=32.0f32,
    ) {
        let mut voice = Filterclavier::new(SR);
        voice.set_param(PARAM_MODE, mode_idx as f32);
        voice.set_param(PARAM_TRANSPOSE, transpose);
        voice.set_param(PARAM_DETUNE, detune);
        voice.set_param(PARAM_MAX_RESONANCE, max_res);
        voice.activate();

        let mut buffer = input.clone();
        for &(note, velocity, release) in &notes {
            voice.note_on(note, velocity);
            voice.process_block_inplace(&mut buffer);
            if release {
                voice.note_off(note, 0);
            }
            prop_assert!(buffer.iter().all(|s| s.is_finite()));
            buffer.copy_from_slice(&input);
        }
    }

    /// Any raw mode value, valid or not, keeps the voice usable.
    #[test]
    fn raw_mode_never_breaks_voice(raw in prop::num::f32::ANY) {
        let mut voice = Filterclavier::new(SR);
        voice.activate();
        voice.params_mut().mode = raw;
        voice.note_on(60, 127);

        let gain = voice.core().gain().get();
        prop_assert!((MIN_GAIN..=MAX_GAIN).contains(&gain));
        if FilterMode::from_param(raw).is_none() {
            prop_assert_eq!(gain, MIN_GAIN);
            prop_assert_eq!(voice.invalid_mode_events(), 1);
        }

        let mut buffer = [0.5f32; 256];
        voice.process_block_inplace(&mut buffer);
        prop_assert!(buffer.iter().all(|s| s.is_finite()));
    }
}
