//! The MIDI-controlled filter voice.
//!
//! [`Filterclavier`] plays a resonant filter like a keyboard: the held note
//! sets the cutoff, the attack velocity sets resonance and (in bandpass
//! modes) output gain. It is monophonic and last-note-wins: a new note-on
//! replaces whatever was held, and a note-off only releases the note that is
//! currently held.
//!
//! ## Parameter Indices (`ParameterInfo`)
//!
//! | Index | Name | Range | Default |
//! |-------|------|-------|---------|
//! | 0 | Transpose | −48–48 st | 0 |
//! | 1 | Detune | −100–100 ct | 0 |
//! | 2 | Max. Resonance | 0.707–32 | 32 |
//! | 3 | Mode | 0–11 | 6 (6dB/oct Bandpass) |
//! | 4 | Portamento | 1–2000 ms | 20 |
//!
//! # Example
//!
//! ```rust
//! use clavier_core::Effect;
//! use clavier_filter::{Filterclavier, MidiTarget, VoiceState};
//!
//! let mut voice = Filterclavier::new(48000.0);
//! voice.activate();
//!
//! voice.note_on(69, 127);
//! assert_eq!(voice.state(), VoiceState::Sounding { note: 69, velocity: 127 });
//! assert_eq!(voice.core().gain().get(), 32.0);
//!
//! let mut block = [0.0f32; 256];
//! voice.process_block_inplace(&mut block);
//!
//! voice.note_off(69, 0);
//! assert_eq!(voice.state(), VoiceState::Idle);
//! assert_eq!(voice.core().gain().get(), 1.0);
//! ```

use clavier_core::{Effect, ParamDescriptor, ParamId, ParamUnit, ParameterInfo};

use crate::filter_core::InertiaFilterCore;
use crate::gain::{MIN_GAIN, compensated_gain};
use crate::mapping::{note_to_hz, velocity_to_resonance};
use crate::midi::MidiTarget;
use crate::mode::FilterMode;

/// Transpose parameter index.
pub const PARAM_TRANSPOSE: usize = 0;
/// Detune parameter index.
pub const PARAM_DETUNE: usize = 1;
/// Max-resonance parameter index.
pub const PARAM_MAX_RESONANCE: usize = 2;
/// Mode parameter index. The response graph hangs off this index.
pub const PARAM_MODE: usize = 3;
/// Portamento (inertia) parameter index.
pub const PARAM_INERTIA: usize = 4;

/// Host-facing parameter table.
pub const PARAMS: [ParamDescriptor; 5] = [
    ParamDescriptor::stepped("Transpose", "Transp", ParamUnit::Semitones, -48.0, 48.0, 0.0)
        .with_id(ParamId(100), "fcl_transpose"),
    ParamDescriptor::stepped("Detune", "Detune", ParamUnit::Cents, -100.0, 100.0, 0.0)
        .with_id(ParamId(101), "fcl_detune"),
    ParamDescriptor::new("Max. Resonance", "MaxRes", ParamUnit::Coefficient, 0.707, 32.0, 32.0)
        .with_id(ParamId(102), "fcl_max_res"),
    ParamDescriptor::stepped(
        "Mode",
        "Mode",
        ParamUnit::Enum,
        0.0,
        (FilterMode::COUNT - 1) as f32,
        FilterMode::Bp6.as_param(),
    )
    .with_id(ParamId(103), "fcl_mode"),
    ParamDescriptor::new("Portamento", "Porta", ParamUnit::Milliseconds, 1.0, 2000.0, 20.0)
        .with_id(ParamId(104), "fcl_inertia"),
];

/// Raw host parameter values.
///
/// Fields hold whatever the host wrote, unclamped; [`ParameterInfo::set_param`]
/// on the voice is the clamped path. The mode is kept as the raw float and
/// decoded by [`mode`](Self::mode).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterclavierParams {
    /// Semitones added to the note
    pub transpose: f32,
    /// Cents added to the note
    pub detune: f32,
    /// Resonance at full velocity
    pub max_resonance: f32,
    /// Raw mode value
    pub mode: f32,
    /// Ramp time of the inertia channels in milliseconds
    pub inertia_ms: f32,
}

impl FilterclavierParams {
    /// Typed view of the raw mode value, `None` when it does not decode.
    pub fn mode(&self) -> Option<FilterMode> {
        FilterMode::from_param(self.mode)
    }

    /// Ramp length in one-millisecond ticks.
    pub fn inertia_ticks(&self) -> u32 {
        if self.inertia_ms.is_finite() && self.inertia_ms > 0.0 {
            libm::rintf(self.inertia_ms) as u32
        } else {
            0
        }
    }
}

impl Default for FilterclavierParams {
    fn default() -> Self {
        Self {
            transpose: PARAMS[PARAM_TRANSPOSE].default,
            detune: PARAMS[PARAM_DETUNE].default,
            max_resonance: PARAMS[PARAM_MAX_RESONANCE].default,
            mode: PARAMS[PARAM_MODE].default,
            inertia_ms: PARAMS[PARAM_INERTIA].default,
        }
    }
}

/// Whether a note is currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceState {
    /// No note held.
    #[default]
    Idle,
    /// A note is held and its targets are live.
    Sounding {
        /// Held note
        note: u8,
        /// Its attack velocity
        velocity: u8,
    },
}

/// MIDI-controlled resonant filter voice.
#[derive(Debug, Clone)]
pub struct Filterclavier {
    core: InertiaFilterCore,
    params: FilterclavierParams,
    /// Most recent note-on, kept after release
    last_note: Option<u8>,
    /// Velocity driving resonance and gain; 0 after release
    last_velocity: Option<u8>,
    state: VoiceState,
    invalid_mode_events: u32,
}

impl Filterclavier {
    /// Create an inactive voice at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        let params = FilterclavierParams::default();
        let mut core = InertiaFilterCore::new(sample_rate);
        core.set_inertia_ticks(params.inertia_ticks());
        Self {
            core,
            params,
            last_note: None,
            last_velocity: None,
            state: VoiceState::Idle,
            invalid_mode_events: 0,
        }
    }

    /// The filter core, read-only.
    pub fn core(&self) -> &InertiaFilterCore {
        &self.core
    }

    /// Current raw parameter values.
    pub fn params(&self) -> &FilterclavierParams {
        &self.params
    }

    /// Raw parameter values, as a host writes them.
    ///
    /// Nothing is recomputed until [`params_changed`](Self::params_changed).
    pub fn params_mut(&mut self) -> &mut FilterclavierParams {
        &mut self.params
    }

    /// Most recent note-on, or `None` before the first one.
    pub fn last_note(&self) -> Option<u8> {
        self.last_note
    }

    /// Velocity of the most recent note-on, `Some(0)` after its release,
    /// or `None` before the first note.
    pub fn last_velocity(&self) -> Option<u8> {
        self.last_velocity
    }

    /// Whether a note is held.
    pub fn state(&self) -> VoiceState {
        self.state
    }

    /// Number of times an undecodable mode value reached the gain policy.
    pub fn invalid_mode_events(&self) -> u32 {
        self.invalid_mode_events
    }

    /// Declared floor of the resonance range.
    pub fn min_resonance(&self) -> f32 {
        PARAMS[PARAM_MAX_RESONANCE].min
    }

    /// Re-derive cutoff, resonance and gain from the stored note and velocity
    /// and the current parameter values, then recalculate.
    ///
    /// Before any note-on the cutoff is computed for note −1 plus transpose;
    /// velocity counts as 0.
    pub fn params_changed(&mut self) {
        self.core.set_inertia_ticks(self.params.inertia_ticks());

        let note = self.last_note.map_or(-1.0, f32::from);
        let velocity = self.last_velocity.unwrap_or(0);
        let mode = self.decode_mode();

        self.retarget(note, velocity, mode);
    }

    /// Initialise run-time state before audio starts.
    pub fn activate(&mut self) {
        self.params_changed();
        self.core.activate();
    }

    /// Stop audio processing.
    pub fn deactivate(&mut self) {
        self.core.deactivate();
    }

    /// Change the sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.core.set_sample_rate(sample_rate);
    }

    fn decode_mode(&mut self) -> Option<FilterMode> {
        let mode = self.params.mode();
        if mode.is_none() {
            self.invalid_mode_events = self.invalid_mode_events.saturating_add(1);
            #[cfg(feature = "tracing")]
            tracing::debug!(
                raw = self.params.mode,
                count = self.invalid_mode_events,
                "undecodable filter mode, gain pinned to unity"
            );
        }
        mode
    }

    fn retarget(&mut self, note: f32, velocity: u8, mode: Option<FilterMode>) {
        let cutoff = note_to_hz(note + self.params.transpose, self.params.detune);
        self.core.cutoff_mut().set_inertia(cutoff);

        let resonance =
            velocity_to_resonance(velocity, self.params.max_resonance, self.min_resonance());
        self.core.resonance_mut().set_inertia(resonance);

        self.core.gain_mut().set_now(compensated_gain(mode, velocity));

        self.recalculate(mode);
    }

    fn recalculate(&mut self, mode: Option<FilterMode>) {
        let mode = mode.unwrap_or(self.core.mode());
        self.core.calculate_filter(mode);
    }
}

impl Default for Filterclavier {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl MidiTarget for Filterclavier {
    fn note_on(&mut self, note: u8, velocity: u8) {
        let velocity = velocity.min(127);
        self.last_note = Some(note);
        self.last_velocity = Some(velocity);
        self.state = VoiceState::Sounding { note, velocity };

        let mode = self.decode_mode();
        self.retarget(f32::from(note), velocity, mode);
    }

    fn note_off(&mut self, note: u8, _velocity: u8) {
        if self.last_note != Some(note) {
            return;
        }

        let floor = self.min_resonance();
        self.core.resonance_mut().set_inertia(floor);
        self.core.gain_mut().set_now(MIN_GAIN);
        self.last_velocity = Some(0);
        self.state = VoiceState::Idle;

        // Release pins gain to unity in every mode, so a bad mode is not counted here.
        self.recalculate(self.params.mode());
    }
}

impl Effect for Filterclavier {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.core.process(input)
    }

    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        self.core.process_stereo(left, right)
    }

    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(
            input.len(),
            output.len(),
            "Input and output buffers must have same length"
        );
        let len = input.len().min(output.len());
        output[..len].copy_from_slice(&input[..len]);
        self.core.process_block(&mut output[..len]);
    }

    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        self.core.process_block(buffer);
    }

    fn process_block_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.core.process_block_stereo(left, right);
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        Filterclavier::set_sample_rate(self, sample_rate);
    }

    fn reset(&mut self) {
        self.core.reset();
    }
}

impl ParameterInfo for Filterclavier {
    fn param_count(&self) -> usize {
        PARAMS.len()
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        PARAMS.get(index).copied()
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            PARAM_TRANSPOSE => self.params.transpose,
            PARAM_DETUNE => self.params.detune,
            PARAM_MAX_RESONANCE => self.params.max_resonance,
            PARAM_MODE => self.params.mode,
            PARAM_INERTIA => self.params.inertia_ms,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        let Some(desc) = PARAMS.get(index) else {
            return;
        };
        if !value.is_finite() {
            return;
        }
        let value = desc.clamp(value);
        match index {
            PARAM_TRANSPOSE => self.params.transpose = value,
            PARAM_DETUNE => self.params.detune = value,
            PARAM_MAX_RESONANCE => self.params.max_resonance = value,
            PARAM_MODE => self.params.mode = value,
            PARAM_INERTIA => self.params.inertia_ms = value,
            _ => return,
        }
        self.params_changed();
    }
}
