//! Clavier Filter - a resonant filter played from a keyboard
//!
//! This crate turns note events into the controls of a stereo biquad cascade:
//!
//! - [`Filterclavier`] - Monophonic, last-note-wins voice: note sets cutoff,
//!   velocity sets resonance and bandpass gain
//! - [`InertiaFilterCore`] - Up to three cascaded biquads per channel with
//!   millisecond-stepped cutoff, resonance and gain ramps
//! - [`FilterMode`] - The twelve response shapes (LP/HP 12–36 dB, BP and BR
//!   6–18 dB)
//! - [`LineGraphProvider`] - Magnitude-response plot and gridlines
//!
//! ## Example
//!
//! ```rust
//! use clavier_core::{Effect, ParameterInfo};
//! use clavier_filter::{FilterMode, Filterclavier, MidiTarget, PARAM_MODE};
//!
//! let mut voice = Filterclavier::new(44100.0);
//! voice.set_param(PARAM_MODE, FilterMode::Lp24.as_param());
//! voice.activate();
//!
//! voice.note_on(57, 90);
//! let mut buffer = vec![0.25f32; 512];
//! voice.process_block_inplace(&mut buffer);
//! voice.note_off(57, 0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod filter_core;
pub mod gain;
pub mod graph;
pub mod mapping;
pub mod midi;
pub mod mode;
pub mod voice;

pub use filter_core::{InertiaFilterCore, MAX_ORDER};
pub use gain::{MAX_GAIN, MIN_GAIN, compensated_gain, mode_max_gain};
pub use graph::{Gridline, LineGraphProvider, freq_gridline, graph_frequency, render_response};
pub use mapping::{note_to_hz, velocity_to_resonance};
pub use midi::{MidiEvent, MidiTarget};
pub use mode::{FilterFamily, FilterMode};
pub use voice::{
    Filterclavier, FilterclavierParams, PARAM_DETUNE, PARAM_INERTIA, PARAM_MAX_RESONANCE,
    PARAM_MODE, PARAM_TRANSPOSE, PARAMS, VoiceState,
};
