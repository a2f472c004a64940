//! Clavier Core - DSP primitives for the clavier filter voice
//!
//! Building blocks shared by the filter core and its hosts, designed for
//! real-time use with zero allocation in the audio path.
//!
//! # Core Abstractions
//!
//! - [`Effect`] - Object-safe processing trait
//! - [`Inertia`] - Value ramping toward a target in fixed steps
//! - [`Biquad`] - Second-order IIR stage with RBJ cookbook coefficients and
//!   magnitude response
//! - [`ParameterInfo`] / [`ParamDescriptor`] - Host-facing parameter
//!   introspection
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! clavier-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod biquad;
pub mod effect;
pub mod inertia;
pub mod math;
pub mod param_info;

pub use biquad::{
    Biquad, Coefficients, bandpass_coefficients, highpass_coefficients, lowpass_coefficients,
    notch_coefficients,
};
pub use effect::Effect;
pub use inertia::Inertia;
pub use math::{amplitude_to_graph, db_to_linear, flush_denormal, linear_to_db, samples_per_ms};
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamUnit, ParameterInfo};
