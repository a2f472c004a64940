//! Excitation signals for rendering without an input file.

use clap::ValueEnum;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Built-in excitation signal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Source {
    /// White noise (deterministic)
    #[default]
    Noise,
    /// Naive sawtooth at 110 Hz
    Saw,
    /// Single impulse at sample 0
    Impulse,
}

const SAW_HZ: f32 = 110.0;

impl Source {
    /// `len` samples of this signal at `amplitude`.
    pub fn generate(self, len: usize, sample_rate: u32, amplitude: f32) -> Vec<f32> {
        match self {
            Source::Noise => white_noise(len, amplitude),
            Source::Saw => {
                let inc = SAW_HZ / sample_rate as f32;
                let mut phase = 0.0f32;
                (0..len)
                    .map(|_| {
                        let out = (2.0 * phase - 1.0) * amplitude;
                        phase = (phase + inc).fract();
                        out
                    })
                    .collect()
            }
            Source::Impulse => {
                let mut out = vec![0.0; len];
                if let Some(first) = out.first_mut() {
                    *first = amplitude;
                }
                out
            }
        }
    }
}

/// Hash-seeded white noise, identical on every run.
fn white_noise(len: usize, amplitude: f32) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let mut hasher = DefaultHasher::new();
            i.hash(&mut hasher);
            let random = (hasher.finish() as f64 / u64::MAX as f64) as f32 * 2.0 - 1.0;
            random * amplitude
        })
        .collect()
}
