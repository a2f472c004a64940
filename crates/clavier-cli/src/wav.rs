//! WAV file reading and writing.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavWriter};

use crate::error::Result;

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample (16, 24 or 32; 32 is written as float).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Deinterleaved stereo audio.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereoSamples {
    /// Left channel
    pub left: Vec<f32>,
    /// Right channel
    pub right: Vec<f32>,
}

impl StereoSamples {
    /// The same signal on both channels.
    pub fn from_mono(mono: Vec<f32>) -> Self {
        Self {
            right: mono.clone(),
            left: mono,
        }
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Whether there are no frames.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Largest absolute sample over both channels.
    pub fn peak(&self) -> f32 {
        self.left
            .iter()
            .chain(self.right.iter())
            .map(|s| s.abs())
            .fold(0.0, f32::max)
    }

    /// RMS over both channels.
    pub fn rms(&self) -> f32 {
        let n = self.left.len() + self.right.len();
        if n == 0 {
            return 0.0;
        }
        let sum: f32 = self.left.iter().chain(self.right.iter()).map(|s| s * s).sum();
        (sum / n as f32).sqrt()
    }
}

/// Read a WAV file as stereo.
///
/// Mono files are copied to both channels. Files with more than two
/// channels keep the first two.
pub fn read_wav_stereo<P: AsRef<Path>>(path: P) -> Result<(StereoSamples, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<f32> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let samples = if channels == 1 {
        StereoSamples::from_mono(interleaved)
    } else {
        let frames = interleaved.len() / channels;
        let mut out = StereoSamples {
            left: Vec::with_capacity(frames),
            right: Vec::with_capacity(frames),
        };
        for frame in interleaved.chunks_exact(channels) {
            out.left.push(frame[0]);
            out.right.push(frame[1]);
        }
        out
    };

    Ok((samples, spec))
}

/// Write stereo samples as an interleaved two-channel WAV file.
///
/// `spec.channels` is ignored; the file always has two channels.
pub fn write_wav_stereo<P: AsRef<Path>>(
    path: P,
    samples: &StereoSamples,
    spec: WavSpec,
) -> Result<()> {
    let spec = WavSpec { channels: 2, ..spec };
    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;

    let frames = samples.left.iter().zip(samples.right.iter());
    if spec.bits_per_sample == 32 {
        for (&l, &r) in frames {
            writer.write_sample(l)?;
            writer.write_sample(r)?;
        }
    } else {
        let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
        let quantize = |s: f32| (s * max_val).clamp(-max_val, max_val - 1.0) as i32;
        for (&l, &r) in frames {
            writer.write_sample(quantize(l))?;
            writer.write_sample(quantize(r))?;
        }
    }

    writer.finalize()?;
    Ok(())
}
