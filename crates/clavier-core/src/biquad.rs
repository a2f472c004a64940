//! Biquad (bi-quadratic) filter stage.
//!
//! A single second-order IIR section plus the RBJ Audio EQ Cookbook
//! coefficient formulas used by the filter core. Cascades are built by
//! copying one stage's coefficients into several [`Biquad`]s.

use core::f32::consts::PI;
use libm::{cosf, sinf, sqrtf};

/// Second-order IIR section (Direct Form I).
///
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone)]
pub struct Biquad {
    /// Feedforward coefficients
    b0: f32,
    b1: f32,
    b2: f32,

    /// Feedback coefficients, normalized by a0
    a1: f32,
    a2: f32,

    /// Input delay line: x[n-1], x[n-2]
    x1: f32,
    x2: f32,

    /// Output delay line: y[n-1], y[n-2]
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Creates a new biquad with passthrough coefficients.
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Sets the biquad coefficients, normalizing by `a0`.
    pub fn set_coefficients(&mut self, b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) {
        let a0_inv = 1.0 / a0;
        self.b0 = b0 * a0_inv;
        self.b1 = b1 * a0_inv;
        self.b2 = b2 * a0_inv;
        self.a1 = a1 * a0_inv;
        self.a2 = a2 * a0_inv;
    }

    /// Sets coefficients from a cookbook tuple with the feed-forward half
    /// scaled by `gain`.
    ///
    /// Scaling `b0..b2` multiplies the whole transfer function by `gain`
    /// without moving its poles.
    pub fn set_scaled(&mut self, coeffs: Coefficients, gain: f32) {
        let (b0, b1, b2, a0, a1, a2) = coeffs;
        self.set_coefficients(b0 * gain, b1 * gain, b2 * gain, a0, a1, a2);
    }

    /// Copies the coefficients of `other`, leaving this stage's history intact.
    pub fn copy_coefficients(&mut self, other: &Biquad) {
        self.b0 = other.b0;
        self.b1 = other.b1;
        self.b2 = other.b2;
        self.a1 = other.a1;
        self.a2 = other.a2;
    }

    /// Processes a single sample through the biquad filter.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = crate::math::flush_denormal(output);

        output
    }

    /// Magnitude response at `freq` Hz.
    ///
    /// Evaluates `|H(e^jw)|` directly from the current coefficients. Reads
    /// only coefficients, never the delay lines.
    pub fn freq_gain(&self, freq: f32, sample_rate: f32) -> f32 {
        let omega = 2.0 * PI * freq / sample_rate;
        let (c1, s1) = (cosf(omega), sinf(omega));
        let (c2, s2) = (cosf(2.0 * omega), sinf(2.0 * omega));

        let num_re = self.b0 + self.b1 * c1 + self.b2 * c2;
        let num_im = -(self.b1 * s1 + self.b2 * s2);
        let den_re = 1.0 + self.a1 * c1 + self.a2 * c2;
        let den_im = -(self.a1 * s1 + self.a2 * s2);

        let den = den_re * den_re + den_im * den_im;
        if den <= 0.0 {
            return 0.0;
        }
        sqrtf((num_re * num_re + num_im * num_im) / den)
    }

    /// Clears the filter state (delay lines).
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

/// Unnormalized cookbook coefficients `(b0, b1, b2, a0, a1, a2)`.
pub type Coefficients = (f32, f32, f32, f32, f32, f32);

#[inline]
fn omega_terms(frequency: f32, q: f32, sample_rate: f32) -> (f32, f32) {
    let omega = 2.0 * PI * frequency / sample_rate;
    let alpha = sinf(omega) / (2.0 * q);
    (cosf(omega), alpha)
}

/// Low-pass filter coefficients (RBJ cookbook).
///
/// # Arguments
///
/// * `frequency` - Cutoff frequency in Hz
/// * `q` - Q factor (0.707 for Butterworth response)
/// * `sample_rate` - Sample rate in Hz
pub fn lowpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let (cos_omega, alpha) = omega_terms(frequency, q, sample_rate);

    let b0 = (1.0 - cos_omega) / 2.0;
    let b1 = 1.0 - cos_omega;
    let b2 = (1.0 - cos_omega) / 2.0;

    (b0, b1, b2, 1.0 + alpha, -2.0 * cos_omega, 1.0 - alpha)
}

/// High-pass filter coefficients (RBJ cookbook).
pub fn highpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let (cos_omega, alpha) = omega_terms(frequency, q, sample_rate);

    let b0 = (1.0 + cos_omega) / 2.0;
    let b1 = -(1.0 + cos_omega);
    let b2 = (1.0 + cos_omega) / 2.0;

    (b0, b1, b2, 1.0 + alpha, -2.0 * cos_omega, 1.0 - alpha)
}

/// Band-pass filter coefficients (RBJ cookbook, constant 0 dB peak gain).
///
/// # Arguments
///
/// * `frequency` - Center frequency in Hz
/// * `q` - Q factor (bandwidth = frequency / Q)
/// * `sample_rate` - Sample rate in Hz
pub fn bandpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let (cos_omega, alpha) = omega_terms(frequency, q, sample_rate);

    (alpha, 0.0, -alpha, 1.0 + alpha, -2.0 * cos_omega, 1.0 - alpha)
}

/// Notch (band-reject) filter coefficients (RBJ cookbook).
pub fn notch_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let (cos_omega, alpha) = omega_terms(frequency, q, sample_rate);

    (
        1.0,
        -2.0 * cos_omega,
        1.0,
        1.0 + alpha,
        -2.0 * cos_omega,
        1.0 - alpha,
    )
}
