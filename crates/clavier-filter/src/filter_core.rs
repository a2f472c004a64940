//! Biquad cascade driven by three inertia channels.
//!
//! [`InertiaFilterCore`] owns the cutoff, resonance and gain [`Inertia`]
//! channels and turns their current values into coefficients for up to
//! three cascaded biquad stages per channel. Audio is processed in ticks of
//! one millisecond: at every tick boundary, if any channel is still ramping,
//! all channels step once and the coefficients are recalculated. Between
//! boundaries the coefficients are constant.

use clavier_core::{
    Biquad, Inertia, bandpass_coefficients, highpass_coefficients, lowpass_coefficients,
    notch_coefficients, samples_per_ms,
};

use crate::mode::{FilterFamily, FilterMode};

/// Maximum number of cascaded stages (36 dB/oct lowpass).
pub const MAX_ORDER: usize = 3;

/// Lowest cutoff handed to the coefficient math, in Hz.
pub const MIN_CUTOFF_HZ: f32 = 10.0;

/// Highest cutoff as a fraction of the sample rate.
pub const MAX_CUTOFF_RATIO: f32 = 0.49;

/// Default ramp length of all three channels, in ticks (milliseconds).
pub const DEFAULT_INERTIA_TICKS: u32 = 20;

const INITIAL_CUTOFF_HZ: f32 = 20.0;
const INITIAL_RESONANCE: f32 = 20.0;
const INITIAL_GAIN: f32 = 1.0;
const MIN_Q: f32 = 0.01;

/// Stereo biquad cascade with inertia-smoothed cutoff, resonance and gain.
///
/// The core knows nothing about notes; a voice writes targets into the
/// channels (through [`cutoff_mut`](Self::cutoff_mut) and friends) and then
/// calls [`calculate_filter`](Self::calculate_filter).
///
/// # Example
///
/// ```rust
/// use clavier_filter::{FilterMode, InertiaFilterCore};
///
/// let mut core = InertiaFilterCore::new(48000.0);
/// core.activate();
/// core.cutoff_mut().set_now(1000.0);
/// core.resonance_mut().set_now(4.0);
/// core.calculate_filter(FilterMode::Bp6);
///
/// let peak = core.freq_gain(1000.0);
/// assert!((peak - 1.0).abs() < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct InertiaFilterCore {
    cutoff: Inertia,
    resonance: Inertia,
    gain: Inertia,
    left: [Biquad; MAX_ORDER],
    right: [Biquad; MAX_ORDER],
    /// Stages in use
    order: usize,
    mode: FilterMode,
    sample_rate: f32,
    /// Samples per tick
    tick_len: u32,
    /// Samples left before the next tick boundary
    tick_pos: u32,
    active: bool,
}

impl InertiaFilterCore {
    /// Create an inactive core at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        let mut core = Self {
            cutoff: Inertia::new(INITIAL_CUTOFF_HZ, DEFAULT_INERTIA_TICKS),
            resonance: Inertia::new(INITIAL_RESONANCE, DEFAULT_INERTIA_TICKS),
            gain: Inertia::new(INITIAL_GAIN, DEFAULT_INERTIA_TICKS),
            left: Default::default(),
            right: Default::default(),
            order: 1,
            mode: FilterMode::default(),
            sample_rate,
            tick_len: samples_per_ms(sample_rate),
            tick_pos: 0,
            active: false,
        };
        core.calculate_filter(core.mode);
        core
    }

    /// Cutoff channel (Hz).
    pub fn cutoff(&self) -> &Inertia {
        &self.cutoff
    }

    /// Mutable cutoff channel.
    pub fn cutoff_mut(&mut self) -> &mut Inertia {
        &mut self.cutoff
    }

    /// Resonance (Q) channel.
    pub fn resonance(&self) -> &Inertia {
        &self.resonance
    }

    /// Mutable resonance channel.
    pub fn resonance_mut(&mut self) -> &mut Inertia {
        &mut self.resonance
    }

    /// Output gain channel (linear multiplier).
    pub fn gain(&self) -> &Inertia {
        &self.gain
    }

    /// Mutable gain channel.
    pub fn gain_mut(&mut self) -> &mut Inertia {
        &mut self.gain
    }

    /// Mode of the last coefficient calculation.
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Number of stages in use.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Current sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Whether [`activate`](Self::activate) has been called without a
    /// matching [`deactivate`](Self::deactivate).
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether any channel is still ramping.
    pub fn is_ramping(&self) -> bool {
        self.cutoff.is_active() || self.resonance.is_active() || self.gain.is_active()
    }

    /// Set the ramp length of all three channels, in ticks.
    pub fn set_inertia_ticks(&mut self, ticks: u32) {
        if ticks == self.cutoff.length() {
            return;
        }
        self.cutoff.set_length(ticks);
        self.resonance.set_length(ticks);
        self.gain.set_length(ticks);
    }

    /// Recompute stage coefficients from the current channel values.
    ///
    /// Lowpass, highpass and bandpass stages use `q^(1/order)` so that the
    /// cascade as a whole peaks near `q`; band-reject stages use
    /// `order * 0.1 * q`. Every stage carries the full gain, so the cascade's
    /// gain is `gain^order`.
    pub fn calculate_filter(&mut self, mode: FilterMode) {
        let freq = self
            .cutoff
            .get()
            .clamp(MIN_CUTOFF_HZ, self.sample_rate * MAX_CUTOFF_RATIO);
        let q = self.resonance.get().max(MIN_Q);
        let gain = self.gain.get();
        let order = mode.order();
        let sr = self.sample_rate;

        let stage_q = libm::powf(q, 1.0 / order as f32);
        let coeffs = match mode.family() {
            FilterFamily::Lowpass => lowpass_coefficients(freq, stage_q, sr),
            FilterFamily::Highpass => highpass_coefficients(freq, stage_q, sr),
            FilterFamily::Bandpass => bandpass_coefficients(freq, stage_q, sr),
            FilterFamily::BandReject => notch_coefficients(freq, order as f32 * 0.1 * q, sr),
        };

        let (first, rest) = self.left.split_at_mut(1);
        first[0].set_scaled(coeffs, gain);
        for stage in rest.iter_mut().take(order - 1) {
            stage.copy_coefficients(&first[0]);
        }
        for stage in self.right.iter_mut().take(order) {
            stage.copy_coefficients(&first[0]);
        }

        // Stages joining the cascade start from silence.
        if order > self.order {
            for i in self.order..order {
                self.left[i].clear();
                self.right[i].clear();
            }
        }

        self.order = order;
        self.mode = mode;
    }

    /// Combined magnitude response of the cascade at `freq` Hz.
    pub fn freq_gain(&self, freq: f32) -> f32 {
        self.left[..self.order]
            .iter()
            .map(|stage| stage.freq_gain(freq, self.sample_rate))
            .product()
    }

    /// Clear filter history, restart the tick timer and mark active.
    pub fn activate(&mut self) {
        self.reset();
        self.tick_pos = 0;
        self.active = true;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate = self.sample_rate,
            tick_len = self.tick_len,
            "filter core activated"
        );
    }

    /// Mark inactive.
    pub fn deactivate(&mut self) {
        self.active = false;
        #[cfg(feature = "tracing")]
        tracing::debug!("filter core deactivated");
    }

    /// Update the sample rate, tick length and coefficients.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.tick_len = samples_per_ms(sample_rate);
        self.tick_pos = self.tick_pos.min(self.tick_len);
        self.calculate_filter(self.mode);
        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, tick_len = self.tick_len, "filter core sample rate");
    }

    /// Clear the delay lines of every stage.
    pub fn reset(&mut self) {
        for stage in self.left.iter_mut().chain(self.right.iter_mut()) {
            stage.clear();
        }
    }

    /// Step the channels if a tick boundary has been reached.
    #[inline]
    fn tick_if_due(&mut self) {
        if self.tick_pos == 0 {
            if self.is_ramping() {
                self.cutoff.step();
                self.resonance.step();
                self.gain.step();
                self.calculate_filter(self.mode);
            }
            self.tick_pos = self.tick_len;
        }
    }

    #[inline]
    fn run_left(&mut self, input: f32) -> f32 {
        self.left[..self.order]
            .iter_mut()
            .fold(input, |x, stage| stage.process(x))
    }

    #[inline]
    fn run_right(&mut self, input: f32) -> f32 {
        self.right[..self.order]
            .iter_mut()
            .fold(input, |x, stage| stage.process(x))
    }

    /// Process one mono sample through the left cascade.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.tick_if_due();
        self.tick_pos -= 1;
        self.run_left(input)
    }

    /// Process one stereo frame.
    #[inline]
    pub fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        self.tick_if_due();
        self.tick_pos -= 1;
        (self.run_left(left), self.run_right(right))
    }

    /// Process a mono block in place, recalculating at most once per tick.
    pub fn process_block(&mut self, buffer: &mut [f32]) {
        let mut offset = 0;
        while offset < buffer.len() {
            self.tick_if_due();
            let n = (self.tick_pos as usize).min(buffer.len() - offset);
            for sample in &mut buffer[offset..offset + n] {
                *sample = self.run_left(*sample);
            }
            self.tick_pos -= n as u32;
            offset += n;
        }
    }

    /// Process a stereo block in place.
    ///
    /// # Panics
    /// Debug builds panic if the channel lengths differ.
    pub fn process_block_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(left.len(), right.len(), "channel buffers must match");
        let len = left.len().min(right.len());
        let mut offset = 0;
        while offset < len {
            self.tick_if_due();
            let n = (self.tick_pos as usize).min(len - offset);
            for i in offset..offset + n {
                left[i] = self.run_left(left[i]);
                right[i] = self.run_right(right[i]);
            }
            self.tick_pos -= n as u32;
            offset += n;
        }
    }
}

impl Default for InertiaFilterCore {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48000.0;

    fn settled_core(mode: FilterMode, cutoff: f32, q: f32, gain: f32) -> InertiaFilterCore {
        let mut core = InertiaFilterCore::new(SR);
        core.cutoff_mut().set_now(cutoff);
        core.resonance_mut().set_now(q);
        core.gain_mut().set_now(gain);
        core.calculate_filter(mode);
        core.activate();
        core
    }

    #[test]
    fn initial_channel_values() {
        let core = InertiaFilterCore::new(SR);
        assert_eq!(core.cutoff().get(), 20.0);
        assert_eq!(core.resonance().get(), 20.0);
        assert_eq!(core.gain().get(), 1.0);
        assert!(!core.is_active());
        assert!(!core.is_ramping());
    }

    #[test]
    fn order_follows_mode() {
        let mut core = settled_core(FilterMode::Lp12, 1000.0, 0.707, 1.0);
        assert_eq!(core.order(), 1);
        core.calculate_filter(FilterMode::Bp18);
        assert_eq!(core.order(), 3);
        assert_eq!(core.mode(), FilterMode::Bp18);
    }

    #[test]
    fn cascade_gain_is_gain_to_the_order() {
        for (mode, order) in [(FilterMode::Bp6, 1), (FilterMode::Bp12, 2), (FilterMode::Bp18, 3)] {
            let core = settled_core(mode, 1000.0, 8.0, 2.0);
            let peak = core.freq_gain(1000.0);
            let expected = libm::powf(2.0, order as f32);
            assert!(
                (peak - expected).abs() / expected < 0.02,
                "{mode:?}: expected {expected}, got {peak}"
            );
        }
    }

    #[test]
    fn lowpass_passes_dc() {
        let mut core = settled_core(FilterMode::Lp24, 1000.0, 0.707, 1.0);
        let mut out = 0.0;
        for _ in 0..4800 {
            out = core.process(1.0);
        }
        assert!((out - 1.0).abs() < 0.05, "got {out}");
    }

    #[test]
    fn bandreject_notches_cutoff() {
        let core = settled_core(FilterMode::Br12, 2000.0, 10.0, 1.0);
        assert!(core.freq_gain(2000.0) < 0.01);
        assert!(core.freq_gain(50.0) > 0.9);
    }

    #[test]
    fn cutoff_is_clamped_for_coefficients() {
        let low = settled_core(FilterMode::Bp6, 1.0, 4.0, 1.0);
        assert!((low.freq_gain(MIN_CUTOFF_HZ) - 1.0).abs() < 0.05);

        let high = settled_core(FilterMode::Lp12, 1.0e6, 0.707, 1.0);
        assert!(high.freq_gain(1000.0).is_finite());
    }

    #[test]
    fn ramp_advances_once_per_millisecond() {
        let mut core = settled_core(FilterMode::Bp6, 100.0, 1.0, 1.0);
        core.set_inertia_ticks(10);
        core.cutoff_mut().set_inertia(1000.0);

        // Five ticks of 48 samples each.
        let mut buf = [0.0f32; 48 * 5];
        core.process_block(&mut buf);
        let after_five = core.cutoff().get();
        let expected = 100.0 * libm::powf(10.0, 0.5);
        assert!((after_five - expected).abs() < 0.5, "got {after_five}");

        let mut buf = [0.0f32; 48 * 5];
        core.process_block(&mut buf);
        assert_eq!(core.cutoff().get(), 1000.0);
        assert!(!core.is_ramping());
    }

    #[test]
    fn per_sample_and_block_processing_agree() {
        let mut a = settled_core(FilterMode::Lp24, 300.0, 2.0, 1.0);
        let mut b = a.clone();
        a.cutoff_mut().set_inertia(3000.0);
        b.cutoff_mut().set_inertia(3000.0);

        let input: Vec<f32> = (0..1000).map(|i| libm::sinf(i as f32 * 0.1)).collect();
        let per_sample: Vec<f32> = input.iter().map(|&x| a.process(x)).collect();
        let mut block = input.clone();
        for chunk in block.chunks_mut(37) {
            b.process_block(chunk);
        }

        for (x, y) in per_sample.iter().zip(block.iter()) {
            assert!((x - y).abs() < 1e-6);
        }
    }

    #[test]
    fn stereo_channels_are_independent() {
        let mut core = settled_core(FilterMode::Lp12, 500.0, 0.707, 1.0);
        let mut left = [1.0f32; 256];
        let mut right = [0.0f32; 256];
        core.process_block_stereo(&mut left, &mut right);
        assert!(left[255] > 0.5);
        assert_eq!(right[255], 0.0);
    }

    #[test]
    fn sample_rate_change_updates_tick_length() {
        let mut core = settled_core(FilterMode::Bp6, 100.0, 1.0, 1.0);
        core.set_sample_rate(96000.0);
        core.set_inertia_ticks(2);
        core.cutoff_mut().set_inertia(400.0);

        // 96 samples per tick at 96 kHz: the first tick steps at sample 0,
        // the second at sample 96.
        let mut buf = [0.0f32; 97];
        core.process_block(&mut buf);
        assert_eq!(core.cutoff().get(), 400.0);
    }

    #[test]
    fn activate_clears_history() {
        let mut core = settled_core(FilterMode::Lp12, 500.0, 0.707, 1.0);
        for _ in 0..100 {
            core.process(1.0);
        }
        core.deactivate();
        assert!(!core.is_active());
        core.activate();
        assert!(core.is_active());
        // Fresh history: first output is b0 * x only.
        let first = core.process(0.0);
        assert_eq!(first, 0.0);
    }
}
