//! Core audio processing trait.
//!
//! [`Effect`] is the seam between a processor and whatever drives it: the
//! CLI renderer, a plugin wrapper, or a test. It is object-safe and every
//! method is expected to run on the audio thread without allocating.

/// Core trait for audio processors.
///
/// # Example
///
/// ```rust
/// use clavier_core::Effect;
///
/// struct Gain {
///     gain: f32,
/// }
///
/// impl Effect for Gain {
///     fn process(&mut self, input: f32) -> f32 {
///         input * self.gain
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///
///     fn reset(&mut self) {}
/// }
///
/// let mut gain = Gain { gain: 2.0 };
/// let mut buf = [0.5, -0.25];
/// gain.process_block_inplace(&mut buf);
/// assert_eq!(buf, [1.0, -0.5]);
/// ```
pub trait Effect {
    /// Process a single mono sample.
    fn process(&mut self, input: f32) -> f32;

    /// Process one stereo frame.
    ///
    /// The default runs the left sample through [`process`](Self::process)
    /// and copies it to both outputs. Processors with per-channel state
    /// override this.
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let _ = right;
        let out = self.process(left);
        (out, out)
    }

    /// Process a block of samples.
    ///
    /// # Panics
    /// Debug builds panic if `input.len() != output.len()`.
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(
            input.len(),
            output.len(),
            "Input and output buffers must have same length"
        );
        for (inp, out) in input.iter().zip(output.iter_mut()) {
            *out = self.process(*inp);
        }
    }

    /// Process a block of samples in place.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Process a stereo block in place, one frame at a time.
    ///
    /// # Panics
    /// Debug builds panic if the channel lengths differ.
    fn process_block_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(left.len(), right.len(), "channel buffers must match");
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            (*l, *r) = self.process_stereo(*l, *r);
        }
    }

    /// Update the sample rate and anything derived from it.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear internal state (filter history) without changing parameters.
    fn reset(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(u32);

    impl Effect for Counter {
        fn process(&mut self, input: f32) -> f32 {
            self.0 += 1;
            input
        }
        fn set_sample_rate(&mut self, _: f32) {}
        fn reset(&mut self) {
            self.0 = 0;
        }
    }

    #[test]
    fn test_default_stereo_processes_once() {
        let mut counter = Counter(0);
        assert_eq!(counter.process_stereo(0.5, -0.5), (0.5, 0.5));
        assert_eq!(counter.0, 1);
    }

    #[test]
    fn test_block_processing() {
        let mut counter = Counter(0);
        let input = [1.0, 2.0, 3.0];
        let mut output = [0.0; 3];
        counter.process_block(&input, &mut output);
        assert_eq!(output, input);
        assert_eq!(counter.0, 3);
    }

    #[test]
    fn test_stereo_block_processing() {
        let mut counter = Counter(0);
        let mut left = [1.0, 2.0];
        let mut right = [5.0, 6.0];
        counter.process_block_stereo(&mut left, &mut right);
        assert_eq!(left, [1.0, 2.0]);
        assert_eq!(right, [1.0, 2.0]);
        assert_eq!(counter.0, 2);
    }
}
