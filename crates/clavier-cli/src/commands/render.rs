//! Render a score through the filter voice.

use std::path::PathBuf;

use clap::Args;
use clavier_core::{Effect, linear_to_db};
use clavier_filter::{Filterclavier, MidiEvent, MidiTarget};
use indicatif::{ProgressBar, ProgressStyle};

use crate::score::Score;
use crate::signal::Source;
use crate::wav::{StereoSamples, WavSpec, read_wav_stereo, write_wav_stereo};

#[derive(Args)]
pub struct RenderArgs {
    /// Score file (TOML)
    #[arg(value_name = "SCORE")]
    score: PathBuf,

    /// Output WAV file
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Input WAV file to filter (a built-in source is used otherwise)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Built-in excitation when no input file is given
    #[arg(long, value_enum, default_value_t = Source::Noise)]
    source: Source,

    /// Excitation amplitude (0-1)
    #[arg(long, default_value = "0.25")]
    amplitude: f32,

    /// Sample rate when no input file is given
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Seconds rendered after the last event
    #[arg(long, default_value = "0.5")]
    tail: f64,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    if args.block_size == 0 {
        anyhow::bail!("--block-size must be at least 1");
    }
    if !matches!(args.bit_depth, 16 | 24 | 32) {
        anyhow::bail!("--bit-depth must be 16, 24, or 32 (got {})", args.bit_depth);
    }
    if !args.tail.is_finite() || args.tail < 0.0 {
        anyhow::bail!("--tail must be a non-negative number of seconds");
    }

    let score = Score::load(&args.score)?;

    let (mut audio, sample_rate) = match &args.input {
        Some(path) => {
            println!("Reading {}...", path.display());
            let (samples, spec) = read_wav_stereo(path)?;
            (samples, spec.sample_rate)
        }
        None => {
            if args.sample_rate == 0 {
                anyhow::bail!("--sample-rate must be positive");
            }
            let seconds = score.end_time() + args.tail;
            let len = (seconds * f64::from(args.sample_rate)).round() as usize;
            let mono = args.source.generate(len, args.sample_rate, args.amplitude);
            (StereoSamples::from_mono(mono), args.sample_rate)
        }
    };

    println!(
        "  {} frames, {} Hz, {:.2}s, {} event(s)",
        audio.len(),
        sample_rate,
        audio.len() as f64 / f64::from(sample_rate),
        score.events.len()
    );

    if audio.is_empty() {
        tracing::warn!("nothing to render, the output will be empty");
    }

    let mut voice = Filterclavier::new(sample_rate as f32);
    score.apply_params(&mut voice)?;
    voice.activate();

    let timeline = score.timeline(sample_rate);
    let skipped = timeline.iter().filter(|(offset, _)| *offset >= audio.len()).count();
    if skipped > 0 {
        tracing::warn!(skipped, "events past the end of the audio are ignored");
    }

    let pb = ProgressBar::new(audio.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let input_rms = audio.rms();
    render(&mut voice, &mut audio, &timeline, args.block_size, |pos| {
        pb.set_position(pos as u64);
    });
    pb.finish_with_message("done");

    if voice.invalid_mode_events() > 0 {
        tracing::warn!(count = voice.invalid_mode_events(), "filter mode did not decode");
    }

    println!("\nStats:");
    println!("  Input:  RMS {:.1} dB", linear_to_db(input_rms));
    println!(
        "  Output: RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(audio.rms()),
        linear_to_db(audio.peak())
    );

    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: args.bit_depth,
    };
    println!("\nWriting {}...", args.output.display());
    write_wav_stereo(&args.output, &audio, spec)?;
    println!("Done!");

    Ok(())
}

/// Filter `audio` in place, delivering each event at its sample offset.
///
/// Blocks are split at event offsets so a note lands on its exact sample.
/// `progress` receives the number of frames processed so far.
pub fn render(
    voice: &mut Filterclavier,
    audio: &mut StereoSamples,
    timeline: &[(usize, MidiEvent)],
    block_size: usize,
    mut progress: impl FnMut(usize),
) {
    let total = audio.len();
    let block_size = block_size.max(1);
    let mut next = 0;
    let mut pos = 0;

    while pos < total {
        while let Some(&(offset, event)) = timeline.get(next) {
            if offset > pos {
                break;
            }
            tracing::debug!(frame = pos, ?event, "note event");
            voice.handle_event(event);
            next += 1;
        }

        let mut end = (pos + block_size).min(total);
        if let Some(&(offset, _)) = timeline.get(next) {
            end = end.min(offset);
        }

        voice.process_block_stereo(&mut audio.left[pos..end], &mut audio.right[pos..end]);
        pos = end;
        progress(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clavier_filter::VoiceState;

    #[test]
    fn events_land_on_their_frame() {
        let mut voice = Filterclavier::new(48000.0);
        voice.activate();
        let mut audio = StereoSamples::from_mono(vec![0.0; 1000]);
        let timeline = [
            (0, MidiEvent::NoteOn { note: 60, velocity: 100 }),
            (333, MidiEvent::NoteOff { note: 60, velocity: 0 }),
        ];

        let mut checkpoints = Vec::new();
        render(&mut voice, &mut audio, &timeline, 256, |pos| checkpoints.push(pos));

        assert!(checkpoints.contains(&333));
        assert_eq!(checkpoints.last(), Some(&1000));
        assert_eq!(voice.state(), VoiceState::Idle);
    }

    #[test]
    fn events_past_the_end_are_not_applied() {
        let mut voice = Filterclavier::new(48000.0);
        voice.activate();
        let mut audio = StereoSamples::from_mono(vec![0.0; 100]);
        let timeline = [(500, MidiEvent::NoteOn { note: 60, velocity: 100 })];
        render(&mut voice, &mut audio, &timeline, 64, |_| {});
        assert_eq!(voice.state(), VoiceState::Idle);
    }

    #[test]
    fn simultaneous_events_apply_in_order() {
        let mut voice = Filterclavier::new(48000.0);
        voice.activate();
        let mut audio = StereoSamples::from_mono(vec![0.0; 64]);
        let timeline = [
            (10, MidiEvent::NoteOn { note: 60, velocity: 100 }),
            (10, MidiEvent::NoteOn { note: 64, velocity: 50 }),
        ];
        render(&mut voice, &mut audio, &timeline, 32, |_| {});
        assert_eq!(voice.state(), VoiceState::Sounding { note: 64, velocity: 50 });
    }
}
