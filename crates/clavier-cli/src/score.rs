//! TOML score files: initial parameters plus a timed list of note events.
//!
//! ```toml
//! [params]
//! transpose = 12
//! mode = "bp12"
//! inertia = 40.0
//!
//! [[events]]
//! time = 0.0
//! type = "note_on"
//! note = 60
//! velocity = 100
//!
//! [[events]]
//! time = 0.5
//! type = "note_off"
//! note = 60
//! ```

use std::path::Path;

use clavier_core::ParameterInfo;
use clavier_filter::{
    FilterMode, Filterclavier, MidiEvent, PARAM_DETUNE, PARAM_INERTIA, PARAM_MAX_RESONANCE,
    PARAM_MODE, PARAM_TRANSPOSE,
};
use serde::Deserialize;

use crate::error::{CliError, Result};

const MAX_DATA_BYTE: u8 = 127;

/// A parsed score.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Score {
    /// Parameter values applied before the first event
    #[serde(default)]
    pub params: ScoreParams,
    /// Note events in playback order
    #[serde(default)]
    pub events: Vec<ScoreEvent>,
}

/// Optional parameter overrides. Missing entries keep their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoreParams {
    /// Semitones
    pub transpose: Option<f32>,
    /// Cents
    pub detune: Option<f32>,
    /// Resonance at full velocity
    pub max_resonance: Option<f32>,
    /// Mode id such as `"lp24"` or `"bp6"`
    pub mode: Option<String>,
    /// Portamento in milliseconds
    pub inertia: Option<f32>,
}

impl ScoreParams {
    fn numeric(&self) -> [(&'static str, usize, Option<f32>); 4] {
        [
            ("transpose", PARAM_TRANSPOSE, self.transpose),
            ("detune", PARAM_DETUNE, self.detune),
            ("max_resonance", PARAM_MAX_RESONANCE, self.max_resonance),
            ("inertia", PARAM_INERTIA, self.inertia),
        ]
    }

    fn validate(&self) -> Result<()> {
        for (name, _, value) in self.numeric() {
            if let Some(value) = value.filter(|v| !v.is_finite()) {
                return Err(CliError::InvalidParam { name, value });
            }
        }
        Ok(())
    }
}

/// Kind of a score event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Key pressed
    NoteOn,
    /// Key released
    NoteOff,
}

/// One timed note event.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoreEvent {
    /// Seconds from the start of the render
    pub time: f64,
    /// Event kind
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// MIDI note number
    pub note: u8,
    /// Velocity, 100 when omitted on note-on and 0 on note-off
    pub velocity: Option<u8>,
}

impl ScoreEvent {
    /// The event as a [`MidiEvent`].
    pub fn midi(&self) -> MidiEvent {
        match self.kind {
            EventKind::NoteOn => MidiEvent::NoteOn {
                note: self.note,
                velocity: self.velocity.unwrap_or(100),
            },
            EventKind::NoteOff => MidiEvent::NoteOff {
                note: self.note,
                velocity: self.velocity.unwrap_or(0),
            },
        }
    }
}

impl Score {
    /// Read, parse and validate a score file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let score = Self::parse(&text).map_err(|err| match err {
            CliError::Toml(source) => CliError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        tracing::debug!(path = %path.display(), events = score.events.len(), "score loaded");
        Ok(score)
    }

    /// Parse and validate a score from a string.
    pub fn parse(text: &str) -> Result<Self> {
        let score: Score = toml::from_str(text)?;
        score.validate()?;
        Ok(score)
    }

    /// Check parameter values, event times and data bytes, and that the mode
    /// id is known.
    pub fn validate(&self) -> Result<()> {
        self.mode()?;
        self.params.validate()?;

        let mut previous = 0.0f64;
        for (index, event) in self.events.iter().enumerate() {
            let invalid = |reason: String| CliError::InvalidEvent { index, reason };

            if !event.time.is_finite() || event.time < 0.0 {
                return Err(invalid(format!("time {} must be a non-negative number", event.time)));
            }
            if event.time < previous {
                return Err(invalid(format!(
                    "time {} is earlier than the previous event ({previous})",
                    event.time
                )));
            }
            if event.note > MAX_DATA_BYTE {
                return Err(invalid(format!("note {} is out of range 0-127", event.note)));
            }
            if let Some(velocity) = event.velocity.filter(|&v| v > MAX_DATA_BYTE) {
                return Err(invalid(format!("velocity {velocity} is out of range 0-127")));
            }
            previous = event.time;
        }
        Ok(())
    }

    /// The requested filter mode, if any.
    pub fn mode(&self) -> Result<Option<FilterMode>> {
        match &self.params.mode {
            None => Ok(None),
            Some(id) => FilterMode::from_id(id)
                .map(Some)
                .ok_or_else(|| CliError::UnknownMode(id.clone())),
        }
    }

    /// Write the score's parameters into `voice`.
    ///
    /// Values go through [`ParameterInfo::set_param`], so out-of-range
    /// numbers are clamped to the parameter's range.
    pub fn apply_params(&self, voice: &mut Filterclavier) -> Result<()> {
        for (name, index, value) in self.params.numeric() {
            if let Some(value) = value {
                voice.set_param(index, value);
                let applied = voice.get_param(index);
                if applied != value {
                    tracing::warn!(param = name, requested = value, applied, "parameter clamped");
                }
            }
        }
        if let Some(mode) = self.mode()? {
            voice.set_param(PARAM_MODE, mode.as_param());
        }
        Ok(())
    }

    /// Events paired with their sample offsets at `sample_rate`.
    pub fn timeline(&self, sample_rate: u32) -> Vec<(usize, MidiEvent)> {
        self.events
            .iter()
            .map(|e| {
                let offset = (e.time * f64::from(sample_rate)).round() as usize;
                (offset, e.midi())
            })
            .collect()
    }

    /// Time of the last event in seconds, 0 for an empty score.
    pub fn end_time(&self) -> f64 {
        self.events.last().map_or(0.0, |e| e.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCORE: &str = r#"
        [params]
        transpose = 12
        mode = "bp12"
        inertia = 40.0

        [[events]]
        time = 0.0
        type = "note_on"
        note = 60
        velocity = 90

        [[events]]
        time = 0.5
        type = "note_off"
        note = 60
    "#;

    #[test]
    fn parses_params_and_events() {
        let score = Score::parse(SCORE).unwrap();
        assert_eq!(score.params.transpose, Some(12.0));
        assert_eq!(score.mode().unwrap(), Some(FilterMode::Bp12));
        assert_eq!(score.events.len(), 2);
        assert_eq!(
            score.events[0].midi(),
            MidiEvent::NoteOn { note: 60, velocity: 90 }
        );
        assert_eq!(
            score.events[1].midi(),
            MidiEvent::NoteOff { note: 60, velocity: 0 }
        );
        assert_eq!(score.end_time(), 0.5);
    }

    #[test]
    fn empty_score_is_valid() {
        let score = Score::parse("").unwrap();
        assert!(score.events.is_empty());
        assert_eq!(score.mode().unwrap(), None);
    }

    #[test]
    fn timeline_uses_sample_offsets() {
        let score = Score::parse(SCORE).unwrap();
        let timeline = score.timeline(48000);
        assert_eq!(timeline[0].0, 0);
        assert_eq!(timeline[1].0, 24000);
    }

    #[test]
    fn rejects_decreasing_times() {
        let text = r#"
            [[events]]
            time = 1.0
            type = "note_on"
            note = 60
            [[events]]
            time = 0.5
            type = "note_off"
            note = 60
        "#;
        let err = Score::parse(text).unwrap_err();
        assert!(matches!(err, CliError::InvalidEvent { index: 1, .. }));
    }

    #[test]
    fn rejects_negative_time_and_bad_bytes() {
        let negative = "[[events]]\ntime = -0.1\ntype = \"note_on\"\nnote = 60\n";
        assert!(matches!(
            Score::parse(negative),
            Err(CliError::InvalidEvent { index: 0, .. })
        ));

        let high_note = "[[events]]\ntime = 0.0\ntype = \"note_on\"\nnote = 128\n";
        assert!(Score::parse(high_note).is_err());

        let high_velocity =
            "[[events]]\ntime = 0.0\ntype = \"note_on\"\nnote = 60\nvelocity = 200\n";
        assert!(Score::parse(high_velocity).is_err());
    }

    #[test]
    fn rejects_unknown_mode_and_fields() {
        let err = Score::parse("[params]\nmode = \"bp99\"\n").unwrap_err();
        assert!(matches!(err, CliError::UnknownMode(ref id) if id == "bp99"));

        assert!(matches!(
            Score::parse("[params]\ncutoff = 3\n"),
            Err(CliError::Toml(_))
        ));
        assert!(matches!(
            Score::parse("[[events]]\ntime = 0.0\ntype = \"pitch_bend\"\nnote = 1\n"),
            Err(CliError::Toml(_))
        ));
    }

    #[test]
    fn rejects_non_finite_params() {
        let err = Score::parse("[params]\ntranspose = nan\n").unwrap_err();
        assert!(matches!(err, CliError::InvalidParam { name: "transpose", .. }));

        let err = Score::parse("[params]\ninertia = inf\n").unwrap_err();
        assert!(matches!(err, CliError::InvalidParam { name: "inertia", .. }));

        assert!(Score::parse("[params]\ndetune = -12.5\n").is_ok());
    }

    #[test]
    fn apply_params_clamps_into_range() {
        let score = Score::parse("[params]\ntranspose = 100\nmode = \"lp36\"\n").unwrap();
        let mut voice = Filterclavier::new(48000.0);
        score.apply_params(&mut voice).unwrap();
        assert_eq!(voice.get_param(PARAM_TRANSPOSE), 48.0);
        assert_eq!(voice.params().mode(), Some(FilterMode::Lp36));
    }
}
