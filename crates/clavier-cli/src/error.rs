//! Error types for the CLI.

use std::path::PathBuf;

/// Errors raised while loading scores and moving audio in and out.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// A file could not be read.
    #[error("cannot read {}", path.display())]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A score file is not valid TOML for the score schema.
    #[error("cannot parse score {}", path.display())]
    Parse {
        /// Score file
        path: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// TOML error without a file attached.
    #[error("invalid score: {0}")]
    Toml(#[from] toml::de::Error),

    /// Score parsed but violates an ordering or range rule.
    #[error("score event {index}: {reason}")]
    InvalidEvent {
        /// Position of the event in the file
        index: usize,
        /// What is wrong with it
        reason: String,
    },

    /// A `[params]` value is NaN or infinite.
    #[error("score parameter '{name}' must be a finite number, got {value}")]
    InvalidParam {
        /// Key in the `[params]` table
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// The mode id is not one of the known filter modes.
    #[error("unknown filter mode '{0}' (run `clavier modes` for the list)")]
    UnknownMode(String),
}

/// Convenience result type for the CLI.
pub type Result<T> = std::result::Result<T, CliError>;
