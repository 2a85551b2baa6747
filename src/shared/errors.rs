//! Error kinds: configuration errors abort a run, record errors only
//! degrade the row of the record that raised them.
use std::path::PathBuf;
use thiserror::Error;

/// Smallest sequence the error model accepts
pub const MIN_SEQUENCE_LENGTH: usize = 8;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No input file was given.")]
    MissingInput,

    #[error("Input file at {:?} cannot be read.", path)]
    UnreadableInput { path: PathBuf },

    #[error("Unsupported input format '{0}' (expected tsv or fastq).")]
    UnsupportedFormat(String),

    #[error("Invalid number of threads {0} (use -1 for all available threads or a positive count).")]
    InvalidThreads(i32),

    #[error("Error threshold {0} is outside [0, 1].")]
    InvalidThreshold(f64),

    #[error("Correction symbol '{0}' is not a single ASCII character.")]
    InvalidCorrectionSymbol(char),

    #[error("Chunk size must be positive.")]
    InvalidChunkSize,

    #[error(
        "Input arrays differ in length ({sequences} sequences, {germlines} germlines, {qualities} quality strings)."
    )]
    LengthMismatch {
        sequences: usize,
        germlines: usize,
        qualities: usize,
    },
}

impl ConfigError {
    #[cold]
    pub fn unreadable_input<P: AsRef<std::path::Path>>(path: P) -> Self {
        ConfigError::UnreadableInput {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[cold]
    pub fn length_mismatch(sequences: usize, germlines: usize, qualities: usize) -> Self {
        ConfigError::LengthMismatch {
            sequences,
            germlines,
            qualities,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("malformed record ({0})")]
    Malformed(String),

    #[error("quality string has {quality} characters for {sequence} bases")]
    QualityLength { sequence: usize, quality: usize },

    #[error("invalid sequence ({0})")]
    InvalidSequence(String),

    #[error("sequence of {0} nt is shorter than the minimum of {min} nt", min = MIN_SEQUENCE_LENGTH)]
    TooShort(usize),

    #[error("germline alignment failed ({0})")]
    Alignment(String),
}

impl RecordError {
    #[cold]
    pub fn quality_length(sequence: usize, quality: usize) -> Self {
        RecordError::QualityLength { sequence, quality }
    }

    #[cold]
    pub fn alignment<M: ToString>(msg: M) -> Self {
        RecordError::Alignment(msg.to_string())
    }
}
