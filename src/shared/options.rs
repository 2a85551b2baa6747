//! Run configuration, built once and shared read-only by every stage
use crate::correct::ErrorModelParameters;
use crate::shared::errors::ConfigError;
use crate::shared::quality::QualityEncoding;
use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Threshold giving the best balance between precision and recall
pub const OPTIMIZED_THRESHOLD: f64 = 0.884311;
/// Precision and recall measured at `OPTIMIZED_THRESHOLD`
pub const OPTIMIZED_PRECISION: f64 = 0.663;
pub const OPTIMIZED_RECALL: f64 = 0.448;

pub const DEFAULT_CHUNK_SIZE: usize = 4096;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    #[default]
    Human,
    Mouse,
}

impl Species {
    pub fn name(&self) -> &'static str {
        match self {
            Species::Human => "human",
            Species::Mouse => "mouse",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum ReceptorType {
    #[default]
    #[value(name = "Ig")]
    Ig,
    #[value(name = "TCR")]
    #[serde(rename = "TCR")]
    Tcr,
}

impl ReceptorType {
    /// Prefix of the IMGT loci belonging to this receptor
    pub fn locus_prefix(&self) -> &'static str {
        match self {
            ReceptorType::Ig => "IG",
            ReceptorType::Tcr => "TR",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Tsv,
    Fastq,
}

impl FromStr for InputFormat {
    type Err = ConfigError;
    fn from_str(s: &str) -> std::result::Result<InputFormat, ConfigError> {
        match s.to_ascii_lowercase().as_str() {
            "tsv" => Ok(InputFormat::Tsv),
            "fastq" | "fq" => Ok(InputFormat::Fastq),
            _ => Err(ConfigError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Every setting of a run, borrowed by each stage
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub infile: Option<PathBuf>,
    pub format: Option<InputFormat>,
    pub outfile: PathBuf,
    pub species: Species,
    pub igtype: ReceptorType,
    // directory holding one sub-directory of germline genes per species
    pub germline_db: Option<PathBuf>,
    pub verbose: u8,
    // -1: all available threads
    pub nthreads: i32,
    pub error_threshold: f64,
    pub correction: char,
    pub allow_nonproductive: bool,
    pub quality_encoding: QualityEncoding,
    pub chunk_size: usize,
    // optional per-base feature export (csv)
    pub features_file: Option<PathBuf>,
    // optional clonotype summary (tsv)
    pub clonotypes_file: Option<PathBuf>,
    // calibration override, the species defaults are used otherwise
    pub error_model: Option<ErrorModelParameters>,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            infile: None,
            format: None,
            outfile: PathBuf::from("out.tsv"),
            species: Species::Human,
            igtype: ReceptorType::Ig,
            germline_db: None,
            verbose: 1,
            nthreads: -1,
            error_threshold: OPTIMIZED_THRESHOLD,
            correction: 'N',
            allow_nonproductive: false,
            quality_encoding: QualityEncoding::Sanger,
            chunk_size: DEFAULT_CHUNK_SIZE,
            features_file: None,
            clonotypes_file: None,
            error_model: None,
        }
    }
}

impl Options {
    pub fn new(infile: &Path, format: InputFormat) -> Options {
        Options {
            infile: Some(infile.to_path_buf()),
            format: Some(format),
            ..Default::default()
        }
    }

    /// Load options from a json file, missing keys keep their default
    pub fn from_json(path: &Path) -> Result<Options> {
        let file = File::open(path)
            .with_context(|| format!("Unable to open the configuration file {:?}", path))?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| anyhow!("Invalid configuration file {:?}: {}", path, e))
    }

    /// Checks shared by the bulk API and batch runs
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.nthreads == 0 || self.nthreads < -1 {
            return Err(ConfigError::InvalidThreads(self.nthreads));
        }
        if !(0.0..=1.0).contains(&self.error_threshold) {
            return Err(ConfigError::InvalidThreshold(self.error_threshold));
        }
        if !self.correction.is_ascii() || self.correction.is_ascii_control() {
            return Err(ConfigError::InvalidCorrectionSymbol(self.correction));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize);
        }
        Ok(())
    }

    /// Checks needed before a batch run touches any record
    pub fn validate_batch(&self) -> std::result::Result<(), ConfigError> {
        self.validate()?;
        let infile = self.infile.as_ref().ok_or(ConfigError::MissingInput)?;
        if !infile.is_file() {
            return Err(ConfigError::unreadable_input(infile));
        }
        self.input_format()?;
        Ok(())
    }

    /// The declared format, or the one implied by the input extension
    pub fn input_format(&self) -> std::result::Result<InputFormat, ConfigError> {
        if let Some(format) = self.format {
            return Ok(format);
        }
        let infile = self.infile.as_ref().ok_or(ConfigError::MissingInput)?;
        let extension = infile
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        extension.parse::<InputFormat>()
    }

    /// Thread count handed to rayon (0 lets rayon use every core)
    pub fn num_threads(&self) -> usize {
        if self.nthreads < 1 {
            0
        } else {
            self.nthreads as usize
        }
    }

    pub fn correction_symbol(&self) -> u8 {
        self.correction as u8
    }
}
