use anyhow::Result;
use clap::Parser;
use igcorrect::shared::options::{InputFormat, ReceptorType, Species};
use igcorrect::shared::QualityEncoding;
use igcorrect::{run_protocol, Options};
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;

/// Correct sequencing errors in antibody / TCR reads and annotate their
/// V(D)J genes.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Input file (tsv: id, sequence, germline, phred; or fastq)
    #[arg(short, long)]
    infile: Option<PathBuf>,

    /// Input format, guessed from the extension when absent
    #[arg(short, long, value_enum)]
    format: Option<InputFormat>,

    #[arg(short, long)]
    outfile: Option<PathBuf>,

    #[arg(long, value_enum)]
    species: Option<Species>,

    #[arg(long, value_enum)]
    igtype: Option<ReceptorType>,

    /// Directory with one sub-directory of germline genes per species
    #[arg(long)]
    germline_db: Option<PathBuf>,

    /// 0: warnings only, 1: progress and summary, 2: per-record details
    #[arg(short, long)]
    verbose: Option<u8>,

    /// Number of threads, -1 for all of them
    #[arg(short, long, allow_negative_numbers = true)]
    nthreads: Option<i32>,

    /// Bases with a predicted error probability at or above this are corrected
    #[arg(long)]
    error_threshold: Option<f64>,

    /// Symbol written over the corrected bases
    #[arg(long)]
    correction: Option<char>,

    /// Also correct the non-productive reads
    #[arg(long)]
    allow_nonproductive: bool,

    #[arg(long, value_enum)]
    quality_encoding: Option<QualityEncoding>,

    /// Records processed per parallel batch
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Export the per-base error model features (csv)
    #[arg(long)]
    features: Option<PathBuf>,

    /// Export the clonotypes (tsv)
    #[arg(long)]
    clonotypes: Option<PathBuf>,

    /// Json file with default options, overridden by the flags
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn options(self) -> Result<Options> {
        let mut options = match &self.config {
            Some(path) => Options::from_json(path)?,
            None => Options::default(),
        };
        macro_rules! set {
            ($($field:ident <- $flag:expr),* $(,)?) => {
                $(if let Some(value) = $flag {
                    options.$field = value;
                })*
            };
        }
        set!(
            outfile <- self.outfile,
            species <- self.species,
            igtype <- self.igtype,
            verbose <- self.verbose,
            nthreads <- self.nthreads,
            error_threshold <- self.error_threshold,
            correction <- self.correction,
            quality_encoding <- self.quality_encoding,
            chunk_size <- self.chunk_size,
        );
        if self.infile.is_some() {
            options.infile = self.infile;
        }
        if self.format.is_some() {
            options.format = self.format;
        }
        if self.germline_db.is_some() {
            options.germline_db = self.germline_db;
        }
        if self.features.is_some() {
            options.features_file = self.features;
        }
        if self.clonotypes.is_some() {
            options.clonotypes_file = self.clonotypes;
        }
        options.allow_nonproductive |= self.allow_nonproductive;
        Ok(options)
    }
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> ExitCode {
    let options = match Cli::parse().options() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logger(options.verbose);
    match run_protocol(&options) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
