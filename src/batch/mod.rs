//! Batch runs: read a file of records, write the report
pub mod reader;
pub mod runner;
pub mod writer;

pub use reader::{open_source, Entry, EntrySource, Record};
pub use runner::{BatchRunner, BatchSummary};
pub use writer::{FeatureWriter, ReportWriter, RowSink};

use crate::annotate::clonotype::ClonotypeCollection;
use crate::annotate::germline::{AlignmentMatcher, GermlineMatcher};
use crate::shared::options::Options;
use crate::shared::parameters::AlignmentParameters;
use crate::shared::parser::GermlineDatabase;
use anyhow::{Context, Result};
use log::info;
use writer::{write_clonotypes, Tee};

/// Full run described by `options`: load the germline genes (if a database
/// is given), annotate and correct every record of the input, write the
/// report and the optional exports.
pub fn run_protocol(options: &Options) -> Result<BatchSummary> {
    options.validate_batch()?;
    let matcher = match &options.germline_db {
        Some(dir) => {
            let db = GermlineDatabase::load(dir, options.species, options.igtype)
                .context("Unable to load the germline database")?;
            Some(AlignmentMatcher::new(db, AlignmentParameters::default())?)
        }
        None => None,
    };
    run_with_matcher(
        options,
        matcher.as_ref().map(|m| m as &dyn GermlineMatcher),
    )
}

/// Same as `run_protocol` with a matcher built by the caller
pub fn run_with_matcher(
    options: &Options,
    matcher: Option<&dyn GermlineMatcher>,
) -> Result<BatchSummary> {
    options.validate_batch()?;
    let format = options.input_format()?;
    // validate_batch checked the input is set
    let infile = options.infile.as_deref().context("No input file")?;
    let source = open_source(infile, format)?;
    let runner = BatchRunner::new(options, matcher)?.with_progress(true);
    info!(
        "Processing {:?} ({:?}) into {:?}",
        infile, format, options.outfile
    );

    let mut report = ReportWriter::create(&options.outfile)?;
    let mut features = match &options.features_file {
        Some(path) => Some(FeatureWriter::create(path)?),
        None => None,
    };
    let mut clonotypes = options
        .clonotypes_file
        .as_ref()
        .map(|_| ClonotypeCollection::new());

    let mut sinks: Vec<&mut dyn RowSink> = vec![&mut report];
    if let Some(f) = features.as_mut() {
        sinks.push(f);
    }
    if let Some(c) = clonotypes.as_mut() {
        sinks.push(c);
    }
    let summary = runner.run(source, &mut Tee { sinks })?;

    if let (Some(path), Some(collection)) = (&options.clonotypes_file, &clonotypes) {
        write_clonotypes(path, collection)?;
        info!("{} clonotypes written to {:?}", collection.len(), path);
    }
    Ok(summary)
}
