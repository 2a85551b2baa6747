//! Sinks of a batch run: the annotation report, the per-base features and
//! the clonotype summary.
use crate::annotate::clonotype::ClonotypeCollection;
use crate::annotate::report::{AnnotationResult, HEADER};
use crate::correct::BaseContext;
use anyhow::{Context, Result};
use csv::{QuoteStyle, Writer, WriterBuilder};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Receives the rows of a run, in input order
pub trait RowSink {
    fn write_result(&mut self, result: &AnnotationResult) -> Result<()>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl RowSink for Vec<AnnotationResult> {
    fn write_result(&mut self, result: &AnnotationResult) -> Result<()> {
        self.push(result.clone());
        Ok(())
    }
}

fn tab_writer<W: Write>(writer: W) -> Writer<W> {
    WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Never)
        .from_writer(writer)
}

fn create(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("Unable to create {:?}", path))
}

/// Tab separated report, one header line then one line per record
pub struct ReportWriter<W: Write> {
    writer: Writer<W>,
}

impl ReportWriter<File> {
    pub fn create(path: &Path) -> Result<ReportWriter<File>> {
        ReportWriter::new(create(path)?)
    }
}

impl<W: Write> ReportWriter<W> {
    pub fn new(writer: W) -> Result<ReportWriter<W>> {
        let mut writer = tab_writer(writer);
        writer.write_record(HEADER)?;
        Ok(ReportWriter { writer })
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Unable to flush the report: {}", e.error()))
    }
}

impl<W: Write> RowSink for ReportWriter<W> {
    fn write_result(&mut self, result: &AnnotationResult) -> Result<()> {
        self.writer.write_record(result.to_row())?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct FeatureRow<'a> {
    id: &'a str,
    position: usize,
    observed: char,
    germline: char,
    phred: Option<u8>,
    quality_error: f64,
    local_columns: usize,
    local_mismatches: usize,
    local_rate: f64,
    global_rate: f64,
    error_probability: f64,
}

impl<'a> FeatureRow<'a> {
    fn new(id: &'a str, c: &BaseContext) -> FeatureRow<'a> {
        FeatureRow {
            id,
            position: c.position,
            observed: c.observed,
            germline: c.germline,
            phred: c.phred,
            quality_error: c.quality_error,
            local_columns: c.local_columns,
            local_mismatches: c.local_mismatches,
            local_rate: c.local_rate,
            global_rate: c.global_rate,
            error_probability: c.error_probability,
        }
    }
}

/// Csv export of the quantities behind every predicted error
pub struct FeatureWriter<W: Write> {
    writer: Writer<W>,
}

impl FeatureWriter<File> {
    pub fn create(path: &Path) -> Result<FeatureWriter<File>> {
        Ok(FeatureWriter::new(create(path)?))
    }
}

impl<W: Write> FeatureWriter<W> {
    pub fn new(writer: W) -> FeatureWriter<W> {
        FeatureWriter {
            writer: Writer::from_writer(writer),
        }
    }
}

impl<W: Write> RowSink for FeatureWriter<W> {
    fn write_result(&mut self, result: &AnnotationResult) -> Result<()> {
        for context in &result.contexts {
            self.writer.serialize(FeatureRow::new(&result.id, context))?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Sends every row to all the sinks
pub struct Tee<'a> {
    pub sinks: Vec<&'a mut dyn RowSink>,
}

impl RowSink for Tee<'_> {
    fn write_result(&mut self, result: &AnnotationResult) -> Result<()> {
        for sink in self.sinks.iter_mut() {
            sink.write_result(result)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        for sink in self.sinks.iter_mut() {
            sink.finish()?;
        }
        Ok(())
    }
}

impl RowSink for ClonotypeCollection {
    fn write_result(&mut self, result: &AnnotationResult) -> Result<()> {
        self.add(result);
        Ok(())
    }
}

pub fn write_clonotypes(path: &Path, clonotypes: &ClonotypeCollection) -> Result<()> {
    let mut writer = tab_writer(create(path)?);
    writer.write_record(["V_gene", "J_gene", "CDR3_AA_sequence", "count"])?;
    for group in clonotypes.sorted() {
        writer.write_record([
            group.v_gene.as_str(),
            group.j_gene.as_str(),
            group.cdr3_aa.as_str(),
            group.count.to_string().as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
