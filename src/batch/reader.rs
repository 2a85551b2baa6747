//! Record sources: tab separated pre-aligned records and FASTQ reads
use crate::shared::errors::ConfigError;
use crate::shared::options::InputFormat;
use anyhow::{anyhow, Result};
use bio::io::fastq;
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Number of tab separated fields of a TSV record:
/// id, sequence, germline, phred
pub const TSV_FIELDS: usize = 4;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub sequence: String,
    pub quality: String,
    // pre-aligned germline, when the input carries one
    pub germline: Option<String>,
}

/// What the sources yield: malformed lines keep their slot in the output
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    Record(Record),
    Malformed { id: String, reason: String },
}

impl Entry {
    pub fn id(&self) -> &str {
        match self {
            Entry::Record(r) => &r.id,
            Entry::Malformed { id, .. } => id,
        }
    }
}

impl From<Record> for Entry {
    fn from(record: Record) -> Entry {
        Entry::Record(record)
    }
}

pub type EntrySource = Box<dyn Iterator<Item = Result<Entry>> + Send>;

/// Open the input of a run
pub fn open_source(path: &Path, format: InputFormat) -> Result<EntrySource> {
    let file = File::open(path).map_err(|_| ConfigError::unreadable_input(path))?;
    Ok(match format {
        InputFormat::Tsv => tsv_entries(file),
        InputFormat::Fastq => fastq_entries(file),
    })
}

pub fn tsv_entries<R: Read + Send + 'static>(reader: R) -> EntrySource {
    let rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);
    Box::new(
        rdr.into_records()
            .enumerate()
            .map(|(line, result)| match result {
                Ok(record) => Ok(parse_tsv_record(&record, line + 1)),
                Err(e) if e.is_io_error() => Err(anyhow!("Error reading the input: {}", e)),
                Err(e) => Ok(Entry::Malformed {
                    id: format!("line_{}", line + 1),
                    reason: e.to_string(),
                }),
            }),
    )
}

fn parse_tsv_record(record: &StringRecord, line: usize) -> Entry {
    let id = record
        .get(0)
        .filter(|s| !s.is_empty())
        .map_or_else(|| format!("line_{}", line), |s| s.to_string());
    if record.len() != TSV_FIELDS {
        return Entry::Malformed {
            id,
            reason: format!("expected {} fields, found {}", TSV_FIELDS, record.len()),
        };
    }
    let germline = record[2].trim();
    Entry::Record(Record {
        id,
        sequence: record[1].trim().to_ascii_uppercase(),
        germline: if germline.is_empty() || germline == "N/A" {
            None
        } else {
            Some(germline.to_ascii_uppercase())
        },
        quality: record[3].trim_end_matches(['\r', '\n']).to_string(),
    })
}

/// FASTQ reads. A broken record after the first one becomes a malformed
/// entry, a file that does not start with a record is an error.
pub fn fastq_entries<R: Read + Send + 'static>(reader: R) -> EntrySource {
    Box::new(
        fastq::Reader::new(reader)
            .records()
            .enumerate()
            .map(|(index, result)| match result {
                Ok(record) => Ok(Entry::Record(Record {
                    id: record.id().to_string(),
                    sequence: String::from_utf8_lossy(record.seq()).to_ascii_uppercase(),
                    quality: String::from_utf8_lossy(record.qual()).into_owned(),
                    germline: None,
                })),
                Err(e @ fastq::Error::ReadError(_)) | Err(e @ fastq::Error::FileOpen { .. }) => {
                    Err(anyhow!("Error reading the fastq input: {}", e))
                }
                Err(e) if index == 0 => Err(anyhow!("Invalid fastq input: {}", e)),
                Err(e) => Ok(Entry::Malformed {
                    id: format!("record_{}", index + 1),
                    reason: e.to_string(),
                }),
            }),
    )
}
