//! Annotation and correction of one record.
//!
//! The germline used for the correction is, by order of preference:
//! - the germline supplied with the record (aligned to the whole read),
//! - the V(D)J assembly of the germline matcher (covering V start to J end).
//!
//! Without either, the correction fields stay empty. Each field of the
//! result is filled on its own: a read without J still gets its V call and
//! its correction.
use crate::annotate::germline::{Assignment, GermlineMatcher, Strand};
use crate::annotate::junction::{window_frame, Junction};
use crate::annotate::report::{AnnotationResult, GeneCall};
use crate::batch::reader::{Entry, Record};
use crate::correct::{correct, count_corrections, ErrorModel, ErrorProfile};
use crate::shared::alignment::AlignedPair;
use crate::shared::errors::{RecordError, MIN_SEQUENCE_LENGTH};
use crate::shared::gene::chain_label;
use crate::shared::options::Options;
use crate::shared::parameters::AlignmentParameters;
use crate::shared::sequence::Dna;
use log::debug;

/// Read bases to correct, with their quality and reading frame
struct Window {
    pair: AlignedPair,
    quality: Vec<u8>,
    // frame offset of the first base, unknown without a V call
    frame: Option<usize>,
}

pub struct AnnotationProtocol<'a> {
    options: &'a Options,
    matcher: Option<&'a dyn GermlineMatcher>,
    model: ErrorModel,
    params: AlignmentParameters,
    collect_contexts: bool,
}

impl<'a> AnnotationProtocol<'a> {
    pub fn new(options: &'a Options, matcher: Option<&'a dyn GermlineMatcher>) -> Self {
        AnnotationProtocol {
            options,
            matcher,
            model: ErrorModel::from_options(options),
            params: AlignmentParameters::default(),
            collect_contexts: options.features_file.is_some(),
        }
    }

    pub fn with_parameters(mut self, params: AlignmentParameters) -> Self {
        self.params = params;
        self
    }

    pub fn model(&self) -> &ErrorModel {
        &self.model
    }

    /// Never fails: a record that cannot be processed gives an N/A row.
    pub fn process(&self, entry: &Entry) -> AnnotationResult {
        self.annotate(entry).unwrap_or_else(|e| {
            debug!("Record {} not annotated: {}", entry.id(), e);
            AnnotationResult::degraded(entry.id())
        })
    }

    pub fn annotate(&self, entry: &Entry) -> Result<AnnotationResult, RecordError> {
        let record = match entry {
            Entry::Record(record) => record,
            Entry::Malformed { reason, .. } => return Err(RecordError::Malformed(reason.clone())),
        };
        if record.quality.len() != record.sequence.len() {
            return Err(RecordError::quality_length(
                record.sequence.len(),
                record.quality.len(),
            ));
        }
        let read = Dna::from_string(&record.sequence)
            .map_err(|e| RecordError::InvalidSequence(e.to_string()))?;

        let assignment = match self.matcher {
            Some(matcher) => matcher.assign(&read).map_err(RecordError::alignment)?,
            None => None,
        };
        let junction = assignment.as_ref().map(Junction::new);

        let mut result = AnnotationResult {
            id: record.id.clone(),
            productive: Some(false),
            ..Default::default()
        };
        if let (Some(a), Some(jn)) = (&assignment, &junction) {
            result.v = Some(GeneCall::from(&a.v));
            result.d = a.d.as_ref().map(GeneCall::from);
            result.j = a.j.as_ref().map(GeneCall::from);
            result.strand = Some(a.strand);
            result.chain = chain_label(&a.v.locus).map(str::to_string);
            result.productive = Some(jn.productive);
            result.cdr3_nt = jn.cdr3_nt.as_ref().map(Dna::get_string);
            result.cdr3_aa = jn.cdr3_aa.as_ref().map(|aa| aa.to_string());
        }

        let window = match self.window(record, &read, assignment.as_ref(), junction.as_ref())? {
            Some(window) => window,
            None => return Ok(result),
        };
        let observed = window.pair.ungapped_observed();
        if observed.len() < MIN_SEQUENCE_LENGTH {
            return Err(RecordError::TooShort(observed.len()));
        }
        let translate = |seq: &[u8]| {
            window
                .frame
                .map(|f| Dna { seq: seq.to_vec() }.translate_frame(f).to_string())
        };
        result.full_nt = Some(String::from_utf8_lossy(&observed).into_owned());
        result.full_gl = Some(String::from_utf8_lossy(&window.pair.projected_germline()).into_owned());
        result.phred = Some(String::from_utf8_lossy(&window.quality).into_owned());
        result.full_aa = translate(&observed);

        if assignment.is_some()
            && result.productive != Some(true)
            && !self.options.allow_nonproductive
        {
            return Ok(result);
        }

        let contexts = self.model.contexts(&window.pair, &window.quality)?;
        let profile = ErrorProfile::new(contexts.iter().map(|c| c.error_probability).collect());
        let corrected = correct(
            &observed,
            &profile,
            self.options.error_threshold,
            self.options.correction_symbol(),
        )
        .map_err(|_| RecordError::quality_length(observed.len(), profile.len()))?;

        result.corrected_aa = translate(&corrected);
        result.corrected_nt = Some(String::from_utf8_lossy(&corrected).into_owned());
        result.n_errors = Some(count_corrections(&profile, self.options.error_threshold));
        if self.collect_contexts {
            result.contexts = contexts;
        }
        Ok(result)
    }

    fn window(
        &self,
        record: &Record,
        read: &Dna,
        assignment: Option<&Assignment>,
        junction: Option<&Junction>,
    ) -> Result<Option<Window>, RecordError> {
        if let Some(germline) = &record.germline {
            let pair = AlignedPair::resolve(&read.seq, germline.as_bytes(), &self.params)
                .map_err(RecordError::alignment)?;
            // the supplied germline follows the read as given
            let frame = match (assignment, junction) {
                (Some(a), Some(jn)) if a.strand == Strand::Forward => Some(window_frame(jn.frame, 0)),
                _ => None,
            };
            return Ok(Some(Window {
                pair,
                quality: record.quality.as_bytes().to_vec(),
                frame,
            }));
        }

        let (a, jn) = match (assignment, junction) {
            (Some(a), Some(jn)) => (a, jn),
            _ => return Ok(None),
        };
        let mut quality = record.quality.as_bytes().to_vec();
        if a.strand == Strand::Reverse {
            quality.reverse();
        }
        let covered = a.covered();
        Ok(Some(Window {
            pair: a.aligned_pair(),
            quality: quality[covered.clone()].to_vec(),
            frame: Some(window_frame(jn.frame, covered.start)),
        }))
    }
}
