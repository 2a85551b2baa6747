//! One output row per record
use crate::annotate::germline::{SegmentHit, Strand};
use crate::correct::BaseContext;
use std::fmt::Display;

pub const NOT_AVAILABLE: &str = "N/A";

pub const HEADER: [&str; 22] = [
    "SequenceID",
    "V_gene",
    "V_identity",
    "V_Evalue",
    "D_gene",
    "D_identity",
    "D_Evalue",
    "J_gene",
    "J_identity",
    "J_Evalue",
    "Strand",
    "Chain",
    "Productive",
    "CDR3_NT_sequence",
    "CDR3_AA_sequence",
    "Full_NT_sequence",
    "Full_GL_NT_sequence",
    "PHRED_scores",
    "Full_AA_sequence",
    "Full_NT_sequence_corrected",
    "Full_AA_sequence_corrected",
    "N_errors",
];

#[derive(Clone, Debug, PartialEq)]
pub struct GeneCall {
    pub name: String,
    pub identity: f64,
    pub evalue: f64,
}

impl From<&SegmentHit> for GeneCall {
    fn from(hit: &SegmentHit) -> GeneCall {
        GeneCall {
            name: hit.gene.clone(),
            identity: hit.identity,
            evalue: hit.evalue,
        }
    }
}

/// Everything known about a record. Each field is filled independently,
/// `None` is written as N/A.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnnotationResult {
    pub id: String,
    pub v: Option<GeneCall>,
    pub d: Option<GeneCall>,
    pub j: Option<GeneCall>,
    pub strand: Option<Strand>,
    pub chain: Option<String>,
    pub productive: Option<bool>,
    pub cdr3_nt: Option<String>,
    pub cdr3_aa: Option<String>,
    pub full_nt: Option<String>,
    pub full_gl: Option<String>,
    pub phred: Option<String>,
    pub full_aa: Option<String>,
    pub corrected_nt: Option<String>,
    pub corrected_aa: Option<String>,
    pub n_errors: Option<usize>,
    // only filled when the per-base export is requested
    pub contexts: Vec<BaseContext>,
}

impl AnnotationResult {
    /// Row of a record that could not be processed: only the id survives
    pub fn degraded(id: &str) -> AnnotationResult {
        AnnotationResult {
            id: id.to_string(),
            ..Default::default()
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        let mut row = Vec::with_capacity(HEADER.len());
        row.push(self.id.clone());
        for call in [&self.v, &self.d, &self.j] {
            row.push(or_na(call.as_ref().map(|c| &c.name)));
            row.push(or_na(call.as_ref().map(|c| format!("{:.2}", c.identity))));
            row.push(or_na(call.as_ref().map(|c| format!("{:.2E}", c.evalue))));
        }
        row.push(or_na(self.strand));
        row.push(or_na(self.chain.as_ref()));
        row.push(or_na(
            self.productive
                .map(|p| if p { "True" } else { "False" }),
        ));
        for field in [
            &self.cdr3_nt,
            &self.cdr3_aa,
            &self.full_nt,
            &self.full_gl,
            &self.phred,
            &self.full_aa,
            &self.corrected_nt,
            &self.corrected_aa,
        ] {
            row.push(or_na(field.as_ref()));
        }
        row.push(or_na(self.n_errors));
        row
    }
}

fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}
