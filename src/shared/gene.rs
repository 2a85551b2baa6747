//! Deal with V/D/J gene names and gene representations
use crate::shared::sequence::Dna;
use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static IMGT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(TCRB|TCRA|TCRG|TCRD|TRB|TRA|IGH|IGK|IGL|TRG|TRD)(V|D|J)([\w/]+)?(:?-([\w/-]*))?(?:\*(\d*))?",
    )
    .unwrap()
});

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneType {
    V,
    D,
    J,
}

impl fmt::Display for GeneType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            GeneType::V => "V",
            GeneType::D => "D",
            GeneType::J => "J",
        };
        write!(f, "{}", s)
    }
}

/// A germline gene of the database
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    pub name: String,
    // CDR3 anchor in gene coordinates: first base of the conserved cysteine
    // codon for V genes, of the F/W codon for J genes
    pub cdr3_pos: Option<usize>,
    // IMGT functionality label (F, ORF, P, ...)
    pub functional: String,
    pub seq: Dna,
    pub imgt: ImgtRepresentation,
}

fn is_functional_label(label: &str) -> bool {
    matches!(label, "F" | "(F)")
}

impl Gene {
    pub fn new(
        name: String,
        cdr3_pos: Option<usize>,
        functional: String,
        seq: Dna,
    ) -> Result<Gene> {
        let imgt = get_imgt_representation(&name)
            .with_context(|| format!("{} is not an IMGT gene name (e.g. IGHV1-2*02)", name))?;
        Ok(Gene {
            name,
            cdr3_pos,
            functional,
            seq,
            imgt,
        })
    }

    pub fn is_functional(&self) -> bool {
        is_functional_label(&self.functional)
    }

    pub fn set_functional(&mut self, label: String) {
        self.functional = label;
    }

    /// IMGT locus of the gene, e.g. "IGH"
    pub fn locus(&self) -> &str {
        &self.imgt.chain
    }

    pub fn gene_type(&self) -> Option<GeneType> {
        match self.imgt.gene_type.as_str() {
            "V" => Some(GeneType::V),
            "D" => Some(GeneType::D),
            "J" => Some(GeneType::J),
            _ => None,
        }
    }
}

/// The fields of an IMGT gene name, `IGHV3-23*01` reads as chain `IGH`,
/// type `V`, subgroup `3`, position `23`, allele 1.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImgtRepresentation {
    pub chain: String,
    pub gene_type: String,
    // subgroup, may hold orphon or shared names ("3/OR2", "14/DV14")
    pub gene_id: Option<String>,
    // position in the locus, "1-1" or "1D" style suffixes included
    pub gene_position: Option<String>,
    pub allele_index: Option<i32>,
}

/// Chain type reported for a locus (VH for heavy chains, VK/VL for light
/// chains, VA/VB/VG/VD for T-cell receptors)
///```
/// use igcorrect::shared::gene::chain_label;
///assert_eq!(chain_label("IGH"), Some("VH"));
///assert_eq!(chain_label("TRB"), Some("VB"));
///assert_eq!(chain_label("XYZ"), None);
///```
pub fn chain_label(locus: &str) -> Option<&'static str> {
    match locus {
        "IGH" => Some("VH"),
        "IGK" => Some("VK"),
        "IGL" => Some("VL"),
        "TRA" => Some("VA"),
        "TRB" => Some("VB"),
        "TRG" => Some("VG"),
        "TRD" => Some("VD"),
        _ => None,
    }
}

/// True for the loci that carry D genes
pub fn has_d_segment(locus: &str) -> bool {
    matches!(locus, "IGH" | "TRB" | "TRD")
}

pub fn get_imgt_representation(name: &str) -> Result<ImgtRepresentation> {
    let g = IMGT_NAME
        .captures(name)
        .ok_or_else(|| anyhow!("Invalid gene name {}", name))?;

    // older TCR names spell the locus TCRx
    let chain = match g.get(1).map_or("", |m| m.as_str()) {
        "TCRB" => "TRB",
        "TCRA" => "TRA",
        "TCRG" => "TRG",
        "TCRD" => "TRD",
        other => other,
    };
    let gene_type = g.get(2).map_or_else(String::new, |m| m.as_str().to_string());
    let gene_id = g.get(3).map(|m| m.as_str().to_string());
    let gene_position = g.get(5).map(|m| m.as_str().to_string());
    let allele_index = g.get(6).and_then(|m| m.as_str().parse::<i32>().ok());

    Ok(ImgtRepresentation {
        chain: chain.to_string(),
        gene_type,
        gene_id,
        gene_position,
        allele_index,
    })
}
