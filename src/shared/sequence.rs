/// Nucleotide and amino-acid sequences, translation with the standard code
use anyhow::{anyhow, Result};
use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::fmt;

static DNA_TO_AMINO: phf::Map<&'static str, u8> = phf_map! {
    "TTT" => b'F', "TTC" => b'F', "TTA" => b'L', "TTG" => b'L', "TCT" => b'S', "TCC" => b'S',
    "TCA" => b'S', "TCG" => b'S', "TAT" => b'Y', "TAC" => b'Y', "TAA" => b'*', "TAG" => b'*',
    "TGT" => b'C', "TGC" => b'C', "TGA" => b'*', "TGG" => b'W', "CTT" => b'L', "CTC" => b'L',
    "CTA" => b'L', "CTG" => b'L', "CCT" => b'P', "CCC" => b'P', "CCA" => b'P', "CCG" => b'P',
    "CAT" => b'H', "CAC" => b'H', "CAA" => b'Q', "CAG" => b'Q', "CGT" => b'R', "CGC" => b'R',
    "CGA" => b'R', "CGG" => b'R', "ATT" => b'I', "ATC" => b'I', "ATA" => b'I', "ATG" => b'M',
    "ACT" => b'T', "ACC" => b'T', "ACA" => b'T', "ACG" => b'T', "AAT" => b'N', "AAC" => b'N',
    "AAA" => b'K', "AAG" => b'K', "AGT" => b'S', "AGC" => b'S', "AGA" => b'R', "AGG" => b'R',
    "GTT" => b'V', "GTC" => b'V', "GTA" => b'V', "GTG" => b'V', "GCT" => b'A', "GCC" => b'A',
    "GCA" => b'A', "GCG" => b'A', "GAT" => b'D', "GAC" => b'D', "GAA" => b'E', "GAG" => b'E',
    "GGT" => b'G', "GGC" => b'G', "GGA" => b'G', "GGG" => b'G'
};

/// Amino-acid emitted for codons that cannot be read (N, gaps, partial codons)
pub const UNKNOWN_AMINO_ACID: u8 = b'X';
pub const STOP_CODON: u8 = b'*';
pub const GAP: u8 = b'-';

// The nucleotides accepted in a read (IUPAC codes other than N are tolerated
// but never compared as bases)
pub const NUCLEOTIDES: [u8; 15] = [
    b'A', b'C', b'G', b'T', b'N', b'R', b'Y', b'S', b'W', b'K', b'M', b'B', b'D', b'H', b'V',
];

static COMPLEMENT: phf::Map<u8, u8> = phf_map! {
    b'A' => b'T', b'T' => b'A', b'G' => b'C', b'C' => b'G', b'N' => b'N',
    b'R' => b'Y', b'Y' => b'R', b'S' => b'S', b'W' => b'W', b'K' => b'M',
    b'M' => b'K', b'B' => b'V', b'D' => b'H', b'H' => b'D', b'V' => b'B',
    b'-' => b'-',
};

/// True for the four unambiguous bases
pub fn is_base(n: u8) -> bool {
    matches!(n, b'A' | b'C' | b'G' | b'T')
}

#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct Dna {
    pub seq: Vec<u8>,
}

#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct AminoAcid {
    pub seq: Vec<u8>,
}

impl fmt::Display for Dna {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.seq))
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.seq))
    }
}

impl Dna {
    /// Read a nucleotide string, lowercase letters are accepted.
    pub fn from_string(s: &str) -> Result<Dna> {
        let seq = s.trim().as_bytes().to_ascii_uppercase();
        if let Some(&byte) = seq.iter().find(|b| !NUCLEOTIDES.contains(b)) {
            return Err(anyhow!("Invalid nucleotide '{}'", byte as char));
        }
        Ok(Dna { seq })
    }

    pub fn get_string(&self) -> String {
        self.to_string()
    }

    /// Translate starting `offset` nucleotides into the sequence, the
    /// trailing partial codon is dropped.
    ///```
    /// use igcorrect::Dna;
    ///let a = Dna::from_string("GATGCTNCATAAG").unwrap();
    ///assert_eq!(a.translate_frame(0).to_string(), "DAX*");
    ///assert_eq!(a.translate_frame(1).to_string(), "MXHK");
    ///assert_eq!(a.translate_frame(2).to_string(), "CXI");
    ///```
    pub fn translate_frame(&self, offset: usize) -> AminoAcid {
        if offset >= self.seq.len() {
            return AminoAcid::default();
        }
        let usable = (self.seq.len() - offset) / 3 * 3;
        translate_codons(&self.seq[offset..offset + usable])
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn reverse_complement(&self) -> Dna {
        Dna {
            seq: self
                .seq
                .iter()
                .map(|x| COMPLEMENT.get(x).copied().unwrap_or(b'N'))
                .rev()
                .collect(),
        }
    }

    pub fn extract_subsequence(&self, start: usize, end: usize) -> Dna {
        // Return dna[start:end]
        Dna {
            seq: self.seq[start..end].to_vec(),
        }
    }
}

fn translate_codons(seq: &[u8]) -> AminoAcid {
    let amino_sequence: Vec<u8> = seq
        .chunks_exact(3)
        .map(|codon| {
            std::str::from_utf8(codon)
                .ok()
                .and_then(|c| DNA_TO_AMINO.get(c).copied())
                .unwrap_or(UNKNOWN_AMINO_ACID)
        })
        .collect();
    AminoAcid {
        seq: amino_sequence,
    }
}

impl AminoAcid {
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn has_stop(&self) -> bool {
        self.seq.contains(&STOP_CODON)
    }
}
