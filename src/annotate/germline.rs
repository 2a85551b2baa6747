//! Assignment of the V, D and J germline segments of a read.
//!
//! The protocol only needs gapped alignments and their scores, it talks to
//! the matcher through [`GermlineMatcher`]. [`AlignmentMatcher`] is the
//! implementation backed by a [`GermlineDatabase`]: the V genes are screened
//! with shared k-mers, the best candidates are aligned locally, then J is
//! searched downstream of V and D in between.
use crate::shared::alignment::{AlignedPair, SegmentAlignment};
use crate::shared::gene::{has_d_segment, Gene, GeneType};
use crate::shared::parameters::AlignmentParameters;
use crate::shared::parser::GermlineDatabase;
use crate::shared::sequence::{Dna, GAP};
use anyhow::Result;
use bio::alignment::pairwise;
use itertools::Itertools;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::Range;

pub trait GermlineMatcher: Send + Sync {
    /// Segments of `read`, `None` when no V gene is found on either strand
    fn assign(&self, read: &Dna) -> Result<Option<Assignment>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
        }
    }
}

/// One germline segment aligned onto the read
#[derive(Clone, Debug)]
pub struct SegmentHit {
    pub gene: String,
    pub locus: String,
    // CDR3 anchor in gene coordinates
    pub cdr3_anchor: Option<usize>,
    pub alignment: SegmentAlignment,
    pub identity: f64,
    pub evalue: f64,
}

impl SegmentHit {
    pub fn new(gene: &Gene, alignment: SegmentAlignment, evalue: f64) -> SegmentHit {
        SegmentHit {
            gene: gene.name.clone(),
            locus: gene.locus().to_string(),
            cdr3_anchor: gene.cdr3_pos,
            identity: alignment.identity(),
            alignment,
            evalue,
        }
    }

    /// Read position of the CDR3 anchor, if it is aligned
    pub fn anchor_position(&self) -> Option<usize> {
        self.alignment.query_position(self.cdr3_anchor?)
    }

    pub fn query_range(&self) -> Range<usize> {
        self.alignment.query_start..self.alignment.query_end
    }
}

/// Segments of one read, all coordinates refer to `read`, the read in the
/// orientation of the genes.
#[derive(Clone, Debug)]
pub struct Assignment {
    pub strand: Strand,
    pub read: Dna,
    pub v: SegmentHit,
    pub d: Option<SegmentHit>,
    pub j: Option<SegmentHit>,
}

impl Assignment {
    /// Read positions covered by the assembled alignment
    pub fn covered(&self) -> Range<usize> {
        let end = self
            .j
            .as_ref()
            .map_or(self.v.alignment.query_end, |j| j.alignment.query_end);
        self.v.alignment.query_start..end
    }

    /// The whole rearrangement as one pair: V, the junction (read bases
    /// against gaps, or against D), then J.
    pub fn aligned_pair(&self) -> AlignedPair {
        let mut pair = self.v.alignment.pair.clone();
        let j = match &self.j {
            Some(j) => j,
            None => return pair,
        };
        let mut position = self.v.alignment.query_end;
        if let Some(d) = &self.d {
            self.push_untemplated(&mut pair, position, d.alignment.query_start);
            pair.extend(&d.alignment.pair);
            position = d.alignment.query_end;
        }
        self.push_untemplated(&mut pair, position, j.alignment.query_start);
        pair.extend(&j.alignment.pair);
        pair
    }

    fn push_untemplated(&self, pair: &mut AlignedPair, start: usize, end: usize) {
        for &base in self.read.seq.get(start..end).unwrap_or_default() {
            pair.push(base, GAP);
        }
    }
}

/// 2-bit encoding of the k-mers of a sequence, k-mers holding anything
/// else than ACGT are skipped.
fn kmers(seq: &[u8], k: usize) -> HashSet<u64> {
    let mut result = HashSet::new();
    if k == 0 || k > 32 || seq.len() < k {
        return result;
    }
    let mask = if k == 32 { u64::MAX } else { (1u64 << (2 * k)) - 1 };
    let (mut code, mut valid) = (0u64, 0usize);
    for &nt in seq {
        let bits = match nt {
            b'A' => 0,
            b'C' => 1,
            b'G' => 2,
            b'T' => 3,
            _ => {
                valid = 0;
                continue;
            }
        };
        code = ((code << 2) | bits) & mask;
        valid += 1;
        if valid >= k {
            result.insert(code);
        }
    }
    result
}

pub struct AlignmentMatcher {
    db: GermlineDatabase,
    params: AlignmentParameters,
    lambda: f64,
    // k-mer -> V genes containing it
    v_index: HashMap<u64, Vec<usize>>,
}

impl AlignmentMatcher {
    pub fn new(db: GermlineDatabase, params: AlignmentParameters) -> Result<AlignmentMatcher> {
        let lambda = params.karlin_lambda()?;
        let mut v_index: HashMap<u64, Vec<usize>> = HashMap::new();
        for (idx, gene) in db.v_genes.iter().enumerate() {
            for kmer in kmers(&gene.seq.seq, params.kmer_size) {
                v_index.entry(kmer).or_default().push(idx);
            }
        }
        Ok(AlignmentMatcher {
            db,
            params,
            lambda,
            v_index,
        })
    }

    pub fn database(&self) -> &GermlineDatabase {
        &self.db
    }

    /// V genes sharing the most k-mers with the sequence
    fn v_candidates(&self, seq: &[u8]) -> Vec<usize> {
        let mut shared: HashMap<usize, usize> = HashMap::new();
        for kmer in kmers(seq, self.params.kmer_size) {
            for &idx in self.v_index.get(&kmer).into_iter().flatten() {
                *shared.entry(idx).or_default() += 1;
            }
        }
        shared
            .into_iter()
            .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)))
            .take(self.params.max_candidates)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Best local alignment of a set of genes on `query`, which starts at
    /// read position `offset`.
    fn best_hit<'a>(
        &self,
        genes: impl Iterator<Item = &'a Gene>,
        query: &[u8],
        offset: usize,
        gene_type: GeneType,
    ) -> Option<SegmentHit> {
        let (min_score, max_evalue) = match gene_type {
            GeneType::V => (self.params.min_score_v, self.params.max_evalue_v),
            GeneType::D => (self.params.min_score_d, self.params.max_evalue_d),
            GeneType::J => (self.params.min_score_j, self.params.max_evalue_j),
        };
        let library = self.db.library_length(gene_type);
        let mut best: Option<(&Gene, bio::alignment::Alignment)> = None;
        for gene in genes {
            let mut aligner = pairwise::Aligner::with_capacity_and_scoring(
                query.len(),
                gene.seq.len(),
                self.params.get_scoring_local(),
            );
            let al = aligner.custom(query, &gene.seq.seq);
            // ties keep the first gene of the library
            if al.score >= min_score && best.as_ref().map_or(true, |(_, b)| al.score > b.score) {
                best = Some((gene, al));
            }
        }
        let (gene, al) = best?;
        let evalue = self
            .params
            .evalue(self.lambda, al.score, query.len(), library);
        if evalue > max_evalue {
            return None;
        }
        let alignment = SegmentAlignment::from_alignment(query, &gene.seq.seq, &al, offset);
        Some(SegmentHit::new(gene, alignment, evalue))
    }

    fn assign_v(&self, seq: &Dna) -> Option<SegmentHit> {
        let candidates = self.v_candidates(&seq.seq);
        self.best_hit(
            candidates.iter().map(|&idx| &self.db.v_genes[idx]),
            &seq.seq,
            0,
            GeneType::V,
        )
    }

    fn assign_j(&self, seq: &Dna, v: &SegmentHit) -> Option<SegmentHit> {
        let v_end = v.alignment.query_end;
        let start = v_end.saturating_sub(self.params.j_overlap);
        if start >= seq.len() {
            return None;
        }
        let genes = self
            .db
            .j_genes
            .iter()
            .filter(|g| g.locus() == v.locus);
        let hit = self.best_hit(genes, &seq.seq[start..], start, GeneType::J)?;
        // V keeps the overlapping bases
        let alignment = hit.alignment.clip_query_start(v_end)?;
        Some(SegmentHit {
            identity: alignment.identity(),
            alignment,
            ..hit
        })
    }

    fn assign_d(&self, seq: &Dna, v: &SegmentHit, j: &SegmentHit) -> Option<SegmentHit> {
        let (start, end) = (v.alignment.query_end, j.alignment.query_start);
        if start >= end || !has_d_segment(&v.locus) {
            return None;
        }
        let genes = self
            .db
            .d_genes
            .iter()
            .filter(|g| g.locus() == v.locus);
        self.best_hit(genes, &seq.seq[start..end], start, GeneType::D)
    }
}

impl GermlineMatcher for AlignmentMatcher {
    fn assign(&self, read: &Dna) -> Result<Option<Assignment>> {
        let reverse = read.reverse_complement();
        let forward_hit = self.assign_v(read);
        let reverse_hit = self.assign_v(&reverse);

        let (strand, seq, v) = match (forward_hit, reverse_hit) {
            (Some(f), Some(r)) if r.alignment.score > f.alignment.score => {
                (Strand::Reverse, reverse, r)
            }
            (Some(f), _) => (Strand::Forward, read.clone(), f),
            (None, Some(r)) => (Strand::Reverse, reverse, r),
            (None, None) => return Ok(None),
        };

        let j = self.assign_j(&seq, &v);
        let d = j.as_ref().and_then(|j| self.assign_d(&seq, &v, j));
        Ok(Some(Assignment {
            strand,
            read: seq,
            v,
            d,
            j,
        }))
    }
}
