//! Gapped alignments between a read and its germline.
//!
//! Everything downstream of the germline matcher works on [`AlignedPair`]:
//! two equal-length rows where `-` marks a gap. Example:
//!
//! ```text
//! observed: ACGTTAC-GA
//! germline: ACCTTACTG-
//!             ^    ^ ^-- insertion in the read (scored with quality only)
//!             |    +---- deletion in the read (no quality, skipped)
//!             +--------- mismatch
//! ```
use crate::shared::parameters::AlignmentParameters;
use crate::shared::sequence::{is_base, GAP};
use anyhow::{anyhow, Result};
use bio::alignment::{pairwise, Alignment, AlignmentOperation};

#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct AlignedPair {
    observed: Vec<u8>,
    germline: Vec<u8>,
}

impl AlignedPair {
    pub fn new(observed: Vec<u8>, germline: Vec<u8>) -> Result<AlignedPair> {
        if observed.len() != germline.len() {
            return Err(anyhow!(
                "Aligned sequences differ in length ({} vs {})",
                observed.len(),
                germline.len()
            ));
        }
        Ok(AlignedPair {
            observed: observed.to_ascii_uppercase(),
            germline: germline.to_ascii_uppercase(),
        })
    }

    /// Build the pair for an observed sequence and its germline. Rows of the
    /// same length are taken as already aligned column by column, anything
    /// else goes through a read-to-germline alignment.
    pub fn resolve(
        observed: &[u8],
        germline: &[u8],
        params: &AlignmentParameters,
    ) -> Result<AlignedPair> {
        if observed.len() == germline.len() {
            return AlignedPair::new(observed.to_vec(), germline.to_vec());
        }
        let observed = observed.to_ascii_uppercase();
        // the germline may carry alignment gaps from an upstream tool
        let germline: Vec<u8> = germline
            .iter()
            .filter(|&&c| c != GAP)
            .map(|c| c.to_ascii_uppercase())
            .collect();
        if germline.is_empty() {
            return Err(anyhow!("Empty germline sequence"));
        }
        let mut aligner = pairwise::Aligner::with_capacity_and_scoring(
            observed.len(),
            germline.len(),
            params.get_scoring_read_to_germline(),
        );
        let alignment = aligner.custom(&observed, &germline);
        Ok(AlignedPair::from_alignment(&observed, &germline, &alignment))
    }

    /// Expand a bio alignment (x = observed, y = germline) over its aligned
    /// range.
    pub fn from_alignment(observed: &[u8], germline: &[u8], al: &Alignment) -> AlignedPair {
        let mut pair = AlignedPair::default();
        let (mut xi, mut yi) = (al.xstart, al.ystart);
        for op in &al.operations {
            match op {
                AlignmentOperation::Match | AlignmentOperation::Subst => {
                    pair.push(observed[xi], germline[yi]);
                    xi += 1;
                    yi += 1;
                }
                AlignmentOperation::Ins => {
                    pair.push(observed[xi], GAP);
                    xi += 1;
                }
                AlignmentOperation::Del => {
                    pair.push(GAP, germline[yi]);
                    yi += 1;
                }
                // clipped ends are already accounted for by xstart/ystart
                AlignmentOperation::Xclip(_) | AlignmentOperation::Yclip(_) => {}
            }
        }
        pair
    }

    pub fn push(&mut self, observed: u8, germline: u8) {
        self.observed.push(observed);
        self.germline.push(germline);
    }

    pub fn extend(&mut self, other: &AlignedPair) {
        self.observed.extend_from_slice(&other.observed);
        self.germline.extend_from_slice(&other.germline);
    }

    pub fn observed(&self) -> &[u8] {
        &self.observed
    }

    pub fn germline(&self) -> &[u8] {
        &self.germline
    }

    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.observed
            .iter()
            .copied()
            .zip(self.germline.iter().copied())
    }

    /// The read without the deletion columns
    pub fn ungapped_observed(&self) -> Vec<u8> {
        self.observed.iter().copied().filter(|&c| c != GAP).collect()
    }

    /// The germline row restricted to the columns that carry a read base,
    /// so that it can be displayed position by position under the read.
    pub fn projected_germline(&self) -> Vec<u8> {
        self.columns()
            .filter(|&(o, _)| o != GAP)
            .map(|(_, g)| g)
            .collect()
    }

    /// Number of columns comparing two real bases
    pub fn comparable_columns(&self) -> usize {
        self.columns().filter(|&(o, g)| comparable(o, g)).count()
    }

    pub fn mismatches(&self) -> usize {
        self.columns()
            .filter(|&(o, g)| comparable(o, g) && o != g)
            .count()
    }
}

/// A column whose two sides are real bases
#[inline]
pub fn comparable(observed: u8, germline: u8) -> bool {
    is_base(observed) && is_base(germline)
}

/// Alignment of one germline segment onto a window of the read
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentAlignment {
    // read coordinates, end excluded
    pub query_start: usize,
    pub query_end: usize,
    // gene coordinates, end excluded
    pub gene_start: usize,
    pub gene_end: usize,
    pub score: i32,
    pub pair: AlignedPair,
}

impl SegmentAlignment {
    /// `offset` is the read position of `query[0]`.
    pub fn from_alignment(query: &[u8], gene: &[u8], al: &Alignment, offset: usize) -> Self {
        SegmentAlignment {
            query_start: offset + al.xstart,
            query_end: offset + al.xend,
            gene_start: al.ystart,
            gene_end: al.yend,
            score: al.score,
            pair: AlignedPair::from_alignment(query, gene, al),
        }
    }

    /// Percent identity over the columns without gap
    pub fn identity(&self) -> f64 {
        let (matches, columns) = self
            .pair
            .columns()
            .filter(|&(o, g)| o != GAP && g != GAP)
            .fold((0usize, 0usize), |(m, c), (o, g)| {
                (m + usize::from(o == g), c + 1)
            });
        if columns == 0 {
            return 0.;
        }
        100. * matches as f64 / columns as f64
    }

    /// Read position aligned to the gene position `gene_pos`, if that gene
    /// base is aligned to a read base.
    pub fn query_position(&self, gene_pos: usize) -> Option<usize> {
        let (mut qi, mut gi) = (self.query_start, self.gene_start);
        for (o, g) in self.pair.columns() {
            if g != GAP && gi == gene_pos {
                return if o != GAP { Some(qi) } else { None };
            }
            if o != GAP {
                qi += 1;
            }
            if g != GAP {
                gi += 1;
            }
        }
        None
    }

    /// Drop the columns aligned to read positions before `pos`.
    /// Returns `None` if nothing is left.
    pub fn clip_query_start(&self, pos: usize) -> Option<SegmentAlignment> {
        if pos <= self.query_start {
            return Some(self.clone());
        }
        let (mut qi, mut gi) = (self.query_start, self.gene_start);
        let mut skip = 0;
        for (o, g) in self.pair.columns() {
            // stop on the first column that holds a read base at pos
            if qi >= pos && o != GAP {
                break;
            }
            if o != GAP {
                qi += 1;
            }
            if g != GAP {
                gi += 1;
            }
            skip += 1;
        }
        if skip >= self.pair.len() {
            return None;
        }
        let observed = self.pair.observed()[skip..].to_vec();
        let germline = self.pair.germline()[skip..].to_vec();
        Some(SegmentAlignment {
            query_start: qi,
            query_end: self.query_end,
            gene_start: gi,
            gene_end: self.gene_end,
            score: self.score,
            pair: AlignedPair { observed, germline },
        })
    }
}
