//! Reading frame, CDR3 and productivity of an assigned read
use crate::annotate::germline::{Assignment, SegmentHit};
use crate::shared::sequence::{AminoAcid, Dna};
use std::ops::Range;

/// Offset (0, 1 or 2) of the first complete codon of the read. The V genes
/// start on a codon boundary, so the frame follows from where the V
/// alignment starts in the gene.
///```
/// use igcorrect::annotate::junction::codon_shift;
///assert_eq!(codon_shift(0), 0);
///assert_eq!(codon_shift(4), 2);
///assert_eq!(codon_shift(5), 1);
///```
pub fn codon_shift(gene_start: usize) -> usize {
    (3 - gene_start % 3) % 3
}

/// Frame offset in read coordinates
pub fn read_frame(v: &SegmentHit) -> usize {
    (v.alignment.query_start + codon_shift(v.alignment.gene_start)) % 3
}

/// Frame offset of a window of the read starting at `origin`
pub fn window_frame(read_frame: usize, origin: usize) -> usize {
    (read_frame + 3 - origin % 3) % 3
}

/// CDR3 in read coordinates: from the codon after the V cysteine to the
/// J phenylalanine / tryptophan (excluded).
pub fn cdr3_range(v: &SegmentHit, j: Option<&SegmentHit>) -> Option<Range<usize>> {
    let start = v.anchor_position()? + 3;
    let end = j?.anchor_position()?;
    if end < start {
        return None;
    }
    Some(start..end)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Junction {
    pub frame: usize,
    pub cdr3: Option<Range<usize>>,
    pub cdr3_nt: Option<Dna>,
    pub cdr3_aa: Option<AminoAcid>,
    // translation of the covered part of the read
    pub translation: AminoAcid,
    pub productive: bool,
}

impl Junction {
    pub fn new(assignment: &Assignment) -> Junction {
        let frame = read_frame(&assignment.v);
        let covered = assignment.covered();
        let translation = assignment
            .read
            .extract_subsequence(covered.start, covered.end)
            .translate_frame(window_frame(frame, covered.start));

        let cdr3 = cdr3_range(&assignment.v, assignment.j.as_ref());
        let cdr3_nt = cdr3
            .as_ref()
            .map(|r| assignment.read.extract_subsequence(r.start, r.end));
        let cdr3_aa = cdr3_nt.as_ref().map(|nt| nt.translate_frame(0));

        let productive = match &cdr3 {
            Some(r) => {
                assignment.j.is_some()
                    && !r.is_empty()
                    && r.len() % 3 == 0
                    && r.start % 3 == frame
                    && !translation.has_stop()
            }
            None => false,
        };

        Junction {
            frame,
            cdr3,
            cdr3_nt,
            cdr3_aa,
            translation,
            productive,
        }
    }
}
