//! The structs used for specifying the parameters of the germline alignment
use anyhow::{anyhow, Result};
use bio::alignment::pairwise;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentParameters {
    // scores shared by the V, D and J searches
    pub match_score: i32,
    pub mismatch_score: i32,
    pub gap_open: i32,
    pub gap_extend: i32,
    pub min_score_v: i32,
    pub min_score_d: i32,
    pub min_score_j: i32,
    // segments with a larger e-value are not called
    pub max_evalue_v: f64,
    pub max_evalue_d: f64,
    pub max_evalue_j: f64,
    // Karlin-Altschul K constant (lambda is solved from the scores)
    pub karlin_k: f64,
    // k-mer screening of the V genes before the full alignment
    pub kmer_size: usize,
    pub max_candidates: usize,
    // how far J is allowed to overlap the end of V
    pub j_overlap: usize,
}

impl Default for AlignmentParameters {
    fn default() -> AlignmentParameters {
        AlignmentParameters {
            match_score: 6,
            mismatch_score: -3,
            gap_open: -50,
            gap_extend: -10,
            min_score_v: 60,
            min_score_d: 30,
            min_score_j: 60,
            max_evalue_v: 1e-3,
            max_evalue_d: 1.0,
            max_evalue_j: 1e-2,
            karlin_k: 0.1,
            kmer_size: 11,
            max_candidates: 8,
            j_overlap: 10,
        }
    }
}

impl AlignmentParameters {
    fn match_fn(&self) -> Box<dyn Fn(u8, u8) -> i32> {
        let (match_score, mismatch_score) = (self.match_score, self.mismatch_score);
        // TODO: give partial credit to IUPAC codes that include the germline base
        Box::new(move |a: u8, b: u8| {
            if (a == b'N') | (b == b'N') {
                0i32
            } else if a == b {
                match_score
            } else {
                mismatch_score
            }
        })
    }

    /// Local alignment of a read window against a gene.
    pub fn get_scoring_local(&self) -> pairwise::Scoring<Box<dyn Fn(u8, u8) -> i32>> {
        pairwise::Scoring {
            gap_open: self.gap_open,
            gap_extend: self.gap_extend,
            match_fn: self.match_fn(),
            match_scores: None,
            xclip_prefix: 0,
            xclip_suffix: 0,
            yclip_prefix: 0,
            yclip_suffix: 0,
        }
    }

    /// Every base of the read (x) is aligned, the germline (y) may be
    /// clipped at both ends.
    pub fn get_scoring_read_to_germline(&self) -> pairwise::Scoring<Box<dyn Fn(u8, u8) -> i32>> {
        pairwise::Scoring {
            gap_open: self.gap_open,
            gap_extend: self.gap_extend,
            match_fn: self.match_fn(),
            match_scores: None,
            xclip_prefix: pairwise::MIN_SCORE,
            xclip_suffix: pairwise::MIN_SCORE,
            yclip_prefix: 0,
            yclip_suffix: 0,
        }
    }

    /// Solve `sum_ij p_i p_j exp(lambda s_ij) = 1` for uniform base
    /// composition, where a pair matches with probability 1/4.
    ///```
    /// use igcorrect::shared::AlignmentParameters;
    ///let params = AlignmentParameters::default();
    ///let lambda = params.karlin_lambda().unwrap();
    ///// closed form for +6/-3: ln((sqrt(13) - 1) / 2) / 3
    ///assert!((lambda - ((13f64.sqrt() - 1.) / 2.).ln() / 3.).abs() < 1e-9);
    ///```
    pub fn karlin_lambda(&self) -> Result<f64> {
        let (s_match, s_mismatch) = (f64::from(self.match_score), f64::from(self.mismatch_score));
        if s_match <= 0. || s_mismatch >= 0. || 0.25 * s_match + 0.75 * s_mismatch >= 0. {
            return Err(anyhow!(
                "The expected alignment score must be negative to compute e-values."
            ));
        }
        let f = |lambda: f64| {
            0.25 * (lambda * s_match).exp() + 0.75 * (lambda * s_mismatch).exp() - 1.
        };
        // f(0) = 0 and f decreases first, the root is past the minimum
        let mut hi = 1.0;
        while f(hi) <= 0. {
            hi *= 2.;
        }
        let mut lo = hi / 2.;
        while f(lo) > 0. && lo > 1e-12 {
            lo /= 2.;
        }
        for _ in 0..200 {
            let mid = 0.5 * (lo + hi);
            if f(mid) > 0. {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        Ok(0.5 * (lo + hi))
    }

    /// E-value of a local alignment score, `query_len` and `library_len`
    /// being the lengths of the two searched spaces.
    pub fn evalue(&self, lambda: f64, score: i32, query_len: usize, library_len: usize) -> f64 {
        self.karlin_k * (query_len as f64) * (library_len as f64) * (-lambda * f64::from(score)).exp()
    }
}
