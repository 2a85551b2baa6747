//! Alignment context of the read bases: mismatch counts around each column.
use crate::shared::alignment::{comparable, AlignedPair};
use serde::Serialize;

/// Everything the error model looked at for one read base. Written out
/// as one csv row by the feature export.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BaseContext {
    // index in the ungapped read
    pub position: usize,
    pub observed: char,
    pub germline: char,
    pub phred: Option<u8>,
    pub quality_error: f64,
    pub local_columns: usize,
    pub local_mismatches: usize,
    pub local_rate: f64,
    pub global_rate: f64,
    pub error_probability: f64,
}

/// Prefix sums over the columns of a pair, so that the mismatches of any
/// window are counted in constant time.
pub struct ContextCounts {
    comparable: Vec<usize>,
    mismatches: Vec<usize>,
}

impl ContextCounts {
    pub fn new(pair: &AlignedPair) -> ContextCounts {
        let mut comparable_sum = Vec::with_capacity(pair.len() + 1);
        let mut mismatch_sum = Vec::with_capacity(pair.len() + 1);
        let (mut c, mut m) = (0, 0);
        comparable_sum.push(c);
        mismatch_sum.push(m);
        for (o, g) in pair.columns() {
            if comparable(o, g) {
                c += 1;
                if o != g {
                    m += 1;
                }
            }
            comparable_sum.push(c);
            mismatch_sum.push(m);
        }
        ContextCounts {
            comparable: comparable_sum,
            mismatches: mismatch_sum,
        }
    }

    /// (comparable columns, mismatches) over the whole pair
    pub fn totals(&self) -> (usize, usize) {
        (
            self.comparable.last().copied().unwrap_or(0),
            self.mismatches.last().copied().unwrap_or(0),
        )
    }

    /// (comparable columns, mismatches) within `radius` columns of
    /// `column`, the column itself excluded.
    ///```
    /// use igcorrect::shared::AlignedPair;
    /// use igcorrect::correct::context::ContextCounts;
    ///let pair = AlignedPair::new(b"ACGTAC-T".to_vec(), b"ACCTAGGT".to_vec()).unwrap();
    ///let counts = ContextCounts::new(&pair);
    ///assert_eq!(counts.totals(), (7, 2));
    ///assert_eq!(counts.window(2, 3), (5, 1));
    ///assert_eq!(counts.window(0, 1), (1, 0));
    ///```
    pub fn window(&self, column: usize, radius: usize) -> (usize, usize) {
        let n = self.comparable.len() - 1;
        if column >= n {
            return (0, 0);
        }
        let start = column.saturating_sub(radius);
        let end = (column + radius + 1).min(n);
        let count = |sums: &[usize]| {
            let all = sums[end] - sums[start];
            let own = sums[column + 1] - sums[column];
            all - own
        };
        (count(&self.comparable), count(&self.mismatches))
    }
}
