//! Per-base probability that an observed base is a sequencing error.
//!
//! Two explanations compete for every base aligned to a germline base: a
//! sequencing error (driven by the quality `q`) and a somatic mutation
//! (driven by the mutation rate `m`). The mutation rate is estimated from
//! the alignment itself, first over the whole record and then around the
//! base, so that bases inside a cluster of mismatches are read as
//! hypermutation rather than errors.
use crate::correct::context::{BaseContext, ContextCounts};
use crate::shared::alignment::{comparable, AlignedPair};
use crate::shared::errors::RecordError;
use crate::shared::options::{Options, Species};
use crate::shared::quality::{QualityDecoder, QualityEncoding};
use crate::shared::sequence::GAP;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorModelParameters {
    // expected fraction of mutated bases in a rearranged sequence
    pub mutation_prior: f64,
    // pseudo-counts of the prior in the record-wide rate
    pub prior_weight: f64,
    // half-width of the neighbourhood, in alignment columns
    pub context_window: usize,
    // pseudo-counts of the record-wide rate in the local rate
    pub local_weight: f64,
    pub min_rate: f64,
    pub max_rate: f64,
    // logistic calibration of the posterior
    pub calibration_slope: f64,
    pub calibration_offset: f64,
}

impl Default for ErrorModelParameters {
    fn default() -> ErrorModelParameters {
        ErrorModelParameters::for_species(Species::Human)
    }
}

impl ErrorModelParameters {
    pub fn for_species(species: Species) -> ErrorModelParameters {
        let mutation_prior = match species {
            Species::Human => 0.05,
            Species::Mouse => 0.03,
        };
        ErrorModelParameters {
            mutation_prior,
            prior_weight: 20.,
            context_window: 3,
            local_weight: 2.,
            min_rate: 1e-4,
            max_rate: 0.5,
            calibration_slope: 1.,
            calibration_offset: 0.,
        }
    }
}

/// Error probability of every base of the ungapped read
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ErrorProfile {
    values: Vec<f64>,
}

impl ErrorProfile {
    pub fn new(values: Vec<f64>) -> ErrorProfile {
        ErrorProfile {
            values: values.into_iter().map(|v| v.clamp(0., 1.)).collect(),
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Positions whose error probability reaches `threshold`
    pub fn flagged(&self, threshold: f64) -> Vec<usize> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, &v)| v >= threshold)
            .map(|(i, _)| i)
            .collect()
    }
}

#[derive(Clone, Debug)]
pub struct ErrorModel {
    params: ErrorModelParameters,
    decoder: QualityDecoder,
}

impl Default for ErrorModel {
    fn default() -> ErrorModel {
        ErrorModel::new(ErrorModelParameters::default(), QualityEncoding::Sanger)
    }
}

impl ErrorModel {
    pub fn new(params: ErrorModelParameters, encoding: QualityEncoding) -> ErrorModel {
        ErrorModel {
            params,
            decoder: QualityDecoder::new(encoding),
        }
    }

    /// The model of a run: the species defaults unless the options carry
    /// their own parameters.
    pub fn from_options(options: &Options) -> ErrorModel {
        let params = options
            .error_model
            .clone()
            .unwrap_or_else(|| ErrorModelParameters::for_species(options.species));
        ErrorModel::new(params, options.quality_encoding)
    }

    pub fn parameters(&self) -> &ErrorModelParameters {
        &self.params
    }

    pub fn decoder(&self) -> &QualityDecoder {
        &self.decoder
    }

    /// Error probabilities of the read bases of `pair`. `quality` holds one
    /// character per non-gap observed base.
    pub fn predict(&self, pair: &AlignedPair, quality: &[u8]) -> Result<ErrorProfile, RecordError> {
        let contexts = self.contexts(pair, quality)?;
        Ok(ErrorProfile::new(
            contexts.iter().map(|c| c.error_probability).collect(),
        ))
    }

    /// Same as `predict`, keeping the quantities behind each probability.
    pub fn contexts(
        &self,
        pair: &AlignedPair,
        quality: &[u8],
    ) -> Result<Vec<BaseContext>, RecordError> {
        let n_bases = pair.observed().iter().filter(|&&c| c != GAP).count();
        if n_bases != quality.len() {
            return Err(RecordError::quality_length(n_bases, quality.len()));
        }

        let counts = ContextCounts::new(pair);
        let (n_total, mm_total) = counts.totals();
        let global_rate = shrink(
            mm_total,
            n_total,
            self.params.mutation_prior,
            self.params.prior_weight,
        );

        let mut contexts = Vec::with_capacity(n_bases);
        let mut position = 0;
        for (column, (o, g)) in pair.columns().enumerate() {
            if o == GAP {
                continue;
            }
            let phred = quality[position];
            let q = self.decoder.decode(phred);
            let (local_columns, local_mismatches) =
                counts.window(column, self.params.context_window);
            let local_rate = shrink(
                local_mismatches,
                local_columns,
                global_rate,
                self.params.local_weight,
            )
            .clamp(self.params.min_rate, self.params.max_rate);

            let error_probability = if comparable(o, g) {
                self.calibrate(posterior(q, local_rate, o == g))
            } else {
                // no germline evidence, only the sequencer's word
                q.clamp(0., 1.)
            };

            contexts.push(BaseContext {
                position,
                observed: o as char,
                germline: g as char,
                phred: self.decoder.phred_score(phred),
                quality_error: q,
                local_columns,
                local_mismatches,
                local_rate,
                global_rate,
                error_probability,
            });
            position += 1;
        }
        Ok(contexts)
    }

    fn calibrate(&self, p: f64) -> f64 {
        let (slope, offset) = (
            self.params.calibration_slope,
            self.params.calibration_offset,
        );
        if (slope == 1. && offset == 0.) || p <= 0. || p >= 1. {
            return p;
        }
        let logit = (p / (1. - p)).ln();
        (1. / (1. + (-(slope * logit + offset)).exp())).clamp(0., 1.)
    }
}

/// Mismatch fraction with `weight` pseudo-counts at `prior`
fn shrink(mismatches: usize, columns: usize, prior: f64, weight: f64) -> f64 {
    let denominator = columns as f64 + weight;
    if denominator <= 0. {
        return prior;
    }
    (mismatches as f64 + weight * prior) / denominator
}

/// Probability that the observed base is an error, given the quality error
/// `q` and the mutation rate `m`. A mutation or an error picks one of the
/// three other bases uniformly.
fn posterior(q: f64, m: f64, is_match: bool) -> f64 {
    let (error, no_error) = if is_match {
        // a mutation followed by an error back to the germline base
        (m * q / 3., (1. - m) * (1. - q) + m * q / 3.)
    } else {
        (
            (1. - m) * q / 3. + m * (2. / 3.) * (q / 3.),
            (m / 3.) * (1. - q),
        )
    };
    if error + no_error <= 0. {
        return q;
    }
    error / (error + no_error)
}
