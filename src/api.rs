//! In-process entry points working on parallel arrays of sequences,
//! germlines and quality strings.
//!
//! A record that cannot be processed fails the whole call, with the index of
//! the record in the error context.
use crate::correct::{correct, ErrorModel, ErrorProfile};
use crate::shared::alignment::AlignedPair;
use crate::shared::errors::{ConfigError, RecordError, MIN_SEQUENCE_LENGTH};
use crate::shared::options::Options;
use crate::shared::parameters::AlignmentParameters;
use crate::shared::sequence::Dna;
use anyhow::{Context, Result};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

fn predict(
    model: &ErrorModel,
    params: &AlignmentParameters,
    sequence: &str,
    germline: &str,
    quality: &str,
) -> Result<(Vec<u8>, ErrorProfile)> {
    let read = Dna::from_string(sequence)?;
    if read.len() != quality.len() {
        return Err(RecordError::quality_length(read.len(), quality.len()).into());
    }
    if read.len() < MIN_SEQUENCE_LENGTH {
        return Err(RecordError::TooShort(read.len()).into());
    }
    let pair = AlignedPair::resolve(&read.seq, germline.trim().as_bytes(), params)?;
    let profile = model.predict(&pair, quality.as_bytes())?;
    Ok((pair.ungapped_observed(), profile))
}

/// Run `f` on every triple, in parallel, keeping the order
fn map_triples<S, G, Q, T, F>(
    sequences: &[S],
    germlines: &[G],
    qualities: &[Q],
    options: &Options,
    f: F,
) -> Result<Vec<T>>
where
    S: AsRef<str> + Sync,
    G: AsRef<str> + Sync,
    Q: AsRef<str> + Sync,
    T: Send,
    F: Fn(&str, &str, &str) -> Result<T> + Sync,
{
    options.validate()?;
    if sequences.len() != germlines.len() || sequences.len() != qualities.len() {
        return Err(ConfigError::length_mismatch(
            sequences.len(),
            germlines.len(),
            qualities.len(),
        )
        .into());
    }
    let pool = ThreadPoolBuilder::new()
        .num_threads(options.num_threads())
        .build()?;
    pool.install(|| {
        (0..sequences.len())
            .into_par_iter()
            .map(|i| {
                f(
                    sequences[i].as_ref(),
                    germlines[i].as_ref(),
                    qualities[i].as_ref(),
                )
                .with_context(|| format!("Record {} cannot be processed", i))
            })
            .collect()
    })
}

/// Predicted error probability of every base of one sequence
///```
/// use igcorrect::{get_predicted_errors, Options};
///let errors = get_predicted_errors("ACGTACGTAC", "ACGAACGTAC", "III#IIIIII", &Options::default()).unwrap();
///assert_eq!(errors.len(), 10);
///// isolated mismatch on a Q2 base
///assert!(errors[3] > 0.9);
///assert!(errors[0] < 0.01);
///```
pub fn get_predicted_errors(
    sequence: &str,
    germline: &str,
    quality: &str,
    options: &Options,
) -> Result<Vec<f64>> {
    options.validate()?;
    let model = ErrorModel::from_options(options);
    let (_, profile) = predict(
        &model,
        &AlignmentParameters::default(),
        sequence,
        germline,
        quality,
    )?;
    Ok(profile.into_values())
}

pub fn get_predicted_errors_batch<S, G, Q>(
    sequences: &[S],
    germlines: &[G],
    qualities: &[Q],
    options: &Options,
) -> Result<Vec<Vec<f64>>>
where
    S: AsRef<str> + Sync,
    G: AsRef<str> + Sync,
    Q: AsRef<str> + Sync,
{
    let model = ErrorModel::from_options(options);
    let params = AlignmentParameters::default();
    map_triples(sequences, germlines, qualities, options, |s, g, q| {
        Ok(predict(&model, &params, s, g, q)?.1.into_values())
    })
}

/// Corrected sequences: every base predicted as an error at or above the
/// threshold of `options` is replaced by its correction symbol.
pub fn correct_sequences<S, G, Q>(
    sequences: &[S],
    germlines: &[G],
    qualities: &[Q],
    options: &Options,
) -> Result<Vec<String>>
where
    S: AsRef<str> + Sync,
    G: AsRef<str> + Sync,
    Q: AsRef<str> + Sync,
{
    let model = ErrorModel::from_options(options);
    let params = AlignmentParameters::default();
    map_triples(sequences, germlines, qualities, options, |s, g, q| {
        let (observed, profile) = predict(&model, &params, s, g, q)?;
        let corrected = correct(
            &observed,
            &profile,
            options.error_threshold,
            options.correction_symbol(),
        )?;
        Ok(String::from_utf8_lossy(&corrected).into_owned())
    })
}
