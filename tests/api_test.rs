mod common;
use anyhow::Result;
use common::{
    G, IGHV9_4_CORRECTED, IGHV9_4_GERMLINE, IGHV9_4_PHRED, IGHV9_4_READ, Q, S, S_CORRECTED,
};
use igcorrect::shared::ConfigError;
use igcorrect::{
    correct_sequences, get_predicted_errors, get_predicted_errors_batch, Options,
    OPTIMIZED_THRESHOLD,
};

#[test]
fn corrected_positions_are_the_flagged_ones() -> Result<()> {
    let options = Options::default();
    let corrected = correct_sequences(&[S], &[G], &[Q], &options)?;
    let errors = get_predicted_errors(S, G, Q, &options)?;
    assert_eq!(corrected.len(), 1);
    assert_eq!(corrected[0].len(), S.len());
    assert_eq!(corrected[0], S_CORRECTED);

    let changed: Vec<usize> = S
        .bytes()
        .zip(corrected[0].bytes())
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(i, _)| i)
        .collect();
    let flagged: Vec<usize> = errors
        .iter()
        .enumerate()
        .filter(|(_, &p)| p >= OPTIMIZED_THRESHOLD)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(changed, flagged);
    Ok(())
}

#[test]
fn ighv9_4_read_is_corrected() -> Result<()> {
    let options = Options::default();
    let corrected = correct_sequences(
        &[IGHV9_4_READ],
        &[IGHV9_4_GERMLINE],
        &[IGHV9_4_PHRED],
        &options,
    )?;
    assert_eq!(corrected, vec![IGHV9_4_CORRECTED.to_string()]);

    let errors = get_predicted_errors(IGHV9_4_READ, IGHV9_4_GERMLINE, IGHV9_4_PHRED, &options)?;
    assert_eq!(errors.len(), IGHV9_4_READ.len());
    let flagged: Vec<usize> = errors
        .iter()
        .enumerate()
        .filter(|(_, &p)| p >= OPTIMIZED_THRESHOLD)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(flagged, vec![285, 286]);
    assert!((errors[285] - 0.926).abs() < 1e-3);
    Ok(())
}

#[test]
fn batch_matches_single_calls() -> Result<()> {
    let options = Options {
        nthreads: 2,
        ..Default::default()
    };
    let sequences = vec![S.to_string(), G.to_string(), S.to_lowercase()];
    let germlines = vec![G; 3];
    let qualities = vec![Q; 3];
    let batch = get_predicted_errors_batch(&sequences, &germlines, &qualities, &options)?;
    assert_eq!(batch.len(), 3);
    for (i, s) in sequences.iter().enumerate() {
        assert_eq!(batch[i], get_predicted_errors(s, G, Q, &options)?);
    }
    assert_eq!(batch[0], batch[2]);
    Ok(())
}

#[test]
fn array_lengths_must_match() -> Result<()> {
    let err = correct_sequences(&[S, S], &[G], &[Q, Q], &Options::default()).unwrap_err();
    match err.downcast_ref::<ConfigError>() {
        Some(ConfigError::LengthMismatch {
            sequences,
            germlines,
            qualities,
        }) => assert_eq!((*sequences, *germlines, *qualities), (2, 1, 2)),
        _ => panic!("unexpected error {:?}", err),
    }
    Ok(())
}

#[test]
fn custom_threshold_and_symbol() -> Result<()> {
    let options = Options {
        error_threshold: 0.5,
        correction: '.',
        ..Default::default()
    };
    let corrected = correct_sequences(&[S], &[G], &[Q], &options)?;
    // the clustered Q2 mismatch (0.85) is above 0.5
    assert_eq!(corrected[0].as_bytes()[10], b'.');
    assert_eq!(corrected[0].as_bytes()[42], b'.');
    assert_eq!(corrected[0].matches('.').count(), 2);
    Ok(())
}

#[test]
fn unaligned_germline_is_aligned_first() -> Result<()> {
    let options = Options::default();
    // the germline extends past both ends of the read
    let germline = format!("TTGCA{}GGATC", G);
    let errors = get_predicted_errors(S, &germline, Q, &options)?;
    assert_eq!(errors.len(), S.len());
    assert_eq!(errors, get_predicted_errors(S, G, Q, &options)?);
    Ok(())
}

#[test]
fn invalid_records_fail_the_call() -> Result<()> {
    let options = Options::default();
    assert!(get_predicted_errors(S, G, &Q[1..], &options).is_err());
    assert!(get_predicted_errors("ACGT", "ACGT", "IIII", &options).is_err());
    assert!(get_predicted_errors(&S.replace('A', "Z"), G, Q, &options).is_err());
    let bad_threads = Options {
        nthreads: 0,
        ..Default::default()
    };
    assert!(correct_sequences(&[S], &[G], &[Q], &bad_threads).is_err());
    Ok(())
}
