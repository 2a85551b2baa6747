use anyhow::Result;
use igcorrect::shared::quality::{
    QualityDecoder, QualityEncoding, INVALID_QUALITY_ERROR, MAX_QUALITY_CHAR,
};

#[test]
fn decode_phred_values() -> Result<()> {
    let decoder = QualityDecoder::default();
    assert_eq!(decoder.decode(b'!'), 1.0);
    assert!((decoder.decode(b'#') - 10f64.powf(-0.2)).abs() < 1e-12);
    assert!((decoder.decode(b'5') - 0.01).abs() < 1e-12);
    assert_eq!(decoder.phred_score(b'I'), Some(40));
    assert_eq!(decoder.phred_score(b' '), None);
    Ok(())
}

#[test]
fn decoder_is_monotonic() -> Result<()> {
    for encoding in [QualityEncoding::Sanger, QualityEncoding::Illumina13] {
        let decoder = QualityDecoder::new(encoding);
        let values: Vec<f64> = (b'!'..=MAX_QUALITY_CHAR).map(|c| decoder.decode(c)).collect();
        for w in values.windows(2) {
            assert!(w[1] <= w[0]);
        }
        assert!(values.iter().all(|&v| (0. ..=1.).contains(&v)));
    }
    Ok(())
}

#[test]
fn out_of_range_characters_are_uncertain() -> Result<()> {
    let decoder = QualityDecoder::new(QualityEncoding::Sanger);
    for c in [0u8, b'\t', b' ', 127, 200, 255] {
        assert_eq!(decoder.decode(c), INVALID_QUALITY_ERROR);
    }
    // '5' is below the Illumina 1.3 offset
    let illumina = QualityDecoder::new(QualityEncoding::Illumina13);
    assert_eq!(illumina.decode(b'5'), INVALID_QUALITY_ERROR);
    assert!((illumina.decode(b'J') - 0.1).abs() < 1e-12);
    assert_eq!(illumina.offset(), 64);
    Ok(())
}

#[test]
fn decode_string() -> Result<()> {
    let decoder = QualityDecoder::default();
    let values = decoder.decode_string(b"+I!");
    assert_eq!(values.len(), 3);
    assert!((values[0] - 0.1).abs() < 1e-12);
    assert!((values[1] - 1e-4).abs() < 1e-12);
    assert_eq!(values[2], 1.0);
    Ok(())
}
