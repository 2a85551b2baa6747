use crate::correct::model::ErrorProfile;
use anyhow::{anyhow, Result};

/// Replace every base whose error probability reaches `threshold` by
/// `symbol`.
///```
/// use igcorrect::correct::{correct, ErrorProfile};
///let profile = ErrorProfile::new(vec![0.1, 0.95, 0.2, 0.9]);
///let corrected = correct(b"ACGT", &profile, 0.9, b'N').unwrap();
///assert_eq!(corrected, b"ANGN".to_vec());
///```
pub fn correct(observed: &[u8], profile: &ErrorProfile, threshold: f64, symbol: u8) -> Result<Vec<u8>> {
    if observed.len() != profile.len() {
        return Err(anyhow!(
            "Error profile of length {} for a sequence of length {}",
            profile.len(),
            observed.len()
        ));
    }
    Ok(observed
        .iter()
        .zip(profile.values())
        .map(|(&b, &p)| if p >= threshold { symbol } else { b })
        .collect())
}

/// Number of bases `correct` replaces
pub fn count_corrections(profile: &ErrorProfile, threshold: f64) -> usize {
    profile.values().iter().filter(|&&p| p >= threshold).count()
}
