//! Channel mixing (interleaved multi-channel to mono)

use crate::error::AnalysisError;

/// Average interleaved multi-channel samples into one channel
///
/// # Errors
///
/// `AnalysisError::InvalidInput` if `channels` is zero or the sample count is
/// not a multiple of it
pub fn downmix_interleaved(samples: &[f32], channels: usize) -> Result<Vec<f32>, AnalysisError> {
    if channels == 0 {
        return Err(AnalysisError::InvalidInput(
            "Channel count must be at least 1".to_string(),
        ));
    }
    if samples.len() % channels != 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "{} samples is not a whole number of {}-channel frames",
            samples.len(),
            channels
        )));
    }
    if channels == 1 {
        return Ok(samples.to_vec());
    }

    let scale = 1.0 / channels as f32;
    Ok(samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() * scale)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix_interleaved() {
        let mono = downmix_interleaved(&[1.0, 0.0, 0.5, 0.5, -1.0, 1.0], 2).unwrap();
        assert_eq!(mono, vec![0.5, 0.5, 0.0]);

        let passthrough = downmix_interleaved(&[0.1, 0.2], 1).unwrap();
        assert_eq!(passthrough, vec![0.1, 0.2]);
    }

    #[test]
    fn test_downmix_rejects_ragged_input() {
        assert!(downmix_interleaved(&[0.0; 5], 2).is_err());
        assert!(downmix_interleaved(&[0.0; 4], 0).is_err());
    }
}
