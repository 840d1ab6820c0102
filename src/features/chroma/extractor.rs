//! Chroma vector extraction
//!
//! Short-time Fourier transform of the signal, with each positive-frequency
//! bin folded onto its pitch class regardless of octave.
//!
//! Frames are centred: frame `i` covers `frame_size` samples around sample
//! `i * hop_length` (zero-padded at the edges), so its timestamp is
//! `i * hop_length / sample_rate` and a signal of `n` samples yields
//! `1 + n / hop_length` frames.

use rustfft::{num_complex::Complex, FftPlanner};

use super::{ChromaExtractor, Chromagram, N_PITCH_CLASSES};
use crate::config::ChromaConfig;
use crate::error::AnalysisError;

/// Pitch class of A relative to C
const A_PITCH_CLASS: f32 = 9.0;

/// STFT-based chroma extractor
#[derive(Debug, Clone, Default)]
pub struct StftChromaExtractor {
    config: ChromaConfig,
}

impl StftChromaExtractor {
    /// Create an extractor with the given parameters
    pub fn new(config: ChromaConfig) -> Self {
        Self { config }
    }

    /// Per-bin pitch-class weights for the positive-frequency half spectrum
    ///
    /// Bins outside the configured frequency range are left out.
    fn bin_weights(&self, sample_rate: u32) -> Vec<(usize, [f32; N_PITCH_CLASSES])> {
        let n_fft = self.config.frame_size;
        let bin_hz = sample_rate as f32 / n_fft as f32;
        let mut weights = Vec::new();

        for bin in 1..=n_fft / 2 {
            let freq = bin as f32 * bin_hz;
            if freq < self.config.min_frequency || freq > self.config.max_frequency {
                continue;
            }

            let pitch_class = (12.0 * (freq / self.config.center_frequency).log2() + A_PITCH_CLASS)
                .rem_euclid(12.0);

            let mut w = [0.0f32; N_PITCH_CLASSES];
            if self.config.soft_chroma_mapping {
                let sigma = self.config.soft_mapping_sigma;
                let mut total = 0.0f32;
                for (pc, slot) in w.iter_mut().enumerate() {
                    let d = (pitch_class - pc as f32).abs();
                    let d = d.min(12.0 - d);
                    *slot = (-0.5 * (d / sigma).powi(2)).exp();
                    total += *slot;
                }
                for slot in w.iter_mut() {
                    *slot /= total;
                }
            } else {
                let pc = (pitch_class.round() as usize) % N_PITCH_CLASSES;
                w[pc] = 1.0;
            }

            weights.push((bin, w));
        }

        weights
    }
}

impl ChromaExtractor for StftChromaExtractor {
    fn extract(
        &self,
        samples: &[f32],
        sample_rate: u32,
        hop_length: usize,
    ) -> Result<Chromagram, AnalysisError> {
        if samples.is_empty() {
            return Err(AnalysisError::ExtractionFailure(
                "no samples to extract chroma from".to_string(),
            ));
        }
        if sample_rate == 0 || hop_length == 0 {
            return Err(AnalysisError::ExtractionFailure(format!(
                "invalid framing: sample_rate={}, hop_length={}",
                sample_rate, hop_length
            )));
        }

        let n_fft = self.config.frame_size;
        let weights = self.bin_weights(sample_rate);
        if weights.is_empty() {
            return Err(AnalysisError::ExtractionFailure(format!(
                "no FFT bins between {} Hz and {} Hz at {} Hz sample rate",
                self.config.min_frequency, self.config.max_frequency, sample_rate
            )));
        }

        log::debug!(
            "Extracting chroma: {} samples at {} Hz, frame_size={}, hop_length={}, {} mapped bins",
            samples.len(),
            sample_rate,
            n_fft,
            hop_length,
            weights.len()
        );

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(n_fft);
        let window = hann_window(n_fft);

        let n_frames = 1 + samples.len() / hop_length;
        let half = (n_fft / 2) as isize;
        let mut frames = Vec::with_capacity(n_frames);
        let mut times = Vec::with_capacity(n_frames);
        let mut buffer = vec![Complex::new(0.0f32, 0.0); n_fft];

        for frame_idx in 0..n_frames {
            let center = (frame_idx * hop_length) as isize;
            let start = center - half;

            for (i, slot) in buffer.iter_mut().enumerate() {
                let pos = start + i as isize;
                let sample = if pos >= 0 && (pos as usize) < samples.len() {
                    samples[pos as usize]
                } else {
                    0.0
                };
                *slot = Complex::new(sample * window[i], 0.0);
            }

            fft.process(&mut buffer);

            let mut chroma = [0.0f32; N_PITCH_CLASSES];
            for (bin, w) in &weights {
                let power = buffer[*bin].norm_sqr();
                for (c, &wt) in chroma.iter_mut().zip(w.iter()) {
                    *c += wt * power;
                }
            }

            if chroma.iter().any(|x| !x.is_finite()) {
                return Err(AnalysisError::ExtractionFailure(format!(
                    "non-finite chroma energy at frame {}",
                    frame_idx
                )));
            }

            frames.push(chroma);
            times.push((frame_idx * hop_length) as f32 / sample_rate as f32);
        }

        log::debug!("Chromagram shape: (12, {})", frames.len());

        Ok(Chromagram::new(frames, times))
    }
}

/// Hann window of length `n`
fn hann_window(n: usize) -> Vec<f32> {
    if n == 1 {
        return vec![1.0];
    }
    (0..n)
        .map(|i| {
            let phase = 2.0 * std::f32::consts::PI * i as f32 / (n - 1) as f32;
            0.5 * (1.0 - phase.cos())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, seconds: f32) -> Vec<f32> {
        let n = (sample_rate as f32 * seconds) as usize;
        (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    fn argmax(v: &[f32; 12]) -> usize {
        v.iter()
            .enumerate()
            .fold((0, f32::MIN), |best, (i, &x)| if x > best.1 { (i, x) } else { best })
            .0
    }

    #[test]
    fn test_frame_count_and_times() {
        let samples = vec![0.1f32; 22050];
        let extractor = StftChromaExtractor::default();
        let chroma = extractor.extract(&samples, 22050, 11025).unwrap();

        assert_eq!(chroma.len(), 3);
        assert_eq!(chroma.times, vec![0.0, 0.5, 1.0]);
        assert!(chroma.validate().is_ok());
    }

    #[test]
    fn test_a440_maps_to_a() {
        let samples = sine(440.0, 22050, 1.0);
        let extractor = StftChromaExtractor::default();
        let chroma = extractor.extract(&samples, 22050, 5512).unwrap();

        // Middle frame is fully inside the signal
        assert_eq!(argmax(&chroma.frames[2]), 9);
    }

    #[test]
    fn test_middle_c_maps_to_c() {
        let samples = sine(261.63, 22050, 1.0);
        let mut config = ChromaConfig::default();
        config.soft_chroma_mapping = true;
        let extractor = StftChromaExtractor::new(config);
        let chroma = extractor.extract(&samples, 22050, 5512).unwrap();

        assert_eq!(argmax(&chroma.frames[2]), 0);
    }

    #[test]
    fn test_silence_gives_zero_chroma() {
        let samples = vec![0.0f32; 4096];
        let extractor = StftChromaExtractor::default();
        let chroma = extractor.extract(&samples, 22050, 1024).unwrap();
        assert!(chroma.frames.iter().all(|f| f.iter().all(|&x| x == 0.0)));
    }

    #[test]
    fn test_empty_and_bad_hop_fail() {
        let extractor = StftChromaExtractor::default();
        assert!(matches!(
            extractor.extract(&[], 22050, 512),
            Err(AnalysisError::ExtractionFailure(_))
        ));
        assert!(matches!(
            extractor.extract(&[0.0; 100], 22050, 0),
            Err(AnalysisError::ExtractionFailure(_))
        ));
    }

    #[test]
    fn test_no_bins_in_range_fails() {
        // Nyquist at 50 Hz sits below the 55 Hz floor
        let extractor = StftChromaExtractor::default();
        let result = extractor.extract(&[0.0; 1000], 100, 50);
        assert!(matches!(result, Err(AnalysisError::ExtractionFailure(_))));
    }

    #[test]
    fn test_soft_weights_sum_to_one() {
        let mut config = ChromaConfig::default();
        config.soft_chroma_mapping = true;
        let extractor = StftChromaExtractor::new(config);
        for (_, w) in extractor.bin_weights(22050) {
            let sum: f32 = w.iter().sum();
            assert!((sum - 1.0).abs() < 1e-4);
        }
    }
}
