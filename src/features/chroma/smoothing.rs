//! Temporal chroma smoothing

use super::N_PITCH_CLASSES;

/// Smooth chroma vectors over time with a centred moving average
///
/// The window is truncated at the edges; `window_size <= 1` returns the input
/// unchanged.
///
/// # Arguments
///
/// * `chroma_vectors` - 12-element chroma vectors in time order
/// * `window_size` - Smoothing window size in frames (e.g., 3)
pub fn smooth_chroma(
    chroma_vectors: &[[f32; N_PITCH_CLASSES]],
    window_size: usize,
) -> Vec<[f32; N_PITCH_CLASSES]> {
    if window_size <= 1 || chroma_vectors.len() < 2 {
        return chroma_vectors.to_vec();
    }

    log::debug!(
        "Smoothing {} chroma vectors with window size {}",
        chroma_vectors.len(),
        window_size
    );

    let before = (window_size - 1) / 2;
    let after = window_size / 2;
    let n = chroma_vectors.len();

    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(before);
            let hi = (i + after).min(n - 1);
            let mut acc = [0.0f32; N_PITCH_CLASSES];
            for frame in &chroma_vectors[lo..=hi] {
                for (a, &x) in acc.iter_mut().zip(frame.iter()) {
                    *a += x;
                }
            }
            let count = (hi - lo + 1) as f32;
            for a in acc.iter_mut() {
                *a /= count;
            }
            acc
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(v: f32) -> [f32; 12] {
        [v; 12]
    }

    #[test]
    fn test_window_one_is_identity() {
        let input = vec![frame(1.0), frame(2.0)];
        assert_eq!(smooth_chroma(&input, 1), input);
    }

    #[test]
    fn test_moving_average() {
        let input = vec![frame(0.0), frame(3.0), frame(0.0), frame(3.0)];
        let out = smooth_chroma(&input, 3);

        assert_eq!(out.len(), 4);
        assert!((out[0][0] - 1.5).abs() < 1e-6); // edge: (0 + 3) / 2
        assert!((out[1][0] - 1.0).abs() < 1e-6);
        assert!((out[2][0] - 2.0).abs() < 1e-6);
        assert!((out[3][0] - 1.5).abs() < 1e-6);
    }
}
