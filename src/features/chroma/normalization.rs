//! Chroma normalization

/// Guard added to denominators so silent frames never divide by zero
pub const EPSILON: f32 = 1e-8;

/// Normalize a chroma vector by its L1 sum (plus `EPSILON`)
///
/// An all-zero vector stays all-zero.
pub fn l1_normalize(chroma: &[f32]) -> Vec<f32> {
    let sum: f32 = chroma.iter().sum();
    chroma.iter().map(|&x| x / (sum + EPSILON)).collect()
}

/// Euclidean norm of a vector
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|&x| x * x).sum::<f32>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_l1_normalize_sums_to_one() {
        let v = l1_normalize(&[1.0, 0.0, 3.0, 4.0]);
        let sum: f32 = v.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!((v[3] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_l1_normalize_zero_vector() {
        let v = l1_normalize(&[0.0; 12]);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_l2_norm() {
        assert!((l2_norm(&[3.0, 4.0]) - 5.0).abs() < 1e-6);
        assert_eq!(l2_norm(&[]), 0.0);
    }
}
