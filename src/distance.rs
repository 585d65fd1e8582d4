//! Distance primitives shared by clustering and originality scoring.
//!
//! Cosine distance is `1 - cos(a, b)`, in `[0, 2]`. A vector with zero (or
//! non-finite) norm has no direction, so any distance involving it is the
//! sentinel [`MAX_COSINE_DISTANCE`] instead of a division by zero.

use std::cmp::Ordering;

/// Distance reported when a cosine cannot be computed.
pub const MAX_COSINE_DISTANCE: f32 = 2.0;

/// Cosine distance between two vectors.
///
/// Returns [`MAX_COSINE_DISTANCE`] if either vector has zero norm or the
/// result is not finite.
#[inline]
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f64;
    let mut na = 0.0f64;
    let mut nb = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    let denom = na.sqrt() * nb.sqrt();
    if denom <= f64::EPSILON || !denom.is_finite() {
        return MAX_COSINE_DISTANCE;
    }
    let d = 1.0 - dot / denom;
    if !d.is_finite() {
        return MAX_COSINE_DISTANCE;
    }
    (d as f32).clamp(0.0, MAX_COSINE_DISTANCE)
}

/// Euclidean distance between two points.
#[inline]
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let dx = x - y;
            dx * dx
        })
        .sum::<f64>()
        .sqrt()
}

/// Condensed cosine dissimilarity matrix (upper triangle, row-major).
///
/// Length is N-choose-2, the layout `kodama` expects.
pub fn condensed_cosine(data: &[&[f32]]) -> Vec<f64> {
    let n = data.len();
    let mut condensed = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for row in 0..n.saturating_sub(1) {
        for col in (row + 1)..n {
            condensed.push(cosine_distance(data[row], data[col]) as f64);
        }
    }
    condensed
}

/// Full symmetric cosine distance matrix with zeros on the diagonal.
pub fn cosine_matrix(data: &[&[f32]]) -> Vec<Vec<f32>> {
    let n = data.len();
    let mut m = vec![vec![0.0f32; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = cosine_distance(data[i], data[j]);
            m[i][j] = d;
            m[j][i] = d;
        }
    }
    m
}

/// Mean vector of a non-empty set of equal-length vectors.
///
/// Returns an empty vector for empty input.
pub fn centroid(vectors: &[&[f32]]) -> Vec<f32> {
    let Some(first) = vectors.first() else {
        return Vec::new();
    };
    let mut sum = vec![0.0f64; first.len()];
    for v in vectors {
        for (acc, x) in sum.iter_mut().zip(v.iter()) {
            *acc += *x as f64;
        }
    }
    let n = vectors.len() as f64;
    sum.into_iter().map(|s| (s / n) as f32).collect()
}

/// Mean of the `k` smallest values in `distances`.
///
/// `k` is clamped to the number of values; returns `None` when there are
/// none.
pub fn mean_of_smallest(mut distances: Vec<f32>, k: usize) -> Option<f32> {
    if distances.is_empty() || k == 0 {
        return None;
    }
    distances.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let k = k.min(distances.len());
    let sum: f64 = distances[..k].iter().map(|d| *d as f64).sum();
    Some((sum / k as f64) as f32)
}

/// Indices of the `k` nearest entries of one distance row, excluding `skip`.
///
/// Ties are broken by index so the result is deterministic.
pub fn nearest_indices(row: &[f32], skip: usize, k: usize) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..row.len()).filter(|&j| j != skip).collect();
    idx.sort_by(|&a, &b| {
        row[a]
            .partial_cmp(&row[b])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });
    idx.truncate(k);
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_have_zero_distance() {
        let a = [1.0, 2.0, 3.0];
        assert!(cosine_distance(&a, &a) < 1e-6);
    }

    #[test]
    fn opposite_vectors_have_maximal_distance() {
        let d = cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((d - 2.0).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_uses_sentinel() {
        assert_eq!(cosine_distance(&[0.0, 0.0], &[1.0, 0.0]), MAX_COSINE_DISTANCE);
        assert_eq!(cosine_distance(&[0.0, 0.0], &[0.0, 0.0]), MAX_COSINE_DISTANCE);
    }

    #[test]
    fn condensed_length_is_n_choose_2() {
        let data: Vec<Vec<f32>> = (0..5).map(|i| vec![i as f32, 1.0]).collect();
        let refs: Vec<&[f32]> = data.iter().map(|v| v.as_slice()).collect();
        assert_eq!(condensed_cosine(&refs).len(), 10);
        assert!(condensed_cosine(&refs[..1]).is_empty());
    }

    #[test]
    fn centroid_is_mean() {
        let a = [0.0, 2.0];
        let b = [2.0, 0.0];
        assert_eq!(centroid(&[&a, &b]), vec![1.0, 1.0]);
        assert!(centroid(&[]).is_empty());
    }

    #[test]
    fn mean_of_smallest_clamps_k() {
        assert_eq!(mean_of_smallest(vec![3.0, 1.0, 2.0], 2), Some(1.5));
        assert_eq!(mean_of_smallest(vec![3.0], 5), Some(3.0));
        assert_eq!(mean_of_smallest(vec![], 5), None);
    }

    #[test]
    fn nearest_indices_skip_self_and_break_ties_by_index() {
        let row = [0.0, 0.5, 0.5, 0.1];
        assert_eq!(nearest_indices(&row, 0, 2), vec![3, 1]);
    }
}
