//! Local Outlier Factor (Breunig et al., 2000).
//!
//! For each point `p` with k-neighborhood `N_k(p)`:
//!
//! ```text
//! reach_k(p, o) = max(k_distance(o), d(p, o))
//! lrd(p)        = 1 / mean_{o ∈ N_k(p)} reach_k(p, o)
//! LOF(p)        = mean_{o ∈ N_k(p)} lrd(o) / lrd(p)
//! ```
//!
//! LOF near 1 means `p` is as dense as its neighbors; larger values mean
//! `p` sits in a sparser region than they do.

use crate::distance::euclidean_distance;
use std::cmp::Ordering;

/// Guards `1 / 0` when a point has duplicates among its neighbors.
const DENSITY_EPSILON: f64 = 1e-10;

/// Local outlier factor of every point, with `k = min(k, n - 1)`.
///
/// Fewer than two points yields a factor of 1.0 each.
pub fn local_outlier_factor(points: &[Vec<f64>], k: usize) -> Vec<f64> {
    let n = points.len();
    if n < 2 {
        return vec![1.0; n];
    }
    let k = k.clamp(1, n - 1);

    let distances: Vec<Vec<f64>> = points
        .iter()
        .map(|p| points.iter().map(|q| euclidean_distance(p, q)).collect())
        .collect();

    let neighbors: Vec<Vec<usize>> = (0..n)
        .map(|i| {
            let mut idx: Vec<usize> = (0..n).filter(|&j| j != i).collect();
            idx.sort_by(|&a, &b| {
                distances[i][a]
                    .partial_cmp(&distances[i][b])
                    .unwrap_or(Ordering::Equal)
                    .then(a.cmp(&b))
            });
            idx.truncate(k);
            idx
        })
        .collect();

    let k_distance: Vec<f64> = (0..n)
        .map(|i| neighbors[i].last().map(|&j| distances[i][j]).unwrap_or(0.0))
        .collect();

    let lrd: Vec<f64> = (0..n)
        .map(|i| {
            let total: f64 = neighbors[i]
                .iter()
                .map(|&o| k_distance[o].max(distances[i][o]))
                .sum();
            1.0 / (total / neighbors[i].len() as f64 + DENSITY_EPSILON)
        })
        .collect();

    (0..n)
        .map(|i| {
            let mean_neighbor_lrd: f64 =
                neighbors[i].iter().map(|&o| lrd[o]).sum::<f64>() / neighbors[i].len() as f64;
            mean_neighbor_lrd / lrd[i]
        })
        .collect()
}

/// Min–max normalize to `[0, 1]`.
///
/// Returns `None` when the values are not all finite or have zero range,
/// since a constant factor carries no ranking.
pub fn min_max_normalize(values: &[f64]) -> Option<Vec<f32>> {
    if values.is_empty() || values.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range <= f64::EPSILON {
        return None;
    }
    Some(
        values
            .iter()
            .map(|v| (((v - min) / range) as f32).clamp(0.0, 1.0))
            .collect(),
    )
}
