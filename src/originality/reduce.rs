//! Neighborhood-preserving reduction (Laplacian eigenmap).
//!
//! ```text
//! 1. Cosine kNN graph, weight w_ij = max(1 - d_ij, 0.001), symmetrized by max
//! 2. Normalized adjacency A = D^{-1/2} W D^{-1/2}, shifted to M = (A + I) / 2
//! 3. Orthogonal iteration for the top m+1 eigenvectors of M
//! 4. Drop the trivial eigenvector D^{1/2}·1, rescale rows by D^{-1/2}
//! ```
//!
//! Points that are neighbors in the kNN graph stay close in the reduced
//! space; weakly connected points are pushed away from everything. The
//! starting basis comes from a seeded RNG, so the output is a deterministic
//! function of the input.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::distance::{cosine_matrix, nearest_indices};
use crate::error::{Error, Result};

const MIN_EDGE_WEIGHT: f64 = 0.001;
const MAX_ITERATIONS: usize = 300;
const TOLERANCE: f64 = 1e-9;

/// Parameters of the reduction.
#[derive(Debug, Clone, Copy)]
pub struct ReduceConfig {
    /// Neighbors per point in the affinity graph.
    pub n_neighbors: usize,
    /// Output dimensionality.
    pub n_components: usize,
    /// Seed for the starting basis.
    pub seed: u64,
}

/// Reduce `vectors` to `n_components` dimensions.
///
/// Fails when there are not enough points for the requested number of
/// components (`n <= n_components + 1`) or the iteration collapses.
pub fn spectral_reduce(vectors: &[&[f32]], config: &ReduceConfig) -> Result<Vec<Vec<f64>>> {
    let n = vectors.len();
    let m = config.n_components;
    if m == 0 {
        return Err(Error::InvalidParameter {
            name: "n_components",
            message: "must be at least 1",
        });
    }
    if n <= m + 1 {
        return Err(Error::InvalidClusterCount {
            requested: m + 1,
            n_items: n,
        });
    }

    let weights = knn_affinity(vectors, config.n_neighbors.clamp(1, n - 1));
    let degree: Vec<f64> = weights.iter().map(|row| row.iter().sum()).collect();
    if degree.iter().any(|d| *d <= 0.0 || !d.is_finite()) {
        return Err(Error::Other("affinity graph has an isolated point".into()));
    }
    let inv_sqrt: Vec<f64> = degree.iter().map(|d| 1.0 / d.sqrt()).collect();

    // M = (D^{-1/2} W D^{-1/2} + I) / 2
    let mut shifted = vec![vec![0.0f64; n]; n];
    for i in 0..n {
        for j in 0..n {
            shifted[i][j] = 0.5 * inv_sqrt[i] * weights[i][j] * inv_sqrt[j];
        }
        shifted[i][i] += 0.5;
    }

    // Trivial eigenvector of A (eigenvalue 1).
    let mut trivial: Vec<f64> = degree.iter().map(|d| d.sqrt()).collect();
    normalize(&mut trivial);

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut basis: Vec<Vec<f64>> = (0..m)
        .map(|_| (0..n).map(|_| rng.random::<f64>() - 0.5).collect())
        .collect();
    orthonormalize(&mut basis, &trivial, &mut rng)?;

    for _ in 0..MAX_ITERATIONS {
        let mut next: Vec<Vec<f64>> = basis.iter().map(|q| mat_vec(&shifted, q)).collect();
        orthonormalize(&mut next, &trivial, &mut rng)?;

        let drift = basis
            .iter()
            .zip(next.iter())
            .map(|(a, b)| 1.0 - dot(a, b).abs())
            .fold(0.0f64, f64::max);
        basis = next;
        if drift < TOLERANCE {
            break;
        }
    }

    Ok((0..n)
        .map(|i| basis.iter().map(|q| q[i] * inv_sqrt[i]).collect())
        .collect())
}

/// Symmetric kNN affinity matrix over cosine distance.
fn knn_affinity(vectors: &[&[f32]], k: usize) -> Vec<Vec<f64>> {
    let n = vectors.len();
    let distances = cosine_matrix(vectors);
    let mut weights = vec![vec![0.0f64; n]; n];
    for (i, row) in distances.iter().enumerate() {
        for j in nearest_indices(row, i, k) {
            let w = (1.0 - row[j] as f64).max(MIN_EDGE_WEIGHT);
            // Symmetrize by keeping the stronger direction.
            if w > weights[i][j] {
                weights[i][j] = w;
                weights[j][i] = w;
            }
        }
    }
    weights
}

/// Gram-Schmidt against `fixed` and each other, reseeding collapsed columns.
fn orthonormalize(basis: &mut [Vec<f64>], fixed: &[f64], rng: &mut StdRng) -> Result<()> {
    for c in 0..basis.len() {
        let mut attempts = 0;
        loop {
            let mut v = basis[c].clone();
            project_out(&mut v, fixed);
            for prev in basis.iter().take(c) {
                project_out(&mut v, prev);
            }
            if normalize(&mut v) > 1e-10 {
                basis[c] = v;
                break;
            }
            attempts += 1;
            if attempts > 3 {
                return Err(Error::Other("reduction basis collapsed".into()));
            }
            basis[c] = (0..fixed.len()).map(|_| rng.random::<f64>() - 0.5).collect();
        }
    }
    Ok(())
}

fn project_out(v: &mut [f64], u: &[f64]) {
    let p = dot(v, u);
    for (x, y) in v.iter_mut().zip(u.iter()) {
        *x -= p * y;
    }
}

/// Scale to unit length; returns the norm before scaling.
fn normalize(v: &mut [f64]) -> f64 {
    let norm = dot(v, v).sqrt();
    if norm > 1e-10 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
    norm
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn mat_vec(m: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    m.iter().map(|row| dot(row, v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(data: &[Vec<f32>]) -> Vec<&[f32]> {
        data.iter().map(|v| v.as_slice()).collect()
    }

    fn sample() -> Vec<Vec<f32>> {
        (0..12)
            .map(|i| {
                let t = i as f32 * 0.13;
                vec![t.cos(), t.sin(), 0.1 * (i % 3) as f32]
            })
            .collect()
    }

    fn config() -> ReduceConfig {
        ReduceConfig {
            n_neighbors: 4,
            n_components: 2,
            seed: 7,
        }
    }

    #[test]
    fn output_shape() {
        let data = sample();
        let out = spectral_reduce(&refs(&data), &config()).unwrap();
        assert_eq!(out.len(), 12);
        assert!(out.iter().all(|row| row.len() == 2));
        assert!(out.iter().flatten().all(|x| x.is_finite()));
    }

    #[test]
    fn deterministic_for_same_seed() {
        let data = sample();
        let a = spectral_reduce(&refs(&data), &config()).unwrap();
        let b = spectral_reduce(&refs(&data), &config()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn too_few_points_is_an_error() {
        let data = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]];
        assert!(spectral_reduce(&refs(&data), &config()).is_err());
    }

    #[test]
    fn basis_is_orthonormal_after_projection() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut fixed = vec![1.0, 1.0, 1.0, 1.0];
        normalize(&mut fixed);
        let mut basis = vec![vec![1.0, 0.0, 0.0, 0.0], vec![1.0, 1.0, 0.0, 0.0]];
        orthonormalize(&mut basis, &fixed, &mut rng).unwrap();
        assert!(dot(&basis[0], &fixed).abs() < 1e-9);
        assert!(dot(&basis[0], &basis[1]).abs() < 1e-9);
        assert!((dot(&basis[1], &basis[1]) - 1.0).abs() < 1e-9);
    }
}
