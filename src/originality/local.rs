//! Neighborhood novelty from raw cosine distances.

use crate::distance::{centroid, cosine_distance, cosine_matrix, mean_of_smallest};

/// Score used when there is nothing to compare against.
pub const NO_NEIGHBOR_SCORE: f32 = 1.0;

/// Novelty of every vector against the rest of the set.
///
/// For each vector: `1 - mean` cosine distance to its `k` nearest other
/// vectors, with `k = min(k, n - 1)`, clamped to `[0, 1]`. Sets of zero or
/// one vector score [`NO_NEIGHBOR_SCORE`].
pub fn local_scores(vectors: &[&[f32]], k: usize) -> Vec<f32> {
    let n = vectors.len();
    if n <= 1 {
        return vec![NO_NEIGHBOR_SCORE; n];
    }
    let k = k.clamp(1, n - 1);
    let matrix = cosine_matrix(vectors);
    matrix
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let others: Vec<f32> = row
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, d)| *d)
                .collect();
            to_score(mean_of_smallest(others, k))
        })
        .collect()
}

/// Novelty of one query vector against a set of reference vectors.
pub fn novelty_against(query: &[f32], reference: &[&[f32]], k: usize) -> f32 {
    let distances: Vec<f32> = reference
        .iter()
        .map(|r| cosine_distance(query, r))
        .collect();
    to_score(mean_of_smallest(distances, k.max(1)))
}

/// Novelty of a cluster: its mean vector against every non-member.
///
/// Returns `None` when the cluster has no members or there are no
/// non-members to compare with.
pub fn centroid_novelty(
    members: &[usize],
    corpus: &[&[f32]],
    k: usize,
) -> Option<f32> {
    if members.is_empty() {
        return None;
    }
    let member_vectors: Vec<&[f32]> = members.iter().map(|&i| corpus[i]).collect();
    let center = centroid(&member_vectors);

    let mut is_member = vec![false; corpus.len()];
    for &i in members {
        is_member[i] = true;
    }
    let rest: Vec<&[f32]> = corpus
        .iter()
        .zip(is_member.iter())
        .filter(|(_, m)| !**m)
        .map(|(v, _)| *v)
        .collect();
    if rest.is_empty() {
        return None;
    }
    Some(novelty_against(&center, &rest, k))
}

fn to_score(mean_distance: Option<f32>) -> f32 {
    match mean_distance {
        Some(d) if d.is_finite() => (1.0 - d).clamp(0.0, 1.0),
        Some(_) => NO_NEIGHBOR_SCORE,
        None => NO_NEIGHBOR_SCORE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(data: &[Vec<f32>]) -> Vec<&[f32]> {
        data.iter().map(|v| v.as_slice()).collect()
    }

    #[test]
    fn degenerate_sets_score_one() {
        assert!(local_scores(&[], 5).is_empty());
        let one = vec![vec![1.0, 0.0]];
        assert_eq!(local_scores(&refs(&one), 5), vec![1.0]);
    }

    #[test]
    fn outlier_scores_lowest() {
        let data = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.98, 0.05, 0.0],
            vec![0.97, 0.0, 0.05],
            vec![0.99, 0.02, 0.01],
            vec![0.0, 0.0, 1.0],
        ];
        let scores = local_scores(&refs(&data), 5);
        let min_idx = scores
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(min_idx, 4);
        assert!(scores.iter().all(|s| (0.0..=1.0).contains(s)));
    }

    #[test]
    fn identical_vectors_score_one() {
        let data = vec![vec![1.0, 1.0]; 3];
        let scores = local_scores(&refs(&data), 5);
        assert!(scores.iter().all(|s| (*s - 1.0).abs() < 1e-6), "{scores:?}");
    }

    #[test]
    fn zero_vectors_do_not_panic() {
        // Zero-norm vectors sit at the maximal distance from everything.
        let data = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 0.0]];
        let scores = local_scores(&refs(&data), 5);
        assert_eq!(scores, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn centroid_novelty_needs_non_members() {
        let data = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let corpus = refs(&data);
        assert_eq!(centroid_novelty(&[0, 1], &corpus, 5), None);
        assert_eq!(centroid_novelty(&[], &corpus, 5), None);
        // Orthogonal: distance 1, score 0.
        let s = centroid_novelty(&[0], &corpus, 5).unwrap();
        assert!(s.abs() < 1e-6);
    }
}
