//! Recall metrics for checking approximate collections against brute force.
//!
//! ```rust
//! use neighborhood::eval::recall_at_k;
//!
//! let truth = [1, 2, 3, 4];
//! let found = [2, 9, 4, 1];
//! assert_eq!(recall_at_k(&truth, &found, 4), 0.75);
//! ```

use std::collections::HashSet;

use crate::collection::Neighbor;

/// Fraction of the true k nearest neighbours that were retrieved.
///
/// recall@k = |retrieved ∩ ground_truth| / k, considering the first `k`
/// entries of each list. Returns 0 for `k == 0` or empty ground truth.
pub fn recall_at_k(ground_truth: &[usize], retrieved: &[usize], k: usize) -> f64 {
    if k == 0 || ground_truth.is_empty() {
        return 0.0;
    }

    let gt_set: HashSet<usize> = ground_truth.iter().take(k).copied().collect();
    let hits = retrieved
        .iter()
        .take(k)
        .copied()
        .collect::<HashSet<usize>>()
        .intersection(&gt_set)
        .count();
    hits as f64 / gt_set.len() as f64
}

/// Mean recall@k across paired ground-truth and retrieved lists.
pub fn mean_recall(ground_truths: &[Vec<usize>], retrievals: &[Vec<usize>], k: usize) -> f64 {
    if ground_truths.is_empty() {
        return 0.0;
    }

    let total: f64 = ground_truths
        .iter()
        .zip(retrievals)
        .map(|(gt, ret)| recall_at_k(gt, ret, k))
        .sum();

    total / ground_truths.len() as f64
}

/// Positions of a result list, for feeding [`recall_at_k`].
pub fn indices(neighbors: &[Neighbor]) -> Vec<usize> {
    neighbors.iter().map(|n| n.index).collect()
}
