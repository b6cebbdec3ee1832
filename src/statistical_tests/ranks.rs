//! statistical_tests::ranks — ranking helpers and exact null distributions.
//!
//! Purpose
//! -------
//! Hold the combinatorial building blocks shared by the rank-based tests:
//! average ranks with ties, tie-group sizes for variance corrections, and
//! the exact null distributions of the signed-rank statistic and of the
//! rank-sum `U` statistic.
//!
//! Key behaviors
//! -------------
//! - [`average_ranks`] returns 1-based ranks in input order; tied values get
//!   the mean of the positions they occupy.
//! - [`tie_sizes`] reports the size of every group of equal values.
//! - [`signed_rank_cdf`] and [`rank_sum_sf`] count arrangements by dynamic
//!   programming instead of enumerating subsets.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite; callers filter NaN/inf before ranking.
//! - Ties are exact equality, not a tolerance.
//! - The exact distributions assume no ties; callers switch to the normal
//!   approximation when ties are present.
//!
//! Testing notes
//! -------------
//! - Unit tests compare against small hand-counted distributions.

/// 1-based average ranks of `values`, in input order.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && values[order[j]] == values[order[i]] {
            j += 1;
        }
        // positions i..j are tied
        let avg = (i + 1 + j) as f64 / 2.0;
        for &k in &order[i..j] {
            ranks[k] = avg;
        }
        i = j;
    }
    ranks
}

/// Sizes of all groups of equal values (singletons included).
pub fn tie_sizes(values: &[f64]) -> Vec<usize> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mut sizes = Vec::new();
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i + 1;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        sizes.push(j - i);
        i = j;
    }
    sizes
}

/// Whether any value occurs more than once.
pub fn has_ties(values: &[f64]) -> bool {
    tie_sizes(values).iter().any(|&t| t > 1)
}

/// `P(W ≤ t)` for the signed-rank statistic of `n` untied, non-zero values.
///
/// Notes
/// -----
/// - Counts the subsets of `{1, …, n}` by rank sum; there are `2ⁿ` equally
///   likely sign assignments under the null.
/// - `t` is floored, so non-integer statistics are handled conservatively.
pub fn signed_rank_cdf(n: usize, t: f64) -> f64 {
    if t < 0.0 {
        return 0.0;
    }
    let max_sum = n * (n + 1) / 2;
    let mut counts = vec![0.0_f64; max_sum + 1];
    counts[0] = 1.0;
    for k in 1..=n {
        for s in (k..=k * (k + 1) / 2).rev() {
            counts[s] += counts[s - k];
        }
    }
    let upto = (t.floor() as usize).min(max_sum);
    let below: f64 = counts[..=upto].iter().sum();
    below / 2.0_f64.powi(n as i32)
}

/// `P(U' ≥ u)` for the rank-sum statistic of untied samples of sizes
/// `n1`, `n2`.
///
/// Notes
/// -----
/// - Uses the recurrence `c(i, j, u) = c(i−1, j, u−j) + c(i, j−1, u)` on the
///   number of orderings of `i` x's and `j` y's with `u` (x, y) pairs where
///   x exceeds y, iterating over the larger sample in the outer loop.
/// - The distribution is symmetric in the two sample sizes.
pub fn rank_sum_sf(n1: usize, n2: usize, u: f64) -> f64 {
    let (m, n) = if n1 <= n2 { (n1, n2) } else { (n2, n1) };
    let max_u = m * n;
    if u <= 0.0 {
        return 1.0;
    }
    if u > max_u as f64 {
        return 0.0;
    }

    // table[i][u] for the current number j of y's; j = 0 has only u = 0.
    let mut table = vec![vec![0.0_f64; max_u + 1]; m + 1];
    for row in table.iter_mut() {
        row[0] = 1.0;
    }
    for j in 1..=n {
        for i in 1..=m {
            let (done, rest) = table.split_at_mut(i);
            let prev = &done[i - 1];
            let row = &mut rest[0];
            for s in (j..=i * j).rev() {
                row[s] += prev[s - j];
            }
        }
    }

    let counts = &table[m];
    let total: f64 = counts.iter().sum();
    let from = u.ceil() as usize;
    counts[from..].iter().sum::<f64>() / total
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TOL: f64 = 1e-12;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Average ranks with and without ties.
    // - Tie-group sizes.
    // - Exact null distributions against hand-counted small cases.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify average ranks are returned in input order and ties share the
    // mean of their positions.
    //
    // Given
    // -----
    // - values = [3, 1, 3, 2].
    //
    // Expect
    // ------
    // - ranks = [3.5, 1, 3.5, 2]; tie sizes = [1, 1, 2].
    fn average_ranks_share_positions_on_ties() {
        // Arrange
        let values = [3.0, 1.0, 3.0, 2.0];

        // Act
        let ranks = average_ranks(&values);
        let sizes = tie_sizes(&values);

        // Assert
        assert_eq!(ranks, vec![3.5, 1.0, 3.5, 2.0]);
        assert_eq!(sizes, vec![1, 1, 2]);
        assert!(has_ties(&values));
        assert!(!has_ties(&[1.0, 2.0]));
    }

    #[test]
    // Purpose
    // -------
    // Check the signed-rank CDF against the hand-counted n = 3 case.
    //
    // Given
    // -----
    // - Subset sums of {1, 2, 3}: 0, 1, 2, 3, 3, 4, 5, 6 (8 subsets).
    //
    // Expect
    // ------
    // - P(W ≤ 0) = 1/8, P(W ≤ 3) = 5/8, P(W ≤ 6) = 1.
    fn signed_rank_cdf_matches_hand_count() {
        assert_relative_eq!(signed_rank_cdf(3, 0.0), 1.0 / 8.0, epsilon = TOL);
        assert_relative_eq!(signed_rank_cdf(3, 3.0), 5.0 / 8.0, epsilon = TOL);
        assert_relative_eq!(signed_rank_cdf(3, 6.0), 1.0, epsilon = TOL);
        assert_relative_eq!(signed_rank_cdf(5, 0.0), 1.0 / 32.0, epsilon = TOL);
    }

    #[test]
    // Purpose
    // -------
    // Check the rank-sum survival function against hand-counted cases and
    // its symmetry in the sample sizes.
    //
    // Given
    // -----
    // - n1 = n2 = 3 (20 orderings, one with U = 9).
    // - n1 = 2, n2 = 3 (10 orderings; U ∈ {0..6} counts 1,1,2,2,2,1,1).
    //
    // Expect
    // ------
    // - P(U ≥ 9 | 3, 3) = 1/20; P(U ≥ 5 | 2, 3) = 2/10 = P(U ≥ 5 | 3, 2).
    fn rank_sum_sf_matches_hand_count() {
        assert_relative_eq!(rank_sum_sf(3, 3, 9.0), 1.0 / 20.0, epsilon = TOL);
        assert_relative_eq!(rank_sum_sf(2, 3, 5.0), 0.2, epsilon = TOL);
        assert_relative_eq!(rank_sum_sf(3, 2, 5.0), 0.2, epsilon = TOL);
        assert_relative_eq!(rank_sum_sf(2, 3, 0.0), 1.0, epsilon = TOL);
        assert_relative_eq!(rank_sum_sf(2, 3, 3.0), 0.6, epsilon = TOL);
    }
}
