//! Per-flip cost bounds used to calibrate annealing schedules.
//!
//! Each variable's bound depends only on its own affected list, so both
//! estimators are a parallel map over variables followed by a max/min
//! reduction.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rayon::prelude::*;

/// Largest cost change a single flip can cause.
///
/// A flip only moves clauses on one polarity side across the 0/1 threshold, so
/// the per-variable bound is the larger of the two side sums.
pub fn max_cost_diff(affected: &[Vec<i32>], weights: &[f64]) -> f64 {
    affected
        .par_iter()
        .map(|clauses| {
            let mut positive_sum = 0.0_f64;
            let mut negative_sum = 0.0_f64;
            for &clause_id in clauses {
                debug_assert!(clause_id != 0);
                let w = weights[clause_id.unsigned_abs() as usize];
                if clause_id > 0 {
                    positive_sum += w;
                } else {
                    negative_sum += w;
                }
            }
            positive_sum.max(negative_sum)
        })
        .reduce(|| 0.0, f64::max)
}

/// Smallest nonzero cost change a single flip is expected to cause.
///
/// Returns 0 when there are no variables.
pub fn min_cost_diff(affected: &[Vec<i32>], weights: &[f64]) -> f64 {
    let min = affected
        .par_iter()
        .map(|clauses| {
            let mut positive = Vec::new();
            let mut negative = Vec::new();
            for &clause_id in clauses {
                debug_assert!(clause_id != 0);
                let w = weights[clause_id.unsigned_abs() as usize];
                if clause_id > 0 {
                    positive.push(w);
                } else {
                    negative.push(w);
                }
            }
            let smallest = positive
                .iter()
                .chain(negative.iter())
                .copied()
                .fold(f64::INFINITY, f64::min);
            least_diff(positive, negative).unwrap_or(smallest)
        })
        .reduce(|| f64::INFINITY, f64::min);
    if min.is_finite() { min } else { 0.0 }
}

/// Greedy differencing between two weight multisets.
///
/// With one side empty this is the other side's smallest weight. Otherwise the
/// largest weights of both sides are repeatedly cancelled against each other,
/// the remainder going back to the side it came from; the smallest nonzero
/// remainder seen is returned, or `None` if every cancellation was exact.
pub fn least_diff(positive: Vec<f64>, negative: Vec<f64>) -> Option<f64> {
    match (positive.is_empty(), negative.is_empty()) {
        (true, true) => return None,
        (true, false) => return negative.into_iter().reduce(f64::min),
        (false, true) => return positive.into_iter().reduce(f64::min),
        (false, false) => {}
    }

    let mut a = positive.into_iter().map(Weight).collect::<BinaryHeap<_>>();
    let mut b = negative.into_iter().map(Weight).collect::<BinaryHeap<_>>();
    let mut min = None::<f64>;
    while let (Some(Weight(x)), Some(Weight(y))) = (a.peek().copied(), b.peek().copied()) {
        a.pop();
        b.pop();
        let delta = x - y;
        if delta > 0.0 {
            a.push(Weight(delta));
        } else if delta < 0.0 {
            b.push(Weight(-delta));
        } else if a.len() < b.len() {
            a.push(Weight(x));
        } else {
            b.push(Weight(y));
        }
        let delta = delta.abs();
        if delta != 0.0 && min.map_or(true, |m| delta < m) {
            min = Some(delta);
        }
    }
    min
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Weight(f64);

impl Eq for Weight {}

impl PartialOrd for Weight {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Weight {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_diff_one_sided() {
        assert_eq!(least_diff(vec![3.0, 1.5, 2.0], vec![]), Some(1.5));
        assert_eq!(least_diff(vec![], vec![4.0]), Some(4.0));
        assert_eq!(least_diff(vec![], vec![]), None);
    }

    #[test]
    fn least_diff_exact_cancellation() {
        assert_eq!(least_diff(vec![3.0], vec![3.0]), None);
        // 4-2 leaves 2 against 2, which cancels exactly
        assert_eq!(least_diff(vec![2.0, 2.0], vec![4.0]), Some(2.0));
    }

    #[test]
    fn least_diff_tracks_smallest_remainder() {
        // 5-3 = 2 back on a, then 2-1 = 1
        assert_eq!(least_diff(vec![5.0], vec![3.0, 1.0]), Some(1.0));
        assert_eq!(least_diff(vec![2.0], vec![1.0]), Some(1.0));
    }

    #[test]
    fn bounds_on_empty_encoding() {
        assert_eq!(max_cost_diff(&[], &[0.0]), 0.0);
        assert_eq!(min_cost_diff(&[], &[0.0]), 0.0);
    }
}
