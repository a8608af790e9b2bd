//! Non-dominated sorting and crowding distance.
//!
//! Used to order individuals of multi-objective populations, where raw
//! fitness gives only a partial order.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use crate::problem::{dominance, Dominance};

/// Result of non-dominated sorting.
///
/// Each element of `ranks` corresponds to the Pareto rank of the solution
/// at the same index. Rank 0 is the Pareto front (non-dominated solutions).
#[derive(Debug, Clone, Default)]
pub struct NondominatedSortResult {
    /// Pareto rank for each solution (0 = front).
    pub ranks: Vec<usize>,

    /// Indices grouped by front: `fronts[0]` contains rank-0 indices, etc.
    pub fronts: Vec<Vec<usize>>,
}

/// Fast non-dominated sorting of objective vectors (minimization).
///
/// # Example
///
/// ```
/// use u_island::population::ranking::non_dominated_sort;
///
/// let objectives = vec![
///     vec![1.0, 5.0],
///     vec![3.0, 3.0],
///     vec![5.0, 1.0],
///     vec![4.0, 4.0], // dominated by the second
/// ];
///
/// let result = non_dominated_sort(&objectives);
/// assert_eq!(result.ranks, vec![0, 0, 0, 1]);
/// ```
pub fn non_dominated_sort(objectives: &[Vec<f64>]) -> NondominatedSortResult {
    non_dominated_sort_by(objectives.len(), |i, j| {
        dominance(&objectives[i], &objectives[j])
    })
}

/// Non-dominated sorting over `n` items with a caller-supplied relation.
///
/// `relation(i, j)` reports whether item `i` dominates item `j`, the reverse,
/// or neither. This lets callers fold constraint feasibility into the order.
///
/// # Complexity
///
/// O(n²) relation calls.
pub fn non_dominated_sort_by<F>(n: usize, mut relation: F) -> NondominatedSortResult
where
    F: FnMut(usize, usize) -> Dominance,
{
    if n == 0 {
        return NondominatedSortResult::default();
    }

    let mut domination_count = vec![0usize; n];
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ranks = vec![0usize; n];

    for i in 0..n {
        for j in (i + 1)..n {
            match relation(i, j) {
                Dominance::Left => {
                    dominated_by[i].push(j);
                    domination_count[j] += 1;
                }
                Dominance::Right => {
                    dominated_by[j].push(i);
                    domination_count[i] += 1;
                }
                Dominance::Neither => {}
            }
        }
    }

    let mut current: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();
    let mut fronts = Vec::new();

    while !current.is_empty() {
        let mut next_front = Vec::new();
        for &i in &current {
            for &j in &dominated_by[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    ranks[j] = fronts.len() + 1;
                    next_front.push(j);
                }
            }
        }
        next_front.sort_unstable();
        fronts.push(std::mem::replace(&mut current, next_front));
    }

    NondominatedSortResult { ranks, fronts }
}

/// Crowding distance of each solution, treating them all as one front.
///
/// Boundary solutions (min/max for any objective) receive `f64::INFINITY`.
/// Higher distance means the solution is more isolated.
pub fn crowding_distance(objectives: &[Vec<f64>]) -> Vec<f64> {
    let everyone: Vec<usize> = (0..objectives.len()).collect();
    front_crowding(objectives, &everyone)
}

/// Crowding distance of every solution, computed front by front.
pub fn crowding_by_front(objectives: &[Vec<f64>], fronts: &[Vec<usize>]) -> Vec<f64> {
    let mut distances = vec![0.0; objectives.len()];
    for front in fronts {
        for (&i, d) in front.iter().zip(front_crowding(objectives, front)) {
            distances[i] = d;
        }
    }
    distances
}

/// Crowding of the members of `front`, listed in `front` order.
fn front_crowding(objectives: &[Vec<f64>], front: &[usize]) -> Vec<f64> {
    let size = front.len();
    if size <= 2 {
        return vec![f64::INFINITY; size];
    }

    let mut distances = vec![0.0f64; size];
    let mut order: Vec<usize> = (0..size).collect();
    for k in 0..objectives[front[0]].len() {
        let value = |slot: usize| objectives[front[slot]][k];
        order.sort_by(|&a, &b| value(a).total_cmp(&value(b)));

        let (low, high) = (order[0], order[size - 1]);
        let span = value(high) - value(low);
        distances[low] = f64::INFINITY;
        distances[high] = f64::INFINITY;
        if span > 0.0 {
            for window in order.windows(3) {
                distances[window[1]] += (value(window[2]) - value(window[0])) / span;
            }
        }
    }
    distances
}
