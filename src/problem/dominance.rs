//! Pareto dominance and constraint feasibility.
//!
//! All objectives are minimized. Constraint values follow the convention
//! `c <= 0` satisfied, `c > 0` violated by `c`.

/// Dominance relation between two objective vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other (incomparable or equal).
    Neither,
}

/// Compare two objective vectors for Pareto dominance.
///
/// ```
/// use u_island::problem::{dominance, Dominance};
///
/// assert_eq!(dominance(&[1.0, 2.0], &[2.0, 2.0]), Dominance::Left);
/// assert_eq!(dominance(&[1.0, 3.0], &[2.0, 2.0]), Dominance::Neither);
/// ```
pub fn dominance(a: &[f64], b: &[f64]) -> Dominance {
    debug_assert_eq!(a.len(), b.len(), "objective vectors differ in length");

    let (left_wins, right_wins) = a
        .iter()
        .zip(b)
        .fold((false, false), |(left, right), (&x, &y)| (left || x < y, right || y < x));

    match (left_wins, right_wins) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// `true` if `a` is no worse than `b` everywhere and strictly better somewhere.
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    dominance(a, b) == Dominance::Left
}

/// Sum of positive constraint values.
pub fn total_violation(constraints: &[f64]) -> f64 {
    constraints.iter().map(|&c| c.max(0.0)).sum()
}

/// `true` if every constraint is satisfied.
pub fn is_feasible(constraints: &[f64]) -> bool {
    constraints.iter().all(|&c| c <= 0.0)
}
