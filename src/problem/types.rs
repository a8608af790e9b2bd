//! The problem contract.

use super::dominance::{dominates, is_feasible, total_violation};
use crate::error::PreconditionViolation;

/// An optimization problem: bounds, objectives and constraints.
///
/// Decision vectors have [`dimension`](Problem::dimension) components. The
/// first `dimension - integer_dimension` are continuous, the rest are
/// integers stored as `f64`.
///
/// # Minimization
///
/// Every objective is minimized. For maximization, negate the objective.
///
/// # Purity
///
/// [`objective`](Problem::objective) and [`constraints`](Problem::constraints)
/// must depend only on the decision vector and the problem's own immutable
/// configuration. Comparison-heavy algorithms rely on equal inputs producing
/// equal outputs.
///
/// # Thread Safety
///
/// `Problem` must be `Send + Sync` so that populations bound to it can be
/// evolved on separate threads (one island per thread).
pub trait Problem: Send + Sync {
    /// Short human-facing name.
    fn name(&self) -> &str {
        "problem"
    }

    /// Lower bound of each decision component.
    fn lower_bounds(&self) -> &[f64];

    /// Upper bound of each decision component.
    fn upper_bounds(&self) -> &[f64];

    /// Number of decision components.
    fn dimension(&self) -> usize {
        self.lower_bounds().len()
    }

    /// Number of trailing integer components.
    fn integer_dimension(&self) -> usize {
        0
    }

    /// Number of leading continuous components.
    fn continuous_dimension(&self) -> usize {
        self.dimension().saturating_sub(self.integer_dimension())
    }

    /// Number of objectives.
    fn fitness_dimension(&self) -> usize {
        1
    }

    /// Number of constraints. Zero for box-constrained problems.
    fn constraint_dimension(&self) -> usize {
        0
    }

    /// Evaluates the objectives at `x`.
    fn objective(&self, x: &[f64]) -> Vec<f64>;

    /// Evaluates the constraints at `x`: `c <= 0` satisfied, `c > 0` violated.
    fn constraints(&self, _x: &[f64]) -> Vec<f64> {
        Vec::new()
    }

    /// `true` if fitness `a` is strictly preferred over fitness `b`.
    ///
    /// One objective: `a[0] < b[0]`. Several: Pareto dominance.
    fn compare_fitness(&self, a: &[f64], b: &[f64]) -> bool {
        if a.len() == 1 && b.len() == 1 {
            a[0] < b[0]
        } else {
            dominates(a, b)
        }
    }

    /// `true` if constraint vector `a` is strictly preferred over `b`.
    ///
    /// Feasible beats infeasible; between two infeasible vectors the smaller
    /// total violation wins. Two feasible vectors are indifferent.
    fn compare_constraints(&self, a: &[f64], b: &[f64]) -> bool {
        match (is_feasible(a), is_feasible(b)) {
            (true, false) => true,
            (false, false) => total_violation(a) < total_violation(b),
            _ => false,
        }
    }

    /// `true` if the solution `(fa, ca)` is strictly preferred over `(fb, cb)`.
    ///
    /// Feasibility is ranked first; fitness decides only between two
    /// feasible solutions.
    fn compare_solutions(&self, fa: &[f64], ca: &[f64], fb: &[f64], cb: &[f64]) -> bool {
        match (is_feasible(ca), is_feasible(cb)) {
            (true, true) => self.compare_fitness(fa, fb),
            _ => self.compare_constraints(ca, cb),
        }
    }

    /// Checks that `x` has the right length, lies within the bounds
    /// (inclusive) and holds integral values in its integer part.
    fn verify_decision(&self, x: &[f64]) -> Result<(), PreconditionViolation> {
        let lower = self.lower_bounds();
        let upper = self.upper_bounds();
        if x.len() != self.dimension() {
            return Err(PreconditionViolation::DimensionMismatch {
                expected: self.dimension(),
                actual: x.len(),
            });
        }
        let continuous = self.continuous_dimension();
        for (index, &value) in x.iter().enumerate() {
            if !(lower[index]..=upper[index]).contains(&value) {
                return Err(PreconditionViolation::OutOfBounds {
                    index,
                    value,
                    lower: lower[index],
                    upper: upper[index],
                });
            }
            if index >= continuous && value.fract() != 0.0 {
                return Err(PreconditionViolation::NonIntegral { index, value });
            }
        }
        Ok(())
    }
}
