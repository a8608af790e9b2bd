//! Evaluation counting.

use super::types::Problem;
use crate::error::PreconditionViolation;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Wraps a problem and counts objective evaluations.
///
/// The count is diagnostic only: it never influences comparison or
/// evaluation results.
#[derive(Debug, Default)]
pub struct CountingProblem<P> {
    inner: P,
    evaluations: AtomicUsize,
}

impl<P: Problem> CountingProblem<P> {
    /// Wraps `inner` with a zeroed counter.
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            evaluations: AtomicUsize::new(0),
        }
    }

    /// Number of objective evaluations so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }

    /// The wrapped problem.
    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: Problem> Problem for CountingProblem<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn lower_bounds(&self) -> &[f64] {
        self.inner.lower_bounds()
    }

    fn upper_bounds(&self) -> &[f64] {
        self.inner.upper_bounds()
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn integer_dimension(&self) -> usize {
        self.inner.integer_dimension()
    }

    fn continuous_dimension(&self) -> usize {
        self.inner.continuous_dimension()
    }

    fn fitness_dimension(&self) -> usize {
        self.inner.fitness_dimension()
    }

    fn constraint_dimension(&self) -> usize {
        self.inner.constraint_dimension()
    }

    fn objective(&self, x: &[f64]) -> Vec<f64> {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        self.inner.objective(x)
    }

    fn constraints(&self, x: &[f64]) -> Vec<f64> {
        self.inner.constraints(x)
    }

    fn compare_fitness(&self, a: &[f64], b: &[f64]) -> bool {
        self.inner.compare_fitness(a, b)
    }

    fn compare_constraints(&self, a: &[f64], b: &[f64]) -> bool {
        self.inner.compare_constraints(a, b)
    }

    fn compare_solutions(&self, fa: &[f64], ca: &[f64], fb: &[f64], cb: &[f64]) -> bool {
        self.inner.compare_solutions(fa, ca, fb, cb)
    }

    fn verify_decision(&self, x: &[f64]) -> Result<(), PreconditionViolation> {
        self.inner.verify_decision(x)
    }
}
