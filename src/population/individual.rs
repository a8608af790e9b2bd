//! A single candidate solution.

use crate::error::PreconditionViolation;
use crate::problem::{is_feasible, Problem};

/// One candidate solution: decision, velocity, fitness and constraints.
///
/// Fitness and constraint values are computed from the decision vector when
/// the individual is built and every time the decision vector changes, so
/// they are never stale. The velocity is free-form and algorithm defined.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Individual {
    decision: Vec<f64>,
    velocity: Vec<f64>,
    fitness: Vec<f64>,
    constraints: Vec<f64>,
}

impl Individual {
    /// Evaluates `decision` against `problem` and builds an individual.
    ///
    /// Fails if the decision vector is malformed or out of bounds, or if the
    /// velocity length differs from the decision length.
    pub fn new(
        problem: &dyn Problem,
        decision: Vec<f64>,
        velocity: Vec<f64>,
    ) -> Result<Self, PreconditionViolation> {
        problem.verify_decision(&decision)?;
        check_len(decision.len(), velocity.len())?;
        Ok(Self::evaluate(problem, decision, velocity))
    }

    /// Like [`new`](Self::new) with a zero velocity.
    pub fn at_rest(problem: &dyn Problem, decision: Vec<f64>) -> Result<Self, PreconditionViolation> {
        let velocity = vec![0.0; decision.len()];
        Self::new(problem, decision, velocity)
    }

    /// Builds an individual from an already verified decision vector.
    pub(crate) fn evaluate(problem: &dyn Problem, decision: Vec<f64>, velocity: Vec<f64>) -> Self {
        let fitness = problem.objective(&decision);
        let constraints = problem.constraints(&decision);
        Self {
            decision,
            velocity,
            fitness,
            constraints,
        }
    }

    /// Decision vector.
    pub fn decision(&self) -> &[f64] {
        &self.decision
    }

    /// Velocity vector, same length as the decision.
    pub fn velocity(&self) -> &[f64] {
        &self.velocity
    }

    /// Objective values at the current decision.
    pub fn fitness(&self) -> &[f64] {
        &self.fitness
    }

    /// Constraint values at the current decision.
    pub fn constraints(&self) -> &[f64] {
        &self.constraints
    }

    /// `true` if every constraint is satisfied.
    pub fn is_feasible(&self) -> bool {
        is_feasible(&self.constraints)
    }

    /// `true` if this individual is strictly preferred over `other` by
    /// `problem`, constraints included.
    pub fn is_preferred_over(&self, other: &Individual, problem: &dyn Problem) -> bool {
        problem.compare_solutions(
            &self.fitness,
            &self.constraints,
            &other.fitness,
            &other.constraints,
        )
    }

    /// Replaces the velocity. Its length must match the decision vector.
    pub fn set_velocity(&mut self, velocity: Vec<f64>) -> Result<(), PreconditionViolation> {
        check_len(self.decision.len(), velocity.len())?;
        self.velocity = velocity;
        Ok(())
    }

    /// Replaces an already verified decision vector and re-evaluates.
    pub(crate) fn assign_decision(&mut self, problem: &dyn Problem, decision: Vec<f64>) {
        self.fitness = problem.objective(&decision);
        self.constraints = problem.constraints(&decision);
        self.decision = decision;
    }

    /// Checks that this individual has the shape `problem` expects.
    pub(crate) fn verify_shape(&self, problem: &dyn Problem) -> Result<(), PreconditionViolation> {
        problem.verify_decision(&self.decision)?;
        check_len(self.decision.len(), self.velocity.len())?;
        check_len(problem.fitness_dimension(), self.fitness.len())?;
        check_len(problem.constraint_dimension(), self.constraints.len())
    }
}

fn check_len(expected: usize, actual: usize) -> Result<(), PreconditionViolation> {
    if expected == actual {
        Ok(())
    } else {
        Err(PreconditionViolation::DimensionMismatch { expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::FnProblem;

    fn parabola() -> FnProblem {
        FnProblem::scalar(vec![-10.0, -10.0], vec![10.0, 10.0], |x| x[0] * x[0] + x[1] * x[1])
            .unwrap()
            .with_constraints(1, |x| vec![x[0] - 5.0])
    }

    #[test]
    fn test_new_evaluates() {
        let p = parabola();
        let ind = Individual::at_rest(&p, vec![1.0, 2.0]).unwrap();
        assert_eq!(ind.fitness(), &[5.0]);
        assert_eq!(ind.constraints(), &[-4.0]);
        assert_eq!(ind.velocity(), &[0.0, 0.0]);
        assert!(ind.is_feasible());
    }

    #[test]
    fn test_new_rejects_out_of_bounds() {
        let p = parabola();
        assert!(Individual::at_rest(&p, vec![11.0, 0.0]).is_err());
        assert!(Individual::new(&p, vec![0.0, 0.0], vec![0.0]).is_err());
    }

    #[test]
    fn test_assign_decision_keeps_fitness_in_sync() {
        let p = parabola();
        let mut ind = Individual::at_rest(&p, vec![1.0, 1.0]).unwrap();
        ind.assign_decision(&p, vec![6.0, 0.0]);
        assert_eq!(ind.fitness(), &[36.0]);
        assert_eq!(ind.constraints(), &[1.0]);
        assert!(!ind.is_feasible());
    }

    #[test]
    fn test_preference_folds_constraints() {
        let p = parabola();
        let feasible = Individual::at_rest(&p, vec![4.0, 4.0]).unwrap();
        let infeasible = Individual::at_rest(&p, vec![6.0, 0.0]).unwrap();
        assert!(feasible.is_preferred_over(&infeasible, &p));
        assert!(!infeasible.is_preferred_over(&feasible, &p));
        assert!(!feasible.is_preferred_over(&feasible, &p));
    }

    #[test]
    fn test_set_velocity_checks_length() {
        let p = parabola();
        let mut ind = Individual::at_rest(&p, vec![0.0, 0.0]).unwrap();
        assert!(ind.set_velocity(vec![1.0]).is_err());
        ind.set_velocity(vec![1.0, -1.0]).unwrap();
        assert_eq!(ind.velocity(), &[1.0, -1.0]);
    }
}
