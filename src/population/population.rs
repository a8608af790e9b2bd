//! The population container.

use super::individual::Individual;
use super::ranking::{crowding_by_front, non_dominated_sort_by};
use crate::error::{PreconditionViolation, Result};
use crate::problem::{Dominance, Problem};
use crate::rng::UniformSource;
use std::sync::Arc;

/// An ordered collection of individuals bound to one shared problem.
///
/// Every individual has the problem's dimension, fitness dimension and
/// constraint dimension. The population only grows, shrinks or replaces
/// members through its own operators, each of which validates its inputs
/// before touching anything.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_island::population::Population;
/// use u_island::problem::FnProblem;
/// use u_island::rng::seeded;
///
/// let problem = Arc::new(FnProblem::scalar(vec![-5.0], vec![5.0], |x| x[0] * x[0]).unwrap());
/// let mut rng = seeded(42);
/// let pop = Population::random(problem, 20, &mut rng).unwrap();
///
/// assert_eq!(pop.len(), 20);
/// let best = pop.best().unwrap();
/// assert!(pop.iter().all(|ind| best.fitness()[0] <= ind.fitness()[0]));
/// ```
#[derive(Clone)]
pub struct Population {
    problem: Arc<dyn Problem>,
    individuals: Vec<Individual>,
}

impl Population {
    /// Creates an empty population bound to `problem`.
    pub fn new(problem: Arc<dyn Problem>) -> Self {
        Self {
            problem,
            individuals: Vec::new(),
        }
    }

    /// Creates `n` random individuals within the problem bounds.
    pub fn random(problem: Arc<dyn Problem>, n: usize, rng: &mut dyn UniformSource) -> Result<Self> {
        let lower = problem.lower_bounds().to_vec();
        let upper = problem.upper_bounds().to_vec();
        let mut pop = Self::new(problem);
        pop.create_random(&lower, &upper, n, rng)?;
        Ok(pop)
    }

    /// The problem every individual is evaluated against.
    pub fn problem(&self) -> &Arc<dyn Problem> {
        &self.problem
    }

    /// `true` if both populations are bound to the same problem instance.
    pub fn shares_problem_with(&self, other: &Population) -> bool {
        Arc::ptr_eq(&self.problem, &other.problem)
    }

    /// Number of individuals.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// `true` if there are no individuals.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Individual at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Individual> {
        self.individuals.get(index)
    }

    /// All individuals in slot order.
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Iterates over the individuals in slot order.
    pub fn iter(&self) -> std::slice::Iter<'_, Individual> {
        self.individuals.iter()
    }

    /// Replaces the population with `n` random individuals.
    ///
    /// Continuous components are uniform in `[lower[i], upper[i])`, integer
    /// components uniform integers in `[lower[i], upper[i]]`. Velocities are
    /// zero; see [`reset_velocities`](Self::reset_velocities).
    ///
    /// `lower`/`upper` must nest inside the problem bounds.
    pub fn create_random(
        &mut self,
        lower: &[f64],
        upper: &[f64],
        n: usize,
        rng: &mut dyn UniformSource,
    ) -> Result<()> {
        self.check_sampling_box(lower, upper, true)?;
        let continuous = self.problem.continuous_dimension();
        let dimension = self.problem.dimension();

        let mut individuals = Vec::with_capacity(n);
        for _ in 0..n {
            let decision: Vec<f64> = (0..dimension)
                .map(|i| {
                    if i < continuous {
                        draw_continuous(rng, lower[i], upper[i])
                    } else {
                        draw_integer(rng, lower[i], upper[i])
                    }
                })
                .collect();
            individuals.push(Individual::evaluate(
                self.problem.as_ref(),
                decision,
                vec![0.0; dimension],
            ));
        }
        self.individuals = individuals;
        log::debug!(
            "created {} random individuals for {}",
            n,
            self.problem.name()
        );
        Ok(())
    }

    /// Draws every velocity component uniformly in `[lower[i], upper[i])`,
    /// independently of the decision vectors.
    pub fn reset_velocities(&mut self, lower: &[f64], upper: &[f64], rng: &mut dyn UniformSource) -> Result<()> {
        self.check_sampling_box(lower, upper, false)?;
        for ind in &mut self.individuals {
            let velocity = lower
                .iter()
                .zip(upper)
                .map(|(&l, &u)| draw_continuous(rng, l, u))
                .collect();
            ind.set_velocity(velocity)?;
        }
        Ok(())
    }

    /// Appends an individual after checking it fits the problem.
    pub fn push(&mut self, individual: Individual) -> Result<()> {
        individual.verify_shape(self.problem.as_ref())?;
        self.individuals.push(individual);
        Ok(())
    }

    /// Evaluates `decision` and appends it with a zero velocity.
    pub fn push_decision(&mut self, decision: Vec<f64>) -> Result<()> {
        let ind = Individual::at_rest(self.problem.as_ref(), decision)?;
        self.individuals.push(ind);
        Ok(())
    }

    /// Overwrites the individual at `index`.
    pub fn substitute(&mut self, index: usize, individual: Individual) -> Result<()> {
        self.check_index(index)?;
        individual.verify_shape(self.problem.as_ref())?;
        self.individuals[index] = individual;
        Ok(())
    }

    /// Sets the decision vector at `index` and re-evaluates it.
    pub fn set_decision(&mut self, index: usize, decision: Vec<f64>) -> Result<()> {
        self.check_index(index)?;
        self.problem.verify_decision(&decision)?;
        self.individuals[index].assign_decision(self.problem.as_ref(), decision);
        Ok(())
    }

    /// Sets the velocity at `index`.
    pub fn set_velocity(&mut self, index: usize, velocity: Vec<f64>) -> Result<()> {
        self.check_index(index)?;
        self.individuals[index].set_velocity(velocity)?;
        Ok(())
    }

    /// Re-evaluates every individual.
    ///
    /// With the `parallel` feature the evaluations run on the rayon pool.
    pub fn reevaluate(&mut self) {
        let problem = self.problem.as_ref();
        let refresh = |ind: &mut Individual| {
            let decision = ind.decision().to_vec();
            ind.assign_decision(problem, decision);
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            self.individuals.par_iter_mut().for_each(refresh);
        }

        #[cfg(not(feature = "parallel"))]
        self.individuals.iter_mut().for_each(refresh);
    }

    /// Index of the best individual; the first one on ties.
    ///
    /// Single objective: the problem's (constraint-aware) ordering.
    /// Several objectives: lowest non-domination rank, then largest crowding
    /// distance.
    pub fn best_index(&self) -> Result<usize> {
        let all: Vec<&Individual> = self.individuals.iter().collect();
        best_position(self.problem.as_ref(), &all).ok_or_else(|| PreconditionViolation::EmptyPopulation.into())
    }

    /// Index of the worst individual; the first one on ties.
    ///
    /// Several objectives: highest non-domination rank, then smallest
    /// crowding distance.
    pub fn worst_index(&self) -> Result<usize> {
        let all: Vec<&Individual> = self.individuals.iter().collect();
        worst_position(self.problem.as_ref(), &all).ok_or_else(|| PreconditionViolation::EmptyPopulation.into())
    }

    /// The individual at [`best_index`](Self::best_index).
    pub fn best(&self) -> Result<&Individual> {
        Ok(&self.individuals[self.best_index()?])
    }

    /// The individual at [`worst_index`](Self::worst_index).
    pub fn worst(&self) -> Result<&Individual> {
        Ok(&self.individuals[self.worst_index()?])
    }

    /// Mean of the single objective over the population.
    pub fn mean_fitness(&self) -> Result<f64> {
        self.check_scalar_statistics()?;
        let sum: f64 = self.individuals.iter().map(|ind| ind.fitness()[0]).sum();
        Ok(sum / self.len() as f64)
    }

    /// Population standard deviation of the single objective.
    pub fn std_fitness(&self) -> Result<f64> {
        let mean = self.mean_fitness()?;
        let sum_sq: f64 = self
            .individuals
            .iter()
            .map(|ind| (ind.fitness()[0] - mean).powi(2))
            .sum();
        Ok((sum_sq / self.len() as f64).sqrt())
    }

    pub(crate) fn check_index(&self, index: usize) -> std::result::Result<(), PreconditionViolation> {
        if index < self.len() {
            Ok(())
        } else {
            Err(PreconditionViolation::IndexOutOfRange {
                index,
                len: self.len(),
            })
        }
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut Individual {
        &mut self.individuals[index]
    }

    pub(crate) fn overwrite(&mut self, index: usize, individual: Individual) {
        self.individuals[index] = individual;
    }

    fn check_scalar_statistics(&self) -> std::result::Result<(), PreconditionViolation> {
        if self.is_empty() {
            return Err(PreconditionViolation::EmptyPopulation);
        }
        let objectives = self.problem.fitness_dimension();
        if objectives != 1 {
            return Err(PreconditionViolation::MultiObjectiveStatistics(objectives));
        }
        Ok(())
    }

    /// Checks a sampling box. When `nested`, it must also lie inside the
    /// problem bounds.
    fn check_sampling_box(
        &self,
        lower: &[f64],
        upper: &[f64],
        nested: bool,
    ) -> std::result::Result<(), PreconditionViolation> {
        let dimension = self.problem.dimension();
        for len in [lower.len(), upper.len()] {
            if len != dimension {
                return Err(PreconditionViolation::DimensionMismatch {
                    expected: dimension,
                    actual: len,
                });
            }
        }
        let continuous = self.problem.continuous_dimension();
        for index in 0..dimension {
            let (l, u) = (lower[index], upper[index]);
            let empty = if nested && index >= continuous {
                l.ceil() > u.floor()
            } else {
                !(l <= u)
            };
            if empty {
                return Err(PreconditionViolation::InvertedBounds { index, lower: l, upper: u });
            }
            if nested {
                let (pl, pu) = (self.problem.lower_bounds()[index], self.problem.upper_bounds()[index]);
                for value in [l, u] {
                    if value < pl || value > pu {
                        return Err(PreconditionViolation::OutOfBounds {
                            index,
                            value,
                            lower: pl,
                            upper: pu,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

impl std::ops::Index<usize> for Population {
    type Output = Individual;

    fn index(&self, index: usize) -> &Individual {
        &self.individuals[index]
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Individual;
    type IntoIter = std::slice::Iter<'a, Individual>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.iter()
    }
}

impl std::fmt::Debug for Population {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Population")
            .field("problem", &self.problem.name())
            .field("individuals", &self.individuals)
            .finish()
    }
}

fn draw_continuous(rng: &mut dyn UniformSource, lower: f64, upper: f64) -> f64 {
    let x = lower + rng.next_uniform() * (upper - lower);
    // Rounding can land exactly on `upper` for tiny spans.
    if x >= upper && upper > lower {
        lower
    } else {
        x
    }
}

fn draw_integer(rng: &mut dyn UniformSource, lower: f64, upper: f64) -> f64 {
    let lo = lower.ceil();
    let span = upper.floor() - lo + 1.0;
    lo + (rng.next_uniform() * span).floor().min(span - 1.0)
}

/// Position of the best of `items`, first on ties. `None` when empty.
pub(crate) fn best_position(problem: &dyn Problem, items: &[&Individual]) -> Option<usize> {
    if items.is_empty() {
        return None;
    }
    if problem.fitness_dimension() > 1 {
        let (ranks, crowding) = rank_and_crowd(problem, items);
        return (0..items.len()).reduce(|best, i| {
            if ranks[i] < ranks[best] || (ranks[i] == ranks[best] && crowding[i] > crowding[best]) {
                i
            } else {
                best
            }
        });
    }
    (0..items.len()).reduce(|best, i| {
        if items[i].is_preferred_over(items[best], problem) {
            i
        } else {
            best
        }
    })
}

/// Position of the worst of `items`, first on ties. `None` when empty.
pub(crate) fn worst_position(problem: &dyn Problem, items: &[&Individual]) -> Option<usize> {
    if items.is_empty() {
        return None;
    }
    if problem.fitness_dimension() > 1 {
        let (ranks, crowding) = rank_and_crowd(problem, items);
        return (0..items.len()).reduce(|worst, i| {
            if ranks[i] > ranks[worst] || (ranks[i] == ranks[worst] && crowding[i] < crowding[worst]) {
                i
            } else {
                worst
            }
        });
    }
    (0..items.len()).reduce(|worst, i| {
        if items[worst].is_preferred_over(items[i], problem) {
            i
        } else {
            worst
        }
    })
}

fn rank_and_crowd(problem: &dyn Problem, items: &[&Individual]) -> (Vec<usize>, Vec<f64>) {
    let sorted = non_dominated_sort_by(items.len(), |i, j| {
        if items[i].is_preferred_over(items[j], problem) {
            Dominance::Left
        } else if items[j].is_preferred_over(items[i], problem) {
            Dominance::Right
        } else {
            Dominance::Neither
        }
    });
    let objectives: Vec<Vec<f64>> = items.iter().map(|ind| ind.fitness().to_vec()).collect();
    let crowding = crowding_by_front(&objectives, &sorted.fronts);
    (sorted.ranks, crowding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::FnProblem;
    use crate::rng::{seeded, ScriptedUniform};

    fn parabola() -> Arc<dyn Problem> {
        Arc::new(FnProblem::scalar(vec![-10.0], vec![10.0], |x| (x[0] - 3.0).powi(2)).unwrap())
    }

    fn with_decisions(problem: Arc<dyn Problem>, xs: &[f64]) -> Population {
        let mut pop = Population::new(problem);
        for &x in xs {
            pop.push_decision(vec![x]).unwrap();
        }
        pop
    }

    #[test]
    fn test_random_within_bounds() {
        let problem: Arc<dyn Problem> = Arc::new(
            FnProblem::scalar(vec![-1.0, 0.0, 2.0], vec![1.0, 5.0, 4.0], |x| x.iter().sum())
                .unwrap()
                .with_integer_dimension(2),
        );
        let mut rng = seeded(7);
        let pop = Population::random(problem.clone(), 50, &mut rng).unwrap();
        assert_eq!(pop.len(), 50);
        for ind in &pop {
            assert!(problem.verify_decision(ind.decision()).is_ok());
            assert_eq!(ind.decision()[1].fract(), 0.0);
            assert_eq!(ind.velocity(), &[0.0, 0.0, 0.0]);
            assert_eq!(ind.fitness()[0], ind.decision().iter().sum::<f64>());
        }
    }

    #[test]
    fn test_integer_draw_reaches_upper_bound() {
        let problem: Arc<dyn Problem> = Arc::new(
            FnProblem::scalar(vec![0.0], vec![2.0], |x| x[0])
                .unwrap()
                .with_integer_dimension(1),
        );
        let mut rng = ScriptedUniform::new(vec![0.0, 0.5, 0.99]);
        let pop = Population::random(problem, 3, &mut rng).unwrap();
        let xs: Vec<f64> = pop.iter().map(|ind| ind.decision()[0]).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_create_random_rejects_box_outside_problem() {
        let mut pop = Population::new(parabola());
        let mut rng = seeded(1);
        let err = pop.create_random(&[-20.0], &[0.0], 5, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Precondition(PreconditionViolation::OutOfBounds { .. })
        ));
        assert!(pop.is_empty());
    }

    #[test]
    fn test_reset_velocities_within_box() {
        let mut rng = seeded(3);
        let mut pop = Population::random(parabola(), 10, &mut rng).unwrap();
        let before: Vec<Vec<f64>> = pop.iter().map(|ind| ind.decision().to_vec()).collect();
        pop.reset_velocities(&[-1.0], &[1.0], &mut rng).unwrap();
        for (ind, x) in pop.iter().zip(&before) {
            assert!((-1.0..1.0).contains(&ind.velocity()[0]));
            assert_eq!(ind.decision(), x.as_slice());
        }
    }

    #[test]
    fn test_best_and_worst_first_on_ties() {
        let pop = with_decisions(parabola(), &[-8.0, 5.0, 1.0, 8.0, -2.0]);
        // f = 121, 4, 4, 25, 25
        assert_eq!(pop.best_index().unwrap(), 1);
        assert_eq!(pop.worst_index().unwrap(), 0);

        let pop = with_decisions(parabola(), &[8.0, -2.0, 5.0]);
        // f = 25, 25, 4
        assert_eq!(pop.worst_index().unwrap(), 0);
    }

    #[test]
    fn test_best_on_empty_population_fails() {
        let pop = Population::new(parabola());
        assert_eq!(
            pop.best_index(),
            Err(crate::Error::Precondition(PreconditionViolation::EmptyPopulation))
        );
    }

    #[test]
    fn test_best_prefers_feasible() {
        let problem: Arc<dyn Problem> = Arc::new(
            FnProblem::scalar(vec![-10.0], vec![10.0], |x| x[0])
                .unwrap()
                .with_constraints(1, |x| vec![-x[0]]),
        );
        // x = -5 has the lowest objective but violates x >= 0.
        let pop = with_decisions(problem, &[-5.0, 4.0, 2.0]);
        assert_eq!(pop.best_index().unwrap(), 2);
        assert_eq!(pop.worst_index().unwrap(), 0);
    }

    #[test]
    fn test_multi_objective_best_and_worst() {
        let problem: Arc<dyn Problem> = Arc::new(
            FnProblem::new(vec![0.0, 0.0], vec![10.0, 10.0], 2, |x| x.to_vec()).unwrap(),
        );
        let mut pop = Population::new(problem);
        for x in [[1.0, 5.0], [3.0, 3.0], [5.0, 1.0], [6.0, 6.0]] {
            pop.push_decision(x.to_vec()).unwrap();
        }
        // Front 0 boundary points have infinite crowding: first one wins.
        assert_eq!(pop.best_index().unwrap(), 0);
        // (6, 6) is the only dominated point.
        assert_eq!(pop.worst_index().unwrap(), 3);
        assert!(pop.mean_fitness().is_err());
    }

    #[test]
    fn test_statistics() {
        let pop = with_decisions(parabola(), &[1.0, 5.0, 3.0]);
        // f = 4, 4, 0
        let mean = pop.mean_fitness().unwrap();
        assert!((mean - 8.0 / 3.0).abs() < 1e-12);
        let expected = ((2.0 * (4.0 - mean).powi(2) + mean.powi(2)) / 3.0).sqrt();
        assert!((pop.std_fitness().unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_set_decision_reevaluates_and_validates() {
        let mut pop = with_decisions(parabola(), &[0.0, 1.0]);
        pop.set_decision(1, vec![3.0]).unwrap();
        assert_eq!(pop[1].fitness(), &[0.0]);
        assert!(pop.set_decision(1, vec![30.0]).is_err());
        assert!(pop.set_decision(2, vec![0.0]).is_err());
        assert_eq!(pop[1].decision(), &[3.0]);
    }

    #[test]
    fn test_push_rejects_foreign_shape() {
        let other = FnProblem::scalar(vec![0.0, 0.0], vec![1.0, 1.0], |x| x[0]).unwrap();
        let stranger = Individual::at_rest(&other, vec![0.5, 0.5]).unwrap();
        let mut pop = Population::new(parabola());
        assert!(pop.push(stranger.clone()).is_err());
        assert!(pop.is_empty());
        pop.push_decision(vec![0.0]).unwrap();
        assert!(pop.substitute(0, stranger).is_err());
    }

    #[test]
    fn test_reevaluate_is_idempotent() {
        let mut rng = seeded(11);
        let mut pop = Population::random(parabola(), 8, &mut rng).unwrap();
        let before: Vec<Vec<f64>> = pop.iter().map(|ind| ind.fitness().to_vec()).collect();
        pop.reevaluate();
        let after: Vec<Vec<f64>> = pop.iter().map(|ind| ind.fitness().to_vec()).collect();
        assert_eq!(before, after);
    }
}
