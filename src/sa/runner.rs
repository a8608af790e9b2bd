//! Adaptive SA execution loop.

use super::config::AnnealingConfig;
use crate::algorithm::Algorithm;
use crate::error::{Result, UnsupportedProblemError};
use crate::population::Population;
use crate::rng::{index_below, UniformSource};

/// Acceptance ratio above which the step grows.
const WIDEN_ABOVE: f64 = 0.6;
/// Acceptance ratio below which the step shrinks.
const NARROW_BELOW: f64 = 0.4;
/// Ratio distance that maps to the full 3x change.
const RATIO_SCALE: f64 = 0.4;

/// Statistics of one [`AdaptiveSimulatedAnnealing::run`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnealingReport {
    /// Index of the individual the walk started from.
    pub best_index: usize,

    /// Temperature stages executed.
    pub stages: usize,

    /// Objective evaluations of in-bounds proposals.
    pub evaluations: usize,

    /// Proposals rejected without evaluation for leaving the bounds.
    pub out_of_bounds: usize,

    /// Accepted proposals (including improvements).
    pub accepted_moves: usize,

    /// Proposals accepted because they improved the current point.
    pub improving_moves: usize,

    /// Temperature after the last stage.
    pub final_temperature: f64,

    /// Whether the starting individual was replaced.
    pub improved: bool,
}

/// Corana-style simulated annealing with per-component adaptive steps.
///
/// Starts from the population's best individual and walks one continuous
/// component at a time. Each component keeps its own step size, widened
/// when most of its moves are accepted and narrowed when few are, never
/// exceeding the initial range. The temperature follows a geometric
/// schedule from `start_temperature` down to `end_temperature`.
///
/// Only the best individual is ever touched, and only if the walk ends on a
/// strictly better point. Its velocity is then set to the displacement.
///
/// Requires a single-objective, box-constrained problem with at least one
/// continuous component. Integer components are carried along unchanged.
///
/// # References
///
/// - Corana, Marchesi, Martini & Ridella (1987), "Minimizing multimodal
///   functions of continuous variables with the simulated annealing algorithm"
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_island::algorithm::Algorithm;
/// use u_island::population::Population;
/// use u_island::problem::FnProblem;
/// use u_island::rng::seeded;
/// use u_island::sa::{AdaptiveSimulatedAnnealing, AnnealingConfig};
///
/// let problem = Arc::new(FnProblem::scalar(vec![-5.0; 3], vec![5.0; 3], |x| {
///     x.iter().map(|v| v * v).sum()
/// }).unwrap());
/// let mut rng = seeded(42);
/// let mut pop = Population::random(problem, 10, &mut rng).unwrap();
/// let before = pop.best().unwrap().fitness()[0];
///
/// let sa = AdaptiveSimulatedAnnealing::new(AnnealingConfig::default()).unwrap();
/// sa.evolve(&mut pop, &mut rng).unwrap();
///
/// assert_eq!(pop.len(), 10);
/// assert!(pop.best().unwrap().fitness()[0] <= before);
/// ```
#[derive(Debug, Clone)]
pub struct AdaptiveSimulatedAnnealing {
    name: String,
    config: AnnealingConfig,
}

impl AdaptiveSimulatedAnnealing {
    /// Identifier used unless [`with_name`](Self::with_name) overrides it.
    pub const DEFAULT_NAME: &'static str = "sa_corana";

    /// Validates `config` and builds the algorithm.
    pub fn new(config: AnnealingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            name: Self::DEFAULT_NAME.to_string(),
            config,
        })
    }

    /// Overrides the identifier returned by [`Algorithm::id_name`].
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The validated configuration.
    pub fn config(&self) -> &AnnealingConfig {
        &self.config
    }

    /// Runs the annealing walk on `population` and reports what happened.
    ///
    /// [`Algorithm::evolve`] is this method with the report discarded.
    pub fn run(&self, population: &mut Population, rng: &mut dyn UniformSource) -> Result<AnnealingReport> {
        let problem = population.problem().clone();
        let continuous = problem.continuous_dimension();
        let stages = self.check_problem(population)?;
        let best_index = population.best_index()?;

        let config = &self.config;
        let lower = problem.lower_bounds();
        let upper = problem.upper_bounds();
        let x0 = population[best_index].decision().to_vec();
        let f0 = population[best_index].fitness().to_vec();

        let cooling = (config.end_temperature / config.start_temperature).powf(1.0 / stages as f64);
        let mut temperature = config.start_temperature;

        let mut current = x0.clone();
        let mut current_fitness = f0.clone();
        let mut candidate = x0.clone();
        let mut step = vec![config.initial_step_range; continuous];
        let mut accepted = vec![0usize; continuous];

        let mut report = AnnealingReport {
            best_index,
            stages,
            evaluations: 0,
            out_of_bounds: 0,
            accepted_moves: 0,
            improving_moves: 0,
            final_temperature: temperature,
            improved: false,
        };

        log::debug!(
            "{}: {} stages from fitness {} on {}",
            self.name,
            stages,
            f0[0],
            problem.name()
        );

        for stage in 0..stages {
            for _ in 0..config.iterations_per_temperature {
                for _ in 0..config.iterations_per_range_adjust {
                    // Sweep all continuous components from a random offset.
                    let mut d = index_below(rng, continuous);
                    for _ in 0..continuous {
                        d = (d + 1) % continuous;

                        let r = 2.0 * rng.next_uniform() - 1.0;
                        candidate[d] = current[d] + r * step[d] * (upper[d] - lower[d]);

                        if candidate[d] > upper[d] || candidate[d] < lower[d] {
                            candidate[d] = current[d];
                            report.out_of_bounds += 1;
                            continue;
                        }

                        let candidate_fitness = problem.objective(&candidate);
                        report.evaluations += 1;

                        let accept = if problem.compare_fitness(&candidate_fitness, &current_fitness) {
                            report.improving_moves += 1;
                            true
                        } else {
                            let probability =
                                ((current_fitness[0] - candidate_fitness[0]).abs() / temperature).exp();
                            rng.next_uniform() < probability
                        };

                        if accept {
                            current[d] = candidate[d];
                            current_fitness = candidate_fitness;
                            accepted[d] += 1;
                            report.accepted_moves += 1;
                        } else {
                            candidate[d] = current[d];
                        }
                    }
                }

                for (s, count) in step.iter_mut().zip(accepted.iter_mut()) {
                    *s = rescale_step(
                        *s,
                        *count,
                        config.iterations_per_range_adjust,
                        config.initial_step_range,
                    );
                    *count = 0;
                }
            }

            temperature *= cooling;
            log::trace!(
                "{}: stage {} done, T = {:.6}, fitness = {}",
                self.name,
                stage,
                temperature,
                current_fitness[0]
            );
        }
        report.final_temperature = temperature;

        if problem.compare_fitness(&current_fitness, &f0) {
            let velocity: Vec<f64> = current.iter().zip(&x0).map(|(new, old)| new - old).collect();
            let slot = population.slot_mut(best_index);
            slot.assign_decision(problem.as_ref(), current);
            slot.set_velocity(velocity)?;
            report.improved = true;
        }

        log::debug!(
            "{}: finished, {} evaluations, {} accepted, improved = {}",
            self.name,
            report.evaluations,
            report.accepted_moves,
            report.improved
        );
        Ok(report)
    }

    /// Checks the problem shape and returns the number of stages.
    fn check_problem(&self, population: &Population) -> std::result::Result<usize, UnsupportedProblemError> {
        let problem = population.problem();
        let algorithm = self.name.clone();
        let continuous = problem.continuous_dimension();

        if continuous == 0 {
            return Err(UnsupportedProblemError::NoContinuousPart { algorithm });
        }
        if problem.constraint_dimension() != 0 {
            return Err(UnsupportedProblemError::Constrained {
                algorithm,
                constraints: problem.constraint_dimension(),
            });
        }
        if problem.fitness_dimension() != 1 {
            return Err(UnsupportedProblemError::MultiObjective {
                algorithm,
                objectives: problem.fitness_dimension(),
            });
        }
        match self.config.stages(continuous) {
            0 => Err(UnsupportedProblemError::InsufficientBudget {
                algorithm,
                budget: self.config.total_iterations,
                per_stage: self.config.iterations_per_stage(continuous),
            }),
            stages => Ok(stages),
        }
    }
}

impl Algorithm for AdaptiveSimulatedAnnealing {
    fn evolve(&self, population: &mut Population, rng: &mut dyn UniformSource) -> Result<()> {
        self.run(population, rng).map(|_| ())
    }

    fn box_clone(&self) -> Box<dyn Algorithm> {
        Box::new(self.clone())
    }

    fn id_name(&self) -> &str {
        &self.name
    }

    fn id_object(&self) -> String {
        let c = &self.config;
        format!(
            "{}[iterations={}, start={}, end={}, per_temperature={}, per_range_adjust={}, range={}]",
            self.name,
            c.total_iterations,
            c.start_temperature,
            c.end_temperature,
            c.iterations_per_temperature,
            c.iterations_per_range_adjust,
            c.initial_step_range
        )
    }
}

/// New step size after `accepted` acceptances in `trials` sweeps.
///
/// Grows up to 3x above a 60% acceptance ratio, shrinks down to 1/3 below
/// 40%, and never exceeds `max`.
fn rescale_step(step: f64, accepted: usize, trials: usize, max: f64) -> f64 {
    let ratio = accepted as f64 / trials as f64;
    let step = if ratio > WIDEN_ABOVE {
        step * (1.0 + 2.0 * (ratio - WIDEN_ABOVE) / RATIO_SCALE)
    } else if ratio < NARROW_BELOW {
        step / (1.0 + 2.0 * (NARROW_BELOW - ratio) / RATIO_SCALE)
    } else {
        step
    };
    step.min(max)
}
