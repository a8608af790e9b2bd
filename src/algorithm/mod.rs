//! The algorithm contract.
//!
//! An algorithm transforms a population in place through
//! [`Algorithm::evolve`]. Implementations must keep the population size and
//! its problem binding, and must never return a population whose best
//! individual is worse than the one it received.
//!
//! Configuration is validated when the algorithm is built, never lazily in
//! `evolve`. Problem shapes the algorithm cannot handle are reported at the
//! start of `evolve`, before anything is modified.

use crate::error::Result;
use crate::population::Population;
use crate::rng::UniformSource;

/// A population-based search strategy.
///
/// The trait is object safe so orchestrators can hold heterogeneous
/// algorithms as `Box<dyn Algorithm>` and clone them per island.
pub trait Algorithm: Send + Sync {
    /// Evolves `population`, drawing all randomness from `rng`.
    fn evolve(&self, population: &mut Population, rng: &mut dyn UniformSource) -> Result<()>;

    /// Deep copy of the configuration.
    fn box_clone(&self) -> Box<dyn Algorithm>;

    /// Identifier assigned at construction.
    fn id_name(&self) -> &str;

    /// Identifier that distinguishes instances with different parameters.
    fn id_object(&self) -> String {
        self.id_name().to_string()
    }
}

impl Clone for Box<dyn Algorithm> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

impl std::fmt::Debug for dyn Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id_object())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{FnProblem, Problem};
    use crate::rng::seeded;
    use std::sync::Arc;

    /// Copies the best individual over the worst one.
    #[derive(Clone)]
    struct CloneBest {
        name: String,
    }

    impl Algorithm for CloneBest {
        fn evolve(&self, population: &mut Population, _rng: &mut dyn UniformSource) -> Result<()> {
            let best = population.best()?.clone();
            let worst = population.worst_index()?;
            population.substitute(worst, best)
        }

        fn box_clone(&self) -> Box<dyn Algorithm> {
            Box::new(self.clone())
        }

        fn id_name(&self) -> &str {
            &self.name
        }
    }

    #[test]
    fn test_boxed_algorithms_clone_and_run() {
        let problem: Arc<dyn Problem> =
            Arc::new(FnProblem::scalar(vec![-1.0], vec![1.0], |x| x[0].abs()).unwrap());
        let mut rng = seeded(9);
        let mut pop = Population::random(problem, 6, &mut rng).unwrap();
        let best_before = pop.best().unwrap().fitness()[0];

        let algo: Box<dyn Algorithm> = Box::new(CloneBest { name: "clone_best".into() });
        let copy = algo.clone();
        copy.evolve(&mut pop, &mut rng).unwrap();

        assert_eq!(pop.len(), 6);
        assert_eq!(pop.best().unwrap().fitness()[0], best_before);
        assert_eq!(copy.id_name(), "clone_best");
        assert_eq!(format!("{:?}", algo), "clone_best");
    }
}
