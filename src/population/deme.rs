//! Deme extraction and migration merges.
//!
//! A deme is a sample of individuals taken from one population together
//! with the indices it was drawn from. The three insertion operators merge
//! a deme back into a population at those indices, with different degrees of
//! competition.
//!
//! All operators require `deme.individuals().len() == deme.picks().len()`,
//! in-range and distinct picks, and individuals shaped for the receiving
//! population's problem. Violations are reported before anything changes.

use super::individual::Individual;
use super::population::{best_position, worst_position, Population};
use crate::error::{PreconditionViolation, Result};
use crate::rng::{index_below, UniformSource};

/// Individuals sampled from a population plus the indices they came from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Deme {
    individuals: Vec<Individual>,
    picks: Vec<usize>,
}

impl Deme {
    /// Pairs individuals with target indices. Consistency is checked when
    /// the deme is inserted.
    pub fn new(individuals: Vec<Individual>, picks: Vec<usize>) -> Self {
        Self { individuals, picks }
    }

    /// Copies of the picked individuals.
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Source slots, aligned with [`individuals`](Self::individuals).
    pub fn picks(&self) -> &[usize] {
        &self.picks
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// `true` if the deme has no members.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Splits the deme into its individuals and picks.
    pub fn into_parts(self) -> (Vec<Individual>, Vec<usize>) {
        (self.individuals, self.picks)
    }
}

impl Population {
    /// Samples `n` distinct individuals uniformly without replacement.
    ///
    /// Each draw picks a position in the pool of not-yet-picked indices and
    /// removes it, so no index repeats. The picks are returned in draw order.
    pub fn extract_random_deme(&self, n: usize, rng: &mut dyn UniformSource) -> Result<Deme> {
        if n > self.len() {
            return Err(PreconditionViolation::DemeTooLarge {
                requested: n,
                available: self.len(),
            }
            .into());
        }

        let mut pool: Vec<usize> = (0..self.len()).collect();
        let mut picks = Vec::with_capacity(n);
        let mut individuals = Vec::with_capacity(n);
        for _ in 0..n {
            let pick = pool.remove(index_below(rng, pool.len()));
            individuals.push(self[pick].clone());
            picks.push(pick);
        }
        log::debug!("extracted deme of {} from population of {}", n, self.len());
        Ok(Deme { individuals, picks })
    }

    /// Competitive merge: `pop[picks[i]]` is replaced by `deme[i]` only if
    /// the incomer is strictly preferred. Returns the number of replacements.
    pub fn insert_deme(&mut self, deme: &Deme) -> Result<usize> {
        self.validate_deme(deme)?;
        let mut replaced = 0;
        for (incomer, &pick) in deme.individuals.iter().zip(&deme.picks) {
            if incomer.is_preferred_over(&self[pick], self.problem().as_ref()) {
                self.overwrite(pick, incomer.clone());
                replaced += 1;
            }
        }
        log::debug!("deme insertion replaced {} of {} slots", replaced, deme.len());
        Ok(replaced)
    }

    /// Non-competitive merge: every picked slot is overwritten.
    pub fn insert_deme_forced(&mut self, deme: &Deme) -> Result<()> {
        self.validate_deme(deme)?;
        for (incomer, &pick) in deme.individuals.iter().zip(&deme.picks) {
            self.overwrite(pick, incomer.clone());
        }
        Ok(())
    }

    /// Single-slot merge: the best incomer overwrites the worst individual
    /// among the picked slots. Returns the overwritten index.
    pub fn insert_best_in_deme(&mut self, deme: &Deme) -> Result<usize> {
        self.validate_deme(deme)?;
        if deme.is_empty() {
            return Err(PreconditionViolation::EmptyDeme.into());
        }
        let problem = self.problem().clone();

        let incomers: Vec<&Individual> = deme.individuals.iter().collect();
        let occupants: Vec<&Individual> = deme.picks.iter().map(|&p| &self[p]).collect();
        let (best, worst) = match (
            best_position(problem.as_ref(), &incomers),
            worst_position(problem.as_ref(), &occupants),
        ) {
            (Some(b), Some(w)) => (b, w),
            _ => return Err(PreconditionViolation::EmptyDeme.into()),
        };

        let target = deme.picks[worst];
        if !deme.individuals[best].is_preferred_over(&self[target], problem.as_ref()) {
            log::warn!("migrant replacing slot {} is not better than its occupant", target);
        }
        self.overwrite(target, deme.individuals[best].clone());
        Ok(target)
    }

    fn validate_deme(&self, deme: &Deme) -> std::result::Result<(), PreconditionViolation> {
        if deme.individuals.len() != deme.picks.len() {
            return Err(PreconditionViolation::DemeLengthMismatch {
                individuals: deme.individuals.len(),
                picks: deme.picks.len(),
            });
        }
        let mut seen = vec![false; self.len()];
        for &pick in &deme.picks {
            self.check_index(pick)?;
            if std::mem::replace(&mut seen[pick], true) {
                return Err(PreconditionViolation::DuplicatePick(pick));
            }
        }
        for ind in &deme.individuals {
            ind.verify_shape(self.problem().as_ref())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{FnProblem, Problem};
    use crate::rng::{seeded, ScriptedUniform};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn parabola() -> Arc<dyn Problem> {
        Arc::new(FnProblem::scalar(vec![-10.0], vec![10.0], |x| (x[0] - 3.0).powi(2)).unwrap())
    }

    fn with_decisions(problem: &Arc<dyn Problem>, xs: &[f64]) -> Population {
        let mut pop = Population::new(problem.clone());
        for &x in xs {
            pop.push_decision(vec![x]).unwrap();
        }
        pop
    }

    fn decisions(pop: &Population) -> Vec<f64> {
        pop.iter().map(|ind| ind.decision()[0]).collect()
    }

    #[test]
    fn test_extract_draws_from_shrinking_pool() {
        let problem = parabola();
        let pop = with_decisions(&problem, &[0.0, 1.0, 2.0, 3.0]);
        // Pool [0,1,2,3] -> pos 0 (0); [1,2,3] -> pos 2 (3); [1,2] -> pos 1 (2).
        let mut rng = ScriptedUniform::new(vec![0.0, 0.9, 0.6]);
        let deme = pop.extract_random_deme(3, &mut rng).unwrap();
        assert_eq!(deme.picks(), &[0, 3, 2]);
        assert_eq!(deme.individuals()[1].decision(), &[3.0]);
    }

    #[test]
    fn test_extract_whole_population() {
        let problem = parabola();
        let pop = with_decisions(&problem, &[0.0, 1.0, 2.0]);
        let mut rng = ScriptedUniform::constant(0.999);
        let deme = pop.extract_random_deme(3, &mut rng).unwrap();
        let mut picks = deme.picks().to_vec();
        picks.sort_unstable();
        assert_eq!(picks, vec![0, 1, 2]);
    }

    #[test]
    fn test_extract_too_many_fails() {
        let problem = parabola();
        let pop = with_decisions(&problem, &[0.0, 1.0]);
        let mut rng = seeded(1);
        assert_eq!(
            pop.extract_random_deme(3, &mut rng),
            Err(crate::Error::Precondition(PreconditionViolation::DemeTooLarge {
                requested: 3,
                available: 2
            }))
        );
    }

    #[test]
    fn test_insert_deme_only_improves() {
        let problem = parabola();
        let mut pop = with_decisions(&problem, &[-8.0, 3.0, 5.0]);
        let donor = with_decisions(&problem, &[2.0, -9.0, 4.0]);
        let deme = Deme::new(donor.individuals().to_vec(), vec![0, 1, 2]);

        let replaced = pop.insert_deme(&deme).unwrap();
        assert_eq!(replaced, 2);
        // -8 -> 2 (better), 3 stays (optimal), 5 -> 4 (better).
        assert_eq!(decisions(&pop), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_insert_deme_forced_overwrites() {
        let problem = parabola();
        let mut pop = with_decisions(&problem, &[3.0, 3.0, 3.0]);
        let donor = with_decisions(&problem, &[-9.0, 9.0]);
        let deme = Deme::new(donor.individuals().to_vec(), vec![2, 0]);
        pop.insert_deme_forced(&deme).unwrap();
        assert_eq!(decisions(&pop), vec![9.0, 3.0, -9.0]);
    }

    #[test]
    fn test_insert_best_in_deme_single_slot() {
        let problem = parabola();
        let mut pop = with_decisions(&problem, &[1.0, -5.0, 2.0, 10.0]);
        let donor = with_decisions(&problem, &[0.0, 3.5, -1.0]);
        // Picks 0, 1, 2 hold f = 4, 64, 1; the worst picked slot is 1.
        let deme = Deme::new(donor.individuals().to_vec(), vec![0, 1, 2]);
        let target = pop.insert_best_in_deme(&deme).unwrap();
        assert_eq!(target, 1);
        assert_eq!(decisions(&pop), vec![1.0, 3.5, 2.0, 10.0]);
    }

    #[test]
    fn test_mismatched_deme_is_atomic() {
        let problem = parabola();
        let mut pop = with_decisions(&problem, &[-8.0, -8.0]);
        let donor = with_decisions(&problem, &[3.0, 3.0]);
        let before = pop.clone();

        let short = Deme::new(donor.individuals().to_vec(), vec![0]);
        assert!(matches!(
            pop.insert_deme(&short),
            Err(crate::Error::Precondition(PreconditionViolation::DemeLengthMismatch { .. }))
        ));
        let out_of_range = Deme::new(donor.individuals().to_vec(), vec![0, 7]);
        assert!(pop.insert_deme_forced(&out_of_range).is_err());
        let duplicated = Deme::new(donor.individuals().to_vec(), vec![1, 1]);
        assert_eq!(
            pop.insert_deme(&duplicated),
            Err(crate::Error::Precondition(PreconditionViolation::DuplicatePick(1)))
        );
        let empty = Deme::new(Vec::new(), Vec::new());
        assert!(pop.insert_best_in_deme(&empty).is_err());

        assert_eq!(decisions(&pop), decisions(&before));
    }

    #[test]
    fn test_migration_between_islands() {
        let problem = parabola();
        let mut rng = seeded(5);
        let source = Population::random(problem.clone(), 10, &mut rng).unwrap();
        let mut target = Population::random(problem, 10, &mut rng).unwrap();
        assert!(source.shares_problem_with(&target));

        let deme = source.extract_random_deme(4, &mut rng).unwrap();
        let before = target.best().unwrap().fitness()[0];
        target.insert_deme(&deme).unwrap();
        assert!(target.best().unwrap().fitness()[0] <= before);
        assert_eq!(target.len(), 10);
    }

    proptest! {
        #[test]
        fn prop_extracted_picks_are_distinct(size in 1usize..40, frac in 0.0f64..=1.0, seed in any::<u64>()) {
            let problem = parabola();
            let mut rng = seeded(seed);
            let pop = Population::random(problem, size, &mut rng).unwrap();
            let n = (frac * size as f64) as usize;
            let deme = pop.extract_random_deme(n, &mut rng).unwrap();

            prop_assert_eq!(deme.len(), n);
            let mut picks = deme.picks().to_vec();
            picks.sort_unstable();
            picks.dedup();
            prop_assert_eq!(picks.len(), n);
            prop_assert!(picks.iter().all(|&p| p < size));
            for (ind, &p) in deme.individuals().iter().zip(deme.picks()) {
                prop_assert_eq!(ind, &pop[p]);
            }
        }

        #[test]
        fn prop_insert_deme_never_worsens(seed in any::<u64>(), n in 0usize..12) {
            let problem = parabola();
            let mut rng = seeded(seed);
            let donor = Population::random(problem.clone(), 12, &mut rng).unwrap();
            let mut pop = Population::random(problem, 12, &mut rng).unwrap();
            let deme = donor.extract_random_deme(n, &mut rng).unwrap();
            let before = pop.clone();

            pop.insert_deme(&deme).unwrap();
            for &p in deme.picks() {
                prop_assert!(pop[p].fitness()[0] <= before[p].fitness()[0]);
            }
        }

        #[test]
        fn prop_insert_best_changes_one_slot(seed in any::<u64>(), n in 1usize..12) {
            let problem = parabola();
            let mut rng = seeded(seed);
            let donor = Population::random(problem.clone(), 12, &mut rng).unwrap();
            let mut pop = Population::random(problem, 12, &mut rng).unwrap();
            let deme = donor.extract_random_deme(n, &mut rng).unwrap();
            let before = pop.clone();

            pop.insert_best_in_deme(&deme).unwrap();
            let changed = (0..12).filter(|&i| pop[i] != before[i]).count();
            prop_assert!(changed <= 1);
        }
    }
}
