//! Individuals, populations and migration.
//!
//! # Key Types
//!
//! - [`Individual`]: one candidate solution with fitness kept in sync
//! - [`Population`]: individuals bound to a shared [`Problem`](crate::problem::Problem)
//! - [`Deme`]: a sample drawn for migration, with its source indices
//!
//! # Migration
//!
//! Island-model optimizers move individuals between populations with
//! [`Population::extract_random_deme`] on the source and one of
//! [`Population::insert_deme`], [`Population::insert_deme_forced`] or
//! [`Population::insert_best_in_deme`] on the target. Both sides must be
//! idle (no `evolve` in progress), which `&mut` access already enforces.
//!
//! # Submodules
//!
//! - [`ranking`]: Pareto non-dominated sorting and crowding distance, used to
//!   pick best and worst individuals of multi-objective populations

mod deme;
mod individual;
#[allow(clippy::module_inception)]
mod population;
pub mod ranking;

pub use deme::Deme;
pub use individual::Individual;
pub use population::Population;
