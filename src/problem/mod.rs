//! The problem contract.
//!
//! A problem describes a box-bounded decision space, one or more objectives
//! to minimize and optional inequality constraints. Algorithms and
//! populations consume problems only through the [`Problem`] trait.
//!
//! # Key Types
//!
//! - [`Problem`]: bounds, evaluation and comparison
//! - [`FnProblem`]: a problem assembled from closures
//! - [`CountingProblem`]: wrapper counting objective evaluations
//!
//! # References
//!
//! - Deb (2000), "An efficient constraint handling method for genetic
//!   algorithms" (feasibility-first comparison)

mod counting;
mod dominance;
mod fn_problem;
mod types;

pub use counting::CountingProblem;
pub use dominance::{dominance, dominates, is_feasible, total_violation, Dominance};
pub use fn_problem::FnProblem;
pub use types::Problem;
