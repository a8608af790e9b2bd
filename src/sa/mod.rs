//! Adaptive Simulated Annealing (Corana).
//!
//! A single-trajectory annealing walk that plugs into the
//! [`Algorithm`](crate::algorithm::Algorithm) contract. It perturbs one
//! continuous component at a time, adapts a separate step size per
//! component from its acceptance ratio, and cools geometrically over a
//! fixed iteration budget.
//!
//! # Key Types
//!
//! - [`AnnealingConfig`]: iteration budget, temperatures, step control
//! - [`AdaptiveSimulatedAnnealing`]: the algorithm
//! - [`AnnealingReport`]: counters from one run
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Corana et al. (1987), ACM Transactions on Mathematical Software 13(3)

mod config;
mod runner;

pub use config::AnnealingConfig;
pub use runner::{AdaptiveSimulatedAnnealing, AnnealingReport};
