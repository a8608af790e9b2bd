//! Population-based optimization core for island-model metaheuristics.
//!
//! Provides the contracts and data structures an island-model optimizer is
//! built from:
//!
//! - **Problem**: bounds, objective and constraint evaluation, and the
//!   preference relation (scalar order, Pareto dominance, feasibility first).
//! - **Population**: individuals bound to a shared problem, with best/worst
//!   extraction, statistics, and deme extraction/insertion for migration.
//! - **Algorithm**: the `evolve` contract every search strategy implements.
//! - **Adaptive Simulated Annealing (SA)**: a Corana-style annealing walk with
//!   per-component step control, exercising all of the above.
//!
//! # Randomness
//!
//! Nothing here owns a random generator. Every stochastic operation takes a
//! `&mut dyn` [`UniformSource`](rng::UniformSource), implemented for any
//! `rand` generator and for [`ScriptedUniform`](rng::ScriptedUniform), so runs
//! are reproducible from a seed or from a scripted sequence.
//!
//! # Architecture
//!
//! Evolve calls are single-threaded. Orchestration (islands on threads,
//! migration schedules, topologies) sits on top: populations are `Send`,
//! problems are `Send + Sync`, and migration happens between evolve calls.

pub mod algorithm;
pub mod error;
pub mod population;
pub mod problem;
pub mod rng;
pub mod sa;

pub use error::{ConfigurationError, Error, PreconditionViolation, Result, UnsupportedProblemError};
