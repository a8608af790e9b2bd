//! Randomness injected into every stochastic operation.
//!
//! Nothing in this crate owns a generator. Operations that need random
//! numbers take a `&mut dyn UniformSource`, so a run is reproducible from a
//! seed and tests can script the exact sequence of draws.

use rand::{Rng, RngCore};

/// A source of uniform deviates in `[0, 1)`.
pub trait UniformSource {
    /// Returns the next deviate in `[0, 1)`.
    fn next_uniform(&mut self) -> f64;
}

impl<R: RngCore> UniformSource for R {
    fn next_uniform(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Creates a reproducible source from a seed.
///
/// ```
/// use u_island::rng::{seeded, UniformSource};
///
/// let mut a = seeded(7);
/// let mut b = seeded(7);
/// assert_eq!(a.next_uniform(), b.next_uniform());
/// ```
pub fn seeded(seed: u64) -> impl UniformSource {
    u_numflow::random::create_rng(seed)
}

/// Replays a fixed sequence of deviates, wrapping around at the end.
///
/// Values are clamped into `[0, 1)` on construction so a script cannot
/// produce draws a real generator never would.
#[derive(Debug, Clone)]
pub struct ScriptedUniform {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedUniform {
    /// Creates a source that cycles through `values`.
    ///
    /// An empty script behaves like `[0.0]`.
    pub fn new(values: Vec<f64>) -> Self {
        let mut values: Vec<f64> = values
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        if values.is_empty() {
            values.push(0.0);
        }
        Self { values, cursor: 0 }
    }

    /// A source that returns `value` forever.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of draws served so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl UniformSource for ScriptedUniform {
    fn next_uniform(&mut self) -> f64 {
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}

/// Draws an index in `[0, n)` from `u * n`, guarding the upper edge.
pub(crate) fn index_below(rng: &mut dyn UniformSource, n: usize) -> usize {
    debug_assert!(n > 0);
    ((rng.next_uniform() * n as f64) as usize).min(n - 1)
}
