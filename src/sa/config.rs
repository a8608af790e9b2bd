//! Adaptive SA configuration.

use crate::error::ConfigurationError;

/// Configuration for [`AdaptiveSimulatedAnnealing`](super::AdaptiveSimulatedAnnealing).
///
/// The iteration budget is split into temperature stages:
///
/// ```text
/// stages = total_iterations / (iterations_per_temperature
///                              * iterations_per_range_adjust
///                              * continuous_dimension)
/// ```
///
/// and the temperature is multiplied by `(end / start)^(1 / stages)` after
/// each stage, so it reaches `end_temperature` after the last one.
///
/// # Examples
///
/// ```
/// use u_island::sa::AnnealingConfig;
///
/// let config = AnnealingConfig::default()
///     .with_total_iterations(1000)
///     .with_temperatures(10.0, 0.1)
///     .with_iterations_per_temperature(2)
///     .with_iterations_per_range_adjust(5)
///     .with_initial_step_range(0.5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealingConfig {
    /// Total number of proposals the budget allows.
    pub total_iterations: usize,

    /// Temperature of the first stage. Must exceed `end_temperature`.
    pub start_temperature: f64,

    /// Temperature reached after the last stage. Must be positive.
    pub end_temperature: f64,

    /// Step-size adjustments per temperature stage.
    pub iterations_per_temperature: usize,

    /// Sweeps over the continuous components between step-size adjustments.
    pub iterations_per_range_adjust: usize,

    /// Initial (and maximum) step size as a fraction of each component's
    /// bound width. In `[0, 1]`.
    pub initial_step_range: f64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            total_iterations: 10_000,
            start_temperature: 10.0,
            end_temperature: 0.1,
            iterations_per_temperature: 1,
            iterations_per_range_adjust: 1,
            initial_step_range: 1.0,
        }
    }
}

impl AnnealingConfig {
    pub fn with_total_iterations(mut self, n: usize) -> Self {
        self.total_iterations = n;
        self
    }

    pub fn with_temperatures(mut self, start: f64, end: f64) -> Self {
        self.start_temperature = start;
        self.end_temperature = end;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_iterations_per_range_adjust(mut self, n: usize) -> Self {
        self.iterations_per_range_adjust = n;
        self
    }

    pub fn with_initial_step_range(mut self, range: f64) -> Self {
        self.initial_step_range = range;
        self
    }

    /// Proposals needed for one temperature stage on a problem with
    /// `continuous` continuous components. Saturates on overflow.
    pub fn iterations_per_stage(&self, continuous: usize) -> usize {
        self.iterations_per_temperature
            .saturating_mul(self.iterations_per_range_adjust)
            .saturating_mul(continuous)
    }

    /// Number of temperature stages the budget affords; zero if it affords
    /// none.
    pub fn stages(&self, continuous: usize) -> usize {
        match self.iterations_per_stage(continuous) {
            0 => 0,
            per_stage => self.total_iterations / per_stage,
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.total_iterations == 0 {
            return Err(ConfigurationError::NoIterations);
        }
        let (start, end) = (self.start_temperature, self.end_temperature);
        if !(end > 0.0 && start > end) {
            return Err(ConfigurationError::Temperatures { start, end });
        }
        if !(0.0..=1.0).contains(&self.initial_step_range) {
            return Err(ConfigurationError::StepRange(self.initial_step_range));
        }
        Ok(())
    }
}
