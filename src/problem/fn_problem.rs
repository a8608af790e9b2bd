//! Closure-backed problems.

use super::types::Problem;
use crate::error::PreconditionViolation;

type VectorFn = Box<dyn Fn(&[f64]) -> Vec<f64> + Send + Sync>;

/// A [`Problem`] assembled from bounds and closures.
///
/// # Examples
///
/// ```
/// use u_island::problem::{FnProblem, Problem};
///
/// let problem = FnProblem::scalar(vec![-10.0], vec![10.0], |x| (x[0] - 3.0).powi(2))
///     .unwrap()
///     .with_name("shifted parabola");
///
/// assert_eq!(problem.dimension(), 1);
/// assert_eq!(problem.objective(&[3.0]), vec![0.0]);
/// ```
pub struct FnProblem {
    name: String,
    lower: Vec<f64>,
    upper: Vec<f64>,
    integer_dimension: usize,
    fitness_dimension: usize,
    constraint_dimension: usize,
    objective: VectorFn,
    constraints: Option<VectorFn>,
}

impl FnProblem {
    /// Creates a problem with a vector-valued objective of `fitness_dimension`
    /// components.
    pub fn new<F>(
        lower: Vec<f64>,
        upper: Vec<f64>,
        fitness_dimension: usize,
        objective: F,
    ) -> Result<Self, PreconditionViolation>
    where
        F: Fn(&[f64]) -> Vec<f64> + Send + Sync + 'static,
    {
        if lower.len() != upper.len() {
            return Err(PreconditionViolation::DimensionMismatch {
                expected: lower.len(),
                actual: upper.len(),
            });
        }
        if let Some(index) = lower.iter().zip(&upper).position(|(l, u)| !(l <= u)) {
            return Err(PreconditionViolation::InvertedBounds {
                index,
                lower: lower[index],
                upper: upper[index],
            });
        }
        Ok(Self {
            name: "fn problem".into(),
            lower,
            upper,
            integer_dimension: 0,
            fitness_dimension,
            constraint_dimension: 0,
            objective: Box::new(objective),
            constraints: None,
        })
    }

    /// Creates a single-objective problem from a scalar function.
    pub fn scalar<F>(lower: Vec<f64>, upper: Vec<f64>, objective: F) -> Result<Self, PreconditionViolation>
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        Self::new(lower, upper, 1, move |x| vec![objective(x)])
    }

    /// Sets the name returned by [`Problem::name`].
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Marks the last `n` components as integers. Capped at the dimension.
    pub fn with_integer_dimension(mut self, n: usize) -> Self {
        self.integer_dimension = n.min(self.lower.len());
        self
    }

    /// Adds `n` constraints evaluated by `constraints`.
    pub fn with_constraints<F>(mut self, n: usize, constraints: F) -> Self
    where
        F: Fn(&[f64]) -> Vec<f64> + Send + Sync + 'static,
    {
        self.constraint_dimension = n;
        self.constraints = Some(Box::new(constraints));
        self
    }
}

impl std::fmt::Debug for FnProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnProblem")
            .field("name", &self.name)
            .field("lower", &self.lower)
            .field("upper", &self.upper)
            .field("integer_dimension", &self.integer_dimension)
            .field("fitness_dimension", &self.fitness_dimension)
            .field("constraint_dimension", &self.constraint_dimension)
            .finish_non_exhaustive()
    }
}

impl Problem for FnProblem {
    fn name(&self) -> &str {
        &self.name
    }

    fn lower_bounds(&self) -> &[f64] {
        &self.lower
    }

    fn upper_bounds(&self) -> &[f64] {
        &self.upper
    }

    fn integer_dimension(&self) -> usize {
        self.integer_dimension
    }

    fn fitness_dimension(&self) -> usize {
        self.fitness_dimension
    }

    fn constraint_dimension(&self) -> usize {
        self.constraint_dimension
    }

    fn objective(&self, x: &[f64]) -> Vec<f64> {
        (self.objective)(x)
    }

    fn constraints(&self, x: &[f64]) -> Vec<f64> {
        match &self.constraints {
            Some(c) => c(x),
            None => Vec::new(),
        }
    }
}
