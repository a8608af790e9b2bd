//! Error types shared by problems, populations and algorithms.
//!
//! Every failure is reported before anything is mutated, so a caller that
//! receives an `Err` can keep using the population it passed in.

/// Invalid algorithm parameters, reported at construction time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("total_iterations must be positive")]
    NoIterations,
    #[error("temperatures must be positive and start ({start}) must exceed end ({end})")]
    Temperatures { start: f64, end: f64 },
    #[error("initial_step_range must lie in [0, 1], got {0}")]
    StepRange(f64),
}

/// The population's problem has a shape the algorithm cannot handle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnsupportedProblemError {
    #[error("{algorithm}: the decision vector has no continuous part")]
    NoContinuousPart { algorithm: String },
    #[error("{algorithm}: problem has {constraints} constraint(s), only box-constrained problems are supported")]
    Constrained { algorithm: String, constraints: usize },
    #[error("{algorithm}: problem has {objectives} objectives, only single-objective problems are supported")]
    MultiObjective { algorithm: String, objectives: usize },
    #[error("{algorithm}: iteration budget {budget} is too small for one temperature stage ({per_stage} evaluations needed)")]
    InsufficientBudget {
        algorithm: String,
        budget: usize,
        per_stage: usize,
    },
}

/// A population or deme operator was called with arguments it cannot honour.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PreconditionViolation {
    #[error("operation requires a non-empty population")]
    EmptyPopulation,
    #[error("operation requires a non-empty deme")]
    EmptyDeme,
    #[error("index {index} out of range for population of size {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("cannot draw a deme of {requested} from a population of {available}")]
    DemeTooLarge { requested: usize, available: usize },
    #[error("deme holds {individuals} individuals but {picks} picks")]
    DemeLengthMismatch { individuals: usize, picks: usize },
    #[error("index {0} is picked more than once")]
    DuplicatePick(usize),
    #[error("expected a vector of length {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("component {index} = {value} lies outside [{lower}, {upper}]")]
    OutOfBounds {
        index: usize,
        value: f64,
        lower: f64,
        upper: f64,
    },
    #[error("integer component {index} holds non-integral value {value}")]
    NonIntegral { index: usize, value: f64 },
    #[error("lower bound {lower} exceeds upper bound {upper} at component {index}")]
    InvertedBounds { index: usize, lower: f64, upper: f64 },
    #[error("statistics over raw fitness need a single objective, problem has {0}")]
    MultiObjectiveStatistics(usize),
}

/// Any error raised by this crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("unsupported problem: {0}")]
    UnsupportedProblem(#[from] UnsupportedProblemError),
    #[error("precondition violated: {0}")]
    Precondition(#[from] PreconditionViolation),
}

pub type Result<T> = std::result::Result<T, Error>;
