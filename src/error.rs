//! Error types for the munistl library.

use thiserror::Error;

/// Result type alias for decomposition operations.
pub type Result<T> = std::result::Result<T, DecompositionError>;

/// Coarse classification of a [`DecompositionError`].
///
/// Presentation layers can branch on this without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The selection key matched no row (or, under a strict policy, too many).
    NotFound,
    /// No period column falls inside the requested window.
    RangeEmpty,
    /// A label, window bound or cell value could not be parsed.
    Parse,
    /// The decomposition could not produce a valid result.
    DecompositionFailure,
    /// A strength denominator is zero, so the strength is undefined.
    DegenerateVariance,
    /// The dataset itself is malformed or could not be read.
    Dataset,
}

/// Errors that can occur while extracting and decomposing a series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecompositionError {
    /// No row matches the selection key.
    #[error("no data found for key: {key}")]
    NotFound { key: String },

    /// More than one row matches and the policy forbids picking one.
    #[error("key {key} matches {matches} rows")]
    AmbiguousSelection { key: String, matches: usize },

    /// The window selects no period column.
    #[error("no period column falls between {start} and {end}")]
    RangeEmpty { start: String, end: String },

    /// A period column label could not be translated into a month.
    #[error("invalid period label {label:?}: {reason}")]
    LabelParse { label: String, reason: String },

    /// A window bound could not be parsed.
    #[error("invalid window bound {input:?}: expected YYYY-MM")]
    WindowParse { input: String },

    /// A cell value could not be coerced to a number.
    #[error("non-numeric value {value:?} in column {column:?}")]
    ValueParse { column: String, value: String },

    /// Insufficient data points for the decomposition.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// The period columns inside the window skip at least one month.
    #[error("series is missing {missing} month(s), first gap between {after} and {next}")]
    MissingMonths {
        after: String,
        next: String,
        missing: usize,
    },

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),

    /// A variance denominator is zero or near zero.
    #[error("{component} strength is undefined: variance {variance:e} is too small")]
    DegenerateVariance {
        component: &'static str,
        variance: f64,
    },

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Month index is not strictly increasing.
    #[error("timestamp error: {0}")]
    TimestampOrder(String),

    /// The named key column does not exist.
    #[error("key column {0:?} not found in header")]
    KeyColumnMissing(String),

    /// The dataset is structurally invalid.
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    /// Reading the input failed.
    #[error("io error: {0}")]
    Io(String),

    /// The delimited file could not be parsed.
    #[error("csv error: {0}")]
    Csv(String),

    /// A report could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl DecompositionError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        use DecompositionError::*;
        match self {
            NotFound { .. } | AmbiguousSelection { .. } => ErrorKind::NotFound,
            RangeEmpty { .. } => ErrorKind::RangeEmpty,
            LabelParse { .. } | WindowParse { .. } | ValueParse { .. } => ErrorKind::Parse,
            InsufficientData { .. }
            | MissingMonths { .. }
            | ComputationError(_)
            | DimensionMismatch { .. }
            | TimestampOrder(_) => ErrorKind::DecompositionFailure,
            DegenerateVariance { .. } => ErrorKind::DegenerateVariance,
            KeyColumnMissing(_) | InvalidDataset(_) | Io(_) | Csv(_) | Serialization(_) => {
                ErrorKind::Dataset
            }
        }
    }
}

impl From<std::io::Error> for DecompositionError {
    fn from(err: std::io::Error) -> Self {
        DecompositionError::Io(err.to_string())
    }
}

impl From<csv::Error> for DecompositionError {
    fn from(err: csv::Error) -> Self {
        DecompositionError::Csv(err.to_string())
    }
}
