//! Error types for generator construction and minimization.

use std::fmt;

/// Errors raised when a generator is constructed with malformed parameters.
///
/// Parameter validation happens at construction time, never during sampling:
/// a generator that was built successfully can be sampled with any random
/// source and any non-negative size.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorError {
    /// Range bounds are inverted (`min > max`) or otherwise unusable
    InvalidRange { min: String, max: String },
    /// A choice combinator was given zero alternatives
    EmptyChoice,
    /// A frequency weight is non-finite or not strictly positive
    InvalidWeight { weight: f64 },
    /// A string generator was given a maximum length of zero
    InvalidLength { max_len: usize },
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorError::InvalidRange { min, max } => {
                write!(f, "Invalid range: min {} exceeds max {}", min, max)
            }
            GeneratorError::EmptyChoice => {
                write!(f, "Choice combinator needs at least one alternative")
            }
            GeneratorError::InvalidWeight { weight } => {
                write!(
                    f,
                    "Invalid weight: {} (must be finite and strictly positive)",
                    weight
                )
            }
            GeneratorError::InvalidLength { max_len } => {
                write!(f, "Invalid maximum length: {} (must be at least 1)", max_len)
            }
        }
    }
}

impl std::error::Error for GeneratorError {}

impl GeneratorError {
    /// Create an invalid-range error from displayable bounds
    pub fn invalid_range(min: impl fmt::Display, max: impl fmt::Display) -> Self {
        Self::InvalidRange {
            min: min.to_string(),
            max: max.to_string(),
        }
    }
}

/// Errors raised by the minimization search.
#[derive(Debug, Clone, PartialEq)]
pub enum MinimizeError {
    /// The search performed more shrink steps than the configured safety
    /// bound allows. A well-founded shrink function cannot do this, so the
    /// bound being hit indicates a shrink source whose candidates are not
    /// strictly simpler than their input.
    IterationLimit { limit: usize },
}

impl fmt::Display for MinimizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinimizeError::IterationLimit { limit } => {
                write!(
                    f,
                    "Minimization exceeded {} shrink steps; the shrink source is not well-founded",
                    limit
                )
            }
        }
    }
}

impl std::error::Error for MinimizeError {}
