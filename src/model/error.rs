use thiserror::Error;

/// Errors detected while validating a model before it is handed to a solver.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("variable {variable} has invalid bounds [{lower}, {upper}]")]
    InvalidBounds {
        variable: String,
        lower: f64,
        upper: f64,
    },

    #[error("binary variable {variable} has bounds [{lower}, {upper}] outside [0, 1]")]
    BinaryBounds {
        variable: String,
        lower: f64,
        upper: f64,
    },

    #[error("{context} references variable #{id}, but the model only has {count} variables")]
    UnknownVariable {
        context: String,
        id: usize,
        count: usize,
    },

    #[error("{context} has a non-finite coefficient or constant")]
    NonFiniteCoefficient { context: String },

    #[error("constraint {constraint} has invalid bounds [{lower}, {upper}]")]
    InvalidRowBounds {
        constraint: String,
        lower: f64,
        upper: f64,
    },

    #[error("dimension mismatch: expected {expected} coefficients, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}
