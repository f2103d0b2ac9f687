//! Error type shared by the whole crate.

use thiserror::Error;

/// Everything that can go wrong while setting up or exporting a cross.
#[derive(Error, Debug)]
pub enum CrossError {
    /// The genotype is not four characters from `{A,a}{A,a}{B,b}{B,b}`
    #[error("invalid genotype format `{input}`: use AaBb, AABB, aaBb, etc.")]
    InvalidGenotypeFormat { input: String },

    /// Linked recombination rate outside `[0, 0.5]`, or finer than a billionth
    #[error("invalid recombination rate {rate}: expected a value in [0, 0.5] with at most 9 decimals")]
    InvalidRecombinationRate { rate: String },

    /// Unknown dominance mode name
    #[error("invalid dominance mode `{input}`: expected `complete` or `codominance`")]
    InvalidDominance { input: String },

    /// Text that should have held a decimal number
    #[error("parse error: {message}")]
    Parse { message: String },

    /// An exact probability no longer fits in 64-bit numerator and denominator
    #[error("probability overflow in {operation}")]
    Overflow { operation: String },

    /// Writing an SVG document failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing a report failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CrossError>;

impl CrossError {
    pub fn invalid_genotype(input: impl Into<String>) -> Self {
        Self::InvalidGenotypeFormat {
            input: input.into(),
        }
    }

    pub fn invalid_rate(rate: impl ToString) -> Self {
        Self::InvalidRecombinationRate {
            rate: rate.to_string(),
        }
    }

    pub fn overflow(operation: impl Into<String>) -> Self {
        Self::Overflow {
            operation: operation.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}
