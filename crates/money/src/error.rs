//! Money error types.

use thiserror::Error;

/// Errors that can occur during money validation and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// One of the operands violates the units/nanos representation invariants.
    #[error("One of the specified money values is invalid")]
    InvalidValue,

    /// The operands carry different currency codes.
    #[error("Mismatching currency codes: {left} vs {right}")]
    CurrencyMismatch { left: String, right: String },
}

/// Convenience type alias for money results.
pub type Result<T> = std::result::Result<T, MoneyError>;
