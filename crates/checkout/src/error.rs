//! Checkout error types.

use money::MoneyError;
use thiserror::Error;

use crate::step::CheckoutStep;

/// Failure of a single collaborator call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure, non-success status, or undecodable body.
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The collaborator reported itself unable to serve the call.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A required step failed and the checkout stopped there. Steps that
    /// already ran are not undone.
    #[error("Checkout step '{step}' failed: {source}")]
    Step {
        step: CheckoutStep,
        #[source]
        source: ClientError,
    },

    /// The order total could not be computed from the converted amounts.
    #[error("Failed to total the order in {currency}: {source}")]
    Total {
        currency: String,
        #[source]
        source: MoneyError,
    },
}

impl CheckoutError {
    /// Wraps a collaborator failure with the step it happened in.
    pub fn step(step: CheckoutStep, source: ClientError) -> Self {
        CheckoutError::Step { step, source }
    }

    /// Returns the step this error stopped the checkout at, if any.
    pub fn failed_step(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutError::Step { step, .. } => Some(*step),
            CheckoutError::Total { .. } => None,
        }
    }
}

/// Convenience type alias for checkout results.
pub type Result<T> = std::result::Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_error_names_the_step() {
        let err = CheckoutError::step(
            CheckoutStep::PriceItems,
            ClientError::Unavailable("catalog down".to_string()),
        );
        assert_eq!(err.failed_step(), Some(CheckoutStep::PriceItems));
        assert_eq!(
            err.to_string(),
            "Checkout step 'price_items' failed: Service unavailable: catalog down"
        );
    }

    #[test]
    fn test_total_error_names_the_currency() {
        let err = CheckoutError::Total {
            currency: "EUR".to_string(),
            source: MoneyError::CurrencyMismatch {
                left: "EUR".to_string(),
                right: "USD".to_string(),
            },
        };
        assert_eq!(err.failed_step(), None);
        assert!(err.to_string().contains("EUR"));
    }
}
