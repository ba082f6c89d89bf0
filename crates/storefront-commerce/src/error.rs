//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in cart and checkout operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Malformed input to a cart mutation or checkout form.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// A submission is already in flight for this session.
    #[error("An order submission is already in progress")]
    SubmissionInProgress,

    /// The order service did not acknowledge the order.
    #[error("Order submission failed: {message}")]
    SubmissionFailed { message: String },

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Reading or writing the saved cart failed.
    #[error("Cart persistence error: {0}")]
    Persistence(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CommerceError {
    /// Shorthand for [`CommerceError::InvalidArgument`].
    pub fn invalid(message: impl Into<String>) -> Self {
        CommerceError::InvalidArgument(message.into())
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for CommerceError {
    fn from(e: std::io::Error) -> Self {
        CommerceError::Persistence(e.to_string())
    }
}
