//! The seam between checkout and the order-creation service.

use async_trait::async_trait;
use thiserror::Error;

use crate::checkout::{CreatedOrder, OrderRequest};

/// Why the order service did not acknowledge an order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The request never got a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("Order service returned {status}: {message}")]
    Rejected { status: u16, message: String },

    /// A 2xx response whose body was not a created order.
    #[error("Invalid response from order service: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// Text suitable for showing to the shopper.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Rejected { message, .. } if !message.trim().is_empty() => {
                format!("Failed to place order: {message}. Please try again.")
            }
            _ => "Failed to place order. Please try again.".to_string(),
        }
    }
}

/// Creates orders in the external order service.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submit one order. Any non-2xx answer is an error.
    async fn create_order(&self, request: &OrderRequest) -> Result<CreatedOrder, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_uses_server_text() {
        let err = GatewayError::Rejected {
            status: 400,
            message: "Phone is invalid".into(),
        };
        assert_eq!(
            err.user_message(),
            "Failed to place order: Phone is invalid. Please try again."
        );
    }

    #[test]
    fn test_user_message_generic() {
        let err = GatewayError::Transport("connection refused".into());
        assert_eq!(err.user_message(), "Failed to place order. Please try again.");

        let err = GatewayError::Rejected {
            status: 500,
            message: String::new(),
        };
        assert_eq!(err.user_message(), "Failed to place order. Please try again.");
    }
}
