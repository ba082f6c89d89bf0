//! Checkout module.
//!
//! Contains the order payload, the order-service seam, and the
//! submission flow.

mod flow;
mod gateway;
mod order;

pub use flow::{OrderSubmission, SubmissionOutcome, SubmissionState};
pub use gateway::{GatewayError, OrderGateway};
pub use order::{
    CreatedOrder, CustomerDetails, OrderItem, OrderRequest, OrderStatus, PaymentMethod,
};
