//! Order submission state machine.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cart::{CartState, PricingConfig};
use crate::checkout::{CreatedOrder, CustomerDetails, GatewayError, OrderGateway, OrderRequest};
use crate::error::CommerceError;
use crate::ids::OrderId;

/// Where a submission attempt stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SubmissionState {
    /// No request in flight.
    #[default]
    Idle,
    /// Waiting for the order service.
    Submitting,
}

impl SubmissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Submitting => "submitting",
        }
    }
}

/// How the most recent attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionOutcome {
    /// The service created the order; the cart was cleared. Holds the
    /// order id when the acknowledgment carried one.
    Succeeded(Option<OrderId>),
    /// The service did not; the cart was kept. Holds the shopper-facing message.
    Failed(String),
}

/// Turns a cart into an order, one attempt at a time.
///
/// `Idle -> Submitting` on [`begin`](Self::begin), back to `Idle` on
/// [`complete`](Self::complete). Success clears the cart, failure leaves
/// it as it was so the shopper can retry. There is no automatic retry.
#[derive(Debug, Clone, Default)]
pub struct OrderSubmission {
    pricing: PricingConfig,
    state: SubmissionState,
    last_outcome: Option<SubmissionOutcome>,
}

impl OrderSubmission {
    pub fn new(pricing: PricingConfig) -> Self {
        Self {
            pricing,
            state: SubmissionState::Idle,
            last_outcome: None,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn last_outcome(&self) -> Option<&SubmissionOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    /// Validate the checkout and move to `Submitting`.
    ///
    /// Validation failures keep the machine `Idle`.
    pub fn begin(
        &mut self,
        cart: &CartState,
        customer: &CustomerDetails,
    ) -> Result<OrderRequest, CommerceError> {
        if self.state == SubmissionState::Submitting {
            return Err(CommerceError::SubmissionInProgress);
        }
        let request = OrderRequest::from_cart(cart, customer, &self.pricing)?;
        self.state = SubmissionState::Submitting;
        info!(
            lines = request.items.len(),
            total = %request.total_amount,
            "submitting order"
        );
        Ok(request)
    }

    /// Record the service's answer and return to `Idle`.
    pub fn complete(
        &mut self,
        cart: &mut CartState,
        result: Result<CreatedOrder, GatewayError>,
    ) -> Result<CreatedOrder, CommerceError> {
        self.state = SubmissionState::Idle;
        match result {
            Ok(order) => {
                info!(
                    order_id = order.id.as_ref().map(OrderId::as_str).unwrap_or("-"),
                    status = order.status.as_str(),
                    "order created"
                );
                cart.clear();
                self.last_outcome = Some(SubmissionOutcome::Succeeded(order.id.clone()));
                Ok(order)
            }
            Err(e) => {
                warn!(error = %e, "order submission failed, cart kept");
                let message = e.user_message();
                self.last_outcome = Some(SubmissionOutcome::Failed(message.clone()));
                Err(CommerceError::SubmissionFailed { message })
            }
        }
    }

    /// Run one full attempt against `gateway`.
    ///
    /// The flow has no cancellation: the future should be driven to
    /// completion once polled.
    pub async fn submit<G>(
        &mut self,
        cart: &mut CartState,
        customer: &CustomerDetails,
        gateway: &G,
    ) -> Result<CreatedOrder, CommerceError>
    where
        G: OrderGateway + ?Sized,
    {
        let request = self.begin(cart, customer)?;
        let result = gateway.create_order(&request).await;
        self.complete(cart, result)
    }
}
