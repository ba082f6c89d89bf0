//! Order payload and acknowledgment types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{CartPricing, CartState, PricingConfig};
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId};
use crate::money::{serialize_major, Money};

/// Order status as tracked by the order service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, awaiting confirmation.
    #[default]
    Pending,
    /// Confirmed with the customer.
    Confirmed,
    /// Handed to the courier.
    Shipped,
    /// Delivered.
    Delivered,
    /// Cancelled.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    Cash,
    Card,
    Online,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Online => "online",
        }
    }
}

/// Shipping details collected by the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    pub alternate_phone: Option<String>,
    pub address: String,
}

impl CustomerDetails {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            alternate_phone: None,
            address: address.into(),
        }
    }

    pub fn with_alternate_phone(mut self, phone: impl Into<String>) -> Self {
        self.alternate_phone = Some(phone.into());
        self
    }

    /// Name, phone and address are required.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let missing: Vec<&str> = [
            ("name", &self.name),
            ("phone", &self.phone),
            ("address", &self.address),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CommerceError::invalid(format!(
                "missing customer {}",
                missing.join(", ")
            )))
        }
    }
}

/// One line of the order payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product: ProductId,
    pub product_name: String,
    pub quantity: i64,
    pub size: String,
    pub color: String,
    #[serde(serialize_with = "serialize_major")]
    pub price: Money,
    pub image: String,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub customer_name: String,
    pub customer_phone: String,
    /// Empty string when the customer gave none.
    pub alternate_phone: String,
    pub customer_address: String,
    pub items: Vec<OrderItem>,
    /// Grand total including shipping.
    #[serde(serialize_with = "serialize_major")]
    pub total_amount: Money,
}

impl OrderRequest {
    /// Build the payload for a cart. The cart itself is not modified.
    pub fn from_cart(
        cart: &CartState,
        customer: &CustomerDetails,
        pricing: &PricingConfig,
    ) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        customer.validate()?;

        let totals = CartPricing::calculate(cart, pricing)?;
        let items = cart
            .items
            .iter()
            .map(|item| OrderItem {
                product: item.product_id.clone(),
                product_name: item.title.clone(),
                quantity: item.quantity,
                size: item.size.clone(),
                color: item.color.clone(),
                price: item.price,
                image: item.image.clone(),
            })
            .collect();

        Ok(Self {
            customer_name: customer.name.trim().to_string(),
            customer_phone: customer.phone.trim().to_string(),
            alternate_phone: customer
                .alternate_phone
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            customer_address: customer.address.trim().to_string(),
            items,
            total_amount: totals.total,
        })
    }
}

/// The order service's acknowledgment of a created order.
///
/// Any 2xx answer counts as a placed order, so every field is optional.
/// An empty or unreadable body yields [`CreatedOrder::default`].
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrder {
    #[serde(rename = "_id", default)]
    pub id: Option<OrderId>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    /// Total as stored by the service, in major units.
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
