//! Cart pricing calculations.

use crate::cart::CartState;
use crate::error::CommerceError;
use crate::ids::CartItemId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Flat shipping fee charged when no configuration says otherwise, in
/// major units.
pub const DEFAULT_SHIPPING_FEE: i64 = 120;

/// Pricing inputs that come from configuration rather than the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Flat shipping fee, charged once per order.
    pub shipping_fee: Money,
}

impl PricingConfig {
    pub fn new(shipping_fee: Money) -> Self {
        Self { shipping_fee }
    }

    pub fn currency(&self) -> Currency {
        self.shipping_fee.currency
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            shipping_fee: Money::new(
                DEFAULT_SHIPPING_FEE * Currency::EGP.minor_per_major(),
                Currency::EGP,
            ),
        }
    }
}

/// Pricing breakdown for a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Sum of line totals.
    pub subtotal: Money,
    /// Flat shipping fee.
    pub shipping: Money,
    /// `subtotal + shipping`.
    pub total: Money,
    /// Per-line breakdown in cart order.
    pub line_items: Vec<LineItemPricing>,
}

impl CartPricing {
    /// Price a cart. No tax, discount or coupon applies.
    pub fn calculate(cart: &CartState, config: &PricingConfig) -> Result<Self, CommerceError> {
        if cart.currency != config.currency() {
            return Err(CommerceError::CurrencyMismatch {
                expected: cart.currency.code().to_string(),
                got: config.currency().code().to_string(),
            });
        }

        let line_items = cart
            .items
            .iter()
            .map(|item| {
                Ok(LineItemPricing {
                    cart_id: item.cart_id.clone(),
                    unit_price: item.price,
                    quantity: item.quantity,
                    line_total: item.line_total()?,
                })
            })
            .collect::<Result<Vec<_>, CommerceError>>()?;

        let subtotal = cart.total()?;
        let total = subtotal
            .try_add(&config.shipping_fee)
            .ok_or(CommerceError::Overflow)?;

        Ok(Self {
            subtotal,
            shipping: config.shipping_fee,
            total,
            line_items,
        })
    }
}

/// Pricing breakdown for a single line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItemPricing {
    pub cart_id: CartItemId,
    pub unit_price: Money,
    pub quantity: i64,
    /// `unit_price * quantity`.
    pub line_total: Money,
}
