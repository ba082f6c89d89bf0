//! Shopping cart module.
//!
//! Contains the cart state and its reducer, pricing, and local persistence.

mod action;
#[allow(clippy::module_inception)]
mod cart;
mod persist;
mod pricing;

pub use action::{reduce, CartAction};
pub use cart::{CartState, IdentityKey, LineItem};
pub use persist::{CartFile, CartSnapshot};
pub use pricing::{CartPricing, LineItemPricing, PricingConfig, DEFAULT_SHIPPING_FEE};
