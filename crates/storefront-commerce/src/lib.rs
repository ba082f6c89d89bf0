//! Cart aggregation, pricing and order submission for the storefront.
//!
//! - **Catalog**: the product fields the cart reads once, at add-time
//! - **Cart**: line items merged by `(product, color, size)`, a pure
//!   reducer over typed actions, totals, and a local save file
//! - **Checkout**: the order payload, the order-service seam, and the
//!   one-attempt-at-a-time submission flow
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_commerce::prelude::*;
//!
//! let mut cart = CartState::default();
//! let hoodie = CartProduct::new("p1", "Hoodie", Money::from_major(100, Currency::EGP).unwrap());
//! cart.add(hoodie.clone(), "Black", "M", 1)?;
//! cart.add(hoodie, "Black", "M", 2)?;
//!
//! let pricing = CartPricing::calculate(&cart, &PricingConfig::default())?;
//! println!("Total: {}", pricing.total); // 420 EGP
//!
//! let mut submission = OrderSubmission::new(PricingConfig::default());
//! let customer = CustomerDetails::new("Mona", "0100", "Cairo");
//! let order = submission.submit(&mut cart, &customer, &gateway).await?;
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{CartProduct, ProductSnapshot, PLACEHOLDER_IMAGE};

    // Cart
    pub use crate::cart::{
        reduce, CartAction, CartFile, CartPricing, CartSnapshot, CartState, IdentityKey,
        LineItem, LineItemPricing, PricingConfig,
    };

    // Checkout
    pub use crate::checkout::{
        CreatedOrder, CustomerDetails, GatewayError, OrderGateway, OrderItem, OrderRequest,
        OrderStatus, OrderSubmission, PaymentMethod, SubmissionOutcome, SubmissionState,
    };
}
