//! REST client for the storefront's catalog and order services.
//!
//! Resolves endpoints against a configurable base URL and implements
//! [`OrderGateway`](storefront_commerce::checkout::OrderGateway) over HTTP.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_data::{ApiConfig, StorefrontClient};
//!
//! let client = StorefrontClient::new(ApiConfig::default().with_env())?;
//!
//! let product = client.fetch_product(&"p1".into()).await?;
//! println!("{} costs {}", product.name, product.sale_price);
//!
//! // The client is also the order gateway
//! let order = submission.submit(&mut cart, &customer, &client).await?;
//! ```

mod client;
pub mod config;
mod error;

pub use client::StorefrontClient;
pub use config::{endpoints, ApiConfig, API_URL_ENV, DEFAULT_BASE_URL};
pub use error::FetchError;
