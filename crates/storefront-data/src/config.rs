//! API base URL, endpoint paths and image URL resolution.

use serde::{Deserialize, Serialize};

/// Base URL used when neither configuration nor environment sets one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Environment variable that overrides the configured base URL.
pub const API_URL_ENV: &str = "STOREFRONT_API_URL";

/// Endpoint paths relative to the API base URL.
pub mod endpoints {
    pub const PRODUCTS: &str = "/products";
    pub const ORDERS: &str = "/orders";

    /// `/products/{id}`
    pub fn product(id: &str) -> String {
        format!("{PRODUCTS}/{id}")
    }
}

/// Where the storefront's REST services live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Client-side request timeout. No timeout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: None,
        }
    }

    /// Apply the [`API_URL_ENV`] override from the process environment.
    pub fn with_env(self) -> Self {
        let value = std::env::var(API_URL_ENV).ok();
        self.with_base_url_override(value)
    }

    /// Replace the base URL when `value` is a non-blank string.
    pub fn with_base_url_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        self
    }

    fn trimmed_base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Join an endpoint onto the base URL with exactly one slash between.
    pub fn api_url(&self, endpoint: &str) -> String {
        let endpoint = endpoint.trim_start_matches('/');
        format!("{}/{}", self.trimmed_base(), endpoint)
    }

    /// Turn a stored image path into something a browser can load.
    ///
    /// - empty: the placeholder image
    /// - `http…` or `data:` URLs: unchanged
    /// - `/uploads/…`: served from the API host, dropping a trailing `/api`
    /// - anything else: unchanged
    pub fn image_url(&self, path: &str) -> String {
        if path.is_empty() {
            return storefront_commerce::catalog::PLACEHOLDER_IMAGE.to_string();
        }
        if path.starts_with("http") || path.starts_with("data:") {
            return path.to_string();
        }
        if path.starts_with("/uploads/") {
            let base = self.trimmed_base();
            let host = base.strip_suffix("/api").unwrap_or(base);
            return format!("{host}{path}");
        }
        path.to_string()
    }
}
