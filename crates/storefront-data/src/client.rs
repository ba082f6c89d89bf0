//! HTTP client for the catalog and order services.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use storefront_commerce::catalog::ProductSnapshot;
use storefront_commerce::checkout::{CreatedOrder, GatewayError, OrderGateway, OrderRequest};
use storefront_commerce::ProductId;
use tracing::{debug, instrument, warn};

use crate::config::{endpoints, ApiConfig};
use crate::error::FetchError;

/// REST client for the storefront API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    config: ApiConfig,
}

/// Error body the API sends alongside non-2xx statuses.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl StorefrontClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not http(s) or the HTTP client
    /// cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;
        Self::with_client(config, client)
    }

    /// Build a client around an existing `reqwest::Client`.
    pub fn with_client(config: ApiConfig, client: reqwest::Client) -> Result<Self, FetchError> {
        let base = config.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(FetchError::InvalidUrl(config.base_url.clone()));
        }

        Ok(Self {
            inner: Arc::new(StorefrontClientInner { client, config }),
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Fetch the catalog product the cart will snapshot.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn fetch_product(&self, id: &ProductId) -> Result<ProductSnapshot, FetchError> {
        self.get(&endpoints::product(id.as_str())).await
    }

    /// `POST /orders`. Any 2xx is success.
    ///
    /// The order exists once the service answers 2xx, so the body is read
    /// on a best-effort basis: an empty or unexpected body still yields an
    /// acknowledgment, just without an id.
    #[instrument(skip_all, fields(items = request.items.len()))]
    pub async fn post_order(&self, request: &OrderRequest) -> Result<CreatedOrder, FetchError> {
        let url = self.inner.config.api_url(endpoints::ORDERS);
        debug!(%url, "POST");
        let response = self.inner.client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.parse_error(response).await);
        }

        let text = response.text().await.unwrap_or_default();
        Ok(parse_acknowledgment(status.as_u16(), &text))
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, FetchError> {
        let url = self.inner.config.api_url(endpoint);
        debug!(%url, "GET");
        let response = self.inner.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, FetchError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| FetchError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(self.parse_error(response).await)
    }

    async fn parse_error(&self, response: reqwest::Response) -> FetchError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();

        // Prefer the API's {"message": ...}; fall back to the raw body.
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or(text);

        FetchError::Api { status, message }
    }
}

fn parse_acknowledgment(status: u16, text: &str) -> CreatedOrder {
    if text.trim().is_empty() {
        return CreatedOrder::default();
    }
    match serde_json::from_str(text) {
        Ok(order) => order,
        Err(e) => {
            warn!(status, error = %e, "order accepted with an unreadable body");
            CreatedOrder::default()
        }
    }
}

#[async_trait]
impl OrderGateway for StorefrontClient {
    async fn create_order(&self, request: &OrderRequest) -> Result<CreatedOrder, GatewayError> {
        self.post_order(request).await.map_err(GatewayError::from)
    }
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("base_url", &self.inner.config.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_base_url() {
        let err = StorefrontClient::new(ApiConfig::new("localhost:5000/api")).unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[test]
    fn test_acknowledgment_body_is_best_effort() {
        let full = parse_acknowledgment(201, r#"{"_id":"ord-1","status":"confirmed"}"#);
        assert_eq!(full.id.as_ref().map(|id| id.as_str()), Some("ord-1"));

        assert_eq!(parse_acknowledgment(204, ""), CreatedOrder::default());
        assert_eq!(parse_acknowledgment(200, "OK"), CreatedOrder::default());
        assert_eq!(parse_acknowledgment(201, r#"{"_id": 42}"#), CreatedOrder::default());
    }

    #[test]
    fn test_accepts_configured_base_url() {
        let client = StorefrontClient::new(ApiConfig::default()).unwrap();
        assert_eq!(client.config().base_url, "http://localhost:5000/api");
        assert!(format!("{client:?}").contains("localhost:5000"));
    }
}
