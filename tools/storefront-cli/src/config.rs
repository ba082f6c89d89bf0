//! CLI configuration.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use storefront_commerce::cart::{PricingConfig, DEFAULT_SHIPPING_FEE};
use storefront_commerce::{Currency, Money};
use storefront_data::ApiConfig;

/// File names searched for, in order, in each directory.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["storefront.toml", ".storefront.toml", "storefront.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Storefront API location.
    #[serde(default)]
    pub api: ApiConfig,

    /// Pricing settings.
    #[serde(default)]
    pub pricing: PricingSection,

    /// Local cart storage.
    #[serde(default)]
    pub cart: CartSection,
}

impl StorefrontConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Apply an override for the API base URL, typically from
    /// `STOREFRONT_API_URL`.
    pub fn with_api_url_override(mut self, value: Option<String>) -> Self {
        self.api = self.api.with_base_url_override(value);
        self
    }

    /// Currency the cart is priced in.
    pub fn currency(&self) -> Result<Currency> {
        Currency::from_code(&self.pricing.currency)
            .ok_or_else(|| anyhow!("Unknown currency in config: {}", self.pricing.currency))
    }

    /// Pricing inputs for the cart calculator.
    pub fn to_pricing_config(&self) -> Result<PricingConfig> {
        let currency = self.currency()?;
        let fee = self.pricing.shipping_fee;
        if fee < 0.0 {
            return Err(anyhow!("pricing.shipping_fee must not be negative, got {fee}"));
        }
        let shipping_fee = Money::from_decimal(fee, currency)
            .ok_or_else(|| anyhow!("pricing.shipping_fee is not a valid amount: {fee}"))?;
        Ok(PricingConfig::new(shipping_fee))
    }
}

/// Pricing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingSection {
    /// ISO currency code (default: EGP).
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Flat shipping fee in major units (default: 120).
    #[serde(default = "default_shipping_fee")]
    pub shipping_fee: f64,
}

fn default_currency() -> String {
    Currency::EGP.code().to_string()
}

fn default_shipping_fee() -> f64 {
    DEFAULT_SHIPPING_FEE as f64
}

impl Default for PricingSection {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            shipping_fee: default_shipping_fee(),
        }
    }
}

/// Cart storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSection {
    /// Cart file, relative to the working directory.
    #[serde(default = "default_cart_path")]
    pub path: String,
}

fn default_cart_path() -> String {
    ".storefront/cart.json".to_string()
}

impl Default for CartSection {
    fn default() -> Self {
        Self {
            path: default_cart_path(),
        }
    }
}

/// Generate a default storefront.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Storefront configuration

[api]
base_url = "{base_url}"
# timeout_secs = 30

[pricing]
currency = "EGP"
shipping_fee = {fee}

[cart]
path = "{cart}"
"#,
        base_url = storefront_data::DEFAULT_BASE_URL,
        fee = DEFAULT_SHIPPING_FEE,
        cart = default_cart_path(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.cart.path, ".storefront/cart.json");
        assert_eq!(config.to_pricing_config().unwrap(), PricingConfig::default());
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: StorefrontConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.api, ApiConfig::default());
        assert_eq!(config.pricing.currency, "EGP");
        assert_eq!(config.to_pricing_config().unwrap(), PricingConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config: StorefrontConfig = toml::from_str(
            r#"
[api]
base_url = "https://shop.test/api"
timeout_secs = 10

[pricing]
shipping_fee = 75.5
"#,
        )
        .unwrap();

        assert_eq!(config.api.timeout_secs, Some(10));
        assert_eq!(config.cart.path, ".storefront/cart.json");
        let pricing = config.to_pricing_config().unwrap();
        assert_eq!(pricing.shipping_fee.amount_minor, 7550);
        assert_eq!(pricing.currency(), Currency::EGP);
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.json");
        std::fs::write(&path, r#"{"pricing":{"currency":"USD","shipping_fee":5}}"#).unwrap();

        let config = StorefrontConfig::load(&path).unwrap();
        assert_eq!(config.currency().unwrap(), Currency::USD);
        assert_eq!(config.to_pricing_config().unwrap().shipping_fee.amount_minor, 500);
    }

    #[test]
    fn test_load_reports_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.toml");
        std::fs::write(&path, "[pricing\nshipping_fee = ").unwrap();

        let err = StorefrontConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse TOML config"));
    }

    #[test]
    fn test_unknown_currency_rejected() {
        let mut config = StorefrontConfig::default();
        config.pricing.currency = "XYZ".into();
        assert!(config.to_pricing_config().is_err());
    }

    #[test]
    fn test_negative_shipping_rejected() {
        let mut config = StorefrontConfig::default();
        config.pricing.shipping_fee = -1.0;
        assert!(config.to_pricing_config().is_err());
    }

    #[test]
    fn test_api_url_override() {
        let config = StorefrontConfig::default()
            .with_api_url_override(Some("https://api.shop.eg/api".into()));
        assert_eq!(config.api.base_url, "https://api.shop.eg/api");
    }
}
