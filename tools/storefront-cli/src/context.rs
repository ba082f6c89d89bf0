//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use storefront_commerce::cart::{CartFile, CartSnapshot, PricingConfig};
use storefront_data::{StorefrontClient, API_URL_ENV};

use crate::config::{StorefrontConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: StorefrontConfig,
    /// Where the configuration was read from, if anywhere.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    cart_file: CartFile,
}

impl Context {
    /// Load context from config file and environment.
    pub fn load(config_path: Option<&str>, cart_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = resolve_path(&cwd, path);
                (StorefrontConfig::load(&path)?, Some(path))
            }
            None => match find_config(&cwd) {
                Some((path, config)) => (config, Some(path)),
                None => (StorefrontConfig::default(), None),
            },
        };
        let config = config.with_api_url_override(std::env::var(API_URL_ENV).ok());

        let cart_file = CartFile::new(resolve_path(&cwd, cart_path.unwrap_or(&config.cart.path)));
        tracing::debug!(
            config = ?config_path,
            cart = %cart_file.path().display(),
            base_url = %config.api.base_url,
            "context loaded"
        );

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
            cart_file,
        })
    }

    pub fn cart_path(&self) -> &Path {
        self.cart_file.path()
    }

    /// Load the saved cart, or start a new session if none exists.
    pub fn load_cart(&self) -> Result<CartSnapshot> {
        let currency = self.config.currency()?;
        self.cart_file
            .load_or_new(currency)
            .with_context(|| format!("Failed to load cart: {}", self.cart_path().display()))
    }

    /// Persist the cart.
    pub fn save_cart(&self, snapshot: &mut CartSnapshot) -> Result<()> {
        self.cart_file
            .save(snapshot)
            .with_context(|| format!("Failed to save cart: {}", self.cart_path().display()))
    }

    pub fn pricing(&self) -> Result<PricingConfig> {
        self.config.to_pricing_config()
    }

    /// HTTP client for the configured API.
    pub fn client(&self) -> Result<StorefrontClient> {
        StorefrontClient::new(self.config.api.clone()).context("Failed to create API client")
    }
}

/// Resolve a path relative to the working directory.
pub fn resolve_path(cwd: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

/// Find a config file in `start` or any parent directory.
pub fn find_config(start: &Path) -> Option<(PathBuf, StorefrontConfig)> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_FILE_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                if let Ok(config) = StorefrontConfig::load(&config_path) {
                    return Some((config_path, config));
                }
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}
