//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor: runtime configuration and the in-memory
//! product catalog served by the demo routes.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Default request body limit (2 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppConfigError {
    #[error("environment variable {name}={value:?} is invalid: {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Host name used in the startup log line.
    pub hostname: String,
    pub port: u16,
    /// Maximum request body size accepted by the validation middleware.
    pub body_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            hostname: "localhost".to_string(),
            port: 5000,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl AppConfig {
    /// Read `HOSTNAME`, `PORT` and `REQVAL_BODY_LIMIT`, falling back to defaults
    /// for unset variables.
    pub fn from_env() -> Result<Self, AppConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppConfigError> {
        let defaults = Self::default();
        let hostname = lookup("HOSTNAME")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or(defaults.hostname);
        let port = parse_var(&lookup, "PORT")?.unwrap_or(defaults.port);
        let body_limit = parse_var(&lookup, "REQVAL_BODY_LIMIT")?.unwrap_or(defaults.body_limit);
        Ok(Self {
            hostname,
            port,
            body_limit,
        })
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, AppConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| AppConfigError::InvalidVar {
                name,
                reason: e.to_string(),
                value,
            }),
    }
}

// -- Product Catalog ----------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// Sanitized product update, as produced by the update route's schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductUpdate {
    pub name: String,
    pub category: String,
    pub price: f64,
}

/// 24 lowercase hex characters, the identifier shape the routes accept.
fn new_product_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(24);
    id
}

/// Thread-safe, cloneable in-memory product list.
///
/// The lock is `parking_lot` and never held across `.await` points.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: Arc<RwLock<Vec<Product>>>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with three placeholder products.
    pub fn seeded() -> Self {
        let catalog = Self::new();
        for n in 1..=3 {
            catalog.insert(Product {
                id: new_product_id(),
                name: format!("Product {n}"),
                category: format!("Category {n}"),
                price: None,
            });
        }
        catalog
    }

    pub fn insert(&self, product: Product) {
        self.products.write().push(product);
    }

    /// All products in insertion order.
    pub fn list(&self) -> Vec<Product> {
        self.products.read().clone()
    }

    pub fn get(&self, id: &str) -> Option<Product> {
        self.products.read().iter().find(|p| p.id == id).cloned()
    }

    /// Apply `update` to the product with `id`. Returns the updated record,
    /// or `None` if no such product exists.
    pub fn update(&self, id: &str, update: ProductUpdate) -> Option<Product> {
        let mut guard = self.products.write();
        let product = guard.iter_mut().find(|p| p.id == id)?;
        product.name = update.name;
        product.category = update.category;
        product.price = Some(update.price);
        Some(product.clone())
    }

    pub fn len(&self) -> usize {
        self.products.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.read().is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub catalog: ProductCatalog,
}

impl AppState {
    /// Default configuration and a seeded catalog.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            catalog: ProductCatalog::seeded(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
