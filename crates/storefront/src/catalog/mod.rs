//! Product catalog: menu items, categories, and filtering.
//!
//! The catalog is read-only input to the storefront. How it was fetched is
//! the concern of a [`CatalogSource`]; screens only see [`Catalog`] values
//! with products newest-first and categories alphabetical, matching the
//! ordering the storefront has always displayed.

pub mod drafts;
pub mod media;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tiffin_core::{CategoryId, Price, ProductId};

use crate::storage::{KeyValueStore, StorageError, keys};

/// A menu item. Owned by the admin/catalog side; the cart treats it as
/// immutable input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Document-store identifier, unique across the catalog.
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    /// Category label, matched exactly when filtering.
    pub category: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// A category label shown in the menu's filter bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Menu filter selection: everything, or one category by name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Show the full menu.
    #[default]
    All,
    /// Show only products whose category label equals this name.
    Named(String),
}

impl CategoryFilter {
    /// Whether `product` passes this filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => product.category == *name,
        }
    }
}

/// Errors loading or saving the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("catalog data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// Nothing has been seeded into the catalog yet.
    #[error("no catalog found; run `tiffin seed` first")]
    Missing,
}

/// The full menu: products plus the category labels to filter them by.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    products: Vec<Product>,
    categories: Vec<Category>,
}

impl Catalog {
    /// Build a catalog, normalizing display order: products newest-first,
    /// categories by name ascending.
    #[must_use]
    pub fn new(mut products: Vec<Product>, mut categories: Vec<Category>) -> Self {
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            products,
            categories,
        }
    }

    /// All products, newest first.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// All categories, sorted by name.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == *id)
    }

    /// Products passing `filter`, preserving catalog order.
    #[must_use]
    pub fn filter(&self, filter: &CategoryFilter) -> Vec<&Product> {
        self.products.iter().filter(|p| filter.matches(p)).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// External catalog read path.
///
/// The storefront consumes catalogs through this trait and is agnostic to
/// their origin (remote document store, seeded local file, test fixture).
pub trait CatalogSource {
    /// Load the current catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog is absent, unreadable, or corrupt.
    fn load_catalog(&self) -> Result<Catalog, CatalogError>;
}

/// Catalog persisted as one JSON document in local key-value storage.
///
/// This is the source the CLI runs against: `seed` writes through it and
/// every other command reads through it.
#[derive(Debug)]
pub struct StoredCatalog<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> StoredCatalog<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Replace the stored catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the underlying write fails.
    pub fn save(&self, catalog: &Catalog) -> Result<(), CatalogError> {
        let raw = serde_json::to_string(catalog)?;
        self.store.save(keys::CATALOG, &raw)?;
        Ok(())
    }
}

impl<S: KeyValueStore> CatalogSource for StoredCatalog<S> {
    fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        let raw = self
            .store
            .load(keys::CATALOG)?
            .ok_or(CatalogError::Missing)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
