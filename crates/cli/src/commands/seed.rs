//! Seed local storage with the demo menu.

use chrono::{Duration, Utc};
use tracing::info;

use tiffin_core::{CategoryId, CurrencyCode, Price, ProductId};
use tiffin_storefront::catalog::{Catalog, Category, Product, StoredCatalog};
use tiffin_storefront::config::StorefrontConfig;
use tiffin_storefront::storage::FileStore;

const CATEGORIES: &[&str] = &["Pizza", "Burgers", "Sushi", "Drinks", "Desserts", "Sides"];

/// Write the demo catalog to local storage, replacing any existing one.
///
/// # Errors
///
/// Returns an error if the catalog cannot be written.
pub fn run(store: &FileStore, config: &StorefrontConfig) -> tiffin_storefront::Result<()> {
    let catalog = demo_catalog(config.currency);
    StoredCatalog::new(store.clone()).save(&catalog)?;

    info!(
        products = catalog.products().len(),
        categories = catalog.categories().len(),
        dir = %store.dir().display(),
        "catalog seeded"
    );
    Ok(())
}

/// The demo menu.
#[must_use]
pub fn demo_catalog(currency: CurrencyCode) -> Catalog {
    let now = Utc::now();
    let entries = [
        (
            "margherita-pizza",
            "Margherita Pizza",
            "Classic tomato and mozzarella with fresh basil.",
            299,
            "Pizza",
        ),
        (
            "double-cheeseburger",
            "Double Cheeseburger",
            "Two beef patties, cheddar cheese, lettuce, tomato, and special sauce.",
            349,
            "Burgers",
        ),
        (
            "pepperoni-feast",
            "Pepperoni Feast",
            "Loaded with pepperoni and extra cheese.",
            399,
            "Pizza",
        ),
        (
            "spicy-chicken-wings",
            "Spicy Chicken Wings",
            "Crispy wings tossed in our signature hot sauce.",
            249,
            "Sides",
        ),
    ];

    let products = entries
        .iter()
        .enumerate()
        .map(|(i, (id, name, description, price, category))| Product {
            id: ProductId::new(*id),
            name: (*name).to_owned(),
            description: (*description).to_owned(),
            price: Price::from_major_units(*price, currency),
            category: (*category).to_owned(),
            image_url: format!("https://images.tiffin.example/{id}.jpg"),
            // Stagger timestamps so the newest-first menu keeps this order.
            created_at: now - Duration::minutes(i64::try_from(i).unwrap_or(0)),
        })
        .collect();

    let categories = CATEGORIES
        .iter()
        .map(|name| Category {
            id: CategoryId::new(format!("cat-{}", name.to_ascii_lowercase())),
            name: (*name).to_owned(),
        })
        .collect();

    Catalog::new(products, categories)
}
