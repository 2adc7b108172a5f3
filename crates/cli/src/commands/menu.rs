//! List the seeded menu.

use tiffin_storefront::catalog::{CatalogSource, CategoryFilter, StoredCatalog};
use tiffin_storefront::storage::FileStore;

/// Print the menu, optionally filtered to one category.
///
/// # Errors
///
/// Returns an error if no catalog has been seeded or it cannot be read.
pub fn run(store: &FileStore, category: Option<&str>) -> tiffin_storefront::Result<()> {
    let catalog = StoredCatalog::new(store.clone()).load_catalog()?;

    let filter = category.map_or(CategoryFilter::All, |name| {
        CategoryFilter::Named(name.to_owned())
    });
    let products = catalog.filter(&filter);

    if products.is_empty() {
        println!("No items found in this category.");
        return Ok(());
    }

    for product in products {
        println!(
            "{:<24} {:<10} {:>10}  {}",
            product.id, product.category, product.price, product.name
        );
    }
    Ok(())
}
