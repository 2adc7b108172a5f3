//! Cart operations over the locally persisted cart.

use tiffin_core::ProductId;
use tiffin_storefront::AppError;
use tiffin_storefront::cart::CartStore;
use tiffin_storefront::catalog::{CatalogSource, StoredCatalog};
use tiffin_storefront::storage::FileStore;

fn open(store: &FileStore) -> CartStore {
    CartStore::new(Box::new(store.clone()))
}

/// Add `quantity` units of a catalog product to the cart.
///
/// # Errors
///
/// Returns an error if the catalog is unreadable or the product ID is not
/// in it.
pub fn add(store: &FileStore, product_id: &str, quantity: u32) -> tiffin_storefront::Result<()> {
    let catalog = StoredCatalog::new(store.clone()).load_catalog()?;
    let id = ProductId::new(product_id);
    let product = catalog
        .product(&id)
        .ok_or_else(|| AppError::NotFound(format!("product `{product_id}` in the catalog")))?;

    let cart = open(store);
    for _ in 0..quantity.max(1) {
        cart.add(product);
    }
    summary(&cart);
    Ok(())
}

/// Remove a product from the cart (no-op if absent).
pub fn remove(store: &FileStore, product_id: &str) {
    let cart = open(store);
    cart.remove(&ProductId::new(product_id));
    summary(&cart);
}

/// Set a product's quantity; zero or less removes it.
pub fn set(store: &FileStore, product_id: &str, quantity: i64) {
    let cart = open(store);
    cart.set_quantity(&ProductId::new(product_id), quantity);
    summary(&cart);
}

/// Print cart contents and totals.
pub fn show(store: &FileStore) {
    let cart = open(store);
    let snapshot = cart.snapshot();

    if snapshot.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    for item in snapshot.items() {
        println!(
            "{:>3} x {:<28} {:>10}",
            item.quantity,
            item.product.name,
            item.line_total()
        );
    }
    summary(&cart);
}

/// Empty the cart.
pub fn clear(store: &FileStore) {
    let cart = open(store);
    cart.clear();
    summary(&cart);
}

fn summary(cart: &CartStore) {
    println!("{} item(s), total {}", cart.item_count(), cart.total());
}
