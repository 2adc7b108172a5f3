//! Place an order from the current cart.

use tiffin_core::{Email, UserId};
use tiffin_storefront::AppError;
use tiffin_storefront::account::{AddressBook, CurrentUser};
use tiffin_storefront::cart::CartStore;
use tiffin_storefront::checkout::{OrderTotals, StoredOrders, place_order};
use tiffin_storefront::config::StorefrontConfig;
use tiffin_storefront::storage::FileStore;

/// Place an order with the selected (or default) address.
///
/// # Errors
///
/// Returns an error if the cart is empty, no address is available, the
/// email is invalid, or the order cannot be recorded.
pub fn run(
    store: &FileStore,
    config: &StorefrontConfig,
    address_id: Option<&str>,
    email: &str,
) -> tiffin_storefront::Result<()> {
    let book = AddressBook::load_from(store)?;
    let address = match address_id {
        Some(id) => book
            .get(&tiffin_core::AddressId::new(id))
            .ok_or_else(|| AppError::NotFound(format!("address `{id}`")))?,
        None => book.default_address().ok_or_else(|| {
            AppError::NotFound("a delivery address; save one with `tiffin address add`".to_owned())
        })?,
    };

    let customer = CurrentUser::shopper(UserId::new("local-shopper"), Email::parse(email)?);

    let cart = CartStore::new(Box::new(store.clone()));
    let orders = StoredOrders::new(store.clone());
    let order = place_order(&cart, &customer, address, &orders)?;

    let totals = OrderTotals::compute(order.total_amount, config.delivery_fee);
    println!("Order {} placed ({} items)", order.id, order.items.len());
    println!("  Subtotal      {:>10}", totals.subtotal);
    println!("  Delivery Fee  {:>10}", totals.delivery_fee);
    println!("  Total         {:>10}", totals.grand_total);
    println!("  Deliver to    {}, {}", address.house_number, address.city);
    Ok(())
}
