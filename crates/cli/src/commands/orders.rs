//! Back-office order management.

use tiffin_core::{OrderId, OrderStatus};
use tiffin_storefront::checkout::StoredOrders;
use tiffin_storefront::storage::FileStore;

/// List placed orders, newest first.
///
/// # Errors
///
/// Returns an error if the order record cannot be read.
pub fn list(store: &FileStore) -> tiffin_storefront::Result<()> {
    let orders = StoredOrders::new(store.clone()).list()?;
    if orders.is_empty() {
        println!("No orders yet.");
        return Ok(());
    }
    for order in orders {
        println!(
            "{}  {:<17} {:>10}  {}  {}",
            order.created_at.format("%Y-%m-%d %H:%M"),
            order.status,
            order.total_amount,
            order.user_email,
            order.id
        );
    }
    Ok(())
}

/// Update an order's status, enforcing legal transitions.
///
/// # Errors
///
/// Returns an error for an unknown order, an illegal transition, or a
/// storage failure.
pub fn set_status(
    store: &FileStore,
    order_id: &str,
    status: OrderStatus,
) -> tiffin_storefront::Result<()> {
    let orders = StoredOrders::new(store.clone());
    let updated = orders.set_status(&OrderId::new(order_id), status)?;
    println!("Order {} is now {}", updated.id, updated.status);
    Ok(())
}
