//! Checkout: order snapshots and submission.
//!
//! Placing an order reads the cart's items and total, snapshots the
//! delivery address, and hands the immutable [`Order`] to an [`OrderSink`]
//! (the external order-submission collaborator). Only after the sink
//! accepts the order is the cart cleared; a failed submission leaves the
//! cart untouched so the user can retry.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tiffin_core::{Email, OrderId, OrderStatus, Price, UserId};

use crate::account::{Address, CurrentUser};
use crate::cart::{CartItem, CartStore};
use crate::storage::{KeyValueStore, StorageError, keys};

/// Flat delivery fee charged on top of the cart subtotal, in major
/// currency units.
pub const DEFAULT_DELIVERY_FEE: i64 = 50;

/// An immutable snapshot of a placed order.
///
/// `total_amount` is the cart subtotal at the time of placement. The
/// delivery fee is presented separately (see [`OrderTotals`]) and not
/// folded into the stored amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub user_email: Email,
    pub items: Vec<CartItem>,
    pub total_amount: Price,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    /// Snapshot of the delivery address as it was at checkout.
    pub address: Address,
}

/// Checkout amounts as presented in the order summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    /// Σ(price × quantity) over the cart.
    pub subtotal: Price,
    pub delivery_fee: Price,
    /// `subtotal + delivery_fee`.
    pub grand_total: Price,
}

impl OrderTotals {
    /// Compute totals from a cart subtotal and a flat fee in major units.
    #[must_use]
    pub fn compute(subtotal: Price, delivery_fee: Decimal) -> Self {
        let delivery_fee = Price::new(delivery_fee, subtotal.currency_code);
        Self {
            subtotal,
            delivery_fee,
            grand_total: subtotal.plus(&delivery_fee),
        }
    }
}

/// Failure reported by an [`OrderSink`].
#[derive(Debug, Error)]
#[error("{0}")]
pub struct OrderSubmitError(pub String);

/// Checkout errors.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// An order needs at least one item.
    #[error("cannot place an order with an empty cart")]
    EmptyCart,

    /// The external submission path rejected or could not take the order.
    #[error("order submission failed: {0}")]
    Submission(#[from] OrderSubmitError),

    /// The referenced order does not exist (back-office operations).
    #[error("order not found: {0}")]
    UnknownOrder(OrderId),

    /// The requested status change is not a legal transition.
    #[error("cannot move order from `{from}` to `{to}`")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    /// The local order record could not be read or written.
    #[error("order storage error: {0}")]
    Storage(#[from] StorageError),

    /// The local order record is not valid JSON.
    #[error("order data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// External order-submission path.
///
/// Implementations decide where orders go: a remote document collection
/// in production, local storage or memory in tests and demos.
pub trait OrderSink {
    /// Accept a placed order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order cannot be recorded; the caller will
    /// keep the cart intact.
    fn submit(&self, order: &Order) -> Result<(), OrderSubmitError>;
}

/// Place an order from the current cart contents.
///
/// Reads the cart snapshot (items and total) before anything else, stamps
/// the order `pending` with the current time, submits it, and clears the
/// cart only on success.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] when there is nothing to order, or
/// [`CheckoutError::Submission`] when the sink rejects the order; in both
/// cases the cart is left unchanged.
pub fn place_order(
    cart: &CartStore,
    customer: &CurrentUser,
    address: &Address,
    sink: &dyn OrderSink,
) -> Result<Order, CheckoutError> {
    let snapshot = cart.snapshot();
    if snapshot.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let order = Order {
        id: OrderId::generate(),
        user_id: customer.id.clone(),
        user_email: customer.email.clone(),
        total_amount: snapshot.total(),
        items: snapshot.into_items(),
        status: OrderStatus::Pending,
        created_at: Utc::now(),
        address: address.clone(),
    };

    sink.submit(&order)?;
    cart.clear();
    tracing::info!(order_id = %order.id, total = %order.total_amount, "order placed");
    Ok(order)
}

/// In-memory sink for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryOrderSink {
    orders: std::sync::Mutex<Vec<Order>>,
}

impl MemoryOrderSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders submitted so far, oldest first.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.orders
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl OrderSink for MemoryOrderSink {
    fn submit(&self, order: &Order) -> Result<(), OrderSubmitError> {
        self.orders
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(order.clone());
        Ok(())
    }
}

/// Orders recorded in local key-value storage.
///
/// Doubles as the CLI's [`OrderSink`] and as the back-office view over
/// placed orders, including the admin status-update operation.
#[derive(Debug)]
pub struct StoredOrders<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> StoredOrders<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// All recorded orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the record is corrupt.
    pub fn list(&self) -> Result<Vec<Order>, CheckoutError> {
        let mut orders = self.load()?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Back-office status update with transition validation.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::UnknownOrder`] for an unknown ID or
    /// [`CheckoutError::InvalidTransition`] for an illegal status change;
    /// the record is only written when the transition is legal.
    pub fn set_status(
        &self,
        id: &OrderId,
        next: OrderStatus,
    ) -> Result<Order, CheckoutError> {
        let mut orders = self.load()?;
        let order = orders
            .iter_mut()
            .find(|o| o.id == *id)
            .ok_or_else(|| CheckoutError::UnknownOrder(id.clone()))?;

        if !order.status.can_transition_to(next) {
            return Err(CheckoutError::InvalidTransition {
                from: order.status,
                to: next,
            });
        }

        order.status = next;
        let updated = order.clone();
        self.save(&orders)?;
        tracing::info!(order_id = %updated.id, status = %updated.status, "order status updated");
        Ok(updated)
    }

    fn load(&self) -> Result<Vec<Order>, CheckoutError> {
        match self.store.load(keys::ORDERS)? {
            None => Ok(Vec::new()),
            Some(raw) => Ok(serde_json::from_str(&raw)?),
        }
    }

    fn save(&self, orders: &[Order]) -> Result<(), CheckoutError> {
        let raw = serde_json::to_string(orders)?;
        self.store.save(keys::ORDERS, &raw)?;
        Ok(())
    }
}

impl<S: KeyValueStore> OrderSink for StoredOrders<S> {
    fn submit(&self, order: &Order) -> Result<(), OrderSubmitError> {
        let mut orders = self.load().map_err(|e| OrderSubmitError(e.to_string()))?;
        orders.push(order.clone());
        self.save(&orders).map_err(|e| OrderSubmitError(e.to_string()))
    }
}
