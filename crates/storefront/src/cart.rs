//! The shopping cart store.
//!
//! Single source of truth for the user's cart: an ordered list of product
//! snapshots with quantities, persisted to local storage after every
//! effective mutation and broadcast to subscribers. The store is a cheaply
//! cloneable handle meant to be constructed once and injected into every
//! screen that reads or mutates the cart.
//!
//! # Invariants
//!
//! - at most one [`CartItem`] per product ID;
//! - every stored quantity is at least 1; an item driven to zero is
//!   removed, never kept;
//! - derived values (`item_count`, `total`) are recomputed from the item
//!   list on every access, never cached.
//!
//! # Failure semantics
//!
//! Every operation is total. Unknown product IDs are silent no-ops and
//! persistence failures are swallowed; the in-memory cart stays
//! authoritative for the rest of the session. Both cases emit `tracing`
//! events and, when configured, a [`CartDiagnostic`] through the
//! diagnostics hook.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::{Deserialize, Serialize};

use tiffin_core::{CurrencyCode, Price, ProductId};

use crate::catalog::Product;
use crate::storage::{KeyValueStore, keys};

/// A product in the cart, with quantity.
///
/// The full product is snapshotted so a persisted cart can be rendered
/// without refetching the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Price × quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Outcome of a value-level mutation, used by the store to decide whether
/// to persist, notify, or report.
enum Mutation {
    /// State changed; persist and notify.
    Applied,
    /// The operation was valid but left the state as it was.
    Unchanged,
    /// The operation referenced a product the cart does not hold.
    Ignored(ProductId),
}

/// The cart value: an ordered collection of [`CartItem`]s.
///
/// Insertion order is significant only for display. All mutation goes
/// through [`CartStore`]; this type exposes the read API that snapshots
/// and subscribers see.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// The items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Consume the cart, returning its items (used for order snapshots).
    #[must_use]
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across all items, not the number of distinct
    /// products.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |acc, item| acc.saturating_add(item.quantity))
    }

    /// Σ(price × quantity) over all items, recomputed on every call.
    ///
    /// The currency is taken from the first item; an empty cart totals
    /// zero in the default currency.
    #[must_use]
    pub fn total(&self) -> Price {
        let currency = self
            .items
            .first()
            .map_or_else(CurrencyCode::default, |item| item.product.price.currency_code);
        self.items
            .iter()
            .fold(Price::zero(currency), |acc, item| acc.plus(&item.line_total()))
    }

    /// Quantity of the given product, if present.
    #[must_use]
    pub fn quantity_of(&self, id: &ProductId) -> Option<u32> {
        self.items
            .iter()
            .find(|item| item.product.id == *id)
            .map(|item| item.quantity)
    }

    fn add(&mut self, product: &Product) -> Mutation {
        if product.id.is_empty() {
            return Mutation::Ignored(product.id.clone());
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity = item.quantity.saturating_add(1);
        } else {
            self.items.push(CartItem {
                product: product.clone(),
                quantity: 1,
            });
        }
        Mutation::Applied
    }

    fn remove(&mut self, id: &ProductId) -> Mutation {
        let before = self.items.len();
        self.items.retain(|item| item.product.id != *id);
        if self.items.len() == before {
            Mutation::Ignored(id.clone())
        } else {
            Mutation::Applied
        }
    }

    fn set_quantity(&mut self, id: &ProductId, quantity: i64) -> Mutation {
        if quantity <= 0 {
            return self.remove(id);
        }
        let clamped = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.items.iter_mut().find(|item| item.product.id == *id) {
            Some(item) if item.quantity == clamped => Mutation::Unchanged,
            Some(item) => {
                item.quantity = clamped;
                Mutation::Applied
            }
            None => Mutation::Ignored(id.clone()),
        }
    }

    fn clear(&mut self) -> Mutation {
        if self.items.is_empty() {
            Mutation::Unchanged
        } else {
            self.items.clear();
            Mutation::Applied
        }
    }
}

/// The cart operation a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOp {
    Add,
    Remove,
    SetQuantity,
    Clear,
}

impl std::fmt::Display for CartOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Remove => write!(f, "remove"),
            Self::SetQuantity => write!(f, "set-quantity"),
            Self::Clear => write!(f, "clear"),
        }
    }
}

/// Structured events for conditions the cart tolerates silently.
///
/// The cart never fails; hosts that want visibility into swallowed
/// conditions register a handler via [`CartStore::with_diagnostics`].
/// Without one, events are only logged.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum CartDiagnostic {
    /// Persisted cart data was missing its shape or unreadable; the
    /// session started with an empty cart.
    RestoreFailed { reason: String },
    /// A mutation could not be written to local storage; the in-memory
    /// cart remains authoritative.
    PersistFailed { reason: String },
    /// A mutation referenced a product ID the cart does not hold and was
    /// dropped.
    IgnoredMutation { op: CartOp, product_id: ProductId },
}

/// Callback receiving [`CartDiagnostic`] events.
pub type DiagnosticHandler = Box<dyn Fn(&CartDiagnostic) + Send + Sync>;

type Listener = Arc<dyn Fn(&Cart) + Send + Sync>;

struct CartStoreInner {
    state: Mutex<Cart>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener_id: AtomicU64,
    storage: Box<dyn KeyValueStore>,
    storage_key: String,
    diagnostics: Option<DiagnosticHandler>,
}

/// Shared handle to the cart.
///
/// Cheaply cloneable via `Arc`; construct one per session and inject it
/// into each consuming screen. Mutations are serialized internally, and
/// subscriber notifications are delivered after the mutating operation has
/// fully completed.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

impl CartStore {
    /// Create a store over `storage` using the default cart key, restoring
    /// any previously persisted cart.
    #[must_use]
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self::build(storage, keys::CART.to_owned(), None)
    }

    /// Create a store persisting under a custom key.
    #[must_use]
    pub fn with_key(storage: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self::build(storage, key.into(), None)
    }

    /// Create a store with a diagnostics handler for swallowed conditions.
    #[must_use]
    pub fn with_diagnostics(
        storage: Box<dyn KeyValueStore>,
        key: impl Into<String>,
        handler: impl Fn(&CartDiagnostic) + Send + Sync + 'static,
    ) -> Self {
        Self::build(storage, key.into(), Some(Box::new(handler)))
    }

    fn build(
        storage: Box<dyn KeyValueStore>,
        storage_key: String,
        diagnostics: Option<DiagnosticHandler>,
    ) -> Self {
        let cart = match restore(storage.as_ref(), &storage_key) {
            Ok(cart) => cart,
            Err(reason) => {
                tracing::warn!(%reason, "failed to restore cart; starting empty");
                emit(
                    diagnostics.as_ref(),
                    &CartDiagnostic::RestoreFailed { reason },
                );
                Cart::default()
            }
        };

        Self {
            inner: Arc::new(CartStoreInner {
                state: Mutex::new(cart),
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(0),
                storage,
                storage_key,
                diagnostics,
            }),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// A clone of the current cart state.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.lock_state().clone()
    }

    /// Sum of quantities across all items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lock_state().item_count()
    }

    /// Σ(price × quantity) over all items.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lock_state().total()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock_state().is_empty()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add one unit of `product`: increments the existing line or appends
    /// a new one with quantity 1.
    pub fn add(&self, product: &Product) {
        self.apply(CartOp::Add, |cart| cart.add(product));
    }

    /// Remove the line for `id`. Silently does nothing if absent.
    pub fn remove(&self, id: &ProductId) {
        self.apply(CartOp::Remove, |cart| cart.remove(id));
    }

    /// Set the quantity for `id`. A quantity of zero or less removes the
    /// line; an unknown ID is silently ignored.
    pub fn set_quantity(&self, id: &ProductId, quantity: i64) {
        self.apply(CartOp::SetQuantity, |cart| cart.set_quantity(id, quantity));
    }

    /// Empty the cart.
    pub fn clear(&self) {
        self.apply(CartOp::Clear, Cart::clear);
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Register a listener invoked with a snapshot after every effective
    /// mutation. Dropping (or explicitly unsubscribing) the returned
    /// handle removes the listener.
    pub fn subscribe(&self, listener: impl Fn(&Cart) + Send + Sync + 'static) -> Subscription {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.lock_listeners().push((id, Arc::new(listener)));
        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn apply(&self, op: CartOp, f: impl FnOnce(&mut Cart) -> Mutation) {
        let (mutation, snapshot) = {
            let mut cart = self.lock_state();
            let mutation = f(&mut cart);
            let snapshot = matches!(mutation, Mutation::Applied).then(|| cart.clone());
            (mutation, snapshot)
        };

        match (mutation, snapshot) {
            (Mutation::Applied, Some(snapshot)) => {
                self.persist(&snapshot);
                self.notify(&snapshot);
            }
            (Mutation::Ignored(product_id), _) => {
                tracing::debug!(%op, %product_id, "cart mutation ignored: unknown product");
                emit(
                    self.inner.diagnostics.as_ref(),
                    &CartDiagnostic::IgnoredMutation { op, product_id },
                );
            }
            _ => {}
        }
    }

    /// Best-effort write of the full item list to local storage.
    fn persist(&self, cart: &Cart) {
        let result = serde_json::to_string(cart)
            .map_err(|e| e.to_string())
            .and_then(|raw| {
                self.inner
                    .storage
                    .save(&self.inner.storage_key, &raw)
                    .map_err(|e| e.to_string())
            });

        if let Err(reason) = result {
            tracing::warn!(%reason, "failed to persist cart; in-memory state unaffected");
            emit(
                self.inner.diagnostics.as_ref(),
                &CartDiagnostic::PersistFailed { reason },
            );
        }
    }

    /// Deliver `cart` to every listener, outside of the state lock.
    fn notify(&self, cart: &Cart) {
        let handlers: Vec<Listener> = self
            .lock_listeners()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for handler in &handlers {
            handler(cart);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, Cart> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Vec<(u64, Listener)>> {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn restore(storage: &dyn KeyValueStore, key: &str) -> Result<Cart, String> {
    match storage.load(key) {
        Ok(None) => Ok(Cart::default()),
        Ok(Some(raw)) => serde_json::from_str(&raw).map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    }
}

fn emit(handler: Option<&DiagnosticHandler>, event: &CartDiagnostic) {
    if let Some(handler) = handler {
        handler(event);
    }
}

/// Handle returned by [`CartStore::subscribe`].
///
/// The listener stays registered for the lifetime of this handle.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<CartStoreInner>,
}

impl Subscription {
    /// Remove the listener now. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            let mut listeners = inner
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            listeners.retain(|(id, _)| *id != self.id);
        }
    }
}
