//! Cart store scenarios: sessions over shared storage, reload behavior,
//! and subscriber-driven UI updates.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;

use tiffin_core::ProductId;
use tiffin_integration_tests::{cheeseburger, margherita, product};
use tiffin_storefront::cart::{Cart, CartStore};
use tiffin_storefront::storage::{FileStore, KeyValueStore, MemoryStore, keys};

// =============================================================================
// Shopping Session Scenarios
// =============================================================================

#[test]
fn test_menu_scenario_totals() {
    // Add the pizza once, the burger once, then bump the pizza to 3 from
    // the cart screen.
    let cart = CartStore::new(Box::new(MemoryStore::new()));
    cart.add(&margherita());
    cart.add(&cheeseburger());
    cart.set_quantity(&margherita().id, 3);

    assert_eq!(cart.item_count(), 4);
    assert_eq!(cart.total().amount, Decimal::from(3 * 299 + 349));
}

#[test]
fn test_quantity_stepper_to_zero_removes_line() {
    // The cart screen's minus button drives quantity through set_quantity;
    // stepping 1 -> 0 must behave exactly like the remove button.
    let cart = CartStore::new(Box::new(MemoryStore::new()));
    cart.add(&margherita());
    cart.add(&cheeseburger());

    cart.set_quantity(&margherita().id, 0);

    let snapshot = cart.snapshot();
    assert_eq!(snapshot.items().len(), 1);
    assert_eq!(snapshot.items()[0].product.id, cheeseburger().id);
}

#[test]
fn test_derived_values_track_any_mutation_sequence() {
    let cart = CartStore::new(Box::new(MemoryStore::new()));
    let items = [
        product("a", "A", 10, "Pizza"),
        product("b", "B", 20, "Pizza"),
        product("c", "C", 30, "Sides"),
    ];

    for item in &items {
        cart.add(item);
        cart.add(item);
    }
    cart.set_quantity(&ProductId::new("b"), 5);
    cart.remove(&ProductId::new("c"));
    cart.add(&items[2]);

    let snapshot = cart.snapshot();
    let expected_count: u32 = snapshot.items().iter().map(|i| i.quantity).sum();
    assert_eq!(cart.item_count(), expected_count);
    assert_eq!(cart.item_count(), 2 + 5 + 1);
    assert_eq!(cart.total().amount, Decimal::from(2 * 10 + 5 * 20 + 30));
}

// =============================================================================
// Persistence Round-Trips
// =============================================================================

fn pairs(cart: &Cart) -> BTreeMap<String, u32> {
    cart.items()
        .iter()
        .map(|i| (i.product.id.as_str().to_owned(), i.quantity))
        .collect()
}

#[test]
fn test_reload_reproduces_product_quantity_pairs() {
    let storage = Arc::new(MemoryStore::new());

    let session_one = CartStore::new(Box::new(Arc::clone(&storage)));
    session_one.add(&margherita());
    session_one.add(&cheeseburger());
    session_one.set_quantity(&margherita().id, 3);

    let session_two = CartStore::new(Box::new(Arc::clone(&storage)));
    assert_eq!(pairs(&session_one.snapshot()), pairs(&session_two.snapshot()));
    assert_eq!(session_two.total().amount, Decimal::from(1246));
}

#[test]
fn test_reload_through_the_filesystem() {
    let dir = tempfile::tempdir().unwrap();

    {
        let cart = CartStore::new(Box::new(FileStore::new(dir.path())));
        cart.add(&margherita());
        cart.set_quantity(&margherita().id, 2);
    }

    let reloaded = CartStore::new(Box::new(FileStore::new(dir.path())));
    assert_eq!(reloaded.item_count(), 2);
    assert_eq!(
        reloaded.snapshot().quantity_of(&margherita().id),
        Some(2)
    );
}

#[test]
fn test_missing_and_corrupt_storage_restore_empty() {
    let missing = CartStore::new(Box::new(MemoryStore::new()));
    assert!(missing.is_empty());

    let storage = Arc::new(MemoryStore::new());
    storage.save(keys::CART, "{\"items\": [{\"broken\":").unwrap();
    let corrupt = CartStore::new(Box::new(storage));
    assert!(corrupt.is_empty());
    assert_eq!(corrupt.total().amount, Decimal::ZERO);
}

#[test]
fn test_cart_survives_storage_outage_mid_session() {
    /// Writes succeed until the quota trips, then always fail.
    struct QuotaStore {
        inner: MemoryStore,
        writes_left: Mutex<u32>,
    }

    impl KeyValueStore for QuotaStore {
        fn load(&self, key: &str) -> Result<Option<String>, tiffin_storefront::storage::StorageError> {
            self.inner.load(key)
        }

        fn save(&self, key: &str, value: &str) -> Result<(), tiffin_storefront::storage::StorageError> {
            let mut left = self.writes_left.lock().unwrap();
            if *left == 0 {
                return Err(tiffin_storefront::storage::StorageError::Unavailable(
                    "quota exceeded".to_owned(),
                ));
            }
            *left -= 1;
            self.inner.save(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), tiffin_storefront::storage::StorageError> {
            self.inner.remove(key)
        }
    }

    let cart = CartStore::new(Box::new(QuotaStore {
        inner: MemoryStore::new(),
        writes_left: Mutex::new(1),
    }));

    cart.add(&margherita()); // persisted
    cart.add(&margherita()); // write fails, swallowed
    cart.add(&cheeseburger()); // write fails, swallowed

    // The in-memory cart stays authoritative for the session.
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.total().amount, Decimal::from(299 * 2 + 349));
}

// =============================================================================
// Subscriptions
// =============================================================================

#[test]
fn test_navbar_badge_stays_in_sync() {
    // The navbar badge subscribes once and re-renders the count on every
    // cart change, the way the host UI framework would.
    let cart = CartStore::new(Box::new(MemoryStore::new()));
    let badge = Arc::new(Mutex::new(0_u32));

    let badge_in_listener = Arc::clone(&badge);
    let _subscription = cart.subscribe(move |snapshot: &Cart| {
        *badge_in_listener.lock().unwrap() = snapshot.item_count();
    });

    cart.add(&margherita());
    cart.add(&margherita());
    cart.add(&cheeseburger());
    assert_eq!(*badge.lock().unwrap(), 3);

    cart.clear();
    assert_eq!(*badge.lock().unwrap(), 0);
}

#[test]
fn test_noop_mutations_do_not_notify() {
    let cart = CartStore::new(Box::new(MemoryStore::new()));
    let notifications = Arc::new(Mutex::new(0_u32));

    let count = Arc::clone(&notifications);
    let _subscription = cart.subscribe(move |_| {
        *count.lock().unwrap() += 1;
    });

    cart.remove(&ProductId::new("not-in-cart"));
    cart.set_quantity(&ProductId::new("not-in-cart"), 5);
    cart.clear(); // already empty

    assert_eq!(*notifications.lock().unwrap(), 0);
}

#[test]
fn test_listener_reads_back_consistent_state() {
    // A listener reading the store during notification sees the same
    // state it was handed: notifications fire after the mutation is done.
    let cart = CartStore::new(Box::new(MemoryStore::new()));
    let consistent = Arc::new(Mutex::new(true));

    let cart_in_listener = cart.clone();
    let consistent_in_listener = Arc::clone(&consistent);
    let _subscription = cart.subscribe(move |snapshot: &Cart| {
        let reread = cart_in_listener.snapshot();
        if reread != *snapshot {
            *consistent_in_listener.lock().unwrap() = false;
        }
    });

    cart.add(&margherita());
    cart.set_quantity(&margherita().id, 4);
    cart.clear();

    assert!(*consistent.lock().unwrap());
}
