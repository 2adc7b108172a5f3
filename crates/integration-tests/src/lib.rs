//! Integration tests for Tiffin.
//!
//! Cross-crate scenario tests driving the storefront the way the screens
//! do: cart sessions over shared storage, address book round-trips, and
//! the full checkout-to-delivery order flow.
//!
//! This library holds the shared fixtures; the scenarios live in `tests/`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::Utc;

use tiffin_core::{CurrencyCode, Email, Price, ProductId, UserId};
use tiffin_storefront::account::{AddressDraft, AddressLabel, CurrentUser};
use tiffin_storefront::catalog::Product;

/// A catalog product fixture.
#[must_use]
pub fn product(id: &str, name: &str, price: i64, category: &str) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        description: format!("{name} from the demo menu."),
        price: Price::from_major_units(price, CurrencyCode::INR),
        category: category.to_owned(),
        image_url: format!("https://images.tiffin.example/{id}.jpg"),
        created_at: Utc::now(),
    }
}

/// The demo menu's pizza at 299.
#[must_use]
pub fn margherita() -> Product {
    product("margherita-pizza", "Margherita Pizza", 299, "Pizza")
}

/// The demo menu's burger at 349.
#[must_use]
pub fn cheeseburger() -> Product {
    product("double-cheeseburger", "Double Cheeseburger", 349, "Burgers")
}

/// A complete, valid address draft.
#[must_use]
pub fn address_draft(city: &str, is_default: bool) -> AddressDraft {
    AddressDraft {
        label: AddressLabel::Home,
        house_number: "42A".to_owned(),
        area: "MG Road".to_owned(),
        city: city.to_owned(),
        pincode: "560001".to_owned(),
        state: "Karnataka".to_owned(),
        country: "India".to_owned(),
        is_default,
    }
}

/// A signed-in shopper.
///
/// # Panics
///
/// Panics if the fixture email stops parsing, which would be a test bug.
#[must_use]
pub fn shopper() -> CurrentUser {
    let email = Email::parse("shopper@example.com").expect("fixture email is valid");
    CurrentUser::shopper(UserId::new("user-1"), email)
}
