//! CLI command implementations.

pub mod address;
pub mod cart;
pub mod checkout;
pub mod menu;
pub mod orders;
pub mod seed;
