//! Address book management.

use tiffin_core::AddressId;
use tiffin_storefront::account::{Address, AddressBook, AddressDraft};
use tiffin_storefront::storage::FileStore;

/// Save a new address.
///
/// # Errors
///
/// Returns an error if a required field is empty or storage fails.
pub fn add(store: &FileStore, draft: AddressDraft) -> tiffin_storefront::Result<()> {
    let mut book = AddressBook::load_from(store)?;
    let id = book.add(draft)?;
    book.save_to(store)?;

    if let Some(address) = book.get(&id) {
        print_address(address);
    }
    Ok(())
}

/// List saved addresses.
///
/// # Errors
///
/// Returns an error if the address book cannot be read.
pub fn list(store: &FileStore) -> tiffin_storefront::Result<()> {
    let book = AddressBook::load_from(store)?;
    if book.is_empty() {
        println!("No addresses saved yet.");
        return Ok(());
    }
    for address in book.addresses() {
        print_address(address);
    }
    Ok(())
}

/// Make an address the default.
///
/// # Errors
///
/// Returns an error for an unknown ID or a storage failure.
pub fn set_default(store: &FileStore, address_id: &str) -> tiffin_storefront::Result<()> {
    let mut book = AddressBook::load_from(store)?;
    book.set_default(&AddressId::new(address_id))?;
    book.save_to(store)?;
    println!("Default address updated.");
    Ok(())
}

/// Delete an address.
///
/// # Errors
///
/// Returns an error for an unknown ID or a storage failure.
pub fn remove(store: &FileStore, address_id: &str) -> tiffin_storefront::Result<()> {
    let mut book = AddressBook::load_from(store)?;
    book.remove(&AddressId::new(address_id))?;
    book.save_to(store)?;
    println!("Address deleted.");
    Ok(())
}

fn print_address(address: &Address) {
    let marker = if address.is_default { " [default]" } else { "" };
    println!("{} ({}){marker}", address.id, address.label);
    println!("  {}, {}", address.house_number, address.area);
    println!(
        "  {}, {} - {}, {}",
        address.city, address.state, address.pincode, address.country
    );
}
