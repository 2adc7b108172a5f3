//! Saved delivery addresses.
//!
//! The address book keeps at most one default address. The first address a
//! user saves becomes the default automatically; checkout pre-selects it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tiffin_core::AddressId;

use crate::storage::{KeyValueStore, StorageError, keys};

/// Short label shown on the address card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AddressLabel {
    #[default]
    Home,
    Work,
    Other,
}

impl std::fmt::Display for AddressLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Home => write!(f, "Home"),
            Self::Work => write!(f, "Work"),
            Self::Other => write!(f, "Other"),
        }
    }
}

impl std::str::FromStr for AddressLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "home" => Ok(Self::Home),
            "work" => Ok(Self::Work),
            "other" => Ok(Self::Other),
            _ => Err(format!("invalid address label: {s}")),
        }
    }
}

/// A saved delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub label: AddressLabel,
    pub house_number: String,
    pub area: String,
    pub city: String,
    pub pincode: String,
    pub state: String,
    pub country: String,
    /// Pre-selected at checkout. At most one address is default.
    pub is_default: bool,
}

/// Address book operation errors.
#[derive(Debug, Error)]
pub enum AddressError {
    /// A required field was empty.
    #[error("address field `{0}` is required")]
    MissingField(&'static str),

    /// The referenced address does not exist.
    #[error("address not found: {0}")]
    NotFound(AddressId),

    /// The persisted address book could not be read or written.
    #[error("address storage error: {0}")]
    Storage(#[from] StorageError),

    /// The persisted address book is not valid JSON.
    #[error("address data is corrupt: {0}")]
    Corrupt(String),
}

/// Form input for a new or edited address.
#[derive(Debug, Clone, Default)]
pub struct AddressDraft {
    pub label: AddressLabel,
    pub house_number: String,
    pub area: String,
    pub city: String,
    pub pincode: String,
    pub state: String,
    pub country: String,
    pub is_default: bool,
}

impl AddressDraft {
    fn validate(&self) -> Result<(), AddressError> {
        for (name, value) in [
            ("house_number", &self.house_number),
            ("area", &self.area),
            ("city", &self.city),
            ("pincode", &self.pincode),
            ("state", &self.state),
            ("country", &self.country),
        ] {
            if value.trim().is_empty() {
                return Err(AddressError::MissingField(name));
            }
        }
        Ok(())
    }
}

/// A user's saved addresses with default selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressBook {
    addresses: Vec<Address>,
}

impl AddressBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All addresses in insertion order.
    #[must_use]
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Look up an address by ID.
    #[must_use]
    pub fn get(&self, id: &AddressId) -> Option<&Address> {
        self.addresses.iter().find(|a| a.id == *id)
    }

    /// The address flagged for pre-selection at checkout, if any.
    ///
    /// Removing the default address leaves the book with no default until
    /// one is chosen again.
    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|a| a.is_default)
    }

    /// Save a new address.
    ///
    /// The first address saved becomes the default regardless of the
    /// draft's flag; a draft flagged default unsets every other default.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::MissingField`] if a required field is empty.
    pub fn add(&mut self, draft: AddressDraft) -> Result<AddressId, AddressError> {
        draft.validate()?;

        let is_default = self.addresses.is_empty() || draft.is_default;
        if is_default {
            self.clear_defaults();
        }

        let id = AddressId::generate();
        self.addresses.push(Address {
            id: id.clone(),
            label: draft.label,
            house_number: draft.house_number.trim().to_owned(),
            area: draft.area.trim().to_owned(),
            city: draft.city.trim().to_owned(),
            pincode: draft.pincode.trim().to_owned(),
            state: draft.state.trim().to_owned(),
            country: draft.country.trim().to_owned(),
            is_default,
        });
        Ok(id)
    }

    /// Replace the fields of an existing address.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::NotFound`] for an unknown ID or
    /// [`AddressError::MissingField`] if a required field is empty.
    pub fn update(&mut self, id: &AddressId, draft: AddressDraft) -> Result<(), AddressError> {
        draft.validate()?;

        if self.get(id).is_none() {
            return Err(AddressError::NotFound(id.clone()));
        }
        if draft.is_default {
            self.clear_defaults();
        }

        // The lookup above guarantees the entry exists.
        if let Some(address) = self.addresses.iter_mut().find(|a| a.id == *id) {
            address.label = draft.label;
            address.house_number = draft.house_number.trim().to_owned();
            address.area = draft.area.trim().to_owned();
            address.city = draft.city.trim().to_owned();
            address.pincode = draft.pincode.trim().to_owned();
            address.state = draft.state.trim().to_owned();
            address.country = draft.country.trim().to_owned();
            address.is_default = draft.is_default;
        }
        Ok(())
    }

    /// Delete an address.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::NotFound`] for an unknown ID.
    pub fn remove(&mut self, id: &AddressId) -> Result<(), AddressError> {
        let before = self.addresses.len();
        self.addresses.retain(|a| a.id != *id);
        if self.addresses.len() == before {
            return Err(AddressError::NotFound(id.clone()));
        }
        Ok(())
    }

    /// Make exactly one address the default.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::NotFound`] for an unknown ID; the current
    /// default is left untouched in that case.
    pub fn set_default(&mut self, id: &AddressId) -> Result<(), AddressError> {
        if self.get(id).is_none() {
            return Err(AddressError::NotFound(id.clone()));
        }
        for address in &mut self.addresses {
            address.is_default = address.id == *id;
        }
        Ok(())
    }

    /// Restore the address book from local storage. A missing key is an
    /// empty book.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the data is corrupt;
    /// addresses are user data and are never silently dropped.
    pub fn load_from(store: &dyn KeyValueStore) -> Result<Self, AddressError> {
        match store.load(keys::ADDRESSES)? {
            None => Ok(Self::new()),
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|e| AddressError::Corrupt(e.to_string()))
            }
        }
    }

    /// Persist the address book to local storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the underlying write fails.
    pub fn save_to(&self, store: &dyn KeyValueStore) -> Result<(), AddressError> {
        let raw =
            serde_json::to_string(self).map_err(|e| AddressError::Corrupt(e.to_string()))?;
        store.save(keys::ADDRESSES, &raw)?;
        Ok(())
    }

    fn clear_defaults(&mut self) {
        for address in &mut self.addresses {
            address.is_default = false;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::storage::MemoryStore;

    use super::*;

    fn draft(city: &str, is_default: bool) -> AddressDraft {
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

    #[test]
    fn test_first_address_becomes_default() {
        let mut book = AddressBook::new();
        let id = book.add(draft("Bengaluru", false)).unwrap();
        assert_eq!(book.default_address().map(|a| a.id.clone()), Some(id));
    }

    #[test]
    fn test_at_most_one_default() {
        let mut book = AddressBook::new();
        book.add(draft("Bengaluru", false)).unwrap();
        let second = book.add(draft("Mumbai", true)).unwrap();

        let defaults: Vec<&Address> =
            book.addresses().iter().filter(|a| a.is_default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, second);
    }

    #[test]
    fn test_non_default_add_keeps_existing_default() {
        let mut book = AddressBook::new();
        let first = book.add(draft("Bengaluru", false)).unwrap();
        book.add(draft("Mumbai", false)).unwrap();
        assert_eq!(book.default_address().map(|a| a.id.clone()), Some(first));
    }

    #[test]
    fn test_set_default_switches_exclusively() {
        let mut book = AddressBook::new();
        let first = book.add(draft("Bengaluru", false)).unwrap();
        let second = book.add(draft("Mumbai", false)).unwrap();

        book.set_default(&second).unwrap();
        assert!(!book.get(&first).unwrap().is_default);
        assert!(book.get(&second).unwrap().is_default);
    }

    #[test]
    fn test_set_default_unknown_id_keeps_current_default() {
        let mut book = AddressBook::new();
        let first = book.add(draft("Bengaluru", false)).unwrap();

        let result = book.set_default(&AddressId::new("ghost"));
        assert!(matches!(result, Err(AddressError::NotFound(_))));
        assert_eq!(book.default_address().map(|a| a.id.clone()), Some(first));
    }

    #[test]
    fn test_remove_default_leaves_no_default() {
        let mut book = AddressBook::new();
        let first = book.add(draft("Bengaluru", false)).unwrap();
        book.add(draft("Mumbai", false)).unwrap();

        book.remove(&first).unwrap();
        assert!(book.default_address().is_none());
        assert_eq!(book.addresses().len(), 1);
    }

    #[test]
    fn test_remove_unknown_id() {
        let mut book = AddressBook::new();
        assert!(matches!(
            book.remove(&AddressId::new("ghost")),
            Err(AddressError::NotFound(_))
        ));
    }

    #[test]
    fn test_update_can_promote_to_default() {
        let mut book = AddressBook::new();
        let first = book.add(draft("Bengaluru", false)).unwrap();
        let second = book.add(draft("Mumbai", false)).unwrap();

        book.update(&second, draft("Mumbai", true)).unwrap();
        assert!(!book.get(&first).unwrap().is_default);
        assert!(book.get(&second).unwrap().is_default);
    }

    #[test]
    fn test_missing_fields_rejected() {
        let mut book = AddressBook::new();
        let mut bad = draft("Bengaluru", false);
        bad.pincode = "  ".to_owned();
        assert!(matches!(
            book.add(bad),
            Err(AddressError::MissingField("pincode"))
        ));
        assert!(book.is_empty());
    }

    #[test]
    fn test_storage_roundtrip() {
        let store = MemoryStore::new();

        let mut book = AddressBook::new();
        book.add(draft("Bengaluru", false)).unwrap();
        book.add(draft("Mumbai", true)).unwrap();
        book.save_to(&store).unwrap();

        let loaded = AddressBook::load_from(&store).unwrap();
        assert_eq!(loaded.addresses().len(), 2);
        assert_eq!(
            loaded.default_address().map(|a| a.city.clone()),
            Some("Mumbai".to_owned())
        );
    }

    #[test]
    fn test_load_missing_is_empty_book() {
        let store = MemoryStore::new();
        let book = AddressBook::load_from(&store).unwrap();
        assert!(book.is_empty());
    }

    #[test]
    fn test_load_corrupt_is_an_error() {
        let store = MemoryStore::new();
        store.save(keys::ADDRESSES, "{broken").unwrap();
        assert!(matches!(
            AddressBook::load_from(&store),
            Err(AddressError::Corrupt(_))
        ));
    }

    #[test]
    fn test_label_parse() {
        assert_eq!("home".parse::<AddressLabel>().unwrap(), AddressLabel::Home);
        assert_eq!("Work".parse::<AddressLabel>().unwrap(), AddressLabel::Work);
        assert!("office".parse::<AddressLabel>().is_err());
    }
}
