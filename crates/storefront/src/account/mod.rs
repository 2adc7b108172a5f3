//! User-facing account data: identity and saved addresses.

pub mod addresses;

pub use addresses::{Address, AddressBook, AddressDraft, AddressError, AddressLabel};

use serde::{Deserialize, Serialize};

use tiffin_core::{Email, UserId, UserRole};

/// The signed-in user as the storefront sees them.
///
/// Authentication itself is an external collaborator; this is the minimal
/// identity checkout needs to stamp onto an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
    pub display_name: Option<String>,
    pub role: UserRole,
}

impl CurrentUser {
    /// A regular shopper.
    #[must_use]
    pub fn shopper(id: UserId, email: Email) -> Self {
        Self {
            id,
            email,
            display_name: None,
            role: UserRole::User,
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shopper_is_not_admin() {
        let user = CurrentUser::shopper(
            UserId::new("u1"),
            Email::parse("user@example.com").unwrap(),
        );
        assert!(!user.is_admin());
    }
}
