//! Admin-side input validation for catalog entries.
//!
//! The back-office forms submit free text; drafts turn that text into
//! well-formed catalog values before anything reaches the write path.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use tiffin_core::{CategoryId, CurrencyCode, Price, ProductId};

use super::media::convert_google_drive_link;
use super::{Category, Product};

/// Validation failures for catalog drafts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("name is required")]
    EmptyName,

    #[error("category is required")]
    EmptyCategory,

    #[error("an image URL is required")]
    EmptyImageUrl,

    #[error("price is not a valid amount: {0}")]
    InvalidPrice(String),

    #[error("price cannot be negative")]
    NegativePrice,
}

/// A new or edited product as entered in the admin form.
///
/// `price` is the raw form string; validation parses it into decimal.
#[derive(Debug, Clone, Default)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub image_url: String,
}

impl ProductDraft {
    /// Validate the draft into a [`NewProduct`].
    ///
    /// Google Drive share links in the image URL are rewritten to
    /// direct-content URLs.
    ///
    /// # Errors
    ///
    /// Returns a [`DraftError`] for an empty name, empty category, empty
    /// image URL, or a price that does not parse to a non-negative decimal.
    pub fn validate(self, currency: CurrencyCode) -> Result<NewProduct, DraftError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(DraftError::EmptyName);
        }

        let category = self.category.trim().to_owned();
        if category.is_empty() {
            return Err(DraftError::EmptyCategory);
        }

        let image_url = self.image_url.trim();
        if image_url.is_empty() {
            return Err(DraftError::EmptyImageUrl);
        }

        let amount: Decimal = self
            .price
            .trim()
            .parse()
            .map_err(|_| DraftError::InvalidPrice(self.price.clone()))?;
        let price = Price::new(amount, currency);
        if price.is_negative() {
            return Err(DraftError::NegativePrice);
        }

        Ok(NewProduct {
            name,
            description: self.description.trim().to_owned(),
            price,
            category,
            image_url: convert_google_drive_link(image_url),
        })
    }
}

/// A validated product awaiting an identifier and timestamp from the
/// catalog write path.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub image_url: String,
}

impl NewProduct {
    /// Attach identity and creation time, producing a catalog [`Product`].
    #[must_use]
    pub fn into_product(self, id: ProductId, created_at: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            image_url: self.image_url,
            created_at,
        }
    }
}

/// A new category as entered in the admin form.
#[derive(Debug, Clone, Default)]
pub struct CategoryDraft {
    pub name: String,
}

impl CategoryDraft {
    /// Validate the draft into a [`Category`] with a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::EmptyName`] if the trimmed name is empty.
    pub fn validate(self) -> Result<Category, DraftError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(DraftError::EmptyName);
        }
        Ok(Category {
            id: CategoryId::generate(),
            name,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Masala Dosa".to_owned(),
            description: "Crisp rice crepe with spiced potato filling.".to_owned(),
            price: "149".to_owned(),
            category: "South Indian".to_owned(),
            image_url: "https://images.example.com/dosa.jpg".to_owned(),
        }
    }

    #[test]
    fn test_valid_draft() {
        let new = draft().validate(CurrencyCode::INR).unwrap();
        assert_eq!(new.name, "Masala Dosa");
        assert_eq!(new.price, Price::from_major_units(149, CurrencyCode::INR));
    }

    #[test]
    fn test_name_is_trimmed_and_required() {
        let mut d = draft();
        d.name = "  ".to_owned();
        assert_eq!(d.validate(CurrencyCode::INR), Err(DraftError::EmptyName));
    }

    #[test]
    fn test_category_required() {
        let mut d = draft();
        d.category = String::new();
        assert_eq!(d.validate(CurrencyCode::INR), Err(DraftError::EmptyCategory));
    }

    #[test]
    fn test_image_url_required() {
        let mut d = draft();
        d.image_url = String::new();
        assert_eq!(d.validate(CurrencyCode::INR), Err(DraftError::EmptyImageUrl));
    }

    #[test]
    fn test_price_must_parse() {
        let mut d = draft();
        d.price = "cheap".to_owned();
        assert!(matches!(
            d.validate(CurrencyCode::INR),
            Err(DraftError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_price_must_be_non_negative() {
        let mut d = draft();
        d.price = "-5".to_owned();
        assert_eq!(d.validate(CurrencyCode::INR), Err(DraftError::NegativePrice));
    }

    #[test]
    fn test_decimal_price_accepted() {
        let mut d = draft();
        d.price = "149.50".to_owned();
        let new = d.validate(CurrencyCode::INR).unwrap();
        assert_eq!(new.price.amount, Decimal::new(14950, 2));
    }

    #[test]
    fn test_drive_link_rewritten_during_validation() {
        let mut d = draft();
        d.image_url = "https://drive.google.com/file/d/xYz-9/view".to_owned();
        let new = d.validate(CurrencyCode::INR).unwrap();
        assert_eq!(new.image_url, "https://lh3.googleusercontent.com/d/xYz-9");
    }

    #[test]
    fn test_into_product() {
        let new = draft().validate(CurrencyCode::INR).unwrap();
        let product = new.into_product(ProductId::new("dosa-1"), Utc::now());
        assert_eq!(product.id.as_str(), "dosa-1");
        assert_eq!(product.category, "South Indian");
    }

    #[test]
    fn test_category_draft() {
        let category = CategoryDraft {
            name: "  Desserts ".to_owned(),
        }
        .validate()
        .unwrap();
        assert_eq!(category.name, "Desserts");
        assert!(!category.id.is_empty());
    }

    #[test]
    fn test_category_draft_empty() {
        let result = CategoryDraft { name: String::new() }.validate();
        assert_eq!(result.unwrap_err(), DraftError::EmptyName);
    }
}
