//! Product snapshot read from the catalog service.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Image shown for products that have none.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder-image.jpg";

/// The catalog fields the cart reads when a product is added.
///
/// Field names follow the catalog service's JSON; anything else the
/// service returns is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    /// Sale price in major units as the catalog stores it.
    pub sale_price: f64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
}

impl ProductSnapshot {
    /// Check the shopper's variant choice against what the product offers.
    ///
    /// A product that lists sizes needs a size, one that lists colors
    /// needs a color. Products without variants accept empty strings.
    pub fn validate_selection(&self, color: &str, size: &str) -> Result<(), CommerceError> {
        if !self.sizes.is_empty() && size.trim().is_empty() {
            return Err(CommerceError::invalid("please select a size"));
        }
        if !self.colors.is_empty() && color.trim().is_empty() {
            return Err(CommerceError::invalid("please select a color"));
        }
        Ok(())
    }

    /// First usable image path, if any.
    ///
    /// The admin upload form has been known to store the literal string
    /// `"undefined"`; that counts as no image.
    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .first()
            .map(String::as_str)
            .filter(|path| !path.is_empty() && *path != "undefined")
    }

    /// Freeze the snapshot into the fields a cart line captures.
    ///
    /// `resolve_image` turns a stored image path into a displayable URL.
    pub fn to_cart_product(
        &self,
        currency: Currency,
        resolve_image: impl Fn(&str) -> String,
    ) -> Result<CartProduct, CommerceError> {
        let price = Money::from_decimal(self.sale_price, currency).ok_or_else(|| {
            CommerceError::invalid(format!("unrepresentable price {}", self.sale_price))
        })?;
        let product = CartProduct {
            id: self.id.clone(),
            title: self.name.clone(),
            price,
            image: Some(
                self.primary_image()
                    .map(&resolve_image)
                    .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            ),
        };
        product.validate()?;
        Ok(product)
    }
}

/// What the cart needs to know about a product to add it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartProduct {
    pub id: ProductId,
    pub title: String,
    pub price: Money,
    pub image: Option<String>,
}

impl CartProduct {
    /// Create a product without an image.
    pub fn new(id: impl Into<ProductId>, title: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            image: None,
        }
    }

    /// Attach an image URL.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Reject products the cart cannot hold.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.id.is_empty() {
            return Err(CommerceError::invalid("product id is required"));
        }
        if self.title.trim().is_empty() {
            return Err(CommerceError::invalid("product title is required"));
        }
        if self.price.is_negative() {
            return Err(CommerceError::invalid(format!(
                "price must not be negative, got {}",
                self.price
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(json: &str) -> ProductSnapshot {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_snapshot_parses_catalog_json() {
        let product = snapshot(
            r#"{"_id":"p1","name":"Hoodie","salePrice":350,"originalPrice":500,
                "images":["/uploads/a.jpg"],"colors":["Black"],"sizes":["M","L"],
                "category":"hoodies"}"#,
        );
        assert_eq!(product.id.as_str(), "p1");
        assert_eq!(product.sale_price, 350.0);
        assert_eq!(product.sizes, vec!["M", "L"]);
    }

    #[test]
    fn test_snapshot_defaults_missing_lists() {
        let product = snapshot(r#"{"_id":"p1","name":"Mug","salePrice":80}"#);
        assert!(product.images.is_empty());
        assert!(product.validate_selection("", "").is_ok());
    }

    #[test]
    fn test_selection_requires_listed_variants() {
        let product = snapshot(
            r#"{"_id":"p1","name":"Tee","salePrice":100,"colors":["Black"],"sizes":["M"]}"#,
        );
        assert!(matches!(
            product.validate_selection("Black", ""),
            Err(CommerceError::InvalidArgument(_))
        ));
        assert!(matches!(
            product.validate_selection("", "M"),
            Err(CommerceError::InvalidArgument(_))
        ));
        assert!(product.validate_selection("Black", "M").is_ok());
    }

    #[test]
    fn test_to_cart_product_resolves_first_image() {
        let product = snapshot(
            r#"{"_id":"p1","name":"Tee","salePrice":99.5,"images":["/uploads/t.jpg","/uploads/u.jpg"]}"#,
        );
        let cart_product = product
            .to_cart_product(Currency::EGP, |path| format!("http://cdn{path}"))
            .unwrap();
        assert_eq!(cart_product.price.amount_minor, 9950);
        assert_eq!(cart_product.image.as_deref(), Some("http://cdn/uploads/t.jpg"));
    }

    #[test]
    fn test_to_cart_product_uses_placeholder() {
        let no_images = snapshot(r#"{"_id":"p1","name":"Tee","salePrice":100}"#);
        let undefined = snapshot(r#"{"_id":"p1","name":"Tee","salePrice":100,"images":["undefined"]}"#);

        for product in [no_images, undefined] {
            let cart_product = product
                .to_cart_product(Currency::EGP, |path| path.to_string())
                .unwrap();
            assert_eq!(cart_product.image.as_deref(), Some(PLACEHOLDER_IMAGE));
        }
    }

    #[test]
    fn test_to_cart_product_rejects_negative_price() {
        let product = snapshot(r#"{"_id":"p1","name":"Tee","salePrice":-1}"#);
        assert!(product.to_cart_product(Currency::EGP, |p| p.to_string()).is_err());
    }

    #[test]
    fn test_cart_product_validation() {
        let price = Money::from_major(100, Currency::EGP).unwrap();
        assert!(CartProduct::new("", "Tee", price).validate().is_err());
        assert!(CartProduct::new("p1", " ", price).validate().is_err());
        assert!(CartProduct::new("p1", "Tee", price).validate().is_ok());
    }
}
