//! Cart state and line item types.

use std::collections::HashSet;

use crate::cart::CartAction;
use crate::catalog::{CartProduct, ProductSnapshot, PLACEHOLDER_IMAGE};
use crate::error::CommerceError;
use crate::ids::{CartItemId, ProductId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The key that decides whether an add merges into an existing line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub product_id: ProductId,
    pub color: String,
    pub size: String,
}

impl IdentityKey {
    pub fn new(
        product_id: impl Into<ProductId>,
        color: impl Into<String>,
        size: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            color: color.into(),
            size: size.into(),
        }
    }
}

/// One chosen product variant and its quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Unique per line, assigned when the line is first created.
    pub cart_id: CartItemId,
    pub product_id: ProductId,
    /// Product title captured at add-time.
    pub title: String,
    /// Image URL captured at add-time.
    pub image: String,
    /// Unit price captured at add-time.
    pub price: Money,
    pub color: String,
    pub size: String,
    /// Always at least 1.
    pub quantity: i64,
}

impl LineItem {
    /// The `(product, color, size)` key of this line.
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(self.product_id.clone(), self.color.clone(), self.size.clone())
    }

    fn matches(&self, product_id: &ProductId, color: &str, size: &str) -> bool {
        &self.product_id == product_id && self.color == color && self.size == size
    }

    /// `price * quantity`.
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        self.price
            .try_multiply(self.quantity)
            .ok_or(CommerceError::Overflow)
    }
}

/// The line items of one browsing session.
///
/// Mutations go through [`CartState::apply`] (or the named wrappers
/// around it); a failed mutation leaves the state untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CartState {
    /// Items in insertion order.
    pub items: Vec<LineItem>,
    /// Currency every line price must be in.
    #[serde(default)]
    pub currency: Currency,
}

impl CartState {
    /// Create an empty cart priced in `currency`.
    pub fn new(currency: Currency) -> Self {
        Self {
            items: Vec::new(),
            currency,
        }
    }

    /// Apply one action in place.
    pub fn apply(&mut self, action: CartAction) -> Result<(), CommerceError> {
        match action {
            CartAction::Add {
                cart_id,
                product,
                color,
                size,
                quantity,
            } => self.add_line(cart_id, product, color, size, quantity).map(|_| ()),
            CartAction::Remove { cart_id } => {
                self.remove(&cart_id);
                Ok(())
            }
            CartAction::UpdateQuantity { cart_id, quantity } => {
                self.update_quantity(&cart_id, quantity);
                Ok(())
            }
            CartAction::Clear => {
                self.clear();
                Ok(())
            }
        }
    }

    /// Add `quantity` of a product variant.
    ///
    /// Merges into the existing line with the same identity key, otherwise
    /// appends a new line. Returns the `cart_id` of the line that holds
    /// the item afterwards.
    pub fn add(
        &mut self,
        product: CartProduct,
        color: impl Into<String>,
        size: impl Into<String>,
        quantity: i64,
    ) -> Result<CartItemId, CommerceError> {
        self.add_line(CartItemId::generate(), product, color.into(), size.into(), quantity)
    }

    /// Add a catalog product with the shopper's variant choice.
    ///
    /// Applies the product page's rule first: a product that lists sizes
    /// needs a size, one that lists colors needs a color. Then behaves
    /// like [`add`](Self::add). `resolve_image` turns the stored image
    /// path into a displayable URL.
    pub fn add_selected(
        &mut self,
        product: &ProductSnapshot,
        color: &str,
        size: &str,
        quantity: i64,
        resolve_image: impl Fn(&str) -> String,
    ) -> Result<CartItemId, CommerceError> {
        product.validate_selection(color, size)?;
        let product = product.to_cart_product(self.currency, resolve_image)?;
        self.add(product, color, size, quantity)
    }

    fn add_line(
        &mut self,
        cart_id: CartItemId,
        product: CartProduct,
        color: String,
        size: String,
        quantity: i64,
    ) -> Result<CartItemId, CommerceError> {
        if quantity < 1 {
            return Err(CommerceError::invalid(format!(
                "quantity must be at least 1, got {quantity}"
            )));
        }
        product.validate()?;
        if product.price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: product.price.currency.code().to_string(),
            });
        }

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.matches(&product.id, &color, &size))
        {
            existing.quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;
            debug!(
                cart_id = %existing.cart_id,
                product_id = %existing.product_id,
                quantity = existing.quantity,
                "merged into existing cart line"
            );
            return Ok(existing.cart_id.clone());
        }

        let item = LineItem {
            cart_id: cart_id.clone(),
            product_id: product.id,
            title: product.title,
            image: product
                .image
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            price: product.price,
            color,
            size,
            quantity,
        };
        debug!(
            cart_id = %item.cart_id,
            product_id = %item.product_id,
            quantity,
            "added cart line"
        );
        self.items.push(item);
        Ok(cart_id)
    }

    /// Remove the line with `cart_id`. Unknown ids are ignored.
    ///
    /// Returns whether a line was removed.
    pub fn remove(&mut self, cart_id: &CartItemId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.cart_id != cart_id);
        let removed = self.items.len() < len_before;
        if removed {
            debug!(%cart_id, "removed cart line");
        }
        removed
    }

    /// Set a line's quantity; `quantity <= 0` removes the line.
    ///
    /// Returns whether a line was changed or removed.
    pub fn update_quantity(&mut self, cart_id: &CartItemId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(cart_id);
        }

        match self.items.iter_mut().find(|i| &i.cart_id == cart_id) {
            Some(item) => {
                item.quantity = quantity;
                debug!(%cart_id, quantity, "updated cart line quantity");
                true
            }
            None => false,
        }
    }

    /// Quantity stepper "+".
    pub fn increment(&mut self, cart_id: &CartItemId) -> Result<bool, CommerceError> {
        match self.get(cart_id) {
            Some(item) => {
                let next = item.quantity.checked_add(1).ok_or(CommerceError::Overflow)?;
                Ok(self.update_quantity(cart_id, next))
            }
            None => Ok(false),
        }
    }

    /// Quantity stepper "-". Stepping below 1 removes the line.
    pub fn decrement(&mut self, cart_id: &CartItemId) -> bool {
        match self.get(cart_id).map(|item| item.quantity) {
            Some(quantity) => self.update_quantity(cart_id, quantity - 1),
            None => false,
        }
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.items.clear();
        debug!("cleared cart");
    }

    /// Sum of `price * quantity` over all lines.
    pub fn total(&self) -> Result<Money, CommerceError> {
        self.items.iter().try_fold(Money::zero(self.currency), |acc, item| {
            acc.try_add(&item.line_total()?).ok_or(CommerceError::Overflow)
        })
    }

    /// Sum of quantities, for the cart badge.
    pub fn item_count(&self) -> Result<i64, CommerceError> {
        self.items.iter().try_fold(0i64, |acc, item| {
            acc.checked_add(item.quantity).ok_or(CommerceError::Overflow)
        })
    }

    /// Check a cart that did not come through [`apply`](Self::apply).
    ///
    /// Every quantity must be at least 1, and no two lines may share a
    /// `cart_id` or an identity key.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let mut cart_ids = HashSet::with_capacity(self.items.len());
        let mut keys = HashSet::with_capacity(self.items.len());

        for item in &self.items {
            if item.quantity < 1 {
                return Err(CommerceError::invalid(format!(
                    "line {} has quantity {}",
                    item.cart_id, item.quantity
                )));
            }
            if !cart_ids.insert(&item.cart_id) {
                return Err(CommerceError::invalid(format!(
                    "duplicate cart line id {}",
                    item.cart_id
                )));
            }
            if !keys.insert(item.identity_key()) {
                return Err(CommerceError::invalid(format!(
                    "product {} appears twice with color '{}' and size '{}'",
                    item.product_id, item.color, item.size
                )));
            }
        }
        Ok(())
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line by its `cart_id`.
    pub fn get(&self, cart_id: &CartItemId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.cart_id == cart_id)
    }

    /// Look up a line by identity key.
    pub fn find(&self, key: &IdentityKey) -> Option<&LineItem> {
        self.items
            .iter()
            .find(|i| i.matches(&key.product_id, &key.color, &key.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: i64) -> CartProduct {
        CartProduct::new(id, format!("Product {id}"), Money::from_major(price, Currency::EGP).unwrap())
    }

    #[test]
    fn test_cart_creation() {
        let cart = CartState::default();
        assert!(cart.is_empty());
        assert_eq!(cart.total().unwrap(), Money::zero(Currency::EGP));
        assert_eq!(cart.item_count().unwrap(), 0);
    }

    #[test]
    fn test_add_same_key_merges() {
        let mut cart = CartState::default();
        let first = cart.add(product("a", 100), "Black", "M", 1).unwrap();
        let second = cart.add(product("a", 100), "Black", "M", 2).unwrap();

        assert_eq!(first, second);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items[0].quantity, 3);
        assert_eq!(cart.total().unwrap().display(), "300 EGP");
    }

    #[test]
    fn test_add_many_times_sums_quantities() {
        let mut cart = CartState::default();
        for quantity in 1..=10 {
            cart.add(product("a", 5), "Red", "S", quantity).unwrap();
        }
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items[0].quantity, 55);
    }

    #[test]
    fn test_add_different_variant_appends() {
        let mut cart = CartState::default();
        cart.add(product("a", 100), "Black", "M", 1).unwrap();
        cart.add(product("a", 100), "Black", "L", 1).unwrap();
        cart.add(product("a", 100), "White", "M", 1).unwrap();
        cart.add(product("b", 100), "Black", "M", 1).unwrap();

        assert_eq!(cart.len(), 4);
        let ids: std::collections::HashSet<_> = cart.items.iter().map(|i| &i.cart_id).collect();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_merge_keeps_add_time_price() {
        let mut cart = CartState::default();
        cart.add(product("a", 100), "", "", 1).unwrap();
        cart.add(product("a", 150), "", "", 1).unwrap();
        assert_eq!(cart.items[0].price, Money::from_major(100, Currency::EGP).unwrap());
        assert_eq!(cart.total().unwrap().display(), "200 EGP");
    }

    #[test]
    fn test_add_rejects_bad_input_without_mutation() {
        let mut cart = CartState::default();
        cart.add(product("a", 100), "", "", 1).unwrap();
        let before = cart.clone();

        assert!(matches!(
            cart.add(product("a", 100), "", "", 0),
            Err(CommerceError::InvalidArgument(_))
        ));
        assert!(matches!(
            cart.add(product("a", 100), "", "", -3),
            Err(CommerceError::InvalidArgument(_))
        ));
        assert!(matches!(
            cart.add(product("", 100), "", "", 1),
            Err(CommerceError::InvalidArgument(_))
        ));
        let usd = CartProduct::new("c", "Imported", Money::new(100, Currency::USD));
        assert!(matches!(
            cart.add(usd, "", "", 1),
            Err(CommerceError::CurrencyMismatch { .. })
        ));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_add_overflow_leaves_quantity() {
        let mut cart = CartState::default();
        cart.add(product("a", 1), "", "", i64::MAX).unwrap();
        assert_eq!(cart.add(product("a", 1), "", "", 1), Err(CommerceError::Overflow));
        assert_eq!(cart.items[0].quantity, i64::MAX);
    }

    #[test]
    fn test_missing_image_uses_placeholder() {
        let mut cart = CartState::default();
        cart.add(product("a", 1), "", "", 1).unwrap();
        cart.add(product("b", 1).with_image("http://img/b.jpg"), "", "", 1).unwrap();
        assert_eq!(cart.items[0].image, PLACEHOLDER_IMAGE);
        assert_eq!(cart.items[1].image, "http://img/b.jpg");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = CartState::default();
        let id = cart.add(product("a", 100), "", "", 1).unwrap();
        cart.add(product("b", 100), "", "", 1).unwrap();

        assert!(cart.remove(&id));
        let once = cart.clone();
        assert!(!cart.remove(&id));
        assert_eq!(cart, once);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_update_quantity_to_zero_or_negative_removes() {
        for quantity in [0, -1] {
            let mut cart = CartState::default();
            let id = cart.add(product("a", 100), "", "", 2).unwrap();
            assert!(cart.update_quantity(&id, quantity));
            assert!(cart.is_empty());
            assert_eq!(cart.item_count().unwrap(), 0);
        }
    }

    #[test]
    fn test_update_quantity_replaces() {
        let mut cart = CartState::default();
        let id = cart.add(product("a", 100), "", "", 2).unwrap();
        assert!(cart.update_quantity(&id, 7));
        assert_eq!(cart.item_count().unwrap(), 7);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut cart = CartState::default();
        cart.add(product("a", 100), "", "", 2).unwrap();
        let before = cart.clone();
        assert!(!cart.update_quantity(&CartItemId::new("missing"), 5));
        assert!(!cart.update_quantity(&CartItemId::new(""), 0));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_steppers() {
        let mut cart = CartState::default();
        let id = cart.add(product("a", 100), "", "", 1).unwrap();

        assert!(cart.increment(&id).unwrap());
        assert_eq!(cart.get(&id).unwrap().quantity, 2);
        assert!(cart.decrement(&id));
        assert!(cart.decrement(&id));
        assert!(cart.is_empty());
        assert!(!cart.decrement(&id));
        assert!(!cart.increment(&id).unwrap());
    }

    #[test]
    fn test_clear() {
        let mut cart = CartState::default();
        cart.add(product("a", 100), "", "", 2).unwrap();
        cart.add(product("b", 40), "", "", 1).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.total().unwrap().is_zero());
    }

    #[test]
    fn test_total_and_item_count() {
        let mut cart = CartState::default();
        cart.add(product("a", 100), "", "", 2).unwrap();
        cart.add(product("b", 40), "", "", 3).unwrap();
        cart.add(
            CartProduct::new("c", "Sticker", Money::new(1250, Currency::EGP)),
            "",
            "",
            1,
        )
        .unwrap();

        assert_eq!(cart.total().unwrap().amount_minor, 20_000 + 12_000 + 1_250);
        assert_eq!(cart.item_count().unwrap(), 6);
    }

    #[test]
    fn test_item_count_overflow_is_an_error() {
        let mut cart = CartState::default();
        cart.add(product("free", 0), "", "", i64::MAX).unwrap();
        cart.add(product("b", 10), "", "", 1).unwrap();

        assert_eq!(cart.item_count(), Err(CommerceError::Overflow));
        assert!(cart.total().is_ok());
    }

    fn hoodie_snapshot() -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::new("p1"),
            name: "Hoodie".into(),
            sale_price: 349.5,
            images: vec!["/uploads/h.jpg".into()],
            colors: vec!["Black".into(), "White".into()],
            sizes: vec!["M".into(), "L".into()],
        }
    }

    #[test]
    fn test_add_selected_requires_listed_variants() {
        let mut cart = CartState::default();
        cart.add(product("a", 100), "", "", 1).unwrap();
        let before = cart.clone();
        let resolve = |path: &str| format!("http://cdn.test{path}");

        assert_eq!(
            cart.add_selected(&hoodie_snapshot(), "Black", "", 1, resolve),
            Err(CommerceError::invalid("please select a size"))
        );
        assert_eq!(
            cart.add_selected(&hoodie_snapshot(), " ", "M", 1, resolve),
            Err(CommerceError::invalid("please select a color"))
        );
        assert_eq!(cart, before);
    }

    #[test]
    fn test_add_selected_snapshots_catalog_fields() {
        let mut cart = CartState::default();
        let resolve = |path: &str| format!("http://cdn.test{path}");

        let first = cart.add_selected(&hoodie_snapshot(), "Black", "M", 1, resolve).unwrap();
        let second = cart.add_selected(&hoodie_snapshot(), "Black", "M", 2, resolve).unwrap();

        assert_eq!(first, second);
        let line = cart.get(&first).unwrap();
        assert_eq!(line.title, "Hoodie");
        assert_eq!(line.price.amount_minor, 34_950);
        assert_eq!(line.image, "http://cdn.test/uploads/h.jpg");
        assert_eq!(line.quantity, 3);

        let plain = ProductSnapshot {
            colors: vec![],
            sizes: vec![],
            images: vec![],
            ..hoodie_snapshot()
        };
        cart.add_selected(&plain, "", "", 1, resolve).unwrap();
        assert_eq!(cart.items[1].image, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_validate_rejects_broken_invariants() {
        let mut cart = CartState::default();
        cart.add(product("a", 100), "Black", "M", 1).unwrap();
        cart.add(product("b", 100), "", "", 1).unwrap();
        assert!(cart.validate().is_ok());

        let mut zero = cart.clone();
        zero.items[0].quantity = 0;
        assert!(matches!(zero.validate(), Err(CommerceError::InvalidArgument(_))));

        let mut duplicate_key = cart.clone();
        duplicate_key.items[1].product_id = ProductId::new("a");
        duplicate_key.items[1].color = "Black".into();
        duplicate_key.items[1].size = "M".into();
        assert!(matches!(duplicate_key.validate(), Err(CommerceError::InvalidArgument(_))));

        let mut duplicate_id = cart;
        duplicate_id.items[1].cart_id = duplicate_id.items[0].cart_id.clone();
        assert!(matches!(duplicate_id.validate(), Err(CommerceError::InvalidArgument(_))));
    }

    #[test]
    fn test_find_by_identity_key() {
        let mut cart = CartState::default();
        let id = cart.add(product("a", 100), "Black", "M", 1).unwrap();
        let found = cart.find(&IdentityKey::new("a", "Black", "M")).unwrap();
        assert_eq!(found.cart_id, id);
        assert_eq!(found.identity_key(), IdentityKey::new("a", "Black", "M"));
        assert!(cart.find(&IdentityKey::new("a", "Black", "L")).is_none());
    }
}
