//! Typed cart actions and the pure reducer over them.

use crate::cart::CartState;
use crate::catalog::CartProduct;
use crate::error::CommerceError;
use crate::ids::CartItemId;

/// A mutation a display layer can request.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Add a product variant; `cart_id` is used only if a new line is created.
    Add {
        cart_id: CartItemId,
        product: CartProduct,
        color: String,
        size: String,
        quantity: i64,
    },
    /// Remove a line. Unknown ids are ignored.
    Remove { cart_id: CartItemId },
    /// Set a line's quantity; `<= 0` removes it.
    UpdateQuantity { cart_id: CartItemId, quantity: i64 },
    /// Empty the cart.
    Clear,
}

impl CartAction {
    /// Build an add action with a freshly generated line id.
    pub fn add(
        product: CartProduct,
        color: impl Into<String>,
        size: impl Into<String>,
        quantity: i64,
    ) -> Self {
        CartAction::Add {
            cart_id: CartItemId::generate(),
            product,
            color: color.into(),
            size: size.into(),
            quantity,
        }
    }

    pub fn remove(cart_id: impl Into<CartItemId>) -> Self {
        CartAction::Remove {
            cart_id: cart_id.into(),
        }
    }

    pub fn update_quantity(cart_id: impl Into<CartItemId>, quantity: i64) -> Self {
        CartAction::UpdateQuantity {
            cart_id: cart_id.into(),
            quantity,
        }
    }
}

/// `(old state, action) -> new state`. The input state is never modified.
pub fn reduce(state: &CartState, action: CartAction) -> Result<CartState, CommerceError> {
    let mut next = state.clone();
    next.apply(action)?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Money};

    fn tee() -> CartProduct {
        CartProduct::new("a", "Tee", Money::from_major(100, Currency::EGP).unwrap())
    }

    #[test]
    fn test_reduce_does_not_touch_input() {
        let empty = CartState::default();
        let one = reduce(&empty, CartAction::add(tee(), "Black", "M", 1)).unwrap();
        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn test_reduce_scenario() {
        let state = CartState::default();
        let state = reduce(&state, CartAction::add(tee(), "Black", "M", 1)).unwrap();
        let state = reduce(&state, CartAction::add(tee(), "Black", "M", 2)).unwrap();
        assert_eq!(state.len(), 1);
        assert_eq!(state.items[0].quantity, 3);
        assert_eq!(state.total().unwrap(), Money::from_major(300, Currency::EGP).unwrap());

        let id = state.items[0].cart_id.clone();
        let state = reduce(&state, CartAction::update_quantity(id.clone(), 0)).unwrap();
        assert!(state.is_empty());
        assert_eq!(state.item_count().unwrap(), 0);

        let again = reduce(&state, CartAction::remove(id)).unwrap();
        assert_eq!(again, state);
    }

    #[test]
    fn test_reduce_add_uses_action_id_for_new_line() {
        let action = CartAction::Add {
            cart_id: CartItemId::new("line-1"),
            product: tee(),
            color: String::new(),
            size: String::new(),
            quantity: 1,
        };
        let state = reduce(&CartState::default(), action).unwrap();
        assert_eq!(state.items[0].cart_id.as_str(), "line-1");
    }

    #[test]
    fn test_reduce_error_returns_no_state() {
        let state = reduce(&CartState::default(), CartAction::add(tee(), "", "", 1)).unwrap();
        let result = reduce(&state, CartAction::add(tee(), "", "", 0));
        assert!(matches!(result, Err(CommerceError::InvalidArgument(_))));
        assert_eq!(state.items[0].quantity, 1);
    }

    #[test]
    fn test_reduce_clear() {
        let state = reduce(&CartState::default(), CartAction::add(tee(), "", "", 4)).unwrap();
        let cleared = reduce(&state, CartAction::Clear).unwrap();
        assert!(cleared.is_empty());
        assert!(cleared.total().unwrap().is_zero());
    }
}
