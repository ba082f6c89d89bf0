//! Catalog module.
//!
//! The cart never talks to the catalog after add-time; these types carry
//! the fields it reads once.

mod product;

pub use product::{CartProduct, ProductSnapshot, PLACEHOLDER_IMAGE};
