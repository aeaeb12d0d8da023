//! # Cart
//!
//! Line items for one shopper. Implements [`CartStore`].
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Shopper Action           Gate (qtyguard-core)       Cart Change        │
//! │  ──────────────           ────────────────────       ───────────        │
//! │                                                                         │
//! │  Add to cart ───────────► add_to_cart_validation ──► add_line()        │
//! │                                                                         │
//! │  Change quantity ───────► update_cart_validation ──► set_quantity()    │
//! │                                                                         │
//! │  Remove ────────────────► (no gate) ───────────────► remove_line()     │
//! │                                                                         │
//! │  NOTE: the cart never calls the gate itself; the host asks the gate    │
//! │        first and only mutates on a pass.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use qtyguard_core::{
    CartLine, CartStore, LineItemValues, ProductId, Quantity, VariationAttributes, VariationId,
};

use crate::error::{StoreError, StoreResult};

/// The shopping cart.
///
/// ## Invariants
/// - One line per (product, variation, attributes); adding the same again
///   increases that line's quantity
/// - Line quantities are finite and positive; setting zero removes the line
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds units of a product, merging with an identical line.
    ///
    /// Returns the cart item key of the line that now holds them.
    pub fn add_line(
        &mut self,
        product_id: ProductId,
        variation_id: Option<VariationId>,
        variation: VariationAttributes,
        quantity: Quantity,
    ) -> StoreResult<String> {
        check_quantity(quantity, || format!("product {}", product_id))?;

        if let Some(line) = self.lines.iter_mut().find(|l| {
            l.product_id == product_id && l.variation_id == variation_id && l.variation == variation
        }) {
            line.quantity = line.quantity + quantity;
            debug!(key = %line.key, quantity = %line.quantity, "cart line increased");
            return Ok(line.key.clone());
        }

        let key = Uuid::new_v4().simple().to_string();
        debug!(key = %key, product_id, quantity = %quantity, "cart line added");
        self.lines.push(CartLine {
            key: key.clone(),
            product_id,
            variation_id,
            variation,
            quantity,
        });
        Ok(key)
    }

    /// Sets a line's quantity. Zero removes the line.
    pub fn set_quantity(&mut self, key: &str, quantity: Quantity) -> StoreResult<()> {
        if quantity.is_zero() {
            return self.remove_line(key).map(|_| ());
        }
        check_quantity(quantity, || format!("line {}", key))?;

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.key == key)
            .ok_or_else(|| StoreError::LineNotFound(key.to_string()))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Removes a line by key, returning it.
    pub fn remove_line(&mut self, key: &str) -> StoreResult<CartLine> {
        let index = self
            .lines
            .iter()
            .position(|l| l.key == key)
            .ok_or_else(|| StoreError::LineNotFound(key.to_string()))?;
        Ok(self.lines.remove(index))
    }

    pub fn line(&self, key: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.key == key)
    }

    /// The stored values of a line, as the update-cart hook receives them.
    pub fn line_values(&self, key: &str) -> StoreResult<LineItemValues> {
        let line = self
            .line(key)
            .ok_or_else(|| StoreError::LineNotFound(key.to_string()))?;
        Ok(LineItemValues {
            product_id: line.product_id,
            variation_id: line.variation_id,
            variation: line.variation.clone(),
        })
    }

    pub fn lines_for_product(&self, product_id: ProductId) -> impl Iterator<Item = &CartLine> {
        self.lines.iter().filter(move |l| l.product_id == product_id)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl CartStore for Cart {
    fn lines(&self) -> Vec<CartLine> {
        self.lines.clone()
    }

    fn quantity_for_product(&self, product_id: ProductId) -> Quantity {
        self.lines_for_product(product_id)
            .fold(Quantity::ZERO, |total, line| total + line.quantity)
    }
}

fn check_quantity(quantity: Quantity, context: impl FnOnce() -> String) -> StoreResult<()> {
    let value = quantity.value();
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(StoreError::InvalidQuantity {
            quantity: value,
            context: context(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(v: f64) -> Quantity {
        Quantity::new(v)
    }

    #[test]
    fn test_add_same_product_increases_quantity() {
        let mut cart = Cart::new();

        let first = cart.add_line(1, None, VariationAttributes::new(), q(2.0)).unwrap();
        let second = cart.add_line(1, None, VariationAttributes::new(), q(3.0)).unwrap();

        assert_eq!(first, second);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_for_product(1), q(5.0));
    }

    #[test]
    fn test_variations_get_their_own_lines() {
        let mut cart = Cart::new();
        cart.add_line(1, Some(10), VariationAttributes::new(), q(2.0)).unwrap();
        cart.add_line(1, Some(11), VariationAttributes::new(), q(1.0)).unwrap();

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.lines_for_product(1).count(), 2);
        // both variations count towards the parent product
        assert_eq!(cart.quantity_for_product(1), q(3.0));
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::new();
        let key = cart.add_line(1, None, VariationAttributes::new(), q(2.0)).unwrap();

        cart.set_quantity(&key, q(4.0)).unwrap();
        assert_eq!(cart.line(&key).map(|l| l.quantity), Some(q(4.0)));

        cart.set_quantity(&key, Quantity::ZERO).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_rejects_bad_quantities_and_keys() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add_line(1, None, VariationAttributes::new(), q(-1.0)),
            Err(StoreError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            cart.add_line(1, None, VariationAttributes::new(), q(f64::NAN)),
            Err(StoreError::InvalidQuantity { .. })
        ));
        assert_eq!(
            cart.set_quantity("missing", q(1.0)),
            Err(StoreError::LineNotFound("missing".to_string()))
        );
        assert!(cart.remove_line("missing").is_err());
    }

    #[test]
    fn test_line_values() {
        let mut cart = Cart::new();
        let mut attrs = VariationAttributes::new();
        attrs.insert("attribute_pa_size".to_string(), "large".to_string());
        let key = cart.add_line(1, Some(10), attrs.clone(), q(1.0)).unwrap();

        let values = cart.line_values(&key).unwrap();
        assert_eq!(values.product_id, 1);
        assert_eq!(values.variation_id, Some(10));
        assert_eq!(values.variation, attrs);
    }

    #[test]
    fn test_deserialize_from_lines() {
        let cart: Cart = serde_json::from_str(
            r#"[{"key": "k1", "product_id": 1, "quantity": 3}]"#,
        )
        .unwrap();
        assert_eq!(cart.quantity_for_product(1), q(3.0));
        assert!(cart.line("k1").is_some());
    }
}
