//! # Cart Gates
//!
//! The two host hooks. Both hand off to [`QuantityValidator`]; they only
//! differ in where the product identifiers come from and whether the cart
//! totals are checked.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add-to-cart hook ──► add_to_cart_validation ──┐                        │
//! │   (product_id from the request)                │  from_cart = false     │
//! │                                                ▼                        │
//! │                                   validate_single_product               │
//! │                                                ▲                        │
//! │  update-cart hook ──► update_cart_validation ──┘  from_cart = true      │
//! │   (product_id from the existing line item)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::notice::NoticeSink;
use crate::types::{ProductId, Quantity, VariationAttributes, VariationId};
use crate::validation::{ProductRequest, QuantityValidator};

/// Arguments of the add-to-cart hook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddToCart {
    pub product_id: ProductId,
    pub quantity: Quantity,
    #[serde(default)]
    pub variation_id: Option<VariationId>,
    #[serde(default)]
    pub variations: Option<VariationAttributes>,
    #[serde(default)]
    pub cart_item_key: Option<String>,
}

impl AddToCart {
    pub fn new(product_id: ProductId, quantity: impl Into<Quantity>) -> Self {
        AddToCart {
            product_id,
            quantity: quantity.into(),
            variation_id: None,
            variations: None,
            cart_item_key: None,
        }
    }

    pub fn with_variation(mut self, variation_id: VariationId) -> Self {
        self.variation_id = Some(variation_id);
        self
    }
}

/// The values the host stores for an existing cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemValues {
    pub product_id: ProductId,
    #[serde(default)]
    pub variation_id: Option<VariationId>,
    #[serde(default)]
    pub variation: VariationAttributes,
}

/// Entry points for the add-to-cart and update-cart hooks.
#[derive(Clone, Copy)]
pub struct QuantityGate<'a> {
    validator: QuantityValidator<'a>,
}

impl<'a> QuantityGate<'a> {
    pub fn new(validator: QuantityValidator<'a>) -> Self {
        QuantityGate { validator }
    }

    /// Verdict for adding `request.quantity` units of a product.
    ///
    /// Runs the line checks and then the cart-total checks.
    pub fn add_to_cart_validation(
        &self,
        passed: bool,
        request: &AddToCart,
        notices: &mut dyn NoticeSink,
    ) -> bool {
        debug!(
            product_id = request.product_id,
            cart_item_key = ?request.cart_item_key,
            "add-to-cart validation"
        );

        let product = ProductRequest::new(request.product_id, request.quantity)
            .from_cart(false)
            .with_variation(request.variation_id, request.variations.clone());

        self.validator.validate_single_product(passed, &product, notices)
    }

    /// Verdict for changing the line `cart_item_key` to `quantity`.
    ///
    /// Identifiers come from `values`, the line as currently stored. Only
    /// the line checks run: the new quantity replaces the cart total.
    pub fn update_cart_validation(
        &self,
        passed: bool,
        cart_item_key: &str,
        values: &LineItemValues,
        quantity: Quantity,
        notices: &mut dyn NoticeSink,
    ) -> bool {
        debug!(
            product_id = values.product_id,
            cart_item_key,
            "update-cart validation"
        );

        let product = ProductRequest::new(values.product_id, quantity)
            .from_cart(true)
            .with_variation(values.variation_id, Some(values.variation.clone()));

        self.validator.validate_single_product(passed, &product, notices)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
