//! # Validation Module
//!
//! The single-product validator: resolves the rule for a product, adjusts
//! it for stock, and checks a candidate quantity against it.
//!
//! ## Check Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      validate_single_product                            │
//! │                                                                         │
//! │  load product ──► resolve rule ──► inactive? ──────────────► PASS      │
//! │                                        │                                │
//! │                                        ▼                                │
//! │                           stock ≤ 0? swap in overrides                  │
//! │                                        │                                │
//! │  Line checks        qty < min ──► BelowMinimum                          │
//! │                     qty > max ──► AboveMaximum                          │
//! │                     (qty - min) % step ≠ 0 ──► OffStep                  │
//! │                                        │                                │
//! │                        from_cart? ─────┼─────────────────────► PASS    │
//! │                                        ▼                                │
//! │  Cart total checks  cart_qty = Σ lines for product (0 → PASS)           │
//! │  (add path only)    qty + cart_qty < min ──► CartBelowMinimum           │
//! │                     qty + cart_qty > max ──► CartAboveMaximum           │
//! │                     (qty + cart_qty - min) % step ≠ 0 ──► CartOffStep   │
//! │                                        │                                │
//! │                                        ▼                                │
//! │                                      PASS                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each failure stops the evaluation; exactly one notice is emitted.

use tracing::{debug, warn};

use crate::collaborators::{CartStore, ProductStore, RuleResolver};
use crate::error::{CoreError, CoreResult, QuantityViolation};
use crate::notice::{Notice, NoticeSink};
use crate::rule::QuantityLimits;
use crate::step::is_multiple;
use crate::types::{Product, ProductId, Quantity, VariationAttributes, VariationId};

// =============================================================================
// Pure Checks
// =============================================================================

/// The quantities one evaluation looks at.
#[derive(Debug, Clone, Copy)]
pub struct CheckInput<'a> {
    pub title: &'a str,
    pub quantity: Quantity,
    /// What the cart already holds for the product. `None` skips the
    /// cart-total checks.
    pub cart_qty: Option<Quantity>,
}

impl<'a> CheckInput<'a> {
    /// Line-only checks, as on the update-cart path.
    pub fn single(title: &'a str, quantity: Quantity) -> Self {
        CheckInput {
            title,
            quantity,
            cart_qty: None,
        }
    }

    /// Line checks followed by cart-total checks.
    pub fn with_cart(title: &'a str, quantity: Quantity, cart_qty: Quantity) -> Self {
        CheckInput {
            title,
            quantity,
            cart_qty: Some(cart_qty),
        }
    }
}

/// Runs every check against `limits`, stopping at the first failure.
///
/// ## Example
/// ```rust
/// use qtyguard_core::rule::QuantityLimits;
/// use qtyguard_core::validation::{check_quantity, CheckInput};
/// use qtyguard_core::{Quantity, QuantityViolation};
///
/// let limits = QuantityLimits {
///     max: Some(Quantity::new(5.0)),
///     ..QuantityLimits::default()
/// };
///
/// let input = CheckInput::with_cart("Widget", Quantity::new(3.0), Quantity::new(3.0));
/// assert!(matches!(
///     check_quantity(&limits, &input),
///     Err(QuantityViolation::CartAboveMaximum { .. })
/// ));
/// ```
pub fn check_quantity(
    limits: &QuantityLimits,
    input: &CheckInput<'_>,
) -> Result<(), QuantityViolation> {
    let title = input.title;
    let quantity = input.quantity;

    if let Some(min) = limits.min {
        if quantity < min {
            return Err(QuantityViolation::BelowMinimum {
                title: title.to_string(),
                min,
            });
        }
    }

    if let Some(max) = limits.max {
        if quantity > max {
            return Err(QuantityViolation::AboveMaximum {
                title: title.to_string(),
                max,
            });
        }
    }

    if let Some(step) = limits.step {
        let remainder = quantity - limits.baseline();
        if !is_multiple(remainder.value(), step.value()) {
            return Err(QuantityViolation::OffStep {
                title: title.to_string(),
                step,
            });
        }
    }

    // nothing in the cart yet means nothing to aggregate against
    let cart_qty = match input.cart_qty {
        Some(cart_qty) if !cart_qty.is_zero() => cart_qty,
        _ => return Ok(()),
    };
    let total = quantity + cart_qty;

    if let Some(min) = limits.min {
        if total < min {
            return Err(QuantityViolation::CartBelowMinimum {
                title: title.to_string(),
                min,
            });
        }
    }

    if let Some(max) = limits.max {
        if total > max {
            return Err(QuantityViolation::CartAboveMaximum {
                title: title.to_string(),
                max,
                cart_qty,
            });
        }
    }

    if let Some(step) = limits.step {
        let remainder = total - limits.baseline();
        if !is_multiple(remainder.value(), step.value()) {
            return Err(QuantityViolation::CartOffStep {
                title: title.to_string(),
                step,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Validator
// =============================================================================

/// One product quantity to validate.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRequest {
    pub product_id: ProductId,
    pub quantity: Quantity,
    /// Set when the shopper is editing an existing line; skips cart totals.
    pub from_cart: bool,
    pub variation_id: Option<VariationId>,
    pub variation: Option<VariationAttributes>,
}

impl ProductRequest {
    pub fn new(product_id: ProductId, quantity: impl Into<Quantity>) -> Self {
        ProductRequest {
            product_id,
            quantity: quantity.into(),
            from_cart: false,
            variation_id: None,
            variation: None,
        }
    }

    pub fn from_cart(mut self, from_cart: bool) -> Self {
        self.from_cart = from_cart;
        self
    }

    pub fn with_variation(
        mut self,
        variation_id: Option<VariationId>,
        variation: Option<VariationAttributes>,
    ) -> Self {
        self.variation_id = variation_id;
        self.variation = variation;
        self
    }
}

/// Evaluates quantity rules against the host's products, rules and cart.
///
/// All three collaborators are borrowed for the lifetime of one request;
/// the validator holds no state of its own.
#[derive(Clone, Copy)]
pub struct QuantityValidator<'a> {
    products: &'a dyn ProductStore,
    rules: &'a dyn RuleResolver,
    cart: &'a dyn CartStore,
}

impl<'a> QuantityValidator<'a> {
    pub fn new(
        products: &'a dyn ProductStore,
        rules: &'a dyn RuleResolver,
        cart: &'a dyn CartStore,
    ) -> Self {
        QuantityValidator {
            products,
            rules,
            cart,
        }
    }

    /// Validates `request`, reporting a failure to `notices`.
    ///
    /// `passed` is the verdict of earlier host validators. It is recorded
    /// in the trace but does not influence the result.
    pub fn validate_single_product(
        &self,
        passed: bool,
        request: &ProductRequest,
        notices: &mut dyn NoticeSink,
    ) -> bool {
        debug!(
            passed,
            product_id = request.product_id,
            variation_id = ?request.variation_id,
            quantity = %request.quantity,
            from_cart = request.from_cart,
            "validating product quantity"
        );

        match self.check(request) {
            Ok(()) => true,
            Err(violation) => {
                debug!(
                    product_id = request.product_id,
                    violation = ?violation,
                    "quantity rule violated"
                );
                notices.add(Notice::from(&violation));
                false
            }
        }
    }

    /// Same evaluation as [`validate_single_product`], returning the typed
    /// violation instead of emitting a notice.
    ///
    /// [`validate_single_product`]: QuantityValidator::validate_single_product
    pub fn check(&self, request: &ProductRequest) -> Result<(), QuantityViolation> {
        let product = match self.load_product(request.product_id) {
            Ok(product) => product,
            Err(err) => {
                // a missing product cannot have a rule applied to it
                warn!(error = %err, "skipping quantity rules");
                return Ok(());
            }
        };

        let applied = match self.rules.resolve(&product) {
            Some(applied) if !applied.rule.is_inactive() => applied,
            _ => {
                debug!(product_id = product.id, "no active quantity rule");
                return Ok(());
            }
        };

        let limits = applied.rule.limits_for(&product);
        debug!(
            product_id = product.id,
            rule_id = %applied.id,
            out_of_stock = product.is_out_of_stock(),
            limits = ?limits,
            "applying quantity rule"
        );

        if limits.is_unconstrained() {
            return Ok(());
        }

        let input = if request.from_cart {
            CheckInput::single(&product.title, request.quantity)
        } else {
            let cart_qty = self.cart.quantity_for_product(product.id);
            debug!(product_id = product.id, cart_qty = %cart_qty, "cart quantity");
            CheckInput::with_cart(&product.title, request.quantity, cart_qty)
        };

        check_quantity(&limits, &input)
    }

    fn load_product(&self, id: ProductId) -> CoreResult<Product> {
        self.products
            .product(id)
            .ok_or(CoreError::ProductNotFound(id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
