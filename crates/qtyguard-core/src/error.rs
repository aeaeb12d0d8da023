//! # Error Types
//!
//! Domain-specific error types for qtyguard-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  qtyguard-core errors (this file)                                       │
//! │  ├── QuantityViolation - A rule check failed (shown to the shopper)     │
//! │  ├── RuleFieldError    - A rule mapping holds a non-numeric value       │
//! │  └── CoreError         - Lookup failures around the validator           │
//! │                                                                         │
//! │  qtyguard-store errors (separate crate)                                 │
//! │  └── StoreError        - Unknown cart keys, bad quantities              │
//! │                                                                         │
//! │  Flow: QuantityViolation → Notice → NoticeSink → shopper                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `QuantityViolation`'s `Display` output IS the notice text. Hosts that
//! translate notices can match on the variant and use its fields instead.

use thiserror::Error;

use crate::types::{ProductId, Quantity};

// =============================================================================
// Quantity Violation
// =============================================================================

/// A failed quantity check.
///
/// The first four variants test the requested quantity alone; the
/// `Cart*` variants test the requested quantity plus what the cart
/// already holds for the product.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantityViolation {
    #[error("You must add a minimum of {min} {title}'s to your cart.")]
    BelowMinimum { title: String, min: Quantity },

    #[error("You may only add a maximum of {max} {title}'s to your cart.")]
    AboveMaximum { title: String, max: Quantity },

    #[error("You may only add a {title} in multiples of {step} to your cart.")]
    OffStep { title: String, step: Quantity },

    #[error("Your cart must have a minimum of {min} {title}'s to proceed.")]
    CartBelowMinimum { title: String, min: Quantity },

    /// ## User Workflow
    /// ```text
    /// Cart holds 3 × Widget, rule max = 5
    ///      │
    ///      ▼
    /// Add 3 more → 6 > 5
    ///      │
    ///      ▼
    /// "You can only purchase a maximum of 5 Widget's at once and your
    ///  cart has 3 Widget's in it already."
    /// ```
    #[error(
        "You can only purchase a maximum of {max} {title}'s at once and your cart has {cart_qty} {title}'s in it already."
    )]
    CartAboveMaximum {
        title: String,
        max: Quantity,
        cart_qty: Quantity,
    },

    #[error("You may only purchase {title} in multiples of {step}.")]
    CartOffStep { title: String, step: Quantity },
}

// =============================================================================
// Rule Field Error
// =============================================================================

/// A rule mapping value could not be read as a number.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Rule field {field} has invalid value '{value}'")]
pub struct RuleFieldError {
    pub field: String,
    pub value: String,
}

// =============================================================================
// Core Error
// =============================================================================

/// Failures around the validator that are not rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The product store has no product with this ID.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Invalid rule: {0}")]
    RuleField(#[from] RuleFieldError),
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
