//! # qtyguard-core: Quantity Rules for Cart Mutations
//!
//! This crate decides whether a cart mutation respects the quantity rule
//! that applies to a product: minimum, maximum and step constraints, with
//! optional out-of-stock overrides for the minimum and maximum.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        qtyguard Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Host storefront / qtyguard CLI                  │   │
//! │  │        add-to-cart hook            update-cart hook             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ qtyguard-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌────────────────┐ │   │
//! │  │   │   gate   │─►│validation│─►│   rule   │  │     notice     │ │   │
//! │  │   │ add/upd  │  │ checks   │  │  step    │  │ inline/legacy  │ │   │
//! │  │   └──────────┘  └────┬─────┘  └──────────┘  └────────────────┘ │   │
//! │  │                      │ collaborators (traits)                   │   │
//! │  └──────────────────────┼──────────────────────────────────────────┘   │
//! │                         ▼                                               │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │        qtyguard-store: Catalog, Cart, RuleBook (in memory)      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Products, cart lines and the [`Quantity`] type
//! - [`rule`] - [`QuantityRule`] and stock-adjusted limits
//! - [`step`] - Tolerance-aware step arithmetic
//! - [`notice`] - Notices and the sinks that deliver them
//! - [`collaborators`] - Traits the host implements
//! - [`validation`] - The single-product validator
//! - [`gate`] - Add-to-cart and update-cart entry points
//! - [`error`] - Violations and error types
//!
//! ## Example Usage
//!
//! ```rust
//! use qtyguard_core::rule::QuantityRule;
//! use qtyguard_core::validation::{check_quantity, CheckInput};
//! use qtyguard_core::Quantity;
//!
//! let rule = QuantityRule {
//!     min_value: Some(Quantity::new(2.0)),
//!     step: Some(Quantity::new(3.0)),
//!     ..QuantityRule::default()
//! };
//!
//! let limits = rule.limits_for_stock(None);
//! let input = CheckInput::single("Widget", Quantity::new(5.0));
//! assert!(check_quantity(&limits, &input).is_ok());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod collaborators;
pub mod error;
pub mod gate;
pub mod notice;
pub mod rule;
pub mod step;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use collaborators::{CartStore, ProductStore, RuleResolver};
pub use error::{CoreError, QuantityViolation, RuleFieldError};
pub use gate::{AddToCart, LineItemValues, QuantityGate};
pub use notice::{Notice, NoticeLevel, NoticeSink};
pub use rule::{AppliedRule, QuantityLimits, QuantityRule};
pub use types::*;
pub use validation::{ProductRequest, QuantityValidator};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Decimal places kept when comparing a step remainder against zero.
///
/// Quantities such as `0.3` with a step of `0.1` leave a binary remainder
/// of roughly `1e-17`; rounding to this precision makes it zero.
pub const STEP_TOLERANCE_DECIMALS: i32 = 4;

/// First host version that supports inline notices with a severity.
/// Older hosts only accept bare cart error strings.
pub const INLINE_NOTICE_MIN_VERSION: (u32, u32) = (2, 1);
