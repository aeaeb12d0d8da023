//! # Domain Types
//!
//! Products, cart lines and quantities as the validator sees them.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    CartLine     │   │    Quantity     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  key            │   │  f64 wrapper    │       │
//! │  │  title          │   │  product_id     │   │  2.0 → "2"      │       │
//! │  │  sku            │   │  variation_id   │   │  0.5 → "0.5"    │       │
//! │  │  category_ids   │   │  variation      │   └─────────────────┘       │
//! │  │  stock_quantity │   │  quantity       │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Quantities are fractional because products may be sold by weight or
//! length (0.5 kg, 1.25 m), so they are `f64` rather than integers.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::step::round_to;

/// Decimal places shown when a quantity is rendered in a notice.
const DISPLAY_DECIMALS: i32 = 8;

/// Product identifier assigned by the host catalog.
pub type ProductId = u64;

/// Variation identifier (a concrete size/colour of a variable product).
pub type VariationId = u64;

/// Selected variation attributes, e.g. `attribute_pa_size => "large"`.
pub type VariationAttributes = BTreeMap<String, String>;

// =============================================================================
// Quantity
// =============================================================================

/// A cart quantity or rule bound.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct Quantity(f64);

impl Quantity {
    /// Zero units.
    pub const ZERO: Quantity = Quantity(0.0);

    #[inline]
    pub const fn new(value: f64) -> Self {
        Quantity(value)
    }

    #[inline]
    pub const fn value(&self) -> f64 {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// True for values that carry a constraint under host "empty" rules.
    ///
    /// Hosts store an unset bound as `0` or an empty string, so zero is
    /// treated the same as absent for `min_value`, `max_value` and `step`.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.0 != 0.0 && !self.0.is_nan()
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Quantity(value)
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Quantity(value as f64)
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 + rhs.0)
    }
}

impl Sub for Quantity {
    type Output = Quantity;

    fn sub(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 - rhs.0)
    }
}

/// Renders without a trailing `.0` and without float noise.
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = round_to(self.0, DISPLAY_DECIMALS);
        // avoid printing "-0"
        let rounded = if rounded == 0.0 { 0.0 } else { rounded };
        write!(f, "{}", rounded)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product as loaded from the host catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,

    /// Display name used in notices.
    pub title: String,

    /// Stock Keeping Unit, used by SKU-scoped rules.
    #[serde(default)]
    pub sku: Option<String>,

    /// Categories the product belongs to, used by category-scoped rules.
    #[serde(default)]
    pub category_ids: Vec<u64>,

    /// Current stock level. `None` when stock tracking is disabled.
    #[serde(default)]
    pub stock_quantity: Option<i64>,
}

impl Product {
    /// Creates an untracked product with no SKU or categories.
    pub fn new(id: ProductId, title: impl Into<String>) -> Self {
        Product {
            id,
            title: title.into(),
            sku: None,
            category_ids: Vec::new(),
            stock_quantity: None,
        }
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn with_categories(mut self, category_ids: impl IntoIterator<Item = u64>) -> Self {
        self.category_ids = category_ids.into_iter().collect();
        self
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock_quantity = Some(stock);
        self
    }

    /// Stock is tracked and nothing is left (backorders count as out).
    pub fn is_out_of_stock(&self) -> bool {
        matches!(self.stock_quantity, Some(stock) if stock <= 0)
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// A line item already in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Host-generated cart item key.
    pub key: String,
    pub product_id: ProductId,
    #[serde(default)]
    pub variation_id: Option<VariationId>,
    #[serde(default)]
    pub variation: VariationAttributes,
    pub quantity: Quantity,
}

// =============================================================================
// Unit Tests
// =============================================================================
