//! # Quantity Rules
//!
//! The rule attached to a product and the limits it yields once stock
//! state is taken into account.
//!
//! ## From Rule to Limits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  QuantityRule (as resolved)           QuantityLimits (as enforced)      │
//! │  ──────────────────────────           ────────────────────────────      │
//! │  min_value         ─┐                                                   │
//! │  min_out_of_stock  ─┴─ stock ≤ 0? ──► min                               │
//! │  max_value         ─┐                                                   │
//! │  max_out_of_stock  ─┴─ stock ≤ 0? ──► max                               │
//! │  step              ─────────────────► step                              │
//! │  priority          (used by resolvers only)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::RuleFieldError;
use crate::types::{Product, Quantity};

// =============================================================================
// Quantity Rule
// =============================================================================

/// Quantity constraints for a product. Every field is optional; a missing
/// field carries no constraint of that kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuantityRule {
    #[serde(default)]
    pub min_value: Option<Quantity>,

    #[serde(default)]
    pub max_value: Option<Quantity>,

    /// Quantities must step up from the minimum (or zero) by this amount.
    #[serde(default)]
    pub step: Option<Quantity>,

    /// Lower numbers win when several rules match a product.
    #[serde(default)]
    pub priority: Option<i32>,

    /// Replaces `min_value` when tracked stock is at or below zero.
    #[serde(default, alias = "min_oos")]
    pub min_out_of_stock: Option<Quantity>,

    /// Replaces `max_value` when tracked stock is at or below zero.
    #[serde(default, alias = "max_oos")]
    pub max_out_of_stock: Option<Quantity>,
}

impl QuantityRule {
    /// Builds a rule from a flat host mapping of field name to raw text.
    ///
    /// Empty values count as absent. Unknown keys are ignored so hosts can
    /// pass their whole meta bag. `min_oos`/`max_oos` are accepted as
    /// short names for the out-of-stock overrides.
    ///
    /// ## Example
    /// ```rust
    /// use qtyguard_core::rule::QuantityRule;
    ///
    /// let rule = QuantityRule::from_fields([
    ///     ("min_value", "2"),
    ///     ("max_value", ""),
    ///     ("step", "3"),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(rule.min_value.map(|q| q.value()), Some(2.0));
    /// assert!(rule.max_value.is_none());
    /// ```
    pub fn from_fields<'a, I>(fields: I) -> Result<Self, RuleFieldError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut rule = QuantityRule::default();

        for (key, raw) in fields {
            match key {
                "min_value" => rule.min_value = parse_quantity(key, raw)?,
                "max_value" => rule.max_value = parse_quantity(key, raw)?,
                "step" => rule.step = parse_quantity(key, raw)?,
                "priority" => rule.priority = parse_priority(raw)?,
                "min_out_of_stock" | "min_oos" => {
                    rule.min_out_of_stock = parse_quantity(key, raw)?
                }
                "max_out_of_stock" | "max_oos" => {
                    rule.max_out_of_stock = parse_quantity(key, raw)?
                }
                _ => {}
            }
        }

        Ok(rule)
    }

    /// A rule with no populated fields constrains nothing.
    pub fn is_inactive(&self) -> bool {
        self.min_value.is_none()
            && self.max_value.is_none()
            && self.step.is_none()
            && self.priority.is_none()
            && self.min_out_of_stock.is_none()
            && self.max_out_of_stock.is_none()
    }

    /// Limits to enforce for `product`, given its current stock.
    pub fn limits_for(&self, product: &Product) -> QuantityLimits {
        self.limits_for_stock(product.stock_quantity)
    }

    /// Limits to enforce for a product with the given stock level.
    ///
    /// When stock is tracked (`Some`) and at or below zero, present
    /// out-of-stock overrides replace the regular bounds. A zero override
    /// is honoured: a maximum of zero blocks every positive quantity.
    pub fn limits_for_stock(&self, stock: Option<i64>) -> QuantityLimits {
        let out_of_stock = matches!(stock, Some(level) if level <= 0);

        let min = match (out_of_stock, self.min_out_of_stock) {
            (true, Some(min_oos)) => Some(min_oos),
            _ => self.min_value,
        }
        .filter(Quantity::is_set);

        let max = match (out_of_stock, self.max_out_of_stock) {
            (true, Some(max_oos)) => Some(max_oos),
            _ => self.max_value.filter(Quantity::is_set),
        };

        let step = self.step.filter(|s| s.is_set() && s.value() > 0.0);

        QuantityLimits { min, max, step }
    }
}

fn parse_quantity(field: &str, raw: &str) -> Result<Option<Quantity>, RuleFieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| Some(Quantity::new(v)))
        .ok_or_else(|| RuleFieldError {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

fn parse_priority(raw: &str) -> Result<Option<i32>, RuleFieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    raw.parse::<i32>().map(Some).map_err(|_| RuleFieldError {
        field: "priority".to_string(),
        value: raw.to_string(),
    })
}

// =============================================================================
// Applied Rule
// =============================================================================

/// The rule a resolver chose for a product, with its identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedRule {
    pub id: String,
    pub rule: QuantityRule,
}

impl AppliedRule {
    pub fn new(id: impl Into<String>, rule: QuantityRule) -> Self {
        AppliedRule {
            id: id.into(),
            rule,
        }
    }
}

// =============================================================================
// Quantity Limits
// =============================================================================

/// Effective bounds after stock adjustment. `None` means unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QuantityLimits {
    pub min: Option<Quantity>,
    pub max: Option<Quantity>,
    pub step: Option<Quantity>,
}

impl QuantityLimits {
    pub fn is_unconstrained(&self) -> bool {
        self.min.is_none() && self.max.is_none() && self.step.is_none()
    }

    /// Quantities step up from the minimum, or from zero without one.
    pub fn baseline(&self) -> Quantity {
        self.min.unwrap_or(Quantity::ZERO)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
