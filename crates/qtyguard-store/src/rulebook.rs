//! # Rule Book
//!
//! Chooses which quantity rule applies to a product. Implements
//! [`RuleResolver`].
//!
//! ## Selection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Product { id: 7, sku: "ROPE-1M", categories: [3] }                     │
//! │       │                                                                 │
//! │       ▼  matching entries                                               │
//! │  "rope-sku"   Sku("ROPE-1M")   priority 5                               │
//! │  "hardware"   Category(3)      priority 5                               │
//! │  "default"    Global           priority 10                              │
//! │       │                                                                 │
//! │       ▼  lowest priority number, then most specific scope, then id      │
//! │  "rope-sku" wins                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entries without a priority rank after every entry that has one.

use serde::{Deserialize, Serialize};
use tracing::debug;

use qtyguard_core::{AppliedRule, Product, ProductId, QuantityRule, RuleResolver};

use crate::error::{StoreError, StoreResult};

/// What a rule entry applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RuleScope {
    /// One product, by ID.
    Product(ProductId),
    /// Products with this SKU.
    Sku(String),
    /// Products in this category.
    Category(u64),
    /// Every product.
    Global,
}

impl RuleScope {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            RuleScope::Product(id) => product.id == *id,
            RuleScope::Sku(sku) => product.sku.as_deref() == Some(sku.as_str()),
            RuleScope::Category(category) => product.category_ids.contains(category),
            RuleScope::Global => true,
        }
    }

    /// Lower is more specific.
    fn specificity(&self) -> u8 {
        match self {
            RuleScope::Product(_) => 0,
            RuleScope::Sku(_) => 1,
            RuleScope::Category(_) => 2,
            RuleScope::Global => 3,
        }
    }
}

/// A named rule and the products it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEntry {
    pub id: String,
    pub scope: RuleScope,
    pub rule: QuantityRule,
}

impl RuleEntry {
    fn rank(&self) -> (i64, u8, &str) {
        let priority = self.rule.priority.map(i64::from).unwrap_or(i64::MAX);
        (priority, self.scope.specificity(), self.id.as_str())
    }
}

/// Rule entries in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleBook {
    entries: Vec<RuleEntry>,
}

impl RuleBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a rule book, rejecting duplicate ids.
    pub fn from_entries(entries: impl IntoIterator<Item = RuleEntry>) -> StoreResult<Self> {
        let mut book = RuleBook::new();
        for entry in entries {
            book.insert(entry)?;
        }
        Ok(book)
    }

    /// Adds an entry. Fails if the id is already taken.
    pub fn insert(&mut self, entry: RuleEntry) -> StoreResult<()> {
        if self.entries.iter().any(|e| e.id == entry.id) {
            return Err(StoreError::DuplicateRule(entry.id));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Adds an entry, replacing any entry with the same id.
    pub fn add(&mut self, id: impl Into<String>, scope: RuleScope, rule: QuantityRule) {
        let id = id.into();
        self.entries.retain(|e| e.id != id);
        self.entries.push(RuleEntry { id, scope, rule });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry covering `product`, best first.
    pub fn matching(&self, product: &Product) -> Vec<&RuleEntry> {
        let mut matches: Vec<&RuleEntry> = self
            .entries
            .iter()
            .filter(|e| e.scope.matches(product))
            .collect();
        matches.sort_by(|a, b| a.rank().cmp(&b.rank()));
        matches
    }
}

impl RuleResolver for RuleBook {
    fn resolve(&self, product: &Product) -> Option<AppliedRule> {
        let best = self.matching(product).into_iter().next()?;
        debug!(product_id = product.id, rule_id = %best.id, "rule resolved");
        Some(AppliedRule::new(best.id.clone(), best.rule.clone()))
    }
}
