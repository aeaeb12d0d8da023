//! # Collaborators
//!
//! Traits for the data the validator reads but does not own. The host
//! storefront implements them; `qtyguard-store` ships in-memory versions.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  QuantityValidator                                                      │
//! │     │                                                                   │
//! │     ├── ProductStore::product(id)      → title, stock                  │
//! │     ├── RuleResolver::resolve(product) → applied rule                  │
//! │     └── CartStore::lines()             → quantities already in cart    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use crate::rule::AppliedRule;
use crate::types::{CartLine, Product, ProductId, Quantity};

/// Picks the quantity rule that applies to a product.
pub trait RuleResolver {
    /// Returns `None` when no rule matches; the product is unconstrained.
    fn resolve(&self, product: &Product) -> Option<AppliedRule>;
}

impl RuleResolver for HashMap<ProductId, AppliedRule> {
    fn resolve(&self, product: &Product) -> Option<AppliedRule> {
        self.get(&product.id).cloned()
    }
}

/// Loads products by ID.
pub trait ProductStore {
    fn product(&self, id: ProductId) -> Option<Product>;
}

impl ProductStore for HashMap<ProductId, Product> {
    fn product(&self, id: ProductId) -> Option<Product> {
        self.get(&id).cloned()
    }
}

/// Read access to the current cart.
pub trait CartStore {
    fn lines(&self) -> Vec<CartLine>;

    /// Total quantity of `product_id` across all matching lines.
    ///
    /// Lines are matched on the parent product, so every variation of a
    /// variable product counts towards the same total.
    fn quantity_for_product(&self, product_id: ProductId) -> Quantity {
        self.lines()
            .iter()
            .filter(|line| line.product_id == product_id)
            .fold(Quantity::ZERO, |total, line| total + line.quantity)
    }
}

impl CartStore for [CartLine] {
    fn lines(&self) -> Vec<CartLine> {
        self.to_vec()
    }
}

impl CartStore for Vec<CartLine> {
    fn lines(&self) -> Vec<CartLine> {
        self.clone()
    }
}
