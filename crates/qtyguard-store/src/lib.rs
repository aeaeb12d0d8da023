//! # qtyguard-store: In-Memory Collaborators
//!
//! Plain in-memory implementations of the traits `qtyguard-core` reads
//! through. Hosts with their own catalog and cart implement the traits
//! directly; these types back the CLI and the integration tests.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        qtyguard Data Flow                               │
//! │                                                                         │
//! │  QuantityGate (qtyguard-core)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   qtyguard-store (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Catalog    │    │     Cart      │    │   RuleBook   │  │   │
//! │  │   │ ProductStore  │    │   CartStore   │    │ RuleResolver │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use qtyguard_core::{Product, Quantity, QuantityRule};
//! use qtyguard_store::{Cart, Catalog, RuleBook, RuleScope};
//!
//! let mut catalog = Catalog::new();
//! catalog.insert(Product::new(1, "Widget"));
//!
//! let mut rules = RuleBook::new();
//! rules.add(
//!     "bulk",
//!     RuleScope::Global,
//!     QuantityRule { step: Some(Quantity::new(6.0)), ..QuantityRule::default() },
//! );
//!
//! let cart = Cart::new();
//! let gate = qtyguard_store::gate(&catalog, &rules, &cart);
//! # let _ = gate;
//! ```

pub mod cart;
pub mod catalog;
pub mod error;
pub mod rulebook;

pub use cart::Cart;
pub use catalog::Catalog;
pub use error::{StoreError, StoreResult};
pub use rulebook::{RuleBook, RuleEntry, RuleScope};

use qtyguard_core::{QuantityGate, QuantityValidator};

/// Wires the three in-memory stores into a [`QuantityGate`].
pub fn gate<'a>(catalog: &'a Catalog, rules: &'a RuleBook, cart: &'a Cart) -> QuantityGate<'a> {
    QuantityGate::new(QuantityValidator::new(catalog, rules, cart))
}
