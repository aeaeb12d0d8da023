//! Scenario files: a catalog, a rule book and a cart in one JSON document.
//!
//! ```json
//! {
//!   "products": [{ "id": 1, "title": "Widget", "stock_quantity": 4 }],
//!   "rules": [{ "id": "r1", "scope": { "type": "global" }, "rule": { "step": 2 } }],
//!   "cart": [{ "key": "k1", "product_id": 1, "quantity": 2 }]
//! }
//! ```
//!
//! A rule may give `fields` instead of `rule`: the raw string mapping a
//! host stores per product, parsed with [`QuantityRule::from_fields`].
//!
//! ```json
//! { "id": "r2", "scope": { "type": "product", "value": 1 },
//!   "fields": { "min_value": "2", "max_value": "", "step": "2" } }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use qtyguard_core::error::CoreResult;
use qtyguard_core::rule::QuantityRule;
use qtyguard_core::{CoreError, QuantityGate};
use qtyguard_store::{Cart, Catalog, RuleBook, RuleEntry, RuleScope};

use crate::error::AppError;

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    #[serde(default)]
    products: Catalog,
    #[serde(default)]
    rules: Vec<ScenarioRule>,
    #[serde(default)]
    cart: Cart,
}

#[derive(Debug, Deserialize)]
struct ScenarioRule {
    id: String,
    scope: RuleScope,
    #[serde(default)]
    rule: QuantityRule,
    #[serde(default)]
    fields: BTreeMap<String, String>,
}

impl ScenarioRule {
    fn into_entry(self) -> CoreResult<RuleEntry> {
        let rule = if self.fields.is_empty() {
            self.rule
        } else {
            QuantityRule::from_fields(self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str())))?
        };
        Ok(RuleEntry {
            id: self.id,
            scope: self.scope,
            rule,
        })
    }
}

/// A loaded scenario.
#[derive(Debug)]
pub struct Scenario {
    pub catalog: Catalog,
    pub rules: RuleBook,
    pub cart: Cart,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = fs::read_to_string(path).map_err(|source| AppError::ReadScenario {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario = Self::from_json(&text).map_err(|err| match err {
            ScenarioError::Json(source) => AppError::ParseScenario {
                path: path.to_path_buf(),
                source,
            },
            ScenarioError::Store(err) => AppError::Store(err),
            ScenarioError::Rule(err) => AppError::Rule(err),
        })?;

        info!(
            path = %path.display(),
            products = scenario.catalog.len(),
            rules = scenario.rules.len(),
            cart_lines = scenario.cart.len(),
            "scenario loaded"
        );
        Ok(scenario)
    }

    pub fn from_json(text: &str) -> Result<Self, ScenarioError> {
        let file: ScenarioFile = serde_json::from_str(text)?;
        let entries = file
            .rules
            .into_iter()
            .map(ScenarioRule::into_entry)
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(Scenario {
            catalog: file.products,
            rules: RuleBook::from_entries(entries)?,
            cart: file.cart,
        })
    }

    pub fn gate(&self) -> QuantityGate<'_> {
        qtyguard_store::gate(&self.catalog, &self.rules, &self.cart)
    }
}

/// Failure to build a scenario from JSON text.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] qtyguard_store::StoreError),

    #[error(transparent)]
    Rule(#[from] CoreError),
}

#[cfg(test)]
mod tests {
    use qtyguard_core::notice::NoticeLog;
    use qtyguard_core::{AddToCart, CartStore};

    use super::*;

    const SCENARIO: &str = r#"{
        "products": [{ "id": 1, "title": "Widget" }],
        "rules": [{ "id": "r1", "scope": { "type": "global" }, "rule": { "max_value": 5 } }],
        "cart": [{ "key": "k1", "product_id": 1, "quantity": 3 }]
    }"#;

    #[test]
    fn test_from_json() {
        let scenario = Scenario::from_json(SCENARIO).unwrap();
        assert_eq!(scenario.catalog.len(), 1);
        assert_eq!(scenario.rules.len(), 1);
        assert_eq!(scenario.cart.quantity_for_product(1).value(), 3.0);

        let mut log = NoticeLog::new();
        let gate = scenario.gate();
        assert!(!gate.add_to_cart_validation(true, &AddToCart::new(1, 3.0), &mut log));
        assert!(gate.add_to_cart_validation(true, &AddToCart::new(1, 2.0), &mut log));
    }

    #[test]
    fn test_empty_document() {
        let scenario = Scenario::from_json("{}").unwrap();
        assert!(scenario.catalog.is_empty());
        assert!(scenario.rules.is_empty());
        assert!(scenario.cart.is_empty());
    }

    #[test]
    fn test_duplicate_rule_ids() {
        let err = Scenario::from_json(
            r#"{ "rules": [
                { "id": "a", "scope": { "type": "global" }, "rule": {} },
                { "id": "a", "scope": { "type": "global" }, "rule": {} }
            ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScenarioError::Store(_)));
    }

    #[test]
    fn test_rule_from_host_fields() {
        let scenario = Scenario::from_json(
            r#"{
                "products": [{ "id": 1, "title": "Widget" }],
                "rules": [{
                    "id": "meta",
                    "scope": { "type": "product", "value": 1 },
                    "fields": { "min_value": "2", "max_value": "", "step": "2", "_sku": "W" }
                }]
            }"#,
        )
        .unwrap();

        let mut log = NoticeLog::new();
        let gate = scenario.gate();
        assert!(!gate.add_to_cart_validation(true, &AddToCart::new(1, 1.0), &mut log));
        assert_eq!(
            log.messages(),
            vec!["You must add a minimum of 2 Widget's to your cart."]
        );
        assert!(gate.add_to_cart_validation(true, &AddToCart::new(1, 100.0), &mut log));
    }

    #[test]
    fn test_invalid_host_field() {
        let err = Scenario::from_json(
            r#"{ "rules": [{
                "id": "meta",
                "scope": { "type": "global" },
                "fields": { "step": "two" }
            }] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScenarioError::Rule(CoreError::RuleField(_))));
        assert_eq!(
            err.to_string(),
            "Invalid rule: Rule field step has invalid value 'two'"
        );
    }
}
