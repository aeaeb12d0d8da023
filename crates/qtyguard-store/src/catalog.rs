//! # Product Catalog
//!
//! Products by ID. Implements [`ProductStore`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use qtyguard_core::{Product, ProductId, ProductStore};

use crate::error::{StoreError, StoreResult};

/// In-memory product catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Product>", into = "Vec<Product>")]
pub struct Catalog {
    products: BTreeMap<ProductId, Product>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a product, returning the previous entry.
    pub fn insert(&mut self, product: Product) -> Option<Product> {
        debug!(product_id = product.id, title = %product.title, "catalog insert");
        self.products.insert(product.id, product)
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    /// Sets the tracked stock level. `None` turns tracking off.
    pub fn set_stock(&mut self, id: ProductId, stock: Option<i64>) -> StoreResult<()> {
        let product = self
            .products
            .get_mut(&id)
            .ok_or(StoreError::ProductNotFound(id))?;
        product.stock_quantity = stock;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductStore for Catalog {
    fn product(&self, id: ProductId) -> Option<Product> {
        self.products.get(&id).cloned()
    }
}

impl From<Vec<Product>> for Catalog {
    fn from(products: Vec<Product>) -> Self {
        Catalog {
            products: products.into_iter().map(|p| (p.id, p)).collect(),
        }
    }
}

impl From<Catalog> for Vec<Product> {
    fn from(catalog: Catalog) -> Self {
        catalog.products.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut catalog = Catalog::new();
        assert!(catalog.insert(Product::new(1, "Widget")).is_none());
        assert!(catalog.insert(Product::new(1, "Widget v2")).is_some());

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.product(1).map(|p| p.title), Some("Widget v2".to_string()));
        assert!(catalog.product(2).is_none());
    }

    #[test]
    fn test_set_stock() {
        let mut catalog = Catalog::from(vec![Product::new(1, "Widget")]);

        catalog.set_stock(1, Some(0)).unwrap();
        assert!(catalog.get(1).unwrap().is_out_of_stock());

        catalog.set_stock(1, None).unwrap();
        assert!(!catalog.get(1).unwrap().is_out_of_stock());

        assert_eq!(
            catalog.set_stock(9, Some(1)),
            Err(StoreError::ProductNotFound(9))
        );
    }
}
