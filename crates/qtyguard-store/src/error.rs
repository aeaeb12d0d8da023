//! # Store Error Types
//!
//! Errors for in-memory catalog and cart operations.

use thiserror::Error;

/// Catalog and cart operation errors.
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    /// No line with this cart item key.
    #[error("Cart item not found: {0}")]
    LineNotFound(String),

    /// Product ID is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(u64),

    /// Line quantities must be finite and not negative.
    #[error("Invalid quantity {quantity} for {context}")]
    InvalidQuantity { quantity: f64, context: String },

    /// Two rules share an identifier.
    #[error("Duplicate rule id: '{0}'")]
    DuplicateRule(String),
}

/// Convenience type alias for Results with StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            StoreError::LineNotFound("abc".to_string()).to_string(),
            "Cart item not found: abc"
        );
        assert_eq!(
            StoreError::InvalidQuantity {
                quantity: -1.0,
                context: "line abc".to_string(),
            }
            .to_string(),
            "Invalid quantity -1 for line abc"
        );
    }
}
