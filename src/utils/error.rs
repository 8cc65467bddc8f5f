use crate::domain::model::ProductId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("Requested amount {requested} of product {product_id} exceeds stock of {available}")]
    StockExceeded {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    #[error("Invalid amount {amount} for product {product_id}: must be at least 1")]
    InvalidAmount { product_id: ProductId, amount: i64 },

    #[error("Product {product_id} is not in the cart")]
    NotInCart { product_id: ProductId },

    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("API returned status {status} for {url}")]
    ApiStatus { status: u16, url: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("use_cart() called outside of a CartProvider scope")]
    NoProvider,
}

impl CartError {
    /// Business-rule rejections, as opposed to collaborator or logic failures.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            CartError::StockExceeded { .. } | CartError::InvalidAmount { .. }
        )
    }

    pub fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            CartError::Api(_)
                | CartError::ApiStatus { .. }
                | CartError::Serialization(_)
                | CartError::Io(_)
                | CartError::Storage { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let stock = CartError::StockExceeded {
            product_id: 1,
            requested: 3,
            available: 2,
        };
        assert!(stock.is_rejection());
        assert!(!stock.is_collaborator_failure());

        let storage = CartError::Storage {
            message: "disk full".to_string(),
        };
        assert!(storage.is_collaborator_failure());
        assert!(!CartError::NotInCart { product_id: 4 }.is_rejection());
    }

    #[test]
    fn test_error_display() {
        let err = CartError::StockExceeded {
            product_id: 7,
            requested: 5,
            available: 4,
        };
        assert_eq!(
            err.to_string(),
            "Requested amount 5 of product 7 exceeds stock of 4"
        );
    }
}
