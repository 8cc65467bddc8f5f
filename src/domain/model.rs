use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

pub type ProductId = u64;

/// One cart line item.
///
/// Everything except `id` and `amount` comes from the product catalog and is
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub amount: u32,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Product {
    pub fn new(id: ProductId, amount: u32) -> Self {
        Self {
            id,
            amount,
            details: Map::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

pub type Cart = Vec<Product>;

pub fn find_index(cart: &[Product], product_id: ProductId) -> Option<usize> {
    cart.iter().position(|product| product.id == product_id)
}

pub fn total_items(cart: &[Product]) -> u64 {
    cart.iter().map(|product| u64::from(product.amount)).sum()
}

/// Drops zero-amount entries and keeps the first entry for each id.
/// Returns the cleaned cart and how many entries were discarded.
pub fn normalize(cart: Cart) -> (Cart, usize) {
    let before = cart.len();
    let mut seen = HashSet::new();
    let cleaned: Cart = cart
        .into_iter()
        .filter(|product| product.amount > 0 && seen.insert(product.id))
        .collect();
    let dropped = before - cleaned.len();
    (cleaned, dropped)
}
