pub mod cart_store;
pub mod context;

pub use crate::domain::model::{Cart, Product, ProductId, Stock, UpdateProductAmount};
pub use crate::domain::ports::{ConfigProvider, KeyValueStore, Notifier, ProductCatalog};
pub use crate::utils::error::Result;
