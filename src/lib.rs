pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, Command};

pub use crate::adapters::{ConsoleNotifier, FileStore, HttpCatalog, MemoryNotifier, MemoryStore};
pub use crate::config::TomlConfig;
pub use crate::core::{
    cart_store::{CartSettings, CartStore},
    context::{try_use_cart, use_cart, CartContext, CartProvider},
};
pub use crate::domain::model::{Cart, Product, ProductId, Stock, UpdateProductAmount};
pub use crate::utils::error::{CartError, Result};
