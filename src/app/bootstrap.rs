use crate::adapters::{FileStore, HttpCatalog};
use crate::core::cart_store::{CartSettings, CartStore};
use crate::core::{ConfigProvider, Notifier};
use crate::utils::error::Result;
use std::sync::Arc;

pub fn settings_from<C: ConfigProvider + ?Sized>(config: &C) -> CartSettings {
    CartSettings {
        storage_key: config.storage_key().to_string(),
        check_stock_on_first_add: config.check_stock_on_first_add(),
    }
}

/// Wires the HTTP catalog and file-backed storage described by `config`
/// into a hydrated [`CartStore`].
pub fn build_cart_store<C: ConfigProvider + ?Sized>(
    config: &C,
    notifier: Arc<dyn Notifier>,
) -> Result<CartStore> {
    let catalog = HttpCatalog::new(config.api_url(), config.request_timeout())?;
    let storage = FileStore::new(config.storage_path());

    tracing::info!(
        "Using catalog at {} and storage at {}",
        catalog.base_url(),
        storage.path().display()
    );

    Ok(CartStore::new(
        Arc::new(catalog),
        Arc::new(storage),
        notifier,
        settings_from(config),
    ))
}
