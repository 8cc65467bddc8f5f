use crate::core::{KeyValueStore, Notifier, ProductCatalog};
use crate::domain::model::{self, Cart, ProductId, Stock, UpdateProductAmount};
use crate::utils::error::{CartError, Result};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

pub const STOCK_EXCEEDED_MESSAGE: &str = "requested quantity exceeds stock";
pub const ADD_FAILED_MESSAGE: &str = "failed to add product";
pub const REMOVE_FAILED_MESSAGE: &str = "failed to remove product";
pub const UPDATE_FAILED_MESSAGE: &str = "failed to update quantity";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    Add,
    Remove,
    Update,
    Reconcile,
}

impl CartOperation {
    pub fn failure_message(self) -> &'static str {
        match self {
            CartOperation::Add => ADD_FAILED_MESSAGE,
            CartOperation::Remove => REMOVE_FAILED_MESSAGE,
            CartOperation::Update | CartOperation::Reconcile => UPDATE_FAILED_MESSAGE,
        }
    }

    /// The single message shown to the user when this operation fails with `error`.
    pub fn message_for(self, error: &CartError) -> &'static str {
        match error {
            CartError::StockExceeded { .. } => STOCK_EXCEEDED_MESSAGE,
            _ => self.failure_message(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CartSettings {
    pub storage_key: String,
    /// Validate stock before the first add of a product, not only on increments.
    pub check_stock_on_first_add: bool,
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            check_stock_on_first_add: true,
        }
    }
}

/// Owns the authoritative cart.
///
/// Mutations run one at a time under `write_lock`: the snapshot read, the
/// remote lookups, the persist and the publish all happen inside the same
/// critical section, so interleaved callers never lose updates. Readers go
/// through the watch channel and never wait on a writer.
///
/// Mutating methods never return errors. Failures are logged and reported
/// once through the [`Notifier`].
pub struct CartStore {
    catalog: Arc<dyn ProductCatalog>,
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    settings: CartSettings,
    state: watch::Sender<Cart>,
    write_lock: Mutex<()>,
}

impl CartStore {
    pub fn new(
        catalog: Arc<dyn ProductCatalog>,
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        settings: CartSettings,
    ) -> Self {
        let cart = hydrate(storage.as_ref(), &settings.storage_key);
        let (state, _) = watch::channel(cart);

        Self {
            catalog,
            storage,
            notifier,
            settings,
            state,
            write_lock: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &CartSettings {
        &self.settings
    }

    pub fn cart(&self) -> Cart {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    pub fn total_items(&self) -> u64 {
        model::total_items(&self.state.borrow())
    }

    pub async fn add_product(&self, product_id: ProductId) {
        let _guard = self.write_lock.lock().await;
        let result = self.try_add_product(product_id).await;
        self.finish(CartOperation::Add, product_id, result);
    }

    pub async fn remove_product(&self, product_id: ProductId) {
        let _guard = self.write_lock.lock().await;
        let result = self.try_remove_product(product_id);
        self.finish(CartOperation::Remove, product_id, result);
    }

    pub async fn update_product_amount(&self, update: UpdateProductAmount) {
        let _guard = self.write_lock.lock().await;
        let result = self.try_update_product_amount(update).await;
        self.finish(CartOperation::Update, update.product_id, result);
    }

    /// Caps every entry to its current stock and drops entries that ran out.
    pub async fn reconcile_with_stock(&self) {
        let _guard = self.write_lock.lock().await;
        match self.try_reconcile().await {
            Ok(changed) => {
                tracing::debug!("Reconciled cart with stock, {} entries changed", changed);
            }
            Err(e) => self.report(CartOperation::Reconcile, &e),
        }
    }

    async fn try_add_product(&self, product_id: ProductId) -> Result<()> {
        let mut cart = self.cart();

        match model::find_index(&cart, product_id) {
            Some(index) => {
                let stock = self.catalog.fetch_stock(product_id).await?;
                let requested = u64::from(cart[index].amount) + 1;
                ensure_in_stock(product_id, requested, &stock)?;
                cart[index].amount += 1;
            }
            None => {
                if self.settings.check_stock_on_first_add {
                    let stock = self.catalog.fetch_stock(product_id).await?;
                    ensure_in_stock(product_id, 1, &stock)?;
                }

                let mut product = self.catalog.fetch_product(product_id).await?;
                if product.id != product_id {
                    tracing::warn!(
                        "Catalog returned product {} for requested id {}",
                        product.id,
                        product_id
                    );
                    product.id = product_id;
                }
                product.amount = 1;
                cart.push(product);
            }
        }

        self.commit(cart)
    }

    fn try_remove_product(&self, product_id: ProductId) -> Result<()> {
        let cart = self.cart();
        if model::find_index(&cart, product_id).is_none() {
            return Err(CartError::NotInCart { product_id });
        }

        let remaining = cart
            .into_iter()
            .filter(|product| product.id != product_id)
            .collect();
        self.commit(remaining)
    }

    async fn try_update_product_amount(&self, update: UpdateProductAmount) -> Result<()> {
        let UpdateProductAmount { product_id, amount } = update;
        if amount <= 0 {
            return Err(CartError::InvalidAmount { product_id, amount });
        }

        let mut cart = self.cart();
        let index =
            model::find_index(&cart, product_id).ok_or(CartError::NotInCart { product_id })?;

        let stock = self.catalog.fetch_stock(product_id).await?;
        let requested = amount.unsigned_abs();
        ensure_in_stock(product_id, requested, &stock)?;

        // bounded by stock.amount, which is a u32
        cart[index].amount = requested as u32;
        self.commit(cart)
    }

    async fn try_reconcile(&self) -> Result<usize> {
        let cart = self.cart();
        let mut reconciled = Vec::with_capacity(cart.len());
        let mut changed = 0;

        for mut product in cart {
            let stock = self.catalog.fetch_stock(product.id).await?;
            if stock.amount == 0 {
                tracing::info!("Product {} is out of stock, removing it from the cart", product.id);
                changed += 1;
                continue;
            }
            if product.amount > stock.amount {
                tracing::info!(
                    "Capping product {} from {} to stock of {}",
                    product.id,
                    product.amount,
                    stock.amount
                );
                product.amount = stock.amount;
                changed += 1;
            }
            reconciled.push(product);
        }

        if changed > 0 {
            self.commit(reconciled)?;
        }
        Ok(changed)
    }

    /// Persists `cart` and then publishes it. Nothing is published when the
    /// write fails, so consumers and storage never disagree.
    fn commit(&self, cart: Cart) -> Result<()> {
        let serialized = serde_json::to_string(&cart)?;
        self.storage.set(&self.settings.storage_key, &serialized)?;
        tracing::debug!(
            "Persisted cart with {} entries under '{}'",
            cart.len(),
            self.settings.storage_key
        );
        self.state.send_replace(cart);
        Ok(())
    }

    fn finish(&self, operation: CartOperation, product_id: ProductId, result: Result<()>) {
        match result {
            Ok(()) => tracing::debug!("{:?} succeeded for product {}", operation, product_id),
            Err(e) => self.report(operation, &e),
        }
    }

    fn report(&self, operation: CartOperation, error: &CartError) {
        if error.is_collaborator_failure() {
            tracing::error!("{:?} failed: {}", operation, error);
        } else if error.is_rejection() {
            tracing::warn!("{:?} rejected: {}", operation, error);
        } else {
            tracing::warn!("{:?} refused: {}", operation, error);
        }
        self.notifier.error(operation.message_for(error));
    }
}

fn ensure_in_stock(product_id: ProductId, requested: u64, stock: &Stock) -> Result<()> {
    if requested > u64::from(stock.amount) {
        return Err(CartError::StockExceeded {
            product_id,
            requested,
            available: stock.amount,
        });
    }
    Ok(())
}

fn hydrate(storage: &dyn KeyValueStore, key: &str) -> Cart {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!("No persisted cart under '{}', starting empty", key);
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!("Failed to read persisted cart, starting empty: {}", e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Cart>(&raw) {
        Ok(cart) => {
            let (cart, dropped) = model::normalize(cart);
            if dropped > 0 {
                tracing::warn!("Discarded {} invalid entries from persisted cart", dropped);
            }
            tracing::info!("Hydrated cart with {} entries", cart.len());
            cart
        }
        Err(e) => {
            tracing::warn!("Persisted cart is malformed, starting empty: {}", e);
            Vec::new()
        }
    }
}
