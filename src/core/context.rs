use crate::core::cart_store::CartStore;
use crate::domain::model::{Cart, ProductId, UpdateProductAmount};
use crate::utils::error::{CartError, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

tokio::task_local! {
    static CURRENT_CART: CartContext;
}

/// Owns the session's single [`CartStore`] and installs it for everything
/// running inside [`CartProvider::scope`].
pub struct CartProvider {
    store: Arc<CartStore>,
}

impl CartProvider {
    pub fn new(store: CartStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn context(&self) -> CartContext {
        CartContext {
            store: self.store.clone(),
        }
    }

    /// Runs `fut` with the cart reachable through [`use_cart`].
    pub async fn scope<F: Future>(&self, fut: F) -> F::Output {
        CURRENT_CART.scope(self.context(), fut).await
    }
}

/// Consumer handle: a live view of the cart plus the mutating operations.
#[derive(Clone)]
pub struct CartContext {
    store: Arc<CartStore>,
}

impl CartContext {
    pub fn cart(&self) -> Cart {
        self.store.cart()
    }

    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.store.subscribe()
    }

    pub fn total_items(&self) -> u64 {
        self.store.total_items()
    }

    pub async fn add_product(&self, product_id: ProductId) {
        self.store.add_product(product_id).await
    }

    pub async fn remove_product(&self, product_id: ProductId) {
        self.store.remove_product(product_id).await
    }

    pub async fn update_product_amount(&self, update: UpdateProductAmount) {
        self.store.update_product_amount(update).await
    }

    pub async fn reconcile_with_stock(&self) {
        self.store.reconcile_with_stock().await
    }
}

pub fn try_use_cart() -> Option<CartContext> {
    CURRENT_CART.try_with(|context| context.clone()).ok()
}

pub fn use_cart() -> Result<CartContext> {
    try_use_cart().ok_or(CartError::NoProvider)
}
