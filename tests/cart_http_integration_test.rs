use httpmock::prelude::*;
use rocket_cart::core::cart_store::{
    ADD_FAILED_MESSAGE, DEFAULT_STORAGE_KEY, STOCK_EXCEEDED_MESSAGE,
};
use rocket_cart::core::KeyValueStore;
use rocket_cart::{
    use_cart, CartProvider, CartSettings, CartStore, FileStore, HttpCatalog, MemoryNotifier,
    Product, UpdateProductAmount,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn open_store(
    server: &MockServer,
    storage_path: &Path,
    notifier: Arc<MemoryNotifier>,
) -> CartStore {
    let catalog = HttpCatalog::new(server.base_url(), Duration::from_secs(5)).unwrap();
    CartStore::new(
        Arc::new(catalog),
        Arc::new(FileStore::new(storage_path)),
        notifier,
        CartSettings::default(),
    )
}

fn seed(storage_path: &Path, cart: &[Product]) {
    FileStore::new(storage_path)
        .set(DEFAULT_STORAGE_KEY, &serde_json::to_string(cart).unwrap())
        .unwrap();
}

fn persisted(storage_path: &Path) -> Vec<Product> {
    let raw = FileStore::new(storage_path)
        .get(DEFAULT_STORAGE_KEY)
        .unwrap()
        .unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[tokio::test]
async fn test_add_to_empty_cart_over_http() {
    let temp_dir = TempDir::new().unwrap();
    let storage_path = temp_dir.path().join("storage.json");

    let server = MockServer::start_async().await;
    let stock_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/stock/1");
            then.status(200).json_body(serde_json::json!({"id": 1, "amount": 3}));
        })
        .await;
    let product_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/products/1");
            then.status(200).json_body(serde_json::json!({
                "id": 1,
                "title": "Tênis de Caminhada Leve Confortável",
                "price": 179.9,
                "image": "https://example.com/1.jpg"
            }));
        })
        .await;

    let notifier = Arc::new(MemoryNotifier::new());
    let store = open_store(&server, &storage_path, notifier.clone());

    store.add_product(1).await;

    stock_mock.assert_async().await;
    product_mock.assert_async().await;
    let cart = store.cart();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0].amount, 1);
    assert_eq!(cart[0].details["price"], 179.9);
    assert_eq!(persisted(&storage_path), cart);
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn test_increment_beyond_stock_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let storage_path = temp_dir.path().join("storage.json");
    seed(&storage_path, &[Product::new(1, 2)]);

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/stock/1");
            then.status(200).json_body(serde_json::json!({"id": 1, "amount": 2}));
        })
        .await;

    let notifier = Arc::new(MemoryNotifier::new());
    let store = open_store(&server, &storage_path, notifier.clone());

    store.add_product(1).await;

    assert_eq!(store.cart(), vec![Product::new(1, 2)]);
    assert_eq!(persisted(&storage_path), vec![Product::new(1, 2)]);
    assert_eq!(notifier.messages(), vec![STOCK_EXCEEDED_MESSAGE]);
}

#[tokio::test]
async fn test_update_amount_and_rehydrate() {
    let temp_dir = TempDir::new().unwrap();
    let storage_path = temp_dir.path().join("storage.json");
    seed(&storage_path, &[Product::new(1, 1)]);

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/stock/1");
            then.status(200).json_body(serde_json::json!({"id": 1, "amount": 10}));
        })
        .await;

    let notifier = Arc::new(MemoryNotifier::new());
    let store = open_store(&server, &storage_path, notifier.clone());
    store
        .update_product_amount(UpdateProductAmount {
            product_id: 1,
            amount: 5,
        })
        .await;
    assert_eq!(store.cart(), vec![Product::new(1, 5)]);
    drop(store);

    let reopened = open_store(&server, &storage_path, notifier.clone());
    assert_eq!(reopened.cart(), vec![Product::new(1, 5)]);
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn test_server_error_reports_add_failure() {
    let temp_dir = TempDir::new().unwrap();
    let storage_path = temp_dir.path().join("storage.json");

    let server = MockServer::start_async().await;
    let stock_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/stock/2");
            then.status(500);
        })
        .await;

    let notifier = Arc::new(MemoryNotifier::new());
    let store = open_store(&server, &storage_path, notifier.clone());

    store.add_product(2).await;

    stock_mock.assert_async().await;
    assert!(store.cart().is_empty());
    assert!(!storage_path.exists());
    assert_eq!(notifier.messages(), vec![ADD_FAILED_MESSAGE]);
}

#[tokio::test]
async fn test_slow_catalog_times_out_as_failure() {
    let temp_dir = TempDir::new().unwrap();
    let storage_path = temp_dir.path().join("storage.json");
    seed(&storage_path, &[Product::new(4, 1)]);

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/stock/4");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(serde_json::json!({"id": 4, "amount": 10}));
        })
        .await;

    let catalog = HttpCatalog::new(server.base_url(), Duration::from_millis(50)).unwrap();
    let notifier = Arc::new(MemoryNotifier::new());
    let store = CartStore::new(
        Arc::new(catalog),
        Arc::new(FileStore::new(&storage_path)),
        notifier.clone(),
        CartSettings::default(),
    );

    store.add_product(4).await;

    assert_eq!(store.cart(), vec![Product::new(4, 1)]);
    assert_eq!(notifier.messages(), vec![ADD_FAILED_MESSAGE]);
}

#[tokio::test]
async fn test_provider_scope_drives_operations() {
    let temp_dir = TempDir::new().unwrap();
    let storage_path = temp_dir.path().join("storage.json");

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/stock/3");
            then.status(200).json_body(serde_json::json!({"id": 3, "amount": 2}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/products/3");
            then.status(200)
                .json_body(serde_json::json!({"id": 3, "title": "Tênis Nike Revolution"}));
        })
        .await;

    let notifier = Arc::new(MemoryNotifier::new());
    let provider = CartProvider::new(open_store(&server, &storage_path, notifier.clone()));

    let total = provider
        .scope(async {
            let cart = use_cart().unwrap();
            cart.add_product(3).await;
            cart.add_product(3).await;
            cart.add_product(3).await;
            cart.total_items()
        })
        .await;

    assert_eq!(total, 2);
    assert_eq!(notifier.messages(), vec![STOCK_EXCEEDED_MESSAGE]);
    assert_eq!(persisted(&storage_path)[0].amount, 2);

    tokio_test::assert_ok!(provider
        .scope(async {
            let cart = use_cart()?;
            cart.remove_product(3).await;
            Ok::<_, rocket_cart::CartError>(cart.cart())
        })
        .await);
    assert!(persisted(&storage_path).is_empty());
}
