//! File-backed cart storage across engine lifetimes.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use rocketshoes_cart::notify::ChannelNotifier;
use rocketshoes_cart::services::FixtureInventory;
use rocketshoes_cart::storage::{CartStorage, FileStore};
use rocketshoes_cart::{CartEngine, Collaborators, UpdateProductAmount};
use rocketshoes_core::ProductId;
use rocketshoes_integration_tests::{amounts, product};

fn engine(dir: &std::path::Path, inventory: &FixtureInventory) -> CartEngine {
    let (notifier, _rx) = ChannelNotifier::channel();
    CartEngine::create(Collaborators {
        stock: Arc::new(inventory.clone()),
        catalog: Arc::new(inventory.clone()),
        storage: CartStorage::new(Arc::new(FileStore::new(dir)), CartStorage::DEFAULT_KEY),
        notifier: Arc::new(notifier),
    })
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let inventory = FixtureInventory::new()
        .with_product(product(1), 5)
        .with_product(product(2), 5);

    let mut first = engine(dir.path(), &inventory);
    assert!(first.add_product(ProductId::new(2)).await.is_committed());
    assert!(first.add_product(ProductId::new(1)).await.is_committed());
    let update = UpdateProductAmount {
        product_id: ProductId::new(1),
        amount: 3,
    };
    assert!(first.update_product_amount(update).await.is_committed());
    let committed = first.dispose();

    let second = engine(dir.path(), &inventory);
    assert_eq!(second.cart(), &committed);
    assert_eq!(amounts(second.cart()), vec![(2, 1), (1, 3)]);
}

#[tokio::test]
async fn test_corrupt_file_starts_empty_and_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    let path = store.path_for(CartStorage::DEFAULT_KEY);
    std::fs::write(&path, "{not json").unwrap();

    let inventory = FixtureInventory::new().with_product(product(1), 5);
    let mut engine = engine(dir.path(), &inventory);
    assert!(engine.cart().is_empty());

    assert!(engine.add_product(ProductId::new(1)).await.is_committed());

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(stored.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_fixture_file_drives_engine() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = dir.path().join("db.json");
    std::fs::write(
        &fixture,
        r#"{
            "products": [
                { "id": 1, "title": "Tênis de Caminhada Leve Confortável", "price": 179.9, "image": "https://cdn.rocketshoes.test/1.jpg" }
            ],
            "stock": [{ "id": 1, "amount": 1 }]
        }"#,
    )
    .unwrap();

    let inventory = FixtureInventory::from_path(&fixture).unwrap();
    let mut engine = engine(&dir.path().join("state"), &inventory);

    assert!(engine.add_product(ProductId::new(1)).await.is_committed());
    assert!(engine.add_product(ProductId::new(1)).await.is_rejected());
    assert_eq!(engine.summary().subtotal.to_string(), "$179.90");
}
