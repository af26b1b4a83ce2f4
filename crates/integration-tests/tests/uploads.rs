//! Image uploads through the object-storage seam.

#![allow(clippy::unwrap_used)]

use qresto_core::RestaurantId;
use qresto_integration_tests::MemoryStorage;
use qresto_server::services::storage::{
    ImageUpload, StorageError, UploadKind, store_image, store_image_or_skip,
};

fn upload(name: &str) -> ImageUpload {
    ImageUpload {
        file_name: name.to_string(),
        data: vec![7u8; 32],
    }
}

#[tokio::test]
async fn test_product_image_key_is_scoped_to_restaurant() {
    let storage = MemoryStorage::default();
    let restaurant_id = RestaurantId::generate();

    let url = store_image(
        &storage,
        restaurant_id,
        UploadKind::ProductImage,
        &upload("pizza.jpg"),
        1024,
    )
    .await
    .unwrap();

    let keys = storage.keys();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].starts_with(&format!("{restaurant_id}/")));
    assert_eq!(url, format!("https://media.qresto.test/{}", keys[0]));
}

#[tokio::test]
async fn test_logo_key_prefix() {
    let storage = MemoryStorage::default();
    let restaurant_id = RestaurantId::generate();

    store_image(&storage, restaurant_id, UploadKind::Logo, &upload("logo.PNG"), 1024)
        .await
        .unwrap();

    let key = &storage.keys()[0];
    assert!(key.starts_with(&format!("{restaurant_id}/logo-")));
    assert!(key.ends_with(".png"));
}

#[tokio::test]
async fn test_storage_failure_propagates() {
    let storage = MemoryStorage {
        fail: true,
        ..MemoryStorage::default()
    };

    let err = store_image(
        &storage,
        RestaurantId::generate(),
        UploadKind::ProductImage,
        &upload("pizza.jpg"),
        1024,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, StorageError::Io(_)));
}

#[tokio::test]
async fn test_skip_variant_yields_none_on_failure() {
    let storage = MemoryStorage {
        fail: true,
        ..MemoryStorage::default()
    };

    let url = store_image_or_skip(
        &storage,
        RestaurantId::generate(),
        UploadKind::ProductImage,
        &upload("pizza.jpg"),
        1024,
    )
    .await;

    assert_eq!(url, None);
}

#[tokio::test]
async fn test_rejected_upload_never_reaches_storage() {
    let storage = MemoryStorage::default();

    let url = store_image_or_skip(
        &storage,
        RestaurantId::generate(),
        UploadKind::ProductImage,
        &upload("carta.pdf"),
        1024,
    )
    .await;

    assert_eq!(url, None);
    assert!(storage.keys().is_empty());
}
