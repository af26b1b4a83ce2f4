//! Integration tests for `QResto`.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory tests (no database needed)
//! cargo test -p qresto-integration-tests
//!
//! # Live server tests
//! cargo run -p qresto-cli -- migrate && cargo run -p qresto-cli -- seed demo
//! cargo run -p qresto-server &
//! cargo test -p qresto-integration-tests -- --ignored
//! ```
//!
//! # Fakes
//!
//! - [`MemoryMenuSource`] - `MenuSource` over plain vectors, with injectable failures
//! - [`MemoryProvisioning`] - `ProvisioningBackend` that records every write and undo
//! - [`MemoryStorage`] - `ObjectStorage` that keeps uploads in memory

use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};

use qresto_core::{
    BrandColor, CategoryId, Email, Price, ProductId, ProfileId, RestaurantId, Role, Slug,
};
use qresto_server::db::{Conflict, RepositoryError};
use qresto_server::models::{Category, NewRestaurant, Product, Restaurant};
use qresto_server::services::menu::MenuSource;
use qresto_server::services::provisioning::ProvisioningBackend;
use qresto_server::services::storage::{ObjectStorage, StorageError};

/// A fixed instant plus `minutes`, so creation order is explicit.
#[must_use]
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
        + Duration::minutes(minutes)
}

/// A restaurant with default branding and no WiFi.
///
/// # Panics
///
/// Panics if `slug` is not a valid slug.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn restaurant(slug: &str, name: &str) -> Restaurant {
    Restaurant {
        id: RestaurantId::generate(),
        slug: Slug::parse(slug).unwrap(),
        name: name.to_owned(),
        logo_url: None,
        brand_color: BrandColor::default(),
        wifi_active: false,
        wifi_ssid: None,
        wifi_password: None,
        owner_id: None,
        created_at: at(0),
    }
}

/// A category created `minutes` after the base instant.
#[must_use]
pub fn category(restaurant: &Restaurant, name: &str, minutes: i64) -> Category {
    Category {
        id: CategoryId::generate(),
        restaurant_id: restaurant.id,
        name: name.to_owned(),
        created_at: at(minutes),
    }
}

/// A product created `minutes` after the base instant.
///
/// # Panics
///
/// Panics if `price` is negative.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn product(
    category: &Category,
    name: &str,
    price: i64,
    visible: bool,
    minutes: i64,
) -> Product {
    Product {
        id: ProductId::generate(),
        restaurant_id: category.restaurant_id,
        category_id: category.id,
        name: name.to_owned(),
        description: None,
        price: Price::new(price).unwrap(),
        price_without_tax: None,
        image_url: None,
        is_visible: visible,
        created_at: at(minutes),
    }
}

/// Which read of [`MemoryMenuSource`] should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Restaurant,
    Categories,
    Products,
}

fn backend_down() -> RepositoryError {
    RepositoryError::DataCorruption("backend unavailable".to_owned())
}

/// In-memory tenant store for the menu resolver.
///
/// Rows are returned in insertion order, not sorted, so callers cannot rely
/// on the store for ordering.
#[derive(Debug, Default)]
pub struct MemoryMenuSource {
    restaurants: Vec<Restaurant>,
    categories: Vec<Category>,
    products: Mutex<Vec<Product>>,
    fail_at: Option<FailAt>,
}

impl MemoryMenuSource {
    #[must_use]
    pub fn new(restaurants: Vec<Restaurant>, categories: Vec<Category>, products: Vec<Product>) -> Self {
        Self {
            restaurants,
            categories,
            products: Mutex::new(products),
            fail_at: None,
        }
    }

    /// Make one of the reads fail.
    #[must_use]
    pub fn failing_at(mut self, step: FailAt) -> Self {
        self.fail_at = Some(step);
        self
    }

    /// Flip a product's visibility. Returns whether the product exists.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn set_visibility(&self, id: ProductId, visible: bool) -> bool {
        let mut products = self.products.lock().unwrap();
        products
            .iter_mut()
            .find(|p| p.id == id)
            .map(|p| p.is_visible = visible)
            .is_some()
    }
}

impl MenuSource for MemoryMenuSource {
    async fn restaurant_by_slug(&self, slug: &Slug) -> Result<Option<Restaurant>, RepositoryError> {
        if self.fail_at == Some(FailAt::Restaurant) {
            return Err(backend_down());
        }
        Ok(self.restaurants.iter().find(|r| &r.slug == slug).cloned())
    }

    async fn categories(&self, restaurant_id: RestaurantId) -> Result<Vec<Category>, RepositoryError> {
        if self.fail_at == Some(FailAt::Categories) {
            return Err(backend_down());
        }
        Ok(self
            .categories
            .iter()
            .filter(|c| c.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    async fn visible_products(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Product>, RepositoryError> {
        if self.fail_at == Some(FailAt::Products) {
            return Err(backend_down());
        }
        let products = self.products.lock().map_err(|_| backend_down())?;
        Ok(products
            .iter()
            .filter(|p| p.restaurant_id == restaurant_id && p.is_visible)
            .cloned()
            .collect())
    }
}

/// Rows held by [`MemoryProvisioning`].
#[derive(Debug, Default)]
pub struct ProvisioningRows {
    pub identities: Vec<(ProfileId, Email)>,
    pub profiles: Vec<(ProfileId, Role)>,
    pub restaurants: Vec<Restaurant>,
    /// Every write and undo, in order.
    pub calls: Vec<&'static str>,
}

/// In-memory provisioning backend with injectable failures.
#[derive(Debug, Default)]
pub struct MemoryProvisioning {
    pub rows: Mutex<ProvisioningRows>,
    pub fail_profile: bool,
    pub fail_restaurant: bool,
    pub fail_undo: bool,
}

impl MemoryProvisioning {
    /// Snapshot of `(identities, profiles, restaurants)` counts.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn counts(&self) -> (usize, usize, usize) {
        let rows = self.rows.lock().unwrap();
        (rows.identities.len(), rows.profiles.len(), rows.restaurants.len())
    }

    /// The recorded call log.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn calls(&self) -> Vec<&'static str> {
        self.rows.lock().unwrap().calls.clone()
    }

    fn with_rows<T>(&self, f: impl FnOnce(&mut ProvisioningRows) -> T) -> Result<T, RepositoryError> {
        let mut rows = self.rows.lock().map_err(|_| backend_down())?;
        Ok(f(&mut rows))
    }
}

impl ProvisioningBackend for MemoryProvisioning {
    async fn create_identity(
        &self,
        email: &Email,
        _password_hash: &str,
    ) -> Result<ProfileId, RepositoryError> {
        self.with_rows(|rows| {
            rows.calls.push("create_identity");
            if rows.identities.iter().any(|(_, e)| e == email) {
                return Err(RepositoryError::Conflict(Conflict::EmailTaken));
            }
            let id = ProfileId::generate();
            rows.identities.push((id, email.clone()));
            Ok(id)
        })?
    }

    async fn delete_identity(&self, id: ProfileId) -> Result<(), RepositoryError> {
        let fail = self.fail_undo;
        self.with_rows(|rows| {
            rows.calls.push("delete_identity");
            if fail {
                return Err(backend_down());
            }
            rows.identities.retain(|(i, _)| *i != id);
            Ok(())
        })?
    }

    async fn insert_profile(
        &self,
        id: ProfileId,
        _email: &Email,
        role: Role,
    ) -> Result<(), RepositoryError> {
        let fail = self.fail_profile;
        self.with_rows(|rows| {
            rows.calls.push("insert_profile");
            if fail {
                return Err(backend_down());
            }
            rows.profiles.push((id, role));
            Ok(())
        })?
    }

    async fn delete_profile(&self, id: ProfileId) -> Result<(), RepositoryError> {
        let fail = self.fail_undo;
        self.with_rows(|rows| {
            rows.calls.push("delete_profile");
            if fail {
                return Err(backend_down());
            }
            rows.profiles.retain(|(i, _)| *i != id);
            Ok(())
        })?
    }

    async fn insert_restaurant(&self, new: &NewRestaurant) -> Result<Restaurant, RepositoryError> {
        let fail = self.fail_restaurant;
        self.with_rows(|rows| {
            rows.calls.push("insert_restaurant");
            if fail {
                return Err(backend_down());
            }
            if rows.restaurants.iter().any(|r| r.slug == new.slug) {
                return Err(RepositoryError::Conflict(Conflict::SlugTaken));
            }
            let restaurant = Restaurant {
                id: RestaurantId::generate(),
                slug: new.slug.clone(),
                name: new.name.clone(),
                logo_url: None,
                brand_color: BrandColor::default(),
                wifi_active: false,
                wifi_ssid: None,
                wifi_password: None,
                owner_id: Some(new.owner_id),
                created_at: Utc::now(),
            };
            rows.restaurants.push(restaurant.clone());
            Ok(restaurant)
        })?
    }
}

/// Object storage that keeps `(key, size)` pairs in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    pub objects: Mutex<Vec<(String, usize)>>,
    pub fail: bool,
}

impl MemoryStorage {
    /// Stored keys, in write order.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }
}

impl ObjectStorage for MemoryStorage {
    async fn put(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        if self.fail {
            return Err(StorageError::Io(std::io::Error::other("bucket unavailable")));
        }
        self.objects
            .lock()
            .map_err(|_| StorageError::InvalidKey(key.to_owned()))?
            .push((key.to_owned(), data.len()));
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://media.qresto.test/{key}")
    }
}
