//! Demo data.
//!
//! Creates the "el-faro" restaurant with an owner account, two categories
//! and two products, one of them hidden. The public menu at `/el-faro`
//! then shows only "Platos" with "Pizza" at `$8.500`.

use qresto_core::Price;
use qresto_server::db::{CategoryRepository, ProductRepository, ProvisioningRepository};
use qresto_server::models::NewProduct;
use qresto_server::services::provisioning::{ProvisionError, ShopRequest, provision_shop};

use super::{CliError, connect};

/// Owner login of the demo restaurant.
pub const DEMO_EMAIL: &str = "duenio@elfaro.demo";
/// Owner password of the demo restaurant.
pub const DEMO_PASSWORD: &str = "elfaro-demo";

/// Seed the demo restaurant. Does nothing if the slug is already taken.
///
/// # Errors
///
/// Returns `CliError` if any write fails.
pub async fn demo() -> Result<(), CliError> {
    let pool = connect().await?;

    let request = ShopRequest {
        name: "El Faro".to_owned(),
        slug: "el-faro".to_owned(),
        email: DEMO_EMAIL.to_owned(),
        password: DEMO_PASSWORD.to_owned(),
    };
    let restaurant = match provision_shop(&ProvisioningRepository::new(&pool), request).await {
        Ok(restaurant) => restaurant,
        Err(ProvisionError::SlugTaken | ProvisionError::EmailTaken) => {
            tracing::info!("Demo restaurant already exists, nothing to do");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let categories = CategoryRepository::new(&pool);
    let entradas = categories.create(restaurant.id, "Entradas").await?;
    let platos = categories.create(restaurant.id, "Platos").await?;

    let products = ProductRepository::new(&pool);
    products
        .create(
            restaurant.id,
            &NewProduct {
                category_id: platos.id,
                name: "Pizza".to_owned(),
                description: Some("Muzzarella, tomate y albahaca.".to_owned()),
                price: Price::new(8500)?,
                price_without_tax: None,
                image_url: None,
            },
        )
        .await?;
    let sopa = products
        .create(
            restaurant.id,
            &NewProduct {
                category_id: entradas.id,
                name: "Sopa".to_owned(),
                description: None,
                price: Price::new(3000)?,
                price_without_tax: None,
                image_url: None,
            },
        )
        .await?;
    products
        .set_visibility(restaurant.id, sopa.id, false)
        .await?;

    tracing::info!(
        restaurant_id = %restaurant.id,
        email = DEMO_EMAIL,
        "Demo restaurant created at /el-faro"
    );
    Ok(())
}
