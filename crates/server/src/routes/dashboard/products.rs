//! Product management.
//!
//! Creation takes a multipart form so an image can travel with the row.
//! A failed upload never blocks the insert: the product is saved without
//! an image and the owner is told.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use qresto_core::{CategoryId, Price, ProductId, RestaurantId};

use super::{DashboardLayout, FlashQuery, MultipartForm, NOTICE_HEADER, read_multipart};
use crate::db::{CategoryRepository, ProductRepository};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireOwner;
use crate::models::{Category, NewProduct, Product, ProductFilter};
use crate::routes::wants_fragment;
use crate::services::storage::{UploadKind, store_image_or_skip};
use crate::state::AppState;

/// `GET /dashboard/products` query.
#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    #[serde(flatten)]
    pub flash: FlashQuery,
}

impl ProductQuery {
    /// The repository filter. Unparseable category ids are ignored.
    #[must_use]
    pub fn filter(&self) -> ProductFilter {
        ProductFilter {
            search: self
                .q
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(str::to_owned),
            category_id: self
                .category
                .as_deref()
                .and_then(|c| c.parse::<CategoryId>().ok()),
        }
    }
}

/// Body of `POST /dashboard/products/{id}/visibility`.
#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub visible: bool,
}

/// The stored visibility after a toggle.
#[derive(Debug, Serialize)]
pub struct VisibilityResponse {
    pub id: ProductId,
    pub is_visible: bool,
}

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub category_name: String,
    pub price: String,
    pub price_without_tax: Option<String>,
    pub image_url: Option<String>,
    pub is_visible: bool,
}

impl ProductRow {
    fn new(product: &Product, categories: &[Category]) -> Self {
        let category_name = categories
            .iter()
            .find(|c| c.id == product.category_id)
            .map_or_else(String::new, |c| c.name.clone());
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            category_name,
            price: product.price.to_string(),
            price_without_tax: product.price_without_tax.map(|p| p.to_string()),
            image_url: product.image_url.clone(),
            is_visible: product.is_visible,
        }
    }
}

/// Category option for the filter and create selects.
#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

/// Product list page.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/products.html")]
pub struct ProductsTemplate {
    pub layout: DashboardLayout,
    pub products: Vec<ProductRow>,
    pub categories: Vec<CategoryOption>,
    pub search: String,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
    pub notice: Option<&'static str>,
}

/// A single table row returned after a create.
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_row.html")]
pub struct ProductRowTemplate {
    pub product: ProductRow,
}

/// Why a submitted product was rejected. The code feeds `?error=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductFormError {
    Name,
    Price,
    Category,
}

impl ProductFormError {
    const fn code(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::Category => "category",
        }
    }

    const fn message(self) -> &'static str {
        match self {
            Self::Name => "El nombre es obligatorio.",
            Self::Price => "Ingresá un precio válido.",
            Self::Category => "Elegí una categoría existente.",
        }
    }
}

/// Validate the text fields of the create form. `image_url` is left empty.
///
/// # Errors
///
/// Returns the first invalid field.
pub fn parse_new_product(form: &MultipartForm) -> std::result::Result<NewProduct, ProductFormError> {
    let name = form.text("name").ok_or(ProductFormError::Name)?;
    let price = Price::parse_input(form.text("price").unwrap_or_default())
        .map_err(|_| ProductFormError::Price)?;
    let price_without_tax =
        Price::parse_optional_input(form.text("price_without_tax").unwrap_or_default())
            .map_err(|_| ProductFormError::Price)?;
    let category_id = form
        .text("category_id")
        .and_then(|id| id.parse::<CategoryId>().ok())
        .ok_or(ProductFormError::Category)?;

    Ok(NewProduct {
        category_id,
        name: name.to_owned(),
        description: form.text("description").map(str::to_owned),
        price,
        price_without_tax,
        image_url: None,
    })
}

/// List products, newest first, with optional search and category filter.
#[instrument(skip_all, fields(restaurant_id = %owner.restaurant.id))]
pub async fn index(
    owner: RequireOwner,
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<impl IntoResponse> {
    let restaurant_id = owner.restaurant.id;
    let filter = query.filter();
    let categories = CategoryRepository::new(state.pool())
        .list(restaurant_id)
        .await?;
    let products = ProductRepository::new(state.pool())
        .list(restaurant_id, &filter)
        .await?;

    Ok(ProductsTemplate {
        layout: DashboardLayout::new(&owner, &state, "/dashboard/products"),
        products: products
            .iter()
            .map(|p| ProductRow::new(p, &categories))
            .collect(),
        categories: categories
            .iter()
            .map(|c| CategoryOption {
                id: c.id.to_string(),
                name: c.name.clone(),
                selected: filter.category_id == Some(c.id),
            })
            .collect(),
        search: filter.search.unwrap_or_default(),
        error: query.flash.error_message(),
        success: query.flash.success_message(),
        notice: query.flash.notice_message(),
    })
}

fn reject(fragment: bool, status: StatusCode, code: &str, message: &'static str) -> Response {
    if fragment {
        (status, Html(message)).into_response()
    } else {
        Redirect::to(&format!("/dashboard/products?error={code}")).into_response()
    }
}

/// Create a product from a multipart form.
#[instrument(skip_all, fields(restaurant_id = %owner.restaurant.id))]
pub async fn create(
    owner: RequireOwner,
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let fragment = wants_fragment(&headers);
    let restaurant_id = owner.restaurant.id;

    let mut form = match read_multipart(multipart).await {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable product form");
            return reject(
                fragment,
                StatusCode::BAD_REQUEST,
                "upload",
                "No pudimos leer el formulario enviado.",
            );
        }
    };

    let mut new_product = match parse_new_product(&form) {
        Ok(product) => product,
        Err(e) => return reject(fragment, StatusCode::BAD_REQUEST, e.code(), e.message()),
    };

    let categories = match CategoryRepository::new(state.pool()).list(restaurant_id).await {
        Ok(categories) => categories,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load categories");
            return reject(
                fragment,
                StatusCode::INTERNAL_SERVER_ERROR,
                "server",
                "No se pudo crear el producto.",
            );
        }
    };
    if !categories.iter().any(|c| c.id == new_product.category_id) {
        let e = ProductFormError::Category;
        return reject(fragment, StatusCode::BAD_REQUEST, e.code(), e.message());
    }

    let mut image_failed = false;
    if let Some(upload) = form.take_file("image") {
        new_product.image_url = store_image_or_skip(
            state.storage(),
            restaurant_id,
            UploadKind::ProductImage,
            &upload,
            state.config().max_upload_bytes,
        )
        .await;
        image_failed = new_product.image_url.is_none();
    }

    match insert_product(&state, restaurant_id, &new_product).await {
        Ok(product) => {
            let row = ProductRow::new(&product, &categories);
            if fragment {
                let notice = if image_failed { "image" } else { "" };
                (
                    [("HX-Trigger", "product-created"), (NOTICE_HEADER, notice)],
                    ProductRowTemplate { product: row },
                )
                    .into_response()
            } else if image_failed {
                Redirect::to("/dashboard/products?success=created&notice=image").into_response()
            } else {
                Redirect::to("/dashboard/products?success=created").into_response()
            }
        }
        Err(status) => reject(fragment, status, "server", "No se pudo crear el producto."),
    }
}

async fn insert_product(
    state: &AppState,
    restaurant_id: RestaurantId,
    new_product: &NewProduct,
) -> std::result::Result<Product, StatusCode> {
    match ProductRepository::new(state.pool())
        .create(restaurant_id, new_product)
        .await
    {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "Product created");
            Ok(product)
        }
        Err(crate::db::RepositoryError::Conflict(conflict)) => {
            tracing::warn!(reason = %conflict, "Product rejected by store");
            Err(StatusCode::CONFLICT)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create product");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Hard-delete a product.
#[instrument(skip_all, fields(restaurant_id = %owner.restaurant.id, product_id = %id))]
pub async fn delete(
    owner: RequireOwner,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    ProductRepository::new(state.pool())
        .delete(owner.restaurant.id, id)
        .await?;
    tracing::info!("Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Set visibility and answer with the stored value.
///
/// The page shows the requested state right away and reconciles with this
/// response, or reverts when the request fails.
#[instrument(skip_all, fields(restaurant_id = %owner.restaurant.id, product_id = %id))]
pub async fn set_visibility(
    owner: RequireOwner,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(body): Json<VisibilityRequest>,
) -> Result<Json<VisibilityResponse>> {
    let product = ProductRepository::new(state.pool())
        .set_visibility(owner.restaurant.id, id, body.visible)
        .await?;
    tracing::info!(is_visible = product.is_visible, "Visibility changed");
    Ok(Json(VisibilityResponse {
        id: product.id,
        is_visible: product.is_visible,
    }))
}
