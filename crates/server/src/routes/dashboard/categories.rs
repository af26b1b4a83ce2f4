//! Category management.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use qresto_core::CategoryId;

use super::{DashboardLayout, FlashQuery};
use crate::db::CategoryRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireOwner;
use crate::models::Category;
use crate::routes::wants_fragment;
use crate::state::AppState;

/// Category create form.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub name: String,
}

/// Category display data for templates.
#[derive(Debug, Clone)]
pub struct CategoryRow {
    pub id: String,
    pub name: String,
    pub created: String,
}

impl From<&Category> for CategoryRow {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.clone(),
            created: category.created_at.format("%d/%m/%Y").to_string(),
        }
    }
}

/// Category list page.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/categories.html")]
pub struct CategoriesTemplate {
    pub layout: DashboardLayout,
    pub categories: Vec<CategoryRow>,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// A single `<li>` appended by the page after a create.
#[derive(Template, WebTemplate)]
#[template(path = "partials/category_row.html")]
pub struct CategoryRowTemplate {
    pub category: CategoryRow,
}

/// List categories, oldest first.
#[instrument(skip_all, fields(restaurant_id = %owner.restaurant.id))]
pub async fn index(
    owner: RequireOwner,
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> Result<impl IntoResponse> {
    let categories = CategoryRepository::new(state.pool())
        .list(owner.restaurant.id)
        .await?;

    Ok(CategoriesTemplate {
        layout: DashboardLayout::new(&owner, &state, "/dashboard/categories"),
        categories: categories.iter().map(CategoryRow::from).collect(),
        error: flash.error_message(),
        success: flash.success_message(),
    })
}

/// Create a category.
///
/// Enhanced requests get the new row; plain form posts are redirected back.
#[instrument(skip_all, fields(restaurant_id = %owner.restaurant.id))]
pub async fn create(
    owner: RequireOwner,
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CategoryForm>,
) -> Response {
    let fragment = wants_fragment(&headers);
    let name = form.name.trim();
    if name.is_empty() {
        return if fragment {
            (StatusCode::BAD_REQUEST, Html("El nombre es obligatorio.")).into_response()
        } else {
            Redirect::to("/dashboard/categories?error=name").into_response()
        };
    }

    match CategoryRepository::new(state.pool())
        .create(owner.restaurant.id, name)
        .await
    {
        Ok(category) => {
            tracing::info!(category_id = %category.id, "Category created");
            if fragment {
                (
                    [("HX-Trigger", "category-created")],
                    CategoryRowTemplate {
                        category: CategoryRow::from(&category),
                    },
                )
                    .into_response()
            } else {
                Redirect::to("/dashboard/categories?success=created").into_response()
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create category");
            if fragment {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("No se pudo crear la categoría."),
                )
                    .into_response()
            } else {
                Redirect::to("/dashboard/categories?error=server").into_response()
            }
        }
    }
}

/// Hard-delete a category. Refused with 409 while it still has products.
#[instrument(skip_all, fields(restaurant_id = %owner.restaurant.id, category_id = %id))]
pub async fn delete(
    owner: RequireOwner,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<StatusCode> {
    CategoryRepository::new(state.pool())
        .delete(owner.restaurant.id, id)
        .await?;
    tracing::info!("Category deleted");
    Ok(StatusCode::NO_CONTENT)
}
