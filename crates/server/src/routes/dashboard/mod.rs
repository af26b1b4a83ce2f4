//! Owner dashboard.
//!
//! Every handler takes [`RequireOwner`], so the restaurant is resolved
//! from the signed-in owner once per request and every query below is
//! scoped by its id.

pub mod categories;
pub mod products;
pub mod settings;

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Multipart, State},
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde::Deserialize;
use tracing::instrument;

use crate::db::{CategoryRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireOwner;
use crate::services::storage::ImageUpload;
use crate::state::AppState;

/// Response header carrying a non-fatal notice for enhanced requests.
pub const NOTICE_HEADER: &str = "x-qresto-notice";

/// Data every dashboard page shows in its chrome.
#[derive(Debug, Clone)]
pub struct DashboardLayout {
    pub restaurant_name: String,
    pub user_email: String,
    pub menu_url: String,
    pub current_path: &'static str,
}

impl DashboardLayout {
    #[must_use]
    pub fn new(owner: &RequireOwner, state: &AppState, current_path: &'static str) -> Self {
        Self {
            restaurant_name: owner.restaurant.name.clone(),
            user_email: owner.user.email.to_string(),
            menu_url: state.config().menu_url(owner.restaurant.slug.as_str()),
            current_path,
        }
    }
}

/// `?error=`, `?success=` and `?notice=` codes left by a redirect.
#[derive(Debug, Default, Deserialize)]
pub struct FlashQuery {
    pub error: Option<String>,
    pub success: Option<String>,
    pub notice: Option<String>,
}

impl FlashQuery {
    /// User-facing error text.
    #[must_use]
    pub fn error_message(&self) -> Option<&'static str> {
        self.error.as_deref().map(|code| match code {
            "name" => "El nombre es obligatorio.",
            "price" => "Ingresá un precio válido.",
            "category" => "Elegí una categoría existente.",
            "color" => "El color debe tener el formato #rrggbb.",
            "upload" => "No pudimos leer el formulario enviado.",
            _ => "Ocurrió un error. Intentá de nuevo.",
        })
    }

    /// User-facing success text.
    #[must_use]
    pub fn success_message(&self) -> Option<&'static str> {
        self.success.as_deref().map(|code| match code {
            "created" => "Creado correctamente.",
            "saved" => "Cambios guardados.",
            _ => "Listo.",
        })
    }

    /// User-facing notice text.
    #[must_use]
    pub fn notice_message(&self) -> Option<&'static str> {
        self.notice.as_deref().map(|code| match code {
            "image" => "Se guardó sin imagen: no pudimos subir el archivo.",
            "logo" => "Se guardó sin logo: no pudimos subir el archivo.",
            _ => "Revisá los datos guardados.",
        })
    }
}

/// A multipart form split into text fields and files.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, ImageUpload>,
}

impl MultipartForm {
    /// Trimmed text value, `None` when absent or blank.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Whether a checkbox was ticked.
    #[must_use]
    pub fn checked(&self, name: &str) -> bool {
        self.text(name)
            .is_some_and(|v| matches!(v, "on" | "true" | "1"))
    }

    /// Take an uploaded file. Fields without a selected file are absent.
    pub fn take_file(&mut self, name: &str) -> Option<ImageUpload> {
        self.files.remove(name)
    }
}

/// Read every multipart field. File fields are those with a file name.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the body is not valid multipart or
/// exceeds the body limit.
pub async fn read_multipart(mut multipart: Multipart) -> Result<MultipartForm> {
    let mut form = MultipartForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        match field.file_name().map(str::to_owned) {
            Some(file_name) => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                if !file_name.is_empty() && !data.is_empty() {
                    form.files.insert(
                        name,
                        ImageUpload {
                            file_name,
                            data: data.to_vec(),
                        },
                    );
                }
            }
            None => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                form.fields.insert(name, value);
            }
        }
    }
    Ok(form)
}

/// Dashboard summary template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/summary.html")]
pub struct SummaryTemplate {
    pub layout: DashboardLayout,
    pub slug: String,
    pub category_count: i64,
    pub product_count: i64,
}

/// Build the dashboard router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(summary))
        .route("/categories", get(categories::index).post(categories::create))
        .route("/categories/{id}", delete(categories::delete))
        .route("/products", get(products::index).post(products::create))
        .route("/products/{id}", delete(products::delete))
        .route("/products/{id}/visibility", post(products::set_visibility))
        .route("/settings", get(settings::show).post(settings::update))
}

/// Restaurant summary with counts and the public link.
#[instrument(skip_all, fields(restaurant_id = %owner.restaurant.id))]
pub async fn summary(owner: RequireOwner, State(state): State<AppState>) -> Result<impl IntoResponse> {
    let restaurant_id = owner.restaurant.id;
    let category_count = CategoryRepository::new(state.pool())
        .count(restaurant_id)
        .await?;
    let product_count = ProductRepository::new(state.pool())
        .count(restaurant_id)
        .await?;

    Ok(SummaryTemplate {
        layout: DashboardLayout::new(&owner, &state, "/dashboard"),
        slug: owner.restaurant.slug.to_string(),
        category_count,
        product_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> MultipartForm {
        MultipartForm {
            fields: pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            files: HashMap::new(),
        }
    }

    #[test]
    fn test_text_trims_and_drops_blank() {
        let form = form(&[("name", "  Pizza  "), ("description", "   ")]);
        assert_eq!(form.text("name"), Some("Pizza"));
        assert_eq!(form.text("description"), None);
        assert_eq!(form.text("missing"), None);
    }

    #[test]
    fn test_checked() {
        let form = form(&[("wifi_active", "on"), ("other", "off")]);
        assert!(form.checked("wifi_active"));
        assert!(!form.checked("other"));
        assert!(!form.checked("missing"));
    }

    #[test]
    fn test_flash_messages() {
        let flash = FlashQuery {
            error: Some("price".to_string()),
            success: None,
            notice: Some("image".to_string()),
        };
        assert_eq!(flash.error_message(), Some("Ingresá un precio válido."));
        assert_eq!(flash.success_message(), None);
        assert!(flash.notice_message().unwrap().contains("sin imagen"));
    }
}
