//! `POST /api/shops`: provision a restaurant and its owner account.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::instrument;

use crate::db::ProvisioningRepository;
use crate::middleware::RequireSuperAdmin;
use crate::services::provisioning::{ProvisionError, ShopRequest, provision_shop};
use crate::state::AppState;

/// Body of a successful provisioning.
#[derive(Debug, Serialize)]
pub struct ShopCreated {
    pub success: bool,
    pub message: String,
}

/// User-facing text for a provisioning failure.
#[must_use]
pub fn failure_message(err: &ProvisionError) -> String {
    match err {
        ProvisionError::InvalidRequest(msg) => format!("Datos inválidos: {msg}"),
        ProvisionError::EmailTaken => "Ya existe una cuenta con ese email".to_owned(),
        ProvisionError::SlugTaken => "Ese enlace ya está en uso".to_owned(),
        ProvisionError::Step { .. } | ProvisionError::PasswordHash => {
            "No se pudo crear la tienda".to_owned()
        }
    }
}

/// Create identity, profile and restaurant.
///
/// Every provisioning failure, and a malformed body, answers 400 with `{error}`.
#[instrument(skip_all, fields(admin_id = %admin.user.id))]
pub async fn create(
    admin: RequireSuperAdmin,
    State(state): State<AppState>,
    body: std::result::Result<Json<ShopRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Malformed provisioning request");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Solicitud inválida" })),
            )
                .into_response();
        }
    };

    let backend = ProvisioningRepository::new(state.provisioning_pool());
    match provision_shop(&backend, request).await {
        Ok(restaurant) => {
            let url = state.config().menu_url(restaurant.slug.as_str());
            Json(ShopCreated {
                success: true,
                message: format!("Tienda \"{}\" creada: {url}", restaurant.name),
            })
            .into_response()
        }
        Err(e) => {
            if e.is_internal() {
                let event_id = sentry::capture_error(&e);
                tracing::error!(error = %e, sentry_event_id = %event_id, "Provisioning failed");
            } else {
                tracing::warn!(error = %e, "Provisioning rejected");
            }
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": failure_message(&e) })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_messages_hide_internals() {
        let err = ProvisionError::Step {
            step: "create profile",
            source: crate::db::RepositoryError::NotFound,
        };
        assert_eq!(failure_message(&err), "No se pudo crear la tienda");
        assert_eq!(
            failure_message(&ProvisionError::SlugTaken),
            "Ese enlace ya está en uso"
        );
    }
}
