//! Branding and WiFi settings.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use qresto_core::{BrandColor, BrandColorError};

use super::{DashboardLayout, FlashQuery, MultipartForm, read_multipart};
use crate::db::RestaurantRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireOwner;
use crate::models::RestaurantSettings;
use crate::services::storage::{UploadKind, store_image_or_skip};
use crate::state::AppState;

/// Settings form page.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/settings.html")]
pub struct SettingsTemplate {
    pub layout: DashboardLayout,
    pub brand_color: String,
    pub logo_url: Option<String>,
    pub wifi_active: bool,
    pub wifi_ssid: String,
    pub wifi_password: String,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
    pub notice: Option<&'static str>,
}

/// Show the current settings.
#[instrument(skip_all, fields(restaurant_id = %owner.restaurant.id))]
pub async fn show(
    owner: RequireOwner,
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> Result<impl IntoResponse> {
    let layout = DashboardLayout::new(&owner, &state, "/dashboard/settings");
    let restaurant = owner.restaurant;
    Ok(SettingsTemplate {
        layout,
        brand_color: restaurant.brand_color.to_string(),
        logo_url: restaurant.logo_url,
        wifi_active: restaurant.wifi_active,
        wifi_ssid: restaurant.wifi_ssid.unwrap_or_default(),
        wifi_password: restaurant.wifi_password.unwrap_or_default(),
        error: flash.error_message(),
        success: flash.success_message(),
        notice: flash.notice_message(),
    })
}

/// Read the text fields of the settings form. The logo is left unset.
///
/// # Errors
///
/// Returns `BrandColorError` when the brand color is malformed.
pub fn parse_settings(
    form: &MultipartForm,
) -> std::result::Result<RestaurantSettings, BrandColorError> {
    let brand_color = match form.text("brand_color") {
        Some(color) => BrandColor::parse(color)?,
        None => BrandColor::default(),
    };
    Ok(RestaurantSettings {
        brand_color,
        logo_url: None,
        wifi_active: form.checked("wifi_active"),
        wifi_ssid: form.text("wifi_ssid").map(str::to_owned),
        wifi_password: form.text("wifi_password").map(str::to_owned),
    })
}

/// Save settings and report the outcome on the settings page.
#[instrument(skip_all, fields(restaurant_id = %owner.restaurant.id))]
pub async fn update(
    owner: RequireOwner,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Response {
    let restaurant_id = owner.restaurant.id;

    let mut form = match read_multipart(multipart).await {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable settings form");
            return Redirect::to("/dashboard/settings?error=upload").into_response();
        }
    };

    let mut settings = match parse_settings(&form) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::debug!(error = %e, "Invalid settings");
            return Redirect::to("/dashboard/settings?error=color").into_response();
        }
    };

    let mut logo_failed = false;
    if let Some(upload) = form.take_file("logo") {
        settings.logo_url = store_image_or_skip(
            state.storage(),
            restaurant_id,
            UploadKind::Logo,
            &upload,
            state.config().max_upload_bytes,
        )
        .await;
        logo_failed = settings.logo_url.is_none();
    }

    match RestaurantRepository::new(state.pool())
        .update_settings(restaurant_id, &settings)
        .await
    {
        Ok(_) => {
            tracing::info!(wifi_active = settings.wifi_active, "Settings saved");
            if logo_failed {
                Redirect::to("/dashboard/settings?success=saved&notice=logo").into_response()
            } else {
                Redirect::to("/dashboard/settings?success=saved").into_response()
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to save settings");
            Redirect::to("/dashboard/settings?error=server").into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

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
    fn test_parse_settings() {
        let settings = parse_settings(&form(&[
            ("brand_color", "#FF5733"),
            ("wifi_active", "on"),
            ("wifi_ssid", " FaroGuest "),
            ("wifi_password", ""),
        ]))
        .unwrap();

        assert_eq!(settings.brand_color.as_str(), "#ff5733");
        assert!(settings.wifi_active);
        assert_eq!(settings.wifi_ssid.as_deref(), Some("FaroGuest"));
        assert_eq!(settings.wifi_password, None);
        assert_eq!(settings.logo_url, None);
    }

    #[test]
    fn test_unchecked_wifi_and_default_color() {
        let settings = parse_settings(&form(&[])).unwrap();
        assert!(!settings.wifi_active);
        assert_eq!(settings.brand_color, BrandColor::default());
    }

    #[test]
    fn test_bad_color_rejected() {
        assert!(parse_settings(&form(&[("brand_color", "green")])).is_err());
    }
}
