//! Restaurant (tenant) models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use qresto_core::{BrandColor, Email, ProfileId, RestaurantId, Slug};

/// A restaurant row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub slug: Slug,
    pub name: String,
    pub logo_url: Option<String>,
    pub brand_color: BrandColor,
    pub wifi_active: bool,
    pub wifi_ssid: Option<String>,
    pub wifi_password: Option<String>,
    pub owner_id: Option<ProfileId>,
    pub created_at: DateTime<Utc>,
}

/// WiFi credentials as shown to diners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WifiDetails {
    pub ssid: String,
    pub password: Option<String>,
}

impl Restaurant {
    /// The WiFi bubble, if it should be shown at all.
    ///
    /// Requires the toggle to be on and a non-blank SSID. A blank password
    /// means an open network.
    #[must_use]
    pub fn wifi(&self) -> Option<WifiDetails> {
        if !self.wifi_active {
            return None;
        }
        let ssid = self.wifi_ssid.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let password = self
            .wifi_password
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(str::to_owned);
        Some(WifiDetails {
            ssid: ssid.to_owned(),
            password,
        })
    }
}

/// Data for creating a restaurant during provisioning.
#[derive(Debug, Clone)]
pub struct NewRestaurant {
    pub slug: Slug,
    pub name: String,
    pub owner_id: ProfileId,
}

/// Owner-editable branding and WiFi settings.
#[derive(Debug, Clone)]
pub struct RestaurantSettings {
    pub brand_color: BrandColor,
    /// `None` keeps the current logo.
    pub logo_url: Option<String>,
    pub wifi_active: bool,
    pub wifi_ssid: Option<String>,
    pub wifi_password: Option<String>,
}

/// A row of the super-admin shop list.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ShopSummary {
    pub id: RestaurantId,
    pub slug: Slug,
    pub name: String,
    pub owner_email: Option<Email>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn restaurant(active: bool, ssid: Option<&str>, password: Option<&str>) -> Restaurant {
        Restaurant {
            id: RestaurantId::generate(),
            slug: Slug::parse("el-faro").unwrap(),
            name: "El Faro".to_string(),
            logo_url: None,
            brand_color: BrandColor::default(),
            wifi_active: active,
            wifi_ssid: ssid.map(str::to_owned),
            wifi_password: password.map(str::to_owned),
            owner_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_wifi_hidden_when_inactive() {
        assert_eq!(restaurant(false, Some("FaroGuest"), Some("x")).wifi(), None);
    }

    #[test]
    fn test_wifi_hidden_without_ssid() {
        assert_eq!(restaurant(true, None, Some("x")).wifi(), None);
        assert_eq!(restaurant(true, Some("   "), Some("x")).wifi(), None);
    }

    #[test]
    fn test_wifi_open_network() {
        let wifi = restaurant(true, Some("FaroGuest"), Some("")).wifi().unwrap();
        assert_eq!(wifi.ssid, "FaroGuest");
        assert_eq!(wifi.password, None);
    }

    #[test]
    fn test_wifi_with_password() {
        let wifi = restaurant(true, Some("FaroGuest"), Some("faro2024")).wifi().unwrap();
        assert_eq!(wifi.password.as_deref(), Some("faro2024"));
    }
}
