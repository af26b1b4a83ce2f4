//! Account roles.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a role name is not recognized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct RoleError(pub String);

/// The role attached to every profile.
///
/// Roles are read from the database on each request, never cached in the
/// session, so a demotion takes effect immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "role", rename_all = "snake_case")
)]
pub enum Role {
    /// Platform operator: provisions restaurants and sees every tenant.
    SuperAdmin,
    /// Restaurant owner: manages exactly one menu.
    Client,
    /// Sales partner. Listed in the admin panel, no dashboard access.
    Reseller,
}

impl Role {
    /// Stable name, matching the database enum label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Client => "client",
            Self::Reseller => "reseller",
        }
    }

    /// Where to send a user with this role after login.
    #[must_use]
    pub const fn home_path(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "/admin",
            Self::Client => "/dashboard",
            Self::Reseller => "/",
        }
    }

    /// Whether this role may open the owner dashboard.
    #[must_use]
    pub const fn can_manage_menu(&self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Client)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "client" => Ok(Self::Client),
            "reseller" => Ok(Self::Reseller),
            other => Err(RoleError(other.to_owned())),
        }
    }
}
