//! Profile model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use qresto_core::{Email, ProfileId, Role};

/// A user profile. Its id is shared with the auth identity.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Profile {
    pub id: ProfileId,
    pub email: Email,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}
