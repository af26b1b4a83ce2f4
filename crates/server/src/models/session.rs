//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use qresto_core::{Email, ProfileId};

/// Session-stored user identity.
///
/// The role is deliberately absent: it is read from the profile table on
/// every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Profile (and auth identity) ID.
    pub id: ProfileId,
    /// Login email address.
    pub email: Email,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
