//! Authentication extractors.
//!
//! The session only holds the user's id and email. Every protected request
//! reads the profile from the store and checks its role there.

use axum::{
    Json,
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, header::ACCEPT, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use tower_sessions::Session;

use qresto_core::Role;

use crate::db::{ProfileRepository, RestaurantRepository};
use crate::models::{CurrentUser, Profile, Restaurant, session_keys};
use crate::routes::wants_fragment;
use crate::state::AppState;

/// Extractor for dashboard routes: a `client` or `super_admin` together
/// with the restaurant they own.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(owner: RequireOwner) -> impl IntoResponse {
///     format!("Menu of {}", owner.restaurant.name)
/// }
/// ```
pub struct RequireOwner {
    pub user: CurrentUser,
    pub profile: Profile,
    pub restaurant: Restaurant,
}

/// Extractor for the admin panel and the provisioning API.
pub struct RequireSuperAdmin {
    pub user: CurrentUser,
    pub profile: Profile,
}

/// The signed-in user, if any. Never rejects.
pub struct OptionalUser(pub Option<CurrentUser>);

/// Why an authenticated extractor rejected the request.
#[derive(Debug)]
pub enum AuthRejection {
    /// HTML request without an acceptable session.
    RedirectToLogin,
    /// API request without a session.
    Unauthorized,
    /// API request whose role is not allowed.
    Forbidden,
    /// The profile lookup failed.
    Internal,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::RedirectToLogin => return Redirect::to("/login").into_response(),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "No autenticado"),
            Self::Forbidden => (StatusCode::FORBIDDEN, "Acceso denegado"),
            Self::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Error interno del servidor"),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Whether the caller expects a status code rather than a login redirect.
///
/// Scripted dashboard requests count too: a redirect would be followed to
/// the login page and read as success.
fn wants_json(parts: &Parts) -> bool {
    // Nested routers see the path without their prefix.
    let path = parts
        .extensions
        .get::<OriginalUri>()
        .map_or_else(|| parts.uri.path(), |uri| uri.path());
    path.starts_with("/api/")
        || wants_fragment(&parts.headers)
        || parts
            .headers
            .get(ACCEPT)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"))
}

async fn session_user(parts: &Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// Session user plus their profile, rejecting when either is missing or the
/// role fails `allowed`.
async fn authorize(
    parts: &Parts,
    state: &AppState,
    allowed: fn(Role) -> bool,
) -> Result<(CurrentUser, Profile), AuthRejection> {
    let json = wants_json(parts);

    let Some(user) = session_user(parts).await else {
        return Err(if json {
            AuthRejection::Unauthorized
        } else {
            AuthRejection::RedirectToLogin
        });
    };

    let profile = ProfileRepository::new(state.pool())
        .get_by_id(user.id)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %user.id, error = %e, "Profile lookup failed");
            AuthRejection::Internal
        })?;

    match profile {
        Some(profile) if allowed(profile.role) => Ok((user, profile)),
        _ => {
            tracing::debug!(user_id = %user.id, path = %parts.uri.path(), "Role not allowed");
            Err(if json {
                AuthRejection::Forbidden
            } else {
                AuthRejection::RedirectToLogin
            })
        }
    }
}

impl FromRequestParts<AppState> for RequireOwner {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (user, profile) = authorize(parts, state, |role| role.can_manage_menu()).await?;

        let restaurant = RestaurantRepository::new(state.pool())
            .get_by_owner(profile.id)
            .await
            .map_err(|e| {
                tracing::error!(owner_id = %profile.id, error = %e, "Restaurant lookup failed");
                AuthRejection::Internal
            })?;

        let Some(restaurant) = restaurant else {
            tracing::debug!(owner_id = %profile.id, "No restaurant owned");
            return Err(if wants_json(parts) {
                AuthRejection::Forbidden
            } else {
                AuthRejection::RedirectToLogin
            });
        };

        Ok(Self {
            user,
            profile,
            restaurant,
        })
    }
}

impl FromRequestParts<AppState> for RequireSuperAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (user, profile) = authorize(parts, state, |role| role == Role::SuperAdmin).await?;
        Ok(Self { user, profile })
    }
}

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(session_user(parts).await))
    }
}

/// Store the signed-in user in the session.
///
/// The session id is cycled first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Clear the whole session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
