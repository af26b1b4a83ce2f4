//! Authentication route handlers.
//!
//! Email and password login against the local identity table. On success
//! the user lands on the home of their role.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

fn error_message(code: &str) -> &'static str {
    match code {
        "credentials" => "Email o contraseña incorrectos.",
        "session" => "No pudimos iniciar tu sesión. Intentá de nuevo.",
        _ => "Ocurrió un error. Intentá de nuevo.",
    }
}

fn success_message(code: &str) -> Option<&'static str> {
    match code {
        "logout" => Some("Cerraste sesión."),
        _ => None,
    }
}

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error.as_deref().map(error_message),
        success: query.success.as_deref().and_then(success_message),
    }
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let profile = match AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(profile) => profile,
        Err(AuthError::InvalidCredentials | AuthError::InvalidEmail(_)) => {
            tracing::warn!("Login failed: invalid credentials");
            return Redirect::to("/login?error=credentials").into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Login failed");
            return Redirect::to("/login?error=server").into_response();
        }
    };

    let user = CurrentUser {
        id: profile.id,
        email: profile.email.clone(),
    };
    if let Err(e) = set_current_user(&session, &user).await {
        tracing::error!("Failed to set session: {}", e);
        return Redirect::to("/login?error=session").into_response();
    }

    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, role = %profile.role, "User logged in");

    Redirect::to(profile.role.home_path()).into_response()
}

/// Logout and clear session.
pub async fn logout(session: Session) -> impl IntoResponse {
    if let Err(e) = clear_current_user(&session).await {
        tracing::warn!("Failed to clear session: {}", e);
    }
    clear_sentry_user();
    Redirect::to("/login?success=logout")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(error_message("credentials"), "Email o contraseña incorrectos.");
        assert_eq!(error_message("anything"), "Ocurrió un error. Intentá de nuevo.");
    }

    #[test]
    fn test_unknown_success_code_is_ignored() {
        assert!(success_message("logout").is_some());
        assert!(success_message("hacked").is_none());
    }
}
