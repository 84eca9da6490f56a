//! Admin login and logout.

use askama::Template;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::AdminApiError;
use crate::error::Result;
use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::state::AppState;

use super::render;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Login page template.
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: String,
}

/// Display the login page.
pub async fn login_page() -> Result<impl IntoResponse> {
    render(&LoginTemplate {
        error: String::new(),
    })
}

/// Verify credentials against the admin API and start a session.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match state.api().login(&form.email, &form.password).await {
        Ok(identity) => {
            let admin = CurrentAdmin {
                id: identity.id,
                email: identity.email,
                name: identity.name,
                role: identity.role,
            };
            set_current_admin(&session, &admin).await?;
            tracing::info!(admin = %admin.email, "Admin logged in");
            Ok(Redirect::to("/").into_response())
        }
        Err(AdminApiError::InvalidCredentials) => Ok(render(&LoginTemplate {
            error: "Invalid email or password".to_string(),
        })?
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// End the admin session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Response> {
    clear_current_admin(&session).await?;
    Ok(Redirect::to("/auth/login").into_response())
}
