//! User management route handlers.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use heartwood_core::{UserId, UserRole};

use crate::api::types::StoreUser;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

use super::dashboard::AdminUserView;
use super::render;

/// Query parameters for the user listing.
#[derive(Debug, Deserialize)]
pub struct UsersQuery {
    pub page: Option<u32>,
}

/// Form input for a role change.
#[derive(Debug, Deserialize)]
pub struct RoleForm {
    pub role: String,
}

/// User row view for templates.
#[derive(Debug, Clone)]
pub struct UserRowView {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: String,
}

impl From<&StoreUser> for UserRowView {
    fn from(user: &StoreUser) -> Self {
        Self {
            id: user.id.as_i64(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.to_string(),
            created_at: user.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

/// User listing page template.
#[derive(Template)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub admin_user: AdminUserView,
    pub users: Vec<UserRowView>,
    pub roles: Vec<String>,
    pub current_page: u32,
    pub total_pages: u32,
}

/// User listing page handler.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<UsersQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let users = state.api().list_users(page).await?;

    render(&UsersIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        users: users.users.iter().map(UserRowView::from).collect(),
        roles: [UserRole::Customer, UserRole::Staff, UserRole::Admin]
            .iter()
            .map(ToString::to_string)
            .collect(),
        current_page: users.page,
        total_pages: users.total_pages,
    })
}

/// Change a user's role.
#[instrument(skip(admin, state))]
pub async fn update_role(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<RoleForm>,
) -> Result<Response> {
    let role = form.role.parse::<UserRole>().map_err(AppError::BadRequest)?;

    let user = state.api().set_user_role(UserId::new(id), role).await?;
    tracing::info!(
        admin = %admin.email,
        user = %user.email,
        role = %user.role,
        "User role changed"
    );

    Ok(Redirect::to("/users").into_response())
}
