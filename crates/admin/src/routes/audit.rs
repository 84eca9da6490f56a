//! Audit log route handler.

use askama::Template;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use crate::api::types::AuditEntry;
use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

use super::dashboard::AdminUserView;
use super::render;

/// Query parameters for the audit log.
#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub page: Option<u32>,
}

/// Audit entry view for templates.
#[derive(Debug, Clone)]
pub struct AuditEntryView {
    pub created_at: String,
    pub actor: String,
    pub action: String,
    pub entity: String,
    pub detail: String,
}

impl From<&AuditEntry> for AuditEntryView {
    fn from(entry: &AuditEntry) -> Self {
        Self {
            created_at: entry.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            actor: entry.actor.clone(),
            action: entry.action.clone(),
            entity: entry.entity.clone(),
            detail: entry.detail.clone().unwrap_or_default(),
        }
    }
}

/// Audit log page template.
#[derive(Template)]
#[template(path = "audit/index.html")]
pub struct AuditIndexTemplate {
    pub admin_user: AdminUserView,
    pub entries: Vec<AuditEntryView>,
    pub current_page: u32,
    pub total_pages: u32,
}

/// Audit log page handler.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let audit = state.api().list_audit(page).await?;

    render(&AuditIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        entries: audit.entries.iter().map(AuditEntryView::from).collect(),
        current_page: audit.page,
        total_pages: audit.total_pages,
    })
}
