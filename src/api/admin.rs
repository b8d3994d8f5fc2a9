use axum::{
    extract::State,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::error::ApiResult;
use crate::api::extract::{Json, Path};
use crate::auth::AdminUser;
use crate::domain::{DomainError, UserChanges};
use crate::infrastructure::AppState;
use crate::models::user::Role;
use crate::services::finance_service;

#[derive(Deserialize)]
pub struct AdminUserUpdate {
    display_name: Option<String>,
    email: Option<String>,
    role: Option<Role>,
}

pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.user_repo.find_all().await?))
}

pub async fn update_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i32>,
    Json(payload): Json<AdminUserUpdate>,
) -> ApiResult<impl IntoResponse> {
    if id == admin.id && payload.role.is_some_and(|r| r != Role::Admin) {
        return Err(DomainError::validation("You cannot remove your own admin role").into());
    }

    let changes = UserChanges {
        display_name: payload.display_name.map(|n| n.trim().to_string()),
        email: payload.email,
        role: payload.role,
        ..Default::default()
    };
    if changes.display_name.as_deref() == Some("") {
        return Err(DomainError::validation("Display name cannot be empty").into());
    }

    let updated = state.user_repo.update(id, changes).await?;
    tracing::info!("Admin {} updated user {}", admin.id, id);
    Ok(Json(updated))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    if id == admin.id {
        return Err(DomainError::validation("You cannot delete your own account").into());
    }

    state.user_repo.delete(id).await?;
    tracing::info!("Admin {} deleted user {}", admin.id, id);
    Ok(Json(json!({ "message": "User deleted" })))
}

pub async fn list_subscriptions(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(finance_service::all_subscriptions(state.db()).await?))
}

pub async fn finance_summary(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(finance_service::summary(state.db()).await?))
}

pub async fn recent_transactions(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(finance_service::recent_transactions(state.db()).await?))
}
