use axum::{
    extract::State,
    response::IntoResponse,
};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::api::error::ApiResult;
use crate::api::extract::{Json, Path};
use crate::auth::AuthUser;
use crate::services::notification_service;

pub async fn list_notifications(
    State(db): State<DatabaseConnection>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(notification_service::list_for_user(&db, auth.id).await?))
}

pub async fn mark_read(
    State(db): State<DatabaseConnection>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    notification_service::mark_read(&db, auth.id, id).await?;
    Ok(Json(json!({ "message": "Notification marked as read" })))
}
