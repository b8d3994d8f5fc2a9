use axum::{
    extract::State,
    response::IntoResponse,
};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::api::error::ApiResult;
use crate::api::extract::{Json, Path};
use crate::auth::{AdminUser, AuthUser};
use crate::domain::{ModerationAction, ModerationOutcome};
use crate::services::comment_service;

fn outcome_json(message: &str, outcome: ModerationOutcome) -> serde_json::Value {
    match outcome {
        ModerationOutcome::Unchanged(state) | ModerationOutcome::Moved(state) => json!({
            "message": message,
            "state": state,
            "changed": matches!(outcome, ModerationOutcome::Moved(_)),
        }),
        ModerationOutcome::Deleted => json!({ "message": message, "state": "deleted" }),
    }
}

/// Any signed-in user may flag a comment; repeating the report is harmless.
pub async fn report(
    State(db): State<DatabaseConnection>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let outcome =
        comment_service::moderate(&db, &auth.identity(), id, ModerationAction::Report).await?;
    Ok(Json(outcome_json("Comment reported", outcome)))
}

pub async fn reported_queue(
    State(db): State<DatabaseConnection>,
    _admin: AdminUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(comment_service::reported_queue(&db).await?))
}

pub async fn approve(
    State(db): State<DatabaseConnection>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let outcome =
        comment_service::moderate(&db, &admin.identity(), id, ModerationAction::Approve).await?;
    Ok(Json(outcome_json("Comment approved", outcome)))
}

pub async fn delete(
    State(db): State<DatabaseConnection>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let outcome =
        comment_service::moderate(&db, &admin.identity(), id, ModerationAction::Delete).await?;
    Ok(Json(outcome_json("Comment deleted", outcome)))
}
