use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;

use crate::api::error::ApiResult;
use crate::api::extract::{Json, Path};
use crate::auth::{AuthUser, MaybeAuthUser};
use crate::models::user::Role;
use crate::services::chapter_service::{self, ChapterChanges, PublishChapter};
use crate::services::{comment_service, engagement_service};

#[derive(Deserialize)]
pub struct NewComment {
    content: String,
}

pub async fn list_for_story(
    State(db): State<DatabaseConnection>,
    Path(story_id): Path<i32>,
    viewer: MaybeAuthUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(
        chapter_service::list_chapters(&db, story_id, viewer.user_id()).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/chapters/{id}",
    params(("id" = i32, Path, description = "Chapter id")),
    responses(
        (status = 200, description = "Chapter; content is null when a subscription is needed"),
        (status = 404, description = "Chapter not found")
    )
)]
pub async fn get_chapter(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    viewer: MaybeAuthUser,
) -> ApiResult<impl IntoResponse> {
    let reader = viewer.identity();
    Ok(Json(
        chapter_service::get_chapter(&db, id, reader.as_ref()).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/chapters",
    responses(
        (status = 201, description = "Chapter published and followers notified"),
        (status = 403, description = "Caller does not own the story"),
        (status = 409, description = "Concurrent publish took the same number")
    )
)]
pub async fn publish_chapter(
    State(db): State<DatabaseConnection>,
    auth: AuthUser,
    Json(input): Json<PublishChapter>,
) -> ApiResult<impl IntoResponse> {
    auth.require_role(&[Role::Author, Role::Admin])?;
    let published = chapter_service::publish_chapter(&db, &auth.identity(), input).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Chapter published",
            "id": published.chapter.id,
            "number": published.chapter.number,
            "notified": published.notified,
        })),
    ))
}

pub async fn update_chapter(
    State(db): State<DatabaseConnection>,
    auth: AuthUser,
    Path(id): Path<i32>,
    Json(changes): Json<ChapterChanges>,
) -> ApiResult<impl IntoResponse> {
    let chapter = chapter_service::update_chapter(&db, &auth.identity(), id, changes).await?;
    Ok(Json(json!({ "message": "Chapter updated", "chapter": chapter })))
}

pub async fn delete_chapter(
    State(db): State<DatabaseConnection>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    chapter_service::delete_chapter(&db, &auth.identity(), id).await?;
    Ok(Json(json!({ "message": "Chapter deleted" })))
}

pub async fn toggle_like(
    State(db): State<DatabaseConnection>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let is_liked = engagement_service::toggle_chapter_like(&db, id, auth.id).await?;
    let like_count = engagement_service::chapter_like_count(&db, id).await?;
    Ok(Json(json!({ "is_liked": is_liked, "like_count": like_count })))
}

pub async fn mark_read(
    State(db): State<DatabaseConnection>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    engagement_service::mark_read(&db, id, &auth.identity()).await?;
    Ok(Json(json!({ "message": "Chapter marked as read", "is_read": true })))
}

pub async fn list_comments(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(comment_service::list_for_chapter(&db, id).await?))
}

pub async fn add_comment(
    State(db): State<DatabaseConnection>,
    auth: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<NewComment>,
) -> ApiResult<impl IntoResponse> {
    let comment =
        comment_service::add_comment(&db, &auth.identity(), id, &payload.content).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
