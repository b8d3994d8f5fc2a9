use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::api::error::ApiResult;
use crate::api::extract::{Json, Path, Query};
use crate::auth::{AuthUser, MaybeAuthUser};
use crate::services::engagement_service;
use crate::services::story_service::{self, StoryChanges, StoryInput, StoryQuery};

#[utoipa::path(
    get,
    path = "/api/stories",
    params(
        ("language" = Option<String>, Query, description = "pt, en, es or all"),
        ("genre" = Option<String>, Query, description = "Genre id or all"),
        ("search" = Option<String>, Query, description = "Matches title or author name"),
        ("page" = Option<u64>, Query, description = "1-based page"),
        ("limit" = Option<u64>, Query, description = "Page size, default 8")
    ),
    responses(
        (status = 200, description = "One page of stories, most recently updated first")
    )
)]
pub async fn list_stories(
    State(db): State<DatabaseConnection>,
    Query(query): Query<StoryQuery>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(story_service::list_stories(&db, query).await?))
}

pub async fn list_by_author(
    State(db): State<DatabaseConnection>,
    Path(author_id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(story_service::stories_by_author(&db, author_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/stories/{id}",
    params(("id" = i32, Path, description = "Story id")),
    responses(
        (status = 200, description = "Story with chapters and engagement"),
        (status = 404, description = "Story not found")
    )
)]
pub async fn get_story(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    viewer: MaybeAuthUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(story_service::get_story(&db, id, viewer.user_id()).await?))
}

pub async fn create_story(
    State(db): State<DatabaseConnection>,
    auth: AuthUser,
    Json(input): Json<StoryInput>,
) -> ApiResult<impl IntoResponse> {
    let story = story_service::create_story(&db, &auth.identity(), input).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Story created",
            "id": story.id,
            "story": story,
        })),
    ))
}

pub async fn update_story(
    State(db): State<DatabaseConnection>,
    auth: AuthUser,
    Path(id): Path<i32>,
    Json(changes): Json<StoryChanges>,
) -> ApiResult<impl IntoResponse> {
    let story = story_service::update_story(&db, &auth.identity(), id, changes).await?;
    Ok(Json(json!({ "message": "Story updated", "story": story })))
}

pub async fn delete_story(
    State(db): State<DatabaseConnection>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    story_service::delete_story(&db, &auth.identity(), id).await?;
    Ok(Json(json!({ "message": "Story deleted" })))
}

pub async fn toggle_like(
    State(db): State<DatabaseConnection>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let is_liked = engagement_service::toggle_story_like(&db, id, auth.id).await?;
    let total_likes = engagement_service::total_likes(&db, id).await?;
    Ok(Json(json!({ "is_liked": is_liked, "total_likes": total_likes })))
}

pub async fn toggle_follow(
    State(db): State<DatabaseConnection>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let is_following = engagement_service::toggle_follow(&db, id, auth.id).await?;
    let follower_count = engagement_service::follower_count(&db, id).await?;
    Ok(Json(json!({
        "is_following": is_following,
        "follower_count": follower_count,
    })))
}
