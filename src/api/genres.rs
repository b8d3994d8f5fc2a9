use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::error::ApiResult;
use crate::api::extract::{Json, Path};
use crate::auth::AdminUser;
use crate::infrastructure::AppState;

#[derive(Deserialize)]
pub struct GenrePayload {
    name: String,
}

pub async fn list_genres(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.genre_repo.find_all().await?))
}

pub async fn create_genre(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<GenrePayload>,
) -> ApiResult<impl IntoResponse> {
    let genre = state.genre_repo.create(payload.name).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

pub async fn rename_genre(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    Json(payload): Json<GenrePayload>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.genre_repo.rename(id, payload.name).await?))
}

pub async fn delete_genre(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    state.genre_repo.delete(id).await?;
    Ok(Json(json!({ "message": "Genre deleted" })))
}
