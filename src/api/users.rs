use axum::{
    extract::State,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::auth::validate_password;
use crate::api::error::ApiResult;
use crate::api::extract::{Json, Path};
use crate::auth::{AuthUser, hash_password, verify_password};
use crate::domain::{DomainError, UserChanges};
use crate::infrastructure::AppState;
use crate::models::user::UserSummary;
use crate::services::story_service;

#[derive(Deserialize)]
pub struct ProfileUpdate {
    display_name: Option<String>,
    avatar_url: Option<String>,
    current_password: Option<String>,
    new_password: Option<String>,
}

pub async fn my_follows(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(
        story_service::followed_stories(state.db(), auth.id).await?,
    ))
}

/// Update the caller's own profile. Changing the password requires the
/// current one.
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ProfileUpdate>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_repo
        .find_by_id(auth.id)
        .await?
        .ok_or_else(|| DomainError::not_found("User"))?;

    let mut changes = UserChanges::default();

    if let Some(name) = payload.display_name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("Display name cannot be empty").into());
        }
        changes.display_name = Some(name);
    }

    if let Some(avatar) = payload.avatar_url {
        let avatar = avatar.trim().to_string();
        changes.avatar_url = Some((!avatar.is_empty()).then_some(avatar));
    }

    if let Some(new_password) = payload.new_password {
        let current = payload.current_password.unwrap_or_default();
        if !verify_password(&current, &user.password_hash)? {
            return Err(
                DomainError::Authentication("Current password is incorrect".to_string()).into(),
            );
        }
        validate_password(&new_password)?;
        changes.password_hash = Some(hash_password(&new_password)?);
    }

    let updated = state.user_repo.update(auth.id, changes).await?;
    Ok(Json(json!({ "message": "Profile updated", "user": updated })))
}

pub async fn public_profile(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("User"))?;

    let stories = story_service::stories_by_author(state.db(), id).await?;

    Ok(Json(json!({
        "user": UserSummary::from(user),
        "stories": stories,
    })))
}
