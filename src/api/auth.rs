use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::Json;
use crate::auth::{
    AuthUser, clear_session_cookie, create_jwt, hash_password, session_cookie, verify_password,
};
use crate::domain::{DomainError, NewUser};
use crate::infrastructure::AppState;
use crate::models::User;
use crate::models::user::Role;
use crate::services::store_service;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Deserialize)]
pub struct RegisterRequest {
    display_name: String,
    email: String,
    password: String,
    #[serde(default)]
    role: Option<Role>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

pub(crate) fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(format!(
            "Password must have at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), DomainError> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(DomainError::validation("Invalid email address"));
    }
    Ok(())
}

/// Profile fields shown to the account owner.
fn account_json(user: &User) -> serde_json::Value {
    json!({
        "id": user.id,
        "display_name": user.display_name,
        "email": user.email,
        "avatar_url": user.avatar_url,
        "role": user.role,
        "created_at": user.created_at,
    })
}

fn issue_session(
    state: &AppState,
    user: &User,
    status: StatusCode,
    message: &str,
) -> ApiResult<Response> {
    let ttl = state.config.jwt_ttl_days;
    let token = create_jwt(&state.config.jwt_secret, user.id, &user.email, user.role, ttl)?;

    Ok((
        status,
        [(header::SET_COOKIE, session_cookie(&token, ttl))],
        Json(json!({
            "message": message,
            "token": token,
            "user": account_json(user),
        })),
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    responses(
        (status = 201, description = "Account created and session started"),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let display_name = payload.display_name.trim().to_string();
    if display_name.is_empty() {
        return Err(DomainError::validation("Display name is required").into());
    }
    validate_email(payload.email.trim())?;
    validate_password(&payload.password)?;

    let role = payload.role.unwrap_or(Role::Reader);
    if role == Role::Admin {
        return Err(DomainError::validation("Accounts can register as reader or author").into());
    }

    let user = state
        .user_repo
        .create(NewUser {
            display_name,
            email: payload.email,
            password_hash: hash_password(&payload.password)?,
            role,
        })
        .await?;

    tracing::info!("New {} account registered: {}", user.role.as_str(), user.id);
    issue_session(&state, &user, StatusCode::CREATED, "Account created")
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    responses(
        (status = 200, description = "Session started"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let invalid = || ApiError::from(DomainError::Authentication("Invalid credentials".to_string()));

    let Some(user) = state.user_repo.find_by_email(&payload.email).await? else {
        tracing::warn!("Login attempt for unknown email");
        return Err(invalid());
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        tracing::warn!("Password verification failed for user {}", user.id);
        return Err(invalid());
    }

    tracing::info!("User {} logged in", user.id);
    issue_session(&state, &user, StatusCode::OK, "Logged in")
}

pub async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(json!({ "message": "Logged out" })),
    )
}

pub async fn get_me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_repo
        .find_by_id(auth.id)
        .await?
        .ok_or_else(|| DomainError::Authentication("Account no longer exists".to_string()))?;

    let has_active_subscription = store_service::active_subscription(state.db(), user.id)
        .await?
        .is_some();

    let mut body = account_json(&user);
    body["has_active_subscription"] = json!(has_active_subscription);
    Ok(Json(body))
}
