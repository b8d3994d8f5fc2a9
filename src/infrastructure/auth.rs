//! Password hashing, JWT issuing and the request extractors that enforce
//! authentication on handlers.
//!
//! - [`AuthUser`] rejects with 401 when no valid token is present.
//! - [`MaybeAuthUser`] never rejects; invalid tokens are treated as anonymous.
//! - [`AdminUser`] additionally rejects non-admins with 403.
//!
//! Tokens are read from `Authorization: Bearer <jwt>` first, then from the
//! `token` cookie.

use std::convert::Infallible;
use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::config::Config;
use crate::domain::{DomainError, Identity};
use crate::models::user::Role;

pub const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    pub role: Role,
    pub exp: usize,
}

pub fn hash_password(password: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DomainError::Internal(e.to_string()))?
        .to_string();
    Ok(password_hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, DomainError> {
    let parsed_hash =
        PasswordHash::new(password_hash).map_err(|e| DomainError::Internal(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn create_jwt(
    secret: &str,
    user_id: i32,
    email: &str,
    role: Role,
    ttl_days: i64,
) -> Result<String, DomainError> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(ttl_days))
        .ok_or_else(|| DomainError::Internal("token expiry overflow".to_string()))?
        .timestamp();

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_owned(),
        role,
        exp: expiration as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| DomainError::Internal(e.to_string()))
}

pub fn decode_jwt(secret: &str, token: &str) -> Result<Claims, DomainError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| DomainError::Authentication("Invalid or expired token".to_string()))
}

/// `Set-Cookie` value carrying the session token.
pub fn session_cookie(token: &str, ttl_days: i64) -> String {
    format!(
        "{TOKEN_COOKIE}={token}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
        ttl_days * 24 * 60 * 60
    )
}

pub fn clear_session_cookie() -> String {
    format!("{TOKEN_COOKIE}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax")
}

fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == TOKEN_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// The identity behind a verified token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    pub fn identity(&self) -> Identity {
        Identity::new(self.id, self.role)
    }

    /// 403 unless the caller's role is in `allowed`.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), ApiError> {
        self.identity().ensure_role(allowed).map_err(ApiError::from)
    }

    fn from_token(secret: &str, token: &str) -> Result<Self, DomainError> {
        let claims = decode_jwt(secret, token)?;
        let id = claims
            .sub
            .parse::<i32>()
            .map_err(|_| DomainError::Authentication("Invalid or expired token".to_string()))?;
        Ok(Self {
            id,
            email: claims.email,
            role: claims.role,
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<Config>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Arc::<Config>::from_ref(state);
        let token = token_from_headers(&parts.headers).ok_or_else(|| {
            DomainError::Authentication("Authentication token not provided".to_string())
        })?;

        Ok(AuthUser::from_token(&config.jwt_secret, &token)?)
    }
}

/// Optional identity: anonymous when the token is missing or invalid.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    pub fn identity(&self) -> Option<Identity> {
        self.0.as_ref().map(AuthUser::identity)
    }

    pub fn user_id(&self) -> Option<i32> {
        self.0.as_ref().map(|u| u.id)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    Arc<Config>: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Arc::<Config>::from_ref(state);
        let user = token_from_headers(&parts.headers)
            .and_then(|token| AuthUser::from_token(&config.jwt_secret, &token).ok());
        Ok(MaybeAuthUser(user))
    }
}

/// An authenticated admin.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<Config>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        user.require_role(&[Role::Admin])?;
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("token=xyz"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn token_cookie_is_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; token=xyz; lang=pt"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn missing_token_yields_none() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic Zm9v"));
        assert_eq!(token_from_headers(&headers), None);
    }

    #[test]
    fn jwt_round_trips_identity() {
        let token = create_jwt("s3cret", 42, "a@b.c", Role::Author, 7).unwrap();
        let user = AuthUser::from_token("s3cret", &token).unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.role, Role::Author);
        assert!(AuthUser::from_token("other", &token).is_err());
    }

    #[test]
    fn session_cookie_is_http_only_for_seven_days() {
        let cookie = session_cookie("abc", 7);
        assert!(cookie.starts_with("token=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=604800"));
    }
}
