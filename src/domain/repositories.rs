//! Repository trait definitions
//!
//! These traits define the contract for catalog data access (genres and
//! user accounts). Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::DomainError;
use crate::models::genre::Model as Genre;
use crate::models::user::{Model as User, Role};

/// Input for creating a user account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Partial update of a user account; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<Option<String>>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

/// Repository trait for Genre entity
#[async_trait]
pub trait GenreRepository: Send + Sync {
    /// All genres ordered by name
    async fn find_all(&self) -> Result<Vec<Genre>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Genre>, DomainError>;

    /// Create a genre; names are unique ignoring case
    async fn create(&self, name: String) -> Result<Genre, DomainError>;

    async fn rename(&self, id: i32, name: String) -> Result<Genre, DomainError>;

    /// Delete a genre; stories lose it from their genre set
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Repository trait for User entity
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<User>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError>;

    /// Lookup ignoring case
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Create an account; duplicate emails are a `Conflict`
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    async fn update(&self, id: i32, changes: UserChanges) -> Result<User, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}
