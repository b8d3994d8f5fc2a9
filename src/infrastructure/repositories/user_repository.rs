//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::{DomainError, NewUser, UserChanges, UserRepository};
use crate::models::User;
use crate::models::user::{self, ActiveModel, Entity as UserEntity};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn email_taken(e: sea_orm::DbErr) -> DomainError {
    match DomainError::from(e) {
        DomainError::Conflict(_) => DomainError::Conflict("Email is already registered".to_string()),
        other => other,
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        Ok(UserEntity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        Ok(UserEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        // The column is declared COLLATE NOCASE.
        Ok(UserEntity::find()
            .filter(user::Column::Email.eq(email.trim()))
            .one(&self.db)
            .await?)
    }

    async fn create(&self, new_user: NewUser) -> Result<User, DomainError> {
        let now = Utc::now();
        let user = ActiveModel {
            display_name: Set(new_user.display_name),
            email: Set(new_user.email.trim().to_lowercase()),
            password_hash: Set(new_user.password_hash),
            avatar_url: Set(None),
            role: Set(new_user.role),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        user.insert(&self.db).await.map_err(email_taken)
    }

    async fn update(&self, id: i32, changes: UserChanges) -> Result<User, DomainError> {
        let existing = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("User"))?;

        let mut active: ActiveModel = existing.into();
        if let Some(name) = changes.display_name {
            active.display_name = Set(name);
        }
        if let Some(email) = changes.email {
            active.email = Set(email.trim().to_lowercase());
        }
        if let Some(avatar) = changes.avatar_url {
            active.avatar_url = Set(avatar);
        }
        if let Some(hash) = changes.password_hash {
            active.password_hash = Set(hash);
        }
        if let Some(role) = changes.role {
            active.role = Set(role);
        }
        active.updated_at = Set(Utc::now());

        active.update(&self.db).await.map_err(email_taken)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = UserEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("User"));
        }

        Ok(())
    }
}
