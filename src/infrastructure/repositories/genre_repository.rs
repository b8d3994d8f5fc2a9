//! SeaORM implementation of GenreRepository

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::domain::{DomainError, GenreRepository};
use crate::models::genre::{self, ActiveModel, Entity as GenreEntity};
use crate::models::Genre;

pub struct SeaOrmGenreRepository {
    db: DatabaseConnection,
}

impl SeaOrmGenreRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn clean_name(name: String) -> Result<String, DomainError> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(DomainError::validation("Genre name is required"));
    }
    Ok(name)
}

#[async_trait]
impl GenreRepository for SeaOrmGenreRepository {
    async fn find_all(&self) -> Result<Vec<Genre>, DomainError> {
        Ok(GenreEntity::find()
            .order_by_asc(genre::Column::Name)
            .all(&self.db)
            .await?)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Genre>, DomainError> {
        Ok(GenreEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn create(&self, name: String) -> Result<Genre, DomainError> {
        let genre = ActiveModel {
            name: Set(clean_name(name)?),
            ..Default::default()
        };

        genre.insert(&self.db).await.map_err(|e| match DomainError::from(e) {
            DomainError::Conflict(_) => DomainError::Conflict("Genre already exists".to_string()),
            other => other,
        })
    }

    async fn rename(&self, id: i32, name: String) -> Result<Genre, DomainError> {
        let name = clean_name(name)?;
        let existing = GenreEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Genre"))?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(name);
        active.update(&self.db).await.map_err(|e| match DomainError::from(e) {
            DomainError::Conflict(_) => DomainError::Conflict("Genre already exists".to_string()),
            other => other,
        })
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = GenreEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Genre"));
        }

        Ok(())
    }
}
