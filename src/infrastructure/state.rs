//! Application state containing repositories and shared resources

use axum::extract::FromRef;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::Config;
use crate::domain::{GenreRepository, UserRepository};
use crate::infrastructure::{SeaOrmGenreRepository, SeaOrmUserRepository};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    pub config: Arc<Config>,
    pub genre_repo: Arc<dyn GenreRepository>,
    pub user_repo: Arc<dyn UserRepository>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let genre_repo = Arc::new(SeaOrmGenreRepository::new(db.clone()));
        let user_repo = Arc::new(SeaOrmUserRepository::new(db.clone()));

        Self {
            db,
            config: Arc::new(config),
            genre_repo,
            user_repo,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
