//! Repository implementations using SeaORM

pub mod genre_repository;
pub mod user_repository;

pub use genre_repository::SeaOrmGenreRepository;
pub use user_repository::SeaOrmUserRepository;
