//! Services Layer
//!
//! Business logic shared by the HTTP handlers. Services are free functions
//! over a `DatabaseConnection` and return `DomainError` on failure.

pub mod chapter_service;
pub mod comment_service;
pub mod engagement_service;
pub mod finance_service;
pub mod notification_service;
pub mod store_service;
pub mod story_service;
