//! Domain layer - Pure business abstractions
//!
//! No Axum here: only policies, trait definitions and domain error types.

pub mod access;
pub mod errors;
pub mod moderation;
pub mod repositories;

pub use access::{ContentGate, Entitlement, Identity, can_read};
pub use errors::DomainError;
pub use moderation::{ModerationAction, ModerationOutcome, ModerationState};
pub use repositories::*;
