use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account role. Registration grants `Reader` or `Author`; `Admin` is only
/// ever assigned by another admin.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[sea_orm(string_value = "reader")]
    Reader,
    #[sea_orm(string_value = "author")]
    Author,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Reader => "reader",
            Role::Author => "author",
            Role::Admin => "admin",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub display_name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::story::Entity")]
    Story,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
    #[sea_orm(has_many = "super::notification::Entity")]
    Notification,
    #[sea_orm(has_many = "super::user_subscription::Entity")]
    UserSubscription,
    #[sea_orm(has_many = "super::sale::Entity")]
    Sale,
}

impl Related<super::story::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Story.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Public view of a user, safe to embed in any response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i32,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub role: Role,
}

impl From<Model> for UserSummary {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            display_name: m.display_name,
            avatar_url: m.avatar_url,
            role: m.role,
        }
    }
}

impl From<&Model> for UserSummary {
    fn from(m: &Model) -> Self {
        Self {
            id: m.id,
            display_name: m.display_name.clone(),
            avatar_url: m.avatar_url.clone(),
            role: m.role,
        }
    }
}
