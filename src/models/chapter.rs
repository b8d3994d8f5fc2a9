use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `(story_id, number)` is unique; `number` starts at 1 and grows by one per
/// published chapter.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "chapters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub story_id: i32,
    pub number: i32,
    pub title: String,
    pub content: String,
    pub is_premium: bool,
    pub published_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::story::Entity",
        from = "Column::StoryId",
        to = "super::story::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Story,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
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
