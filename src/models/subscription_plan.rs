use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscription_plans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub duration_days: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_subscription::Entity")]
    UserSubscription,
}

impl Related<super::user_subscription::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserSubscription.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
