use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "honeymoon_category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub display_order: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::honeymoon_item::Entity")]
    HoneymoonItem,
}

impl Related<super::honeymoon_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HoneymoonItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
