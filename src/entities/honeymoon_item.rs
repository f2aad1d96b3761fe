use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Funding totals are not columns; see `registry::funding_totals`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "honeymoon_item")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub image_url: Option<String>,
    pub display_order: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::honeymoon_category::Entity",
        from = "Column::CategoryId",
        to = "super::honeymoon_category::Column::Id",
        on_delete = "SetNull"
    )]
    HoneymoonCategory,
}

impl Related<super::honeymoon_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HoneymoonCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
