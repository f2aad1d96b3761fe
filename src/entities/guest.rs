use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum GuestStatus {
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "removed")]
    Removed,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "guest")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub relationship: String,
    pub side: String,
    pub maybe: bool,
    pub status: GuestStatus,
    pub invite_id: Option<Uuid>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Model {
    pub fn is_active(&self) -> bool {
        self.status == GuestStatus::Active
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::invite::Entity",
        from = "Column::InviteId",
        to = "super::invite::Column::Id",
        on_delete = "SetNull"
    )]
    Invite,
    #[sea_orm(has_one = "super::rsvp::Entity")]
    Rsvp,
}

impl Related<super::invite::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invite.def()
    }
}

impl Related<super::rsvp::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rsvp.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
