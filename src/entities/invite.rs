use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Declared by the admin when grouping guests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum InviteType {
    #[sea_orm(string_value = "single")]
    Single,
    #[sea_orm(string_value = "couple")]
    Couple,
    #[sea_orm(string_value = "plus_one")]
    PlusOne,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invite")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub access_code: String,
    pub invite_type: InviteType,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::guest::Entity")]
    Guest,
    #[sea_orm(has_many = "super::campaign_recipient::Entity")]
    CampaignRecipient,
}

impl Related<super::guest::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Guest.def()
    }
}

impl Related<super::campaign_recipient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CampaignRecipient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
