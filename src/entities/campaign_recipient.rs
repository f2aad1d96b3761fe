use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Delivery and open state of one campaign for one invite.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "campaign_recipient")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub invite_id: Uuid,
    pub sent_at: Option<DateTime>,
    /// First open only; never overwritten.
    pub opened_at: Option<DateTime>,
    pub opened_count: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::email_campaign::Entity",
        from = "Column::CampaignId",
        to = "super::email_campaign::Column::Id",
        on_delete = "Cascade"
    )]
    EmailCampaign,
    #[sea_orm(
        belongs_to = "super::invite::Entity",
        from = "Column::InviteId",
        to = "super::invite::Column::Id",
        on_delete = "Cascade"
    )]
    Invite,
}

impl Related<super::email_campaign::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmailCampaign.def()
    }
}

impl Related<super::invite::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invite.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
