use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum TemplateType {
    #[sea_orm(string_value = "save_the_date")]
    SaveTheDate,
    #[sea_orm(string_value = "invitation")]
    Invitation,
}

impl TemplateType {
    pub fn template_name(&self) -> &'static str {
        match self {
            TemplateType::SaveTheDate => "email/save_the_date.html",
            TemplateType::Invitation => "email/invitation.html",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "email_campaign")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    pub template_type: TemplateType,
    pub sent_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Model {
    pub fn is_draft(&self) -> bool {
        self.sent_at.is_none()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::campaign_recipient::Entity")]
    CampaignRecipient,
}

impl Related<super::campaign_recipient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CampaignRecipient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
