use sea_orm_migration::{prelude::*, schema::*};

use crate::iden::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create EmailCampaign Table
        let table = table_auto(EmailCampaign::Table)
            .col(pk_uuid(EmailCampaign::Id))
            .col(string(EmailCampaign::Name))
            .col(string(EmailCampaign::Subject))
            .col(string_len(EmailCampaign::TemplateType, 32))
            .col(timestamp_null(EmailCampaign::SentAt))
            .to_owned();
        manager.create_table(table).await?;

        // Create CampaignRecipient Table
        let table = table_auto(CampaignRecipient::Table)
            .col(pk_uuid(CampaignRecipient::Id))
            .col(uuid(CampaignRecipient::CampaignId))
            .col(uuid(CampaignRecipient::InviteId))
            .col(timestamp_null(CampaignRecipient::SentAt))
            .col(timestamp_null(CampaignRecipient::OpenedAt))
            .col(integer(CampaignRecipient::OpenedCount).default(0))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_recipient_campaign")
                    .from(CampaignRecipient::Table, CampaignRecipient::CampaignId)
                    .to(EmailCampaign::Table, EmailCampaign::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_recipient_invite")
                    .from(CampaignRecipient::Table, CampaignRecipient::InviteId)
                    .to(Invite::Table, Invite::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        manager.create_table(table).await?;

        // One recipient row per (campaign, invite); sends upsert against it
        manager
            .create_index(
                Index::create()
                    .name("idx_recipient_campaign_invite")
                    .table(CampaignRecipient::Table)
                    .col(CampaignRecipient::CampaignId)
                    .col(CampaignRecipient::InviteId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CampaignRecipient::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(EmailCampaign::Table).to_owned())
            .await?;

        Ok(())
    }
}
