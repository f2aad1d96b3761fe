use sea_orm_migration::{prelude::*, schema::*};

use crate::iden::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create HoneymoonCategory Table
        let table = table_auto(HoneymoonCategory::Table)
            .col(pk_uuid(HoneymoonCategory::Id))
            .col(string(HoneymoonCategory::Name))
            .col(integer(HoneymoonCategory::DisplayOrder).default(0))
            .to_owned();
        manager.create_table(table).await?;

        // Create HoneymoonItem Table
        let table = table_auto(HoneymoonItem::Table)
            .col(pk_uuid(HoneymoonItem::Id))
            .col(uuid_null(HoneymoonItem::CategoryId))
            .col(string(HoneymoonItem::Name))
            .col(text_null(HoneymoonItem::Description))
            .col(decimal_len(HoneymoonItem::Price, 12, 2))
            .col(string_null(HoneymoonItem::ImageUrl))
            .col(integer(HoneymoonItem::DisplayOrder).default(0))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_item_category")
                    .from(HoneymoonItem::Table, HoneymoonItem::CategoryId)
                    .to(HoneymoonCategory::Table, HoneymoonCategory::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .check(Expr::col(HoneymoonItem::Price).gt(0))
            .to_owned();
        manager.create_table(table).await?;

        // Contributions keep their item_id after the item is deleted, so no
        // foreign key here.
        let table = table_auto(RegistryContribution::Table)
            .col(pk_uuid(RegistryContribution::Id))
            .col(uuid_null(RegistryContribution::ItemId))
            .col(string_null(RegistryContribution::ContributorName))
            .col(string_null(RegistryContribution::ContributorEmail))
            .col(decimal_len(RegistryContribution::Amount, 12, 2))
            .col(string_len(RegistryContribution::Status, 20).default("pending"))
            .col(boolean(RegistryContribution::IsAnonymous).default(false))
            .col(text_null(RegistryContribution::Message))
            .col(text_null(RegistryContribution::Purpose))
            .col(timestamp_null(RegistryContribution::ConfirmedAt))
            .check(Expr::col(RegistryContribution::Amount).gt(0))
            .to_owned();
        manager.create_table(table).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_contribution_item_status")
                    .table(RegistryContribution::Table)
                    .col(RegistryContribution::ItemId)
                    .col(RegistryContribution::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RegistryContribution::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(HoneymoonItem::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(HoneymoonCategory::Table).to_owned())
            .await?;

        Ok(())
    }
}
