use sea_orm_migration::{prelude::*, schema::*};

use crate::iden::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Every access code ever issued; outlives the invite that used it
        let table = table_auto(AccessCode::Table)
            .col(string_len(AccessCode::Code, 16).primary_key())
            .to_owned();
        manager.create_table(table).await?;

        // Create Invite Table
        let table = table_auto(Invite::Table)
            .col(pk_uuid(Invite::Id))
            .col(string_len_uniq(Invite::AccessCode, 16))
            .col(string_len(Invite::InviteType, 20))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_invite_access_code")
                    .from(Invite::Table, Invite::AccessCode)
                    .to(AccessCode::Table, AccessCode::Code)
                    .on_delete(ForeignKeyAction::Restrict),
            )
            .to_owned();
        manager.create_table(table).await?;

        // Create Guest Table
        let table = table_auto(Guest::Table)
            .col(pk_uuid(Guest::Id))
            .col(string(Guest::Name))
            .col(string_null(Guest::Email))
            .col(string(Guest::Relationship).default(""))
            .col(string(Guest::Side).default(""))
            .col(boolean(Guest::Maybe).default(false))
            .col(string_len(Guest::Status, 20).default("active"))
            .col(uuid_null(Guest::InviteId))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_guest_invite")
                    .from(Guest::Table, Guest::InviteId)
                    .to(Invite::Table, Invite::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .to_owned();
        manager.create_table(table).await?;

        // Create Rsvp Table
        let table = table_auto(Rsvp::Table)
            .col(pk_uuid(Rsvp::Id))
            .col(uuid_uniq(Rsvp::GuestId))
            .col(boolean_null(Rsvp::Attending))
            .col(text_null(Rsvp::DietaryRestrictions))
            .col(text_null(Rsvp::SongRequests))
            .col(text_null(Rsvp::Message))
            .col(timestamp_null(Rsvp::SubmittedAt))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_rsvp_guest")
                    .from(Rsvp::Table, Rsvp::GuestId)
                    .to(Guest::Table, Guest::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        manager.create_table(table).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_guest_invite")
                    .table(Guest::Table)
                    .col(Guest::InviteId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop all tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(Rsvp::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Guest::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Invite::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AccessCode::Table).to_owned())
            .await?;

        Ok(())
    }
}
