use sea_orm_migration::prelude::*;

// Define table names
#[derive(DeriveIden)]
pub enum Guest {
    Table,
    Id,
    Name,
    Email,
    Relationship,
    Side,
    Maybe,
    Status,
    InviteId,
}

#[derive(DeriveIden)]
pub enum Invite {
    Table,
    Id,
    AccessCode,
    InviteType,
}

#[derive(DeriveIden)]
pub enum AccessCode {
    Table,
    Code,
}

#[derive(DeriveIden)]
pub enum Rsvp {
    Table,
    Id,
    GuestId,
    Attending,
    DietaryRestrictions,
    SongRequests,
    Message,
    SubmittedAt,
}

#[derive(DeriveIden)]
pub enum HoneymoonCategory {
    Table,
    Id,
    Name,
    DisplayOrder,
}

#[derive(DeriveIden)]
pub enum HoneymoonItem {
    Table,
    Id,
    CategoryId,
    Name,
    Description,
    Price,
    ImageUrl,
    DisplayOrder,
}

#[derive(DeriveIden)]
pub enum RegistryContribution {
    Table,
    Id,
    ItemId,
    ContributorName,
    ContributorEmail,
    Amount,
    Status,
    IsAnonymous,
    Message,
    Purpose,
    ConfirmedAt,
}

#[derive(DeriveIden)]
pub enum EmailCampaign {
    Table,
    Id,
    Name,
    Subject,
    TemplateType,
    SentAt,
}

#[derive(DeriveIden)]
pub enum CampaignRecipient {
    Table,
    Id,
    CampaignId,
    InviteId,
    SentAt,
    OpenedAt,
    OpenedCount,
}
