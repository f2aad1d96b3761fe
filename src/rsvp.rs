//! RSVP ledger: per-guest responses keyed by invite access code.

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait,
    sea_query::OnConflict,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::guest::{self, GuestStatus};
use crate::entities::rsvp;
use crate::error::{AppError, AppResult};
use crate::invites::{self, InviteDetail, InviteStatus};

#[derive(Debug, Clone, Serialize)]
pub struct RsvpLookup {
    #[serde(flatten)]
    pub detail: InviteDetail,
    pub already_responded: bool,
}

impl From<InviteDetail> for RsvpLookup {
    fn from(detail: InviteDetail) -> Self {
        let already_responded = detail.already_responded();
        Self {
            detail,
            already_responded,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuestRsvpInput {
    pub guest_id: Uuid,
    pub attending: Option<bool>,
    #[serde(default)]
    pub dietary_restrictions: Option<String>,
    #[serde(default)]
    pub song_requests: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RsvpSubmission {
    pub responses: Vec<GuestRsvpInput>,
}

/// Whitespace-only text is stored as null; anything else is kept as sent.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn lookup(db: &DatabaseConnection, code: &str) -> AppResult<RsvpLookup> {
    let invite = invites::find_by_code(db, code).await?;
    let mut details = invites::load_details(db, vec![invite]).await?;
    let detail = details.pop().ok_or_else(|| AppError::not_found("invite"))?;
    Ok(detail.into())
}

/// Records a response for every active guest on the invite. Either every entry
/// is written or none is.
pub async fn submit(
    db: &DatabaseConnection,
    code: &str,
    responses: Vec<GuestRsvpInput>,
) -> AppResult<RsvpLookup> {
    let txn = db.begin().await?;
    let invite = invites::find_by_code(&txn, code).await?;
    let members = guest::Entity::find()
        .filter(guest::Column::InviteId.eq(invite.id))
        .filter(guest::Column::Status.eq(GuestStatus::Active))
        .all(&txn)
        .await?;
    let member_ids: HashSet<Uuid> = members.iter().map(|g| g.id).collect();

    let mut seen = HashSet::new();
    for response in &responses {
        if !member_ids.contains(&response.guest_id) {
            return Err(AppError::validation(format!(
                "guest {} is not part of this invite",
                response.guest_id
            )));
        }
        if !seen.insert(response.guest_id) {
            return Err(AppError::validation(format!(
                "guest {} was answered twice",
                response.guest_id
            )));
        }
        if response.attending.is_none() {
            return Err(AppError::validation(
                "every guest needs an attending answer",
            ));
        }
    }
    if let Some(missing) = members.iter().find(|g| !seen.contains(&g.id)) {
        return Err(AppError::validation(format!(
            "missing a response for {}",
            missing.name
        )));
    }

    let now = Utc::now().naive_utc();
    for response in responses {
        let row = rsvp::ActiveModel {
            id: Set(Uuid::new_v4()),
            guest_id: Set(response.guest_id),
            attending: Set(response.attending),
            dietary_restrictions: Set(non_blank(response.dietary_restrictions)),
            song_requests: Set(non_blank(response.song_requests)),
            message: Set(non_blank(response.message)),
            submitted_at: Set(Some(now)),
            created_at: Set(now),
            updated_at: Set(now),
        };
        rsvp::Entity::insert(row)
            .on_conflict(
                OnConflict::column(rsvp::Column::GuestId)
                    .update_columns([
                        rsvp::Column::Attending,
                        rsvp::Column::DietaryRestrictions,
                        rsvp::Column::SongRequests,
                        rsvp::Column::Message,
                        rsvp::Column::SubmittedAt,
                        rsvp::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;
    }

    let mut details = invites::load_details(&txn, vec![invite]).await?;
    let detail = details.pop().ok_or_else(|| AppError::not_found("invite"))?;
    txn.commit().await?;

    tracing::info!(
        "RSVP received for {} ({:?})",
        detail.invite.access_code,
        detail.status
    );
    Ok(detail.into())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RsvpStats {
    pub total_invited: u64,
    pub total_responded: u64,
    pub total_attending: u64,
    pub total_declined: u64,
    pub total_pending: u64,
}

/// Counted over active guests that belong to an invite.
pub async fn stats(db: &DatabaseConnection) -> AppResult<RsvpStats> {
    let details = invites::list(db).await?;
    let mut stats = RsvpStats::default();
    for guest in details.iter().flat_map(|d| d.guests.iter()) {
        stats.total_invited += 1;
        match guest.rsvp.as_ref().and_then(|r| r.attending) {
            Some(true) => {
                stats.total_responded += 1;
                stats.total_attending += 1;
            }
            Some(false) => {
                stats.total_responded += 1;
                stats.total_declined += 1;
            }
            None => stats.total_pending += 1,
        }
    }
    Ok(stats)
}

pub async fn list(db: &DatabaseConnection) -> AppResult<Vec<InviteDetail>> {
    invites::list(db).await
}

fn status_label(status: InviteStatus) -> &'static str {
    match status {
        InviteStatus::Pending => "pending",
        InviteStatus::Attending => "attending",
        InviteStatus::Declined => "declined",
        InviteStatus::Partial => "partial",
    }
}

/// One row per invited active guest.
pub async fn export_csv(db: &DatabaseConnection) -> AppResult<Vec<u8>> {
    let details = invites::list(db).await?;
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "access_code",
        "invite_status",
        "name",
        "email",
        "side",
        "attending",
        "dietary_restrictions",
        "song_requests",
        "message",
        "submitted_at",
    ])?;

    for detail in &details {
        for entry in &detail.guests {
            let rsvp = entry.rsvp.as_ref();
            let attending = match rsvp.and_then(|r| r.attending) {
                Some(true) => "yes",
                Some(false) => "no",
                None => "",
            };
            let submitted_at = rsvp
                .and_then(|r| r.submitted_at)
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default();
            writer.write_record([
                detail.invite.access_code.as_str(),
                status_label(detail.status),
                entry.guest.name.as_str(),
                entry.guest.email.as_deref().unwrap_or_default(),
                entry.guest.side.as_str(),
                attending,
                rsvp.and_then(|r| r.dietary_restrictions.as_deref())
                    .unwrap_or_default(),
                rsvp.and_then(|r| r.song_requests.as_deref())
                    .unwrap_or_default(),
                rsvp.and_then(|r| r.message.as_deref()).unwrap_or_default(),
                submitted_at.as_str(),
            ])?;
        }
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Export(e.into_error().into()))
}
