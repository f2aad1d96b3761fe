//! Email campaigns: send a template to all or some invites, then track opens
//! per recipient.

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
    sea_query::{Expr, Func, OnConflict, SimpleExpr},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::email::{EmailMessage, EmailRenderer, Mailer};
use crate::entities::email_campaign::{self as campaign, TemplateType};
use crate::entities::{campaign_recipient as recipient, invite};
use crate::error::{AppError, AppResult, BatchError};
use crate::guests::is_valid_email;
use crate::invites::{self, InviteDetail};

const PREVIEW_CODE: &str = "SAMPLE00";

#[derive(Debug, Clone, Deserialize)]
pub struct NewCampaign {
    pub name: String,
    pub subject: String,
    pub template_type: TemplateType,
}

#[derive(Debug, Default, Serialize)]
pub struct SendReport {
    pub sent_count: usize,
    pub errors: Vec<BatchError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CampaignStats {
    pub total_invites: u64,
    pub sent_count: u64,
    pub opened_count: u64,
    pub not_opened_count: u64,
    pub pending_count: u64,
}

impl CampaignStats {
    /// Percentage of sent emails opened at least once.
    pub fn open_rate(&self) -> f64 {
        if self.sent_count == 0 {
            return 0.0;
        }
        self.opened_count as f64 / self.sent_count as f64 * 100.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipientView {
    pub invite_id: Uuid,
    pub access_code: String,
    pub guest_names: Vec<String>,
    pub sent_at: Option<chrono::NaiveDateTime>,
    pub opened_at: Option<chrono::NaiveDateTime>,
    pub opened_count: i32,
}

pub async fn create(db: &DatabaseConnection, new: NewCampaign) -> AppResult<campaign::Model> {
    let name = new.name.trim();
    let subject = new.subject.trim();
    if name.is_empty() {
        return Err(AppError::validation("campaign name is required"));
    }
    if subject.is_empty() {
        return Err(AppError::validation("subject is required"));
    }

    let now = Utc::now().naive_utc();
    let model = campaign::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        subject: Set(subject.to_string()),
        template_type: Set(new.template_type),
        sent_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;
    Ok(model)
}

pub async fn list(db: &DatabaseConnection) -> AppResult<Vec<campaign::Model>> {
    Ok(campaign::Entity::find()
        .order_by_desc(campaign::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> AppResult<campaign::Model> {
    campaign::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("campaign"))
}

pub async fn delete(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    let txn = db.begin().await?;
    recipient::Entity::delete_many()
        .filter(recipient::Column::CampaignId.eq(id))
        .exec(&txn)
        .await?;
    let result = campaign::Entity::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("campaign"));
    }
    txn.commit().await?;
    Ok(())
}

/// Invites with at least one active guest.
async fn reachable_invites(db: &DatabaseConnection) -> AppResult<Vec<InviteDetail>> {
    let invites = invite::Entity::find()
        .order_by_asc(invite::Column::CreatedAt)
        .all(db)
        .await?;
    let details = invites::load_details(db, invites).await?;
    Ok(details.into_iter().filter(|d| !d.guests.is_empty()).collect())
}

async fn selected_invites(
    db: &DatabaseConnection,
    invite_ids: Vec<Uuid>,
    errors: &mut Vec<BatchError>,
) -> AppResult<Vec<InviteDetail>> {
    let mut seen = HashSet::new();
    let invite_ids: Vec<Uuid> = invite_ids.into_iter().filter(|id| seen.insert(*id)).collect();

    let found = invite::Entity::find()
        .filter(invite::Column::Id.is_in(invite_ids.iter().copied()))
        .order_by_asc(invite::Column::CreatedAt)
        .all(db)
        .await?;
    let found_ids: HashSet<Uuid> = found.iter().map(|i| i.id).collect();
    for id in invite_ids.iter().filter(|id| !found_ids.contains(id)) {
        errors.push(BatchError::new(id.to_string(), "invite not found"));
    }
    invites::load_details(db, found).await
}

async fn record_sent(db: &DatabaseConnection, campaign_id: Uuid, invite_id: Uuid) -> AppResult<()> {
    let now = Utc::now().naive_utc();
    let row = recipient::ActiveModel {
        id: Set(Uuid::new_v4()),
        campaign_id: Set(campaign_id),
        invite_id: Set(invite_id),
        sent_at: Set(Some(now)),
        opened_at: Set(None),
        opened_count: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };
    recipient::Entity::insert(row)
        .on_conflict(
            OnConflict::columns([recipient::Column::CampaignId, recipient::Column::InviteId])
                .update_columns([recipient::Column::SentAt, recipient::Column::UpdatedAt])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Sends one invite's email and records it. Any failure is returned as a
/// reason for the batch report.
async fn deliver(
    db: &DatabaseConnection,
    mailer: &dyn Mailer,
    renderer: &EmailRenderer,
    campaign: &campaign::Model,
    detail: &InviteDetail,
) -> Result<(), String> {
    let to: Vec<String> = detail
        .guests
        .iter()
        .filter_map(|g| g.guest.email.as_deref())
        .filter(|email| is_valid_email(email))
        .map(|email| email.trim().to_string())
        .collect();
    if to.is_empty() {
        return Err("no valid email".to_string());
    }

    let pixel = renderer.tracking_pixel_url(campaign.id, detail.invite.id);
    let html = renderer
        .render(
            campaign.template_type,
            &detail.guest_names(),
            &detail.invite.access_code,
            Some(&pixel),
        )
        .map_err(|e| e.to_string())?;

    let message = EmailMessage {
        to,
        subject: campaign.subject.clone(),
        html,
    };
    mailer.send(&message).await.map_err(|e| e.to_string())?;
    record_sent(db, campaign.id, detail.invite.id)
        .await
        .map_err(|e| e.to_string())
}

/// Sends the campaign to `invite_ids`, or to every reachable invite when
/// `None`. One recipient failing never stops the rest.
pub async fn send(
    db: &DatabaseConnection,
    mailer: &dyn Mailer,
    renderer: &EmailRenderer,
    campaign_id: Uuid,
    invite_ids: Option<Vec<Uuid>>,
) -> AppResult<SendReport> {
    let campaign = get(db, campaign_id).await?;
    let first_send = campaign.is_draft();
    let mut report = SendReport::default();

    let targets = match invite_ids {
        Some(ids) => selected_invites(db, ids, &mut report.errors).await?,
        None => reachable_invites(db).await?,
    };

    for detail in &targets {
        match deliver(db, mailer, renderer, &campaign, detail).await {
            Ok(()) => report.sent_count += 1,
            Err(reason) => {
                tracing::warn!(
                    "Campaign {} could not reach {}: {}",
                    campaign.name,
                    detail.invite.access_code,
                    reason
                );
                report
                    .errors
                    .push(BatchError::new(detail.invite.access_code.clone(), reason));
            }
        }
    }

    if report.sent_count > 0 {
        let mut active: campaign::ActiveModel = campaign.into();
        let now = Utc::now().naive_utc();
        active.sent_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(db).await?;
    }

    tracing::info!(
        "Campaign {} {} to {} invites ({} errors)",
        campaign_id,
        if first_send { "sent" } else { "re-sent" },
        report.sent_count,
        report.errors.len()
    );
    Ok(report)
}

/// Counts one open. The first open time is kept; the counter is bumped in the
/// same statement so concurrent opens are never lost.
pub async fn record_open(db: &DatabaseConnection, campaign_id: Uuid, invite_id: Uuid) -> AppResult<()> {
    let now = Utc::now().naive_utc();
    let first_open: SimpleExpr = Func::coalesce([
        Expr::col(recipient::Column::OpenedAt).into(),
        Expr::value(now),
    ])
    .into();

    let result = recipient::Entity::update_many()
        .col_expr(recipient::Column::OpenedAt, first_open)
        .col_expr(
            recipient::Column::OpenedCount,
            Expr::col(recipient::Column::OpenedCount).add(1),
        )
        .col_expr(recipient::Column::UpdatedAt, Expr::value(now))
        .filter(recipient::Column::CampaignId.eq(campaign_id))
        .filter(recipient::Column::InviteId.eq(invite_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("recipient"));
    }
    Ok(())
}

pub async fn stats(db: &DatabaseConnection, campaign_id: Uuid) -> AppResult<CampaignStats> {
    get(db, campaign_id).await?;
    let total_invites = reachable_invites(db).await?.len() as u64;
    let rows = recipient::Entity::find()
        .filter(recipient::Column::CampaignId.eq(campaign_id))
        .all(db)
        .await?;

    let sent_count = rows.iter().filter(|r| r.sent_at.is_some()).count() as u64;
    let opened_count = rows.iter().filter(|r| r.opened_at.is_some()).count() as u64;
    Ok(CampaignStats {
        total_invites,
        sent_count,
        opened_count,
        not_opened_count: sent_count.saturating_sub(opened_count),
        pending_count: total_invites.saturating_sub(sent_count),
    })
}

pub async fn recipients(db: &DatabaseConnection, campaign_id: Uuid) -> AppResult<Vec<RecipientView>> {
    get(db, campaign_id).await?;
    let rows = recipient::Entity::find()
        .filter(recipient::Column::CampaignId.eq(campaign_id))
        .order_by_desc(recipient::Column::SentAt)
        .all(db)
        .await?;
    let invites = invite::Entity::find()
        .filter(invite::Column::Id.is_in(rows.iter().map(|r| r.invite_id)))
        .all(db)
        .await?;
    let details = invites::load_details(db, invites).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let detail = details.iter().find(|d| d.invite.id == row.invite_id);
            RecipientView {
                invite_id: row.invite_id,
                access_code: detail
                    .map(|d| d.invite.access_code.clone())
                    .unwrap_or_default(),
                guest_names: detail.map(InviteDetail::guest_names).unwrap_or_default(),
                sent_at: row.sent_at,
                opened_at: row.opened_at,
                opened_count: row.opened_count,
            }
        })
        .collect())
}

/// Renders the campaign for its first reachable invite, or for placeholder
/// names when there are none yet. Never tracked.
pub async fn preview(
    db: &DatabaseConnection,
    renderer: &EmailRenderer,
    campaign_id: Uuid,
) -> AppResult<String> {
    let campaign = get(db, campaign_id).await?;
    let first = reachable_invites(db).await?.into_iter().next();
    let (names, code) = match &first {
        Some(detail) => (detail.guest_names(), detail.invite.access_code.clone()),
        None => (
            vec!["Guest One".to_string(), "Guest Two".to_string()],
            PREVIEW_CODE.to_string(),
        ),
    };

    renderer
        .render(campaign.template_type, &names, &code, None)
        .map_err(|e| AppError::validation(format!("could not render preview: {e}")))
}
