//! Invite grouping: which guests share an access code, and the single
//! attendance status derived from their RSVPs.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::guest::{self, GuestStatus};
use crate::entities::invite::{self, InviteType};
use crate::entities::{access_code, rsvp};
use crate::error::{AppError, AppResult};

const CODE_LEN: usize = 8;
const CODE_ATTEMPTS: usize = 16;

/// Never stored; recomputed from the RSVP rows on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteStatus {
    Pending,
    Attending,
    Declined,
    Partial,
}

/// Folds each guest's `attending` value into one invite status.
pub fn derive_status<I>(responses: I) -> InviteStatus
where
    I: IntoIterator<Item = Option<bool>>,
{
    let (mut yes, mut no, mut missing) = (false, false, false);
    for response in responses {
        match response {
            Some(true) => yes = true,
            Some(false) => no = true,
            None => missing = true,
        }
    }

    match (yes, no, missing) {
        (false, false, _) => InviteStatus::Pending,
        (true, false, false) => InviteStatus::Attending,
        (false, true, false) => InviteStatus::Declined,
        _ => InviteStatus::Partial,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InviteInput {
    pub guest_ids: Vec<Uuid>,
    #[serde(default)]
    pub invite_type: Option<InviteType>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuestWithRsvp {
    #[serde(flatten)]
    pub guest: guest::Model,
    pub rsvp: Option<rsvp::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InviteDetail {
    #[serde(flatten)]
    pub invite: invite::Model,
    pub guests: Vec<GuestWithRsvp>,
    pub status: InviteStatus,
}

impl InviteDetail {
    fn new(invite: invite::Model, guests: Vec<GuestWithRsvp>) -> Self {
        let status = derive_status(
            guests
                .iter()
                .map(|g| g.rsvp.as_ref().and_then(|r| r.attending)),
        );
        Self {
            invite,
            guests,
            status,
        }
    }

    pub fn guest_names(&self) -> Vec<String> {
        self.guests.iter().map(|g| g.guest.name.clone()).collect()
    }

    pub fn already_responded(&self) -> bool {
        self.guests
            .iter()
            .any(|g| g.rsvp.as_ref().is_some_and(|r| r.attending.is_some()))
    }
}

/// Access codes are matched case-insensitively and stored upper-case.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn generate_code() -> String {
    Uuid::new_v4().simple().to_string()[..CODE_LEN].to_uppercase()
}

fn resolve_invite_type(guest_count: usize, declared: Option<InviteType>) -> AppResult<InviteType> {
    let by_count = if guest_count == 1 {
        InviteType::Single
    } else {
        InviteType::Couple
    };
    let invite_type = declared.unwrap_or(by_count);
    match (invite_type, guest_count) {
        (InviteType::Single, 1) | (InviteType::Couple, 2) | (InviteType::PlusOne, 1..=2) => {
            Ok(invite_type)
        }
        (InviteType::Single, _) => Err(AppError::validation(
            "a single invite must have exactly one guest",
        )),
        (InviteType::Couple, _) => Err(AppError::validation(
            "a couple invite must have exactly two guests",
        )),
        (InviteType::PlusOne, _) => Err(AppError::validation(
            "a plus-one invite must have one or two guests",
        )),
    }
}

fn validate_guest_ids(guest_ids: &[Uuid]) -> AppResult<()> {
    if guest_ids.is_empty() || guest_ids.len() > 2 {
        return Err(AppError::validation("an invite must have one or two guests"));
    }
    let unique: HashSet<&Uuid> = guest_ids.iter().collect();
    if unique.len() != guest_ids.len() {
        return Err(AppError::validation("a guest can only appear once per invite"));
    }
    Ok(())
}

/// Issues a code that has never been handed out before. Issued codes are kept
/// in their own table so deleting an invite does not free its code.
async fn issue_access_code<C: ConnectionTrait>(conn: &C) -> AppResult<String> {
    for _ in 0..CODE_ATTEMPTS {
        let code = generate_code();
        if access_code::Entity::find_by_id(code.clone())
            .one(conn)
            .await?
            .is_some()
        {
            continue;
        }
        let now = Utc::now().naive_utc();
        access_code::ActiveModel {
            code: Set(code.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await?;
        return Ok(code);
    }
    Err(AppError::conflict("could not issue a unique access code"))
}

/// Points the given guests at `invite_id`, but only those not already on an
/// invite. Anything short of all of them is a conflict and the caller's
/// transaction is dropped.
async fn assign_guests<C: ConnectionTrait>(conn: &C, invite_id: Uuid, guest_ids: &[Uuid]) -> AppResult<()> {
    let guests = guest::Entity::find()
        .filter(guest::Column::Id.is_in(guest_ids.iter().copied()))
        .all(conn)
        .await?;
    if guests.len() != guest_ids.len() {
        return Err(AppError::not_found("guest"));
    }
    if let Some(removed) = guests.iter().find(|g| !g.is_active()) {
        return Err(AppError::validation(format!(
            "{} has been removed from the guest list",
            removed.name
        )));
    }

    let result = guest::Entity::update_many()
        .col_expr(guest::Column::InviteId, Expr::value(invite_id))
        .col_expr(guest::Column::UpdatedAt, Expr::value(Utc::now().naive_utc()))
        .filter(guest::Column::Id.is_in(guest_ids.iter().copied()))
        .filter(guest::Column::InviteId.is_null())
        .exec(conn)
        .await?;

    if result.rows_affected != guest_ids.len() as u64 {
        let taken: Vec<&str> = guests
            .iter()
            .filter(|g| g.invite_id.is_some_and(|id| id != invite_id))
            .map(|g| g.name.as_str())
            .collect();
        let who = if taken.is_empty() {
            "a guest".to_string()
        } else {
            taken.join(", ")
        };
        return Err(AppError::conflict(format!(
            "{who} is already assigned to another invite"
        )));
    }
    Ok(())
}

async fn release_guests<C: ConnectionTrait>(conn: &C, invite_id: Uuid) -> AppResult<u64> {
    let result = guest::Entity::update_many()
        .col_expr(guest::Column::InviteId, Expr::value(Option::<Uuid>::None))
        .col_expr(guest::Column::UpdatedAt, Expr::value(Utc::now().naive_utc()))
        .filter(guest::Column::InviteId.eq(invite_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Attaches active guests and their RSVPs to each invite, keeping the order of
/// `invites`.
pub async fn load_details<C: ConnectionTrait>(
    conn: &C,
    invites: Vec<invite::Model>,
) -> AppResult<Vec<InviteDetail>> {
    if invites.is_empty() {
        return Ok(Vec::new());
    }
    let invite_ids: Vec<Uuid> = invites.iter().map(|i| i.id).collect();
    let guests = guest::Entity::find()
        .filter(guest::Column::InviteId.is_in(invite_ids))
        .filter(guest::Column::Status.eq(GuestStatus::Active))
        .order_by_asc(guest::Column::Name)
        .all(conn)
        .await?;
    let rsvps = rsvp::Entity::find()
        .filter(rsvp::Column::GuestId.is_in(guests.iter().map(|g| g.id)))
        .all(conn)
        .await?;
    let mut rsvp_by_guest: HashMap<Uuid, rsvp::Model> =
        rsvps.into_iter().map(|r| (r.guest_id, r)).collect();

    let mut guests_by_invite: HashMap<Uuid, Vec<GuestWithRsvp>> = HashMap::new();
    for guest in guests {
        let Some(invite_id) = guest.invite_id else {
            continue;
        };
        let rsvp = rsvp_by_guest.remove(&guest.id);
        guests_by_invite
            .entry(invite_id)
            .or_default()
            .push(GuestWithRsvp { guest, rsvp });
    }

    Ok(invites
        .into_iter()
        .map(|invite| {
            let guests = guests_by_invite.remove(&invite.id).unwrap_or_default();
            InviteDetail::new(invite, guests)
        })
        .collect())
}

async fn load_detail<C: ConnectionTrait>(conn: &C, invite: invite::Model) -> AppResult<InviteDetail> {
    let mut details = load_details(conn, vec![invite]).await?;
    details
        .pop()
        .ok_or_else(|| AppError::not_found("invite"))
}

pub async fn find_by_code<C: ConnectionTrait>(conn: &C, code: &str) -> AppResult<invite::Model> {
    invite::Entity::find()
        .filter(invite::Column::AccessCode.eq(normalize_code(code)))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found("invite"))
}

async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<invite::Model> {
    invite::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found("invite"))
}

pub async fn create(db: &DatabaseConnection, input: InviteInput) -> AppResult<InviteDetail> {
    validate_guest_ids(&input.guest_ids)?;
    let invite_type = resolve_invite_type(input.guest_ids.len(), input.invite_type)?;

    let txn = db.begin().await?;
    let code = issue_access_code(&txn).await?;
    let now = Utc::now().naive_utc();
    let invite = invite::ActiveModel {
        id: Set(Uuid::new_v4()),
        access_code: Set(code),
        invite_type: Set(invite_type),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;
    assign_guests(&txn, invite.id, &input.guest_ids).await?;
    let detail = load_detail(&txn, invite).await?;
    txn.commit().await?;

    tracing::info!(
        "Created invite {} for {}",
        detail.invite.access_code,
        detail.guest_names().join(" & ")
    );
    Ok(detail)
}

/// Regroups an invite. Old assignments are released and new ones made in one
/// transaction, so a conflict leaves the previous grouping untouched.
pub async fn update(db: &DatabaseConnection, id: Uuid, input: InviteInput) -> AppResult<InviteDetail> {
    validate_guest_ids(&input.guest_ids)?;
    let invite_type = resolve_invite_type(input.guest_ids.len(), input.invite_type)?;

    let txn = db.begin().await?;
    let existing = find_by_id(&txn, id).await?;
    release_guests(&txn, id).await?;
    assign_guests(&txn, id, &input.guest_ids).await?;

    let mut active: invite::ActiveModel = existing.into();
    active.invite_type = Set(invite_type);
    active.updated_at = Set(Utc::now().naive_utc());
    let invite = active.update(&txn).await?;
    let detail = load_detail(&txn, invite).await?;
    txn.commit().await?;

    Ok(detail)
}

/// Deletes the invite and unassigns its guests. Guests and RSVPs stay; the
/// access code stays reserved.
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    let txn = db.begin().await?;
    let invite = find_by_id(&txn, id).await?;
    let released = release_guests(&txn, id).await?;
    invite::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        "Deleted invite {} ({} guests unassigned)",
        invite.access_code,
        released
    );
    Ok(())
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> AppResult<InviteDetail> {
    let invite = find_by_id(db, id).await?;
    load_detail(db, invite).await
}

pub async fn list(db: &DatabaseConnection) -> AppResult<Vec<InviteDetail>> {
    let invites = invite::Entity::find()
        .order_by_desc(invite::Column::CreatedAt)
        .all(db)
        .await?;
    load_details(db, invites).await
}

#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub guests: Vec<guest::Model>,
    pub invite_type: InviteType,
    pub reason: String,
}

fn last_name(name: &str) -> Option<&str> {
    let parts: Vec<&str> = name.split_whitespace().collect();
    if parts.len() < 2 {
        return None;
    }
    parts.last().copied()
}

/// Pairs guests on the same side who share a last name; everyone left over
/// gets a solo suggestion. Pure: nothing is written.
pub fn suggest_pairs(guests: &[guest::Model]) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();
    let mut used: HashSet<Uuid> = HashSet::new();

    for (i, first) in guests.iter().enumerate() {
        if used.contains(&first.id) {
            continue;
        }
        let Some(surname) = last_name(&first.name) else {
            continue;
        };
        let partner = guests[i + 1..].iter().find(|other| {
            !used.contains(&other.id)
                && other.side.eq_ignore_ascii_case(&first.side)
                && last_name(&other.name).is_some_and(|s| s.eq_ignore_ascii_case(surname))
        });
        if let Some(partner) = partner {
            used.insert(first.id);
            used.insert(partner.id);
            suggestions.push(Suggestion {
                guests: vec![first.clone(), partner.clone()],
                invite_type: InviteType::Couple,
                reason: format!("same side and last name ({surname})"),
            });
        }
    }

    for guest in guests {
        if used.insert(guest.id) {
            let invite_type = if guest.relationship.trim() == "+1" {
                InviteType::PlusOne
            } else {
                InviteType::Single
            };
            suggestions.push(Suggestion {
                guests: vec![guest.clone()],
                invite_type,
                reason: "no matching partner".to_string(),
            });
        }
    }

    suggestions
}

pub async fn auto_suggest(db: &DatabaseConnection) -> AppResult<Vec<Suggestion>> {
    let unassigned = guest::Entity::find()
        .filter(guest::Column::InviteId.is_null())
        .filter(guest::Column::Status.eq(GuestStatus::Active))
        .order_by_asc(guest::Column::Name)
        .all(db)
        .await?;
    Ok(suggest_pairs(&unassigned))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::database::test_support::setup_test_db;
    use crate::guests::{self, NewGuest};

    pub(crate) async fn add_guest(db: &DatabaseConnection, name: &str) -> guest::Model {
        let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
        guests::create(
            db,
            NewGuest {
                name: name.to_string(),
                email: Some(email),
                relationship: "friend".to_string(),
                side: "sam".to_string(),
                maybe: false,
            },
        )
        .await
        .unwrap()
    }

    fn input(guest_ids: Vec<Uuid>) -> InviteInput {
        InviteInput {
            guest_ids,
            invite_type: None,
        }
    }

    fn bare_guest(name: &str, side: &str, relationship: &str) -> guest::Model {
        let now = Utc::now().naive_utc();
        guest::Model {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: None,
            relationship: relationship.to_string(),
            side: side.to_string(),
            maybe: false,
            status: GuestStatus::Active,
            invite_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_derive_status_table() {
        assert_eq!(derive_status([]), InviteStatus::Pending);
        assert_eq!(derive_status([None]), InviteStatus::Pending);
        assert_eq!(derive_status([None, None]), InviteStatus::Pending);
        assert_eq!(derive_status([Some(true)]), InviteStatus::Attending);
        assert_eq!(derive_status([Some(true), Some(true)]), InviteStatus::Attending);
        assert_eq!(derive_status([Some(false)]), InviteStatus::Declined);
        assert_eq!(derive_status([Some(false), Some(false)]), InviteStatus::Declined);
        assert_eq!(derive_status([Some(true), Some(false)]), InviteStatus::Partial);
        assert_eq!(derive_status([Some(true), None]), InviteStatus::Partial);
        assert_eq!(derive_status([None, Some(false)]), InviteStatus::Partial);
    }

    #[test]
    fn test_resolve_invite_type() {
        assert_eq!(resolve_invite_type(1, None).unwrap(), InviteType::Single);
        assert_eq!(resolve_invite_type(2, None).unwrap(), InviteType::Couple);
        assert_eq!(
            resolve_invite_type(1, Some(InviteType::PlusOne)).unwrap(),
            InviteType::PlusOne
        );
        assert_eq!(
            resolve_invite_type(2, Some(InviteType::PlusOne)).unwrap(),
            InviteType::PlusOne
        );
        assert!(resolve_invite_type(2, Some(InviteType::Single)).is_err());
        assert!(resolve_invite_type(1, Some(InviteType::Couple)).is_err());
    }

    #[test]
    fn test_code_normalization() {
        assert_eq!(normalize_code("  ab12cd34 "), "AB12CD34");
        let code = generate_code();
        assert_eq!(code.len(), CODE_LEN);
        assert_eq!(code, code.to_uppercase());
    }

    #[test]
    fn test_suggest_pairs() {
        let guests = vec![
            bare_guest("Ada Lovelace", "sam", "friend"),
            bare_guest("Byron Lovelace", "sam", "friend"),
            bare_guest("Carl Sagan", "sam", "+1"),
            bare_guest("Dana Sagan", "jonah", "friend"),
            bare_guest("Prince", "jonah", "friend"),
        ];

        let suggestions = suggest_pairs(&guests);
        assert_eq!(suggestions.len(), 4);
        assert_eq!(suggestions[0].invite_type, InviteType::Couple);
        assert_eq!(suggestions[0].guests[0].name, "Ada Lovelace");
        assert_eq!(suggestions[0].guests[1].name, "Byron Lovelace");
        // different sides are never paired
        assert_eq!(suggestions[1].guests.len(), 1);
        assert_eq!(suggestions[1].invite_type, InviteType::PlusOne);
        assert!(suggestions[1..].iter().all(|s| s.guests.len() == 1));
    }

    #[tokio::test]
    async fn test_create_single_and_couple() {
        let db = setup_test_db().await;
        let a = add_guest(&db, "Ada Lovelace").await;
        let b = add_guest(&db, "Byron Lovelace").await;
        let c = add_guest(&db, "Carl Sagan").await;

        let couple = create(&db, input(vec![a.id, b.id])).await.unwrap();
        assert_eq!(couple.invite.invite_type, InviteType::Couple);
        assert_eq!(couple.guests.len(), 2);
        assert_eq!(couple.status, InviteStatus::Pending);

        let single = create(&db, input(vec![c.id])).await.unwrap();
        assert_eq!(single.invite.invite_type, InviteType::Single);
        assert_ne!(single.invite.access_code, couple.invite.access_code);
    }

    #[tokio::test]
    async fn test_guest_count_validation() {
        let db = setup_test_db().await;
        let a = add_guest(&db, "Ada").await;
        let b = add_guest(&db, "Byron").await;
        let c = add_guest(&db, "Carl").await;

        assert!(matches!(create(&db, input(vec![])).await, Err(AppError::Validation(_))));
        assert!(matches!(
            create(&db, input(vec![a.id, b.id, c.id])).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            create(&db, input(vec![a.id, a.id])).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            create(&db, input(vec![Uuid::new_v4()])).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_guest_exclusivity_conflict() {
        let db = setup_test_db().await;
        let a = add_guest(&db, "Ada").await;
        let b = add_guest(&db, "Byron").await;
        let c = add_guest(&db, "Carl").await;

        create(&db, input(vec![a.id, b.id])).await.unwrap();
        let err = create(&db, input(vec![a.id, c.id])).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // the failed invite left nothing behind
        let c = guests::get(&db, c.id).await.unwrap();
        assert_eq!(c.invite_id, None);
        assert_eq!(list(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_creates_for_one_guest() {
        let db = setup_test_db().await;
        let a = add_guest(&db, "Ada").await;
        let b = add_guest(&db, "Byron").await;
        let c = add_guest(&db, "Carl").await;

        let mut tasks = tokio::task::JoinSet::new();
        for partner in [b.id, c.id] {
            let db = db.clone();
            let guest_ids = vec![a.id, partner];
            tasks.spawn(async move { create(&db, input(guest_ids)).await });
        }
        let mut created = 0;
        let mut conflicts = 0;
        while let Some(result) = tasks.join_next().await {
            match result.unwrap() {
                Ok(_) => created += 1,
                Err(AppError::Conflict(_)) => conflicts += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!((created, conflicts), (1, 1));

        let invites = list(&db).await.unwrap();
        assert_eq!(invites.len(), 1);
        let ada = guests::get(&db, a.id).await.unwrap();
        assert_eq!(ada.invite_id, Some(invites[0].invite.id));
    }

    #[tokio::test]
    async fn test_update_regroups_atomically() {
        let db = setup_test_db().await;
        let a = add_guest(&db, "Ada").await;
        let b = add_guest(&db, "Byron").await;
        let c = add_guest(&db, "Carl").await;
        let d = add_guest(&db, "Dana").await;

        let first = create(&db, input(vec![a.id, b.id])).await.unwrap();
        create(&db, input(vec![d.id])).await.unwrap();

        let regrouped = update(&db, first.invite.id, input(vec![a.id, c.id])).await.unwrap();
        let names = regrouped.guest_names();
        assert_eq!(names, vec!["Ada".to_string(), "Carl".to_string()]);
        assert_eq!(guests::get(&db, b.id).await.unwrap().invite_id, None);

        // Dana belongs elsewhere: rejected, previous grouping kept
        let err = update(&db, first.invite.id, input(vec![a.id, d.id])).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        let kept = get(&db, first.invite.id).await.unwrap();
        assert_eq!(kept.guest_names(), vec!["Ada".to_string(), "Carl".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_unassigns_and_reserves_code() {
        let db = setup_test_db().await;
        let a = add_guest(&db, "Ada").await;

        let invite = create(&db, input(vec![a.id])).await.unwrap();
        delete(&db, invite.invite.id).await.unwrap();

        let a = guests::get(&db, a.id).await.unwrap();
        assert_eq!(a.invite_id, None);
        assert!(matches!(
            find_by_code(&db, &invite.invite.access_code).await,
            Err(AppError::NotFound(_))
        ));
        let reserved = access_code::Entity::find_by_id(invite.invite.access_code.clone())
            .one(&db)
            .await
            .unwrap();
        assert!(reserved.is_some());

        // and the guest can be grouped again
        create(&db, input(vec![a.id])).await.unwrap();
    }

    #[tokio::test]
    async fn test_find_by_code_is_case_insensitive() {
        let db = setup_test_db().await;
        let a = add_guest(&db, "Ada").await;
        let invite = create(&db, input(vec![a.id])).await.unwrap();

        let lower = invite.invite.access_code.to_lowercase();
        let found = find_by_code(&db, &format!(" {lower} ")).await.unwrap();
        assert_eq!(found.id, invite.invite.id);
    }

    #[tokio::test]
    async fn test_removed_guest_cannot_be_grouped() {
        let db = setup_test_db().await;
        let a = add_guest(&db, "Ada").await;
        guests::set_removed(&db, a.id, true).await.unwrap();

        let err = create(&db, input(vec![a.id])).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_auto_suggest_only_unassigned() {
        let db = setup_test_db().await;
        let a = add_guest(&db, "Ada Lovelace").await;
        add_guest(&db, "Byron Lovelace").await;
        let c = add_guest(&db, "Carl Lovelace").await;
        create(&db, input(vec![a.id])).await.unwrap();

        let suggestions = auto_suggest(&db).await.unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].guests.len(), 2);
        assert!(suggestions[0].guests.iter().any(|g| g.id == c.id));
        // nothing was written
        assert_eq!(guests::get(&db, c.id).await.unwrap().invite_id, None);
    }
}
