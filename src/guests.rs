//! Guest directory: guest records, soft removal and the CSV guest-list import.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::entities::guest::{self, GuestStatus};
use crate::error::{AppError, AppResult, BatchError, BatchReport};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewGuest {
    pub name: String,
    pub email: Option<String>,
    #[serde(default)]
    pub relationship: String,
    #[serde(default)]
    pub side: String,
    #[serde(default)]
    pub maybe: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuestUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub relationship: Option<String>,
    pub side: Option<String>,
    pub maybe: Option<bool>,
}

/// Loose syntactic check: one `@`, a non-empty local part, a dotted domain
/// and no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|part| !part.is_empty())
}

fn normalize_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("name is required"));
    }
    Ok(name.to_string())
}

fn normalize_email(email: &str) -> AppResult<String> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::validation("email is required"));
    }
    if !is_valid_email(email) {
        return Err(AppError::validation(format!("'{email}' is not a valid email")));
    }
    Ok(email.to_lowercase())
}

pub async fn create(db: &DatabaseConnection, mut new: NewGuest) -> AppResult<guest::Model> {
    new.email = Some(normalize_email(new.email.as_deref().unwrap_or_default())?);
    insert(db, new).await
}

/// Expects `new.email` to be normalized already.
async fn insert(db: &DatabaseConnection, new: NewGuest) -> AppResult<guest::Model> {
    let name = normalize_name(&new.name)?;
    let now = Utc::now().naive_utc();
    let model = guest::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(new.email),
        relationship: Set(new.relationship.trim().to_string()),
        side: Set(new.side.trim().to_string()),
        maybe: Set(new.maybe),
        status: Set(GuestStatus::Active),
        invite_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    tracing::debug!("Created guest {} ({})", model.name, model.id);
    Ok(model)
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> AppResult<guest::Model> {
    guest::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("guest"))
}

pub async fn list(db: &DatabaseConnection, include_removed: bool) -> AppResult<Vec<guest::Model>> {
    let mut query = guest::Entity::find().order_by_asc(guest::Column::Name);
    if !include_removed {
        query = query.filter(guest::Column::Status.eq(GuestStatus::Active));
    }
    Ok(query.all(db).await?)
}

pub async fn update(db: &DatabaseConnection, id: Uuid, changes: GuestUpdate) -> AppResult<guest::Model> {
    let existing = get(db, id).await?;
    let mut active: guest::ActiveModel = existing.into();

    if let Some(name) = changes.name {
        active.name = Set(normalize_name(&name)?);
    }
    if let Some(email) = changes.email {
        active.email = Set(Some(normalize_email(&email)?));
    }
    if let Some(relationship) = changes.relationship {
        active.relationship = Set(relationship.trim().to_string());
    }
    if let Some(side) = changes.side {
        active.side = Set(side.trim().to_string());
    }
    if let Some(maybe) = changes.maybe {
        active.maybe = Set(maybe);
    }
    active.updated_at = Set(Utc::now().naive_utc());

    Ok(active.update(db).await?)
}

/// Soft delete (or restore). Invite assignment and RSVPs are left alone.
pub async fn set_removed(db: &DatabaseConnection, id: Uuid, removed: bool) -> AppResult<guest::Model> {
    let existing = get(db, id).await?;
    let mut active: guest::ActiveModel = existing.into();
    active.status = Set(if removed {
        GuestStatus::Removed
    } else {
        GuestStatus::Active
    });
    active.updated_at = Set(Utc::now().naive_utc());

    Ok(active.update(db).await?)
}

/// Hard delete. The guest must be unassigned first; the delete itself only
/// matches unassigned rows so a concurrent assignment cannot slip through.
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    let result = guest::Entity::delete_many()
        .filter(guest::Column::Id.eq(id))
        .filter(guest::Column::InviteId.is_null())
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        let existing = get(db, id).await?;
        if existing.invite_id.is_some() {
            return Err(AppError::conflict(
                "guest is still assigned to an invite; unassign it first",
            ));
        }
        return Err(AppError::not_found("guest"));
    }

    tracing::info!("Purged guest {}", id);
    Ok(())
}

fn parse_maybe(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "yes" | "y" | "true" | "1"
    )
}

fn parse_import_row(record: &csv::StringRecord) -> Result<NewGuest, String> {
    let field = |idx: usize| record.get(idx).unwrap_or_default().trim().to_string();
    let name = field(0);
    if name.is_empty() {
        return Err("name is required".to_string());
    }
    let email = match field(4) {
        raw if raw.is_empty() => None,
        raw => Some(normalize_email(&raw).map_err(|e| e.to_string())?),
    };
    Ok(NewGuest {
        name,
        email,
        relationship: field(1),
        side: field(2),
        maybe: parse_maybe(&field(3)),
    })
}

/// Imports `name, relationship, side, maybe[, email]` rows. Bad rows are
/// reported and skipped; the rest are still imported.
pub async fn bulk_import(db: &DatabaseConnection, body: &str) -> BatchReport {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());
    let mut report = BatchReport::default();

    for (idx, result) in reader.records().enumerate() {
        let row = format!("row {}", idx + 1);
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                report.errors.push(BatchError::new(row, e.to_string()));
                continue;
            }
        };
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        if idx == 0 && record.get(0).is_some_and(|f| f.eq_ignore_ascii_case("name")) {
            continue;
        }

        let new = match parse_import_row(&record) {
            Ok(parsed) => parsed,
            Err(reason) => {
                report.errors.push(BatchError::new(row, reason));
                continue;
            }
        };
        match insert(db, new).await {
            Ok(_) => report.ok_count += 1,
            Err(e) => report.errors.push(BatchError::new(row, e.to_string())),
        }
    }

    tracing::info!(
        "Guest import finished: {} imported, {} errors",
        report.ok_count,
        report.errors.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::setup_test_db;

    fn new_guest(name: &str, email: &str) -> NewGuest {
        NewGuest {
            name: name.to_string(),
            email: Some(email.to_string()),
            relationship: "friend".to_string(),
            side: "sam".to_string(),
            maybe: false,
        }
    }

    #[test]
    fn test_email_syntax() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("  ada.lovelace+rsvp@mail.example.org "));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("ada@localhost"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada@@example.com"));
        assert!(!is_valid_email("ada @example.com"));
        assert!(!is_valid_email("ada@example."));
    }

    #[test]
    fn test_parse_maybe() {
        assert!(parse_maybe("Yes"));
        assert!(parse_maybe("y"));
        assert!(!parse_maybe("no"));
        assert!(!parse_maybe(""));
    }

    #[tokio::test]
    async fn test_create_requires_name_and_email() {
        let db = setup_test_db().await;

        let err = create(&db, new_guest("  ", "a@b.co")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = create(&db, new_guest("Ada", "nope")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let missing = NewGuest {
            name: "Ada".into(),
            ..Default::default()
        };
        assert!(matches!(create(&db, missing).await, Err(AppError::Validation(_))));

        let guest = create(&db, new_guest(" Ada ", "Ada@Example.com")).await.unwrap();
        assert_eq!(guest.name, "Ada");
        assert_eq!(guest.email.as_deref(), Some("ada@example.com"));
        assert!(guest.is_active());
    }

    #[tokio::test]
    async fn test_update_and_unknown_id() {
        let db = setup_test_db().await;
        let guest = create(&db, new_guest("Ada", "ada@example.com")).await.unwrap();

        let changes = GuestUpdate {
            side: Some("jonah".into()),
            maybe: Some(true),
            ..Default::default()
        };
        let updated = update(&db, guest.id, changes).await.unwrap();
        assert_eq!(updated.side, "jonah");
        assert!(updated.maybe);
        assert_eq!(updated.name, "Ada");

        let err = update(&db, Uuid::new_v4(), GuestUpdate::default()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_soft_remove_is_reversible() {
        let db = setup_test_db().await;
        let guest = create(&db, new_guest("Ada", "ada@example.com")).await.unwrap();

        let removed = set_removed(&db, guest.id, true).await.unwrap();
        assert_eq!(removed.status, GuestStatus::Removed);
        assert!(list(&db, false).await.unwrap().is_empty());
        assert_eq!(list(&db, true).await.unwrap().len(), 1);

        let restored = set_removed(&db, guest.id, false).await.unwrap();
        assert!(restored.is_active());
    }

    #[tokio::test]
    async fn test_hard_delete() {
        let db = setup_test_db().await;
        let guest = create(&db, new_guest("Ada", "ada@example.com")).await.unwrap();

        delete(&db, guest.id).await.unwrap();
        assert!(matches!(get(&db, guest.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(delete(&db, guest.id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_bulk_import_collects_row_errors() {
        let db = setup_test_db().await;
        let body = "Name,Relationship,Side,Maybe\n\
                    Ada Lovelace,Friend,Sam,yes\n\
                    ,Family,Jonah,no\n\
                    Grace Hopper,+1,Jonah,\n\
                    Alan Turing,Friend,Sam,no,not-an-email\n\
                    Katherine Johnson,Family,Sam,no,kj@example.com\n";

        let report = bulk_import(&db, body).await;
        assert_eq!(report.ok_count, 3);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[0].item, "row 3");
        assert_eq!(report.errors[1].item, "row 5");

        let guests = list(&db, false).await.unwrap();
        let ada = guests.iter().find(|g| g.name == "Ada Lovelace").unwrap();
        assert!(ada.maybe);
        assert_eq!(ada.email, None);
        let kj = guests.iter().find(|g| g.name == "Katherine Johnson").unwrap();
        assert_eq!(kj.email.as_deref(), Some("kj@example.com"));
    }
}
