//! Honeymoon registry: categories, fundable items and the contribution ledger.
//!
//! Funding is never stored. Every figure here is summed from confirmed
//! contributions at read time.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::read_snapshot;
use crate::entities::registry_contribution::{self as contribution, ContributionStatus};
use crate::entities::{honeymoon_category as category, honeymoon_item as item};
use crate::error::{AppError, AppResult};
use crate::guests::is_valid_email;

const UNCATEGORIZED: &str = "Other";
const UNKNOWN_ITEM: &str = "Unknown Item";
const GENERAL_FUND: &str = "General Fund";
const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemInput {
    #[serde(default)]
    pub category_id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContributionInput {
    #[serde(default)]
    pub item_id: Option<Uuid>,
    #[serde(default)]
    pub contributor_name: Option<String>,
    #[serde(default)]
    pub contributor_email: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    #[serde(flatten)]
    pub item: item::Model,
    pub total_contributed: Decimal,
    pub remaining: Decimal,
    pub is_fully_funded: bool,
}

impl ItemView {
    pub fn new(item: item::Model, total_contributed: Decimal) -> Self {
        let remaining = (item.price - total_contributed).max(Decimal::ZERO);
        let is_fully_funded = total_contributed >= item.price;
        Self {
            item,
            total_contributed,
            remaining,
            is_fully_funded,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogCategory {
    pub id: Option<Uuid>,
    pub name: String,
    pub items: Vec<ItemView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicContribution {
    pub name: String,
    pub amount: Decimal,
    pub message: Option<String>,
    pub confirmed_at: Option<chrono::NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicItem {
    #[serde(flatten)]
    pub item: ItemView,
    pub contributions: Vec<PublicContribution>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContributionListing {
    #[serde(flatten)]
    pub contribution: contribution::Model,
    pub item_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusChange {
    pub contribution: contribution::Model,
    pub item: Option<ItemView>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegistryStats {
    pub total_confirmed: Decimal,
    pub total_pending: Decimal,
    pub undesignated_confirmed: Decimal,
    pub contribution_count: u64,
    pub item_count: u64,
    pub fully_funded_count: u64,
}

fn required_name(name: &str, what: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation(format!("{what} name is required")));
    }
    Ok(name.to_string())
}

fn positive(amount: Decimal, what: &str) -> AppResult<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(AppError::validation(format!("{what} must be greater than zero")));
    }
    Ok(amount)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Confirmed totals per item. `None` sums every designated contribution.
pub async fn funding_totals<C: ConnectionTrait>(
    conn: &C,
    item_ids: Option<&[Uuid]>,
) -> AppResult<HashMap<Uuid, Decimal>> {
    let mut query = contribution::Entity::find()
        .filter(contribution::Column::Status.eq(ContributionStatus::Confirmed))
        .filter(contribution::Column::ItemId.is_not_null());
    if let Some(ids) = item_ids {
        query = query.filter(contribution::Column::ItemId.is_in(ids.iter().copied()));
    }

    let mut totals: HashMap<Uuid, Decimal> = HashMap::new();
    for row in query.all(conn).await? {
        if let Some(item_id) = row.item_id {
            *totals.entry(item_id).or_default() += row.amount;
        }
    }
    Ok(totals)
}

async fn item_view<C: ConnectionTrait>(conn: &C, model: item::Model) -> AppResult<ItemView> {
    let totals = funding_totals(conn, Some(std::slice::from_ref(&model.id))).await?;
    let total = totals.get(&model.id).copied().unwrap_or_default();
    Ok(ItemView::new(model, total))
}

async fn find_category<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<category::Model> {
    category::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found("category"))
}

async fn find_item<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<item::Model> {
    item::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found("item"))
}

async fn find_contribution<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<contribution::Model> {
    contribution::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found("contribution"))
}

// Categories

pub async fn list_categories(db: &DatabaseConnection) -> AppResult<Vec<category::Model>> {
    Ok(category::Entity::find()
        .order_by_asc(category::Column::DisplayOrder)
        .order_by_asc(category::Column::Name)
        .all(db)
        .await?)
}

pub async fn create_category(db: &DatabaseConnection, input: CategoryInput) -> AppResult<category::Model> {
    let name = required_name(&input.name, "category")?;
    let now = Utc::now().naive_utc();
    let model = category::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        display_order: Set(input.display_order.unwrap_or_default()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;
    Ok(model)
}

pub async fn update_category(
    db: &DatabaseConnection,
    id: Uuid,
    input: CategoryInput,
) -> AppResult<category::Model> {
    let name = required_name(&input.name, "category")?;
    let mut active: category::ActiveModel = find_category(db, id).await?.into();
    active.name = Set(name);
    if let Some(order) = input.display_order {
        active.display_order = Set(order);
    }
    active.updated_at = Set(Utc::now().naive_utc());
    Ok(active.update(db).await?)
}

/// Items in the category become uncategorized.
pub async fn delete_category(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    let txn = db.begin().await?;
    let existing = find_category(&txn, id).await?;
    let orphaned = item::Entity::update_many()
        .col_expr(item::Column::CategoryId, Expr::value(Option::<Uuid>::None))
        .col_expr(item::Column::UpdatedAt, Expr::value(Utc::now().naive_utc()))
        .filter(item::Column::CategoryId.eq(id))
        .exec(&txn)
        .await?;
    category::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        "Deleted category {} ({} items moved to {UNCATEGORIZED})",
        existing.name,
        orphaned.rows_affected
    );
    Ok(())
}

// Items

pub async fn list_items(db: &DatabaseConnection) -> AppResult<Vec<ItemView>> {
    let txn = read_snapshot(db).await?;
    let items = item::Entity::find()
        .order_by_asc(item::Column::DisplayOrder)
        .order_by_asc(item::Column::Name)
        .all(&txn)
        .await?;
    let totals = funding_totals(&txn, None).await?;
    txn.commit().await?;

    Ok(items
        .into_iter()
        .map(|i| {
            let total = totals.get(&i.id).copied().unwrap_or_default();
            ItemView::new(i, total)
        })
        .collect())
}

pub async fn get_item(db: &DatabaseConnection, id: Uuid) -> AppResult<ItemView> {
    let txn = read_snapshot(db).await?;
    let model = find_item(&txn, id).await?;
    let view = item_view(&txn, model).await?;
    txn.commit().await?;
    Ok(view)
}

async fn check_category<C: ConnectionTrait>(conn: &C, category_id: Option<Uuid>) -> AppResult<()> {
    if let Some(id) = category_id {
        find_category(conn, id).await?;
    }
    Ok(())
}

pub async fn create_item(db: &DatabaseConnection, input: ItemInput) -> AppResult<item::Model> {
    let name = required_name(&input.name, "item")?;
    let price = positive(input.price, "price")?;
    check_category(db, input.category_id).await?;

    let now = Utc::now().naive_utc();
    let model = item::ActiveModel {
        id: Set(Uuid::new_v4()),
        category_id: Set(input.category_id),
        name: Set(name),
        description: Set(non_blank(input.description)),
        price: Set(price),
        image_url: Set(non_blank(input.image_url)),
        display_order: Set(input.display_order.unwrap_or_default()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    tracing::info!("Created registry item {} at {}", model.name, model.price);
    Ok(model)
}

pub async fn update_item(db: &DatabaseConnection, id: Uuid, input: ItemInput) -> AppResult<item::Model> {
    let name = required_name(&input.name, "item")?;
    let price = positive(input.price, "price")?;
    let existing = find_item(db, id).await?;
    check_category(db, input.category_id).await?;

    let mut active: item::ActiveModel = existing.into();
    active.category_id = Set(input.category_id);
    active.name = Set(name);
    active.description = Set(non_blank(input.description));
    active.price = Set(price);
    if let Some(url) = non_blank(input.image_url) {
        active.image_url = Set(Some(url));
    }
    if let Some(order) = input.display_order {
        active.display_order = Set(order);
    }
    active.updated_at = Set(Utc::now().naive_utc());
    Ok(active.update(db).await?)
}

pub async fn set_item_image(db: &DatabaseConnection, id: Uuid, url: &str) -> AppResult<item::Model> {
    let mut active: item::ActiveModel = find_item(db, id).await?.into();
    active.image_url = Set(Some(url.to_string()));
    active.updated_at = Set(Utc::now().naive_utc());
    Ok(active.update(db).await?)
}

/// Contributions that pointed here keep their `item_id`.
pub async fn delete_item(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    let result = item::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("item"));
    }
    Ok(())
}

// Contributions

pub async fn submit_contribution(
    db: &DatabaseConnection,
    input: ContributionInput,
) -> AppResult<contribution::Model> {
    let amount = positive(input.amount, "amount")?;
    if let Some(item_id) = input.item_id {
        find_item(db, item_id).await?;
    }
    let contributor_email = non_blank(input.contributor_email);
    if let Some(email) = &contributor_email {
        if !is_valid_email(email) {
            return Err(AppError::validation(format!("'{email}' is not a valid email")));
        }
    }

    let now = Utc::now().naive_utc();
    let model = contribution::ActiveModel {
        id: Set(Uuid::new_v4()),
        item_id: Set(input.item_id),
        contributor_name: Set(non_blank(input.contributor_name)),
        contributor_email: Set(contributor_email.map(|e| e.to_lowercase())),
        amount: Set(amount),
        status: Set(ContributionStatus::Pending),
        is_anonymous: Set(input.is_anonymous),
        message: Set(non_blank(input.message)),
        purpose: Set(input
            .item_id
            .is_none()
            .then(|| non_blank(input.purpose))
            .flatten()),
        confirmed_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    tracing::info!("Contribution {} of {} pending review", model.id, model.amount);
    Ok(model)
}

/// Moves a contribution to any status and returns the item's funding as seen
/// right after the write.
pub async fn set_contribution_status(
    db: &DatabaseConnection,
    id: Uuid,
    status: ContributionStatus,
) -> AppResult<StatusChange> {
    let txn = db.begin().await?;
    let existing = find_contribution(&txn, id).await?;
    let now = Utc::now().naive_utc();
    let confirmed_at = match (existing.status, status) {
        (ContributionStatus::Confirmed, ContributionStatus::Confirmed) => existing.confirmed_at,
        (_, ContributionStatus::Confirmed) => Some(now),
        _ => None,
    };
    let mut active: contribution::ActiveModel = existing.into();
    active.status = Set(status);
    active.confirmed_at = Set(confirmed_at);
    active.updated_at = Set(now);
    let updated = active.update(&txn).await?;

    let item = match updated.item_id {
        Some(item_id) => match item::Entity::find_by_id(item_id).one(&txn).await? {
            Some(model) => Some(item_view(&txn, model).await?),
            None => None,
        },
        None => None,
    };
    txn.commit().await?;

    tracing::info!("Contribution {} marked {:?}", updated.id, updated.status);
    Ok(StatusChange {
        contribution: updated,
        item,
    })
}

pub async fn delete_contribution(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    let result = contribution::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("contribution"));
    }
    Ok(())
}

pub async fn list_contributions(db: &DatabaseConnection) -> AppResult<Vec<ContributionListing>> {
    let txn = read_snapshot(db).await?;
    let rows = contribution::Entity::find()
        .order_by_desc(contribution::Column::CreatedAt)
        .all(&txn)
        .await?;
    let names: HashMap<Uuid, String> = item::Entity::find()
        .all(&txn)
        .await?
        .into_iter()
        .map(|i| (i.id, i.name))
        .collect();
    txn.commit().await?;

    Ok(rows
        .into_iter()
        .map(|c| {
            let item_name = match c.item_id {
                Some(id) => names
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_ITEM.to_string()),
                None => GENERAL_FUND.to_string(),
            };
            ContributionListing {
                contribution: c,
                item_name,
            }
        })
        .collect())
}

// Public views

/// Categories in display order, each with its funded items. Uncategorized
/// items trail in an "Other" group.
pub async fn catalog(db: &DatabaseConnection) -> AppResult<Vec<CatalogCategory>> {
    let txn = read_snapshot(db).await?;
    let categories = category::Entity::find()
        .order_by_asc(category::Column::DisplayOrder)
        .order_by_asc(category::Column::Name)
        .all(&txn)
        .await?;
    let items = item::Entity::find()
        .order_by_asc(item::Column::DisplayOrder)
        .order_by_asc(item::Column::Name)
        .all(&txn)
        .await?;
    let totals = funding_totals(&txn, None).await?;
    txn.commit().await?;

    let mut by_category: HashMap<Option<Uuid>, Vec<ItemView>> = HashMap::new();
    for model in items {
        let total = totals.get(&model.id).copied().unwrap_or_default();
        by_category
            .entry(model.category_id)
            .or_default()
            .push(ItemView::new(model, total));
    }

    let mut groups: Vec<CatalogCategory> = categories
        .into_iter()
        .map(|c| CatalogCategory {
            items: by_category.remove(&Some(c.id)).unwrap_or_default(),
            id: Some(c.id),
            name: c.name,
        })
        .collect();

    let mut other: Vec<ItemView> = by_category.into_values().flatten().collect();
    if !other.is_empty() {
        other.sort_by(|a, b| {
            (a.item.display_order, &a.item.name).cmp(&(b.item.display_order, &b.item.name))
        });
        groups.push(CatalogCategory {
            id: None,
            name: UNCATEGORIZED.to_string(),
            items: other,
        });
    }
    Ok(groups)
}

pub async fn public_item(db: &DatabaseConnection, id: Uuid) -> AppResult<PublicItem> {
    let txn = read_snapshot(db).await?;
    let model = find_item(&txn, id).await?;
    let view = item_view(&txn, model).await?;
    let confirmed = contribution::Entity::find()
        .filter(contribution::Column::ItemId.eq(id))
        .filter(contribution::Column::Status.eq(ContributionStatus::Confirmed))
        .order_by_desc(contribution::Column::ConfirmedAt)
        .all(&txn)
        .await?;
    txn.commit().await?;

    let contributions = confirmed
        .into_iter()
        .map(|c| {
            let name = match (&c.contributor_name, c.is_anonymous) {
                (Some(name), false) => name.clone(),
                _ => ANONYMOUS.to_string(),
            };
            PublicContribution {
                name,
                amount: c.amount,
                message: c.message,
                confirmed_at: c.confirmed_at,
            }
        })
        .collect();

    Ok(PublicItem {
        item: view,
        contributions,
    })
}

pub async fn stats(db: &DatabaseConnection) -> AppResult<RegistryStats> {
    let txn = read_snapshot(db).await?;
    let contributions = contribution::Entity::find().all(&txn).await?;
    let items = item::Entity::find().all(&txn).await?;
    txn.commit().await?;

    let mut stats = RegistryStats {
        contribution_count: contributions.len() as u64,
        item_count: items.len() as u64,
        ..Default::default()
    };
    let mut totals: HashMap<Uuid, Decimal> = HashMap::new();
    for c in &contributions {
        match c.status {
            ContributionStatus::Confirmed => {
                stats.total_confirmed += c.amount;
                match c.item_id {
                    Some(item_id) => *totals.entry(item_id).or_default() += c.amount,
                    None => stats.undesignated_confirmed += c.amount,
                }
            }
            ContributionStatus::Pending => stats.total_pending += c.amount,
            ContributionStatus::Rejected => {}
        }
    }
    stats.fully_funded_count = items
        .iter()
        .filter(|i| totals.get(&i.id).copied().unwrap_or_default() >= i.price)
        .count() as u64;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::setup_test_db;

    fn dollars(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    async fn add_item(db: &DatabaseConnection, name: &str, price: Decimal, category_id: Option<Uuid>) -> item::Model {
        create_item(
            db,
            ItemInput {
                category_id,
                name: name.to_string(),
                description: None,
                price,
                image_url: None,
                display_order: None,
            },
        )
        .await
        .unwrap()
    }

    async fn contribute(db: &DatabaseConnection, item_id: Option<Uuid>, amount: Decimal) -> contribution::Model {
        submit_contribution(
            db,
            ContributionInput {
                item_id,
                contributor_name: Some("Grace Hopper".to_string()),
                amount,
                ..Default::default()
            },
        )
        .await
        .unwrap()
    }

    #[test]
    fn test_item_view_funding() {
        let now = Utc::now().naive_utc();
        let model = item::Model {
            id: Uuid::new_v4(),
            category_id: None,
            name: "Snorkel tour".to_string(),
            description: None,
            price: dollars(20000),
            image_url: None,
            display_order: 0,
            created_at: now,
            updated_at: now,
        };
        let under = ItemView::new(model.clone(), dollars(7500));
        assert!(!under.is_fully_funded);
        assert_eq!(under.remaining, dollars(12500));

        let over = ItemView::new(model, dollars(25000));
        assert!(over.is_fully_funded);
        assert_eq!(over.remaining, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_confirm_and_reject_funding() {
        let db = setup_test_db().await;
        let tour = add_item(&db, "Snorkel tour", dollars(20000), None).await;
        let first = contribute(&db, Some(tour.id), dollars(7500)).await;
        let second = contribute(&db, Some(tour.id), dollars(12500)).await;
        assert_eq!(first.status, ContributionStatus::Pending);
        assert_eq!(get_item(&db, tour.id).await.unwrap().total_contributed, Decimal::ZERO);

        set_contribution_status(&db, first.id, ContributionStatus::Confirmed)
            .await
            .unwrap();
        let change = set_contribution_status(&db, second.id, ContributionStatus::Confirmed)
            .await
            .unwrap();
        let funded = change.item.unwrap();
        assert_eq!(funded.total_contributed, dollars(20000));
        assert!(funded.is_fully_funded);
        assert!(change.contribution.confirmed_at.is_some());

        let change = set_contribution_status(&db, second.id, ContributionStatus::Rejected)
            .await
            .unwrap();
        let item = change.item.unwrap();
        assert_eq!(item.total_contributed, dollars(7500));
        assert!(!item.is_fully_funded);
        assert!(change.contribution.confirmed_at.is_none());
    }

    #[tokio::test]
    async fn test_revert_to_pending_removes_amount() {
        let db = setup_test_db().await;
        let tour = add_item(&db, "Cooking class", dollars(10000), None).await;
        let c = contribute(&db, Some(tour.id), dollars(4000)).await;

        set_contribution_status(&db, c.id, ContributionStatus::Confirmed)
            .await
            .unwrap();
        let change = set_contribution_status(&db, c.id, ContributionStatus::Pending)
            .await
            .unwrap();
        assert_eq!(change.item.unwrap().total_contributed, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_reconfirm_keeps_confirmed_at() {
        let db = setup_test_db().await;
        let tour = add_item(&db, "Sunset sail", dollars(10000), None).await;
        let c = contribute(&db, Some(tour.id), dollars(2500)).await;

        let first = set_contribution_status(&db, c.id, ContributionStatus::Confirmed)
            .await
            .unwrap();
        let again = set_contribution_status(&db, c.id, ContributionStatus::Confirmed)
            .await
            .unwrap();
        assert!(first.contribution.confirmed_at.is_some());
        assert_eq!(again.contribution.confirmed_at, first.contribution.confirmed_at);
        assert_eq!(again.item.unwrap().total_contributed, dollars(2500));
    }

    #[tokio::test]
    async fn test_purpose_only_kept_for_general_fund() {
        let db = setup_test_db().await;
        let tour = add_item(&db, "Scuba lesson", dollars(15000), None).await;

        let designated = submit_contribution(
            &db,
            ContributionInput {
                item_id: Some(tour.id),
                amount: dollars(5000),
                purpose: Some("Flights".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(designated.purpose, None);

        let general = submit_contribution(
            &db,
            ContributionInput {
                amount: dollars(5000),
                purpose: Some("Flights".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(general.purpose.as_deref(), Some("Flights"));

        let stored = contribution::Entity::find_by_id(designated.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.purpose, None);
    }

    #[tokio::test]
    async fn test_contribution_validation() {
        let db = setup_test_db().await;
        let err = submit_contribution(
            &db,
            ContributionInput {
                amount: Decimal::ZERO,
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = submit_contribution(
            &db,
            ContributionInput {
                item_id: Some(Uuid::new_v4()),
                amount: dollars(1000),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        assert!(matches!(
            create_item(
                &db,
                ItemInput {
                    category_id: None,
                    name: "Free".to_string(),
                    description: None,
                    price: Decimal::ZERO,
                    image_url: None,
                    display_order: None,
                },
            )
            .await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_general_fund_only_undesignated() {
        let db = setup_test_db().await;
        let tour = add_item(&db, "Boat day", dollars(5000), None).await;
        let general = contribute(&db, None, dollars(3000)).await;
        let pending = contribute(&db, Some(tour.id), dollars(1000)).await;
        set_contribution_status(&db, general.id, ContributionStatus::Confirmed)
            .await
            .unwrap();

        assert_eq!(get_item(&db, tour.id).await.unwrap().total_contributed, Decimal::ZERO);
        let stats = stats(&db).await.unwrap();
        assert_eq!(stats.undesignated_confirmed, dollars(3000));
        assert_eq!(stats.total_confirmed, dollars(3000));
        assert_eq!(stats.total_pending, pending.amount);
        assert_eq!(stats.contribution_count, 2);
        assert_eq!(stats.item_count, 1);
        assert_eq!(stats.fully_funded_count, 0);
    }

    #[tokio::test]
    async fn test_category_delete_orphans_items() {
        let db = setup_test_db().await;
        let food = create_category(
            &db,
            CategoryInput {
                name: "Food".to_string(),
                display_order: Some(1),
            },
        )
        .await
        .unwrap();
        let dinner = add_item(&db, "Dinner", dollars(15000), Some(food.id)).await;

        let groups = catalog(&db).await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].items[0].item.id, dinner.id);

        delete_category(&db, food.id).await.unwrap();
        let groups = catalog(&db).await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, UNCATEGORIZED);
        assert_eq!(groups[0].items[0].item.category_id, None);
    }

    #[tokio::test]
    async fn test_dangling_item_shows_unknown() {
        let db = setup_test_db().await;
        let tour = add_item(&db, "Spa", dollars(8000), None).await;
        contribute(&db, Some(tour.id), dollars(2000)).await;
        contribute(&db, None, dollars(500)).await;
        delete_item(&db, tour.id).await.unwrap();

        let listing = list_contributions(&db).await.unwrap();
        let names: Vec<&str> = listing.iter().map(|l| l.item_name.as_str()).collect();
        assert!(names.contains(&UNKNOWN_ITEM));
        assert!(names.contains(&GENERAL_FUND));
    }

    #[tokio::test]
    async fn test_public_item_anonymizes() {
        let db = setup_test_db().await;
        let tour = add_item(&db, "Hike", dollars(9000), None).await;
        let named = contribute(&db, Some(tour.id), dollars(1000)).await;
        let hidden = submit_contribution(
            &db,
            ContributionInput {
                item_id: Some(tour.id),
                contributor_name: Some("Secret".to_string()),
                amount: dollars(2000),
                is_anonymous: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        contribute(&db, Some(tour.id), dollars(3000)).await;
        for id in [named.id, hidden.id] {
            set_contribution_status(&db, id, ContributionStatus::Confirmed)
                .await
                .unwrap();
        }

        let public = public_item(&db, tour.id).await.unwrap();
        assert_eq!(public.item.total_contributed, dollars(3000));
        assert_eq!(public.contributions.len(), 2);
        let mut names: Vec<&str> = public.contributions.iter().map(|c| c.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec![ANONYMOUS, "Grace Hopper"]);
    }
}
