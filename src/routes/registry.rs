use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
};
use axum_extra::extract::Multipart;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    entities::{
        honeymoon_category, honeymoon_item,
        registry_contribution::{self, ContributionStatus},
    },
    error::{AppResult, PublicError},
    registry::{
        self, CatalogCategory, CategoryInput, ContributionInput, ContributionListing, ItemInput,
        ItemView, PublicItem, RegistryStats, StatusChange,
    },
    router::AppState,
    util::image_store::{MAX_IMAGE_BYTES, UploadError},
};

#[derive(Deserialize)]
pub struct StatusUpdate {
    status: ContributionStatus,
}

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(public_catalog))
        .route("/items/{id}", get(public_item))
        .route("/contributions", post(submit_contribution))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            put(update_category).delete(delete_category),
        )
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route(
            "/items/{id}/image",
            post(upload_item_image).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + 64 * 1024)),
        )
        .route("/contributions", get(list_contributions))
        .route("/contributions/{id}", delete(delete_contribution))
        .route("/contributions/{id}/status", patch(set_contribution_status))
        .route("/stats", get(stats))
}

// Public

pub async fn public_catalog(
    State(state): State<AppState>,
) -> Result<Json<Vec<CatalogCategory>>, PublicError> {
    Ok(Json(registry::catalog(&state.db).await?))
}

pub async fn public_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicItem>, PublicError> {
    Ok(Json(registry::public_item(&state.db, id).await?))
}

pub async fn submit_contribution(
    State(state): State<AppState>,
    Json(input): Json<ContributionInput>,
) -> Result<(StatusCode, Json<registry_contribution::Model>), PublicError> {
    let contribution = registry::submit_contribution(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(contribution)))
}

// Categories

pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<honeymoon_category::Model>>> {
    Ok(Json(registry::list_categories(&state.db).await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> AppResult<impl IntoResponse> {
    let category = registry::create_category(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<CategoryInput>,
) -> AppResult<Json<honeymoon_category::Model>> {
    Ok(Json(registry::update_category(&state.db, id, input).await?))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    registry::delete_category(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Items

pub async fn list_items(State(state): State<AppState>) -> AppResult<Json<Vec<ItemView>>> {
    Ok(Json(registry::list_items(&state.db).await?))
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ItemView>> {
    Ok(Json(registry::get_item(&state.db, id).await?))
}

pub async fn create_item(
    State(state): State<AppState>,
    Json(input): Json<ItemInput>,
) -> AppResult<impl IntoResponse> {
    let item = registry::create_item(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ItemInput>,
) -> AppResult<Json<honeymoon_item::Model>> {
    Ok(Json(registry::update_item(&state.db, id, input).await?))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    registry::delete_item(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Expects one multipart file field; the stored URL is written to the item.
pub async fn upload_item_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Response {
    // unknown items are rejected before anything touches the disk
    if let Err(e) = registry::get_item(&state.db, id).await {
        return e.into_response();
    }

    let field = match multipart.next_field().await {
        Ok(Some(field)) => field,
        Ok(None) => return UploadError::Missing.into_response(),
        Err(e) => return UploadError::Multipart(e.to_string()).into_response(),
    };
    let file_name = field.file_name().map(str::to_string);
    let bytes = match field.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => return UploadError::Multipart(e.to_string()).into_response(),
    };

    let url = match state.images.save(file_name.as_deref(), &bytes).await {
        Ok(url) => url,
        Err(e) => return e.into_response(),
    };
    match registry::set_item_image(&state.db, id, &url).await {
        Ok(item) => Json(item).into_response(),
        Err(e) => e.into_response(),
    }
}

// Contributions

pub async fn list_contributions(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ContributionListing>>> {
    Ok(Json(registry::list_contributions(&state.db).await?))
}

pub async fn set_contribution_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<StatusUpdate>,
) -> AppResult<Json<StatusChange>> {
    Ok(Json(
        registry::set_contribution_status(&state.db, id, update.status).await?,
    ))
}

pub async fn delete_contribution(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    registry::delete_contribution(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn stats(State(state): State<AppState>) -> AppResult<Json<RegistryStats>> {
    Ok(Json(registry::stats(&state.db).await?))
}
