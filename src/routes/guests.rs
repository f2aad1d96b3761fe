use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use axum_extra::{TypedHeader, headers::ContentType};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    entities::guest,
    error::{AppError, AppResult, BatchReport},
    guests::{self, GuestUpdate, NewGuest},
    router::AppState,
};

#[derive(Deserialize)]
pub struct GuestListParams {
    #[serde(default)]
    include_removed: bool,
}

#[derive(Deserialize)]
pub struct RemovedFlag {
    removed: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_guests).post(create_guest))
        .route("/import", post(import_guests))
        .route(
            "/{id}",
            get(get_guest).put(update_guest).delete(delete_guest),
        )
        .route("/{id}/removed", patch(set_removed))
}

pub async fn list_guests(
    State(state): State<AppState>,
    Query(params): Query<GuestListParams>,
) -> AppResult<Json<Vec<guest::Model>>> {
    Ok(Json(guests::list(&state.db, params.include_removed).await?))
}

pub async fn create_guest(
    State(state): State<AppState>,
    Json(new): Json<NewGuest>,
) -> AppResult<impl IntoResponse> {
    let guest = guests::create(&state.db, new).await?;
    Ok((StatusCode::CREATED, Json(guest)))
}

pub async fn get_guest(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<guest::Model>> {
    Ok(Json(guests::get(&state.db, id).await?))
}

pub async fn update_guest(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(changes): Json<GuestUpdate>,
) -> AppResult<Json<guest::Model>> {
    Ok(Json(guests::update(&state.db, id, changes).await?))
}

pub async fn delete_guest(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    guests::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_removed(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(flag): Json<RemovedFlag>,
) -> AppResult<Json<guest::Model>> {
    Ok(Json(guests::set_removed(&state.db, id, flag.removed).await?))
}

/// Body is the raw CSV text.
pub async fn import_guests(
    State(state): State<AppState>,
    TypedHeader(content_type): TypedHeader<ContentType>,
    body: String,
) -> AppResult<Json<BatchReport>> {
    let content_type = content_type.to_string();
    if !content_type.starts_with("text/csv") && !content_type.starts_with("text/plain") {
        return Err(AppError::validation(format!(
            "expected a text/csv body, got {content_type}"
        )));
    }
    Ok(Json(guests::bulk_import(&state.db, &body).await))
}
