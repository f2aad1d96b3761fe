use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    invites::{self, InviteDetail, InviteInput, Suggestion},
    router::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_invites).post(create_invite))
        .route("/auto-suggest", post(auto_suggest))
        .route(
            "/{id}",
            get(get_invite).put(update_invite).delete(delete_invite),
        )
}

pub async fn list_invites(State(state): State<AppState>) -> AppResult<Json<Vec<InviteDetail>>> {
    Ok(Json(invites::list(&state.db).await?))
}

pub async fn create_invite(
    State(state): State<AppState>,
    Json(input): Json<InviteInput>,
) -> AppResult<impl IntoResponse> {
    let invite = invites::create(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(invite)))
}

pub async fn get_invite(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<InviteDetail>> {
    Ok(Json(invites::get(&state.db, id).await?))
}

pub async fn update_invite(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<InviteInput>,
) -> AppResult<Json<InviteDetail>> {
    Ok(Json(invites::update(&state.db, id, input).await?))
}

pub async fn delete_invite(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    invites::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Read-only: proposals are returned, nothing is grouped.
pub async fn auto_suggest(State(state): State<AppState>) -> AppResult<Json<Vec<Suggestion>>> {
    Ok(Json(invites::auto_suggest(&state.db).await?))
}
