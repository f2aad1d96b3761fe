use axum::{
    Json, Router,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use crate::{
    error::{AppError, AppResult, PublicError},
    invites::InviteDetail,
    router::AppState,
    rsvp::{self, RsvpLookup, RsvpStats, RsvpSubmission},
};

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/{code}", get(lookup).post(submit))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rsvps))
        .route("/stats", get(stats))
        .route("/export", get(export))
        .route("/{code}", post(admin_submit))
}

pub async fn lookup(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<RsvpLookup>, PublicError> {
    Ok(Json(rsvp::lookup(&state.db, &code).await?))
}

pub async fn submit(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(submission): Json<RsvpSubmission>,
) -> Result<Json<RsvpLookup>, PublicError> {
    if state.config.rsvp_closed(Utc::now().date_naive()) {
        tracing::info!("Late RSVP refused for {}", code.trim());
        return Err(AppError::validation("The RSVP deadline has passed.").into());
    }
    Ok(Json(
        rsvp::submit(&state.db, &code, submission.responses).await?,
    ))
}

/// Same ledger write as the public form, without the deadline.
pub async fn admin_submit(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(submission): Json<RsvpSubmission>,
) -> AppResult<Json<RsvpLookup>> {
    Ok(Json(
        rsvp::submit(&state.db, &code, submission.responses).await?,
    ))
}

pub async fn list_rsvps(State(state): State<AppState>) -> AppResult<Json<Vec<InviteDetail>>> {
    Ok(Json(rsvp::list(&state.db).await?))
}

pub async fn stats(State(state): State<AppState>) -> AppResult<Json<RsvpStats>> {
    Ok(Json(rsvp::stats(&state.db).await?))
}

pub async fn export(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let body = rsvp::export_csv(&state.db).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"rsvps.csv\"",
            ),
        ],
        body,
    ))
}
