use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    campaigns::{self, CampaignStats, NewCampaign, RecipientView, SendReport},
    entities::email_campaign,
    error::AppResult,
    router::AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct SendRequest {
    /// Omitted: every invite with an active guest.
    #[serde(default)]
    invite_ids: Option<Vec<Uuid>>,
}

#[derive(Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    stats: CampaignStats,
    open_rate: f64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_campaigns).post(create_campaign))
        .route("/{id}", get(get_campaign).delete(delete_campaign))
        .route("/{id}/send", post(send_campaign))
        .route("/{id}/preview", get(preview))
        .route("/{id}/stats", get(stats))
        .route("/{id}/recipients", get(recipients))
}

pub async fn list_campaigns(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<email_campaign::Model>>> {
    Ok(Json(campaigns::list(&state.db).await?))
}

pub async fn create_campaign(
    State(state): State<AppState>,
    Json(new): Json<NewCampaign>,
) -> AppResult<impl IntoResponse> {
    let campaign = campaigns::create(&state.db, new).await?;
    Ok((StatusCode::CREATED, Json(campaign)))
}

pub async fn get_campaign(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<email_campaign::Model>> {
    Ok(Json(campaigns::get(&state.db, id).await?))
}

pub async fn delete_campaign(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    campaigns::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn send_campaign(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    request: Option<Json<SendRequest>>,
) -> AppResult<Json<SendReport>> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let report = campaigns::send(
        &state.db,
        state.mailer.as_ref(),
        &state.renderer,
        id,
        request.invite_ids,
    )
    .await?;
    Ok(Json(report))
}

pub async fn preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Html<String>> {
    Ok(Html(campaigns::preview(&state.db, &state.renderer, id).await?))
}

pub async fn stats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<StatsResponse>> {
    let stats = campaigns::stats(&state.db, id).await?;
    let open_rate = stats.open_rate();
    Ok(Json(StatsResponse { stats, open_rate }))
}

pub async fn recipients(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<RecipientView>>> {
    Ok(Json(campaigns::recipients(&state.db, id).await?))
}
