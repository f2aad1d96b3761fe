use axum::{
    Router,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::{campaigns, router::AppState};

/// 1x1 transparent GIF.
const PIXEL: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3B,
];

pub fn routes() -> Router<AppState> {
    Router::new().route("/{campaign_id}/{invite_id}/open.gif", get(open_pixel))
}

/// Always answers with the pixel, even when the open could not be recorded.
pub async fn open_pixel(
    State(state): State<AppState>,
    Path((campaign_id, invite_id)): Path<(String, String)>,
) -> impl IntoResponse {
    match (Uuid::parse_str(&campaign_id), Uuid::parse_str(&invite_id)) {
        (Ok(campaign), Ok(invite)) => {
            if let Err(e) = campaigns::record_open(&state.db, campaign, invite).await {
                tracing::warn!(
                    "Open for campaign {} invite {} not recorded: {}",
                    campaign,
                    invite,
                    e
                );
            }
        }
        _ => tracing::warn!("Malformed tracking path {}/{}", campaign_id, invite_id),
    }
    (
        [
            (header::CONTENT_TYPE, "image/gif"),
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
        ],
        PIXEL,
    )
}
