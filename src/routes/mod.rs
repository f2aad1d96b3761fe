pub mod campaigns;
pub mod guests;
pub mod invites;
pub mod registry;
pub mod rsvp;
pub mod tracking;

use axum::Router;

use crate::router::AppState;

/// Guest-facing endpoints. Errors go out through `PublicError`.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .nest("/rsvp", rsvp::public_routes())
        .nest("/registry", registry::public_routes())
        .nest("/track", tracking::routes())
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .nest("/guests", guests::routes())
        .nest("/invites", invites::routes())
        .nest("/rsvps", rsvp::admin_routes())
        .nest("/registry", registry::admin_routes())
        .nest("/campaigns", campaigns::routes())
}
