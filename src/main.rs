mod campaigns;
mod config;
mod database;
mod email;
mod entities;
mod error;
mod guests;
mod invites;
mod registry;
mod router;
mod routes;
mod rsvp;
mod util;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::Config,
    database::setup_database,
    router::{AppState, create_router, shutdown_signal},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = setup_database(&config.database_url).await?;
    let mailer = email::mailer_from_config(&config)?;

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(db, config, mailer);
    let app = create_router(state)?;

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on {}", bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
