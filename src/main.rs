#![warn(clippy::pedantic, clippy::all, clippy::nursery)]
#![allow(clippy::single_match_else)]

use axum_login::tower_sessions::ExpiredDeletion;
use showcase::{
    auth::postgres_store::PostgresSessionStore,
    config::{DbConfig, RuntimeConfiguration},
    routes::app,
    state::ShowcaseState,
};
use sqlx::postgres::PgPoolOptions;
use std::env;
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

async fn shutdown_signal(state: ShowcaseState) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    warn!("signal received, starting graceful shutdown");
    state.sensible_shutdown().await;
}

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        //everything can still come from the real environment
        eprintln!("no .env file loaded: {e}");
    }

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish(),
    )
    .expect("unable to set tracing subscriber");

    info!("`tracing` online");

    let options = PgPoolOptions::new().max_connections(15);
    let db_config = DbConfig::new().expect("unable to read database config");
    let config = RuntimeConfiguration::new().expect("unable to create config");
    let state = ShowcaseState::new(options, &db_config, config)
        .await
        .expect("unable to create state");

    if let Err(e) = PostgresSessionStore::new(state.clone())
        .delete_expired()
        .await
    {
        error!(?e, "Unable to clear out expired sessions");
    }

    let app = app(state.clone());

    let server_ip =
        env::var("SHOWCASE_SERVER_IP").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let listener = TcpListener::bind(&server_ip)
        .await
        .expect("unable to listen on server ip");

    info!(?server_ip, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .expect("unable to serve app");
}
