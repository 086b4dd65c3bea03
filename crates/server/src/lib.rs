//! HTTP backend of the MundoFit fitness platform.
//!
//! Students, instructors, exercises, workouts and workout history are kept in a document store
//! that can be persisted to a JSON snapshot. Besides the CRUD endpoints the server offers exercise
//! recommendations by training category (`/ml/recomendar`).
//!
//! # Configuration
//!
//! | variable               | default           |
//! |------------------------|-------------------|
//! | `PORT`                 | `3000`            |
//! | `ADMIN_EMAIL`          | admin login off   |
//! | `ADMIN_SENHA`          | admin login off   |
//! | `MUNDOFIT_DATA_FILE`   | in-memory only    |
//! | `MUNDOFIT_ENV`         | `desenvolvimento` |
//! | `MUNDOFIT_BCRYPT_COST` | `10`              |
//! | `RUST_LOG`             | `info`            |
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use std::{future::Future, net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
};
use log::info;
use mundofit_storage::{DocumentStore, StoreError};
use tokio::{
    net::TcpListener,
    signal::{self, ctrl_c},
};
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
mod payload;
mod routes;
pub mod state;

use config::Config;
use state::AppState;

#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("document store: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Runs the server until a shutdown signal is received.
pub async fn run(config: Config) -> Result<(), ServerError> {
    let store = match &config.data_file {
        Some(path) => {
            info!("Loading documents from {}", path.display());
            DocumentStore::load(path).await?
        }
        None => {
            info!("No data file configured, documents are kept in memory only");
            DocumentStore::new()
        }
    };

    info!("Initializing state...");
    let state = AppState::new(config, store).await;

    let address = SocketAddr::from(([0, 0, 0, 0], state.config.port));
    info!("Binding to {address}");
    let listener = TcpListener::bind(address).await?;
    info!("Server running on {address}");

    serve(listener, state.clone(), shutdown_signal()).await?;

    info!("Server shutting down...");
    if let Some(path) = &state.config.data_file {
        info!("Saving documents to {}", path.display());
        state.store.save(path).await?;
    }

    Ok(())
}

pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    state.mark_started().await;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    routes::router().layer(cors).with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
