//! HTTP routes. Paths and response bodies are shared with the existing web and mobile clients.

mod auth;
mod exercises;
mod history;
mod instructors;
mod recommendation;
mod students;
mod system;
mod workouts;

use std::sync::Arc;

use axum::Router;

use crate::{error::AppError, state::AppState};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(system::router())
        .merge(auth::router())
        .merge(students::router())
        .merge(instructors::router())
        .merge(exercises::router())
        .merge(workouts::router())
        .merge(history::router())
        .merge(recommendation::router())
        .fallback(not_found)
}

async fn not_found() -> AppError {
    AppError::NotFound("Rota não encontrada".to_string())
}
