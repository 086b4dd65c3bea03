use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::{AppState, SystemStatus};

pub const VERSION: &str = "2.1.0";

const BANNER: &str = "MundoFit API 2.1

Endpoints disponíveis:
- /alunos
- /professores
- /exercicios
- /treinos
- /historicos
- /ml/recomendar
- /ml/historico/{alunoId}
- /login
- /health
- /system/status
";

const FEATURES: [&str; 5] = [
    "Autenticação",
    "Gestão de Alunos",
    "Gestão de Professores",
    "Gestão de Exercícios",
    "Recomendação Inteligente",
];

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
        .route("/system/status", get(system_status))
}

async fn banner() -> &'static str {
    BANNER
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    versao: &'static str,
    timestamp: DateTime<Utc>,
    sistema: &'static str,
    recursos: [&'static str; 5],
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "online",
        versao: VERSION,
        timestamp: Utc::now(),
        sistema: "MundoFit Backend",
        recursos: FEATURES,
    })
}

#[derive(Serialize)]
struct Status {
    status: SystemStatus,
    /// Seconds since the server state was created.
    uptime: f64,
    environment: String,
}

async fn system_status(State(state): State<Arc<AppState>>) -> Json<Status> {
    Json(Status {
        status: state.status().await,
        uptime: state.started.elapsed().as_secs_f64(),
        environment: state.config.environment.clone(),
    })
}
