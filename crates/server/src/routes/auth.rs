use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use log::info;
use mundofit_domain::{AccountService, Login, LoginError};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    state::{AppState, SystemStatus},
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/login", post(login))
}

#[derive(Deserialize)]
struct Credentials {
    #[serde(default)]
    email: String,
    #[serde(default)]
    senha: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    tipo_usuario: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nome: Option<String>,
    sistema_status: SystemStatus,
}

async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(credentials) = payload?;

    let login = state
        .service
        .login(&credentials.email, &credentials.senha)
        .await
        .map_err(|err| match err {
            LoginError::InvalidCredentials => {
                AppError::Unauthorized("Credenciais inválidas".to_string())
            }
            LoginError::Read(err) => AppError::Internal(err.to_string()),
        })?;

    let (tipo_usuario, id, nome) = match login {
        Login::Admin => ("admin", None, None),
        Login::Instructor { id, name } => ("professor", Some(id.to_string()), Some(name.to_string())),
        Login::Student { id, name } => ("aluno", Some(id.to_string()), Some(name.to_string())),
    };
    info!("{tipo_usuario} logged in");

    Ok(Json(LoginResponse {
        tipo_usuario,
        id,
        nome,
        sistema_status: state.status().await,
    }))
}
