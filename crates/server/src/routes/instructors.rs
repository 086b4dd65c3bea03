use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use log::info;
use mundofit_domain::{CreateError, InstructorID, InstructorService};
use serde_json::{Value, json};

use crate::{
    error::AppError,
    payload::{Created, InstructorResponse, InstructorUpdatePayload, NewInstructorPayload},
    state::AppState,
};

const NOT_FOUND: &str = "Professor não encontrado";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/professores", get(list).post(create))
        .route("/professores/{id}", get(read).put(update).delete(remove))
}

async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewInstructorPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Created>), AppError> {
    let Json(payload) = payload?;
    let password = state.hash_password(payload.cd_senha_pf.clone()).await?;
    let instructor = state
        .service
        .create_instructor(payload.into_instructor(password)?)
        .await
        .map_err(|err| match err {
            CreateError::Conflict(_) => AppError::Conflict("Email já cadastrado".to_string()),
            err => err.into(),
        })?;
    info!("created instructor {}", instructor.id);
    Ok((
        StatusCode::CREATED,
        Json(Created {
            id: instructor.id.to_string(),
        }),
    ))
}

async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<InstructorResponse>>, AppError> {
    let instructors = state
        .service
        .get_instructors()
        .await
        .map_err(|err| AppError::from_read(err, NOT_FOUND))?;
    Ok(Json(instructors.iter().map(InstructorResponse::from).collect()))
}

async fn read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<InstructorID>,
) -> Result<Json<InstructorResponse>, AppError> {
    let instructor = state
        .service
        .get_instructor(&id)
        .await
        .map_err(|err| AppError::from_read(err, NOT_FOUND))?;
    Ok(Json(InstructorResponse::from(&instructor)))
}

async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<InstructorID>,
    payload: Result<Json<InstructorUpdatePayload>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(mut payload) = payload?;
    let password = match payload.cd_senha_pf.take() {
        Some(password) => Some(state.hash_password(password).await?),
        None => None,
    };
    state
        .service
        .modify_instructor(&id, payload.into_update(password)?)
        .await
        .map_err(|err| AppError::from_update(err, NOT_FOUND))?;
    Ok(Json(json!({ "message": "Professor atualizado com sucesso" })))
}

async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<InstructorID>,
) -> Result<Json<Value>, AppError> {
    state.service.delete_instructor(&id).await?;
    Ok(Json(json!({ "message": "Professor removido com sucesso" })))
}
