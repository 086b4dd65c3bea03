use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use mundofit_domain::{ExerciseID, ExerciseService};
use mundofit_storage::records;
use serde_json::{Value, json};

use crate::{
    error::AppError,
    payload::{Created, ExerciseUpdatePayload, NewExercisePayload},
    state::AppState,
};

const NOT_FOUND: &str = "Exercício não encontrado";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/exercicios", get(list).post(create))
        .route("/exercicios/{id}", get(read).put(update).delete(remove))
}

async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewExercisePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Created>), AppError> {
    let Json(payload) = payload?;
    let exercise = state
        .service
        .create_exercise(payload.into_exercise()?)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(Created {
            id: exercise.id.to_string(),
        }),
    ))
}

async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<records::Exercise>>, AppError> {
    let exercises = state
        .service
        .get_exercises()
        .await
        .map_err(|err| AppError::from_read(err, NOT_FOUND))?;
    Ok(Json(exercises.iter().map(records::Exercise::from).collect()))
}

async fn read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ExerciseID>,
) -> Result<Json<records::Exercise>, AppError> {
    let exercise = state
        .service
        .get_exercise(&id)
        .await
        .map_err(|err| AppError::from_read(err, NOT_FOUND))?;
    Ok(Json(records::Exercise::from(&exercise)))
}

async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ExerciseID>,
    payload: Result<Json<ExerciseUpdatePayload>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(payload) = payload?;
    state
        .service
        .modify_exercise(&id, payload.into_update()?)
        .await
        .map_err(|err| AppError::from_update(err, NOT_FOUND))?;
    Ok(Json(json!({ "message": "Exercício atualizado com sucesso" })))
}

async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ExerciseID>,
) -> Result<Json<Value>, AppError> {
    state.service.delete_exercise(&id).await?;
    Ok(Json(json!({ "message": "Exercício removido com sucesso" })))
}
