use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};
use mundofit_domain::{StudentID, WorkoutFilter, WorkoutID, WorkoutService};
use mundofit_storage::records;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    error::AppError,
    payload::{Created, WorkoutPayload},
    state::AppState,
};

const NOT_FOUND: &str = "Treino não encontrado";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/treinos", get(list).post(create))
        .route("/treinos/{id}", get(read).put(update).delete(remove))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkoutQuery {
    aluno_id: Option<String>,
    dia_semana: Option<String>,
}

impl From<WorkoutQuery> for WorkoutFilter {
    fn from(value: WorkoutQuery) -> Self {
        WorkoutFilter::new(
            value
                .aluno_id
                .filter(|id| !id.is_empty())
                .map(StudentID::from),
            value.dia_semana.as_deref().filter(|day| !day.is_empty()),
        )
    }
}

async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<WorkoutPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Created>), AppError> {
    let Json(payload) = payload?;
    let workout = state
        .service
        .create_workout(payload.into_workout()?)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(Created {
            id: workout.id.to_string(),
        }),
    ))
}

async fn list(
    State(state): State<Arc<AppState>>,
    query: Result<Query<WorkoutQuery>, QueryRejection>,
) -> Result<Json<Vec<records::Workout>>, AppError> {
    let Query(query) = query?;
    let workouts = state
        .service
        .get_workouts(&query.into())
        .await
        .map_err(|err| AppError::from_read(err, NOT_FOUND))?;
    Ok(Json(workouts.iter().map(records::Workout::from).collect()))
}

async fn read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<WorkoutID>,
) -> Result<Json<records::Workout>, AppError> {
    let workout = state
        .service
        .get_workout(&id)
        .await
        .map_err(|err| AppError::from_read(err, NOT_FOUND))?;
    Ok(Json(records::Workout::from(&workout)))
}

async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<WorkoutID>,
    payload: Result<Json<WorkoutPayload>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(payload) = payload?;
    state
        .service
        .modify_workout(&id, payload.into_update()?)
        .await
        .map_err(|err| AppError::from_update(err, NOT_FOUND))?;
    Ok(Json(json!({ "message": "Treino atualizado com sucesso" })))
}

async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<WorkoutID>,
) -> Result<Json<Value>, AppError> {
    state.service.delete_workout(&id).await?;
    Ok(Json(json!({ "message": "Treino removido com sucesso" })))
}
