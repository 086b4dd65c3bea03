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
use mundofit_domain::{HistoryFilter, HistoryID, HistoryService, StudentID};
use mundofit_storage::records;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    error::AppError,
    payload::{Created, HistoryPayload},
    state::AppState,
};

const NOT_FOUND: &str = "Registro histórico não encontrado";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/historicos", get(list).post(create))
        .route("/historicos/concluidos", get(completed))
        .route("/historicos/{id}", get(read).put(update).delete(remove))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryQuery {
    aluno_id: Option<String>,
    /// `treino` restricts the result to completed workouts.
    tipo: Option<String>,
}

impl HistoryQuery {
    fn filter(self, completed_only: bool) -> HistoryFilter {
        HistoryFilter {
            student_id: self
                .aluno_id
                .filter(|id| !id.is_empty())
                .map(StudentID::from),
            completed_only: completed_only || self.tipo.as_deref() == Some("treino"),
        }
    }
}

async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<HistoryPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Created>), AppError> {
    let Json(payload) = payload?;
    let entry = state
        .service
        .create_history_entry(payload.into_entry())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(Created {
            id: entry.id.to_string(),
        }),
    ))
}

async fn list(
    State(state): State<Arc<AppState>>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<records::HistoryEntry>>, AppError> {
    let Query(query) = query?;
    find(&state, query.filter(false)).await
}

async fn completed(
    State(state): State<Arc<AppState>>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<records::HistoryEntry>>, AppError> {
    let Query(query) = query?;
    find(&state, query.filter(true)).await
}

async fn find(
    state: &AppState,
    filter: HistoryFilter,
) -> Result<Json<Vec<records::HistoryEntry>>, AppError> {
    let entries = state
        .service
        .get_history(&filter)
        .await
        .map_err(|err| AppError::from_read(err, NOT_FOUND))?;
    Ok(Json(entries.iter().map(records::HistoryEntry::from).collect()))
}

async fn read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<HistoryID>,
) -> Result<Json<records::HistoryEntry>, AppError> {
    let entry = state
        .service
        .get_history_entry(&id)
        .await
        .map_err(|err| AppError::from_read(err, NOT_FOUND))?;
    Ok(Json(records::HistoryEntry::from(&entry)))
}

async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<HistoryID>,
    payload: Result<Json<HistoryPayload>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(payload) = payload?;
    state
        .service
        .modify_history_entry(&id, payload.into_update())
        .await
        .map_err(|err| AppError::from_update(err, NOT_FOUND))?;
    Ok(Json(json!({ "message": "Histórico atualizado com sucesso" })))
}

async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<HistoryID>,
) -> Result<Json<Value>, AppError> {
    state.service.delete_history_entry(&id).await?;
    Ok(Json(json!({ "message": "Histórico removido com sucesso" })))
}
