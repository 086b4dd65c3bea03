use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::get,
};
use log::warn;
use mundofit_domain::{
    StudentID, StudentService,
    recommendation::{
        DEFAULT_HISTORY_LIMIT, NewRecommendationRecord, Recommendation,
        RecommendationHistoryService, StudentProfile,
    },
};
use mundofit_storage::records;
use serde::Deserialize;

use crate::{error::AppError, state::AppState};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ml/recomendar", get(recommend_query).post(recommend_body))
        .route("/ml/historico/{aluno_id}", get(history))
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RecommendationRequest {
    #[serde(default)]
    aluno_id: Option<String>,
    #[serde(default)]
    tipo: Option<String>,
    #[serde(default)]
    nome: Option<String>,
}

async fn recommend_query(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RecommendationRequest>, QueryRejection>,
) -> Result<Json<Recommendation>, AppError> {
    let Query(request) = query?;
    recommend(&state, request).await
}

async fn recommend_body(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<Recommendation>, AppError> {
    let Json(request) = payload?;
    recommend(&state, request).await
}

/// Engine failures are part of the returned recommendation, only an unknown student is an error.
async fn recommend(
    state: &AppState,
    request: RecommendationRequest,
) -> Result<Json<Recommendation>, AppError> {
    let student = match request.aluno_id.filter(|id| !id.trim().is_empty()) {
        Some(id) => Some(
            state
                .service
                .get_student(&StudentID::from(id))
                .await
                .map_err(|err| AppError::from_read(err, "Aluno não encontrado"))?,
        ),
        None => None,
    };

    let name = request
        .nome
        .filter(|name| !name.trim().is_empty())
        .or_else(|| student.as_ref().map(|s| s.name.to_string()));
    let profile = StudentProfile::new(request.tipo.as_deref(), name.as_deref());
    let recommendation = state.recommender.recommend(&profile).await;

    if let Some(student) = student.filter(|_| !recommendation.is_error()) {
        if let Err(err) = state
            .service
            .record_recommendation(NewRecommendationRecord {
                student_id: student.id,
                recommendation: recommendation.clone(),
                profile,
            })
            .await
        {
            warn!("recommendation not recorded: {err}");
        }
    }

    Ok(Json(recommendation))
}

#[derive(Deserialize)]
struct HistoryQuery {
    limit: Option<usize>,
}

async fn history(
    State(state): State<Arc<AppState>>,
    Path(aluno_id): Path<StudentID>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<records::RecommendationRecord>>, AppError> {
    let Query(query) = query?;
    let entries = state
        .service
        .get_recommendation_history(&aluno_id, query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
        .await
        .map_err(|err| AppError::Internal(err.to_string()))?;
    Ok(Json(
        entries
            .iter()
            .map(records::RecommendationRecord::from)
            .collect(),
    ))
}
