use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use log::info;
use mundofit_domain::{AccountService, Email, RecoveryError, StudentID, StudentService};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    error::AppError,
    payload::{Created, NewStudentPayload, StudentResponse, StudentUpdatePayload},
    state::AppState,
};

const NOT_FOUND: &str = "Aluno não encontrado";
const PASSWORD_RESET: &str = "Senha redefinida com sucesso";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/alunos", get(list).post(create))
        .route("/alunos/recuperar-senha", post(request_recovery))
        .route("/alunos/redefinir-senha", post(reset_password))
        .route("/alunos/redefinir-senha-simples", post(reset_password_by_email))
        .route("/alunos/{id}", get(read).put(update).delete(remove))
}

async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewStudentPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Created>), AppError> {
    let Json(payload) = payload?;
    let password = state.hash_password(payload.cd_senha_al.clone()).await?;
    let student = state
        .service
        .create_student(payload.into_student(password)?)
        .await?;
    info!("created student {}", student.id);
    Ok((
        StatusCode::CREATED,
        Json(Created {
            id: student.id.to_string(),
        }),
    ))
}

async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<StudentResponse>>, AppError> {
    let students = state
        .service
        .get_students()
        .await
        .map_err(|err| AppError::from_read(err, NOT_FOUND))?;
    Ok(Json(students.iter().map(StudentResponse::from).collect()))
}

async fn read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<StudentID>,
) -> Result<Json<StudentResponse>, AppError> {
    let student = state
        .service
        .get_student(&id)
        .await
        .map_err(|err| AppError::from_read(err, NOT_FOUND))?;
    Ok(Json(StudentResponse::from(&student)))
}

async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<StudentID>,
    payload: Result<Json<StudentUpdatePayload>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(mut payload) = payload?;
    let password = match payload.cd_senha_al.take() {
        Some(password) => Some(state.hash_password(password).await?),
        None => None,
    };
    state
        .service
        .modify_student(&id, payload.into_update(password)?)
        .await
        .map_err(|err| AppError::from_update(err, NOT_FOUND))?;
    Ok(Json(json!({ "mensagem": "Aluno atualizado com sucesso" })))
}

async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<StudentID>,
) -> Result<Json<Value>, AppError> {
    state.service.delete_student(&id).await?;
    Ok(Json(json!({ "mensagem": "Aluno removido com sucesso" })))
}

#[derive(Deserialize)]
struct RecoveryRequest {
    email: String,
}

async fn request_recovery(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecoveryRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(request) = payload?;
    let email = Email::new(&request.email).map_err(|err| AppError::Validation(err.to_string()))?;

    let code = state
        .service
        .request_password_recovery(&email)
        .await
        .map_err(|err| match err {
            RecoveryError::UnknownEmail(_) => AppError::NotFound("E-mail não encontrado".to_string()),
            RecoveryError::Read(err) => AppError::Internal(err.to_string()),
            RecoveryError::Create(err) => err.into(),
        })?;
    info!("issued recovery code for student {}", code.student_id);

    Ok(Json(json!({
        "mensagem": "Código de recuperação enviado para seu e-mail",
        "alunoId": code.student_id,
        "codigo": code.code,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResetRequest {
    #[serde(default)]
    aluno_id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    nova_senha: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

async fn reset_password(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ResetRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(request) = payload?;
    let (Some(id), Some(password)) = (present(request.aluno_id), present(request.nova_senha))
    else {
        return Err(AppError::Validation("Dados incompletos".to_string()));
    };

    let password = state.hash_password(password).await?;
    state
        .service
        .reset_password(&StudentID::from(id), password)
        .await
        .map_err(|err| AppError::from_update(err, NOT_FOUND))?;
    Ok(Json(json!({ "mensagem": PASSWORD_RESET })))
}

async fn reset_password_by_email(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ResetRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(request) = payload?;
    let (Some(email), Some(password)) = (present(request.email), present(request.nova_senha))
    else {
        return Err(AppError::Validation(
            "Informe email e nova senha".to_string(),
        ));
    };
    let email = Email::new(&email).map_err(|err| AppError::Validation(err.to_string()))?;

    let password = state.hash_password(password).await?;
    state
        .service
        .reset_password_by_email(&email, password)
        .await
        .map_err(|err| AppError::from_update(err, NOT_FOUND))?;
    Ok(Json(json!({ "mensagem": PASSWORD_RESET })))
}
