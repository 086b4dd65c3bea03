use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::error;
use mundofit_domain::{
    CreateError, DeleteError, PasswordError, ReadError, UpdateError, ValidationError,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// `missing` is the message returned if the requested document does not exist.
    pub fn from_read(err: ReadError, missing: &str) -> Self {
        match err {
            ReadError::NotFound => AppError::NotFound(missing.to_string()),
            ReadError::Storage(_) | ReadError::Other(_) => AppError::Internal(err.to_string()),
        }
    }

    pub fn from_update(err: UpdateError, missing: &str) -> Self {
        match err {
            UpdateError::NotFound => AppError::NotFound(missing.to_string()),
            UpdateError::Conflict(message) => AppError::Conflict(message),
            UpdateError::Storage(_) | UpdateError::Other(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<CreateError> for AppError {
    fn from(value: CreateError) -> Self {
        match value {
            CreateError::Conflict(message) => AppError::Conflict(message),
            CreateError::Storage(_) | CreateError::Other(_) => {
                AppError::Internal(value.to_string())
            }
        }
    }
}

impl From<DeleteError> for AppError {
    fn from(value: DeleteError) -> Self {
        AppError::Internal(value.to_string())
    }
}

impl From<ValidationError> for AppError {
    fn from(value: ValidationError) -> Self {
        match value {
            ValidationError::Password(err) => err.into(),
            _ => AppError::Validation(value.to_string()),
        }
    }
}

impl From<PasswordError> for AppError {
    fn from(value: PasswordError) -> Self {
        match value {
            PasswordError::Empty => AppError::Validation(value.to_string()),
            PasswordError::Hashing(_) => AppError::Internal(value.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        AppError::MalformedPayload(value.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(value: QueryRejection) -> Self {
        AppError::MalformedPayload(value.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. }
            | AppError::Validation { .. }
            | AppError::MalformedPayload { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Internal { .. } => {
                error!("{self}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = match self {
            AppError::Unauthorized(message) => json!({ "sucesso": false, "mensagem": message }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::Value;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[rstest]
    #[case::not_found(
        AppError::NotFound("Aluno não encontrado".to_string()),
        StatusCode::NOT_FOUND,
        json!({ "error": "Aluno não encontrado" })
    )]
    #[case::conflict(
        AppError::Conflict("Email já cadastrado".to_string()),
        StatusCode::BAD_REQUEST,
        json!({ "error": "Email já cadastrado" })
    )]
    #[case::validation(
        AppError::Validation("Name must not be empty".to_string()),
        StatusCode::BAD_REQUEST,
        json!({ "error": "Name must not be empty" })
    )]
    #[case::unauthorized(
        AppError::Unauthorized("Credenciais inválidas".to_string()),
        StatusCode::UNAUTHORIZED,
        json!({ "sucesso": false, "mensagem": "Credenciais inválidas" })
    )]
    #[case::internal(
        AppError::Internal("disk full".to_string()),
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "Internal error: disk full" })
    )]
    #[tokio::test]
    async fn test_into_response(
        #[case] err: AppError,
        #[case] status: StatusCode,
        #[case] body: Value,
    ) {
        assert_eq!(render(err).await, (status, body));
    }

    #[test]
    fn test_from_read() {
        assert!(matches!(
            AppError::from_read(ReadError::NotFound, "Treino não encontrado"),
            AppError::NotFound(message) if message == "Treino não encontrado"
        ));
        assert!(matches!(
            AppError::from_read(
                ReadError::Storage(mundofit_domain::StorageError::NoConnection),
                "Treino não encontrado"
            ),
            AppError::Internal(_)
        ));
    }

    #[test]
    fn test_from_update() {
        assert!(matches!(
            AppError::from_update(UpdateError::NotFound, "Exercício não encontrado"),
            AppError::NotFound(message) if message == "Exercício não encontrado"
        ));
        assert!(matches!(
            AppError::from_update(UpdateError::Conflict("taken".to_string()), "-"),
            AppError::Conflict(message) if message == "taken"
        ));
    }

    #[test]
    fn test_from_validation_error() {
        assert!(matches!(
            AppError::from(ValidationError::Password(PasswordError::Empty)),
            AppError::Validation(_)
        ));
        assert!(matches!(
            AppError::from(ValidationError::Missing("nm_aluno")),
            AppError::Validation(message) if message == "missing field: nm_aluno"
        ));
    }
}
