use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::{
    CreateError, Email, InstructorID, Name, PasswordHash, ReadError, StudentID, UpdateError,
};

pub const RECOVERY_CODE_VALIDITY_MINUTES: i64 = 15;

#[async_trait]
pub trait AccountService: Send + Sync {
    /// Checks the administrator first, then instructors, then students.
    async fn login(&self, email: &str, password: &str) -> Result<Login, LoginError>;
    async fn request_password_recovery(&self, email: &Email)
    -> Result<RecoveryCode, RecoveryError>;
    async fn reset_password(
        &self,
        id: &StudentID,
        password: PasswordHash,
    ) -> Result<StudentID, UpdateError>;
    async fn reset_password_by_email(
        &self,
        email: &Email,
        password: PasswordHash,
    ) -> Result<StudentID, UpdateError>;
}

#[async_trait]
pub trait RecoveryCodeRepository: Send + Sync {
    /// Replaces any code previously issued for the same e-mail address.
    async fn write_recovery_code(&self, code: RecoveryCode) -> Result<RecoveryCode, CreateError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Login {
    Admin,
    Instructor { id: InstructorID, name: Name },
    Student { id: StudentID, name: Name },
}

#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

impl AdminCredentials {
    #[must_use]
    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LoginError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Read(#[from] ReadError),
}

#[derive(thiserror::Error, Debug)]
pub enum RecoveryError {
    #[error("no student with e-mail {0}")]
    UnknownEmail(Email),
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Create(#[from] CreateError),
}

/// Six-digit code a student uses to prove ownership of an e-mail address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryCode {
    pub email: Email,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub student_id: StudentID,
}

impl RecoveryCode {
    pub fn issue<G: Rng + ?Sized>(
        email: Email,
        student_id: StudentID,
        now: DateTime<Utc>,
        rng: &mut G,
    ) -> Self {
        Self {
            email,
            code: rng.gen_range(100_000..1_000_000).to_string(),
            expires_at: now + Duration::minutes(RECOVERY_CODE_VALIDITY_MINUTES),
            student_id,
        }
    }

    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}
