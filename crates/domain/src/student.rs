use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{CreateError, DeleteError, Email, Name, PasswordHash, ReadError, UpdateError};

pub const DEFAULT_STUDENT_STATUS: &str = "ativo";

#[async_trait]
pub trait StudentService: Send + Sync {
    async fn get_students(&self) -> Result<Vec<Student>, ReadError>;
    async fn get_student(&self, id: &StudentID) -> Result<Student, ReadError>;
    async fn get_student_by_email(&self, email: &Email) -> Result<Student, ReadError>;
    async fn create_student(&self, student: NewStudent) -> Result<Student, CreateError>;
    async fn modify_student(
        &self,
        id: &StudentID,
        update: StudentUpdate,
    ) -> Result<Student, UpdateError>;
    async fn delete_student(&self, id: &StudentID) -> Result<StudentID, DeleteError>;
}

#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn read_students(&self) -> Result<Vec<Student>, ReadError>;
    async fn read_student(&self, id: &StudentID) -> Result<Student, ReadError>;
    async fn create_student(&self, student: NewStudent) -> Result<Student, CreateError>;
    async fn replace_student(&self, student: Student) -> Result<Student, UpdateError>;
    async fn delete_student(&self, id: &StudentID) -> Result<StudentID, DeleteError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: StudentID,
    pub name: Name,
    pub email: Email,
    pub password: PasswordHash,
    pub status: String,
    pub registered_at: DateTime<Utc>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub gender: Option<String>,
    pub target_weight: Option<f64>,
}

document_id!(StudentID);

#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub name: Name,
    pub email: Email,
    pub password: PasswordHash,
    pub status: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub gender: Option<String>,
}

impl NewStudent {
    /// Completes the record the way it is first stored: status defaults to active and no target
    /// weight is set yet.
    #[must_use]
    pub fn into_student(self, id: StudentID, registered_at: DateTime<Utc>) -> Student {
        Student {
            id,
            name: self.name,
            email: self.email,
            password: self.password,
            status: self
                .status
                .unwrap_or_else(|| DEFAULT_STUDENT_STATUS.to_string()),
            registered_at,
            weight: self.weight,
            height: self.height,
            gender: self.gender,
            target_weight: None,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct StudentUpdate {
    pub name: Option<Name>,
    pub email: Option<Email>,
    pub password: Option<PasswordHash>,
    pub status: Option<String>,
    pub registered_at: Option<DateTime<Utc>>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub gender: Option<String>,
    pub target_weight: Option<f64>,
}

impl StudentUpdate {
    #[must_use]
    pub fn apply(self, student: Student) -> Student {
        Student {
            id: student.id,
            name: self.name.unwrap_or(student.name),
            email: self.email.unwrap_or(student.email),
            password: self.password.unwrap_or(student.password),
            status: self.status.unwrap_or(student.status),
            registered_at: self.registered_at.unwrap_or(student.registered_at),
            weight: self.weight.or(student.weight),
            height: self.height.or(student.height),
            gender: self.gender.or(student.gender),
            target_weight: self.target_weight.or(student.target_weight),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn new_student() -> NewStudent {
        NewStudent {
            name: Name::new("Ana").unwrap(),
            email: Email::new("ana@mundofit.com").unwrap(),
            password: PasswordHash::from_hash("hash".to_string()),
            status: None,
            weight: Some(61.5),
            height: Some(1.68),
            gender: Some("F".to_string()),
        }
    }

    #[test]
    fn test_new_student_into_student() {
        let registered_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let student = new_student().into_student("a1".into(), registered_at);

        assert_eq!(student.id, StudentID::from("a1"));
        assert_eq!(student.status, DEFAULT_STUDENT_STATUS);
        assert_eq!(student.registered_at, registered_at);
        assert_eq!(student.target_weight, None);
        assert_eq!(student.weight, Some(61.5));
    }

    #[test]
    fn test_new_student_into_student_keeps_status() {
        let student = NewStudent {
            status: Some("inativo".to_string()),
            ..new_student()
        }
        .into_student("a1".into(), Utc::now());

        assert_eq!(student.status, "inativo");
    }

    #[test]
    fn test_student_update_apply() {
        let student = new_student().into_student("a1".into(), Utc::now());

        assert_eq!(StudentUpdate::default().apply(student.clone()), student);

        let updated = StudentUpdate {
            name: Some(Name::new("Ana Souza").unwrap()),
            target_weight: Some(58.0),
            ..StudentUpdate::default()
        }
        .apply(student.clone());

        assert_eq!(updated.name, Name::new("Ana Souza").unwrap());
        assert_eq!(updated.target_weight, Some(58.0));
        assert_eq!(updated.email, student.email);
        assert_eq!(updated.id, student.id);
    }
}
