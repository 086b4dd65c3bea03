use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{CreateError, DeleteError, Email, Name, PasswordHash, ReadError, UpdateError};

#[async_trait]
pub trait InstructorService: Send + Sync {
    async fn get_instructors(&self) -> Result<Vec<Instructor>, ReadError>;
    async fn get_instructor(&self, id: &InstructorID) -> Result<Instructor, ReadError>;
    /// Fails with [`CreateError::Conflict`] if the e-mail address is already registered.
    async fn create_instructor(&self, instructor: NewInstructor)
    -> Result<Instructor, CreateError>;
    async fn modify_instructor(
        &self,
        id: &InstructorID,
        update: InstructorUpdate,
    ) -> Result<Instructor, UpdateError>;
    async fn delete_instructor(&self, id: &InstructorID) -> Result<InstructorID, DeleteError>;
}

#[async_trait]
pub trait InstructorRepository: Send + Sync {
    async fn read_instructors(&self) -> Result<Vec<Instructor>, ReadError>;
    async fn read_instructor(&self, id: &InstructorID) -> Result<Instructor, ReadError>;
    async fn create_instructor(&self, instructor: NewInstructor)
    -> Result<Instructor, CreateError>;
    async fn replace_instructor(&self, instructor: Instructor) -> Result<Instructor, UpdateError>;
    async fn delete_instructor(&self, id: &InstructorID) -> Result<InstructorID, DeleteError>;
}

/// Extra profile fields (phone, specialty, ...) are kept as given, without interpretation.
pub type Attributes = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct Instructor {
    pub id: InstructorID,
    pub name: Name,
    pub email: Email,
    pub password: PasswordHash,
    pub registered_at: DateTime<Utc>,
    pub attributes: Attributes,
}

document_id!(InstructorID);

#[derive(Debug, Clone, PartialEq)]
pub struct NewInstructor {
    pub name: Name,
    pub email: Email,
    pub password: PasswordHash,
    pub attributes: Attributes,
}

impl NewInstructor {
    #[must_use]
    pub fn into_instructor(self, id: InstructorID, registered_at: DateTime<Utc>) -> Instructor {
        Instructor {
            id,
            name: self.name,
            email: self.email,
            password: self.password,
            registered_at,
            attributes: self.attributes,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct InstructorUpdate {
    pub name: Option<Name>,
    pub email: Option<Email>,
    pub password: Option<PasswordHash>,
    pub attributes: Attributes,
}

impl InstructorUpdate {
    /// Given attributes are merged into the existing ones.
    #[must_use]
    pub fn apply(self, instructor: Instructor) -> Instructor {
        let mut attributes = instructor.attributes;
        attributes.extend(self.attributes);
        Instructor {
            id: instructor.id,
            name: self.name.unwrap_or(instructor.name),
            email: self.email.unwrap_or(instructor.email),
            password: self.password.unwrap_or(instructor.password),
            registered_at: instructor.registered_at,
            attributes,
        }
    }
}
