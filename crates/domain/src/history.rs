use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{CreateError, DeleteError, ReadError, StudentID, UpdateError, WorkoutID};

#[async_trait]
pub trait HistoryService: Send + Sync {
    async fn get_history(&self, filter: &HistoryFilter) -> Result<Vec<HistoryEntry>, ReadError>;
    async fn get_history_entry(&self, id: &HistoryID) -> Result<HistoryEntry, ReadError>;
    async fn create_history_entry(&self, entry: NewHistoryEntry)
    -> Result<HistoryEntry, CreateError>;
    async fn modify_history_entry(
        &self,
        id: &HistoryID,
        update: HistoryUpdate,
    ) -> Result<HistoryEntry, UpdateError>;
    async fn delete_history_entry(&self, id: &HistoryID) -> Result<HistoryID, DeleteError>;
}

#[async_trait]
pub trait HistoryRepository: Send + Sync {
    async fn read_history(&self) -> Result<Vec<HistoryEntry>, ReadError>;
    async fn read_history_entry(&self, id: &HistoryID) -> Result<HistoryEntry, ReadError>;
    async fn create_history_entry(&self, entry: NewHistoryEntry)
    -> Result<HistoryEntry, CreateError>;
    async fn replace_history_entry(&self, entry: HistoryEntry)
    -> Result<HistoryEntry, UpdateError>;
    async fn delete_history_entry(&self, id: &HistoryID) -> Result<HistoryID, DeleteError>;
}

/// Record of a training a student performed. Entries without a workout are free-form log
/// entries, e.g. weigh-ins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: HistoryID,
    pub student_id: Option<StudentID>,
    pub workout_id: Option<WorkoutID>,
    pub performed_at: DateTime<Utc>,
    pub weight_ref: Option<String>,
    pub comments: Option<String>,
}

impl HistoryEntry {
    #[must_use]
    pub fn is_completed_workout(&self) -> bool {
        self.workout_id.is_some()
    }
}

document_id!(HistoryID);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryEntry {
    pub student_id: Option<StudentID>,
    pub workout_id: Option<WorkoutID>,
    pub performed_at: Option<DateTime<Utc>>,
    pub weight_ref: Option<String>,
    pub comments: Option<String>,
}

impl NewHistoryEntry {
    #[must_use]
    pub fn into_entry(self, id: HistoryID, now: DateTime<Utc>) -> HistoryEntry {
        HistoryEntry {
            id,
            student_id: self.student_id,
            workout_id: self.workout_id,
            performed_at: self.performed_at.unwrap_or(now),
            weight_ref: self.weight_ref,
            comments: self.comments,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HistoryUpdate {
    pub student_id: Option<StudentID>,
    pub workout_id: Option<WorkoutID>,
    pub performed_at: Option<DateTime<Utc>>,
    pub weight_ref: Option<String>,
    pub comments: Option<String>,
}

impl HistoryUpdate {
    #[must_use]
    pub fn apply(self, entry: HistoryEntry) -> HistoryEntry {
        HistoryEntry {
            id: entry.id,
            student_id: self.student_id.or(entry.student_id),
            workout_id: self.workout_id.or(entry.workout_id),
            performed_at: self.performed_at.unwrap_or(entry.performed_at),
            weight_ref: self.weight_ref.or(entry.weight_ref),
            comments: self.comments.or(entry.comments),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HistoryFilter {
    pub student_id: Option<StudentID>,
    pub completed_only: bool,
}

impl HistoryFilter {
    #[must_use]
    pub fn entries<'a>(
        &self,
        entries: impl Iterator<Item = &'a HistoryEntry>,
    ) -> Vec<&'a HistoryEntry> {
        entries
            .filter(|e| {
                self.student_id
                    .as_ref()
                    .is_none_or(|id| e.student_id.as_ref() == Some(id))
                    && (!self.completed_only || e.is_completed_workout())
            })
            .collect()
    }
}
