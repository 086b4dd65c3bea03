use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{CreateError, ReadError, StudentID};

use super::{Recommendation, StudentProfile};

pub const DEFAULT_HISTORY_LIMIT: usize = 5;

#[async_trait]
pub trait RecommendationHistoryService: Send + Sync {
    async fn record_recommendation(
        &self,
        record: NewRecommendationRecord,
    ) -> Result<RecommendationRecord, CreateError>;
    /// The student's latest `limit` records, newest first.
    async fn get_recommendation_history(
        &self,
        student_id: &StudentID,
        limit: usize,
    ) -> Result<Vec<RecommendationRecord>, ReadError>;
}

#[async_trait]
pub trait RecommendationRecordRepository: Send + Sync {
    async fn read_recommendation_records(&self) -> Result<Vec<RecommendationRecord>, ReadError>;
    async fn create_recommendation_record(
        &self,
        record: NewRecommendationRecord,
    ) -> Result<RecommendationRecord, CreateError>;
}

/// A recommendation handed out to a student, with the profile it was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationRecord {
    pub id: RecommendationID,
    pub student_id: StudentID,
    pub created_at: DateTime<Utc>,
    pub recommendation: Recommendation,
    pub profile: StudentProfile,
    pub used: bool,
}

impl RecommendationRecord {
    #[must_use]
    pub fn latest(
        records: Vec<RecommendationRecord>,
        student_id: &StudentID,
        limit: usize,
    ) -> Vec<RecommendationRecord> {
        let mut records = records
            .into_iter()
            .filter(|r| r.student_id == *student_id)
            .collect::<Vec<_>>();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        records
    }
}

document_id!(RecommendationID);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecommendationRecord {
    pub student_id: StudentID,
    pub recommendation: Recommendation,
    pub profile: StudentProfile,
}

impl NewRecommendationRecord {
    #[must_use]
    pub fn into_record(self, id: RecommendationID, now: DateTime<Utc>) -> RecommendationRecord {
        RecommendationRecord {
            id,
            student_id: self.student_id,
            created_at: now,
            recommendation: self.recommendation,
            profile: self.profile,
            used: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    use super::*;

    fn record(id: &str, student_id: &str, minutes: i64) -> RecommendationRecord {
        NewRecommendationRecord {
            student_id: student_id.into(),
            recommendation: Recommendation {
                category: "core".to_string(),
                exercises: vec![],
                notes: vec!["Recomendação genérica".to_string()],
            },
            profile: StudentProfile::new(Some("core"), None),
        }
        .into_record(
            id.into(),
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap() + Duration::minutes(minutes),
        )
    }

    #[test]
    fn test_into_record_is_unused() {
        assert!(!record("1", "a1", 0).used);
    }

    #[test]
    fn test_latest() {
        let records = vec![
            record("1", "a1", 0),
            record("2", "a1", 30),
            record("3", "a2", 40),
            record("4", "a1", 10),
            record("5", "a1", 20),
        ];

        assert_eq!(
            RecommendationRecord::latest(records.clone(), &"a1".into(), 3)
                .iter()
                .map(|r| r.id.as_str())
                .collect::<Vec<_>>(),
            vec!["2", "5", "4"]
        );
        assert_eq!(
            RecommendationRecord::latest(records.clone(), &"a2".into(), DEFAULT_HISTORY_LIMIT)
                .len(),
            1
        );
        assert!(RecommendationRecord::latest(records, &"a3".into(), 5).is_empty());
    }
}
