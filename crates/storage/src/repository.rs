use async_trait::async_trait;
use chrono::Utc;

use mundofit_domain::{self as domain, recommendation};

use crate::{
    Collection, DocumentStore,
    records::{
        Exercise, HistoryEntry, Instructor, RecommendationRecord, RecoveryCode, Student, Workout,
    },
};

#[async_trait]
impl domain::ExerciseRepository for DocumentStore {
    async fn read_exercises(&self) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        Ok(self
            .get_all_valid::<domain::Exercise, Exercise>(Collection::Exercises)
            .await)
    }

    async fn read_exercise(
        &self,
        id: &domain::ExerciseID,
    ) -> Result<domain::Exercise, domain::ReadError> {
        Ok(self
            .get::<domain::Exercise, Exercise>(Collection::Exercises, id)
            .await?)
    }

    async fn create_exercise(
        &self,
        exercise: domain::NewExercise,
    ) -> Result<domain::Exercise, domain::CreateError> {
        let exercise = domain::Exercise {
            id: DocumentStore::new_id().into(),
            name: exercise.name,
            description: exercise.description,
            type_label: exercise.type_label,
        };
        Ok(self
            .add(Collection::Exercises, Exercise::from(&exercise), exercise)
            .await?)
    }

    async fn replace_exercise(
        &self,
        exercise: domain::Exercise,
    ) -> Result<domain::Exercise, domain::UpdateError> {
        Ok(self
            .replace(Collection::Exercises, Exercise::from(&exercise), exercise)
            .await?)
    }

    async fn delete_exercise(
        &self,
        id: &domain::ExerciseID,
    ) -> Result<domain::ExerciseID, domain::DeleteError> {
        self.delete(Collection::Exercises, id).await?;
        Ok(id.clone())
    }
}

#[async_trait]
impl domain::StudentRepository for DocumentStore {
    async fn read_students(&self) -> Result<Vec<domain::Student>, domain::ReadError> {
        Ok(self
            .get_all::<domain::Student, Student>(Collection::Students)
            .await?)
    }

    async fn read_student(
        &self,
        id: &domain::StudentID,
    ) -> Result<domain::Student, domain::ReadError> {
        Ok(self
            .get::<domain::Student, Student>(Collection::Students, id)
            .await?)
    }

    async fn create_student(
        &self,
        student: domain::NewStudent,
    ) -> Result<domain::Student, domain::CreateError> {
        let student = student.into_student(DocumentStore::new_id().into(), Utc::now());
        Ok(self
            .add(Collection::Students, Student::from(&student), student)
            .await?)
    }

    async fn replace_student(
        &self,
        student: domain::Student,
    ) -> Result<domain::Student, domain::UpdateError> {
        Ok(self
            .replace(Collection::Students, Student::from(&student), student)
            .await?)
    }

    async fn delete_student(
        &self,
        id: &domain::StudentID,
    ) -> Result<domain::StudentID, domain::DeleteError> {
        self.delete(Collection::Students, id).await?;
        Ok(id.clone())
    }
}

#[async_trait]
impl domain::InstructorRepository for DocumentStore {
    async fn read_instructors(&self) -> Result<Vec<domain::Instructor>, domain::ReadError> {
        Ok(self
            .get_all::<domain::Instructor, Instructor>(Collection::Instructors)
            .await?)
    }

    async fn read_instructor(
        &self,
        id: &domain::InstructorID,
    ) -> Result<domain::Instructor, domain::ReadError> {
        Ok(self
            .get::<domain::Instructor, Instructor>(Collection::Instructors, id)
            .await?)
    }

    async fn create_instructor(
        &self,
        instructor: domain::NewInstructor,
    ) -> Result<domain::Instructor, domain::CreateError> {
        let instructor = instructor.into_instructor(DocumentStore::new_id().into(), Utc::now());
        Ok(self
            .add(
                Collection::Instructors,
                Instructor::from(&instructor),
                instructor,
            )
            .await?)
    }

    async fn replace_instructor(
        &self,
        instructor: domain::Instructor,
    ) -> Result<domain::Instructor, domain::UpdateError> {
        Ok(self
            .replace(
                Collection::Instructors,
                Instructor::from(&instructor),
                instructor,
            )
            .await?)
    }

    async fn delete_instructor(
        &self,
        id: &domain::InstructorID,
    ) -> Result<domain::InstructorID, domain::DeleteError> {
        self.delete(Collection::Instructors, id).await?;
        Ok(id.clone())
    }
}

#[async_trait]
impl domain::WorkoutRepository for DocumentStore {
    async fn read_workouts(&self) -> Result<Vec<domain::Workout>, domain::ReadError> {
        Ok(self
            .get_all::<domain::Workout, Workout>(Collection::Workouts)
            .await?)
    }

    async fn read_workout(
        &self,
        id: &domain::WorkoutID,
    ) -> Result<domain::Workout, domain::ReadError> {
        Ok(self
            .get::<domain::Workout, Workout>(Collection::Workouts, id)
            .await?)
    }

    async fn create_workout(
        &self,
        workout: domain::NewWorkout,
    ) -> Result<domain::Workout, domain::CreateError> {
        let workout = workout.into_workout(DocumentStore::new_id().into(), Utc::now());
        Ok(self
            .add(Collection::Workouts, Workout::from(&workout), workout)
            .await?)
    }

    async fn replace_workout(
        &self,
        workout: domain::Workout,
    ) -> Result<domain::Workout, domain::UpdateError> {
        Ok(self
            .replace(Collection::Workouts, Workout::from(&workout), workout)
            .await?)
    }

    async fn delete_workout(
        &self,
        id: &domain::WorkoutID,
    ) -> Result<domain::WorkoutID, domain::DeleteError> {
        self.delete(Collection::Workouts, id).await?;
        Ok(id.clone())
    }
}

#[async_trait]
impl domain::HistoryRepository for DocumentStore {
    async fn read_history(&self) -> Result<Vec<domain::HistoryEntry>, domain::ReadError> {
        Ok(self
            .get_all::<domain::HistoryEntry, HistoryEntry>(Collection::History)
            .await?)
    }

    async fn read_history_entry(
        &self,
        id: &domain::HistoryID,
    ) -> Result<domain::HistoryEntry, domain::ReadError> {
        Ok(self
            .get::<domain::HistoryEntry, HistoryEntry>(Collection::History, id)
            .await?)
    }

    async fn create_history_entry(
        &self,
        entry: domain::NewHistoryEntry,
    ) -> Result<domain::HistoryEntry, domain::CreateError> {
        let entry = entry.into_entry(DocumentStore::new_id().into(), Utc::now());
        Ok(self
            .add(Collection::History, HistoryEntry::from(&entry), entry)
            .await?)
    }

    async fn replace_history_entry(
        &self,
        entry: domain::HistoryEntry,
    ) -> Result<domain::HistoryEntry, domain::UpdateError> {
        Ok(self
            .replace(Collection::History, HistoryEntry::from(&entry), entry)
            .await?)
    }

    async fn delete_history_entry(
        &self,
        id: &domain::HistoryID,
    ) -> Result<domain::HistoryID, domain::DeleteError> {
        self.delete(Collection::History, id).await?;
        Ok(id.clone())
    }
}

#[async_trait]
impl domain::RecoveryCodeRepository for DocumentStore {
    async fn write_recovery_code(
        &self,
        code: domain::RecoveryCode,
    ) -> Result<domain::RecoveryCode, domain::CreateError> {
        Ok(self
            .put(Collection::RecoveryCodes, RecoveryCode::from(&code), code)
            .await?)
    }
}

#[async_trait]
impl recommendation::RecommendationRecordRepository for DocumentStore {
    async fn read_recommendation_records(
        &self,
    ) -> Result<Vec<recommendation::RecommendationRecord>, domain::ReadError> {
        Ok(self
            .get_all::<recommendation::RecommendationRecord, RecommendationRecord>(
                Collection::Recommendations,
            )
            .await?)
    }

    async fn create_recommendation_record(
        &self,
        record: recommendation::NewRecommendationRecord,
    ) -> Result<recommendation::RecommendationRecord, domain::CreateError> {
        let record = record.into_record(DocumentStore::new_id().into(), Utc::now());
        Ok(self
            .add(
                Collection::Recommendations,
                RecommendationRecord::from(&record),
                record,
            )
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use mundofit_domain::{
        ExerciseRepository, HistoryRepository, InstructorRepository, RecoveryCodeRepository,
        StudentRepository, WorkoutRepository, recommendation::RecommendationRecordRepository,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    fn new_student(email: &str) -> domain::NewStudent {
        domain::NewStudent {
            name: domain::Name::new("Ana").unwrap(),
            email: domain::Email::new(email).unwrap(),
            password: domain::PasswordHash::from_hash("$2b$04$hash".to_string()),
            status: None,
            weight: None,
            height: None,
            gender: Some("F".to_string()),
        }
    }

    #[tokio::test]
    async fn test_exercises() {
        let store = DocumentStore::new();

        let exercise = store
            .create_exercise(domain::NewExercise {
                name: domain::Name::new("Prancha").unwrap(),
                description: None,
                type_label: Some("Abdômen".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(store.read_exercises().await.unwrap(), vec![exercise.clone()]);
        assert_eq!(store.read_exercise(&exercise.id).await.unwrap(), exercise);

        let replaced = store
            .replace_exercise(domain::Exercise {
                description: Some("Isometria".to_string()),
                ..exercise.clone()
            })
            .await
            .unwrap();
        assert_eq!(
            store.read_exercise(&exercise.id).await.unwrap(),
            replaced
        );

        store.delete_exercise(&exercise.id).await.unwrap();
        assert!(matches!(
            store.read_exercise(&exercise.id).await,
            Err(domain::ReadError::NotFound)
        ));
        assert!(matches!(
            store.replace_exercise(exercise).await,
            Err(domain::UpdateError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_malformed_exercises_do_not_block_recommendations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mundofit.json");
        std::fs::write(
            &path,
            serde_json::json!({
                "exercicios": {
                    "a": {"nm_exercicio": "Supino", "tipo_exercicio": "Peito"},
                    "b": {"nm_exercicio": "", "tipo_exercicio": "Pernas"},
                    "c": {"nm_exercicio": "Agachamento", "tipo_exercicio": 7},
                }
            })
            .to_string(),
        )
        .unwrap();
        let store = DocumentStore::load(&path).await.unwrap();

        assert_eq!(
            store
                .read_exercises()
                .await
                .unwrap()
                .iter()
                .map(|e| e.id.to_string())
                .collect::<Vec<_>>(),
            vec!["a"]
        );

        let recommender = recommendation::Recommender::new(
            recommendation::ExerciseCache::new(store),
            recommendation::Taxonomy::default(),
        );
        let result = recommender
            .recommend(&recommendation::StudentProfile::new(Some("superiores"), None))
            .await;

        assert!(!result.is_error());
        assert_eq!(result.category, "superiores");
        assert_eq!(
            result
                .exercises
                .iter()
                .map(|e| e.name.as_str())
                .collect::<Vec<_>>(),
            vec!["Supino"]
        );
    }

    #[tokio::test]
    async fn test_students() {
        let store = DocumentStore::new();

        let student = store
            .create_student(new_student("ana@mundofit.com"))
            .await
            .unwrap();

        assert_eq!(student.status, domain::DEFAULT_STUDENT_STATUS);
        assert_eq!(student.target_weight, None);
        assert_eq!(store.read_student(&student.id).await.unwrap(), student);
        assert_eq!(store.read_students().await.unwrap().len(), 1);

        store.delete_student(&student.id).await.unwrap();
        assert!(store.read_students().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_instructors() {
        let store = DocumentStore::new();

        let instructor = store
            .create_instructor(domain::NewInstructor {
                name: domain::Name::new("Bruno").unwrap(),
                email: domain::Email::new("bruno@mundofit.com").unwrap(),
                password: domain::PasswordHash::from_hash("$2b$04$hash".to_string()),
                attributes: [("cref".to_string(), serde_json::json!("123456-G/SP"))].into(),
            })
            .await
            .unwrap();

        assert_eq!(
            store.read_instructor(&instructor.id).await.unwrap(),
            instructor
        );
    }

    #[tokio::test]
    async fn test_workouts_and_history() {
        let store = DocumentStore::new();

        let workout = store
            .create_workout(domain::NewWorkout {
                name: domain::Name::new("Treino A").unwrap(),
                exercise_name: Some("Supino".to_string()),
                exercise_id: None,
                student_id: Some("a1".into()),
                instructor_id: None,
                date: None,
                goal: None,
                remarks: None,
                weekday: Some("Segunda-feira".to_string()),
                load: None,
                sets: Some(4),
                repetitions: Some(8),
            })
            .await
            .unwrap();
        let entry = store
            .create_history_entry(domain::NewHistoryEntry {
                student_id: Some("a1".into()),
                workout_id: Some(workout.id.clone()),
                performed_at: None,
                weight_ref: None,
                comments: Some("Ótimo".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(store.read_workouts().await.unwrap(), vec![workout]);
        assert_eq!(store.read_history().await.unwrap(), vec![entry.clone()]);
        assert_eq!(store.read_history_entry(&entry.id).await.unwrap(), entry);
        assert_eq!(store.count(Collection::History).await, 1);
    }

    #[tokio::test]
    async fn test_recovery_code_replaces_previous_code() {
        let store = DocumentStore::new();
        let code = |code: &str| domain::RecoveryCode {
            email: domain::Email::new("ana@mundofit.com").unwrap(),
            code: code.to_string(),
            expires_at: Utc::now(),
            student_id: "a1".into(),
        };

        store.write_recovery_code(code("111111")).await.unwrap();
        store.write_recovery_code(code("222222")).await.unwrap();

        let codes = store
            .get_all::<domain::RecoveryCode, RecoveryCode>(Collection::RecoveryCodes)
            .await
            .unwrap();
        assert_eq!(codes.len(), 1);
        assert_eq!(codes[0].code, "222222");
    }

    #[tokio::test]
    async fn test_recommendation_records() {
        let store = DocumentStore::new();

        let record = store
            .create_recommendation_record(recommendation::NewRecommendationRecord {
                student_id: "a1".into(),
                recommendation: recommendation::Recommendation {
                    category: "cardio".to_string(),
                    exercises: vec![],
                    notes: vec!["Recomendação genérica".to_string()],
                },
                profile: recommendation::StudentProfile::new(Some("cardio"), None),
            })
            .await
            .unwrap();

        assert!(!record.used);
        assert_eq!(
            store.read_recommendation_records().await.unwrap(),
            vec![record]
        );
    }
}
