use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::Notify;

use crate::{
    CreateError, DeleteError, Exercise, ExerciseID, ExerciseRepository, HistoryEntry, HistoryID,
    HistoryRepository, Instructor, InstructorID, InstructorRepository, Name, NewExercise,
    NewHistoryEntry, NewInstructor, NewStudent, NewWorkout, ReadError, RecoveryCode,
    RecoveryCodeRepository, StorageError, Student, StudentID, StudentRepository, UpdateError,
    Workout, WorkoutID, WorkoutRepository,
    recommendation::{
        NewRecommendationRecord, RecommendationRecord, RecommendationRecordRepository,
    },
};

pub fn exercise(id: &str, type_label: Option<&str>) -> Exercise {
    Exercise {
        id: id.into(),
        name: Name::new(&format!("Exercício {id}")).unwrap(),
        description: None,
        type_label: type_label.map(ToString::to_string),
    }
}

/// In-memory repository. Setting `failing` makes every read fail with a storage error. With an
/// `exercise_gate`, each exercise list read waits for a permit on it.
#[derive(Default)]
pub struct FakeRepository {
    pub exercise_reads: Arc<AtomicUsize>,
    pub failing: Arc<AtomicBool>,
    pub exercise_gate: Option<Arc<Notify>>,
    next_id: AtomicUsize,
    pub exercises: Mutex<Vec<Exercise>>,
    pub students: Mutex<Vec<Student>>,
    pub instructors: Mutex<Vec<Instructor>>,
    pub workouts: Mutex<Vec<Workout>>,
    pub history: Mutex<Vec<HistoryEntry>>,
    pub recovery_codes: Mutex<Vec<RecoveryCode>>,
    pub recommendations: Mutex<Vec<RecommendationRecord>>,
}

impl FakeRepository {
    pub fn with_exercises(exercises: Vec<Exercise>) -> Self {
        Self {
            exercises: Mutex::new(exercises),
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), ReadError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Other("connection refused".into()).into());
        }
        Ok(())
    }

    fn next_id(&self) -> String {
        (self.next_id.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }

    fn now(&self) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::seconds(i64::try_from(self.next_id.load(Ordering::SeqCst)).unwrap())
    }
}

fn find<T: Clone>(items: &Mutex<Vec<T>>, pred: impl Fn(&T) -> bool) -> Result<T, ReadError> {
    items
        .lock()
        .unwrap()
        .iter()
        .find(|i| pred(i))
        .cloned()
        .ok_or(ReadError::NotFound)
}

fn replace<T: Clone>(
    items: &Mutex<Vec<T>>,
    item: T,
    pred: impl Fn(&T) -> bool,
) -> Result<T, UpdateError> {
    let mut items = items.lock().unwrap();
    let existing = items
        .iter_mut()
        .find(|i| pred(i))
        .ok_or(UpdateError::NotFound)?;
    *existing = item.clone();
    Ok(item)
}

fn remove<T>(items: &Mutex<Vec<T>>, pred: impl Fn(&T) -> bool) {
    items.lock().unwrap().retain(|i| !pred(i));
}

#[async_trait]
impl ExerciseRepository for FakeRepository {
    async fn read_exercises(&self) -> Result<Vec<Exercise>, ReadError> {
        self.exercise_reads.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.exercise_gate {
            gate.notified().await;
        }
        tokio::task::yield_now().await;
        self.check()?;
        Ok(self.exercises.lock().unwrap().clone())
    }

    async fn read_exercise(&self, id: &ExerciseID) -> Result<Exercise, ReadError> {
        self.check()?;
        find(&self.exercises, |e| e.id == *id)
    }

    async fn create_exercise(&self, exercise: NewExercise) -> Result<Exercise, CreateError> {
        let exercise = Exercise {
            id: self.next_id().into(),
            name: exercise.name,
            description: exercise.description,
            type_label: exercise.type_label,
        };
        self.exercises.lock().unwrap().push(exercise.clone());
        Ok(exercise)
    }

    async fn replace_exercise(&self, exercise: Exercise) -> Result<Exercise, UpdateError> {
        let id = exercise.id.clone();
        replace(&self.exercises, exercise, |e| e.id == id)
    }

    async fn delete_exercise(&self, id: &ExerciseID) -> Result<ExerciseID, DeleteError> {
        remove(&self.exercises, |e| e.id == *id);
        Ok(id.clone())
    }
}

#[async_trait]
impl StudentRepository for FakeRepository {
    async fn read_students(&self) -> Result<Vec<Student>, ReadError> {
        self.check()?;
        Ok(self.students.lock().unwrap().clone())
    }

    async fn read_student(&self, id: &StudentID) -> Result<Student, ReadError> {
        self.check()?;
        find(&self.students, |s| s.id == *id)
    }

    async fn create_student(&self, student: NewStudent) -> Result<Student, CreateError> {
        let student = student.into_student(self.next_id().into(), self.now());
        self.students.lock().unwrap().push(student.clone());
        Ok(student)
    }

    async fn replace_student(&self, student: Student) -> Result<Student, UpdateError> {
        let id = student.id.clone();
        replace(&self.students, student, |s| s.id == id)
    }

    async fn delete_student(&self, id: &StudentID) -> Result<StudentID, DeleteError> {
        remove(&self.students, |s| s.id == *id);
        Ok(id.clone())
    }
}

#[async_trait]
impl InstructorRepository for FakeRepository {
    async fn read_instructors(&self) -> Result<Vec<Instructor>, ReadError> {
        self.check()?;
        Ok(self.instructors.lock().unwrap().clone())
    }

    async fn read_instructor(&self, id: &InstructorID) -> Result<Instructor, ReadError> {
        self.check()?;
        find(&self.instructors, |i| i.id == *id)
    }

    async fn create_instructor(
        &self,
        instructor: NewInstructor,
    ) -> Result<Instructor, CreateError> {
        let instructor = instructor.into_instructor(self.next_id().into(), self.now());
        self.instructors.lock().unwrap().push(instructor.clone());
        Ok(instructor)
    }

    async fn replace_instructor(&self, instructor: Instructor) -> Result<Instructor, UpdateError> {
        let id = instructor.id.clone();
        replace(&self.instructors, instructor, |i| i.id == id)
    }

    async fn delete_instructor(&self, id: &InstructorID) -> Result<InstructorID, DeleteError> {
        remove(&self.instructors, |i| i.id == *id);
        Ok(id.clone())
    }
}

#[async_trait]
impl WorkoutRepository for FakeRepository {
    async fn read_workouts(&self) -> Result<Vec<Workout>, ReadError> {
        self.check()?;
        Ok(self.workouts.lock().unwrap().clone())
    }

    async fn read_workout(&self, id: &WorkoutID) -> Result<Workout, ReadError> {
        self.check()?;
        find(&self.workouts, |w| w.id == *id)
    }

    async fn create_workout(&self, workout: NewWorkout) -> Result<Workout, CreateError> {
        let workout = workout.into_workout(self.next_id().into(), self.now());
        self.workouts.lock().unwrap().push(workout.clone());
        Ok(workout)
    }

    async fn replace_workout(&self, workout: Workout) -> Result<Workout, UpdateError> {
        let id = workout.id.clone();
        replace(&self.workouts, workout, |w| w.id == id)
    }

    async fn delete_workout(&self, id: &WorkoutID) -> Result<WorkoutID, DeleteError> {
        remove(&self.workouts, |w| w.id == *id);
        Ok(id.clone())
    }
}

#[async_trait]
impl HistoryRepository for FakeRepository {
    async fn read_history(&self) -> Result<Vec<HistoryEntry>, ReadError> {
        self.check()?;
        Ok(self.history.lock().unwrap().clone())
    }

    async fn read_history_entry(&self, id: &HistoryID) -> Result<HistoryEntry, ReadError> {
        self.check()?;
        find(&self.history, |h| h.id == *id)
    }

    async fn create_history_entry(
        &self,
        entry: NewHistoryEntry,
    ) -> Result<HistoryEntry, CreateError> {
        let entry = entry.into_entry(self.next_id().into(), self.now());
        self.history.lock().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn replace_history_entry(
        &self,
        entry: HistoryEntry,
    ) -> Result<HistoryEntry, UpdateError> {
        let id = entry.id.clone();
        replace(&self.history, entry, |h| h.id == id)
    }

    async fn delete_history_entry(&self, id: &HistoryID) -> Result<HistoryID, DeleteError> {
        remove(&self.history, |h| h.id == *id);
        Ok(id.clone())
    }
}

#[async_trait]
impl RecoveryCodeRepository for FakeRepository {
    async fn write_recovery_code(&self, code: RecoveryCode) -> Result<RecoveryCode, CreateError> {
        let mut codes = self.recovery_codes.lock().unwrap();
        codes.retain(|c| c.email != code.email);
        codes.push(code.clone());
        Ok(code)
    }
}

#[async_trait]
impl RecommendationRecordRepository for FakeRepository {
    async fn read_recommendation_records(&self) -> Result<Vec<RecommendationRecord>, ReadError> {
        self.check()?;
        Ok(self.recommendations.lock().unwrap().clone())
    }

    async fn create_recommendation_record(
        &self,
        record: NewRecommendationRecord,
    ) -> Result<RecommendationRecord, CreateError> {
        let record = record.into_record(self.next_id().into(), self.now());
        self.recommendations.lock().unwrap().push(record.clone());
        Ok(record)
    }
}
