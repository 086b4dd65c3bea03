use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error};

use crate::{
    AccountService, AdminCredentials, CreateError, DeleteError, Email, Exercise, ExerciseID,
    ExerciseRepository, ExerciseService, ExerciseUpdate, HistoryEntry, HistoryFilter, HistoryID,
    HistoryRepository, HistoryService, HistoryUpdate, Instructor, InstructorID,
    InstructorRepository, InstructorService, InstructorUpdate, Login, LoginError, NewExercise,
    NewHistoryEntry, NewInstructor, NewStudent, NewWorkout, PasswordHash, ReadError, RecoveryCode,
    RecoveryCodeRepository, RecoveryError, Student, StudentID, StudentRepository, StudentService,
    StudentUpdate, UpdateError, Workout, WorkoutFilter, WorkoutID, WorkoutRepository,
    WorkoutService, WorkoutUpdate,
    recommendation::{
        NewRecommendationRecord, RecommendationHistoryService, RecommendationRecord,
        RecommendationRecordRepository,
    },
};

pub struct Service<R> {
    repository: R,
    admin: Option<AdminCredentials>,
}

impl<R> Service<R> {
    /// Administrator login is only possible if `admin` is given.
    pub fn new(repository: R, admin: Option<AdminCredentials>) -> Self {
        Self { repository, admin }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

#[async_trait]
impl<R: ExerciseRepository> ExerciseService for Service<R> {
    async fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError> {
        log_on_error!(
            self.repository.read_exercises(),
            ReadError,
            "get",
            "exercises"
        )
    }

    async fn get_exercise(&self, id: &ExerciseID) -> Result<Exercise, ReadError> {
        log_on_error!(
            self.repository.read_exercise(id),
            ReadError,
            "get",
            "exercise"
        )
    }

    async fn create_exercise(&self, exercise: NewExercise) -> Result<Exercise, CreateError> {
        log_on_error!(
            self.repository.create_exercise(exercise),
            CreateError,
            "create",
            "exercise"
        )
    }

    async fn modify_exercise(
        &self,
        id: &ExerciseID,
        update: ExerciseUpdate,
    ) -> Result<Exercise, UpdateError> {
        log_on_error!(
            async {
                let exercise = self.repository.read_exercise(id).await?;
                self.repository
                    .replace_exercise(update.apply(exercise))
                    .await
            },
            UpdateError,
            "modify",
            "exercise"
        )
    }

    async fn delete_exercise(&self, id: &ExerciseID) -> Result<ExerciseID, DeleteError> {
        log_on_error!(
            self.repository.delete_exercise(id),
            DeleteError,
            "delete",
            "exercise"
        )
    }
}

#[async_trait]
impl<R: StudentRepository> StudentService for Service<R> {
    async fn get_students(&self) -> Result<Vec<Student>, ReadError> {
        log_on_error!(
            self.repository.read_students(),
            ReadError,
            "get",
            "students"
        )
    }

    async fn get_student(&self, id: &StudentID) -> Result<Student, ReadError> {
        log_on_error!(
            self.repository.read_student(id),
            ReadError,
            "get",
            "student"
        )
    }

    async fn get_student_by_email(&self, email: &Email) -> Result<Student, ReadError> {
        let students = log_on_error!(
            self.repository.read_students(),
            ReadError,
            "get",
            "students"
        )?;
        students
            .into_iter()
            .find(|s| s.email == *email)
            .ok_or(ReadError::NotFound)
    }

    async fn create_student(&self, student: NewStudent) -> Result<Student, CreateError> {
        log_on_error!(
            self.repository.create_student(student),
            CreateError,
            "create",
            "student"
        )
    }

    async fn modify_student(
        &self,
        id: &StudentID,
        update: StudentUpdate,
    ) -> Result<Student, UpdateError> {
        log_on_error!(
            async {
                let student = self.repository.read_student(id).await?;
                self.repository.replace_student(update.apply(student)).await
            },
            UpdateError,
            "modify",
            "student"
        )
    }

    async fn delete_student(&self, id: &StudentID) -> Result<StudentID, DeleteError> {
        log_on_error!(
            self.repository.delete_student(id),
            DeleteError,
            "delete",
            "student"
        )
    }
}

#[async_trait]
impl<R: InstructorRepository> InstructorService for Service<R> {
    async fn get_instructors(&self) -> Result<Vec<Instructor>, ReadError> {
        log_on_error!(
            self.repository.read_instructors(),
            ReadError,
            "get",
            "instructors"
        )
    }

    async fn get_instructor(&self, id: &InstructorID) -> Result<Instructor, ReadError> {
        log_on_error!(
            self.repository.read_instructor(id),
            ReadError,
            "get",
            "instructor"
        )
    }

    async fn create_instructor(
        &self,
        instructor: NewInstructor,
    ) -> Result<Instructor, CreateError> {
        log_on_error!(
            async {
                let instructors = self.repository.read_instructors().await?;
                if instructors.iter().any(|i| i.email == instructor.email) {
                    return Err(CreateError::Conflict(format!(
                        "e-mail {} already registered",
                        instructor.email
                    )));
                }
                self.repository.create_instructor(instructor).await
            },
            CreateError,
            "create",
            "instructor"
        )
    }

    async fn modify_instructor(
        &self,
        id: &InstructorID,
        update: InstructorUpdate,
    ) -> Result<Instructor, UpdateError> {
        log_on_error!(
            async {
                let instructor = self.repository.read_instructor(id).await?;
                self.repository
                    .replace_instructor(update.apply(instructor))
                    .await
            },
            UpdateError,
            "modify",
            "instructor"
        )
    }

    async fn delete_instructor(&self, id: &InstructorID) -> Result<InstructorID, DeleteError> {
        log_on_error!(
            self.repository.delete_instructor(id),
            DeleteError,
            "delete",
            "instructor"
        )
    }
}

#[async_trait]
impl<R: WorkoutRepository> WorkoutService for Service<R> {
    async fn get_workouts(&self, filter: &WorkoutFilter) -> Result<Vec<Workout>, ReadError> {
        let workouts = log_on_error!(
            self.repository.read_workouts(),
            ReadError,
            "get",
            "workouts"
        )?;
        Ok(filter
            .workouts(workouts.iter())
            .into_iter()
            .cloned()
            .collect())
    }

    async fn get_workout(&self, id: &WorkoutID) -> Result<Workout, ReadError> {
        log_on_error!(
            self.repository.read_workout(id),
            ReadError,
            "get",
            "workout"
        )
    }

    async fn create_workout(&self, workout: NewWorkout) -> Result<Workout, CreateError> {
        log_on_error!(
            self.repository.create_workout(workout),
            CreateError,
            "create",
            "workout"
        )
    }

    async fn modify_workout(
        &self,
        id: &WorkoutID,
        update: WorkoutUpdate,
    ) -> Result<Workout, UpdateError> {
        log_on_error!(
            async {
                let workout = self.repository.read_workout(id).await?;
                self.repository.replace_workout(update.apply(workout)).await
            },
            UpdateError,
            "modify",
            "workout"
        )
    }

    async fn delete_workout(&self, id: &WorkoutID) -> Result<WorkoutID, DeleteError> {
        log_on_error!(
            self.repository.delete_workout(id),
            DeleteError,
            "delete",
            "workout"
        )
    }
}

#[async_trait]
impl<R: HistoryRepository> HistoryService for Service<R> {
    async fn get_history(&self, filter: &HistoryFilter) -> Result<Vec<HistoryEntry>, ReadError> {
        let entries = log_on_error!(
            self.repository.read_history(),
            ReadError,
            "get",
            "history"
        )?;
        Ok(filter.entries(entries.iter()).into_iter().cloned().collect())
    }

    async fn get_history_entry(&self, id: &HistoryID) -> Result<HistoryEntry, ReadError> {
        log_on_error!(
            self.repository.read_history_entry(id),
            ReadError,
            "get",
            "history entry"
        )
    }

    async fn create_history_entry(
        &self,
        entry: NewHistoryEntry,
    ) -> Result<HistoryEntry, CreateError> {
        log_on_error!(
            self.repository.create_history_entry(entry),
            CreateError,
            "create",
            "history entry"
        )
    }

    async fn modify_history_entry(
        &self,
        id: &HistoryID,
        update: HistoryUpdate,
    ) -> Result<HistoryEntry, UpdateError> {
        log_on_error!(
            async {
                let entry = self.repository.read_history_entry(id).await?;
                self.repository
                    .replace_history_entry(update.apply(entry))
                    .await
            },
            UpdateError,
            "modify",
            "history entry"
        )
    }

    async fn delete_history_entry(&self, id: &HistoryID) -> Result<HistoryID, DeleteError> {
        log_on_error!(
            self.repository.delete_history_entry(id),
            DeleteError,
            "delete",
            "history entry"
        )
    }
}

#[async_trait]
impl<R> AccountService for Service<R>
where
    R: StudentRepository + InstructorRepository + RecoveryCodeRepository,
{
    async fn login(&self, email: &str, password: &str) -> Result<Login, LoginError> {
        if self.admin.as_ref().is_some_and(|a| a.matches(email, password)) {
            return Ok(Login::Admin);
        }

        let Ok(email) = Email::new(email) else {
            return Err(LoginError::InvalidCredentials);
        };

        let instructors = log_on_error!(
            self.repository.read_instructors(),
            ReadError,
            "get",
            "instructors"
        )?;
        if let Some(instructor) = instructors
            .into_iter()
            .find(|i| i.email == email && i.password.verify(password))
        {
            return Ok(Login::Instructor {
                id: instructor.id,
                name: instructor.name,
            });
        }

        let students = log_on_error!(
            self.repository.read_students(),
            ReadError,
            "get",
            "students"
        )?;
        if let Some(student) = students
            .into_iter()
            .find(|s| s.email == email && s.password.verify(password))
        {
            return Ok(Login::Student {
                id: student.id,
                name: student.name,
            });
        }

        debug!("rejected login for {email}");
        Err(LoginError::InvalidCredentials)
    }

    async fn request_password_recovery(
        &self,
        email: &Email,
    ) -> Result<RecoveryCode, RecoveryError> {
        let student = match self.get_student_by_email(email).await {
            Ok(student) => student,
            Err(ReadError::NotFound) => return Err(RecoveryError::UnknownEmail(email.clone())),
            Err(err) => return Err(err.into()),
        };
        let code = RecoveryCode::issue(email.clone(), student.id, Utc::now(), &mut rand::thread_rng());
        Ok(log_on_error!(
            self.repository.write_recovery_code(code),
            CreateError,
            "create",
            "recovery code"
        )?)
    }

    async fn reset_password(
        &self,
        id: &StudentID,
        password: PasswordHash,
    ) -> Result<StudentID, UpdateError> {
        self.modify_student(
            id,
            StudentUpdate {
                password: Some(password),
                ..StudentUpdate::default()
            },
        )
        .await
        .map(|student| student.id)
    }

    async fn reset_password_by_email(
        &self,
        email: &Email,
        password: PasswordHash,
    ) -> Result<StudentID, UpdateError> {
        let student = self.get_student_by_email(email).await?;
        self.reset_password(&student.id, password).await
    }
}

#[async_trait]
impl<R: RecommendationRecordRepository> RecommendationHistoryService for Service<R> {
    async fn record_recommendation(
        &self,
        record: NewRecommendationRecord,
    ) -> Result<RecommendationRecord, CreateError> {
        log_on_error!(
            self.repository.create_recommendation_record(record),
            CreateError,
            "create",
            "recommendation record"
        )
    }

    async fn get_recommendation_history(
        &self,
        student_id: &StudentID,
        limit: usize,
    ) -> Result<Vec<RecommendationRecord>, ReadError> {
        let records = log_on_error!(
            self.repository.read_recommendation_records(),
            ReadError,
            "get",
            "recommendation records"
        )?;
        Ok(RecommendationRecord::latest(records, student_id, limit))
    }
}
