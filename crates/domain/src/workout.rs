use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use strum::EnumString;

use crate::{
    CreateError, DeleteError, ExerciseID, InstructorID, Name, ReadError, StudentID, UpdateError,
};

#[async_trait]
pub trait WorkoutService: Send + Sync {
    async fn get_workouts(&self, filter: &WorkoutFilter) -> Result<Vec<Workout>, ReadError>;
    async fn get_workout(&self, id: &WorkoutID) -> Result<Workout, ReadError>;
    async fn create_workout(&self, workout: NewWorkout) -> Result<Workout, CreateError>;
    async fn modify_workout(
        &self,
        id: &WorkoutID,
        update: WorkoutUpdate,
    ) -> Result<Workout, UpdateError>;
    async fn delete_workout(&self, id: &WorkoutID) -> Result<WorkoutID, DeleteError>;
}

#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    async fn read_workouts(&self) -> Result<Vec<Workout>, ReadError>;
    async fn read_workout(&self, id: &WorkoutID) -> Result<Workout, ReadError>;
    async fn create_workout(&self, workout: NewWorkout) -> Result<Workout, CreateError>;
    async fn replace_workout(&self, workout: Workout) -> Result<Workout, UpdateError>;
    async fn delete_workout(&self, id: &WorkoutID) -> Result<WorkoutID, DeleteError>;
}

/// A workout prescribed by an instructor to a student.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: WorkoutID,
    pub name: Name,
    pub exercise_name: Option<String>,
    pub exercise_id: Option<ExerciseID>,
    pub student_id: Option<StudentID>,
    pub instructor_id: Option<InstructorID>,
    pub date: DateTime<Utc>,
    pub goal: Option<String>,
    pub remarks: Option<String>,
    pub weekday: Option<String>,
    pub load: Option<String>,
    pub sets: Option<u32>,
    pub repetitions: Option<u32>,
}

document_id!(WorkoutID);

#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkout {
    pub name: Name,
    pub exercise_name: Option<String>,
    pub exercise_id: Option<ExerciseID>,
    pub student_id: Option<StudentID>,
    pub instructor_id: Option<InstructorID>,
    pub date: Option<DateTime<Utc>>,
    pub goal: Option<String>,
    pub remarks: Option<String>,
    pub weekday: Option<String>,
    pub load: Option<String>,
    pub sets: Option<u32>,
    pub repetitions: Option<u32>,
}

impl NewWorkout {
    /// A missing date defaults to `now`.
    #[must_use]
    pub fn into_workout(self, id: WorkoutID, now: DateTime<Utc>) -> Workout {
        Workout {
            id,
            name: self.name,
            exercise_name: self.exercise_name,
            exercise_id: self.exercise_id,
            student_id: self.student_id,
            instructor_id: self.instructor_id,
            date: self.date.unwrap_or(now),
            goal: self.goal,
            remarks: self.remarks,
            weekday: self.weekday,
            load: self.load,
            sets: self.sets,
            repetitions: self.repetitions,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct WorkoutUpdate {
    pub name: Option<Name>,
    pub exercise_name: Option<String>,
    pub exercise_id: Option<ExerciseID>,
    pub student_id: Option<StudentID>,
    pub instructor_id: Option<InstructorID>,
    pub date: Option<DateTime<Utc>>,
    pub goal: Option<String>,
    pub remarks: Option<String>,
    pub weekday: Option<String>,
    pub load: Option<String>,
    pub sets: Option<u32>,
    pub repetitions: Option<u32>,
}

impl WorkoutUpdate {
    #[must_use]
    pub fn apply(self, workout: Workout) -> Workout {
        Workout {
            id: workout.id,
            name: self.name.unwrap_or(workout.name),
            exercise_name: self.exercise_name.or(workout.exercise_name),
            exercise_id: self.exercise_id.or(workout.exercise_id),
            student_id: self.student_id.or(workout.student_id),
            instructor_id: self.instructor_id.or(workout.instructor_id),
            date: self.date.unwrap_or(workout.date),
            goal: self.goal.or(workout.goal),
            remarks: self.remarks.or(workout.remarks),
            weekday: self.weekday.or(workout.weekday),
            load: self.load.or(workout.load),
            sets: self.sets.or(workout.sets),
            repetitions: self.repetitions.or(workout.repetitions),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Weekday {
    #[strum(serialize = "segunda")]
    Monday,
    #[strum(serialize = "terca")]
    Tuesday,
    #[strum(serialize = "quarta")]
    Wednesday,
    #[strum(serialize = "quinta")]
    Thursday,
    #[strum(serialize = "sexta")]
    Friday,
    #[strum(serialize = "sabado")]
    Saturday,
    #[strum(serialize = "domingo")]
    Sunday,
}

impl Weekday {
    #[must_use]
    pub fn full_name(self) -> &'static str {
        match self {
            Weekday::Monday => "Segunda-feira",
            Weekday::Tuesday => "Terça-feira",
            Weekday::Wednesday => "Quarta-feira",
            Weekday::Thursday => "Quinta-feira",
            Weekday::Friday => "Sexta-feira",
            Weekday::Saturday => "Sábado",
            Weekday::Sunday => "Domingo",
        }
    }

    /// Expands a short weekday name ("segunda") to the stored form ("Segunda-feira"). Anything
    /// else is returned unchanged.
    #[must_use]
    pub fn normalize(value: &str) -> String {
        Weekday::from_str(value).map_or_else(|_| value.to_string(), |d| d.full_name().to_string())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WorkoutFilter {
    pub student_id: Option<StudentID>,
    pub weekday: Option<String>,
}

impl WorkoutFilter {
    #[must_use]
    pub fn new(student_id: Option<StudentID>, weekday: Option<&str>) -> Self {
        Self {
            student_id,
            weekday: weekday.map(Weekday::normalize),
        }
    }

    #[must_use]
    pub fn workouts<'a>(&self, workouts: impl Iterator<Item = &'a Workout>) -> Vec<&'a Workout> {
        workouts
            .filter(|w| {
                self.student_id
                    .as_ref()
                    .is_none_or(|id| w.student_id.as_ref() == Some(id))
                    && self
                        .weekday
                        .as_ref()
                        .is_none_or(|day| w.weekday.as_ref() == Some(day))
            })
            .collect()
    }
}
