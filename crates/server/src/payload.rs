//! Request and response bodies. Field names follow the stored documents, clients use the same
//! names for both.

use chrono::{DateTime, Utc};
use mundofit_domain::{
    Attributes, Email, ExerciseID, ExerciseUpdate, HistoryUpdate, Instructor, InstructorID,
    InstructorUpdate, Name, NewExercise, NewHistoryEntry, NewInstructor, NewStudent, NewWorkout,
    PasswordHash, Student, StudentID, StudentUpdate, ValidationError, WorkoutID, WorkoutUpdate,
};
use serde::{Deserialize, Serialize};

/// Attributes that are managed by the server and never taken from a request.
const RESERVED_INSTRUCTOR_FIELDS: [&str; 3] = ["id", "cd_senha_pf", "dt_cadastro_professor"];

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Created {
    pub id: String,
}

#[derive(Deserialize, Debug)]
pub struct NewStudentPayload {
    pub nm_aluno: String,
    pub email_aluno: String,
    pub cd_senha_al: String,
    #[serde(default)]
    pub status_aluno: Option<String>,
    #[serde(default, deserialize_with = "loose::number")]
    pub cd_peso: Option<f64>,
    #[serde(default, deserialize_with = "loose::number")]
    pub cd_altura: Option<f64>,
    #[serde(default)]
    pub genero: Option<String>,
}

impl NewStudentPayload {
    pub fn into_student(self, password: PasswordHash) -> Result<NewStudent, ValidationError> {
        Ok(NewStudent {
            name: Name::new(&self.nm_aluno)?,
            email: Email::new(&self.email_aluno)?,
            password,
            status: self.status_aluno.filter(|s| !s.trim().is_empty()),
            weight: self.cd_peso,
            height: self.cd_altura,
            gender: self.genero,
        })
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct StudentUpdatePayload {
    #[serde(default)]
    pub nm_aluno: Option<String>,
    #[serde(default)]
    pub email_aluno: Option<String>,
    #[serde(default)]
    pub cd_senha_al: Option<String>,
    #[serde(default)]
    pub status_aluno: Option<String>,
    #[serde(default, deserialize_with = "loose::number")]
    pub cd_peso: Option<f64>,
    #[serde(default, deserialize_with = "loose::number")]
    pub cd_altura: Option<f64>,
    #[serde(default)]
    pub genero: Option<String>,
    #[serde(default, deserialize_with = "loose::number")]
    pub peso_meta: Option<f64>,
}

impl StudentUpdatePayload {
    pub fn into_update(
        self,
        password: Option<PasswordHash>,
    ) -> Result<StudentUpdate, ValidationError> {
        Ok(StudentUpdate {
            name: self.nm_aluno.as_deref().map(Name::new).transpose()?,
            email: self.email_aluno.as_deref().map(Email::new).transpose()?,
            password,
            status: self.status_aluno,
            registered_at: None,
            weight: self.cd_peso,
            height: self.cd_altura,
            gender: self.genero,
            target_weight: self.peso_meta,
        })
    }
}

/// A student without the password hash.
#[derive(Serialize, Debug, PartialEq)]
pub struct StudentResponse {
    pub id: String,
    pub nm_aluno: String,
    pub email_aluno: String,
    pub status_aluno: String,
    pub dt_cadastro: DateTime<Utc>,
    pub cd_peso: Option<f64>,
    pub cd_altura: Option<f64>,
    pub genero: Option<String>,
    pub peso_meta: Option<f64>,
}

impl From<&Student> for StudentResponse {
    fn from(value: &Student) -> Self {
        Self {
            id: value.id.to_string(),
            nm_aluno: value.name.to_string(),
            email_aluno: value.email.to_string(),
            status_aluno: value.status.clone(),
            dt_cadastro: value.registered_at,
            cd_peso: value.weight,
            cd_altura: value.height,
            genero: value.gender.clone(),
            peso_meta: value.target_weight,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct NewInstructorPayload {
    pub nm_professor: String,
    pub email_professor: String,
    pub cd_senha_pf: String,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl NewInstructorPayload {
    pub fn into_instructor(self, password: PasswordHash) -> Result<NewInstructor, ValidationError> {
        Ok(NewInstructor {
            name: Name::new(&self.nm_professor)?,
            email: Email::new(&self.email_professor)?,
            password,
            attributes: without_reserved(self.attributes),
        })
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct InstructorUpdatePayload {
    #[serde(default)]
    pub nm_professor: Option<String>,
    #[serde(default)]
    pub email_professor: Option<String>,
    #[serde(default)]
    pub cd_senha_pf: Option<String>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl InstructorUpdatePayload {
    pub fn into_update(
        self,
        password: Option<PasswordHash>,
    ) -> Result<InstructorUpdate, ValidationError> {
        Ok(InstructorUpdate {
            name: self.nm_professor.as_deref().map(Name::new).transpose()?,
            email: self.email_professor.as_deref().map(Email::new).transpose()?,
            password,
            attributes: without_reserved(self.attributes),
        })
    }
}

fn without_reserved(mut attributes: Attributes) -> Attributes {
    for field in RESERVED_INSTRUCTOR_FIELDS {
        attributes.remove(field);
    }
    attributes
}

/// An instructor without the password hash.
#[derive(Serialize, Debug, PartialEq)]
pub struct InstructorResponse {
    pub id: String,
    pub nm_professor: String,
    pub email_professor: String,
    pub dt_cadastro_professor: DateTime<Utc>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl From<&Instructor> for InstructorResponse {
    fn from(value: &Instructor) -> Self {
        Self {
            id: value.id.to_string(),
            nm_professor: value.name.to_string(),
            email_professor: value.email.to_string(),
            dt_cadastro_professor: value.registered_at,
            attributes: value.attributes.clone(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct NewExercisePayload {
    pub nm_exercicio: String,
    #[serde(default)]
    pub ds_exercicio: Option<String>,
    #[serde(default)]
    pub tipo_exercicio: Option<String>,
}

impl NewExercisePayload {
    pub fn into_exercise(self) -> Result<NewExercise, ValidationError> {
        Ok(NewExercise {
            name: Name::new(&self.nm_exercicio)?,
            description: self.ds_exercicio,
            type_label: self.tipo_exercicio,
        })
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct ExerciseUpdatePayload {
    #[serde(default)]
    pub nm_exercicio: Option<String>,
    #[serde(default)]
    pub ds_exercicio: Option<String>,
    #[serde(default)]
    pub tipo_exercicio: Option<String>,
}

impl ExerciseUpdatePayload {
    pub fn into_update(self) -> Result<ExerciseUpdate, ValidationError> {
        Ok(ExerciseUpdate {
            name: self.nm_exercicio.as_deref().map(Name::new).transpose()?,
            description: self.ds_exercicio,
            type_label: self.tipo_exercicio,
        })
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct WorkoutPayload {
    #[serde(default)]
    pub nm_treino: Option<String>,
    #[serde(default)]
    pub nm_fk_exercicio: Option<String>,
    #[serde(default)]
    pub cd_fk_exercicio: Option<String>,
    #[serde(default)]
    pub cd_fk_aluno: Option<String>,
    #[serde(default)]
    pub cd_fk_professor: Option<String>,
    #[serde(default)]
    pub dt_treino: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ds_objetivo: Option<String>,
    #[serde(default)]
    pub ds_observacao: Option<String>,
    #[serde(default)]
    pub nm_dia_semana: Option<String>,
    #[serde(default, deserialize_with = "loose::text")]
    pub qtd_carga: Option<String>,
    #[serde(default, deserialize_with = "loose::count")]
    pub cd_serie: Option<u32>,
    #[serde(default, deserialize_with = "loose::count")]
    pub qtd_repeticoes: Option<u32>,
}

impl WorkoutPayload {
    pub fn into_workout(self) -> Result<NewWorkout, ValidationError> {
        let name = self.nm_treino.ok_or(ValidationError::Missing("nm_treino"))?;
        Ok(NewWorkout {
            name: Name::new(&name)?,
            exercise_name: self.nm_fk_exercicio,
            exercise_id: self.cd_fk_exercicio.map(ExerciseID::from),
            student_id: self.cd_fk_aluno.map(StudentID::from),
            instructor_id: self.cd_fk_professor.map(InstructorID::from),
            date: self.dt_treino,
            goal: self.ds_objetivo,
            remarks: self.ds_observacao,
            weekday: self.nm_dia_semana,
            load: self.qtd_carga,
            sets: self.cd_serie,
            repetitions: self.qtd_repeticoes,
        })
    }

    pub fn into_update(self) -> Result<WorkoutUpdate, ValidationError> {
        Ok(WorkoutUpdate {
            name: self.nm_treino.as_deref().map(Name::new).transpose()?,
            exercise_name: self.nm_fk_exercicio,
            exercise_id: self.cd_fk_exercicio.map(ExerciseID::from),
            student_id: self.cd_fk_aluno.map(StudentID::from),
            instructor_id: self.cd_fk_professor.map(InstructorID::from),
            date: self.dt_treino,
            goal: self.ds_objetivo,
            remarks: self.ds_observacao,
            weekday: self.nm_dia_semana,
            load: self.qtd_carga,
            sets: self.cd_serie,
            repetitions: self.qtd_repeticoes,
        })
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct HistoryPayload {
    #[serde(default)]
    pub cd_fk_aluno: Option<String>,
    #[serde(default)]
    pub cd_fk_treino: Option<String>,
    #[serde(default)]
    pub dt_treino_realizado: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "loose::text")]
    pub cd_fk_peso: Option<String>,
    #[serde(default)]
    pub ds_comentarios: Option<String>,
}

impl HistoryPayload {
    pub fn into_entry(self) -> NewHistoryEntry {
        NewHistoryEntry {
            student_id: self.cd_fk_aluno.map(StudentID::from),
            workout_id: self.cd_fk_treino.map(WorkoutID::from),
            performed_at: self.dt_treino_realizado,
            weight_ref: self.cd_fk_peso,
            comments: self.ds_comentarios,
        }
    }

    pub fn into_update(self) -> HistoryUpdate {
        HistoryUpdate {
            student_id: self.cd_fk_aluno.map(StudentID::from),
            workout_id: self.cd_fk_treino.map(WorkoutID::from),
            performed_at: self.dt_treino_realizado,
            weight_ref: self.cd_fk_peso,
            comments: self.ds_comentarios,
        }
    }
}

/// Form clients send numbers as JSON numbers or as strings, both are accepted.
mod loose {
    use serde::{Deserialize, Deserializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Number(serde_json::Number),
        Text(String),
    }

    fn loose<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Loose>, D::Error> {
        Option::<Loose>::deserialize(deserializer)
    }

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        match loose(deserializer)? {
            None => Ok(None),
            Some(Loose::Number(n)) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid number: {n}"))),
            Some(Loose::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(Loose::Text(s)) => s
                .trim()
                .replace(',', ".")
                .parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid number: {s}"))),
        }
    }

    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        match loose(deserializer)? {
            None => Ok(None),
            Some(Loose::Number(n)) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid count: {n}"))),
            Some(Loose::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(Loose::Text(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid count: {s}"))),
        }
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(loose(deserializer)?.map(|value| match value {
            Loose::Number(n) => n.to_string(),
            Loose::Text(s) => s,
        }))
    }
}
