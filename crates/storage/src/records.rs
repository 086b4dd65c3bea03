//! Document layouts. Field names are part of the stored data format and must not change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use mundofit_domain::{self as domain, recommendation};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Student {
    pub id: String,
    pub nm_aluno: String,
    pub email_aluno: String,
    pub cd_senha_al: String,
    pub status_aluno: String,
    pub dt_cadastro: DateTime<Utc>,
    #[serde(default)]
    pub cd_peso: Option<f64>,
    #[serde(default)]
    pub cd_altura: Option<f64>,
    #[serde(default)]
    pub genero: Option<String>,
    #[serde(default)]
    pub peso_meta: Option<f64>,
}

impl From<&domain::Student> for Student {
    fn from(value: &domain::Student) -> Self {
        Self {
            id: value.id.to_string(),
            nm_aluno: value.name.to_string(),
            email_aluno: value.email.to_string(),
            cd_senha_al: value.password.as_str().to_string(),
            status_aluno: value.status.clone(),
            dt_cadastro: value.registered_at,
            cd_peso: value.weight,
            cd_altura: value.height,
            genero: value.gender.clone(),
            peso_meta: value.target_weight,
        }
    }
}

impl TryFrom<Student> for domain::Student {
    type Error = domain::ValidationError;

    fn try_from(value: Student) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.nm_aluno)?,
            email: domain::Email::new(&value.email_aluno)?,
            password: domain::PasswordHash::from_hash(value.cd_senha_al),
            status: value.status_aluno,
            registered_at: value.dt_cadastro,
            weight: value.cd_peso,
            height: value.cd_altura,
            gender: value.genero,
            target_weight: value.peso_meta,
        })
    }
}

/// Fields other than the known ones are kept as instructor attributes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Instructor {
    pub id: String,
    pub nm_professor: String,
    pub email_professor: String,
    pub cd_senha_pf: String,
    pub dt_cadastro_professor: DateTime<Utc>,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, Value>,
}

impl From<&domain::Instructor> for Instructor {
    fn from(value: &domain::Instructor) -> Self {
        Self {
            id: value.id.to_string(),
            nm_professor: value.name.to_string(),
            email_professor: value.email.to_string(),
            cd_senha_pf: value.password.as_str().to_string(),
            dt_cadastro_professor: value.registered_at,
            attributes: value
                .attributes
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

impl TryFrom<Instructor> for domain::Instructor {
    type Error = domain::ValidationError;

    fn try_from(value: Instructor) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.nm_professor)?,
            email: domain::Email::new(&value.email_professor)?,
            password: domain::PasswordHash::from_hash(value.cd_senha_pf),
            registered_at: value.dt_cadastro_professor,
            attributes: value.attributes.into_iter().collect(),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: String,
    pub nm_exercicio: String,
    #[serde(default)]
    pub ds_exercicio: Option<String>,
    #[serde(default)]
    pub tipo_exercicio: Option<String>,
}

impl From<&domain::Exercise> for Exercise {
    fn from(value: &domain::Exercise) -> Self {
        Self {
            id: value.id.to_string(),
            nm_exercicio: value.name.to_string(),
            ds_exercicio: value.description.clone(),
            tipo_exercicio: value.type_label.clone(),
        }
    }
}

impl TryFrom<Exercise> for domain::Exercise {
    type Error = domain::NameError;

    fn try_from(value: Exercise) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.nm_exercicio)?,
            description: value.ds_exercicio,
            type_label: value.tipo_exercicio,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: String,
    pub nm_treino: String,
    #[serde(default)]
    pub nm_fk_exercicio: Option<String>,
    #[serde(default)]
    pub cd_fk_exercicio: Option<String>,
    #[serde(default)]
    pub cd_fk_aluno: Option<String>,
    #[serde(default)]
    pub cd_fk_professor: Option<String>,
    pub dt_treino: DateTime<Utc>,
    #[serde(default)]
    pub ds_objetivo: Option<String>,
    #[serde(default)]
    pub ds_observacao: Option<String>,
    #[serde(default)]
    pub nm_dia_semana: Option<String>,
    #[serde(default)]
    pub qtd_carga: Option<String>,
    #[serde(default)]
    pub cd_serie: Option<u32>,
    #[serde(default)]
    pub qtd_repeticoes: Option<u32>,
}

impl From<&domain::Workout> for Workout {
    fn from(value: &domain::Workout) -> Self {
        Self {
            id: value.id.to_string(),
            nm_treino: value.name.to_string(),
            nm_fk_exercicio: value.exercise_name.clone(),
            cd_fk_exercicio: value.exercise_id.as_ref().map(ToString::to_string),
            cd_fk_aluno: value.student_id.as_ref().map(ToString::to_string),
            cd_fk_professor: value.instructor_id.as_ref().map(ToString::to_string),
            dt_treino: value.date,
            ds_objetivo: value.goal.clone(),
            ds_observacao: value.remarks.clone(),
            nm_dia_semana: value.weekday.clone(),
            qtd_carga: value.load.clone(),
            cd_serie: value.sets,
            qtd_repeticoes: value.repetitions,
        }
    }
}

impl TryFrom<Workout> for domain::Workout {
    type Error = domain::NameError;

    fn try_from(value: Workout) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.nm_treino)?,
            exercise_name: value.nm_fk_exercicio,
            exercise_id: value.cd_fk_exercicio.map(domain::ExerciseID::from),
            student_id: value.cd_fk_aluno.map(domain::StudentID::from),
            instructor_id: value.cd_fk_professor.map(domain::InstructorID::from),
            date: value.dt_treino,
            goal: value.ds_objetivo,
            remarks: value.ds_observacao,
            weekday: value.nm_dia_semana,
            load: value.qtd_carga,
            sets: value.cd_serie,
            repetitions: value.qtd_repeticoes,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: String,
    #[serde(default)]
    pub cd_fk_aluno: Option<String>,
    #[serde(default)]
    pub cd_fk_treino: Option<String>,
    pub dt_treino_realizado: DateTime<Utc>,
    #[serde(default)]
    pub cd_fk_peso: Option<String>,
    #[serde(default)]
    pub ds_comentarios: Option<String>,
}

impl From<&domain::HistoryEntry> for HistoryEntry {
    fn from(value: &domain::HistoryEntry) -> Self {
        Self {
            id: value.id.to_string(),
            cd_fk_aluno: value.student_id.as_ref().map(ToString::to_string),
            cd_fk_treino: value.workout_id.as_ref().map(ToString::to_string),
            dt_treino_realizado: value.performed_at,
            cd_fk_peso: value.weight_ref.clone(),
            ds_comentarios: value.comments.clone(),
        }
    }
}

impl From<HistoryEntry> for domain::HistoryEntry {
    fn from(value: HistoryEntry) -> Self {
        Self {
            id: value.id.into(),
            student_id: value.cd_fk_aluno.map(domain::StudentID::from),
            workout_id: value.cd_fk_treino.map(domain::WorkoutID::from),
            performed_at: value.dt_treino_realizado,
            weight_ref: value.cd_fk_peso,
            comments: value.ds_comentarios,
        }
    }
}

/// Keyed by the normalized e-mail address, so there is at most one code per address.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RecoveryCode {
    pub id: String,
    pub codigo: String,
    pub validade: DateTime<Utc>,
    #[serde(rename = "alunoId")]
    pub aluno_id: String,
}

impl From<&domain::RecoveryCode> for RecoveryCode {
    fn from(value: &domain::RecoveryCode) -> Self {
        Self {
            id: value.email.to_string(),
            codigo: value.code.clone(),
            validade: value.expires_at,
            aluno_id: value.student_id.to_string(),
        }
    }
}

impl TryFrom<RecoveryCode> for domain::RecoveryCode {
    type Error = domain::EmailError;

    fn try_from(value: RecoveryCode) -> Result<Self, Self::Error> {
        Ok(Self {
            email: domain::Email::new(&value.id)?,
            code: value.codigo,
            expires_at: value.validade,
            student_id: value.aluno_id.into(),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RecommendationRecord {
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub data: DateTime<Utc>,
    pub recomendacao: recommendation::Recommendation,
    pub parametros: recommendation::StudentProfile,
    pub utilizado: bool,
}

impl From<&recommendation::RecommendationRecord> for RecommendationRecord {
    fn from(value: &recommendation::RecommendationRecord) -> Self {
        Self {
            id: value.id.to_string(),
            user_id: value.student_id.to_string(),
            data: value.created_at,
            recomendacao: value.recommendation.clone(),
            parametros: value.profile.clone(),
            utilizado: value.used,
        }
    }
}

impl From<RecommendationRecord> for recommendation::RecommendationRecord {
    fn from(value: RecommendationRecord) -> Self {
        Self {
            id: value.id.into(),
            student_id: value.user_id.into(),
            created_at: value.data,
            recommendation: value.recomendacao,
            profile: value.parametros,
            used: value.utilizado,
        }
    }
}
