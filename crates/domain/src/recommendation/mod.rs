//! Workout recommendation
//!
//! A recommendation is drawn from the full exercise list, which is read once from the exercise
//! repository and kept in an [`ExerciseCache`]. The requested category is resolved through the
//! [`Taxonomy`] into muscle-group labels, exercises whose type label contains one of these labels
//! are the candidates, and up to [`MAX_EXERCISES`] of them are picked at random. If no exercise
//! matches, the candidates are all exercises.

mod cache;
mod engine;
mod history;
mod select;
mod taxonomy;

pub use cache::ExerciseCache;
pub use engine::Recommender;
pub use history::{
    DEFAULT_HISTORY_LIMIT, NewRecommendationRecord, RecommendationHistoryService, RecommendationID,
    RecommendationRecord, RecommendationRecordRepository,
};
pub use select::select;
pub use taxonomy::{Category, Taxonomy, filter_by_category};

use serde::{Deserialize, Serialize};

use crate::{Exercise, ExerciseID};

pub const MAX_EXERCISES: usize = 9;
pub const ERROR_MARKER: &str = "erro";
pub const DESCRIPTION_PLACEHOLDER: &str = "Sem descrição";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendationError {
    #[error("Tipo de treino não especificado")]
    MissingCategory,
    #[error("{0}")]
    RepositoryUnavailable(String),
}

/// The part of a student's data the recommender looks at.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    /// Requested category, kept verbatim: unknown categories are valid and select from all
    /// exercises.
    #[serde(rename = "tipo", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "nm_aluno", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl StudentProfile {
    #[must_use]
    pub fn new(category: Option<&str>, name: Option<&str>) -> Self {
        Self {
            category: category.map(ToString::to_string),
            name: name.map(ToString::to_string),
        }
    }

    /// Blank values count as absent.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.trim().is_empty())
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "tipo")]
    pub category: String,
    #[serde(rename = "exercicios")]
    pub exercises: Vec<ExerciseSummary>,
    #[serde(rename = "observacoes")]
    pub notes: Vec<String>,
}

impl Recommendation {
    #[must_use]
    pub fn failed(error: &RecommendationError) -> Self {
        Self {
            category: ERROR_MARKER.to_string(),
            exercises: vec![],
            notes: vec![format!("Erro: {error}")],
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.category == ERROR_MARKER
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseSummary {
    pub id: ExerciseID,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "tipo", default, skip_serializing_if = "Option::is_none")]
    pub type_label: Option<String>,
    #[serde(rename = "descricao")]
    pub description: String,
}

impl From<&Exercise> for ExerciseSummary {
    fn from(value: &Exercise) -> Self {
        Self {
            id: value.id.clone(),
            name: value.name.to_string(),
            type_label: value.type_label.clone(),
            description: value
                .description
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| DESCRIPTION_PLACEHOLDER.to_string()),
        }
    }
}
