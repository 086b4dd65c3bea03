use async_trait::async_trait;

use crate::{CreateError, DeleteError, Name, ReadError, UpdateError};

#[async_trait]
pub trait ExerciseService: Send + Sync {
    async fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
    async fn get_exercise(&self, id: &ExerciseID) -> Result<Exercise, ReadError>;
    async fn create_exercise(&self, exercise: NewExercise) -> Result<Exercise, CreateError>;
    async fn modify_exercise(
        &self,
        id: &ExerciseID,
        update: ExerciseUpdate,
    ) -> Result<Exercise, UpdateError>;
    async fn delete_exercise(&self, id: &ExerciseID) -> Result<ExerciseID, DeleteError>;
}

#[async_trait]
pub trait ExerciseRepository: Send + Sync {
    async fn read_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
    async fn read_exercise(&self, id: &ExerciseID) -> Result<Exercise, ReadError>;
    async fn create_exercise(&self, exercise: NewExercise) -> Result<Exercise, CreateError>;
    async fn replace_exercise(&self, exercise: Exercise) -> Result<Exercise, UpdateError>;
    async fn delete_exercise(&self, id: &ExerciseID) -> Result<ExerciseID, DeleteError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: Name,
    pub description: Option<String>,
    /// Free text naming the targeted muscle groups, e.g. "Peito e Tríceps".
    pub type_label: Option<String>,
}

impl Exercise {
    /// Case-sensitive substring match of the type label against any of `labels`. An exercise
    /// without a type label matches nothing.
    #[must_use]
    pub fn matches_any(&self, labels: &[&str]) -> bool {
        self.type_label
            .as_deref()
            .is_some_and(|type_label| labels.iter().any(|label| type_label.contains(label)))
    }
}

document_id!(ExerciseID);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExercise {
    pub name: Name,
    pub description: Option<String>,
    pub type_label: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExerciseUpdate {
    pub name: Option<Name>,
    pub description: Option<String>,
    pub type_label: Option<String>,
}

impl ExerciseUpdate {
    #[must_use]
    pub fn apply(self, exercise: Exercise) -> Exercise {
        Exercise {
            id: exercise.id,
            name: self.name.unwrap_or(exercise.name),
            description: self.description.or(exercise.description),
            type_label: self.type_label.or(exercise.type_label),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn exercise(type_label: Option<&str>) -> Exercise {
        Exercise {
            id: "1".into(),
            name: Name::new("Supino").unwrap(),
            description: None,
            type_label: type_label.map(ToString::to_string),
        }
    }

    #[rstest]
    #[case::exact(Some("Peito"), &["Peito"], true)]
    #[case::substring(Some("Peito e Tríceps"), &["Costas", "Tríceps"], true)]
    #[case::case_sensitive(Some("peito"), &["Peito"], false)]
    #[case::no_labels(Some("Peito"), &[], false)]
    #[case::no_type_label(None, &["Peito"], false)]
    #[case::empty_type_label(Some(""), &["Peito"], false)]
    fn test_exercise_matches_any(
        #[case] type_label: Option<&str>,
        #[case] labels: &[&str],
        #[case] expected: bool,
    ) {
        assert_eq!(exercise(type_label).matches_any(labels), expected);
    }

    #[test]
    fn test_exercise_update_apply() {
        let original = Exercise {
            id: "1".into(),
            name: Name::new("Supino").unwrap(),
            description: Some("Deitado no banco".to_string()),
            type_label: Some("Peito".to_string()),
        };

        assert_eq!(ExerciseUpdate::default().apply(original.clone()), original);
        assert_eq!(
            ExerciseUpdate {
                name: Some(Name::new("Supino Inclinado").unwrap()),
                type_label: Some("Peito e Ombros".to_string()),
                ..ExerciseUpdate::default()
            }
            .apply(original.clone()),
            Exercise {
                id: "1".into(),
                name: Name::new("Supino Inclinado").unwrap(),
                description: Some("Deitado no banco".to_string()),
                type_label: Some("Peito e Ombros".to_string()),
            }
        );
    }
}
