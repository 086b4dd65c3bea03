use log::{debug, error, info};
use tokio::sync::OnceCell;

use crate::{Exercise, ExerciseRepository};

use super::RecommendationError;

/// In-memory copy of the complete exercise list.
///
/// The list is read from the repository on first access. Concurrent callers on an empty cache
/// wait for a single read. A failed or cancelled read leaves the cache empty, so the next call
/// starts over.
pub struct ExerciseCache<R> {
    repository: R,
    exercises: OnceCell<Vec<Exercise>>,
}

impl<R: ExerciseRepository> ExerciseCache<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            exercises: OnceCell::new(),
        }
    }

    pub async fn get_or_load(&self) -> Result<&[Exercise], RecommendationError> {
        if let Some(exercises) = self.exercises.get() {
            debug!("exercise cache hit ({} exercises)", exercises.len());
            return Ok(exercises);
        }

        self.exercises
            .get_or_try_init(|| async {
                match self.repository.read_exercises().await {
                    Ok(exercises) => {
                        info!("loaded {} exercises into cache", exercises.len());
                        Ok(exercises)
                    }
                    Err(err) => {
                        error!("failed to load exercises into cache: {err}");
                        Err(RecommendationError::RepositoryUnavailable(err.to_string()))
                    }
                }
            })
            .await
            .map(Vec::as_slice)
    }

    pub fn is_loaded(&self) -> bool {
        self.exercises.initialized()
    }

    pub fn reset(&mut self) {
        self.exercises.take();
    }
}
