use log::{debug, warn};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{Exercise, ExerciseRepository};

use super::{
    ExerciseCache, ExerciseSummary, MAX_EXERCISES, Recommendation, RecommendationError,
    StudentProfile, Taxonomy, filter_by_category, select,
};

pub struct Recommender<R> {
    cache: ExerciseCache<R>,
    taxonomy: Taxonomy,
}

impl<R: ExerciseRepository> Recommender<R> {
    pub fn new(cache: ExerciseCache<R>, taxonomy: Taxonomy) -> Self {
        Self { cache, taxonomy }
    }

    /// Fills the exercise cache ahead of the first request.
    pub async fn warm_up(&self) -> bool {
        self.cache.get_or_load().await.is_ok()
    }

    pub fn is_ready(&self) -> bool {
        self.cache.is_loaded()
    }

    pub fn reset(&mut self) {
        self.cache.reset();
    }

    /// Never fails. Errors are reported in the returned recommendation, see
    /// [`Recommendation::is_error`].
    pub async fn recommend(&self, profile: &StudentProfile) -> Recommendation {
        match self.try_recommend(profile).await {
            Ok(recommendation) => recommendation,
            Err(err) => {
                warn!("failed to recommend exercises: {err}");
                Recommendation::failed(&err)
            }
        }
    }

    pub async fn try_recommend(
        &self,
        profile: &StudentProfile,
    ) -> Result<Recommendation, RecommendationError> {
        self.try_recommend_with(profile, &mut StdRng::from_entropy())
            .await
    }

    pub async fn try_recommend_with<G: Rng + Send + ?Sized>(
        &self,
        profile: &StudentProfile,
        rng: &mut G,
    ) -> Result<Recommendation, RecommendationError> {
        let category = profile
            .category()
            .ok_or(RecommendationError::MissingCategory)?;
        let exercises = self.cache.get_or_load().await?;

        let filtered = filter_by_category(exercises, &self.taxonomy, category);
        if filtered.is_empty() {
            debug!("no exercises match category {category:?}, selecting from all exercises");
        }
        let all = exercises.iter().collect::<Vec<&Exercise>>();
        let selection = select(&filtered, &all, MAX_EXERCISES, rng);

        Ok(Recommendation {
            category: category.to_string(),
            exercises: selection.into_iter().map(ExerciseSummary::from).collect(),
            notes: vec![match profile.name() {
                Some(name) => format!("Recomendação para {name}"),
                None => "Recomendação genérica".to_string(),
            }],
        })
    }
}
