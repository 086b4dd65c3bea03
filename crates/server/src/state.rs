use std::{sync::Arc, time::Instant};

use chrono::{DateTime, Utc};
use log::{info, warn};
use mundofit_domain::{
    PasswordHash, Service,
    recommendation::{ExerciseCache, Recommender, Taxonomy},
};
use mundofit_storage::DocumentStore;
use serde::Serialize;
use tokio::sync::RwLock;

use super::{config::Config, error::AppError};

pub struct AppState {
    pub config: Config,
    pub store: DocumentStore,
    pub service: Service<DocumentStore>,
    pub recommender: Recommender<DocumentStore>,
    pub status: RwLock<SystemStatus>,
    pub started: Instant,
}

impl AppState {
    /// Loads the exercise cache before the state is handed out, so that the first
    /// recommendation request does not pay for it.
    pub async fn new(config: Config, store: DocumentStore) -> Arc<Self> {
        let service = Service::new(store.clone(), config.admin.clone());
        let recommender = Recommender::new(ExerciseCache::new(store.clone()), Taxonomy::default());

        info!("Warming up recommendation engine...");
        let ready = recommender.warm_up().await;
        let now = Utc::now();
        let last_error = if ready {
            info!("Recommendation engine ready");
            None
        } else {
            warn!("Recommendation engine not ready, exercises will be loaded on first request");
            Some(LastError {
                message: "failed to load exercises".to_string(),
                timestamp: now,
            })
        };

        Arc::new(Self {
            config,
            store,
            service,
            recommender,
            status: RwLock::new(SystemStatus {
                ml_model_ready: ready,
                last_training_attempt: Some(now),
                db_connected: true,
                server_started: None,
                last_error,
            }),
            started: Instant::now(),
        })
    }

    pub async fn mark_started(&self) {
        self.status.write().await.server_started = Some(Utc::now());
    }

    pub async fn status(&self) -> SystemStatus {
        self.status.read().await.clone()
    }

    /// Hashes on the blocking pool, bcrypt takes tens of milliseconds at production cost.
    pub async fn hash_password(&self, password: String) -> Result<PasswordHash, AppError> {
        let cost = self.config.password_cost;
        tokio::task::spawn_blocking(move || PasswordHash::with_cost(&password, cost))
            .await
            .map_err(|err| AppError::Internal(err.to_string()))?
            .map_err(AppError::from)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub ml_model_ready: bool,
    pub last_training_attempt: Option<DateTime<Utc>>,
    pub db_connected: bool,
    pub server_started: Option<DateTime<Utc>>,
    pub last_error: Option<LastError>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LastError {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
