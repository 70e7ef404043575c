use std::sync::Arc;

use storage::repository::Storage;

use crate::error::AppServicesError;
use crate::quiz::QuizLoopService;
use crate::statistics_service::StatisticsService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    statistics: Arc<StatisticsService>,
    quiz_loop: Arc<QuizLoopService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage))
    }

    /// Build services over a volatile in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_storage(&Storage::in_memory())
    }

    #[must_use]
    pub fn from_storage(storage: &Storage) -> Self {
        let statistics = Arc::new(StatisticsService::new(Arc::clone(&storage.statistics)));
        let quiz_loop = Arc::new(QuizLoopService::new(Arc::clone(&statistics)));
        Self {
            statistics,
            quiz_loop,
        }
    }

    #[must_use]
    pub fn statistics(&self) -> Arc<StatisticsService> {
        Arc::clone(&self.statistics)
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }
}
