use std::sync::Arc;

use chrono::Local;
use tokio::sync::Mutex;

use quiz_core::model::{GameResult, StatisticsAggregate};
use quiz_core::time::distant_past;
use storage::repository::{KeyValueStore, KvWrite};

use crate::error::StatisticsServiceError;

/// Storage keys for the persisted aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKey {
    GamesCount,
    BestGameCorrect,
    BestGameTotal,
    BestGameDate,
    TotalCorrectAnswers,
    TotalQuestionsAsked,
}

impl StatKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GamesCount => "gamesCount",
            Self::BestGameCorrect => "bestGameCorrect",
            Self::BestGameTotal => "bestGameTotal",
            Self::BestGameDate => "bestGameDate",
            Self::TotalCorrectAnswers => "totalCorrectAnswers",
            Self::TotalQuestionsAsked => "totalQuestionsAsked",
        }
    }
}

/// Persists running quiz statistics through a scalar key-value store.
///
/// Every `record` call reads the aggregate, folds the round in, and writes the
/// changed keys back as one batch while holding a process-wide lock, so
/// concurrent callers never interleave their updates.
#[derive(Clone)]
pub struct StatisticsService {
    store: Arc<dyn KeyValueStore>,
    write_lock: Arc<Mutex<()>>,
}

impl StatisticsService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Load the current aggregate; a fresh store yields zeros and the sentinel best game.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsServiceError` if storage fails or holds inconsistent values.
    pub async fn snapshot(&self) -> Result<StatisticsAggregate, StatisticsServiceError> {
        let games_played = self.read_count(StatKey::GamesCount).await?;
        let total_correct = self.read_count(StatKey::TotalCorrectAnswers).await?;
        let total_asked = self.read_count(StatKey::TotalQuestionsAsked).await?;
        let best_game = self.read_best_game().await?;

        Ok(StatisticsAggregate::from_persisted(
            games_played,
            total_correct,
            total_asked,
            best_game,
        )?)
    }

    /// Fold a finished round into the persisted totals and return the new aggregate.
    ///
    /// Not idempotent: every call counts as another played game.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsServiceError` if the aggregate cannot be read or the
    /// batch cannot be written; nothing is persisted in that case.
    pub async fn record(
        &self,
        result: &GameResult,
    ) -> Result<StatisticsAggregate, StatisticsServiceError> {
        let _guard = self.write_lock.lock().await;

        let mut aggregate = self.snapshot().await?;
        let is_new_best = aggregate.record(result);

        let mut writes = vec![
            KvWrite::integer(
                StatKey::GamesCount.as_str(),
                to_stored(StatKey::GamesCount, aggregate.games_played())?,
            ),
            KvWrite::integer(
                StatKey::TotalCorrectAnswers.as_str(),
                to_stored(StatKey::TotalCorrectAnswers, aggregate.total_correct())?,
            ),
            KvWrite::integer(
                StatKey::TotalQuestionsAsked.as_str(),
                to_stored(StatKey::TotalQuestionsAsked, aggregate.total_asked())?,
            ),
        ];
        if is_new_best {
            writes.push(KvWrite::integer(
                StatKey::BestGameCorrect.as_str(),
                i64::from(result.correct()),
            ));
            writes.push(KvWrite::integer(
                StatKey::BestGameTotal.as_str(),
                i64::from(result.total()),
            ));
            writes.push(KvWrite::timestamp(
                StatKey::BestGameDate.as_str(),
                result.date(),
            ));
        }

        self.store.write_batch(&writes).await?;

        tracing::info!(
            correct = result.correct(),
            total = result.total(),
            games_played = aggregate.games_played(),
            "recorded quiz round"
        );
        if is_new_best {
            tracing::info!(correct = result.correct(), "new best game");
        }

        Ok(aggregate)
    }

    /// # Errors
    ///
    /// Returns `StatisticsServiceError` on storage failures.
    pub async fn games_played(&self) -> Result<u64, StatisticsServiceError> {
        self.read_count(StatKey::GamesCount).await
    }

    /// # Errors
    ///
    /// Returns `StatisticsServiceError` on storage failures.
    pub async fn best_game(&self) -> Result<GameResult, StatisticsServiceError> {
        self.read_best_game().await
    }

    /// Overall accuracy in percent, `0.0` before any question was asked.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsServiceError` on storage failures.
    pub async fn accuracy(&self) -> Result<f64, StatisticsServiceError> {
        Ok(self.snapshot().await?.accuracy())
    }

    /// Summary block for `last_round`, dates in the local time zone.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsServiceError` on storage failures.
    pub async fn summary_text(
        &self,
        last_round: &GameResult,
    ) -> Result<String, StatisticsServiceError> {
        Ok(self.snapshot().await?.summary_text(last_round, &Local))
    }

    async fn read_count(&self, key: StatKey) -> Result<u64, StatisticsServiceError> {
        let value = self.store.get_integer(key.as_str()).await?;
        u64::try_from(value).map_err(|_| StatisticsServiceError::InvalidPersistedValue {
            key: key.as_str(),
            value,
        })
    }

    async fn read_small(&self, key: StatKey) -> Result<u32, StatisticsServiceError> {
        let value = self.store.get_integer(key.as_str()).await?;
        u32::try_from(value).map_err(|_| StatisticsServiceError::InvalidPersistedValue {
            key: key.as_str(),
            value,
        })
    }

    async fn read_best_game(&self) -> Result<GameResult, StatisticsServiceError> {
        let correct = self.read_small(StatKey::BestGameCorrect).await?;
        let total = self.read_small(StatKey::BestGameTotal).await?;
        let date = self
            .store
            .get_timestamp(StatKey::BestGameDate.as_str())
            .await?
            .unwrap_or_else(distant_past);
        Ok(GameResult::new(correct, total, date)?)
    }
}

fn to_stored(key: StatKey, value: u64) -> Result<i64, StatisticsServiceError> {
    i64::try_from(value).map_err(|_| StatisticsServiceError::Overflow { key: key.as_str() })
}
