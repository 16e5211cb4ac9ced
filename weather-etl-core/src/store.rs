use async_trait::async_trait;

use crate::model::WeatherObservation;

pub mod mysql;

pub use mysql::MySqlStore;

/// Table holding one row per observed day.
pub const TABLE: &str = "info_meteorologica";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Durable destination for observations, keyed by date.
#[async_trait]
pub trait ObservationStore: Send {
    /// Insert or replace every row in one all-or-nothing batch.
    ///
    /// Returns the number of rows the server reports as affected.
    async fn upsert(&mut self, rows: &[WeatherObservation]) -> Result<u64, StoreError>;
}
