//! One ETL run: connect, compute the window, fetch, reshape, upsert.

use chrono::NaiveDate;

use crate::{
    config::Config,
    model::DateRange,
    provider::{ForecastProvider, OpenMeteoProvider, ProviderError},
    store::{MySqlStore, ObservationStore, StoreError, TABLE},
    transform::{self, ShapeError},
    window,
};

/// Failure of one pipeline stage. The variant names the stage; the source is
/// the underlying cause.
#[derive(Debug, thiserror::Error)]
pub enum EtlError {
    #[error("database connectivity check failed")]
    Connect(#[source] StoreError),

    #[error("failed to create table info_meteorologica")]
    Schema(#[source] StoreError),

    #[error("forecast request failed")]
    Fetch(#[source] ProviderError),

    #[error("forecast response has an unexpected shape")]
    Shape(#[source] ShapeError),

    #[error("failed to upsert observations into info_meteorologica")]
    Persist(#[source] StoreError),
}

impl EtlError {
    pub fn stage(&self) -> &'static str {
        match self {
            EtlError::Connect(_) => "connect",
            EtlError::Schema(_) => "schema",
            EtlError::Fetch(_) => "fetch",
            EtlError::Shape(_) => "transform",
            EtlError::Persist(_) => "upsert",
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub range: DateRange,
    pub rows: usize,
    pub rows_affected: u64,
}

/// Fetch the window ending the day before `today` and upsert it into `store`.
pub async fn run_with<S, P>(store: &mut S, provider: &P, today: NaiveDate) -> Result<RunReport, EtlError>
where
    S: ObservationStore + ?Sized,
    P: ForecastProvider + ?Sized,
{
    let range = window::observation_window(today);
    sync_window(store, provider, &range).await
}

/// Fetch `range`, reshape it and upsert it into `store`.
pub async fn sync_window<S, P>(store: &mut S, provider: &P, range: &DateRange) -> Result<RunReport, EtlError>
where
    S: ObservationStore + ?Sized,
    P: ForecastProvider + ?Sized,
{
    tracing::info!(start = %range.start, end = %range.end, "requesting observation window");

    let series = provider.fetch_daily(range).await.map_err(EtlError::Fetch)?;
    tracing::info!(days = series.time.len(), "forecast provider responded");

    let rows = transform::to_observations(series).map_err(EtlError::Shape)?;
    transform::check_window(range, &rows).map_err(EtlError::Shape)?;
    tracing::info!(rows = rows.len(), "rows to upsert");

    let rows_affected = store.upsert(&rows).await.map_err(EtlError::Persist)?;
    tracing::info!(rows = rows.len(), rows_affected, table = TABLE, "upserted observations");

    Ok(RunReport { range: *range, rows: rows.len(), rows_affected })
}

/// Run the whole pipeline once against MySQL and Open-Meteo.
///
/// The connection is closed before returning, whichever stage failed.
pub async fn run(config: &Config) -> Result<RunReport, EtlError> {
    let db = &config.database;
    tracing::info!(host = %db.host, port = db.port, database = %db.name, "connecting to database");

    let mut store = MySqlStore::connect(db).await.map_err(EtlError::Connect)?;
    tracing::info!("database connection ok");

    let outcome = run_connected(&mut store, config).await;

    if let Err(err) = store.close().await {
        tracing::warn!(error = %err, "failed to close database connection cleanly");
    }

    outcome
}

async fn run_connected(store: &mut MySqlStore, config: &Config) -> Result<RunReport, EtlError> {
    if config.database.create_table {
        store.ensure_table().await.map_err(EtlError::Schema)?;
    }

    let provider = OpenMeteoProvider::new(config.forecast.clone()).map_err(EtlError::Fetch)?;
    run_with(store, &provider, window::today()).await
}
