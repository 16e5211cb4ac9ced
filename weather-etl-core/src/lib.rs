//! Core library for the `weather-etl` job.
//!
//! This crate defines:
//! - Configuration (database settings, fixed forecast coordinate)
//! - The observation window calculation
//! - The Open-Meteo daily forecast client
//! - Reshaping of daily series into rows, and the MySQL upsert
//! - The pipeline driver tying the stages together
//!
//! It is used by `weather-etl-cli`, but can also be driven directly with any
//! [`ForecastProvider`] and [`ObservationStore`].

pub mod config;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod store;
pub mod transform;
pub mod window;

pub use config::{Config, DatabaseConfig, ForecastConfig};
pub use model::{DailySeries, DailyVariable, DateRange, WeatherObservation};
pub use pipeline::{EtlError, RunReport, run, run_with, sync_window};
pub use provider::{ForecastProvider, OpenMeteoProvider, ProviderError};
pub use store::{MySqlStore, ObservationStore, StoreError};
pub use transform::ShapeError;
