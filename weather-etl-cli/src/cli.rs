use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use weather_etl_core::{Config, pipeline};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-etl",
    version,
    about = "Fetch last week's daily weather from Open-Meteo and upsert it into MySQL"
)]
pub struct Cli {
    /// Optional TOML config file with a [database] section.
    /// `DB_*` environment variables override its values.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load(self.config.as_deref()).context("Failed to load configuration")?;

        let report = pipeline::run(&config).await.context("Weather ETL run failed")?;

        tracing::info!(
            start = %report.range.start,
            end = %report.range.end,
            rows = report.rows,
            "run complete"
        );
        Ok(())
    }
}
