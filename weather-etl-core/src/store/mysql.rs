//! MySQL/MariaDB implementation of [`ObservationStore`].

use async_trait::async_trait;
use sqlx::{
    Connection, MySql, MySqlConnection, QueryBuilder,
    mysql::MySqlConnectOptions,
};

use crate::{config::DatabaseConfig, model::WeatherObservation};

use super::{ObservationStore, StoreError, TABLE};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS info_meteorologica (
        fecha        DATE   NOT NULL PRIMARY KEY,
        tmax_c       DOUBLE NULL,
        tmin_c       DOUBLE NULL,
        lluvia_mm    DOUBLE NULL,
        weather_code INT    NULL
    )
"#;

/// A single live connection, owned by one run.
///
/// Call [`MySqlStore::close`] when done; dropping the store also releases the
/// socket, without the graceful quit handshake.
#[derive(Debug)]
pub struct MySqlStore {
    conn: MySqlConnection,
}

impl MySqlStore {
    /// Connect using the configured host and credentials, then probe with `SELECT 1`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        Self::connect_with(&connect_options(config)).await
    }

    pub async fn connect_with(options: &MySqlConnectOptions) -> Result<Self, StoreError> {
        let conn = MySqlConnection::connect_with(options).await?;
        let mut store = Self { conn };
        store.probe().await?;
        Ok(store)
    }

    /// Trivial round-trip to confirm the connection is usable.
    pub async fn probe(&mut self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&mut self.conn).await?;
        Ok(())
    }

    /// Create the observation table if it does not exist yet.
    pub async fn ensure_table(&mut self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&mut self.conn).await?;
        Ok(())
    }

    /// Underlying connection, for ad-hoc queries.
    pub fn connection(&mut self) -> &mut MySqlConnection {
        &mut self.conn
    }

    /// Gracefully close the connection.
    pub async fn close(self) -> Result<(), StoreError> {
        self.conn.close().await?;
        Ok(())
    }
}

pub fn connect_options(config: &DatabaseConfig) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.name)
}

/// Multi-row `INSERT ... ON DUPLICATE KEY UPDATE` over `rows`.
///
/// Every value column is taken from the incoming row on conflict. `rows` must
/// not be empty.
pub(crate) fn upsert_query(rows: &[WeatherObservation]) -> QueryBuilder<'_, MySql> {
    let mut qb = QueryBuilder::new(format!(
        "INSERT INTO {TABLE} (fecha, tmax_c, tmin_c, lluvia_mm, weather_code) "
    ));

    qb.push_values(rows, |mut b, row| {
        b.push_bind(row.date)
            .push_bind(row.max_temperature_celsius)
            .push_bind(row.min_temperature_celsius)
            .push_bind(row.precipitation_millimeters)
            .push_bind(row.weather_code);
    });

    qb.push(
        " ON DUPLICATE KEY UPDATE \
         tmax_c = VALUES(tmax_c), \
         tmin_c = VALUES(tmin_c), \
         lluvia_mm = VALUES(lluvia_mm), \
         weather_code = VALUES(weather_code)",
    );

    qb
}

#[async_trait]
impl ObservationStore for MySqlStore {
    async fn upsert(&mut self, rows: &[WeatherObservation]) -> Result<u64, StoreError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut tx = self.conn.begin().await?;

        let mut query = upsert_query(rows);
        let result = query.build().execute(&mut *tx).await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }
}
