use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Open-Meteo forecast endpoint.
pub const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Villaviciosa de Odón.
pub const LATITUDE: f64 = 40.357;
pub const LONGITUDE: f64 = -3.904;

pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the MySQL/MariaDB server.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    /// Create `info_meteorologica` when it does not exist yet.
    pub create_table: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "db".to_string(),
            port: 3306,
            name: "weatherdb".to_string(),
            user: "weather".to_string(),
            password: "weatherpass".to_string(),
            create_table: true,
        }
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("create_table", &self.create_table)
            .finish()
    }
}

/// Forecast request settings. Built in code only: the coordinate is fixed for
/// this job and never read from files or the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    pub base_url: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timeout: Duration,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_url: OPEN_METEO_URL.to_string(),
            latitude: LATITUDE,
            longitude: LONGITUDE,
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

/// File layout on disk. Only the database section is configurable.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    database: DatabaseConfig,
}

/// Top-level configuration for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub database: DatabaseConfig,
    pub forecast: ForecastConfig,
}

impl Config {
    /// Load configuration: defaults, then the config file (explicit path, or the
    /// platform one if it exists), then `DB_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::config_file_path() {
                Ok(default_path) if default_path.exists() => Self::from_file(&default_path)?,
                _ => Self::default(),
            },
        };

        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    /// Read a TOML config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let file: FileConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(Self { database: file.database, ..Self::default() })
    }

    /// Override database settings from environment-style variables.
    ///
    /// `lookup` returns the value for a key, if set. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let db = &mut self.database;

        if let Some(host) = get("DB_HOST") {
            db.host = host;
        }
        if let Some(port) = get("DB_PORT") {
            db.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid DB_PORT value '{port}'"))?;
        }
        if let Some(name) = get("DB_NAME") {
            db.name = name;
        }
        if let Some(user) = get("DB_USER") {
            db.user = user;
        }
        if let Some(password) = get("DB_PASS") {
            db.password = password;
        }
        if let Some(flag) = get("DB_CREATE_TABLE") {
            db.create_table = parse_bool(&flag)
                .ok_or_else(|| anyhow!("Invalid DB_CREATE_TABLE value '{flag}' (expected true/false)"))?;
        }

        Ok(())
    }

    /// Path to the platform config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-etl", "weather-etl")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_deployment() {
        let cfg = Config::default();

        assert_eq!(cfg.database.host, "db");
        assert_eq!(cfg.database.port, 3306);
        assert_eq!(cfg.database.name, "weatherdb");
        assert_eq!(cfg.database.user, "weather");
        assert_eq!(cfg.database.password, "weatherpass");
        assert!(cfg.database.create_table);
        assert_eq!(cfg.forecast.latitude, LATITUDE);
        assert_eq!(cfg.forecast.longitude, LONGITUDE);
        assert_eq!(cfg.forecast.timeout, Duration::from_secs(30));
    }

    #[test]
    fn env_overrides_defaults() {
        let mut cfg = Config::default();
        cfg.apply_env(env(&[
            ("DB_HOST", "127.0.0.1"),
            ("DB_PORT", "3307"),
            ("DB_NAME", "other"),
            ("DB_USER", "etl"),
            ("DB_PASS", "secret"),
            ("DB_CREATE_TABLE", "false"),
        ]))
        .expect("env should apply");

        assert_eq!(cfg.database.host, "127.0.0.1");
        assert_eq!(cfg.database.port, 3307);
        assert_eq!(cfg.database.name, "other");
        assert_eq!(cfg.database.user, "etl");
        assert_eq!(cfg.database.password, "secret");
        assert!(!cfg.database.create_table);
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut cfg = Config::default();
        cfg.apply_env(env(&[("DB_HOST", ""), ("DB_PORT", "  ")])).unwrap();

        assert_eq!(cfg.database, DatabaseConfig::default());
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut cfg = Config::default();
        let err = cfg.apply_env(env(&[("DB_PORT", "mysql")])).unwrap_err();

        assert!(err.to_string().contains("Invalid DB_PORT"));
    }

    #[test]
    fn file_overrides_defaults_and_keeps_missing_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[database]\nhost = \"mariadb.local\"\nport = 3310").unwrap();

        let cfg = Config::from_file(file.path()).expect("config should parse");

        assert_eq!(cfg.database.host, "mariadb.local");
        assert_eq!(cfg.database.port, 3310);
        assert_eq!(cfg.database.name, "weatherdb");
        assert_eq!(cfg.forecast, ForecastConfig::default());
    }

    #[test]
    fn env_wins_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[database]\nhost = \"from-file\"").unwrap();

        let mut cfg = Config::from_file(file.path()).unwrap();
        cfg.apply_env(env(&[("DB_HOST", "from-env")])).unwrap();

        assert_eq!(cfg.database.host, "from-env");
    }

    #[test]
    fn malformed_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[database\nhost = ").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn debug_output_redacts_password() {
        let rendered = format!("{:?}", DatabaseConfig::default());

        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("weatherpass"));
    }
}
