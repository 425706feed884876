use std::{env, path::PathBuf, str::FromStr};

use anyhow::Result;
use config::{Config as config_config, File as config_file};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::cache;

const CONFIG_PATH: &str = "app.json";

pub static SETTINGS: Lazy<App> = Lazy::new(|| App::get().expect("Config error"));

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct App {
    pub postgresql: PostgreSQL,
    pub scraper: Scraper,
    pub system: System,
}

const SYSTEM_HTTP_PORT: &str = "SYSTEM_HTTP_PORT";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct System {
    /// Port the axum server listens on; the batch path also calls back into
    /// this port for its per-symbol fetches.
    pub http_port: i32,
}

impl Default for System {
    fn default() -> Self {
        System { http_port: 3000 }
    }
}

const SCRAPER_MAX_AGE_MINUTES: &str = "SCRAPER_MAX_AGE_MINUTES";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Scraper {
    /// Freshness window for persisted quotes, in minutes.
    pub max_age_minutes: i64,
}

impl Default for Scraper {
    fn default() -> Self {
        Scraper {
            max_age_minutes: cache::DEFAULT_MAX_AGE_MINUTES,
        }
    }
}

const POSTGRESQL_HOST: &str = "POSTGRESQL_HOST";
const POSTGRESQL_PORT: &str = "POSTGRESQL_PORT";
const POSTGRESQL_USER: &str = "POSTGRESQL_USER";
const POSTGRESQL_PASSWORD: &str = "POSTGRESQL_PASSWORD";
const POSTGRESQL_DB: &str = "POSTGRESQL_DB";

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct PostgreSQL {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: i32,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub db: String,
}

impl App {
    fn get() -> Result<Self> {
        let config_path = config_path();
        if config_path.exists() {
            let config: App = config_config::builder()
                .add_source(config_file::from(config_path))
                .build()?
                .try_deserialize()?;
            return Ok(config.override_with_env());
        }

        Ok(App::default().override_with_env())
    }

    /// Environment variables win over anything read from app.json.
    fn override_with_env(mut self) -> Self {
        if let Ok(host) = env::var(POSTGRESQL_HOST) {
            self.postgresql.host = host;
        }

        if let Ok(port) = env::var(POSTGRESQL_PORT) {
            self.postgresql.port = i32::from_str(&port).unwrap_or(5432);
        }

        if let Ok(user) = env::var(POSTGRESQL_USER) {
            self.postgresql.user = user;
        }

        if let Ok(password) = env::var(POSTGRESQL_PASSWORD) {
            self.postgresql.password = password;
        }

        if let Ok(db) = env::var(POSTGRESQL_DB) {
            self.postgresql.db = db;
        }

        if let Ok(port) = env::var(SYSTEM_HTTP_PORT) {
            self.system.http_port = i32::from_str(&port).unwrap_or(3000);
        }

        if let Ok(minutes) = env::var(SCRAPER_MAX_AGE_MINUTES) {
            self.scraper.max_age_minutes =
                i64::from_str(&minutes).unwrap_or(cache::DEFAULT_MAX_AGE_MINUTES);
        }

        self
    }
}

fn config_path() -> PathBuf {
    PathBuf::from(CONFIG_PATH)
}
