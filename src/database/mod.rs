use std::sync::{Arc, OnceLock};
use std::time::Duration;

use once_cell::sync::Lazy;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config;

pub mod table;

static POSTGRES: Lazy<Arc<OnceLock<PostgresSQL>>> = Lazy::new(|| Arc::new(OnceLock::new()));

/// PostgreSQL pool wrapper shared by `database::table::*`.
pub struct PostgresSQL {
    pub pool: PgPool,
}

impl PostgresSQL {
    /// Builds the pool from `config::SETTINGS.postgresql`. The connection is
    /// lazy; nothing is dialed until the first query.
    pub fn new() -> PostgresSQL {
        let database_url = format!(
            "postgres://{}:{}@{}:{}/{}?application_name=psx_crawler",
            config::SETTINGS.postgresql.user,
            config::SETTINGS.postgresql.password,
            config::SETTINGS.postgresql.host,
            config::SETTINGS.postgresql.port,
            config::SETTINGS.postgresql.db
        );
        let db = PgPoolOptions::new()
            .max_lifetime(Some(Duration::from_secs(1800)))
            .max_connections(20)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Some(Duration::from_secs(600)))
            .connect_lazy(&database_url)
            .unwrap_or_else(|_| panic!("wrong database URL {}", database_url));

        Self { pool: db }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl Default for PostgresSQL {
    fn default() -> Self {
        Self::new()
    }
}

fn get_postgresql() -> &'static PostgresSQL {
    POSTGRES.get_or_init(PostgresSQL::new)
}

/// Process-wide PostgreSQL pool.
pub fn get_connection() -> &'static PgPool {
    get_postgresql().pool()
}
