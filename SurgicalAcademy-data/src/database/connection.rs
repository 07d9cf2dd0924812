//! Database connection module for the SurgicalAcademy platform
//!
//! Provides a SQLite connection pool (r2d2) with migrations applied on open,
//! and a helper that runs blocking queries on tokio's blocking thread pool.

use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info};
use uuid::Uuid;

use super::{functions, migrations, DatabaseError};
use crate::repository::RepositoryError;

/// Underlying r2d2 pool type
pub type SqlitePool = r2d2::Pool<SqliteConnectionManager>;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to SQLite database file
    pub sqlite_path: String,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sqlite_path: "data/surgical_academy.db".to_string(),
            max_connections: 10,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration from environment variables
    pub fn from_env() -> Result<Self, DatabaseError> {
        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
        let sqlite_path = env::var("DB_SQLITE_PATH").unwrap_or_else(|_| {
            Path::new(&data_dir)
                .join("surgical_academy.db")
                .to_string_lossy()
                .into_owned()
        });

        let max_connections = parse_env("DB_MAX_CONNECTIONS", 10u32)?;
        let timeout_seconds = parse_env("DB_TIMEOUT_SECONDS", 30u64)?;

        if max_connections == 0 {
            return Err(DatabaseError::Config(
                "DB_MAX_CONNECTIONS must be greater than zero".to_string(),
            ));
        }

        info!(
            "Database configuration: path={}, max_connections={}, timeout={}s",
            sqlite_path, max_connections, timeout_seconds
        );

        Ok(Self {
            sqlite_path,
            max_connections,
            timeout_seconds,
        })
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T, DatabaseError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| DatabaseError::Config(format!("{} must be a number, got {:?}", key, value))),
        Err(_) => Ok(default),
    }
}

/// Per-connection setup: busy timeout, foreign keys and custom functions.
fn configure_connection(conn: &mut Connection) -> Result<(), rusqlite::Error> {
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    functions::register(conn)
}

/// Shared handle to the SQLite connection pool
#[derive(Clone)]
pub struct DatabasePool {
    pool: SqlitePool,
    description: Arc<str>,
}

impl fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabasePool")
            .field("description", &self.description)
            .finish()
    }
}

impl DatabasePool {
    /// Open (creating if needed) the SQLite file described by `config` and run migrations
    pub fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        if let Some(parent) = Path::new(&config.sqlite_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                info!("Creating database directory: {:?}", parent);
                std::fs::create_dir_all(parent).map_err(|e| {
                    DatabaseError::Config(format!("Failed to create {:?}: {}", parent, e))
                })?;
            }
        }

        let manager = SqliteConnectionManager::file(&config.sqlite_path)
            .with_flags(
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI,
            )
            .with_init(configure_connection);

        let pool = r2d2::Pool::builder()
            .max_size(config.max_connections)
            .connection_timeout(Duration::from_secs(config.timeout_seconds))
            .build(manager)?;

        Self::migrate(pool, format!("SQLite database at {}", config.sqlite_path))
    }

    /// Open a private in-memory database shared by every connection of the pool.
    ///
    /// Each call gets a uniquely named database, so tests never see each other's rows.
    pub fn in_memory() -> Result<Self, DatabaseError> {
        let uri = format!(
            "file:surgical-academy-{}?mode=memory&cache=shared",
            Uuid::new_v4().simple()
        );

        let manager = SqliteConnectionManager::file(&uri)
            .with_flags(
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI,
            )
            .with_init(configure_connection);

        // The database lives as long as one connection stays open.
        let pool = r2d2::Pool::builder()
            .max_size(4)
            .min_idle(Some(1))
            .idle_timeout(None)
            .max_lifetime(None)
            .connection_timeout(Duration::from_secs(5))
            .build(manager)?;

        Self::migrate(pool, "SQLite in-memory database".to_string())
    }

    fn migrate(pool: SqlitePool, description: String) -> Result<Self, DatabaseError> {
        {
            let conn = pool.get()?;
            migrations::run_sqlite_migrations(&conn)?;
        }

        info!("{} ready", description);

        Ok(Self {
            pool,
            description: description.into(),
        })
    }

    /// Run a blocking database task on the blocking thread pool.
    pub async fn run<F, T>(&self, task: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut Connection) -> Result<T, RepositoryError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            task(&mut *conn)
        })
        .await
        .map_err(|e| RepositoryError::Task(e.to_string()))?
    }

    /// Check that a connection can be checked out and answers a trivial query.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        self.run(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
        .await
    }

    /// Human-readable description of the pool and its current state
    pub fn connection_info(&self) -> String {
        let state = self.pool.state();
        debug!(
            "Pool state: connections={}, idle={}",
            state.connections, state.idle_connections
        );

        format!(
            "{} (connections: active={}, idle={})",
            self.description, state.connections, state.idle_connections
        )
    }
}
