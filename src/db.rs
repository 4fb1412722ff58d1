//! Database connection and schema migrations.
//!
//! One [`AnyPool`] serves every engine; the URL scheme picks the driver and the
//! matching migration set. Repositories only issue standard SQL with `$N`
//! placeholders, which PostgreSQL and SQLite both accept.

use sqlx::{
    any::{install_default_drivers, AnyPoolOptions},
    migrate::Migrator,
    AnyPool,
};

use crate::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
};

static POSTGRES_MIGRATOR: Migrator = sqlx::migrate!("./migrations/postgres");
static SQLITE_MIGRATOR: Migrator = sqlx::migrate!("./migrations/sqlite");

/// Storage engine behind the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    pub fn from_url(url: &str) -> AppResult<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(Backend::Postgres)
        } else if url.starts_with("sqlite:") {
            Ok(Backend::Sqlite)
        } else {
            let scheme = url.split(':').next().unwrap_or_default();
            Err(AppError::Internal(format!(
                "Unsupported database scheme '{}'",
                scheme
            )))
        }
    }

    fn migrator(self) -> &'static Migrator {
        match self {
            Backend::Postgres => &POSTGRES_MIGRATOR,
            Backend::Sqlite => &SQLITE_MIGRATOR,
        }
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Open a connection pool for the configured URL
pub async fn connect(config: &DatabaseConfig) -> AppResult<(AnyPool, Backend)> {
    install_default_drivers();

    let backend = Backend::from_url(&config.url)?;

    let options = if backend == Backend::Sqlite && is_in_memory(&config.url) {
        // each connection would otherwise open its own empty database
        AnyPoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
    };

    let pool = options.connect(&config.url).await?;

    tracing::info!("Connected to {:?} database", backend);

    Ok((pool, backend))
}

/// Apply pending migrations for the given engine
pub async fn migrate(pool: &AnyPool, backend: Backend) -> AppResult<()> {
    backend.migrator().run(pool).await?;
    tracing::info!("Database migrations completed");
    Ok(())
}

/// Connect and migrate
pub async fn init(config: &DatabaseConfig) -> AppResult<AnyPool> {
    let (pool, backend) = connect(config).await?;
    migrate(&pool, backend).await?;
    Ok(pool)
}

/// Pool over a private in-memory SQLite database with the schema applied
pub async fn init_in_memory() -> AppResult<AnyPool> {
    init(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        ..Default::default()
    })
    .await
}
