use std::str::FromStr;

use async_trait::async_trait;
use sensorhub_core::{ReadingId, SensorReading};
use sqlx::{
    Row, SqlitePool,
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
};
use ulid::Ulid;

use crate::registry::ReadingRegistry;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, thiserror::Error)]
pub enum SqliteReadingError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("invalid value JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid ULID: {0}")]
    InvalidUlid(String),
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(i64),
}

#[derive(Clone)]
pub struct SqliteReadingRegistry {
    pool: SqlitePool,
}

impl SqliteReadingRegistry {
    /// Open (creating if needed) the database at `path` and apply migrations.
    pub async fn new(path: impl AsRef<str>) -> Result<Self, SqliteReadingError> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.as_ref()))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        MIGRATOR.run(&pool).await?;

        Ok(Self { pool })
    }

    pub async fn new_in_memory() -> Result<Self, SqliteReadingError> {
        // Every connection to `sqlite::memory:` is its own database, so the
        // pool is pinned to a single connection that never expires.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        MIGRATOR.run(&pool).await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl ReadingRegistry for SqliteReadingRegistry {
    type Error = SqliteReadingError;

    async fn store(&self, reading: SensorReading) -> Result<(), Self::Error> {
        let valor = serde_json::to_string(&reading.valor)?;

        sqlx::query(
            r#"
            INSERT INTO readings (id, sensor, valor, unidad, timestamp)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(reading.id.0.to_string())
        .bind(&*reading.sensor)
        .bind(valor)
        .bind(&*reading.unidad)
        .bind(reading.timestamp.as_microsecond())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: ReadingId) -> Result<Option<SensorReading>, Self::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, sensor, valor, unidad, timestamp
            FROM readings WHERE id = ?
            "#,
        )
        .bind(id.0.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| map_row_to_reading(&r)).transpose()
    }

    async fn latest(&self, limit: usize) -> Result<Vec<SensorReading>, Self::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, sensor, valor, unidad, timestamp
            FROM readings
            ORDER BY timestamp DESC, seq DESC
            LIMIT ?
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_reading).collect()
    }

    async fn count(&self) -> Result<usize, Self::Error> {
        let count: i64 = sqlx::query("SELECT COUNT(*) FROM readings")
            .fetch_one(&self.pool)
            .await?
            .try_get(0)?;

        Ok(count as usize)
    }
}

fn map_row_to_reading(r: &SqliteRow) -> Result<SensorReading, SqliteReadingError> {
    let id_str: String = r.try_get("id")?;
    let id = Ulid::from_str(&id_str).map_err(|_| SqliteReadingError::InvalidUlid(id_str))?;

    let valor_str: String = r.try_get("valor")?;
    let valor = serde_json::from_str(&valor_str)?;

    let timestamp_us: i64 = r.try_get("timestamp")?;
    let timestamp = jiff::Timestamp::from_microsecond(timestamp_us)
        .map_err(|_| SqliteReadingError::InvalidTimestamp(timestamp_us))?;

    Ok(SensorReading {
        id: ReadingId(id),
        sensor: r.try_get::<String, _>("sensor")?.into_boxed_str(),
        valor,
        unidad: r.try_get::<String, _>("unidad")?.into_boxed_str(),
        timestamp,
    })
}
