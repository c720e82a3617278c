pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use sensorhub_core::{ReadingId, SensorReading};

/// Storage abstraction for ingested readings.
///
/// Readings are append-only: the registry can store and read them back but
/// never updates or deletes one. Implementations must be cheap to clone and
/// safe to share between concurrently handled requests.
#[async_trait]
pub trait ReadingRegistry: Clone + Send + Sync + 'static {
    /// Error type specific to this registry implementation
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist a single reading.
    async fn store(&self, reading: SensorReading) -> Result<(), Self::Error>;

    /// Look up a reading by id.
    async fn get(&self, id: ReadingId) -> Result<Option<SensorReading>, Self::Error>;

    /// Fetch up to `limit` readings, newest timestamp first.
    ///
    /// Readings sharing a timestamp come back most recently inserted first.
    async fn latest(&self, limit: usize) -> Result<Vec<SensorReading>, Self::Error>;

    /// Total number of stored readings.
    async fn count(&self) -> Result<usize, Self::Error>;
}
