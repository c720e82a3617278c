use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use sensorhub_core::{ReadingId, SensorReading};

use crate::registry::ReadingRegistry;

use super::InMemoryError;

/// Append-only in-memory reading log.
/// Used when no database is configured, and as the reference
/// implementation of [`ReadingRegistry`] in tests.
#[derive(Clone, Default)]
pub struct InMemoryReadingRegistry {
    readings: Arc<RwLock<Vec<SensorReading>>>,
}

impl InMemoryReadingRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReadingRegistry for InMemoryReadingRegistry {
    type Error = InMemoryError;

    async fn store(&self, reading: SensorReading) -> Result<(), Self::Error> {
        self.readings.write()?.push(reading);
        Ok(())
    }

    async fn get(&self, id: ReadingId) -> Result<Option<SensorReading>, Self::Error> {
        let readings = self.readings.read()?;
        Ok(readings.iter().find(|r| r.id == id).cloned())
    }

    async fn latest(&self, limit: usize) -> Result<Vec<SensorReading>, Self::Error> {
        let readings = self.readings.read()?;

        // Walk newest-inserted first so the stable sort keeps ties in
        // reverse insertion order.
        let mut latest: Vec<&SensorReading> = readings.iter().rev().collect();
        latest.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Ok(latest.into_iter().take(limit).cloned().collect())
    }

    async fn count(&self) -> Result<usize, Self::Error> {
        Ok(self.readings.read()?.len())
    }
}
