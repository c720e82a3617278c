use sensorhub_core::SensorReading;
use serde::Serialize;
use serde_json::Value;

/// 201 body of `/receive_sensor_data`.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub status: &'static str,
    pub message: String,
    /// Generated id of the stored document.
    pub id_mongo: String,
    pub data_received: StoredDocument,
}

/// A reading as it sits in the collection, without its id.
#[derive(Debug, Serialize)]
pub struct StoredDocument {
    pub sensor: String,
    pub valor: Value,
    pub unidad: String,
    pub timestamp: jiff::Timestamp,
}

impl From<&SensorReading> for StoredDocument {
    fn from(reading: &SensorReading) -> Self {
        Self {
            sensor: reading.sensor.to_string(),
            valor: reading.valor.clone(),
            unidad: reading.unidad.to_string(),
            timestamp: reading.timestamp,
        }
    }
}

/// 200 body of `/agregar_dato_prueba`.
#[derive(Debug, Serialize)]
pub struct TestInsertResponse {
    pub mensaje: String,
    pub id: String,
}
