use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use sensorhub_core::{IngestPayload, SensorReading, insertion_time};
use tracing::{error, info, warn};

use crate::{AppState, registry::ReadingRegistry};

use super::{
    error::ApiError,
    models::{IngestResponse, StoredDocument, TestInsertResponse},
};

/// POST /receive_sensor_data
///
/// Stores exactly one reading per call. Availability is checked before the
/// body is looked at, and nothing is written unless the payload validates.
pub async fn receive_sensor_data<R>(
    State(state): State<AppState<R>>,
    body: Bytes,
) -> Result<(StatusCode, Json<IngestResponse>), ApiError>
where
    R: ReadingRegistry,
{
    let registry = state.registry()?;

    let payload = IngestPayload::from_body(&body).inspect_err(|e| {
        warn!(error = %e, bytes = body.len(), "rejected sensor payload");
    })?;

    let reading = payload.into_reading(insertion_time());
    let id = reading.id;
    let data_received = StoredDocument::from(&reading);

    registry.store(reading).await.map_err(|e| {
        error!(error = ?e, "failed to store reading");
        ApiError::Storage(format!("Error saving reading to the database: {e}"))
    })?;

    info!(
        %id,
        sensor = %data_received.sensor,
        valor = %data_received.valor,
        unidad = %data_received.unidad,
        "reading stored"
    );

    Ok((
        StatusCode::CREATED,
        Json(IngestResponse {
            status: "success",
            message: "Sensor data stored successfully".to_owned(),
            id_mongo: id.to_string(),
            data_received,
        }),
    ))
}

/// GET /agregar_dato_prueba
///
/// Writes a fixed document to check that storage is reachable.
pub async fn add_test_reading<R>(
    State(state): State<AppState<R>>,
) -> Result<Json<TestInsertResponse>, ApiError>
where
    R: ReadingRegistry,
{
    let registry = state.registry()?;

    let reading = SensorReading::test_document(insertion_time());
    let id = reading.id;

    registry.store(reading).await.map_err(|e| {
        error!(error = ?e, "failed to store test reading");
        ApiError::Internal(format!("Error inserting into the database: {e}"))
    })?;

    info!(%id, "test reading stored");

    Ok(Json(TestInsertResponse {
        mensaje: "Dato de prueba agregado exitosamente a 'sensor1'".to_owned(),
        id: id.to_string(),
    }))
}
