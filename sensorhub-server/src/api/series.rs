use axum::{Json, body::Bytes, extract::State};
use sensorhub_core::{CANONICAL_SERIES, QueryRequest, TimeSeries};
use tracing::{debug, error, info};

use crate::{AppState, registry::ReadingRegistry};

use super::error::ApiError;

/// Series names offered to the dashboard. Static: this list is not derived
/// from what is actually stored.
pub const SERIES: &[&str] = &[CANONICAL_SERIES];

/// POST /search
pub async fn search() -> Json<Vec<&'static str>> {
    Json(SERIES.to_vec())
}

/// POST /query
///
/// Serves the most recent readings as the canonical series. Datapoints are
/// newest first, and the request's `range` and `targets` do not filter.
pub async fn query<R>(
    State(state): State<AppState<R>>,
    body: Bytes,
) -> Result<Json<Vec<TimeSeries>>, ApiError>
where
    R: ReadingRegistry,
{
    let registry = state.registry()?;

    let request = QueryRequest::from_body(&body);
    debug!(
        targets = ?request.target_names(),
        range = ?request.range,
        "query received"
    );

    let readings = registry.latest(state.query_limit).await.map_err(|e| {
        error!(error = ?e, "failed to fetch readings");
        ApiError::Storage(format!("Error querying readings: {e}"))
    })?;

    let series = TimeSeries::from_readings(CANONICAL_SERIES, readings);
    info!(datapoints = series.datapoints.len(), "query served");

    Ok(Json(vec![series]))
}
