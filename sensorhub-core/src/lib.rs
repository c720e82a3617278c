use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ulid::Ulid;

pub mod payload;

pub use payload::{IngestPayload, PayloadError};

// We use `Box<str>` for strings that never grow after construction. This
// keeps stored readings compact and avoids accidental cloning of buffers.
type BoxStr = Box<str>;

/// Name of the single series offered to dashboard consumers.
pub const CANONICAL_SERIES: &str = "sensor1_temperatures";

/// Unit stored when a reading arrives without one.
pub const UNIT_NOT_AVAILABLE: &str = "N/A";

/// Current wall-clock time, truncated to the microsecond precision readings
/// are persisted with, so a stored reading reads back unchanged.
pub fn insertion_time() -> jiff::Timestamp {
    let now = jiff::Timestamp::now();
    jiff::Timestamp::from_microsecond(now.as_microsecond()).unwrap_or(now)
}

/// Unique identifier for a stored reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReadingId(pub Ulid);

impl ReadingId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for ReadingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReadingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single sensor reading as persisted by the hub.
///
/// Field names follow the stored document layout (`valor`, `unidad`), which
/// dashboards and tooling built around the collection already expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Storage-generated identity of this reading.
    pub id: ReadingId,
    /// Logical sensor name, e.g. "Temperature".
    pub sensor: BoxStr,
    /// Measured value, kept exactly as the device sent it.
    pub valor: Value,
    /// Unit label, [`UNIT_NOT_AVAILABLE`] when the device sent none.
    pub unidad: BoxStr,
    /// Server wall-clock time at insertion.
    pub timestamp: jiff::Timestamp,
}

impl SensorReading {
    /// Build a fresh reading with a newly generated id.
    pub fn new(
        sensor: impl Into<BoxStr>,
        valor: Value,
        unidad: impl Into<BoxStr>,
        timestamp: jiff::Timestamp,
    ) -> Self {
        Self {
            id: ReadingId::new(),
            sensor: sensor.into(),
            valor,
            unidad: unidad.into(),
            timestamp,
        }
    }

    /// The fixed document written by the connectivity check endpoint.
    pub fn test_document(timestamp: jiff::Timestamp) -> Self {
        Self::new("temperatura_prueba", Value::from(30.1), "C", timestamp)
    }

    /// Timestamp as whole milliseconds since the Unix epoch.
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp.as_millisecond()
    }
}

/// A `[value, timestamp_ms]` pair in a query response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datapoint(pub Value, pub i64);

impl From<SensorReading> for Datapoint {
    fn from(reading: SensorReading) -> Self {
        let ts = reading.timestamp_ms();
        Datapoint(reading.valor, ts)
    }
}

/// A named series of datapoints, as consumed by the dashboard datasource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub target: String,
    pub datapoints: Vec<Datapoint>,
}

impl TimeSeries {
    /// Shape readings into a series, keeping the order they were given in.
    pub fn from_readings<I>(target: impl Into<String>, readings: I) -> Self
    where
        I: IntoIterator<Item = SensorReading>,
    {
        Self {
            target: target.into(),
            datapoints: readings.into_iter().map(Datapoint::from).collect(),
        }
    }
}

/// Body of a dashboard `/query` request.
///
/// Every field is optional; the hub currently serves the same series
/// regardless of what is asked for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub range: Option<QueryRange>,
    #[serde(default)]
    pub targets: Option<Vec<QueryTarget>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRange {
    pub from: Option<jiff::Timestamp>,
    pub to: Option<jiff::Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryTarget {
    pub target: Option<String>,
}

impl QueryRequest {
    /// Parse a request body, treating anything unreadable as an empty request.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// Names of the requested targets, in request order.
    pub fn target_names(&self) -> Vec<&str> {
        self.targets
            .iter()
            .flatten()
            .filter_map(|t| t.target.as_deref())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;
    use serde_json::json;

    #[test]
    fn datapoint_serializes_as_pair() {
        let reading = SensorReading::new(
            "Temperature",
            json!(21.5),
            "C",
            Timestamp::from_millisecond(1_700_000_000_123).unwrap(),
        );

        let value = serde_json::to_value(Datapoint::from(reading)).unwrap();
        assert_eq!(value, json!([21.5, 1_700_000_000_123i64]));
    }

    #[test]
    fn timestamp_ms_truncates_sub_millisecond() {
        let ts = Timestamp::new(1_700_000_000, 999_999_999).unwrap();
        let reading = SensorReading::new("Humidity", json!(50), "%", ts);

        assert_eq!(reading.timestamp_ms(), 1_700_000_000_999);
    }

    #[test]
    fn series_keeps_input_order() {
        let readings = [3, 1, 2].map(|s| {
            SensorReading::new("T", json!(s), "C", Timestamp::from_second(s).unwrap())
        });

        let series = TimeSeries::from_readings(CANONICAL_SERIES, readings);
        let seconds: Vec<i64> = series.datapoints.iter().map(|d| d.1 / 1000).collect();

        assert_eq!(series.target, "sensor1_temperatures");
        assert_eq!(seconds, vec![3, 1, 2]);
    }

    #[test]
    fn query_request_tolerates_garbage() {
        let request = QueryRequest::from_body(b"not json at all");
        assert!(request.range.is_none());
        assert!(request.target_names().is_empty());
    }

    #[test]
    fn query_request_reads_targets_and_range() {
        let body = br#"{
            "range": {"from": "2024-01-01T00:00:00Z", "to": "2024-01-02T00:00:00Z"},
            "targets": [{"target": "sensor1_temperatures", "refId": "A"}],
            "maxDataPoints": 500
        }"#;

        let request = QueryRequest::from_body(body);
        assert_eq!(request.target_names(), vec!["sensor1_temperatures"]);
        assert!(request.range.and_then(|r| r.from).is_some());
    }

    #[test]
    fn insertion_time_has_no_sub_microsecond_part() {
        let ts = insertion_time();
        assert_eq!(ts.subsec_nanosecond() % 1_000, 0);
    }

    #[test]
    fn identical_readings_get_distinct_ids() {
        let ts = Timestamp::now();
        let a = SensorReading::new("T", json!(1), "C", ts);
        let b = SensorReading::new("T", json!(1), "C", ts);

        assert_ne!(a.id, b.id);
    }
}
