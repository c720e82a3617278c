use serde_json::{Map, Value};

use crate::{SensorReading, UNIT_NOT_AVAILABLE};

pub type PayloadResult<T> = core::result::Result<T, PayloadError>;

/// Why an ingestion body was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    /// Body was empty, not JSON, or not a JSON object.
    #[error("No JSON payload provided")]
    NoPayload,
    /// Required keys were absent or null.
    #[error("Missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    /// A key was present with a type the model cannot hold.
    #[error("Field '{field}' must be a {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

/// A validated reading submitted by a device.
///
/// `value` is carried through untouched; no numeric validation happens on
/// ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestPayload {
    pub sensor_type: String,
    pub value: Value,
    pub unit: Option<String>,
}

impl IngestPayload {
    /// Validate a raw request body.
    pub fn from_body(body: &[u8]) -> PayloadResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(PayloadError::NoPayload);
        }

        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => Self::from_map(map),
            _ => Err(PayloadError::NoPayload),
        }
    }

    fn from_map(mut map: Map<String, Value>) -> PayloadResult<Self> {
        let sensor_type = take_present(&mut map, "sensor_type");
        let value = take_present(&mut map, "value");

        let (sensor_type, value) = match (sensor_type, value) {
            (Some(sensor_type), Some(value)) => (sensor_type, value),
            (sensor_type, value) => {
                let mut missing = Vec::with_capacity(2);
                if sensor_type.is_none() {
                    missing.push("sensor_type");
                }
                if value.is_none() {
                    missing.push("value");
                }
                return Err(PayloadError::MissingFields(missing));
            }
        };

        let Value::String(sensor_type) = sensor_type else {
            return Err(PayloadError::InvalidField {
                field: "sensor_type",
                expected: "string",
            });
        };

        // A unit that is empty or not a string is treated like a missing one.
        let unit = match take_present(&mut map, "unit") {
            Some(Value::String(unit)) if !unit.is_empty() => Some(unit),
            _ => None,
        };

        Ok(Self {
            sensor_type,
            value,
            unit,
        })
    }

    /// Turn the payload into a reading stamped with the given insertion time.
    pub fn into_reading(self, timestamp: jiff::Timestamp) -> SensorReading {
        let unit = self.unit.unwrap_or_else(|| UNIT_NOT_AVAILABLE.to_owned());
        SensorReading::new(self.sensor_type, self.value, unit, timestamp)
    }
}

fn take_present(map: &mut Map<String, Value>, key: &str) -> Option<Value> {
    map.remove(key).filter(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;
    use serde_json::json;

    fn parse(value: Value) -> PayloadResult<IngestPayload> {
        IngestPayload::from_body(value.to_string().as_bytes())
    }

    #[test]
    fn accepts_full_payload() {
        let payload = parse(json!({"sensor_type": "Temperature", "value": 23.4, "unit": "C"}))
            .expect("valid payload");

        assert_eq!(payload.sensor_type, "Temperature");
        assert_eq!(payload.value, json!(23.4));
        assert_eq!(payload.unit.as_deref(), Some("C"));
    }

    #[test]
    fn missing_unit_defaults_to_sentinel() {
        let payload = parse(json!({"sensor_type": "Humidity", "value": 55})).unwrap();
        let reading = payload.into_reading(Timestamp::now());

        assert_eq!(&*reading.unidad, "N/A");
        assert_eq!(reading.valor, json!(55));
    }

    #[test]
    fn value_passes_through_untyped() {
        for value in [json!("warm"), json!(true), json!({"raw": [1, 2]}), json!(-3)] {
            let payload = parse(json!({"sensor_type": "X", "value": value.clone()})).unwrap();
            assert_eq!(payload.value, value);
        }
    }

    #[test]
    fn empty_and_non_json_bodies_are_no_payload() {
        assert_eq!(IngestPayload::from_body(b""), Err(PayloadError::NoPayload));
        assert_eq!(IngestPayload::from_body(b"  \n"), Err(PayloadError::NoPayload));
        assert_eq!(IngestPayload::from_body(b"sensor=1"), Err(PayloadError::NoPayload));
        assert_eq!(IngestPayload::from_body(b"[1, 2]"), Err(PayloadError::NoPayload));
        assert_eq!(IngestPayload::from_body(b"null"), Err(PayloadError::NoPayload));
    }

    #[test]
    fn reports_every_missing_field() {
        assert_eq!(
            parse(json!({})),
            Err(PayloadError::MissingFields(vec!["sensor_type", "value"]))
        );
        assert_eq!(
            parse(json!({"value": 1})),
            Err(PayloadError::MissingFields(vec!["sensor_type"]))
        );
    }

    #[test]
    fn explicit_null_counts_as_missing() {
        let err = parse(json!({"sensor_type": "Temperature", "value": null})).unwrap_err();
        assert_eq!(err, PayloadError::MissingFields(vec!["value"]));
        assert_eq!(err.to_string(), "Missing required field(s): value");
    }

    #[test]
    fn non_string_sensor_type_is_rejected() {
        let err = parse(json!({"sensor_type": 7, "value": 1})).unwrap_err();
        assert!(matches!(
            err,
            PayloadError::InvalidField {
                field: "sensor_type",
                ..
            }
        ));
    }

    #[test]
    fn empty_unit_defaults_to_sentinel() {
        let payload = parse(json!({"sensor_type": "T", "value": 1, "unit": ""})).unwrap();
        assert_eq!(payload.unit, None);

        let reading = payload.into_reading(Timestamp::now());
        assert_eq!(&*reading.unidad, "N/A");
    }

    #[test]
    fn non_string_unit_is_ignored() {
        let payload = parse(json!({"sensor_type": "T", "value": 1, "unit": 5})).unwrap();
        assert_eq!(payload.unit, None);
    }
}
