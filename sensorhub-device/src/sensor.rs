use std::ops::Range;
use std::str::FromStr;

use rand::Rng;
use serde::Serialize;

/// Sensors the simulated device knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Temperature,
    Humidity,
}

impl SensorKind {
    pub fn name(self) -> &'static str {
        match self {
            SensorKind::Temperature => "Temperature",
            SensorKind::Humidity => "Humidity",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            SensorKind::Temperature => "C",
            SensorKind::Humidity => "%",
        }
    }

    fn range(self) -> Range<f64> {
        match self {
            SensorKind::Temperature => 20.0..36.0,
            SensorKind::Humidity => 40.0..71.0,
        }
    }

    /// Produce a simulated reading, rounded to one decimal.
    pub fn read<R: Rng>(self, rng: &mut R) -> ReadingPayload {
        let raw: f64 = rng.random_range(self.range());

        ReadingPayload {
            sensor_type: self.name(),
            value: (raw * 10.0).round() / 10.0,
            unit: self.unit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSensor(pub String);

impl FromStr for SensorKind {
    type Err = UnknownSensor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Temperature" => Ok(SensorKind::Temperature),
            "Humidity" => Ok(SensorKind::Humidity),
            other => Err(UnknownSensor(other.to_owned())),
        }
    }
}

/// JSON body posted to the hub.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingPayload {
    pub sensor_type: &'static str,
    pub value: f64,
    pub unit: &'static str,
}
