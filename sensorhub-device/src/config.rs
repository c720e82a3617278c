use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ingestion endpoint readings are posted to
    pub server_url: String,
    /// Sensors read each round, in order
    pub sensors: Vec<String>,
    /// Pause in seconds between two sensors of the same round
    pub sensor_gap_secs: u64,
    /// Pause in seconds after a full round
    pub round_interval_secs: u64,
}

impl Config {
    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000/receive_sensor_data/".to_owned(),
            sensors: vec!["Temperature".to_owned(), "Humidity".to_owned()],
            sensor_gap_secs: 2,
            round_interval_secs: 15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config = toml::from_str(r#"server_url = "http://hub:5000/receive_sensor_data""#)
            .unwrap();

        assert_eq!(config.server_url, "http://hub:5000/receive_sensor_data");
        assert_eq!(config.sensors, vec!["Temperature", "Humidity"]);
        assert_eq!(config.sensor_gap_secs, 2);
        assert_eq!(config.round_interval_secs, 15);
    }
}
