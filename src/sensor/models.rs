use time::OffsetDateTime;

/// Address of the grow box on the local network.
pub const DEFAULT_BASE_ADDRESS: &str = "http://pi-grow.local:3000";

/// Default transfer timeout, in seconds.
pub const DEFAULT_TIMEOUT: u64 = 10;

/// A single temperature and humidity reading as served by the grow box.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SensorReading {
  /// Air temperature.
  pub temperature: f32,

  /// Relative humidity.
  pub humidity: f32,
}

/// A [`SensorReading`] together with the moment it was received.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
  /// UTC time when the response was decoded.
  pub taken_at: OffsetDateTime,

  /// The reading itself.
  pub reading: SensorReading,
}

/// Configuration for a [`SensorClient`](crate::sensor::SensorClient).
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct SensorConfig {
  /// Scheme, host and port of the grow box, e.g. `http://pi-grow.local:3000`.
  pub base_address: String,

  /// Maximum time, in seconds, for the whole transfer. `0` disables the timeout.
  pub timeout: u64,
}

impl Default for SensorConfig {
  fn default() -> Self {
    Self {
      base_address: String::from(DEFAULT_BASE_ADDRESS),
      timeout: DEFAULT_TIMEOUT,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reading_from_json() {
    let reading: SensorReading =
      serde_json::from_str(r#"{"temperature": 21.5, "humidity": 48.25}"#).unwrap();

    assert_eq!(
      reading,
      SensorReading {
        temperature: 21.5,
        humidity: 48.25,
      },
      "reading is decoded field by field"
    );
  }

  #[test]
  fn reading_ignores_unknown_fields() {
    let reading: Result<SensorReading, _> =
      serde_json::from_str(r#"{"temperature": 1, "humidity": 2, "time": "now"}"#);

    assert!(reading.is_ok(), "extra fields are not rejected");
  }

  #[test]
  fn reading_requires_both_fields() {
    let reading: Result<SensorReading, _> = serde_json::from_str(r#"{"temperature": 1}"#);

    assert!(reading.is_err(), "humidity is required");
  }

  #[test]
  fn config_defaults() {
    let config = SensorConfig::default();

    assert_eq!(config.base_address, DEFAULT_BASE_ADDRESS);
    assert_eq!(config.timeout, DEFAULT_TIMEOUT);
  }

  #[test]
  fn config_partial_deserialize() {
    let config: SensorConfig = serde_json::from_str(r#"{"timeout": 3}"#).unwrap();

    assert_eq!(
      config,
      SensorConfig {
        base_address: String::from(DEFAULT_BASE_ADDRESS),
        timeout: 3,
      },
      "missing fields fall back to defaults"
    );
  }
}
