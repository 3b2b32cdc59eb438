//! A module describing sensor client errors.

use thiserror::Error;

/// Errors that can occur while fetching a sensor reading.
///
/// Transport and decode failures are passed through as reported by
/// `curl` and `serde_json` respectively.
#[derive(Error, Debug)]
pub enum SensorError {
  /// The HTTP transfer failed (connection refused, DNS failure, timeout,
  /// or an error status reported by the transport).
  #[error("Transport error: {0}")]
  Transport(#[from] curl::Error),

  /// The response body is not a JSON sensor reading.
  #[error("Decode error: {0}")]
  Decode(#[from] serde_json::Error),

  /// The blocking task performing the transfer was cancelled or panicked.
  #[error("Transfer task failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}

/// Result type alias for sensor operations.
pub type Result<T> = std::result::Result<T, SensorError>;
