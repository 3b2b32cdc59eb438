use std::sync::Arc;
use std::time::Duration;

use curl::easy::{Easy2, Handler, WriteError};
use log::{debug, warn};
use time::OffsetDateTime;
use tokio::task;

use crate::repeat::{self, RepeaterHandle};
use crate::sensor::errors::Result;
use crate::sensor::models::{Sample, SensorConfig, SensorReading};

/// Path of the sensor endpoint, relative to the base address.
const SENSORS_PATH: &str = "/sensors";

#[derive(Default)]
struct ResponseBody(Vec<u8>);

impl Handler for ResponseBody {
  fn write(&mut self, data: &[u8]) -> std::result::Result<usize, WriteError> {
    self.0.extend_from_slice(data);

    Ok(data.len())
  }
}

impl ResponseBody {
  fn as_bytes(&self) -> &[u8] {
    &self.0
  }
}

/// HTTP client for the grow box sensor endpoint.
///
/// The client only holds its configuration, so calls are independent and
/// may run concurrently. Every call is exactly one request; nothing is
/// retried or cached.
#[derive(Debug, Clone, Default)]
pub struct SensorClient {
  config: SensorConfig,
}

impl SensorClient {
  /// Create a client from a configuration.
  pub fn new(config: SensorConfig) -> Self {
    Self { config }
  }

  /// Create a client for `base_address` with the default timeout.
  pub fn with_base_address(base_address: impl Into<String>) -> Self {
    Self::new(SensorConfig {
      base_address: base_address.into(),
      ..Default::default()
    })
  }

  /// Client configuration.
  pub fn config(&self) -> &SensorConfig {
    &self.config
  }

  /// Full URL of the sensor endpoint.
  pub fn endpoint(&self) -> String {
    format!(
      "{}{}",
      self.config.base_address.trim_end_matches('/'),
      SENSORS_PATH
    )
  }

  /// Fetch the current reading.
  ///
  /// Issues `GET {base_address}/sensors`, following redirects, and decodes
  /// the body as JSON.
  /// Transport failures, including error statuses, are returned as
  /// [`SensorError::Transport`](crate::sensor::errors::SensorError::Transport);
  /// a body that isn't a reading as
  /// [`SensorError::Decode`](crate::sensor::errors::SensorError::Decode).
  pub async fn fetch_sensor_state(&self) -> Result<SensorReading> {
    let url = self.endpoint();
    debug!("GET {}", url);

    let mut request = Easy2::new(ResponseBody::default());
    request.url(url.as_str())?;
    request.get(true)?;
    request.fail_on_error(true)?;
    request.follow_location(true)?;
    request.timeout(Duration::from_secs(self.config.timeout))?;

    let response = task::spawn_blocking(move || request.perform().map(|()| request)).await??;

    Ok(serde_json::from_slice(response.get_ref().as_bytes())?)
  }

  /// Fetch the current reading and stamp it with the time it was received.
  pub async fn sample(&self) -> Result<Sample> {
    let reading = self.fetch_sensor_state().await?;

    Ok(Sample {
      taken_at: OffsetDateTime::now_utc(),
      reading,
    })
  }

  /// Keep sampling the sensor, pausing `interval` after every fetch.
  ///
  /// Every outcome, successful or not, is passed to `on_sample`; failed
  /// fetches are also logged and never stop the loop. The loop runs until
  /// the returned handle is cancelled. Must be called from within a tokio
  /// runtime.
  pub fn watch<F>(self, interval: Duration, on_sample: F) -> RepeaterHandle
  where
    F: Fn(Result<Sample>) + Send + Sync + 'static,
  {
    let client = Arc::new(self);
    let on_sample = Arc::new(on_sample);

    repeat::start(
      move || {
        let client = Arc::clone(&client);
        let on_sample = Arc::clone(&on_sample);

        async move {
          let sample = client.sample().await;

          if let Err(error) = &sample {
            warn!("failed to sample {}: {}", client.endpoint(), error);
          }

          on_sample(sample);
        }
      },
      interval,
    )
  }
}
