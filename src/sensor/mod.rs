//! A module for reading the grow box sensors over HTTP.
//!
//! # Example
//!
//! ```rust, no_run
//! use std::time::Duration;
//!
//! use grow_sensors::sensor::SensorClient;
//! use grow_sensors::sensor::models::SensorConfig;
//!
//! async fn read_sensors() {
//!   let client = SensorClient::new(SensorConfig {
//!     base_address: "http://pi-grow.local:3000".into(),
//!     ..Default::default()
//!   });
//!
//!   let reading = client.fetch_sensor_state().await.unwrap();
//!   println!("{} °C, {} %", reading.temperature, reading.humidity);
//!
//!   let handle = client.watch(Duration::from_secs(5), |sample| {
//!     if let Ok(sample) = sample {
//!       println!("{}: {:?}", sample.taken_at, sample.reading);
//!     }
//!   });
//!
//!   tokio::time::sleep(Duration::from_secs(30)).await;
//!   handle.cancel();
//! }
//!
//! # tokio_test::block_on(async {
//! read_sensors().await;
//! # })
//! ```

mod client;

pub mod errors;
pub mod models;

pub use client::SensorClient;
