#![forbid(unsafe_code)]

//! Grow sensors library.
//!
//! ## Features
//!
//! - **sensor** – Provides the [SensorClient](sensor::SensorClient) which
//!   fetches the current [SensorReading](sensor::models::SensorReading)
//!   (temperature and humidity) from the grow box over HTTP, and can keep
//!   watching it on an interval.
//! - **repeat** – Provides the [Repeater](repeat::Repeater) and the
//!   [start](repeat::start) helper for running an asynchronous action over
//!   and over with a fixed pause between the end of one run and the start of
//!   the next, until the returned [RepeaterHandle](repeat::RepeaterHandle)
//!   is cancelled.

pub mod repeat;
pub mod sensor;
