//! Poller for the ELV WS980WiFi weather station.
//!
//! The station answers a fixed 8-byte TCP query with an 82-byte binary
//! record. [`protocol`] decodes that record field by field (offset,
//! width, sign, scale, sentinel patterns) and [`station`] drives the
//! connect/query/decode/publish cycle on a repeat/retry schedule,
//! notifying a [`station::SensorRegistry`] only when a value changes.

pub mod config;
pub mod error;
pub mod models;
pub mod protocol;
pub mod station;
pub mod utils;
