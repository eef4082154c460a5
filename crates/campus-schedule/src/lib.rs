pub mod config;
pub mod envelope;
pub mod error;
pub mod schedule;
pub mod secrets;
pub mod telemetry;
