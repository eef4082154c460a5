use crate::config::ConfigError;
use crate::schedule::{ScheduleLoadError, ScheduleQueryError};
use crate::secrets::CipherError;
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Schedule(ScheduleLoadError),
    Query(ScheduleQueryError),
    Cipher(CipherError),
    Render(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Schedule(err) => write!(f, "schedule error: {}", err),
            AppError::Query(err) => write!(f, "query rejected: {}", err),
            AppError::Cipher(err) => write!(f, "secrets error: {}", err),
            AppError::Render(err) => write!(f, "render error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Schedule(err) => Some(err),
            AppError::Query(err) => Some(err),
            AppError::Cipher(err) => Some(err),
            AppError::Render(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ScheduleLoadError> for AppError {
    fn from(value: ScheduleLoadError) -> Self {
        Self::Schedule(value)
    }
}

impl From<ScheduleQueryError> for AppError {
    fn from(value: ScheduleQueryError) -> Self {
        Self::Query(value)
    }
}

impl From<CipherError> for AppError {
    fn from(value: CipherError) -> Self {
        Self::Cipher(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Render(value)
    }
}
