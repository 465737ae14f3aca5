//! HTTP client for the remote interview analysis service.
//!
//! Provides the REST wrapper ([`api::AnalysisApi`]), its configuration, and
//! the [`service::AnalysisService`] trait the session controller is written
//! against.

pub mod api;
pub mod config;
pub mod service;

pub use api::{AnalysisApi, AnalysisApiError, UploadAck};
pub use config::{ApiConfig, ConfigError};
pub use service::AnalysisService;
