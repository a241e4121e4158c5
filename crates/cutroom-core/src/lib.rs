//! Core types shared across the Cutroom workspace: data models, the
//! `AppError` taxonomy and application configuration.

pub mod config;
pub mod error;
pub mod models;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
