//! Cutroom API service: authentication, project/asset CRUD and the
//! resumable chunked upload pipeline, served over axum.

pub mod api_doc;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
