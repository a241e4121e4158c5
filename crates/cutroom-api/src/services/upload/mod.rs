//! Resumable chunked upload pipeline.

mod coordinator;
mod locks;

pub use coordinator::{ChunkProgress, UploadCoordinator, UploadLimits};
