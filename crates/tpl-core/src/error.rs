//! Error types for the template core.

use crate::id::FieldId;
use thiserror::Error;

/// Coordinate conversion failed because the background image has no
/// usable dimensions yet.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordError {
    #[error("background image not loaded (size {width}x{height})")]
    ImageNotLoaded { width: f64, height: f64 },
}

/// Loading fields or settings from their JSON form failed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate field id {0} and no free id to reassign it")]
    DuplicateId(FieldId),
}
