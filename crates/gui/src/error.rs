//! Error kinds for the editing core.
//!
//! None of these are fatal to the session: every failing operation leaves the
//! scene exactly as it found it.

use shared::{IconKey, ObjectId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("a zone needs at least 3 vertices, got {vertices}")]
    InvalidGeometry { vertices: usize },
    #[error("malformed color {0:?}")]
    MalformedColor(String),
    #[error("failed to load icon {icon:?}: {reason}")]
    AssetLoadFailure { icon: IconKey, reason: String },
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),
    #[error("no object with id {0}")]
    NoSuchObject(ObjectId),
    #[error("action not available: {0}")]
    InvalidAction(&'static str),
    #[error("object {id} is transform-locked: {reason}")]
    TransformLocked { id: ObjectId, reason: &'static str },
    #[error("export failed: {0}")]
    ExportFailure(String),
}

pub type EditorResult<T> = Result<T, EditorError>;
