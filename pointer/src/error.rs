//! Error type shared by the pointer device, its configuration, and the mesh builder.

use thiserror::Error;

/// Failures surfaced by the dwell pointer.
///
/// Configuration errors are fatal at construction. `MissingPointerTransform`
/// is a caller-contract violation: the event is rejected and no state changes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PointerError {
    #[error("invalid pointer config: {0}")]
    InvalidConfig(String),

    #[error("reticle mesh needs at least 1 segment, got {0}")]
    DegenerateMesh(u32),

    #[error("reticle mesh allows at most {max} segments, got {got}")]
    MeshTooLarge { got: u32, max: u32 },

    #[error("cannot operate on a null pointer transform")]
    MissingPointerTransform,

    #[error("failed to parse config: {0}")]
    ConfigParse(String),
}

pub type Result<T> = std::result::Result<T, PointerError>;
