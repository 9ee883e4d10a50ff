//! Dwell pointer — gaze selection by dwell time, with a procedural reticle.
//!
//! Part of a head-mounted pointer stack: an external hit-tester decides what
//! the gaze ray is on, this crate decides when that counts as a selection and
//! how the reticle should look while it does.

pub mod config;
pub mod error;
pub mod ipc;
pub mod vr;

pub use config::PointerConfig;
pub use error::PointerError;
pub use vr::DwellPointer;
