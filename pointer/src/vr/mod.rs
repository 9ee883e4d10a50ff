//! VR pointer subsystem — dwell-time gaze selection and its reticle.
//!
//! Provides:
//! - `DwellPointer`: the device a hit-tester drives with enter/hover/exit
//! - `dwell_timer`: single-shot dwell trigger
//! - `reticle`: procedural ring mesh and per-frame reticle parameters
//! - `scene`: pointer-space math

pub mod dwell_pointer;
pub mod dwell_timer;
pub mod reticle;
pub mod scene;

pub use dwell_pointer::{DwellPointer, PointerPhase};
pub use reticle::{ReticleFrame, ReticleMesh, ReticleUniforms};
pub use scene::{PointerPose, PointerTransform, Vec3};
