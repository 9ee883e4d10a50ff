//! Reticle geometry — the procedural ring mesh and the per-frame
//! diameter/distance parameters a material consumes to draw it.
//!
//! The mesh is a unit ring strip built once; all animation happens
//! through `ReticleFrame`, which shrinks the ring from its grown size to
//! its resting size as the dwell timer runs down.

use std::f32::consts::TAU;

use tracing::debug;

use super::dwell_timer::DwellTimer;
use super::scene::Vec3;
use crate::config::{PointerConfig, MAX_SEGMENT_COUNT};
use crate::error::{PointerError, Result};

/// Diameter of a circle subtending `angle_deg` at unit distance.
pub fn angle_to_diameter(angle_deg: f32) -> f32 {
    2.0 * (angle_deg.to_radians() * 0.5).tan()
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

// ── Mesh ────────────────────────────────────────────────────

/// Closed two-layer ring strip: a front ring at z=0 and a back ring at z=1.
///
/// Vertices alternate front/back per angular sample; the last sample
/// repeats the first so the strip closes.
#[derive(Debug, Clone, PartialEq)]
pub struct ReticleMesh {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl ReticleMesh {
    pub fn build(segment_count: u32) -> Result<Self> {
        if segment_count < 1 {
            return Err(PointerError::DegenerateMesh(segment_count));
        }
        if segment_count > MAX_SEGMENT_COUNT {
            return Err(PointerError::MeshTooLarge {
                got: segment_count,
                max: MAX_SEGMENT_COUNT,
            });
        }

        let mut vertices = Vec::with_capacity(2 * (segment_count as usize + 1));
        for si in 0..=segment_count {
            let angle = si as f32 / segment_count as f32 * TAU;
            let (x, y) = (angle.sin(), angle.cos());
            vertices.push(Vec3::new(x, y, 0.0));
            vertices.push(Vec3::new(x, y, 1.0));
        }

        let mut triangles = Vec::with_capacity(2 * segment_count as usize);
        for si in 0..segment_count {
            let v = si * 2;
            triangles.push([v + 1, v, v + 2]);
            triangles.push([v + 1, v + 2, v + 3]);
        }

        debug!(
            "Reticle mesh built: {} segments, {} vertices, {} triangles",
            segment_count,
            vertices.len(),
            triangles.len()
        );
        Ok(Self { vertices, triangles })
    }

    pub fn segment_count(&self) -> u32 {
        (self.vertices.len() / 2).saturating_sub(1) as u32
    }

    /// Flattened index buffer, three indices per triangle.
    pub fn indices(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }
}

// ── Per-frame output ────────────────────────────────────────

/// Reticle parameters for one frame. Diameters are at unit distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReticleFrame {
    pub inner_diameter: f32,
    pub outer_diameter: f32,
    pub distance_m: f32,
}

/// Material uniform values: diameters scaled out to the reticle distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReticleUniforms {
    pub inner_diameter: f32,
    pub outer_diameter: f32,
    pub distance_in_meters: f32,
}

impl ReticleFrame {
    pub fn uniforms(&self) -> ReticleUniforms {
        ReticleUniforms {
            inner_diameter: self.inner_diameter * self.distance_m,
            outer_diameter: self.outer_diameter * self.distance_m,
            distance_in_meters: self.distance_m,
        }
    }

    pub fn to_sexp(&self) -> String {
        let u = self.uniforms();
        format!(
            "(:inner-diameter {:.6} :outer-diameter {:.6} :distance {:.4} :uniforms (:inner {:.6} :outer {:.6} :distance {:.4}))",
            self.inner_diameter,
            self.outer_diameter,
            self.distance_m,
            u.inner_diameter,
            u.outer_diameter,
            u.distance_in_meters,
        )
    }
}

// ── Geometry state ──────────────────────────────────────────

/// Reticle size and placement state for a single pointer.
#[derive(Debug, Clone)]
pub struct ReticleGeometry {
    min_distance_m: f32,
    max_distance_m: f32,
    min_inner_angle_deg: f32,
    min_outer_angle_deg: f32,
    growth_angle_deg: f32,
    /// Distance along the pointer ray, kept within `[min, max]`.
    pub distance_m: f32,
    /// Current angular subtense of the inner edge.
    pub inner_angle_deg: f32,
    /// Current angular subtense of the outer edge.
    pub outer_angle_deg: f32,
}

impl ReticleGeometry {
    pub fn new(config: &PointerConfig) -> Self {
        Self {
            min_distance_m: config.min_distance_m,
            max_distance_m: config.max_distance_m,
            min_inner_angle_deg: config.min_inner_angle_deg,
            min_outer_angle_deg: config.min_outer_angle_deg,
            growth_angle_deg: config.growth_angle_deg,
            distance_m: config.max_distance_m,
            inner_angle_deg: config.min_inner_angle_deg,
            outer_angle_deg: config.min_outer_angle_deg,
        }
    }

    /// Resting `(inner, outer)` angles in degrees.
    pub fn resting_angles(&self) -> (f32, f32) {
        (self.min_inner_angle_deg, self.min_outer_angle_deg)
    }

    /// Grown `(inner, outer)` angles in degrees, shown over interactive targets.
    pub fn grown_angles(&self) -> (f32, f32) {
        (
            self.min_inner_angle_deg + self.growth_angle_deg,
            self.min_outer_angle_deg + self.growth_angle_deg,
        )
    }

    pub fn resting_diameters(&self) -> (f32, f32) {
        let (inner, outer) = self.resting_angles();
        (angle_to_diameter(inner), angle_to_diameter(outer))
    }

    pub fn grown_diameters(&self) -> (f32, f32) {
        let (inner, outer) = self.grown_angles();
        (angle_to_diameter(inner), angle_to_diameter(outer))
    }

    pub fn set_distance(&mut self, distance_m: f32) {
        self.distance_m = distance_m.clamp(self.min_distance_m, self.max_distance_m);
    }

    pub fn update_target_angle(&mut self, is_interactive: bool) {
        let (inner, outer) = if is_interactive {
            self.grown_angles()
        } else {
            self.resting_angles()
        };
        self.inner_angle_deg = inner;
        self.outer_angle_deg = outer;
    }

    /// Back to the idle look: far away, resting size.
    pub fn reset(&mut self) {
        self.distance_m = self.max_distance_m;
        self.update_target_angle(false);
    }

    /// Enter and exit radii for focus hysteresis. Depends only on configuration.
    pub fn hysteresis_radii(&self) -> (f32, f32) {
        let enter = 2.0 * self.min_inner_angle_deg.to_radians().tan();
        let exit = 2.0 * (self.min_inner_angle_deg + self.growth_angle_deg).to_radians().tan();
        (enter, exit)
    }

    /// Per-frame reticle parameters.
    ///
    /// While a timed dwell runs the diameters shrink linearly from grown to
    /// resting; otherwise they follow the current target angles.
    pub fn compute_diameters(&mut self, now: f64, timer: &DwellTimer) -> ReticleFrame {
        self.distance_m = self.distance_m.clamp(self.min_distance_m, self.max_distance_m);

        let (inner_diameter, outer_diameter) = match timer.progress(now) {
            Some(t) => {
                let (rest_inner, rest_outer) = self.resting_diameters();
                let (grown_inner, grown_outer) = self.grown_diameters();
                (lerp(grown_inner, rest_inner, t), lerp(grown_outer, rest_outer, t))
            }
            None => (
                angle_to_diameter(self.inner_angle_deg),
                angle_to_diameter(self.outer_angle_deg),
            ),
        };

        ReticleFrame {
            inner_diameter,
            outer_diameter,
            distance_m: self.distance_m,
        }
    }
}
