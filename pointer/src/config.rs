//! Pointer configuration — construction-time constants for the dwell
//! timer and the reticle, with validation and plist loading.

use tracing::info;

use crate::error::{PointerError, Result};
use crate::ipc::plist::{get_keyword, try_float};

/// Renderer sort keys are 16-bit signed; the extreme negative value is reserved.
pub const SORTING_ORDER_LIMIT: i32 = 32767;

/// Largest ring the mesh builder accepts. Keeps vertex indices and buffer
/// sizes well inside `u32`.
pub const MAX_SEGMENT_COUNT: u32 = 65535;

/// Configuration for a dwell pointer. Fixed for the device's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerConfig {
    /// Seconds of continuous focus before a selection fires. `0` means click-through.
    pub dwell_time_s: f64,
    /// Closest the reticle is drawn, in meters.
    pub min_distance_m: f32,
    /// Farthest the reticle is drawn; also the hit-test ray length.
    pub max_distance_m: f32,
    /// Resting inner angle in degrees.
    pub min_inner_angle_deg: f32,
    /// Resting outer angle in degrees.
    pub min_outer_angle_deg: f32,
    /// Added to both angles over an interactive target.
    pub growth_angle_deg: f32,
    /// Angular samples in the reticle ring.
    pub segment_count: u32,
    /// Sort key handed to the renderer so the reticle draws on top.
    pub sorting_order: i32,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            dwell_time_s: 0.0,
            min_distance_m: 0.45,
            max_distance_m: 20.0,
            min_inner_angle_deg: 0.0,
            min_outer_angle_deg: 0.5,
            growth_angle_deg: 1.5,
            segment_count: 20,
            sorting_order: SORTING_ORDER_LIMIT,
        }
    }
}

impl PointerConfig {
    /// Check every constant against its allowed range.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(PointerError::InvalidConfig(msg));

        if !self.dwell_time_s.is_finite() || self.dwell_time_s < 0.0 {
            return invalid(format!("dwell time must be >= 0, got {}", self.dwell_time_s));
        }
        if !self.min_distance_m.is_finite() || self.min_distance_m <= 0.0 {
            return invalid(format!("min distance must be > 0, got {}", self.min_distance_m));
        }
        if !self.max_distance_m.is_finite() || self.max_distance_m <= self.min_distance_m {
            return invalid(format!(
                "max distance {} must exceed min distance {}",
                self.max_distance_m, self.min_distance_m
            ));
        }
        if !self.min_inner_angle_deg.is_finite() || self.min_inner_angle_deg < 0.0 {
            return invalid(format!(
                "min inner angle must be >= 0, got {}",
                self.min_inner_angle_deg
            ));
        }
        if !self.min_outer_angle_deg.is_finite()
            || self.min_outer_angle_deg < self.min_inner_angle_deg
        {
            return invalid(format!(
                "min outer angle {} must be >= min inner angle {}",
                self.min_outer_angle_deg, self.min_inner_angle_deg
            ));
        }
        if !self.growth_angle_deg.is_finite() || self.growth_angle_deg < 0.0 {
            return invalid(format!("growth angle must be >= 0, got {}", self.growth_angle_deg));
        }
        // The grown outer edge must stay a finite cone.
        if self.min_outer_angle_deg + self.growth_angle_deg >= 180.0 {
            return invalid(format!(
                "grown outer angle {} must stay below 180 degrees",
                self.min_outer_angle_deg + self.growth_angle_deg
            ));
        }
        if !(3..=MAX_SEGMENT_COUNT).contains(&self.segment_count) {
            return invalid(format!(
                "segment count must be within 3..={}, got {}",
                MAX_SEGMENT_COUNT, self.segment_count
            ));
        }
        if !(-SORTING_ORDER_LIMIT..=SORTING_ORDER_LIMIT).contains(&self.sorting_order) {
            return invalid(format!(
                "sorting order must be within +/-{}, got {}",
                SORTING_ORDER_LIMIT, self.sorting_order
            ));
        }
        Ok(())
    }

    /// Parse a config plist such as `(:dwell-time 1.0 :segments 32)`.
    ///
    /// Missing keys keep their defaults; the result is validated.
    pub fn from_sexp(raw: &str) -> Result<Self> {
        let value = lexpr::from_str(raw).map_err(|e| PointerError::ConfigParse(e.to_string()))?;
        let parse_err = PointerError::ConfigParse;

        let mut config = Self::default();
        if let Some(v) = try_float(&value, "dwell-time").map_err(parse_err)? {
            config.dwell_time_s = v;
        }
        if let Some(v) = try_float(&value, "min-distance").map_err(parse_err)? {
            config.min_distance_m = v as f32;
        }
        if let Some(v) = try_float(&value, "max-distance").map_err(parse_err)? {
            config.max_distance_m = v as f32;
        }
        if let Some(v) = try_float(&value, "min-inner-angle").map_err(parse_err)? {
            config.min_inner_angle_deg = v as f32;
        }
        if let Some(v) = try_float(&value, "min-outer-angle").map_err(parse_err)? {
            config.min_outer_angle_deg = v as f32;
        }
        if let Some(v) = try_float(&value, "growth-angle").map_err(parse_err)? {
            config.growth_angle_deg = v as f32;
        }
        if let Some(s) = get_keyword(&value, "segments") {
            config.segment_count = s
                .parse()
                .map_err(|_| parse_err(format!(":segments expects a non-negative integer, got {s}")))?;
        }
        if let Some(s) = get_keyword(&value, "sorting-order") {
            config.sorting_order = s
                .parse()
                .map_err(|_| parse_err(format!(":sorting-order expects an integer, got {s}")))?;
        }

        config.validate()?;
        info!(
            "Pointer config loaded: dwell {:.3}s, distance {:.2}-{:.2}m, {} segments",
            config.dwell_time_s, config.min_distance_m, config.max_distance_m, config.segment_count
        );
        Ok(config)
    }

    /// Generate IPC config s-expression.
    pub fn to_sexp(&self) -> String {
        format!(
            "(:dwell-time {:.3} :min-distance {:.3} :max-distance {:.3} :min-inner-angle {:.3} :min-outer-angle {:.3} :growth-angle {:.3} :segments {} :sorting-order {})",
            self.dwell_time_s,
            self.min_distance_m,
            self.max_distance_m,
            self.min_inner_angle_deg,
            self.min_outer_angle_deg,
            self.growth_angle_deg,
            self.segment_count,
            self.sorting_order,
        )
    }
}
