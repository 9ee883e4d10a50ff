//! Dwell-time pointer — gaze selection without a button.
//!
//! The hit-tester reports enter/hover/exit against whatever target the gaze
//! ray crosses; the pointer answers with a one-shot trigger once an
//! interactive target has been held long enough, and with per-frame reticle
//! parameters that shrink the ring as the dwell runs down.
//!
//! Per-frame order: events first (`on_enter`/`on_hover`/`on_exit`), then
//! `query_trigger` and `update`.

use tracing::{debug, info, warn};

use super::dwell_timer::DwellTimer;
use super::reticle::{ReticleFrame, ReticleGeometry, ReticleMesh};
use super::scene::{PointerTransform, Vec3};
use crate::config::PointerConfig;
use crate::error::{PointerError, Result};

/// Coarse pointer state, derived from the timer and the current target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    /// No target under the pointer.
    Idle,
    /// Over a target that cannot be selected.
    Hovering,
    /// Over an interactive target with a dwell armed.
    Dwelling,
}

impl PointerPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Hovering => "hovering",
            Self::Dwelling => "dwelling",
        }
    }
}

/// Gaze pointer that selects by dwelling on interactive targets.
pub struct DwellPointer {
    config: PointerConfig,
    timer: DwellTimer,
    geometry: ReticleGeometry,
    mesh: ReticleMesh,
    transform: Option<Box<dyn PointerTransform>>,
    /// Whether the last enter/hover landed on a target.
    has_target: bool,
    /// Interactivity of the current target.
    target_interactive: bool,
    /// Set when the trigger fires; holds the reticle at resting size until
    /// the next enter or exit.
    dwell_completed: bool,
    /// Reticle output from the most recent `on_enter` or `update`.
    last_frame: Option<ReticleFrame>,
}

impl std::fmt::Debug for DwellPointer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DwellPointer")
            .field("config", &self.config)
            .field("timer", &self.timer)
            .field("geometry", &self.geometry)
            .field("has_transform", &self.transform.is_some())
            .field("has_target", &self.has_target)
            .field("dwell_completed", &self.dwell_completed)
            .finish()
    }
}

impl DwellPointer {
    /// Validate the configuration and build the reticle mesh.
    ///
    /// The pointer transform starts unset; events fail until one is supplied.
    pub fn new(config: PointerConfig) -> Result<Self> {
        config.validate()?;
        let mesh = ReticleMesh::build(config.segment_count)?;
        info!(
            "Dwell pointer initialized: dwell {:.3}s, {} reticle segments",
            config.dwell_time_s, config.segment_count
        );
        Ok(Self {
            timer: DwellTimer::new(config.dwell_time_s),
            geometry: ReticleGeometry::new(&config),
            mesh,
            transform: None,
            has_target: false,
            target_interactive: false,
            dwell_completed: false,
            last_frame: None,
            config,
        })
    }

    /// Like `new`, with a pointer transform already attached.
    pub fn with_transform(
        config: PointerConfig,
        transform: Box<dyn PointerTransform>,
    ) -> Result<Self> {
        let mut pointer = Self::new(config)?;
        pointer.set_pointer_transform(transform);
        Ok(pointer)
    }

    pub fn set_pointer_transform(&mut self, transform: Box<dyn PointerTransform>) {
        self.transform = Some(transform);
    }

    pub fn config(&self) -> &PointerConfig {
        &self.config
    }

    pub fn timer(&self) -> &DwellTimer {
        &self.timer
    }

    pub fn geometry(&self) -> &ReticleGeometry {
        &self.geometry
    }

    /// The static ring mesh, built once at construction.
    pub fn mesh(&self) -> &ReticleMesh {
        &self.mesh
    }

    pub fn last_frame(&self) -> Option<ReticleFrame> {
        self.last_frame
    }

    /// Ray length the hit-tester should use.
    pub fn max_pointer_distance(&self) -> f32 {
        self.config.max_distance_m
    }

    pub fn sorting_order(&self) -> i32 {
        self.config.sorting_order
    }

    /// Whether a dwell on the current target has already fired.
    pub fn dwell_completed(&self) -> bool {
        self.dwell_completed
    }

    pub fn phase(&self) -> PointerPhase {
        if self.timer.last_focused_at().is_some() {
            PointerPhase::Dwelling
        } else if self.has_target {
            PointerPhase::Hovering
        } else {
            PointerPhase::Idle
        }
    }

    /// Project `target` into pointer space and set distance and target angle.
    /// Leaves all state untouched when no transform is attached.
    fn set_pointer_target(&mut self, target: Vec3, is_interactive: bool) -> Result<()> {
        let Some(transform) = self.transform.as_ref() else {
            warn!("Cannot operate on a null pointer transform");
            return Err(PointerError::MissingPointerTransform);
        };
        let local = transform.inverse_transform_point(target);
        self.geometry.set_distance(local.z);
        self.geometry
            .update_target_angle(is_interactive && !self.dwell_completed);
        self.has_target = true;
        self.target_interactive = is_interactive;
        Ok(())
    }

    /// The gaze ray started crossing a target.
    ///
    /// The reticle for the new target is computed immediately and kept as
    /// `last_frame`, so a renderer can redraw before the next `update`.
    pub fn on_enter(&mut self, target: Vec3, is_interactive: bool, now: f64) -> Result<()> {
        if self.transform.is_none() {
            warn!("Cannot operate on a null pointer transform");
            return Err(PointerError::MissingPointerTransform);
        }
        self.dwell_completed = false;
        self.set_pointer_target(target, is_interactive)?;
        if is_interactive {
            self.timer.start(now);
        }
        self.last_frame = Some(self.geometry.compute_diameters(now, &self.timer));
        debug!(
            "Pointer enter: interactive={} distance={:.2}m at {:.3}s",
            is_interactive, self.geometry.distance_m, now
        );
        Ok(())
    }

    /// The gaze ray is still on the same target. Dwell keeps accumulating.
    pub fn on_hover(&mut self, target: Vec3, is_interactive: bool, _now: f64) -> Result<()> {
        self.set_pointer_target(target, is_interactive)
    }

    /// The gaze ray left the target. Cancels any dwell in progress.
    pub fn on_exit(&mut self) {
        self.geometry.reset();
        self.timer.cancel();
        self.has_target = false;
        self.target_interactive = false;
        self.dwell_completed = false;
        debug!("Pointer exit");
    }

    /// One-shot selection query; see `DwellTimer::query_trigger`.
    pub fn query_trigger(&mut self, now: f64) -> bool {
        let fired = self.timer.query_trigger(now);
        if fired {
            self.dwell_completed = true;
            self.geometry.update_target_angle(false);
            info!(
                "Dwell selection at {:.3}s (total {})",
                now,
                self.timer.triggers_fired()
            );
        }
        fired
    }

    /// `(enter, exit)` radii for focus hysteresis.
    pub fn hysteresis_radii(&self) -> (f32, f32) {
        self.geometry.hysteresis_radii()
    }

    /// Per-frame reticle update.
    pub fn update(&mut self, now: f64) -> ReticleFrame {
        let frame = self.geometry.compute_diameters(now, &self.timer);
        self.last_frame = Some(frame);
        frame
    }

    /// Generate IPC status s-expression.
    pub fn status_sexp(&self) -> String {
        let focused = self
            .timer
            .last_focused_at()
            .map(|t| format!("{:.3}", t))
            .unwrap_or_else(|| "nil".to_string());
        format!(
            "(:phase :{} :interactive {} :focused-at {} :distance {:.4} :inner-angle {:.3} :outer-angle {:.3} :triggers {})",
            self.phase().as_str(),
            if self.target_interactive { "t" } else { "nil" },
            focused,
            self.geometry.distance_m,
            self.geometry.inner_angle_deg,
            self.geometry.outer_angle_deg,
            self.timer.triggers_fired(),
        )
    }

    /// Generate IPC config s-expression.
    pub fn config_sexp(&self) -> String {
        self.config.to_sexp()
    }
}

// ── Tests ───────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vr::reticle::angle_to_diameter;
    use crate::vr::scene::PointerPose;

    fn scenario_config(dwell_time_s: f64) -> PointerConfig {
        PointerConfig {
            dwell_time_s,
            min_distance_m: 0.45,
            max_distance_m: 20.0,
            min_inner_angle_deg: 0.0,
            min_outer_angle_deg: 0.5,
            growth_angle_deg: 1.5,
            ..PointerConfig::default()
        }
    }

    fn make_pointer(dwell_time_s: f64) -> DwellPointer {
        DwellPointer::with_transform(scenario_config(dwell_time_s), Box::new(PointerPose::default()))
            .unwrap()
    }

    fn ahead(distance: f32) -> Vec3 {
        Vec3::new(0.0, 0.0, distance)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = PointerConfig {
            segment_count: 0,
            ..PointerConfig::default()
        };
        assert!(matches!(
            DwellPointer::new(config),
            Err(PointerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_mesh_built_at_construction() {
        let pointer = make_pointer(1.0);
        assert_eq!(pointer.mesh().vertices.len(), 42);
        assert_eq!(pointer.mesh().triangles.len(), 40);
    }

    #[test]
    fn test_missing_transform_leaves_state_unchanged() {
        let mut pointer = DwellPointer::new(scenario_config(1.0)).unwrap();
        let before = pointer.status_sexp();
        assert_eq!(
            pointer.on_enter(ahead(3.0), true, 0.0),
            Err(PointerError::MissingPointerTransform)
        );
        assert_eq!(
            pointer.on_hover(ahead(3.0), true, 0.1),
            Err(PointerError::MissingPointerTransform)
        );
        assert_eq!(pointer.status_sexp(), before);
        assert_eq!(pointer.timer().last_focused_at(), None);
        assert!(!pointer.query_trigger(10.0));
    }

    #[test]
    fn test_concrete_scenario() {
        let mut pointer = make_pointer(1.0);
        pointer.on_enter(ahead(4.0), true, 0.0).unwrap();
        assert_eq!(pointer.geometry().inner_angle_deg, 1.5);
        assert_eq!(pointer.geometry().outer_angle_deg, 2.0);
        assert_eq!(pointer.phase(), PointerPhase::Dwelling);

        let (rest_inner, rest_outer) = (angle_to_diameter(0.0), angle_to_diameter(0.5));
        let (grown_inner, grown_outer) = (angle_to_diameter(1.5), angle_to_diameter(2.0));

        let frame = pointer.update(0.5);
        assert!((frame.inner_diameter - (grown_inner + rest_inner) / 2.0).abs() < 1e-6);
        assert!((frame.outer_diameter - (grown_outer + rest_outer) / 2.0).abs() < 1e-6);
        assert_eq!(frame.distance_m, 4.0);

        let frame = pointer.update(1.0);
        assert!((frame.inner_diameter - rest_inner).abs() < 1e-7);
        assert!((frame.outer_diameter - rest_outer).abs() < 1e-7);

        assert!(pointer.query_trigger(1.0));
        assert_eq!(pointer.timer().last_focused_at(), None);
        assert!(!pointer.query_trigger(1.0));
    }

    #[test]
    fn test_enter_computes_frame_for_any_target() {
        let mut pointer = make_pointer(1.0);
        pointer.on_enter(ahead(2.0), true, 0.0).unwrap();
        let frame = pointer.last_frame().unwrap();
        assert_eq!(frame.outer_diameter, angle_to_diameter(2.0));
        assert_eq!(frame.distance_m, 2.0);
        pointer.on_exit();
        pointer.on_enter(ahead(2.0), false, 1.0).unwrap();
        let frame = pointer.last_frame().unwrap();
        assert_eq!(frame.outer_diameter, angle_to_diameter(0.5));
        assert_eq!(pointer.timer().last_focused_at(), None);
        assert_eq!(pointer.phase(), PointerPhase::Hovering);
    }

    #[test]
    fn test_trigger_only_after_dwell() {
        let mut pointer = make_pointer(0.8);
        pointer.on_enter(ahead(3.0), true, 10.0).unwrap();
        let mut fired = Vec::new();
        for step in 1..=20 {
            let now = 10.0 + step as f64 * 0.1;
            pointer.on_hover(ahead(3.0), true, now).unwrap();
            if pointer.query_trigger(now) {
                fired.push(now);
            }
        }
        assert_eq!(fired.len(), 1, "exactly one trigger per focus episode");
        assert!(fired[0] >= 10.8 - 1e-9);
        assert!(fired[0] < 11.0);
    }

    #[test]
    fn test_hover_does_not_restart_dwell() {
        let mut pointer = make_pointer(1.0);
        pointer.on_enter(ahead(3.0), true, 0.0).unwrap();
        pointer.on_hover(ahead(3.5), true, 0.6).unwrap();
        pointer.on_hover(ahead(3.5), true, 0.9).unwrap();
        assert_eq!(pointer.timer().last_focused_at(), Some(0.0));
        assert!(pointer.query_trigger(1.0));
    }

    #[test]
    fn test_hover_alone_never_arms_dwell() {
        let mut pointer = make_pointer(0.5);
        pointer.on_hover(ahead(3.0), true, 0.0).unwrap();
        assert!(!pointer.query_trigger(5.0));
    }

    #[test]
    fn test_click_through_fires_immediately() {
        let mut pointer = make_pointer(0.0);
        pointer.on_enter(ahead(3.0), true, 2.0).unwrap();
        assert!(pointer.query_trigger(2.0));
        assert!(!pointer.query_trigger(2.0));
        pointer.on_hover(ahead(3.0), true, 2.1).unwrap();
        assert!(!pointer.query_trigger(2.1));

        pointer.on_exit();
        pointer.on_enter(ahead(3.0), true, 3.0).unwrap();
        assert!(pointer.query_trigger(3.0));
    }

    #[test]
    fn test_click_through_grown_until_fired() {
        let mut pointer = make_pointer(0.0);
        pointer.on_enter(ahead(3.0), true, 0.0).unwrap();
        let frame = pointer.update(0.0);
        assert_eq!(frame.inner_diameter, angle_to_diameter(1.5));
        assert_eq!(frame.outer_diameter, angle_to_diameter(2.0));

        assert!(pointer.query_trigger(0.0));
        pointer.on_hover(ahead(3.0), true, 0.1).unwrap();
        let frame = pointer.update(0.1);
        assert_eq!(frame.inner_diameter, angle_to_diameter(0.0));
        assert_eq!(frame.outer_diameter, angle_to_diameter(0.5));
    }

    #[test]
    fn test_reticle_stays_resting_after_trigger() {
        let mut pointer = make_pointer(1.0);
        pointer.on_enter(ahead(3.0), true, 0.0).unwrap();
        let before = pointer.update(1.0);
        assert!(pointer.query_trigger(1.0));
        assert!(pointer.dwell_completed());

        let (rest_inner, rest_outer) = pointer.geometry().resting_diameters();
        for step in 1..=5 {
            let now = 1.0 + step as f64 * 0.1;
            pointer.on_hover(ahead(3.0), true, now).unwrap();
            let frame = pointer.update(now);
            assert_eq!(frame.inner_diameter, rest_inner);
            assert_eq!(frame.outer_diameter, rest_outer);
            assert!(frame.outer_diameter <= before.outer_diameter + 1e-7);
            assert!(!pointer.query_trigger(now));
        }

        // A fresh enter grows the reticle and arms a new dwell.
        pointer.on_enter(ahead(3.0), true, 2.0).unwrap();
        assert!(!pointer.dwell_completed());
        let frame = pointer.update(2.0);
        assert_eq!(frame.outer_diameter, angle_to_diameter(2.0));
        assert!(pointer.query_trigger(3.0));
    }

    #[test]
    fn test_exit_clears_completed_dwell() {
        let mut pointer = make_pointer(0.0);
        pointer.on_enter(ahead(3.0), true, 0.0).unwrap();
        assert!(pointer.query_trigger(0.0));
        pointer.on_exit();
        assert!(!pointer.dwell_completed());
        pointer.on_hover(ahead(3.0), true, 0.5).unwrap();
        let frame = pointer.update(0.5);
        assert_eq!(frame.outer_diameter, angle_to_diameter(2.0));
    }

    #[test]
    fn test_non_interactive_target_never_triggers() {
        let mut pointer = make_pointer(0.0);
        pointer.on_enter(ahead(3.0), false, 0.0).unwrap();
        assert!(!pointer.query_trigger(0.0));
        let frame = pointer.update(0.0);
        assert_eq!(frame.outer_diameter, angle_to_diameter(0.5));
    }

    #[test]
    fn test_exit_resets_to_idle_baseline() {
        let sequences: [&[f32]; 3] = [&[], &[1.0, 2.0], &[0.1, 50.0, 7.0, 3.0]];
        for hovers in sequences {
            let mut pointer = make_pointer(1.0);
            pointer.on_enter(ahead(5.0), true, 0.0).unwrap();
            for (i, d) in hovers.iter().enumerate() {
                pointer.on_hover(ahead(*d), i % 2 == 0, 0.1 * (i + 1) as f64).unwrap();
            }
            pointer.on_exit();
            let frame = pointer.update(0.5);
            assert_eq!(frame.inner_diameter, angle_to_diameter(0.0));
            assert_eq!(frame.outer_diameter, angle_to_diameter(0.5));
            assert_eq!(frame.distance_m, 20.0);
            assert_eq!(pointer.phase(), PointerPhase::Idle);
            assert!(!pointer.query_trigger(10.0));
        }
    }

    #[test]
    fn test_distance_clamped_on_events() {
        let mut pointer = make_pointer(1.0);
        pointer.on_enter(ahead(0.1), true, 0.0).unwrap();
        assert_eq!(pointer.geometry().distance_m, 0.45);
        pointer.on_hover(ahead(100.0), true, 0.1).unwrap();
        assert_eq!(pointer.geometry().distance_m, 20.0);
        // Behind the pointer clamps to the near limit.
        pointer.on_hover(ahead(-4.0), true, 0.2).unwrap();
        assert_eq!(pointer.geometry().distance_m, 0.45);
    }

    #[test]
    fn test_transformed_pose_distance() {
        let pose = PointerPose::looking(
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::UP,
        )
        .unwrap();
        let mut pointer =
            DwellPointer::with_transform(scenario_config(1.0), Box::new(pose)).unwrap();
        pointer.on_enter(Vec3::new(1.0, 1.0, -2.0), true, 0.0).unwrap();
        assert!((pointer.geometry().distance_m - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_hysteresis_radii_independent_of_history() {
        let mut pointer = make_pointer(1.0);
        let before = pointer.hysteresis_radii();
        pointer.on_enter(ahead(2.0), true, 0.0).unwrap();
        pointer.on_hover(ahead(3.0), true, 0.5).unwrap();
        assert_eq!(pointer.hysteresis_radii(), before);
        pointer.on_exit();
        assert_eq!(pointer.hysteresis_radii(), before);
    }

    #[test]
    fn test_max_pointer_distance_and_sorting_order() {
        let pointer = make_pointer(1.0);
        assert_eq!(pointer.max_pointer_distance(), 20.0);
        assert_eq!(pointer.sorting_order(), 32767);
    }

    #[test]
    fn test_status_sexp() {
        let mut pointer = make_pointer(1.0);
        assert!(pointer.status_sexp().contains(":phase :idle"));
        pointer.on_enter(ahead(2.0), true, 0.25).unwrap();
        let status = pointer.status_sexp();
        assert!(status.contains(":phase :dwelling"));
        assert!(status.contains(":focused-at 0.250"));
        assert!(lexpr::from_str(&status).is_ok());
    }
}
