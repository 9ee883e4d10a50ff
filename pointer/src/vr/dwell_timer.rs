//! Dwell timer: how long the current interactive target has been focused,
//! and the one-shot trigger that fires once the dwell threshold is reached.
//!
//! A dwell time of zero turns the pointer into click-through mode: the
//! trigger fires on the first query after focus starts.

use tracing::debug;

/// Single-shot dwell timer.
#[derive(Debug, Clone)]
pub struct DwellTimer {
    /// Seconds of continuous focus required before the trigger fires.
    dwell_time_s: f64,
    /// When focus started on an interactive target. `None` when no dwell is armed.
    last_focused_at: Option<f64>,
    /// Triggers fired over the timer's lifetime.
    triggers_fired: u64,
}

impl DwellTimer {
    pub fn new(dwell_time_s: f64) -> Self {
        Self {
            dwell_time_s: dwell_time_s.max(0.0),
            last_focused_at: None,
            triggers_fired: 0,
        }
    }

    pub fn dwell_time_s(&self) -> f64 {
        self.dwell_time_s
    }

    pub fn last_focused_at(&self) -> Option<f64> {
        self.last_focused_at
    }

    pub fn triggers_fired(&self) -> u64 {
        self.triggers_fired
    }

    /// Arm the timer at `now`, replacing any dwell already in progress.
    pub fn start(&mut self, now: f64) {
        self.last_focused_at = Some(now);
        debug!("Dwell started at {:.3}s (threshold {:.3}s)", now, self.dwell_time_s);
    }

    /// Disarm the timer without firing.
    pub fn cancel(&mut self) {
        if let Some(started) = self.last_focused_at.take() {
            debug!("Dwell cancelled (started at {:.3}s)", started);
        }
    }

    /// Whether a timed dwell is running. Click-through mode never counts as dwelling.
    pub fn is_dwelling(&self) -> bool {
        self.last_focused_at.is_some() && self.dwell_time_s > 0.0
    }

    /// Dwell progress at `now`, clamped to `[0, 1]`.
    ///
    /// `None` when no timed dwell is running.
    pub fn progress(&self, now: f64) -> Option<f32> {
        if self.dwell_time_s <= 0.0 {
            return None;
        }
        let started = self.last_focused_at?;
        let fraction = (now - started) / self.dwell_time_s;
        Some(fraction.clamp(0.0, 1.0) as f32)
    }

    /// Returns true once `now - last_focused_at >= dwell_time`, then disarms.
    ///
    /// The same completed dwell never fires twice; a new focus is required.
    pub fn query_trigger(&mut self, now: f64) -> bool {
        let Some(started) = self.last_focused_at else {
            return false;
        };
        let elapsed = now - started;
        if elapsed < self.dwell_time_s {
            return false;
        }
        self.last_focused_at = None;
        self.triggers_fired += 1;
        debug!("Dwell trigger fired after {:.3}s", elapsed);
        true
    }
}
