//! Engine facade and per-tick frame driver
//!
//! [`MatchViewEngine`] owns all reconciliation state behind two entry
//! points: `accept` for the asynchronous snapshot push and `tick` for the
//! host's display-refresh callback. Both take `&mut self`, so the
//! accept/tick exclusion the pipeline depends on is a compile-time
//! guarantee; a host with genuinely concurrent callbacks wraps the engine
//! in its own lock and the swap stays atomic either way.
//!
//! Per-tick pipeline: mode controller → temporal interpolator → spacing
//! enforcer → frame out. Neither stage performs blocking I/O.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::engine::frame::{FrameStats, RenderFrame};
use crate::engine::gate::{GateDecision, SnapshotGate};
use crate::engine::interpolator::{frame_for, InterpolationInput};
use crate::engine::modes::{AnimationMode, ModeController, ModeEvent};
use crate::engine::spacing;
use crate::model::MatchSnapshot;

/// Client-side reconciliation engine: turns the sparse snapshot stream
/// into one resolved frame per display tick.
#[derive(Debug)]
pub struct MatchViewEngine {
    config: EngineConfig,
    gate: SnapshotGate,
    modes: ModeController,

    /// Last two accepted snapshots. Never the same allocation once two
    /// distinct snapshots have been accepted.
    previous: Option<Arc<MatchSnapshot>>,
    current: Option<Arc<MatchSnapshot>>,

    /// Engine-time of the latest acceptance, and the gap to the one
    /// before it (drives the discontinuity snap).
    accepted_at: f64,
    accept_gap: f32,

    last_tick_at: Option<f64>,
    last_frame: Option<RenderFrame>,
    stats: FrameStats,
}

impl Default for MatchViewEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl MatchViewEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            gate: SnapshotGate::new(),
            modes: ModeController::new(),
            previous: None,
            current: None,
            accepted_at: 0.0,
            accept_gap: 0.0,
            last_tick_at: None,
            last_frame: None,
            stats: FrameStats::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn mode(&self) -> &AnimationMode {
        self.modes.mode()
    }

    /// Latest accepted snapshot, if any.
    pub fn current_snapshot(&self) -> Option<&MatchSnapshot> {
        self.current.as_deref()
    }

    /// Offer a snapshot to the gate. `now` is the host's monotonic clock
    /// in seconds; it must be the same timeline passed to `tick`.
    pub fn accept(&mut self, snapshot: MatchSnapshot, now: f64) -> GateDecision {
        let suppressed = self.modes.suppresses_ingestion(now);
        let decision = self.gate.admit(&snapshot, suppressed);
        match decision {
            GateDecision::DuplicateContent => {
                self.stats.duplicates_rejected += 1;
                return decision;
            }
            GateDecision::SuppressedByMode => {
                self.stats.suppressed_rejected += 1;
                return decision;
            }
            GateDecision::Accepted => {}
        }

        let snapshot = Arc::new(snapshot);
        let event = self.modes.on_accept(
            self.current.as_deref(),
            &snapshot,
            self.last_frame.as_ref(),
            now,
            &self.config.modes,
        );
        self.count_mode_event(event);

        // Shift current -> previous; the new snapshot becomes current
        self.accept_gap = if self.current.is_some() {
            (now - self.accepted_at) as f32
        } else {
            0.0
        };
        self.previous = self.current.take();
        self.current = Some(snapshot);
        self.accepted_at = now;
        self.stats.snapshots_accepted += 1;

        debug!(gap = self.accept_gap, "snapshot accepted");
        decision
    }

    /// Compute the frame for one display tick. Returns `None` until the
    /// first snapshot has been accepted (nothing to render yet).
    pub fn tick(&mut self, now: f64) -> Option<RenderFrame> {
        let current = Arc::clone(self.current.as_ref()?);

        let dt = self
            .last_tick_at
            .map(|prev| ((now - prev).max(0.0) as f32).min(0.1))
            .unwrap_or(0.0);
        self.last_tick_at = Some(now);

        if let Some(event) = self.modes.advance(now, &self.config.modes) {
            if event == ModeEvent::KickoffEnded {
                // Re-formation is done: pin to the latest authoritative
                // state, never blend back toward pre-kickoff positions
                self.previous = None;
                self.accepted_at = now;
                self.accept_gap = 0.0;
            }
        }

        let mut frame = if self.modes.mode().is_blocking() {
            let base = match &self.last_frame {
                Some(frame) => frame.clone(),
                None => RenderFrame::from_snapshot(&current),
            };
            self.modes.scripted_frame(&current, &base, now, dt, &self.config.modes)
        } else {
            let elapsed = (now - self.accepted_at) as f32;

            // Watchdog: with the feed stalled and no choreography running,
            // freeze on the last known-good frame instead of animating
            // toward a stale target
            if elapsed > self.config.interpolation.watchdog_timeout
                && !self.modes.mode().is_scripted()
            {
                if let Some(frozen) = &self.last_frame {
                    self.stats.frames_frozen += 1;
                    return Some(frozen.clone());
                }
            }

            let mut frame = frame_for(&InterpolationInput {
                previous: self.previous.as_deref(),
                current: &current,
                elapsed,
                duration: self.config.interpolation.base_duration,
                accept_gap: self.accept_gap,
                snap_after_factor: self.config.interpolation.snap_after_factor,
            });
            frame.ball_override = self.modes.pass_ball_override(now, &self.config.modes);
            frame
        };

        if !self.modes.mode().is_blocking() {
            spacing::relax(&mut frame, &self.config.spacing);
        }

        self.stats.frames_rendered += 1;
        self.last_frame = Some(frame.clone());
        Some(frame)
    }

    fn count_mode_event(&mut self, event: Option<ModeEvent>) {
        match event {
            Some(ModeEvent::KickoffStarted) => self.stats.kickoffs_started += 1,
            Some(ModeEvent::CelebrationStarted) => self.stats.celebrations_started += 1,
            Some(ModeEvent::PassStarted) => self.stats.passes_started += 1,
            Some(ModeEvent::KickoffEnded | ModeEvent::CelebrationEnded | ModeEvent::PassEnded) => {
                warn!("mode exit reported through accept path");
            }
            None => {}
        }
    }
}
