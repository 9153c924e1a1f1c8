//! Animation mode state machine
//!
//! A single tagged-union mode replaces normal interpolation with scripted
//! choreography while active. Exactly one mode exists at a time, so
//! invalid combinations (celebrating during a kickoff walk-on) are
//! unrepresentable. Kickoff and GoalCelebration replace the whole frame
//! and block spacing; Pass only overrides the rendered ball.

use std::collections::HashMap;

use tracing::info;

use crate::config::ModeConfig;
use crate::engine::easing::{ease_out, DEFAULT_EXPONENT};
use crate::engine::formation;
use crate::engine::frame::RenderFrame;
use crate::engine::steering;
use crate::model::{MatchSnapshot, MatchStatus, Position, TeamSide};

/// Current animation mode. Kickoff and GoalCelebration take precedence
/// over Pass and over normal interpolation.
#[derive(Debug, Clone)]
pub enum AnimationMode {
    Normal,
    Kickoff {
        entered_at: f64,
        restart_side: TeamSide,
        targets: HashMap<String, Position>,
    },
    GoalCelebration {
        entered_at: f64,
        scoring_side: Option<TeamSide>,
        base: HashMap<String, Position>,
        ball_base: Position,
    },
    Pass {
        started_at: f64,
        from: Position,
        to: Position,
    },
}

impl AnimationMode {
    /// Scripted modes generate positions instead of delegating to the
    /// interpolator (Pass excepted: it only overrides the ball).
    pub fn is_scripted(&self) -> bool {
        !matches!(self, AnimationMode::Normal)
    }

    /// Blocking modes own the whole frame: interpolation and spacing are
    /// both bypassed while one is active.
    pub fn is_blocking(&self) -> bool {
        matches!(self, AnimationMode::Kickoff { .. } | AnimationMode::GoalCelebration { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            AnimationMode::Normal => "normal",
            AnimationMode::Kickoff { .. } => "kickoff",
            AnimationMode::GoalCelebration { .. } => "goal_celebration",
            AnimationMode::Pass { .. } => "pass",
        }
    }
}

/// Transition notifications surfaced to the driver for stats and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeEvent {
    KickoffStarted,
    CelebrationStarted,
    PassStarted,
    KickoffEnded,
    CelebrationEnded,
    PassEnded,
}

/// Mode state machine layered above the interpolator.
#[derive(Debug)]
pub struct ModeController {
    mode: AnimationMode,
    /// Gate ingestion is vetoed until this engine timestamp.
    suppress_until: Option<f64>,
    /// Attribution retained after celebration expiry so the next kickoff
    /// knows which side conceded.
    last_scoring_side: Option<TeamSide>,
    /// Last side that restarted play; used to alternate when attribution
    /// is unknown.
    last_restart_side: Option<TeamSide>,
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeController {
    pub fn new() -> Self {
        Self {
            mode: AnimationMode::Normal,
            suppress_until: None,
            last_scoring_side: None,
            last_restart_side: None,
        }
    }

    pub fn mode(&self) -> &AnimationMode {
        &self.mode
    }

    /// Whether the gate must reject ingestion right now. The window
    /// covers the kickoff duration plus the configured grace period.
    pub fn suppresses_ingestion(&self, now: f64) -> bool {
        self.suppress_until.is_some_and(|until| now < until)
    }

    /// Evaluate status-transition rules for a freshly accepted snapshot.
    pub fn on_accept(
        &mut self,
        previous: Option<&MatchSnapshot>,
        current: &MatchSnapshot,
        last_frame: Option<&RenderFrame>,
        now: f64,
        config: &ModeConfig,
    ) -> Option<ModeEvent> {
        // Goal: celebrate unless already celebrating
        if current.status == MatchStatus::GoalScored
            && !matches!(self.mode, AnimationMode::GoalCelebration { .. })
        {
            let scoring_side = previous.and_then(|prev| scoring_side(prev, current));
            if scoring_side.is_some() {
                self.last_scoring_side = scoring_side;
            }

            let (base, ball_base) = match last_frame {
                Some(frame) => (
                    frame.agents.iter().map(|a| (a.id.clone(), a.pos)).collect(),
                    frame.ball,
                ),
                None => (
                    current.agents().map(|(_, a)| (a.id.clone(), a.pos)).collect(),
                    current.ball.pos,
                ),
            };

            info!(side = ?scoring_side, "entering goal celebration");
            self.mode =
                AnimationMode::GoalCelebration { entered_at: now, scoring_side, base, ball_base };
            return Some(ModeEvent::CelebrationStarted);
        }

        // Kickoff: play restarts after match start or a goal
        if current.status == MatchStatus::InProgress
            && previous.is_some_and(|prev| prev.status.precedes_kickoff())
            && !matches!(self.mode, AnimationMode::Kickoff { .. })
        {
            let restart_side = self.resolve_restart_side(previous, current);
            self.last_restart_side = Some(restart_side);
            self.suppress_until = Some(now + config.kickoff_duration as f64 + config.kickoff_grace as f64);

            info!(side = ?restart_side, "entering kickoff re-formation");
            self.mode = AnimationMode::Kickoff {
                entered_at: now,
                restart_side,
                targets: formation::kickoff_targets(current, Some(restart_side)),
            };
            return Some(ModeEvent::KickoffStarted);
        }

        // Pass: possession lost or transferred with real ball travel
        if matches!(self.mode, AnimationMode::Normal) && current.status.is_live() {
            if let Some(prev) = previous {
                if let Some(event) = self.try_enter_pass(prev, current, now, config) {
                    return Some(event);
                }
            }
        }

        None
    }

    fn try_enter_pass(
        &mut self,
        previous: &MatchSnapshot,
        current: &MatchSnapshot,
        now: f64,
        config: &ModeConfig,
    ) -> Option<ModeEvent> {
        let prev_possessor = previous.possession.as_deref()?;
        let transferred = match current.possession.as_deref() {
            None => true,
            Some(id) => id != prev_possessor,
        };
        if !transferred {
            return None;
        }

        // The arc starts where the passer stood; without a roster match
        // there is nothing sensible to animate from.
        let (_, passer) = previous.find_agent(prev_possessor)?;
        let from = passer.pos;
        let to = current.ball.pos;
        if from.distance(to) <= config.pass_min_displacement {
            return None;
        }

        info!(from_id = prev_possessor, "entering pass arc");
        self.mode = AnimationMode::Pass { started_at: now, from, to };
        Some(ModeEvent::PassStarted)
    }

    fn resolve_restart_side(
        &self,
        previous: Option<&MatchSnapshot>,
        current: &MatchSnapshot,
    ) -> TeamSide {
        match previous.map(|p| p.status) {
            // After a goal the conceding side restarts. Without
            // attribution, alternate from the last known restart.
            Some(MatchStatus::GoalScored) => match self.last_scoring_side {
                Some(side) => side.opponent(),
                None => self
                    .last_restart_side
                    .map(TeamSide::opponent)
                    .unwrap_or(TeamSide::Home),
            },
            // Match start: the simulator's opening possession decides;
            // home kicks off when it reports none.
            _ => current.possessing_side().unwrap_or(TeamSide::Home),
        }
    }

    /// Apply duration-based expiry. Returns the exit event so the driver
    /// can rebaseline interpolation after a kickoff.
    pub fn advance(&mut self, now: f64, config: &ModeConfig) -> Option<ModeEvent> {
        let (expired, event) = match &self.mode {
            AnimationMode::Kickoff { entered_at, .. } => (
                now - entered_at >= config.kickoff_duration as f64,
                ModeEvent::KickoffEnded,
            ),
            AnimationMode::GoalCelebration { entered_at, .. } => (
                now - entered_at >= config.celebration_duration as f64,
                ModeEvent::CelebrationEnded,
            ),
            AnimationMode::Pass { started_at, .. } => {
                (now - started_at >= config.pass_duration as f64, ModeEvent::PassEnded)
            }
            AnimationMode::Normal => (false, ModeEvent::PassEnded),
        };

        if !expired {
            return None;
        }

        info!(mode = self.mode.name(), "scripted mode complete");
        self.mode = AnimationMode::Normal;
        Some(event)
    }

    /// Produce the frame for a blocking scripted mode. `base` is the last
    /// emitted frame: scripted motion continues from what is already on
    /// screen, never from stale snapshot positions.
    pub fn scripted_frame(
        &self,
        current: &MatchSnapshot,
        base: &RenderFrame,
        now: f64,
        dt: f32,
        config: &ModeConfig,
    ) -> RenderFrame {
        let mut frame = base.clone();

        // Non-positional fields always track the newest snapshot
        frame.status = current.status;
        frame.home_score = current.home.score;
        frame.away_score = current.away.score;
        frame.possession = current.possession.clone();
        frame.clock_seconds = current.clock_seconds;
        frame.ball_override = None;

        match &self.mode {
            AnimationMode::Kickoff { targets, .. } => {
                for agent in &mut frame.agents {
                    // Missing slot (roster drift): skip the scripted delta
                    // for this agent rather than aborting the frame
                    if let Some(&target) = targets.get(&agent.id) {
                        agent.pos = steering::arrive_step(
                            agent.pos,
                            target,
                            config.kickoff_max_speed,
                            config.kickoff_slowing_distance,
                            dt,
                        );
                    }
                }
                frame.ball = steering::arrive_step(
                    frame.ball,
                    Position::CENTER,
                    config.kickoff_max_speed,
                    config.kickoff_slowing_distance,
                    dt,
                );
            }
            AnimationMode::GoalCelebration { entered_at, scoring_side, base: anchors, ball_base } => {
                let t = (now - entered_at) as f32;
                let omega = std::f32::consts::TAU * config.celebration_frequency;
                for (index, agent) in frame.agents.iter_mut().enumerate() {
                    let Some(&anchor) = anchors.get(&agent.id) else {
                        continue;
                    };
                    let amplitude = if Some(agent.side) == *scoring_side {
                        config.celebration_amplitude * config.celebration_scorer_boost
                    } else {
                        config.celebration_amplitude
                    };
                    // Deterministic per-agent phase keeps the crowd from
                    // oscillating in unison
                    let phase = index as f32 * 1.3;
                    agent.pos = anchor.offset_clamped(
                        (omega * t + phase).sin() * amplitude,
                        (omega * t + phase).cos() * amplitude * 0.6,
                    );
                }
                frame.ball = *ball_base;
                let bounce =
                    (std::f32::consts::PI * config.celebration_frequency * t).sin().abs()
                        * config.celebration_ball_bounce;
                frame.ball_override = Some(ball_base.offset_clamped(0.0, -bounce));
            }
            AnimationMode::Normal | AnimationMode::Pass { .. } => {}
        }

        frame
    }

    /// Rendered ball position while a pass arc is in flight.
    pub fn pass_ball_override(&self, now: f64, config: &ModeConfig) -> Option<Position> {
        let AnimationMode::Pass { started_at, from, to } = &self.mode else {
            return None;
        };
        let t = if config.pass_duration > 0.0 {
            (((now - started_at) as f32) / config.pass_duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let along = from.lerp(*to, ease_out(t, DEFAULT_EXPONENT));
        let arc = (std::f32::consts::PI * t).sin() * config.pass_arc_height;
        Some(along.offset_clamped(0.0, -arc))
    }
}

/// Which side scored, judged by comparing consecutive scores. Both-change
/// or no-change transitions yield no attribution.
fn scoring_side(previous: &MatchSnapshot, current: &MatchSnapshot) -> Option<TeamSide> {
    let home_up = current.home.score > previous.home.score;
    let away_up = current.away.score > previous.away.score;
    match (home_up, away_up) {
        (true, false) => Some(TeamSide::Home),
        (false, true) => Some(TeamSide::Away),
        _ => None,
    }
}
