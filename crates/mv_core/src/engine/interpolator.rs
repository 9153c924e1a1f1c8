//! Temporal interpolation between accepted snapshots
//!
//! Holds no state of its own: the driver supplies the two retained
//! snapshots plus timing, and gets back one blended frame. Given the
//! same inputs the output is bit-identical, which is what makes frozen
//! frames and replayed ticks byte-stable.
//!
//! Discrete events are never blended. A status or possession change must
//! render instantly once detected; only positions animate.

use crate::engine::easing::{ease_out, eased_progress, DEFAULT_EXPONENT};
use crate::engine::frame::{AgentFrame, RenderFrame};
use crate::model::{MatchSnapshot, Position};

/// Inputs for one interpolated frame.
#[derive(Debug, Clone, Copy)]
pub struct InterpolationInput<'a> {
    pub previous: Option<&'a MatchSnapshot>,
    pub current: &'a MatchSnapshot,
    /// Seconds since `current` was accepted.
    pub elapsed: f32,
    /// Configured blend duration.
    pub duration: f32,
    /// Gap between the previous and current acceptance times.
    pub accept_gap: f32,
    /// Gaps beyond `factor x duration` snap to progress 1.
    pub snap_after_factor: f32,
}

/// Raw progress fraction for this frame, before per-role easing.
///
/// Returns 1.0 outright for every condition that must not be animated:
/// no previous snapshot, a discrete-field change, or an acceptance gap
/// long enough to read as a stall rather than motion.
pub fn progress_for(input: &InterpolationInput<'_>) -> f32 {
    let Some(previous) = input.previous else {
        return 1.0;
    };

    if previous.status != input.current.status || previous.possession != input.current.possession {
        return 1.0;
    }

    if input.accept_gap > input.snap_after_factor * input.duration {
        return 1.0;
    }

    if input.duration <= 0.0 {
        return 1.0;
    }

    (input.elapsed / input.duration).clamp(0.0, 1.0)
}

/// Blend one frame between the two retained snapshots.
///
/// Agents are matched by id. An agent absent from `previous` renders at
/// its `current` position immediately; there is no invented origin to
/// animate from. Non-positional fields come verbatim from `current`.
pub fn frame_for(input: &InterpolationInput<'_>) -> RenderFrame {
    let progress = progress_for(input);
    let previous = match input.previous {
        Some(previous) if progress < 1.0 => previous,
        _ => return RenderFrame::from_snapshot(input.current),
    };

    let prev_positions: std::collections::HashMap<&str, Position> =
        previous.agents().map(|(_, a)| (a.id.as_str(), a.pos)).collect();

    let possession = input.current.possession.clone();
    let agents = input
        .current
        .agents()
        .map(|(side, agent)| {
            let pos = match prev_positions.get(agent.id.as_str()) {
                Some(&from) => from.lerp(agent.pos, eased_progress(agent.role, progress)),
                None => agent.pos,
            };
            AgentFrame {
                id: agent.id.clone(),
                side,
                role: agent.role,
                pos: pos.clamp_in_bounds(),
                has_ball: possession.as_deref() == Some(agent.id.as_str()),
            }
        })
        .collect();

    let ball = previous
        .ball
        .pos
        .lerp(input.current.ball.pos, ease_out(progress, DEFAULT_EXPONENT))
        .clamp_in_bounds();

    RenderFrame {
        status: input.current.status,
        home_score: input.current.home.score,
        away_score: input.current.away.score,
        possession,
        clock_seconds: input.current.clock_seconds,
        agents,
        ball,
        ball_override: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Agent, Ball, MatchStatus, Role, TeamSnapshot};

    fn snapshot(status: MatchStatus, agent_x: f32, possession: Option<&str>) -> MatchSnapshot {
        MatchSnapshot {
            status,
            home: TeamSnapshot {
                name: "Home".to_string(),
                score: 0,
                agents: vec![Agent {
                    id: "h1".to_string(),
                    role: Role::Defender,
                    pos: Position::new(agent_x, 0.5),
                }],
            },
            away: TeamSnapshot { name: "Away".to_string(), score: 0, agents: vec![] },
            ball: Ball { pos: Position::new(agent_x, 0.4), velocity: None },
            possession: possession.map(String::from),
            clock_seconds: 60.0,
        }
    }

    fn input<'a>(
        previous: &'a MatchSnapshot,
        current: &'a MatchSnapshot,
        elapsed: f32,
    ) -> InterpolationInput<'a> {
        InterpolationInput {
            previous: Some(previous),
            current,
            elapsed,
            duration: 0.5,
            accept_gap: 0.5,
            snap_after_factor: 3.0,
        }
    }

    #[test]
    fn test_midway_blend_is_between_endpoints() {
        let prev = snapshot(MatchStatus::InProgress, 0.2, None);
        let curr = snapshot(MatchStatus::InProgress, 0.6, None);
        let frame = frame_for(&input(&prev, &curr, 0.25));
        let x = frame.agent("h1").unwrap().pos.x;
        assert!(x > 0.2 && x < 0.6, "blend must be strictly between endpoints: {}", x);
        // Ease-out front-loads motion: past the linear midpoint at half time
        assert!(x > 0.4, "ease-out should be ahead of linear: {}", x);
    }

    #[test]
    fn test_determinism() {
        let prev = snapshot(MatchStatus::InProgress, 0.2, None);
        let curr = snapshot(MatchStatus::InProgress, 0.6, None);
        let a = frame_for(&input(&prev, &curr, 0.21));
        let b = frame_for(&input(&prev, &curr, 0.21));
        assert_eq!(a, b, "same inputs must yield identical frames");
    }

    #[test]
    fn test_elapsed_past_duration_pins_to_current() {
        let prev = snapshot(MatchStatus::InProgress, 0.2, None);
        let curr = snapshot(MatchStatus::InProgress, 0.6, None);
        let frame = frame_for(&input(&prev, &curr, 2.0));
        assert_eq!(frame.agent("h1").unwrap().pos.x, 0.6);
    }

    #[test]
    fn test_status_change_forces_progress_one() {
        let prev = snapshot(MatchStatus::InProgress, 0.2, None);
        let curr = snapshot(MatchStatus::GoalScored, 0.6, None);
        // Immediately after acceptance, elapsed ~ 0
        let frame = frame_for(&input(&prev, &curr, 0.0));
        assert_eq!(frame.status, MatchStatus::GoalScored);
        assert_eq!(frame.agent("h1").unwrap().pos.x, 0.6, "discrete events must not blend");
    }

    #[test]
    fn test_possession_change_forces_progress_one() {
        let prev = snapshot(MatchStatus::InProgress, 0.2, None);
        let curr = snapshot(MatchStatus::InProgress, 0.6, Some("h1"));
        let frame = frame_for(&input(&prev, &curr, 0.0));
        assert_eq!(frame.agent("h1").unwrap().pos.x, 0.6);
        assert!(frame.agent("h1").unwrap().has_ball);
    }

    #[test]
    fn test_long_accept_gap_snaps() {
        let prev = snapshot(MatchStatus::InProgress, 0.2, None);
        let curr = snapshot(MatchStatus::InProgress, 0.6, None);
        let mut inp = input(&prev, &curr, 0.1);
        inp.accept_gap = 5.0; // way past snap_after_factor * duration
        let frame = frame_for(&inp);
        assert_eq!(frame.agent("h1").unwrap().pos.x, 0.6, "stall gap must not glide");
    }

    #[test]
    fn test_no_previous_renders_current() {
        let curr = snapshot(MatchStatus::InProgress, 0.6, None);
        let inp = InterpolationInput {
            previous: None,
            current: &curr,
            elapsed: 0.0,
            duration: 0.5,
            accept_gap: 0.0,
            snap_after_factor: 3.0,
        };
        let frame = frame_for(&inp);
        assert_eq!(frame.agent("h1").unwrap().pos.x, 0.6);
    }

    #[test]
    fn test_agent_new_in_current_does_not_animate() {
        let prev = snapshot(MatchStatus::InProgress, 0.2, None);
        let mut curr = snapshot(MatchStatus::InProgress, 0.2, None);
        curr.home.agents.push(Agent {
            id: "h2".to_string(),
            role: Role::Forward,
            pos: Position::new(0.8, 0.3),
        });
        let frame = frame_for(&input(&prev, &curr, 0.1));
        assert_eq!(frame.agent("h2").unwrap().pos, Position::new(0.8, 0.3));
    }

    #[test]
    fn test_non_positional_fields_come_from_current() {
        let mut prev = snapshot(MatchStatus::InProgress, 0.2, None);
        prev.clock_seconds = 50.0;
        let mut curr = snapshot(MatchStatus::InProgress, 0.6, None);
        curr.clock_seconds = 55.0;
        curr.home.score = 2;
        let frame = frame_for(&input(&prev, &curr, 0.1));
        assert_eq!(frame.clock_seconds, 55.0);
        assert_eq!(frame.home_score, 2);
    }
}
