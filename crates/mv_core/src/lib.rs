//! # mv_core - Client-Side Match Visualization Engine
//!
//! This library turns sparse, irregularly-timed match snapshots pushed by
//! a remote simulator into smooth per-frame motion for a renderer.
//!
//! ## Features
//! - Snapshot gate: content-signature dedup + scripted-mode suppression
//! - Temporal interpolation with per-role ease-out curves
//! - Choreographed kickoff, goal celebration and pass-arc modes
//! - Possession-aware spacing enforcement within field bounds
//! - Watchdog freeze when the feed stalls
//!
//! The engine is a passive consumer: it never overrides the simulator's
//! decisions, only smooths and re-times their visual presentation.
//!
//! ```no_run
//! use mv_core::MatchViewEngine;
//!
//! let mut engine = MatchViewEngine::default();
//! // push callback:
//! //   engine.accept_json(payload, now)?;
//! // display-refresh callback:
//! //   if let Some(frame) = engine.tick(now) { renderer.draw(&frame); }
//! ```

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;

// Re-export the host-facing API surface
pub use api::{parse_target_hint, GateAck, SCHEMA_VERSION};
pub use config::{EngineConfig, InterpolationConfig, ModeConfig, SpacingConfig};
pub use engine::{
    AgentFrame, AnimationMode, FrameStats, GateDecision, MatchViewEngine, RenderFrame,
};
pub use error::{EngineError, Result};
pub use model::{Agent, Ball, MatchSnapshot, MatchStatus, Position, Role, TeamSide, TeamSnapshot};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn team_json(prefix: &str, score: u32, x_base: f64) -> serde_json::Value {
        let roles = ["GK", "DF", "DF", "MF", "MF", "FW"];
        let players: Vec<serde_json::Value> = roles
            .iter()
            .enumerate()
            .map(|(i, role)| {
                json!({
                    "id": format!("{}{}", prefix, i),
                    "role": role,
                    "x": x_base + 0.05 * i as f64,
                    "y": 0.3 + 0.08 * i as f64,
                })
            })
            .collect();
        json!({ "name": format!("{} FC", prefix), "score": score, "players": players })
    }

    fn payload(
        status: &str,
        home_score: u32,
        away_score: u32,
        ball: (f64, f64),
        possession: Option<&str>,
    ) -> String {
        json!({
            "schema_version": 1,
            "status": status,
            "home_team": team_json("h", home_score, 0.1),
            "away_team": team_json("a", away_score, 0.6),
            "ball": {"x": ball.0, "y": ball.1},
            "possession": possession,
            "clock": 0.0
        })
        .to_string()
    }

    #[test]
    fn test_full_match_flow() {
        let mut engine = MatchViewEngine::default();

        // Pre-match snapshot
        let ack = engine
            .accept_json(&payload("not_started", 0, 0, (0.5, 0.5), None), 0.0)
            .unwrap();
        assert!(ack.decision.is_accepted());
        let frame = engine.tick(0.05).unwrap();
        assert_eq!(frame.status, MatchStatus::NotStarted);

        // Kickoff: play begins
        engine.accept_json(&payload("in_progress", 0, 0, (0.5, 0.5), None), 1.0).unwrap();
        assert!(matches!(engine.mode(), AnimationMode::Kickoff { .. }));

        // Simulator keeps pushing during the re-formation; the gate holds
        let ack = engine
            .accept_json(&payload("in_progress", 0, 0, (0.3, 0.4), None), 2.0)
            .unwrap();
        assert_eq!(ack.decision, GateDecision::SuppressedByMode);

        for step in 1..=60 {
            let frame = engine.tick(1.0 + step as f64 / 30.0).unwrap();
            assert_eq!(frame.status, MatchStatus::InProgress);
        }

        // Kickoff window over: ingestion resumes
        engine.tick(4.2);
        assert!(!engine.mode().is_scripted());
        let ack = engine
            .accept_json(&payload("in_progress", 0, 0, (0.35, 0.45), Some("h5")), 5.0)
            .unwrap();
        assert!(ack.decision.is_accepted());
        engine.tick(5.1);

        // Home scores
        engine
            .accept_json(&payload("goal_scored", 1, 0, (0.95, 0.5), Some("h5")), 6.0)
            .unwrap();
        assert!(matches!(engine.mode(), AnimationMode::GoalCelebration { .. }));
        let frame = engine.tick(6.1).unwrap();
        assert_eq!(frame.status, MatchStatus::GoalScored);
        assert_eq!(frame.home_score, 1);
        assert!(frame.ball_override.is_some(), "celebration bounces the rendered ball");

        // Celebration self-terminates on wall clock
        engine.tick(6.0 + f64::from(engine.config().modes.celebration_duration) + 0.1);
        assert!(!engine.mode().is_scripted());

        // Restart: the conceding side kicks off
        engine.accept_json(&payload("in_progress", 1, 0, (0.5, 0.5), None), 11.0).unwrap();
        match engine.mode() {
            AnimationMode::Kickoff { restart_side, .. } => {
                assert_eq!(*restart_side, TeamSide::Away);
            }
            other => panic!("expected kickoff, got {}", other.name()),
        }

        let stats = engine.stats();
        assert_eq!(stats.kickoffs_started, 2);
        assert_eq!(stats.celebrations_started, 1);
        assert_eq!(stats.suppressed_rejected, 1);
    }

    #[test]
    fn test_identical_feeds_render_identically() {
        let mut left = MatchViewEngine::default();
        let mut right = MatchViewEngine::default();

        let feed = [
            (0.0, payload("in_progress", 0, 0, (0.5, 0.5), None)),
            (0.7, payload("in_progress", 0, 0, (0.55, 0.48), Some("h3"))),
            (1.3, payload("in_progress", 0, 0, (0.62, 0.44), Some("h3"))),
        ];
        let ticks = [0.1, 0.4, 0.75, 0.9, 1.35, 1.6, 2.0];

        let mut feed_iter = feed.iter().peekable();
        for &now in &ticks {
            while let Some((at, body)) = feed_iter.peek() {
                if *at > now {
                    break;
                }
                left.accept_json(body, *at).unwrap();
                right.accept_json(body, *at).unwrap();
                feed_iter.next();
            }
            let a = left.tick(now);
            let b = right.tick(now);
            assert_eq!(a, b, "identical inputs must render identical frames at t={}", now);
        }
    }

    #[test]
    fn test_noisy_feed_never_escapes_bounds() {
        let mut engine = MatchViewEngine::default();

        // Hostile coordinates straight from a buggy simulator build
        let wild = json!({
            "status": "in_progress",
            "home_team": {"name": "H", "score": 0, "players": [
                {"id": "h0", "role": "GK", "x": -4.0, "y": 0.5},
                {"id": "h1", "role": "FW", "x": 7.5, "y": -2.0}
            ]},
            "away_team": {"name": "A", "score": 0, "players": [
                {"id": "a0", "role": "GK", "x": 0.5, "y": 99.0}
            ]},
            "ball": {"x": -1.0, "y": 3.0}
        })
        .to_string();
        engine.accept_json(&wild, 0.0).unwrap();

        for step in 1..=30 {
            let frame = engine.tick(step as f64 / 60.0).unwrap();
            for agent in &frame.agents {
                assert!(agent.pos.is_in_bounds(), "agent out of bounds: {:?}", agent);
            }
            assert!(frame.ball.is_in_bounds());
            if let Some(over) = frame.ball_override {
                assert!(over.is_in_bounds());
            }
        }
    }

    #[test]
    fn test_duplicate_payloads_do_not_restart_interpolation() {
        let mut engine = MatchViewEngine::default();
        engine.accept_json(&payload("in_progress", 0, 0, (0.4, 0.5), None), 0.0).unwrap();
        engine.tick(0.1);
        engine.accept_json(&payload("in_progress", 0, 0, (0.6, 0.5), None), 1.0).unwrap();

        // Mid-blend the ball sits strictly between the endpoints
        let mid = engine.tick(1.2).unwrap().ball.x;
        assert!(mid > 0.4 && mid < 0.6);

        // A re-sent identical payload must not reset progress backwards
        let ack = engine.accept_json(&payload("in_progress", 0, 0, (0.6, 0.5), None), 1.25).unwrap();
        assert_eq!(ack.decision, GateDecision::DuplicateContent);
        let after = engine.tick(1.3).unwrap().ball.x;
        assert!(after >= mid, "duplicate must not rewind the blend: {} -> {}", mid, after);
    }

    #[test]
    fn test_version_is_exported() {
        assert!(!VERSION.is_empty());
    }
}
