//! Rendered frame output
//!
//! A [`RenderFrame`] is one fully resolved output of the engine for a
//! single display tick: blended or scripted positions plus the
//! non-positional fields carried verbatim from the newest accepted
//! snapshot. Frames are ephemeral values; the renderer is a pure
//! consumer.

use serde::Serialize;

use crate::model::{MatchSnapshot, MatchStatus, Position, Role, TeamSide};

/// One agent as rendered this tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentFrame {
    pub id: String,
    pub side: TeamSide,
    pub role: Role,
    pub pos: Position,
    /// Derived by comparing `id` to the snapshot possession field.
    pub has_ball: bool,
}

/// One rendered output of the engine, computed for a single display tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub status: MatchStatus,
    pub home_score: u32,
    pub away_score: u32,
    pub possession: Option<String>,
    pub clock_seconds: f32,
    pub agents: Vec<AgentFrame>,
    pub ball: Position,
    /// Set while the ball is mid-scripted-trajectory (pass arc,
    /// celebration bounce). The stored ball position is untouched; the
    /// renderer draws the override when present.
    pub ball_override: Option<Position>,
}

impl RenderFrame {
    /// Frame pinned to a snapshot's authoritative positions (progress 1).
    pub fn from_snapshot(snapshot: &MatchSnapshot) -> Self {
        let possession = snapshot.possession.clone();
        let agents = snapshot
            .agents()
            .map(|(side, agent)| AgentFrame {
                id: agent.id.clone(),
                side,
                role: agent.role,
                pos: agent.pos.clamp_in_bounds(),
                has_ball: possession.as_deref() == Some(agent.id.as_str()),
            })
            .collect();

        Self {
            status: snapshot.status,
            home_score: snapshot.home.score,
            away_score: snapshot.away.score,
            possession,
            clock_seconds: snapshot.clock_seconds,
            agents,
            ball: snapshot.ball.pos.clamp_in_bounds(),
            ball_override: None,
        }
    }

    pub fn agent(&self, id: &str) -> Option<&AgentFrame> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn agents_of(&self, side: TeamSide) -> impl Iterator<Item = &AgentFrame> {
        self.agents.iter().filter(move |a| a.side == side)
    }

    /// Ball position the renderer should draw this tick.
    pub fn rendered_ball(&self) -> Position {
        self.ball_override.unwrap_or(self.ball)
    }
}

/// Running counters for host diagnostics.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct FrameStats {
    pub snapshots_accepted: u64,
    pub duplicates_rejected: u64,
    pub suppressed_rejected: u64,
    pub frames_rendered: u64,
    pub frames_frozen: u64,
    pub kickoffs_started: u64,
    pub celebrations_started: u64,
    pub passes_started: u64,
}
