//! Inbound snapshot JSON boundary
//!
//! The push channel delivers snapshots with inconsistent field casing
//! (camelCase from one simulator build, snake_case from another). All of
//! that is normalized here, once, into the canonical [`MatchSnapshot`];
//! no internal component ever branches on alternate spellings.
//!
//! Defensive rules:
//! - an agent without a position keeps its last accepted position (by id)
//! - an agent never seen before with no position starts at field center
//! - coordinates are clamped into bounds at the door
//! - an empty possession string means "ball is loose"

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::GateDecision;
use crate::error::{EngineError, Result};
use crate::model::{Agent, Ball, MatchSnapshot, MatchStatus, Position, Role, TeamSnapshot};

/// Wire schema version this boundary understands.
pub const SCHEMA_VERSION: u32 = 1;

/// Acknowledgment returned to the push channel for every parsed payload.
#[derive(Debug, Clone, Serialize)]
pub struct GateAck {
    pub decision: GateDecision,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct RawMatchSnapshot {
    #[serde(default, alias = "schemaVersion")]
    pub schema_version: Option<u32>,
    #[serde(alias = "gameStatus", alias = "game_status", alias = "state")]
    pub status: String,
    #[serde(alias = "homeTeam", alias = "home_team")]
    pub home: RawTeam,
    #[serde(alias = "awayTeam", alias = "away_team")]
    pub away: RawTeam,
    #[serde(default, alias = "ballPosition", alias = "ball_position")]
    pub ball: Option<RawBall>,
    #[serde(
        default,
        alias = "possessionId",
        alias = "possession_id",
        alias = "ballOwner",
        alias = "ball_owner"
    )]
    pub possession: Option<String>,
    #[serde(default, alias = "gameClock", alias = "game_clock", alias = "clock")]
    pub clock_seconds: f32,
}

#[derive(Debug, Deserialize)]
pub struct RawTeam {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub score: u32,
    #[serde(default, alias = "players")]
    pub agents: Vec<RawAgent>,
}

#[derive(Debug, Deserialize)]
pub struct RawAgent {
    #[serde(alias = "playerId", alias = "player_id")]
    pub id: String,
    #[serde(default, alias = "position")]
    pub role: Option<Role>,
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub struct RawBall {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default, alias = "velocityX", alias = "velocity_x")]
    pub vx: Option<f32>,
    #[serde(default, alias = "velocityY", alias = "velocity_y")]
    pub vy: Option<f32>,
}

/// Tolerant status parsing: case- and separator-insensitive.
fn parse_status(raw: &str) -> Result<MatchStatus> {
    let folded: String =
        raw.chars().filter(|c| *c != '_' && *c != '-' && *c != ' ').collect::<String>().to_lowercase();
    match folded.as_str() {
        "notstarted" => Ok(MatchStatus::NotStarted),
        "inprogress" | "playing" => Ok(MatchStatus::InProgress),
        "paused" => Ok(MatchStatus::Paused),
        "ended" | "finished" => Ok(MatchStatus::Ended),
        "goalscored" | "goal" => Ok(MatchStatus::GoalScored),
        _ => Err(EngineError::UnknownStatus(raw.to_string())),
    }
}

impl RawMatchSnapshot {
    /// Parse a payload string into the raw wire shape.
    pub fn parse(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Normalize into the canonical snapshot. `fallback` is the last
    /// accepted snapshot, consulted for agents that arrive without a
    /// position.
    pub fn into_canonical(self, fallback: Option<&MatchSnapshot>) -> Result<MatchSnapshot> {
        if let Some(found) = self.schema_version {
            if found != SCHEMA_VERSION {
                return Err(EngineError::SchemaVersion { found, expected: SCHEMA_VERSION });
            }
        }

        let status = parse_status(&self.status)?;

        let ball = match self.ball {
            Some(raw) => Ball {
                pos: Position::new(raw.x, raw.y).clamp_in_bounds(),
                velocity: match (raw.vx, raw.vy) {
                    (Some(vx), Some(vy)) => Some((vx, vy)),
                    _ => None,
                },
            },
            None => match fallback {
                Some(prev) => prev.ball,
                None => Ball { pos: Position::CENTER, velocity: None },
            },
        };

        // Empty possession string means the ball is loose
        let possession = self.possession.filter(|id| !id.is_empty());

        Ok(MatchSnapshot {
            status,
            home: convert_team(self.home, fallback),
            away: convert_team(self.away, fallback),
            ball,
            possession,
            clock_seconds: self.clock_seconds,
        })
    }
}

fn convert_team(raw: RawTeam, fallback: Option<&MatchSnapshot>) -> TeamSnapshot {
    let agents = raw
        .agents
        .into_iter()
        .map(|agent| {
            let pos = match (agent.x, agent.y) {
                (Some(x), Some(y)) => Position::new(x, y).clamp_in_bounds(),
                _ => {
                    // Partial payload: hold the last known position
                    let last = fallback
                        .and_then(|prev| prev.find_agent(&agent.id))
                        .map(|(_, a)| a.pos);
                    if last.is_none() {
                        warn!(id = %agent.id, "agent arrived without a position");
                    }
                    last.unwrap_or(Position::CENTER)
                }
            };
            Agent { id: agent.id, role: agent.role.unwrap_or(Role::Midfielder), pos }
        })
        .collect();

    TeamSnapshot { name: raw.name, score: raw.score, agents }
}
