//! Canonical snapshot shapes
//!
//! A [`MatchSnapshot`] is the authoritative, immutable description of
//! match state at one instant, produced by the external simulator. The
//! engine never constructs or mutates one after ingestion; it only reads
//! the last two accepted values.

use serde::{Deserialize, Serialize};

use super::position::Position;

/// Match status as reported by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    NotStarted,
    InProgress,
    Paused,
    Ended,
    GoalScored,
}

impl MatchStatus {
    /// Is the ball in open play?
    pub fn is_live(self) -> bool {
        matches!(self, MatchStatus::InProgress)
    }

    /// Statuses that restart play with a kickoff when they flip to
    /// `InProgress` on the next accepted snapshot.
    pub fn precedes_kickoff(self) -> bool {
        matches!(self, MatchStatus::NotStarted | MatchStatus::GoalScored)
    }

    /// Stable code used in content signatures. Discriminant order must
    /// not leak into the hash, so the mapping is explicit.
    pub fn wire_code(self) -> u8 {
        match self {
            MatchStatus::NotStarted => 0,
            MatchStatus::InProgress => 1,
            MatchStatus::Paused => 2,
            MatchStatus::Ended => 3,
            MatchStatus::GoalScored => 4,
        }
    }
}

/// Team identifier within a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn opponent(self) -> Self {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }

    pub fn is_home(self) -> bool {
        matches!(self, TeamSide::Home)
    }
}

/// Broad positional role. Selects the agent's easing class and its
/// kickoff formation line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[serde(alias = "GK", alias = "gk")]
    Goalkeeper,
    #[serde(alias = "DF", alias = "df")]
    Defender,
    #[serde(alias = "MF", alias = "mf")]
    Midfielder,
    #[serde(alias = "FW", alias = "fw")]
    Forward,
}

/// One player. Identity is stable across snapshots: agents are matched
/// by `id`, never by array index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub role: Role,
    pub pos: Position,
}

/// Ball state. Velocity is informational only; the engine interpolates
/// position and never integrates physics from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Position,
    pub velocity: Option<(f32, f32)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSnapshot {
    pub name: String,
    pub score: u32,
    pub agents: Vec<Agent>,
}

/// Authoritative match state at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub status: MatchStatus,
    pub home: TeamSnapshot,
    pub away: TeamSnapshot,
    pub ball: Ball,
    /// Id of the agent controlling the ball; `None` means the ball is loose.
    pub possession: Option<String>,
    pub clock_seconds: f32,
}

impl MatchSnapshot {
    pub fn team(&self, side: TeamSide) -> &TeamSnapshot {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    /// All agents with their side, home roster first.
    pub fn agents(&self) -> impl Iterator<Item = (TeamSide, &Agent)> {
        self.home
            .agents
            .iter()
            .map(|a| (TeamSide::Home, a))
            .chain(self.away.agents.iter().map(|a| (TeamSide::Away, a)))
    }

    pub fn find_agent(&self, id: &str) -> Option<(TeamSide, &Agent)> {
        self.agents().find(|(_, a)| a.id == id)
    }

    /// Which side controls the ball, derived from the possession id.
    pub fn possessing_side(&self) -> Option<TeamSide> {
        let id = self.possession.as_deref()?;
        self.find_agent(id).map(|(side, _)| side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with_possession(possession: Option<&str>) -> MatchSnapshot {
        MatchSnapshot {
            status: MatchStatus::InProgress,
            home: TeamSnapshot {
                name: "Home FC".to_string(),
                score: 0,
                agents: vec![Agent {
                    id: "h1".to_string(),
                    role: Role::Forward,
                    pos: Position::new(0.4, 0.5),
                }],
            },
            away: TeamSnapshot {
                name: "Away United".to_string(),
                score: 0,
                agents: vec![Agent {
                    id: "a1".to_string(),
                    role: Role::Defender,
                    pos: Position::new(0.6, 0.5),
                }],
            },
            ball: Ball { pos: Position::CENTER, velocity: None },
            possession: possession.map(String::from),
            clock_seconds: 0.0,
        }
    }

    #[test]
    fn test_possessing_side_resolves_by_id() {
        assert_eq!(snapshot_with_possession(Some("h1")).possessing_side(), Some(TeamSide::Home));
        assert_eq!(snapshot_with_possession(Some("a1")).possessing_side(), Some(TeamSide::Away));
        assert_eq!(snapshot_with_possession(None).possessing_side(), None);
        // Unknown possessor id resolves to no side rather than failing
        assert_eq!(snapshot_with_possession(Some("ghost")).possessing_side(), None);
    }

    #[test]
    fn test_status_helpers() {
        assert!(MatchStatus::InProgress.is_live());
        assert!(!MatchStatus::Paused.is_live());
        assert!(MatchStatus::NotStarted.precedes_kickoff());
        assert!(MatchStatus::GoalScored.precedes_kickoff());
        assert!(!MatchStatus::Paused.precedes_kickoff());
    }

    #[test]
    fn test_wire_codes_distinct() {
        let codes = [
            MatchStatus::NotStarted,
            MatchStatus::InProgress,
            MatchStatus::Paused,
            MatchStatus::Ended,
            MatchStatus::GoalScored,
        ]
        .map(MatchStatus::wire_code);
        let mut sorted = codes;
        sorted.sort_unstable();
        sorted.windows(2).for_each(|w| assert_ne!(w[0], w[1], "wire codes must be unique"));
    }

    #[test]
    fn test_agents_iterates_home_first() {
        let snap = snapshot_with_possession(None);
        let sides: Vec<TeamSide> = snap.agents().map(|(s, _)| s).collect();
        assert_eq!(sides, vec![TeamSide::Home, TeamSide::Away]);
    }
}
