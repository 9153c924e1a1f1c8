//! Kickoff formation slots
//!
//! Normalized (0-1) slot assignment for the kickoff re-formation. Each
//! role occupies a vertical line; agents of the same role spread evenly
//! across the line. Home attacks toward x=1, so the away side's slots are
//! mirrored on the x axis.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::model::{MatchSnapshot, Position, Role, TeamSide};

/// Role line x coordinates for the home side (mirrored for away).
static ROLE_LINES: Lazy<HashMap<Role, f32>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert(Role::Goalkeeper, 0.06);
    map.insert(Role::Defender, 0.22);
    map.insert(Role::Midfielder, 0.36);
    map.insert(Role::Forward, 0.46);
    map
});

/// Vertical span occupied by each role line.
const LINE_Y_MIN: f32 = 0.20;
const LINE_Y_MAX: f32 = 0.80;

/// X offset from the center line for the restarting side's kickoff taker.
const RESTART_TAKER_OFFSET: f32 = 0.03;

fn line_x(role: Role, side: TeamSide) -> f32 {
    let home_x = *ROLE_LINES.get(&role).unwrap_or(&0.36);
    if side.is_home() {
        home_x
    } else {
        1.0 - home_x
    }
}

fn spread_y(index: usize, count: usize) -> f32 {
    if count <= 1 {
        0.5
    } else {
        LINE_Y_MIN + (LINE_Y_MAX - LINE_Y_MIN) * index as f32 / (count - 1) as f32
    }
}

/// Formation targets for every agent in `snapshot`, keyed by agent id.
///
/// The restarting side's first forward is placed adjacent to the center
/// line to take the kickoff. Agents whose role line cannot be resolved
/// are simply absent from the map; the caller skips the scripted delta
/// for them instead of aborting the frame.
pub fn kickoff_targets(
    snapshot: &MatchSnapshot,
    restart_side: Option<TeamSide>,
) -> HashMap<String, Position> {
    let mut targets = HashMap::new();

    for side in [TeamSide::Home, TeamSide::Away] {
        let roster = &snapshot.team(side).agents;

        // Per-role counts first, so each line spreads evenly
        let mut role_counts: HashMap<Role, usize> = HashMap::new();
        for agent in roster {
            *role_counts.entry(agent.role).or_insert(0) += 1;
        }

        let mut role_seen: HashMap<Role, usize> = HashMap::new();
        let mut taker_assigned = false;

        for agent in roster {
            let index = {
                let seen = role_seen.entry(agent.role).or_insert(0);
                let i = *seen;
                *seen += 1;
                i
            };
            let count = role_counts[&agent.role];

            let target = if restart_side == Some(side)
                && agent.role == Role::Forward
                && !taker_assigned
            {
                taker_assigned = true;
                let x = if side.is_home() {
                    0.5 - RESTART_TAKER_OFFSET
                } else {
                    0.5 + RESTART_TAKER_OFFSET
                };
                Position::new(x, 0.5)
            } else {
                Position::new(line_x(agent.role, side), spread_y(index, count))
            };

            targets.insert(agent.id.clone(), target.clamp_in_bounds());
        }
    }

    targets
}
