//! Spacing enforcement
//!
//! Constraint-relaxation pass over a blended frame. Two steps:
//!
//! 1. Pairwise teammate separation: teammates closer than the minimum
//!    distance are pushed apart symmetrically along the connecting line,
//!    proportional to the shortfall.
//! 2. Possession-aware crowd limiting: each team gets an allowance of
//!    agents near the ball (more for the team in possession); agents over
//!    the allowance are evicted radially outward, rank by rank. The
//!    very-close ring is reserved for the possessor plus at most one
//!    contesting defender.
//!
//! The pass touches positions only. Possession, score and status pass
//! through untouched, and a frame that already satisfies every
//! constraint comes back unchanged, so repeated application is stable.

use crate::config::SpacingConfig;
use crate::engine::frame::RenderFrame;
use crate::model::{Position, TeamSide};

/// Push-apart direction for a coincident pair; agent order breaks the tie
/// deterministically.
const TIE_BREAK_DIR: (f32, f32) = (1.0, 0.0);

/// Relax spacing constraints on `frame` in place.
///
/// No-op unless the frame status is live; the driver additionally skips
/// the pass while a blocking scripted mode owns the positions.
pub fn relax(frame: &mut RenderFrame, config: &SpacingConfig) {
    if !frame.status.is_live() {
        return;
    }

    separate_teammates(frame, config);
    limit_crowding(frame, config);
}

/// Step 1: symmetric pairwise minimum separation between teammates.
fn separate_teammates(frame: &mut RenderFrame, config: &SpacingConfig) {
    if config.min_separation <= 0.0 {
        return;
    }

    for i in 0..frame.agents.len() {
        for j in (i + 1)..frame.agents.len() {
            if frame.agents[i].side != frame.agents[j].side {
                continue;
            }

            let a = frame.agents[i].pos;
            let b = frame.agents[j].pos;
            let distance = a.distance(b);
            if distance >= config.min_separation {
                continue;
            }

            let shift = ((config.min_separation - distance) * 0.5)
                .min(config.max_separation_push);
            let dir = if distance < 0.0001 {
                TIE_BREAK_DIR
            } else {
                ((b.x - a.x) / distance, (b.y - a.y) / distance)
            };

            frame.agents[i].pos = a.offset_clamped(-dir.0 * shift, -dir.1 * shift);
            frame.agents[j].pos = b.offset_clamped(dir.0 * shift, dir.1 * shift);
        }
    }
}

/// Step 2: possession-aware crowd limiting around the ball.
fn limit_crowding(frame: &mut RenderFrame, config: &SpacingConfig) {
    let ball = frame.ball;
    let possessor = frame.possession.clone();
    let possessing_side = possessor
        .as_deref()
        .and_then(|id| frame.agent(id).map(|a| a.side));

    evict_very_close(frame, ball, possessor.as_deref(), possessing_side, config);

    for side in [TeamSide::Home, TeamSide::Away] {
        let allowance = if possessing_side == Some(side) {
            config.possession_allowance
        } else {
            config.defending_allowance
        };

        // Close-range agents, nearest first. The possessor never counts as
        // evictable but does occupy one of its team's slots.
        let mut close: Vec<(usize, f32)> = frame
            .agents
            .iter()
            .enumerate()
            .filter(|(_, a)| a.side == side)
            .map(|(idx, a)| (idx, a.pos.distance(ball)))
            .filter(|&(_, d)| d < config.close_radius)
            .collect();
        close.sort_by(|a, b| a.1.total_cmp(&b.1));

        for (rank, &(idx, _)) in close.iter().skip(allowance).enumerate() {
            if Some(frame.agents[idx].id.as_str()) == possessor.as_deref() {
                continue;
            }
            let radius = config.close_radius
                + config.eviction_margin
                + config.eviction_rank_step * rank as f32;
            frame.agents[idx].pos = place_on_ring(frame.agents[idx].pos, ball, radius, idx);
        }
    }
}

/// Clear the very-close ring of everyone but the possessor and the single
/// nearest contesting defender.
fn evict_very_close(
    frame: &mut RenderFrame,
    ball: Position,
    possessor: Option<&str>,
    possessing_side: Option<TeamSide>,
    config: &SpacingConfig,
) {
    // The contesting slot belongs to the non-possessing side; with a loose
    // ball there is no contest to model and everyone is evicted alike.
    let contesting_idx = possessing_side.and_then(|side| {
        frame
            .agents
            .iter()
            .enumerate()
            .filter(|(_, a)| a.side == side.opponent())
            .map(|(idx, a)| (idx, a.pos.distance(ball)))
            .filter(|&(_, d)| d < config.very_close_radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(idx, _)| idx)
    });

    for idx in 0..frame.agents.len() {
        if Some(frame.agents[idx].id.as_str()) == possessor {
            continue;
        }
        if Some(idx) == contesting_idx {
            continue;
        }
        if frame.agents[idx].pos.distance(ball) < config.very_close_radius {
            let radius = config.very_close_radius + config.eviction_margin;
            frame.agents[idx].pos = place_on_ring(frame.agents[idx].pos, ball, radius, idx);
        }
    }
}

/// Move an agent radially outward from the ball onto the given ring,
/// clamped to field bounds. A coincident agent gets a deterministic
/// direction derived from its index.
fn place_on_ring(pos: Position, ball: Position, radius: f32, index: usize) -> Position {
    let distance = pos.distance(ball);
    let dir = if distance < 0.0001 {
        if index % 2 == 0 {
            TIE_BREAK_DIR
        } else {
            (-TIE_BREAK_DIR.0, -TIE_BREAK_DIR.1)
        }
    } else {
        ((pos.x - ball.x) / distance, (pos.y - ball.y) / distance)
    };
    Position::new(ball.x + dir.0 * radius, ball.y + dir.1 * radius).clamp_in_bounds()
}
