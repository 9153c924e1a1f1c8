//! Snapshot gate
//!
//! Validates and deduplicates the inbound snapshot stream. The simulator
//! pushes at its own cadence and occasionally re-sends unchanged state;
//! re-accepting such a payload would reset interpolation progress and
//! visibly stutter every agent. The gate compares a compact content
//! signature against the last accepted one and drops "no new information"
//! pushes before they touch interpolation state.
//!
//! The signature hash must be stable across platforms and compiler
//! versions, so it uses FxHasher rather than the std RandomState.

use std::hash::{Hash, Hasher};

use fxhash::FxHasher;
use tracing::debug;

use crate::model::{MatchSnapshot, TeamSide};

/// Outcome of offering a snapshot to the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    /// New information; stored as the current snapshot.
    Accepted,
    /// Content signature matched the last accepted snapshot; no state
    /// change, no side effect.
    DuplicateContent,
    /// A scripted mode currently forbids ingestion and its suppression
    /// window has not elapsed.
    SuppressedByMode,
}

impl GateDecision {
    pub fn is_accepted(self) -> bool {
        matches!(self, GateDecision::Accepted)
    }
}

/// Number of agents per team sampled into the signature. Sampling keeps
/// the hash cheap on every push while still catching any real movement:
/// a snapshot where only unsampled agents moved also moves the ball or
/// flips possession in practice.
const SIGNATURE_SAMPLE: usize = 3;

/// Fixed-precision quantization for signature coordinates (3 decimals).
#[inline]
fn quantize(v: f32) -> i32 {
    (v * 1000.0).round() as i32
}

/// Compact content signature over status, possession, ball position and
/// a deterministic sample of agent positions.
pub fn signature_of(snapshot: &MatchSnapshot) -> u64 {
    let mut hasher = FxHasher::default();

    snapshot.status.wire_code().hash(&mut hasher);
    snapshot.possession.hash(&mut hasher);
    quantize(snapshot.ball.pos.x).hash(&mut hasher);
    quantize(snapshot.ball.pos.y).hash(&mut hasher);

    for side in [TeamSide::Home, TeamSide::Away] {
        for agent in snapshot.team(side).agents.iter().take(SIGNATURE_SAMPLE) {
            agent.id.hash(&mut hasher);
            quantize(agent.pos.x).hash(&mut hasher);
            quantize(agent.pos.y).hash(&mut hasher);
        }
    }

    hasher.finish()
}

/// Deduplicating gate over the inbound snapshot stream.
#[derive(Debug, Default)]
pub struct SnapshotGate {
    last_signature: Option<u64>,
}

impl SnapshotGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether `snapshot` carries new information. `suppressed`
    /// is the mode controller's current ingestion veto; it wins over
    /// content comparison and leaves gate state untouched.
    pub fn admit(&mut self, snapshot: &MatchSnapshot, suppressed: bool) -> GateDecision {
        if suppressed {
            debug!("snapshot rejected: scripted mode suppression active");
            return GateDecision::SuppressedByMode;
        }

        let signature = signature_of(snapshot);
        if self.last_signature == Some(signature) {
            debug!(signature, "snapshot rejected: duplicate content");
            return GateDecision::DuplicateContent;
        }

        self.last_signature = Some(signature);
        GateDecision::Accepted
    }
}
