//! JSON API boundary
//!
//! The single place where wire payloads become canonical engine values.

pub mod snapshot_json;
pub mod target_hint;

use chrono::Utc;
use tracing::debug;

use crate::engine::MatchViewEngine;
use crate::error::Result;

pub use snapshot_json::{GateAck, RawMatchSnapshot, SCHEMA_VERSION};
pub use target_hint::parse_target_hint;

impl MatchViewEngine {
    /// Parse, normalize, and offer a pushed JSON payload to the gate.
    ///
    /// `now` is the host's monotonic clock in seconds, on the same
    /// timeline as [`MatchViewEngine::tick`]. The wall-clock receipt
    /// timestamp in the acknowledgment is informational only.
    pub fn accept_json(&mut self, payload: &str, now: f64) -> Result<GateAck> {
        let raw = RawMatchSnapshot::parse(payload)?;
        let snapshot = raw.into_canonical(self.current_snapshot())?;
        let decision = self.accept(snapshot, now);
        debug!(?decision, "snapshot payload processed");
        Ok(GateAck { decision, received_at: Utc::now() })
    }
}
