//! Canonical data model shared by every engine component.
//!
//! Inbound payloads are normalized into these shapes exactly once at the
//! API boundary; nothing downstream branches on wire spellings.

pub mod position;
pub mod snapshot;

pub use position::Position;
pub use snapshot::{Agent, Ball, MatchSnapshot, MatchStatus, Role, TeamSide, TeamSnapshot};
