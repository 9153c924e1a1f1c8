//! Reconciliation engine internals
//!
//! Layered per-tick pipeline: mode controller → temporal interpolator →
//! spacing enforcer. [`driver::MatchViewEngine`] is the facade that owns
//! the layers and the retained snapshot pair.

pub mod driver;
pub mod easing;
pub mod formation;
pub mod frame;
pub mod gate;
pub mod interpolator;
pub mod modes;
pub mod spacing;
pub mod steering;

pub use driver::MatchViewEngine;
pub use frame::{AgentFrame, FrameStats, RenderFrame};
pub use gate::{GateDecision, SnapshotGate};
pub use modes::{AnimationMode, ModeController, ModeEvent};
