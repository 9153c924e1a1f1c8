//! Ease-out progress curves
//!
//! Linear blending between snapshots taken at irregular intervals makes
//! every snapshot boundary a visible velocity discontinuity. Easing out
//! (fast start, decelerating arrival) hides the seam by slowing into each
//! new waypoint.
//!
//! Curves are `f(t) = 1 - (1-t)^e` with exponent e > 1:
//! - f(0) = 0, f(1) = 1
//! - strictly monotonic on [0,1]
//! - f'(t) = e(1-t)^(e-1), strictly decreasing

use crate::model::Role;

/// Exponent used for the ball and for agents without a roster match.
pub const DEFAULT_EXPONENT: f32 = 2.0;

/// Ease-out mapping of raw progress `t` in [0,1].
#[inline]
pub fn ease_out(t: f32, exponent: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powf(exponent)
}

/// Per-role exponent. Cosmetic differentiation only: back-line players
/// settle into new waypoints more gently than advanced attackers, which
/// keeps a moving defensive line from arriving in lockstep.
#[inline]
pub fn role_exponent(role: Role) -> f32 {
    match role {
        Role::Goalkeeper => 1.6,
        Role::Defender => 2.0,
        Role::Midfielder => 2.4,
        Role::Forward => 2.8,
    }
}

/// Eased progress for one agent.
#[inline]
pub fn eased_progress(role: Role, t: f32) -> f32 {
    ease_out(t, role_exponent(role))
}
