//! Engine configuration
//!
//! Every tunable has a default and can be overridden by the host, either
//! in code or by deserializing a JSON override blob. Timing values are in
//! seconds; distances are in normalized field units (0-1 span per axis).

use serde::{Deserialize, Serialize};

/// Temporal interpolation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpolationConfig {
    /// Time to blend from the previous snapshot to the current one (기본: 0.5)
    pub base_duration: f32,
    /// Inter-acceptance gap beyond `factor x base_duration` is treated as a
    /// discontinuity: progress snaps to 1 instead of animating a long
    /// catch-up glide (기본: 3.0)
    pub snap_after_factor: f32,
    /// Seconds without an accepted snapshot before the display freezes on
    /// the last known-good frame (기본: 4.0)
    pub watchdog_timeout: f32,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self { base_duration: 0.5, snap_after_factor: 3.0, watchdog_timeout: 4.0 }
    }
}

/// Scripted animation mode parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeConfig {
    /// Kickoff re-formation duration (기본: 3.0)
    pub kickoff_duration: f32,
    /// Extra gate suppression after kickoff completes, so the simulator's
    /// not-yet-settled positions don't fight the scripted motion (기본: 0.5)
    pub kickoff_grace: f32,
    /// Peak agent speed during kickoff re-formation, units/s (기본: 0.35)
    pub kickoff_max_speed: f32,
    /// Distance at which kickoff movement starts decelerating (기본: 0.15)
    pub kickoff_slowing_distance: f32,

    /// Goal celebration duration; self-terminates on wall clock,
    /// independent of further snapshots (기본: 4.0)
    pub celebration_duration: f32,
    /// Oscillation radius for non-scoring agents (기본: 0.012)
    pub celebration_amplitude: f32,
    /// Amplitude multiplier for the scoring team (기본: 2.0)
    pub celebration_scorer_boost: f32,
    /// Oscillation frequency in Hz (기본: 2.5)
    pub celebration_frequency: f32,
    /// Peak bounce offset applied to the ball's rendered position (기본: 0.04)
    pub celebration_ball_bounce: f32,

    /// Ball-pass arc duration (기본: 0.6)
    pub pass_duration: f32,
    /// Minimum ball displacement between consecutive snapshots for a
    /// possession change to read as a pass (기본: 0.08)
    pub pass_min_displacement: f32,
    /// Peak sinusoidal arc offset at the pass midpoint (기본: 0.06)
    pub pass_arc_height: f32,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            kickoff_duration: 3.0,
            kickoff_grace: 0.5,
            kickoff_max_speed: 0.35,
            kickoff_slowing_distance: 0.15,

            celebration_duration: 4.0,
            celebration_amplitude: 0.012,
            celebration_scorer_boost: 2.0,
            celebration_frequency: 2.5,
            celebration_ball_bounce: 0.04,

            pass_duration: 0.6,
            pass_min_displacement: 0.08,
            pass_arc_height: 0.06,
        }
    }
}

/// Spacing enforcement parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpacingConfig {
    /// Minimum distance between teammates (기본: 0.05)
    pub min_separation: f32,
    /// Radius around the ball that counts as "close" (기본: 0.12)
    pub close_radius: f32,
    /// Radius reserved for the possessor plus one contesting defender (기본: 0.04)
    pub very_close_radius: f32,
    /// Close-range agents allowed for the team in possession (기본: 3)
    pub possession_allowance: usize,
    /// Close-range agents allowed for the defending team; also used by
    /// both teams when the ball is loose (기본: 2)
    pub defending_allowance: usize,
    /// Cap on any single pairwise separation push (기본: 0.04)
    pub max_separation_push: f32,
    /// Clearance added beyond a violated radius when evicting (기본: 0.01)
    pub eviction_margin: f32,
    /// Extra eviction distance per overflow rank, so later ranks land
    /// progressively farther out (기본: 0.015)
    pub eviction_rank_step: f32,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self {
            min_separation: 0.05,
            close_radius: 0.12,
            very_close_radius: 0.04,
            possession_allowance: 3,
            defending_allowance: 2,
            max_separation_push: 0.04,
            eviction_margin: 0.01,
            eviction_rank_step: 0.015,
        }
    }
}

/// Aggregate engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub interpolation: InterpolationConfig,
    pub modes: ModeConfig,
    pub spacing: SpacingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let cfg = EngineConfig::default();
        assert!(cfg.interpolation.base_duration > 0.0);
        assert!(cfg.interpolation.watchdog_timeout > cfg.interpolation.base_duration);
        assert!(cfg.spacing.very_close_radius < cfg.spacing.close_radius);
        assert!(cfg.spacing.possession_allowance >= cfg.spacing.defending_allowance);
    }

    #[test]
    fn test_partial_override_round_trip() {
        // Hosts ship sparse override blobs; unknown-to-them fields keep defaults
        let cfg: EngineConfig = serde_json::from_str(
            r#"{"interpolation": {"base_duration": 0.25, "snap_after_factor": 3.0, "watchdog_timeout": 2.0}}"#,
        )
        .unwrap();
        assert_eq!(cfg.interpolation.base_duration, 0.25);
        assert_eq!(cfg.modes.kickoff_duration, ModeConfig::default().kickoff_duration);

        let json = serde_json::to_string(&cfg).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.interpolation.watchdog_timeout, 2.0);
    }
}
