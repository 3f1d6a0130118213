//! Generator tuning knobs.
//!
//! Defaults reproduce the shipped level set. Settings can be supplied from
//! JavaScript as a plain object; missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::error::MazeError;
use crate::solver::DEFAULT_MAX_NODES;
use crate::types::Mode;

/// Highest level id served per mode.
pub const LEVELS_PER_MODE: u32 = 4000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorSettings {
    /// Highest supported level id.
    pub max_level: u32,
    /// Strategy attempts per seed.
    pub max_attempts: u32,
    /// Seed-shifted retries once the primary seed is exhausted.
    pub fallback_offsets: u32,
    /// Level-id distance between fallback seeds.
    pub fallback_stride: u32,
    /// Solver depth beyond `max_moves`.
    pub depth_slack: usize,
    /// Solver node budget per attempt.
    pub max_solver_nodes: u64,
    /// Fraction of the room interior turned into obstacles, `[lo, hi)`.
    pub obstacle_density: (f64, f64),
    /// Fraction of lattice corridor cells deleted, `[lo, hi)`.
    pub lattice_removal: (f64, f64),
    /// Junctions required per `min_moves` in thinking mode.
    pub thinking_junction_ratio: f64,
    /// Junctions required per `min_moves` in relaxing mode.
    pub relaxing_junction_ratio: f64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            max_level: LEVELS_PER_MODE,
            max_attempts: 150,
            fallback_offsets: 50,
            fallback_stride: 1000,
            depth_slack: 6,
            max_solver_nodes: DEFAULT_MAX_NODES,
            obstacle_density: (0.25, 0.45),
            lattice_removal: (0.15, 0.35),
            thinking_junction_ratio: 0.4,
            relaxing_junction_ratio: 0.15,
        }
    }
}

impl GeneratorSettings {
    pub fn junction_ratio(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Thinking => self.thinking_junction_ratio,
            Mode::Relaxing => self.relaxing_junction_ratio,
        }
    }

    /// Check that every knob is usable.
    pub fn validate(&self) -> Result<(), MazeError> {
        if self.max_level == 0 {
            return Err(invalid("maxLevel", "must be at least 1"));
        }
        if self.max_attempts == 0 {
            return Err(invalid("maxAttempts", "must be at least 1"));
        }
        if self.max_solver_nodes == 0 {
            return Err(invalid("maxSolverNodes", "must be at least 1"));
        }
        check_fraction_range("obstacleDensity", self.obstacle_density)?;
        check_fraction_range("latticeRemoval", self.lattice_removal)?;
        for (field, ratio) in [
            ("thinkingJunctionRatio", self.thinking_junction_ratio),
            ("relaxingJunctionRatio", self.relaxing_junction_ratio),
        ] {
            if !ratio.is_finite() || ratio < 0.0 {
                return Err(invalid(field, "must be a non-negative number"));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> MazeError {
    MazeError::InvalidSettings {
        field,
        reason: reason.to_string(),
    }
}

fn check_fraction_range(field: &'static str, (lo, hi): (f64, f64)) -> Result<(), MazeError> {
    if !(0.0..1.0).contains(&lo) || !(0.0..1.0).contains(&hi) || lo > hi {
        return Err(invalid(field, "must be an ordered range inside [0, 1)"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(GeneratorSettings::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_ranges() {
        let settings = GeneratorSettings {
            obstacle_density: (0.6, 0.2),
            ..GeneratorSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(MazeError::InvalidSettings { field: "obstacleDensity", .. })
        ));

        let settings = GeneratorSettings {
            max_attempts: 0,
            ..GeneratorSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: GeneratorSettings =
            serde_json::from_str(r#"{ "maxAttempts": 20, "latticeRemoval": [0.1, 0.2] }"#).unwrap();
        assert_eq!(settings.max_attempts, 20);
        assert_eq!(settings.lattice_removal, (0.1, 0.2));
        assert_eq!(settings.max_level, LEVELS_PER_MODE);
    }
}
