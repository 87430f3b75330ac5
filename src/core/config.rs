//! Battle configuration with documented constants
//!
//! All tunable numbers of the combat model are collected here with
//! explanations of what they control.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::battle::ledger::SpilloverPolicy;
use crate::battle::targeting::TargetingPolicy;
use crate::core::error::{BattleError, Result};
use crate::core::types::Tick;

/// Configuration for the battle systems
///
/// Every field has a default, so a TOML file only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    // === TERMINATION ===
    /// Tick cap used when a battle is created without an explicit one
    ///
    /// Reaching the cap concludes the battle as a Timeout. Finite so that
    /// two fleets that cannot hurt each other still terminate.
    pub default_tick_cap: Tick,

    // === ACCURACY ===
    /// Lowest hit chance the tracking-vs-mass formula may produce
    ///
    /// Keeps a very light target from becoming untouchable.
    pub hit_chance_floor: f64,

    /// Highest hit chance the tracking-vs-mass formula may produce
    ///
    /// Keeps a very heavy target from being hit by every shot.
    pub hit_chance_ceiling: f64,

    /// Replace the formula with a constant hit chance (not clamped)
    ///
    /// Used by scenario tests that need exact damage numbers.
    pub fixed_hit_chance: Option<f64>,

    // === DAMAGE ===
    /// What happens to damage that does not finish off a unit
    pub spillover: SpilloverPolicy,

    /// How attacking chunks pick their targets
    pub targeting: TargetingPolicy,

    /// Relative spread of each chunk's volley (0.0 = always expected damage)
    ///
    /// At 0.1 a chunk deals between 90% and 110% of its expected damage.
    /// The roll is seeded from `seed`, the tick and the chunk id, so runs
    /// stay reproducible.
    pub volley_variance: f64,

    /// Seed for volley rolls
    pub seed: u64,

    // === PARALLELIZATION ===
    /// Minimum number of live chunks before targeting and damage
    /// computation fan out over rayon
    ///
    /// Below this threshold thread overhead exceeds the per-chunk work.
    pub parallel_threshold: usize,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            default_tick_cap: 10_000,

            hit_chance_floor: 0.05,
            hit_chance_ceiling: 0.95,
            fixed_hit_chance: None,

            spillover: SpilloverPolicy::default(),
            targeting: TargetingPolicy::default(),
            volley_variance: 0.0,
            seed: 0,

            parallel_threshold: 256,
        }
    }
}

impl BattleConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Config with a constant hit chance, for exact-damage scenarios
    pub fn with_fixed_hit_chance(hit_chance: f64) -> Self {
        Self {
            fixed_hit_chance: Some(hit_chance),
            ..Self::default()
        }
    }

    /// Load a config from a TOML file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse a config from a TOML string and validate it
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: BattleConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.default_tick_cap == 0 {
            return Err(BattleError::InvalidConfig(
                "default_tick_cap must be at least 1".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.hit_chance_floor)
            || !(0.0..=1.0).contains(&self.hit_chance_ceiling)
        {
            return Err(BattleError::InvalidConfig(format!(
                "hit chance bounds must lie in [0, 1] (floor {}, ceiling {})",
                self.hit_chance_floor, self.hit_chance_ceiling
            )));
        }

        if self.hit_chance_floor > self.hit_chance_ceiling {
            return Err(BattleError::InvalidConfig(format!(
                "hit_chance_floor ({}) should be <= hit_chance_ceiling ({})",
                self.hit_chance_floor, self.hit_chance_ceiling
            )));
        }

        if let Some(fixed) = self.fixed_hit_chance {
            if !(0.0..=1.0).contains(&fixed) {
                return Err(BattleError::InvalidConfig(format!(
                    "fixed_hit_chance ({}) must lie in [0, 1]",
                    fixed
                )));
            }
        }

        if !(0.0..1.0).contains(&self.volley_variance) {
            return Err(BattleError::InvalidConfig(format!(
                "volley_variance ({}) must lie in [0, 1)",
                self.volley_variance
            )));
        }

        Ok(())
    }
}
