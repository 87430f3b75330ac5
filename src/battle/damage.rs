//! Damage resolution: volume of fire times accuracy, summed per target
//!
//! Each attacker's contribution is computed from the snapshot alone, so
//! contributions can be computed in parallel. They are folded in attacker
//! order afterwards, which keeps the floating-point sums identical whether
//! or not rayon was used.

use ahash::AHashMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::battle::snapshot::BattleSnapshot;
use crate::battle::targeting::Assignment;
use crate::catalogue::ShipComponent;
use crate::core::config::BattleConfig;
use crate::core::types::{ChunkId, Tick};

/// Damage one attacking chunk sends at one target this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contribution {
    pub attacker: ChunkId,
    pub target: ChunkId,
    pub damage: f64,
}

/// Chance that a shot connects, from attacker tracking vs target mass
///
/// Heavier targets are easier to hit. A fixed chance in the config
/// replaces the formula entirely.
pub fn hit_chance(tracking_speed: f64, target_mass: f64, config: &BattleConfig) -> f64 {
    if let Some(fixed) = config.fixed_hit_chance {
        return fixed;
    }
    let total = tracking_speed + target_mass;
    let raw = if total > 0.0 { tracking_speed / total } else { 0.0 };
    raw.clamp(config.hit_chance_floor, config.hit_chance_ceiling)
}

/// Volley multiplier for one chunk on one tick
///
/// Always 1.0 without variance. Otherwise drawn from a generator seeded
/// by (seed, tick, chunk) so a replay reproduces every roll.
pub fn volley_factor(config: &BattleConfig, tick: Tick, attacker: ChunkId) -> f64 {
    if config.volley_variance <= 0.0 {
        return 1.0;
    }
    let stream = config
        .seed
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(tick.rotate_left(32))
        ^ u64::from(attacker.0);
    let mut rng = ChaCha8Rng::seed_from_u64(stream);
    1.0 + rng.gen_range(-config.volley_variance..=config.volley_variance)
}

fn contributions_for(
    assignment: &Assignment,
    snapshot: &BattleSnapshot<'_>,
    tick: Tick,
    config: &BattleConfig,
) -> Vec<Contribution> {
    let Some(attacker) = snapshot.chunk(assignment.attacker) else {
        return Vec::new();
    };
    let design = attacker.design();
    let volley = attacker.alive() as f64
        * design.damage_per_tick()
        * volley_factor(config, tick, attacker.id());

    assignment
        .targets
        .iter()
        .filter_map(|share| {
            let target = snapshot.chunk(share.target)?;
            let chance = hit_chance(design.tracking_speed(), target.design().mass(), config);
            Some(Contribution {
                attacker: attacker.id(),
                target: target.id(),
                damage: volley * chance * share.share,
            })
        })
        .collect()
}

/// Expand assignments into per-target damage contributions
///
/// Output order follows assignment order regardless of `parallel`.
pub fn resolve_damage(
    assignments: &[Assignment],
    snapshot: &BattleSnapshot<'_>,
    tick: Tick,
    config: &BattleConfig,
    parallel: bool,
) -> Vec<Contribution> {
    if parallel {
        assignments
            .par_iter()
            .flat_map_iter(|a| contributions_for(a, snapshot, tick, config))
            .collect()
    } else {
        assignments
            .iter()
            .flat_map(|a| contributions_for(a, snapshot, tick, config))
            .collect()
    }
}

/// Sum contributions into one damage total per target chunk
pub fn accumulate(contributions: &[Contribution]) -> AHashMap<ChunkId, f64> {
    let mut totals: AHashMap<ChunkId, f64> = AHashMap::new();
    for c in contributions {
        *totals.entry(c.target).or_insert(0.0) += c.damage;
    }
    totals
}

/// Total raw damage in a set of contributions
pub fn total_damage(contributions: &[Contribution]) -> f64 {
    contributions.iter().map(|c| c.damage).sum()
}
