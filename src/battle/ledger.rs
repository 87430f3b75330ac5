//! Chunk ledger: damage, regeneration and pruning on pooled hit points
//!
//! Damage is one scalar subtraction from a chunk's pool. Whole-unit losses
//! are then read off the remaining pool, so the cost of a hit is the same
//! whether the chunk holds ten ships or a hundred thousand.

use serde::{Deserialize, Serialize};

use crate::core::error::{BattleError, Result};
use crate::fleet::{Fleet, FleetChunk};

/// Tolerance for pool arithmetic (hit points)
const POOL_EPSILON: f64 = 1e-9;

/// What happens to damage that does not finish off a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpilloverPolicy {
    /// Units die one after another; the partially damaged unit survives
    /// and carries its remaining hit points into the next tick
    #[default]
    CarryRemainder,
    /// A damaged unit counts as lost; survivors are always at full health
    DestroyDamaged,
}

/// Effect of one `apply_damage` call
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DamageOutcome {
    pub units_lost: u64,
    /// Hit points actually removed (damage beyond the pool is wasted)
    pub pool_lost: f64,
}

/// Subtract `raw_damage` from the chunk's pool and convert it into unit
/// losses
pub fn apply_damage(
    chunk: &mut FleetChunk,
    raw_damage: f64,
    policy: SpilloverPolicy,
) -> Result<DamageOutcome> {
    if !raw_damage.is_finite() || raw_damage < 0.0 {
        return Err(BattleError::ledger(
            chunk.id,
            format!("damage must be a non-negative number, got {}", raw_damage),
        ));
    }
    if raw_damage == 0.0 || chunk.alive == 0 {
        return Ok(DamageOutcome::default());
    }

    let hit_points = chunk.design.hit_points();
    let before_alive = chunk.alive;
    let before_pool = chunk.defence_pool;
    let remaining = (before_pool - raw_damage).max(0.0);

    let (alive, pool) = match policy {
        SpilloverPolicy::CarryRemainder => {
            let alive = ((remaining / hit_points) - POOL_EPSILON).ceil().max(0.0) as u64;
            (alive.min(before_alive), remaining)
        }
        SpilloverPolicy::DestroyDamaged => {
            let alive = ((remaining / hit_points) + POOL_EPSILON).floor().max(0.0) as u64;
            let alive = alive.min(before_alive);
            (alive, alive as f64 * hit_points)
        }
    };

    chunk.alive = alive;
    chunk.defence_pool = if alive == 0 {
        0.0
    } else {
        pool.min(alive as f64 * hit_points)
    };
    check_invariants(chunk, before_alive)?;

    let outcome = DamageOutcome {
        units_lost: before_alive - chunk.alive,
        pool_lost: before_pool - chunk.defence_pool,
    };
    if outcome.units_lost > 0 {
        tracing::trace!(
            chunk = ?chunk.id,
            units_lost = outcome.units_lost,
            alive = chunk.alive,
            "chunk lost units"
        );
    }
    Ok(outcome)
}

/// Restore `alive × regen_per_tick` hit points, capped at full health
///
/// Returns the hit points actually restored.
pub fn regenerate(chunk: &mut FleetChunk) -> Result<f64> {
    if chunk.alive == 0 {
        return Ok(0.0);
    }
    let alive = chunk.alive as f64;
    let max_pool = alive * chunk.design.hit_points();
    let restored_pool = (chunk.defence_pool + alive * chunk.design.regen_per_tick()).min(max_pool);
    let restored = (restored_pool - chunk.defence_pool).max(0.0);
    chunk.defence_pool = restored_pool.max(chunk.defence_pool);
    check_invariants(chunk, chunk.alive)?;
    Ok(restored)
}

/// Remove every chunk with no ships left; returns how many were removed
///
/// Idempotent: a second call on a pruned fleet removes nothing.
pub fn prune(fleet: &mut Fleet) -> usize {
    let before = fleet.chunks.len();
    fleet.chunks.retain(|c| !c.is_destroyed());
    before - fleet.chunks.len()
}

fn check_invariants(chunk: &FleetChunk, previous_alive: u64) -> Result<()> {
    if chunk.alive > previous_alive {
        return Err(BattleError::ledger(
            chunk.id,
            format!("unit count grew from {} to {}", previous_alive, chunk.alive),
        ));
    }
    if !chunk.defence_pool.is_finite() || chunk.defence_pool < 0.0 {
        return Err(BattleError::ledger(
            chunk.id,
            format!("defence pool is {}", chunk.defence_pool),
        ));
    }
    let max_pool = chunk.max_defence_pool();
    if chunk.defence_pool > max_pool + POOL_EPSILON * max_pool.max(1.0) {
        return Err(BattleError::ledger(
            chunk.id,
            format!(
                "defence pool {} exceeds {} ships worth ({})",
                chunk.defence_pool, chunk.alive, max_pool
            ),
        ));
    }
    Ok(())
}
