//! Read-only view of both sides at the start of a tick
//!
//! Targeting and damage computation only ever see a snapshot, so both
//! sides fire at the pre-tick state and neither can observe the other's
//! partial results.

use ahash::AHashMap;

use crate::core::types::{ChunkId, Side};
use crate::fleet::{Fleet, FleetChunk};

#[derive(Debug, Clone)]
pub struct BattleSnapshot<'a> {
    attackers: Vec<&'a FleetChunk>,
    defenders: Vec<&'a FleetChunk>,
    index: AHashMap<ChunkId, &'a FleetChunk>,
}

impl<'a> BattleSnapshot<'a> {
    /// Capture every live chunk of both sides, in roster order
    pub fn capture(attackers: &'a [Fleet], defenders: &'a [Fleet]) -> Self {
        let live = |fleets: &'a [Fleet]| -> Vec<&'a FleetChunk> {
            fleets
                .iter()
                .flat_map(|f| f.chunks().iter())
                .filter(|c| !c.is_destroyed())
                .collect()
        };
        let attackers = live(attackers);
        let defenders = live(defenders);
        let index = attackers
            .iter()
            .chain(defenders.iter())
            .map(|&c| (c.id(), c))
            .collect();

        Self {
            attackers,
            defenders,
            index,
        }
    }

    pub fn side(&self, side: Side) -> &[&'a FleetChunk] {
        match side {
            Side::Attacker => &self.attackers,
            Side::Defender => &self.defenders,
        }
    }

    pub fn chunk(&self, id: ChunkId) -> Option<&'a FleetChunk> {
        self.index.get(&id).copied()
    }

    pub fn live_chunks(&self) -> usize {
        self.attackers.len() + self.defenders.len()
    }
}
