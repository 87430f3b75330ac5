//! Fleets: an ordered roster of chunks fighting on one side

use std::sync::Arc;

use serde::Serialize;

use crate::core::error::{BattleError, Result};
use crate::core::types::{ChunkId, FleetId};
use crate::fleet::chunk::{ChunkIdAllocator, ChunkSummary, FleetChunk};
use crate::fleet::design::ShipDesign;

/// Ordered set of chunks; at most one chunk per design
#[derive(Debug, Clone)]
pub struct Fleet {
    pub(crate) id: FleetId,
    pub(crate) name: String,
    pub(crate) chunks: Vec<FleetChunk>,
}

impl Fleet {
    pub fn new(id: FleetId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            chunks: Vec::new(),
        }
    }

    pub fn id(&self) -> FleetId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chunks(&self) -> &[FleetChunk] {
        &self.chunks
    }

    pub fn chunk(&self, id: ChunkId) -> Option<&FleetChunk> {
        self.chunks.iter().find(|c| c.id == id)
    }

    /// Total ships across all chunks, saturating at `u64::MAX`
    pub fn total_alive(&self) -> u64 {
        self.chunks.iter().fold(0u64, |total, c| total.saturating_add(c.alive))
    }

    pub fn is_destroyed(&self) -> bool {
        self.chunks.iter().all(FleetChunk::is_destroyed)
    }

    /// Add `count` ships of `design`, merging into an existing chunk of the
    /// same design
    ///
    /// Zero counts are ignored so the roster never holds an empty chunk.
    pub(crate) fn add_ships(
        &mut self,
        design: Arc<ShipDesign>,
        count: u64,
        ids: &mut ChunkIdAllocator,
    ) -> Result<()> {
        if count == 0 {
            return Ok(());
        }

        if let Some(existing) = self.chunks.iter_mut().find(|c| c.design_id() == design.id()) {
            if !Arc::ptr_eq(&existing.design, &design) && *existing.design != *design {
                return Err(BattleError::invalid_design(
                    design.name(),
                    format!(
                        "design id {:?} is already used by '{}'",
                        design.id(),
                        existing.design.name()
                    ),
                ));
            }

            existing.alive = existing.alive.checked_add(count).ok_or_else(|| {
                BattleError::ledger(existing.id, "unit count overflow while merging chunks")
            })?;
            existing.defence_pool += count as f64 * design.hit_points();
            return Ok(());
        }

        self.chunks.push(FleetChunk::new(ids.next_id(), design, count));
        Ok(())
    }

    pub fn summary(&self) -> FleetSummary {
        FleetSummary {
            fleet_id: self.id,
            name: self.name.clone(),
            alive: self.total_alive(),
            chunks: self.chunks.iter().map(FleetChunk::summary).collect(),
        }
    }
}

/// Serializable view of a fleet for reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetSummary {
    pub fleet_id: FleetId,
    pub name: String,
    pub alive: u64,
    pub chunks: Vec<ChunkSummary>,
}
