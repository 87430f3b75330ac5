//! Fleet chunks: many identical ships tracked as one record
//!
//! A chunk never stores individual ships. It holds a live count and one
//! pooled hit-point value for the whole group, so a chunk of 100 000 ships
//! costs the same to simulate as a chunk of one.

use std::sync::Arc;

use serde::Serialize;

use crate::core::types::{ChunkId, DesignId};
use crate::fleet::design::ShipDesign;

/// Group of `alive` ships sharing one design and one hit-point pool
///
/// Invariant: `0 <= defence_pool <= alive * design.hit_points()`.
#[derive(Debug, Clone)]
pub struct FleetChunk {
    pub(crate) id: ChunkId,
    pub(crate) design: Arc<ShipDesign>,
    pub(crate) alive: u64,
    pub(crate) defence_pool: f64,
}

impl FleetChunk {
    /// New chunk at full strength
    pub fn new(id: ChunkId, design: Arc<ShipDesign>, count: u64) -> Self {
        let defence_pool = count as f64 * design.hit_points();
        Self {
            id,
            design,
            alive: count,
            defence_pool,
        }
    }

    pub fn id(&self) -> ChunkId {
        self.id
    }

    pub fn design(&self) -> &Arc<ShipDesign> {
        &self.design
    }

    pub fn design_id(&self) -> DesignId {
        self.design.id()
    }

    pub fn alive(&self) -> u64 {
        self.alive
    }

    pub fn defence_pool(&self) -> f64 {
        self.defence_pool
    }

    /// Pool of the chunk at full health
    pub fn max_defence_pool(&self) -> f64 {
        self.alive as f64 * self.design.hit_points()
    }

    pub fn is_destroyed(&self) -> bool {
        self.alive == 0
    }

    pub fn summary(&self) -> ChunkSummary {
        ChunkSummary {
            chunk_id: self.id,
            design_id: self.design.id(),
            design_name: self.design.name().to_string(),
            alive: self.alive,
            defence_pool: self.defence_pool,
        }
    }
}

/// Serializable view of a chunk for reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkSummary {
    pub chunk_id: ChunkId,
    pub design_id: DesignId,
    pub design_name: String,
    pub alive: u64,
    pub defence_pool: f64,
}

/// Hands out chunk ids in creation order
#[derive(Debug, Clone, Default)]
pub struct ChunkIdAllocator {
    next: u32,
}

impl ChunkIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> ChunkId {
        let id = ChunkId::new(self.next);
        self.next += 1;
        id
    }
}
