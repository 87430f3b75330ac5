//! Fleet data model: Design → Chunk → Fleet
//!
//! Designs are immutable and shared. Chunks group identical ships under a
//! live count and a pooled hit-point value. Fleets order chunks for one
//! side of a battle.

pub mod chunk;
pub mod design;
pub mod roster;

pub use chunk::{ChunkIdAllocator, ChunkSummary, FleetChunk};
pub use design::{DesignBuilder, DesignStats, ShipDesign};
pub use roster::{Fleet, FleetSummary};
