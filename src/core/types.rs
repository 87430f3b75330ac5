//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Battle tick counter (simulation time unit)
pub type Tick = u64;

/// Unique identifier for ship designs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DesignId(pub u32);

impl DesignId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Unique identifier for fleets within a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FleetId(pub u32);

impl FleetId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Unique identifier for fleet chunks
///
/// Assigned in creation order, so a lower id always means an older chunk.
/// Targeting relies on this for its tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChunkId(pub u32);

impl ChunkId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Which side of a battle a fleet fights on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Attacker,
    Defender,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Attacker => Side::Defender,
            Side::Defender => Side::Attacker,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Attacker => write!(f, "attacker"),
            Side::Defender => write!(f, "defender"),
        }
    }
}
