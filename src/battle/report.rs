//! Battle status, outcome and the reports handed to consumers

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{ChunkId, DesignId, Side, Tick};
use crate::fleet::FleetSummary;

/// Final result of a concluded battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    AttackerWin,
    DefenderWin,
    /// Both sides wiped out on the same tick
    Draw,
    /// Tick cap reached with both sides still fighting
    Timeout,
}

impl std::fmt::Display for BattleOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BattleOutcome::AttackerWin => "attacker win",
            BattleOutcome::DefenderWin => "defender win",
            BattleOutcome::Draw => "draw",
            BattleOutcome::Timeout => "timeout",
        };
        write!(f, "{}", name)
    }
}

/// Battle lifecycle
///
/// Pending → InProgress on the first tick; InProgress → Concluded once a
/// termination condition holds. Nothing leaves Concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattleStatus {
    #[default]
    Pending,
    InProgress,
    Concluded(BattleOutcome),
}

impl BattleStatus {
    pub fn outcome(self) -> Option<BattleOutcome> {
        match self {
            BattleStatus::Concluded(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_concluded(self) -> bool {
        self.outcome().is_some()
    }
}

/// Log entry for battle events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleEvent {
    pub tick: Tick,
    pub event_type: BattleEventType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEventType {
    BattleStarted,
    ChunkDestroyed {
        side: Side,
        chunk_id: ChunkId,
        design_id: DesignId,
    },
    BattleEnded {
        outcome: BattleOutcome,
    },
}

/// One side's state after a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideReport {
    pub side: Side,
    pub fleets: Vec<FleetSummary>,
    pub units_alive: u64,
    pub units_lost: u64,
    /// Raw damage this side's chunks sent at the enemy
    pub damage_dealt: f64,
    /// Raw damage the enemy sent at this side
    pub damage_received: f64,
    pub hit_points_regenerated: f64,
}

/// Everything that happened in one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    pub tick: Tick,
    pub status: BattleStatus,
    pub attackers: SideReport,
    pub defenders: SideReport,
    pub events: Vec<BattleEvent>,
}

impl TickReport {
    pub fn side(&self, side: Side) -> &SideReport {
        match side {
            Side::Attacker => &self.attackers,
            Side::Defender => &self.defenders,
        }
    }
}

/// Terminal record of a concluded battle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleResult {
    pub outcome: BattleOutcome,
    pub ticks: Tick,
    pub attackers: Vec<FleetSummary>,
    pub defenders: Vec<FleetSummary>,
}

impl BattleResult {
    pub fn survivors(&self, side: Side) -> u64 {
        let fleets = match side {
            Side::Attacker => &self.attackers,
            Side::Defender => &self.defenders,
        };
        fleets.iter().fold(0u64, |total, f| total.saturating_add(f.alive))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} after {} ticks\n{} attacking and {} defending ships remain",
            self.outcome,
            self.ticks,
            self.survivors(Side::Attacker),
            self.survivors(Side::Defender),
        )
    }
}
