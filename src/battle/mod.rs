//! Battle system - aggregate fleet combat resolved on chunks, not ships
//!
//! Each side is a set of fleets; each fleet a set of chunks. One tick is a
//! simultaneous exchange of fire computed against the pre-tick state,
//! followed by ledger updates on the pooled hit points.

pub mod damage;
pub mod execution;
pub mod ledger;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod snapshot;
pub mod targeting;

// Re-exports for convenient access
pub use damage::{accumulate, hit_chance, resolve_damage, volley_factor, Contribution};
pub use execution::{Battle, BattleSetup, FleetSetup};
pub use ledger::{apply_damage, prune, regenerate, DamageOutcome, SpilloverPolicy};
pub use report::{
    BattleEvent, BattleEventType, BattleOutcome, BattleResult, BattleStatus, SideReport,
    TickReport,
};
pub use runner::{run_for, run_to_conclusion, run_with_observer, CancelToken, RunOutcome};
pub use scenario::{ChunkSpec, FleetSpec, Scenario};
pub use snapshot::BattleSnapshot;
pub use targeting::{resolve_targets, Assignment, TargetShare, TargetingPolicy};
