//! Battle execution loop
//!
//! Each tick: snapshot -> targeting -> damage -> apply -> regenerate ->
//! prune -> termination check
//!
//! Targeting and damage read the pre-tick snapshot only. Applying,
//! regenerating and pruning work on a staged copy of the fleets that is
//! committed once every chunk has settled, so a failed tick leaves the
//! battle exactly as it was.

use std::sync::Arc;

use ahash::AHashMap;

use crate::battle::damage::{accumulate, resolve_damage, total_damage};
use crate::battle::ledger::{apply_damage, prune, regenerate, SpilloverPolicy};
use crate::battle::report::{
    BattleEvent, BattleEventType, BattleOutcome, BattleResult, BattleStatus, SideReport,
    TickReport,
};
use crate::battle::snapshot::BattleSnapshot;
use crate::battle::targeting::resolve_targets;
use crate::core::config::BattleConfig;
use crate::core::error::{BattleError, Result};
use crate::core::types::{ChunkId, FleetId, Side, Tick};
use crate::fleet::{ChunkIdAllocator, Fleet, FleetSummary, ShipDesign};

/// Ships one fleet brings into a battle
#[derive(Debug, Clone)]
pub struct FleetSetup {
    pub name: String,
    pub ships: Vec<(Arc<ShipDesign>, u64)>,
}

impl FleetSetup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ships: Vec::new(),
        }
    }

    pub fn with_ships(mut self, design: Arc<ShipDesign>, count: u64) -> Self {
        self.ships.push((design, count));
        self
    }
}

/// Battle construction request
#[derive(Debug, Clone, Default)]
pub struct BattleSetup {
    pub attackers: Vec<FleetSetup>,
    pub defenders: Vec<FleetSetup>,
    /// Falls back to `BattleConfig::default_tick_cap`
    pub tick_cap: Option<Tick>,
}

/// Per-side bookkeeping while settling a tick
#[derive(Debug, Clone, Copy, Default)]
struct SideLedger {
    units_lost: u64,
    regenerated: f64,
}

/// Complete battle state
#[derive(Debug, Clone)]
pub struct Battle {
    attackers: Vec<Fleet>,
    defenders: Vec<Fleet>,
    tick: Tick,
    tick_cap: Tick,
    status: BattleStatus,
    config: BattleConfig,
    battle_log: Vec<BattleEvent>,
}

impl Battle {
    /// Build a battle from fleet setups
    ///
    /// Rejects invalid configs and sides with no ships before anything is
    /// created.
    pub fn new(setup: BattleSetup, config: BattleConfig) -> Result<Self> {
        config.validate()?;
        let tick_cap = setup.tick_cap.unwrap_or(config.default_tick_cap);
        if tick_cap == 0 {
            return Err(BattleError::InvalidConfig("tick cap must be at least 1".into()));
        }

        let mut chunk_ids = ChunkIdAllocator::new();
        let mut next_fleet = 0u32;
        let mut build_side = |side: Side, setups: Vec<FleetSetup>| -> Result<Vec<Fleet>> {
            let mut fleets = Vec::with_capacity(setups.len());
            for setup in setups {
                let mut fleet = Fleet::new(FleetId::new(next_fleet), setup.name);
                next_fleet += 1;
                for (design, count) in setup.ships {
                    fleet.add_ships(design, count, &mut chunk_ids)?;
                }
                fleets.push(fleet);
            }
            if checked_side_total(&fleets)? == 0 {
                return Err(BattleError::EmptyFleet(side));
            }
            Ok(fleets)
        };

        let attackers = build_side(Side::Attacker, setup.attackers)?;
        let defenders = build_side(Side::Defender, setup.defenders)?;

        Ok(Self {
            attackers,
            defenders,
            tick: 0,
            tick_cap,
            status: BattleStatus::Pending,
            config,
            battle_log: Vec::new(),
        })
    }

    /// One fleet per side
    pub fn skirmish(
        attackers: Vec<(Arc<ShipDesign>, u64)>,
        defenders: Vec<(Arc<ShipDesign>, u64)>,
        tick_cap: Option<Tick>,
        config: BattleConfig,
    ) -> Result<Self> {
        let setup = BattleSetup {
            attackers: vec![FleetSetup {
                name: "Attackers".into(),
                ships: attackers,
            }],
            defenders: vec![FleetSetup {
                name: "Defenders".into(),
                ships: defenders,
            }],
            tick_cap,
        };
        Self::new(setup, config)
    }

    /// Ticks completed so far
    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn tick_cap(&self) -> Tick {
        self.tick_cap
    }

    pub fn status(&self) -> BattleStatus {
        self.status
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.status.outcome()
    }

    pub fn is_concluded(&self) -> bool {
        self.status.is_concluded()
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn battle_log(&self) -> &[BattleEvent] {
        &self.battle_log
    }

    pub fn fleets(&self, side: Side) -> &[Fleet] {
        match side {
            Side::Attacker => &self.attackers,
            Side::Defender => &self.defenders,
        }
    }

    pub fn total_alive(&self, side: Side) -> u64 {
        self.fleets(side)
            .iter()
            .fold(0u64, |total, f| total.saturating_add(f.total_alive()))
    }

    pub fn summaries(&self, side: Side) -> Vec<FleetSummary> {
        self.fleets(side).iter().map(Fleet::summary).collect()
    }

    /// Terminal record, once the battle has concluded
    pub fn result(&self) -> Option<BattleResult> {
        let outcome = self.outcome()?;
        Some(BattleResult {
            outcome,
            ticks: self.tick,
            attackers: self.summaries(Side::Attacker),
            defenders: self.summaries(Side::Defender),
        })
    }

    /// Advance the battle by one tick
    ///
    /// Errors leave the battle untouched: `TickOnConcludedBattle` after the
    /// battle has ended, `NegativeOrOverflowCount` if settling a chunk
    /// broke a ledger invariant.
    pub fn run_tick(&mut self) -> Result<TickReport> {
        if let BattleStatus::Concluded(outcome) = self.status {
            return Err(BattleError::TickOnConcludedBattle {
                tick: self.tick,
                outcome: outcome.to_string(),
            });
        }

        let tick = self.tick + 1;
        let mut events = Vec::new();
        if self.status == BattleStatus::Pending {
            events.push(BattleEvent {
                tick,
                event_type: BattleEventType::BattleStarted,
                description: format!(
                    "{} attacking ships engage {} defenders",
                    self.total_alive(Side::Attacker),
                    self.total_alive(Side::Defender)
                ),
            });
        }

        // Phases 1-3: read-only over the pre-tick state
        let (from_attackers, from_defenders) = {
            let snapshot = BattleSnapshot::capture(&self.attackers, &self.defenders);
            let parallel = snapshot.live_chunks() >= self.config.parallel_threshold;
            let policy = self.config.targeting;

            let fire = |side: Side| {
                let plan = resolve_targets(
                    snapshot.side(side),
                    snapshot.side(side.opponent()),
                    policy,
                    parallel,
                );
                resolve_damage(&plan, &snapshot, tick, &self.config, parallel)
            };

            (fire(Side::Attacker), fire(Side::Defender))
        };
        let mut damage = accumulate(&from_attackers);
        damage.extend(accumulate(&from_defenders));

        // Phases 4-6: staged, committed only if every chunk settles
        let mut attackers = self.attackers.clone();
        let mut defenders = self.defenders.clone();
        let spillover = self.config.spillover;

        let mut attacker_ledger = SideLedger {
            units_lost: apply_damage_phase(&mut attackers, &damage, spillover)?,
            ..SideLedger::default()
        };
        let mut defender_ledger = SideLedger {
            units_lost: apply_damage_phase(&mut defenders, &damage, spillover)?,
            ..SideLedger::default()
        };

        attacker_ledger.regenerated = regeneration_phase(&mut attackers)?;
        defender_ledger.regenerated = regeneration_phase(&mut defenders)?;

        events.extend(prune_phase(&mut attackers, Side::Attacker, tick));
        events.extend(prune_phase(&mut defenders, Side::Defender, tick));

        // Phase 7: commit and check for termination
        self.attackers = attackers;
        self.defenders = defenders;
        self.tick = tick;
        self.status = self.evaluate_status();

        if let BattleStatus::Concluded(outcome) = self.status {
            tracing::info!(tick, %outcome, "battle concluded");
            events.push(BattleEvent {
                tick,
                event_type: BattleEventType::BattleEnded { outcome },
                description: format!("Battle ended: {}", outcome),
            });
        }

        let attacker_damage = total_damage(&from_attackers);
        let defender_damage = total_damage(&from_defenders);
        tracing::debug!(
            tick,
            attackers_alive = self.total_alive(Side::Attacker),
            defenders_alive = self.total_alive(Side::Defender),
            attacker_damage,
            defender_damage,
            "tick resolved"
        );

        self.battle_log.extend(events.iter().cloned());

        Ok(TickReport {
            tick,
            status: self.status,
            attackers: self.side_report(Side::Attacker, attacker_ledger, attacker_damage, defender_damage),
            defenders: self.side_report(Side::Defender, defender_ledger, defender_damage, attacker_damage),
            events,
        })
    }

    fn evaluate_status(&self) -> BattleStatus {
        let attackers = self.total_alive(Side::Attacker);
        let defenders = self.total_alive(Side::Defender);

        match (attackers, defenders) {
            (0, 0) => BattleStatus::Concluded(BattleOutcome::Draw),
            (_, 0) => BattleStatus::Concluded(BattleOutcome::AttackerWin),
            (0, _) => BattleStatus::Concluded(BattleOutcome::DefenderWin),
            _ if self.tick >= self.tick_cap => BattleStatus::Concluded(BattleOutcome::Timeout),
            _ => BattleStatus::InProgress,
        }
    }

    fn side_report(&self, side: Side, ledger: SideLedger, dealt: f64, received: f64) -> SideReport {
        SideReport {
            side,
            fleets: self.summaries(side),
            units_alive: self.total_alive(side),
            units_lost: ledger.units_lost,
            damage_dealt: dealt,
            damage_received: received,
            hit_points_regenerated: ledger.regenerated,
        }
    }
}

/// Ship count of one side, rejecting totals that do not fit a `u64`
fn checked_side_total(fleets: &[Fleet]) -> Result<u64> {
    let mut total = 0u64;
    for chunk in fleets.iter().flat_map(|f| f.chunks()) {
        total = total.checked_add(chunk.alive()).ok_or_else(|| {
            BattleError::ledger(chunk.id(), "side ship count overflows u64")
        })?;
    }
    Ok(total)
}

/// One `apply_damage` per damaged chunk; returns units lost
fn apply_damage_phase(
    fleets: &mut [Fleet],
    damage: &AHashMap<ChunkId, f64>,
    policy: SpilloverPolicy,
) -> Result<u64> {
    let mut lost = 0;
    for chunk in fleets.iter_mut().flat_map(|f| f.chunks.iter_mut()) {
        if let Some(&amount) = damage.get(&chunk.id) {
            lost += apply_damage(chunk, amount, policy)?.units_lost;
        }
    }
    Ok(lost)
}

fn regeneration_phase(fleets: &mut [Fleet]) -> Result<f64> {
    let mut restored = 0.0;
    for chunk in fleets.iter_mut().flat_map(|f| f.chunks.iter_mut()) {
        restored += regenerate(chunk)?;
    }
    Ok(restored)
}

fn prune_phase(fleets: &mut [Fleet], side: Side, tick: Tick) -> Vec<BattleEvent> {
    let events: Vec<BattleEvent> = fleets
        .iter()
        .flat_map(|f| f.chunks().iter())
        .filter(|c| c.is_destroyed())
        .map(|c| BattleEvent {
            tick,
            event_type: BattleEventType::ChunkDestroyed {
                side,
                chunk_id: c.id(),
                design_id: c.design_id(),
            },
            description: format!("{} chunk of {} destroyed", side, c.design().name()),
        })
        .collect();

    for fleet in fleets.iter_mut() {
        prune(fleet);
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{Chasis, ComponentSize, Weapon};
    use crate::core::types::DesignId;

    fn design(id: u32, hit_points: f64, shots: f64) -> Arc<ShipDesign> {
        let chasis = Chasis {
            size: ComponentSize::Small,
            mass: 100.0,
            cost: 100.0,
            hit_points,
            engine_slots: 0,
            engine_slot_size: ComponentSize::Small,
            weapon_slots: 1,
            weapon_slot_size: ComponentSize::Small,
        };
        let mut builder = ShipDesign::builder(DesignId::new(id), format!("D{}", id), chasis);
        if shots > 0.0 {
            builder = builder.weapon(Weapon {
                size: ComponentSize::Small,
                mass: 0.0,
                cost: 0.0,
                shots_per_tick: shots,
                damage_per_shot: 1.0,
                tracking_speed: 100.0,
            });
        }
        Arc::new(builder.build().unwrap())
    }

    #[test]
    fn test_new_battle_is_pending() {
        let battle = Battle::skirmish(
            vec![(design(1, 10.0, 1.0), 10)],
            vec![(design(2, 10.0, 1.0), 10)],
            None,
            BattleConfig::default(),
        )
        .unwrap();

        assert_eq!(battle.status(), BattleStatus::Pending);
        assert_eq!(battle.current_tick(), 0);
        assert_eq!(battle.tick_cap(), 10_000);
        assert!(battle.result().is_none());
    }

    #[test]
    fn test_empty_side_rejected() {
        let result = Battle::skirmish(
            vec![(design(1, 10.0, 1.0), 10)],
            vec![(design(2, 10.0, 1.0), 0)],
            None,
            BattleConfig::default(),
        );
        assert!(matches!(result, Err(BattleError::EmptyFleet(Side::Defender))));

        let result = Battle::new(BattleSetup::default(), BattleConfig::default());
        assert!(matches!(result, Err(BattleError::EmptyFleet(Side::Attacker))));
    }

    #[test]
    fn test_side_total_overflow_rejected() {
        let result = Battle::skirmish(
            vec![(design(1, 10.0, 1.0), u64::MAX), (design(2, 10.0, 1.0), 1)],
            vec![(design(3, 10.0, 1.0), 5)],
            Some(3),
            BattleConfig::default(),
        );
        assert!(matches!(result, Err(BattleError::NegativeOrOverflowCount { .. })));

        let mut setup = BattleSetup::default();
        setup.attackers.push(FleetSetup::new("A").with_ships(design(1, 10.0, 1.0), 5));
        setup.defenders.push(FleetSetup::new("B").with_ships(design(2, 10.0, 1.0), u64::MAX));
        setup.defenders.push(FleetSetup::new("C").with_ships(design(3, 10.0, 1.0), u64::MAX));
        let result = Battle::new(setup, BattleConfig::default());
        assert!(matches!(result, Err(BattleError::NegativeOrOverflowCount { .. })));
    }

    #[test]
    fn test_zero_tick_cap_rejected() {
        let result = Battle::skirmish(
            vec![(design(1, 10.0, 1.0), 10)],
            vec![(design(2, 10.0, 1.0), 10)],
            Some(0),
            BattleConfig::default(),
        );
        assert!(matches!(result, Err(BattleError::InvalidConfig(_))));
    }

    #[test]
    fn test_chunk_ids_span_both_sides() {
        let mut setup = BattleSetup::default();
        setup.attackers.push(
            FleetSetup::new("First")
                .with_ships(design(1, 10.0, 1.0), 5)
                .with_ships(design(2, 10.0, 1.0), 5),
        );
        setup.defenders.push(FleetSetup::new("Second").with_ships(design(3, 10.0, 1.0), 5));
        let battle = Battle::new(setup, BattleConfig::default()).unwrap();

        let defender_chunk = &battle.fleets(Side::Defender)[0].chunks()[0];
        assert_eq!(defender_chunk.id(), ChunkId::new(2));
        assert_eq!(battle.fleets(Side::Defender)[0].id(), FleetId::new(1));
    }

    #[test]
    fn test_first_tick_starts_battle() {
        let mut battle = Battle::skirmish(
            vec![(design(1, 100.0, 1.0), 10)],
            vec![(design(2, 100.0, 1.0), 10)],
            None,
            BattleConfig::with_fixed_hit_chance(1.0),
        )
        .unwrap();

        let report = battle.run_tick().unwrap();
        assert_eq!(report.tick, 1);
        assert_eq!(report.status, BattleStatus::InProgress);
        assert_eq!(report.attackers.damage_dealt, 10.0);
        assert_eq!(report.defenders.damage_received, 10.0);
        assert!(matches!(report.events[0].event_type, BattleEventType::BattleStarted));
        assert_eq!(battle.battle_log().len(), 1);
    }

    #[test]
    fn test_tick_on_concluded_battle_rejected() {
        let mut battle = Battle::skirmish(
            vec![(design(1, 10.0, 100.0), 10)],
            vec![(design(2, 10.0, 0.0), 1)],
            None,
            BattleConfig::with_fixed_hit_chance(1.0),
        )
        .unwrap();

        battle.run_tick().unwrap();
        assert_eq!(battle.outcome(), Some(BattleOutcome::AttackerWin));

        let err = battle.run_tick().unwrap_err();
        assert!(matches!(err, BattleError::TickOnConcludedBattle { tick: 1, .. }));
        assert_eq!(battle.current_tick(), 1);
    }

    #[test]
    fn test_tick_cap_times_out() {
        let mut battle = Battle::skirmish(
            vec![(design(1, 10.0, 0.0), 10)],
            vec![(design(2, 10.0, 0.0), 10)],
            Some(3),
            BattleConfig::default(),
        )
        .unwrap();

        battle.run_tick().unwrap();
        battle.run_tick().unwrap();
        let report = battle.run_tick().unwrap();
        assert_eq!(report.status, BattleStatus::Concluded(BattleOutcome::Timeout));
        assert_eq!(battle.result().unwrap().ticks, 3);
    }

    #[test]
    fn test_destroyed_chunks_pruned_and_logged() {
        let mut battle = Battle::skirmish(
            vec![(design(1, 10.0, 10.0), 10)],
            vec![(design(2, 10.0, 0.0), 5), (design(3, 1000.0, 0.0), 5)],
            None,
            BattleConfig::with_fixed_hit_chance(1.0),
        )
        .unwrap();

        let report = battle.run_tick().unwrap();
        assert_eq!(report.defenders.units_lost, 5);
        assert_eq!(battle.fleets(Side::Defender)[0].chunks().len(), 1);
        assert!(report.events.iter().any(|e| matches!(
            e.event_type,
            BattleEventType::ChunkDestroyed { side: Side::Defender, .. }
        )));
    }
}
