//! Multi-tick driver with cancellation between ticks
//!
//! A tick is never interrupted. Cancellation is checked before each tick,
//! so a cancelled run always stops on a fully completed tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::battle::execution::Battle;
use crate::battle::report::{BattleResult, TickReport};
use crate::core::error::Result;
use crate::core::types::Tick;

/// Shared flag for stopping a run from another thread
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RunOutcome {
    Concluded(BattleResult),
    /// Stopped by the token; `last_report` is the last completed tick of
    /// this run, if any ran
    Cancelled {
        tick: Tick,
        last_report: Option<TickReport>,
    },
}

/// Run until the battle concludes or `cancel` fires
pub fn run_to_conclusion(battle: &mut Battle, cancel: &CancelToken) -> Result<RunOutcome> {
    run_with_observer(battle, cancel, |_| {})
}

/// Like `run_to_conclusion`, handing every tick report to `on_tick`
pub fn run_with_observer<F>(
    battle: &mut Battle,
    cancel: &CancelToken,
    mut on_tick: F,
) -> Result<RunOutcome>
where
    F: FnMut(&TickReport),
{
    let mut last_report = None;
    loop {
        if let Some(result) = battle.result() {
            return Ok(RunOutcome::Concluded(result));
        }
        if cancel.is_cancelled() {
            tracing::warn!(tick = battle.current_tick(), "battle run cancelled");
            return Ok(RunOutcome::Cancelled {
                tick: battle.current_tick(),
                last_report,
            });
        }

        let report = battle.run_tick()?;
        on_tick(&report);
        last_report = Some(report);
    }
}

/// Run at most `ticks` ticks, stopping early if the battle concludes
pub fn run_for(battle: &mut Battle, ticks: Tick) -> Result<Vec<TickReport>> {
    let mut reports = Vec::new();
    for _ in 0..ticks {
        if battle.is_concluded() {
            break;
        }
        reports.push(battle.run_tick()?);
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::report::BattleOutcome;
    use crate::catalogue::{Chasis, ComponentSize, Weapon};
    use crate::core::config::BattleConfig;
    use crate::core::types::DesignId;
    use crate::fleet::ShipDesign;

    fn gunship(id: u32, hit_points: f64) -> Arc<ShipDesign> {
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
        Arc::new(
            ShipDesign::builder(DesignId::new(id), "Gunship", chasis)
                .weapon(Weapon {
                    size: ComponentSize::Small,
                    mass: 0.0,
                    cost: 0.0,
                    shots_per_tick: 1.0,
                    damage_per_shot: 1.0,
                    tracking_speed: 100.0,
                })
                .build()
                .unwrap(),
        )
    }

    fn slow_battle() -> Battle {
        Battle::skirmish(
            vec![(gunship(1, 1000.0), 10)],
            vec![(gunship(2, 1000.0), 10)],
            Some(50),
            BattleConfig::with_fixed_hit_chance(1.0),
        )
        .unwrap()
    }

    #[test]
    fn test_run_to_conclusion_reaches_outcome() {
        let mut battle = slow_battle();
        let outcome = run_to_conclusion(&mut battle, &CancelToken::new()).unwrap();
        match outcome {
            RunOutcome::Concluded(result) => {
                assert_eq!(result.outcome, BattleOutcome::Timeout);
                assert_eq!(result.ticks, 50);
            }
            other => panic!("expected conclusion, got {:?}", other),
        }
    }

    #[test]
    fn test_cancel_before_start_runs_nothing() {
        let mut battle = slow_battle();
        let cancel = CancelToken::new();
        cancel.cancel();

        let outcome = run_to_conclusion(&mut battle, &cancel).unwrap();
        assert_eq!(outcome, RunOutcome::Cancelled { tick: 0, last_report: None });
        assert_eq!(battle.current_tick(), 0);
    }

    #[test]
    fn test_cancel_from_observer_stops_on_whole_tick() {
        let mut battle = slow_battle();
        let cancel = CancelToken::new();
        let observer_token = cancel.clone();

        let outcome = run_with_observer(&mut battle, &cancel, |report| {
            if report.tick == 7 {
                observer_token.cancel();
            }
        })
        .unwrap();

        match outcome {
            RunOutcome::Cancelled { tick, last_report } => {
                assert_eq!(tick, 7);
                assert_eq!(last_report.map(|r| r.tick), Some(7));
            }
            other => panic!("expected cancellation, got {:?}", other),
        }
        assert_eq!(battle.current_tick(), 7);

        // Resuming picks up where the cancelled run stopped
        let reports = run_for(&mut battle, 3).unwrap();
        assert_eq!(reports.first().map(|r| r.tick), Some(8));
    }

    #[test]
    fn test_run_for_stops_at_conclusion() {
        let mut battle = Battle::skirmish(
            vec![(gunship(1, 10.0), 100)],
            vec![(gunship(2, 10.0), 1)],
            None,
            BattleConfig::with_fixed_hit_chance(1.0),
        )
        .unwrap();

        let reports = run_for(&mut battle, 10).unwrap();
        assert_eq!(reports.len(), 1);
        assert!(battle.is_concluded());
    }
}
