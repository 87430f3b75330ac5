//! Property tests for design aggregation and the chunk ledger

use std::sync::Arc;

use proptest::prelude::*;

use fleet_battle::battle::*;
use fleet_battle::catalogue::*;
use fleet_battle::core::config::BattleConfig;
use fleet_battle::core::types::{ChunkId, DesignId, Side};
use fleet_battle::fleet::{FleetChunk, ShipDesign};

#[derive(Debug, Clone)]
struct Shape {
    chasis_mass: f64,
    chasis_cost: f64,
    hit_points: f64,
    guns: Vec<(f64, f64, f64, f64)>,
    armour: Option<(f64, f64, f64, f64)>,
}

fn shape() -> impl Strategy<Value = Shape> {
    (
        10.0f64..5_000.0,
        0.0f64..5_000.0,
        1.0f64..100.0,
        prop::collection::vec((0.0f64..50.0, 0.0f64..5.0, 0.0f64..10.0, 0.0f64..1_000.0), 0..4),
        prop::option::of((0.0f64..100.0, 0.0f64..500.0, 0.0f64..50.0, 0.0f64..5.0)),
    )
        .prop_map(|(chasis_mass, chasis_cost, hit_points, guns, armour)| Shape {
            chasis_mass,
            chasis_cost,
            hit_points,
            guns,
            armour,
        })
}

fn build(id: u32, shape: &Shape) -> Arc<ShipDesign> {
    let chasis = Chasis {
        size: ComponentSize::Medium,
        mass: shape.chasis_mass,
        cost: shape.chasis_cost,
        hit_points: shape.hit_points,
        engine_slots: 1,
        engine_slot_size: ComponentSize::Medium,
        weapon_slots: 4,
        weapon_slot_size: ComponentSize::Medium,
    };
    let mut builder = ShipDesign::builder(DesignId::new(id), format!("Design {}", id), chasis);
    for &(mass, shots, damage, tracking) in &shape.guns {
        builder = builder.weapon(Weapon {
            size: ComponentSize::Small,
            mass,
            cost: mass * 10.0,
            shots_per_tick: shots,
            damage_per_shot: damage,
            tracking_speed: tracking,
        });
    }
    if let Some((mass, cost, hit_points, regen)) = shape.armour {
        builder = builder.defence(Defence {
            size: ComponentSize::Small,
            mass,
            cost,
            hit_points,
            regen_per_tick: regen,
        });
    }
    Arc::new(builder.build().unwrap())
}

fn side() -> impl Strategy<Value = Vec<(Shape, u64)>> {
    prop::collection::vec((shape(), 1u64..20_000), 1..4)
}

fn policies() -> impl Strategy<Value = (TargetingPolicy, SpilloverPolicy)> {
    (
        prop_oneof![
            Just(TargetingPolicy::FocusWeakest),
            Just(TargetingPolicy::SizeMatched),
            Just(TargetingPolicy::Proportional),
        ],
        prop_oneof![
            Just(SpilloverPolicy::CarryRemainder),
            Just(SpilloverPolicy::DestroyDamaged),
        ],
    )
}

fn battle(
    attackers: &[(Shape, u64)],
    defenders: &[(Shape, u64)],
    config: BattleConfig,
) -> Battle {
    let designs = |ships: &[(Shape, u64)], base: u32| -> Vec<(Arc<ShipDesign>, u64)> {
        ships
            .iter()
            .enumerate()
            .map(|(i, (s, count))| (build(base + i as u32, s), *count))
            .collect()
    };
    Battle::skirmish(designs(attackers, 0), designs(defenders, 100), Some(30), config).unwrap()
}

proptest! {
    #[test]
    fn design_totals_are_component_sums(shape in shape()) {
        let design = build(1, &shape);
        let stats = design.stats();

        let gun_mass: f64 = shape.guns.iter().map(|g| g.0).sum();
        let gun_cost: f64 = shape.guns.iter().map(|g| g.0 * 10.0).sum();
        let (armour_mass, armour_cost) = shape.armour.map(|a| (a.0, a.1)).unwrap_or((0.0, 0.0));

        let mass = shape.chasis_mass + gun_mass + armour_mass;
        let cost = shape.chasis_cost + gun_cost + armour_cost;
        prop_assert!((stats.mass - mass).abs() <= 1e-9 * mass.max(1.0));
        prop_assert!((stats.cost - cost).abs() <= 1e-9 * cost.max(1.0));
        prop_assert_eq!(design.mass(), stats.mass);
        prop_assert_eq!(design.cost(), stats.cost);
    }

    #[test]
    fn ledger_never_goes_negative_or_grows(
        attackers in side(),
        defenders in side(),
        (targeting, spillover) in policies(),
    ) {
        let config = BattleConfig { targeting, spillover, ..BattleConfig::default() };
        let mut battle = battle(&attackers, &defenders, config);
        let mut previous = [
            battle.total_alive(Side::Attacker),
            battle.total_alive(Side::Defender),
        ];

        while !battle.is_concluded() {
            battle.run_tick().unwrap();
            for (i, side) in [Side::Attacker, Side::Defender].into_iter().enumerate() {
                let alive = battle.total_alive(side);
                prop_assert!(alive <= previous[i]);
                previous[i] = alive;

                for chunk in battle.fleets(side).iter().flat_map(|f| f.chunks()) {
                    prop_assert!(chunk.alive() > 0);
                    prop_assert!(chunk.defence_pool() >= 0.0);
                    prop_assert!(chunk.defence_pool() <= chunk.max_defence_pool() * (1.0 + 1e-9));
                }
            }
        }
        prop_assert!(battle.current_tick() <= 30);
    }

    #[test]
    fn identical_battles_agree(
        attackers in side(),
        defenders in side(),
        (targeting, spillover) in policies(),
        seed in any::<u64>(),
    ) {
        let config = BattleConfig {
            targeting,
            spillover,
            seed,
            volley_variance: 0.2,
            ..BattleConfig::default()
        };
        let mut first = battle(&attackers, &defenders, config.clone());
        let mut second = battle(&attackers, &defenders, config);

        prop_assert_eq!(run_for(&mut first, 30).unwrap(), run_for(&mut second, 30).unwrap());
    }

    #[test]
    fn prune_is_idempotent(
        attackers in side(),
        defenders in side(),
        ticks in 1u64..10,
    ) {
        let mut battle = battle(&attackers, &defenders, BattleConfig::default());
        run_for(&mut battle, ticks).unwrap();

        for side in [Side::Attacker, Side::Defender] {
            for fleet in battle.fleets(side) {
                let mut pruned = fleet.clone();
                prop_assert_eq!(prune(&mut pruned), 0);
                prop_assert_eq!(pruned.chunks().len(), fleet.chunks().len());
                prop_assert_eq!(pruned.total_alive(), fleet.total_alive());
            }
        }
    }

    #[test]
    fn damage_covering_the_pool_wipes_the_chunk(
        hit_points in 1.0f64..100.0,
        count in 1u64..100_000,
        spillover in prop_oneof![
            Just(SpilloverPolicy::CarryRemainder),
            Just(SpilloverPolicy::DestroyDamaged),
        ],
    ) {
        let shape = Shape {
            chasis_mass: 100.0,
            chasis_cost: 100.0,
            hit_points,
            guns: Vec::new(),
            armour: None,
        };
        let mut chunk = FleetChunk::new(ChunkId::new(0), build(1, &shape), count);
        let pool = chunk.defence_pool();

        let outcome = apply_damage(&mut chunk, pool, spillover).unwrap();
        prop_assert_eq!(outcome.units_lost, count);
        prop_assert_eq!(chunk.alive(), 0);
        prop_assert_eq!(chunk.defence_pool(), 0.0);
    }

    #[test]
    fn partial_damage_keeps_at_least_the_undamaged_units(
        hit_points in 1.0f64..100.0,
        count in 2u64..100_000,
        fraction in 0.0f64..1.0,
    ) {
        let shape = Shape {
            chasis_mass: 100.0,
            chasis_cost: 100.0,
            hit_points,
            guns: Vec::new(),
            armour: None,
        };
        let mut chunk = FleetChunk::new(ChunkId::new(0), build(1, &shape), count);
        let damage = chunk.defence_pool() * fraction;

        apply_damage(&mut chunk, damage, SpilloverPolicy::CarryRemainder).unwrap();
        let untouched = ((count as f64 * hit_points - damage) / hit_points).floor() as u64;
        prop_assert!(chunk.alive() >= untouched);
        prop_assert!(chunk.alive() <= count);
    }
}
