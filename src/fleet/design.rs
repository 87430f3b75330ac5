//! Ship designs: a chasis plus its weapons, engines and defences
//!
//! A design is validated once at construction and never changes, so its
//! aggregate stats are computed up front and shared by every chunk that
//! flies it (chunks hold an `Arc<ShipDesign>`).

use serde::Serialize;

use crate::catalogue::components::{
    total_cost, total_mass, Chasis, ComponentSize, Defence, Engine, ShipComponent, Weapon,
};
use crate::core::error::{BattleError, Result};
use crate::core::types::DesignId;

/// Aggregate per-unit stats derived from a design's components
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DesignStats {
    pub mass: f64,
    pub cost: f64,
    /// Chasis plus defence hit points
    pub hit_points: f64,
    pub thrust: f64,
    pub regen_per_tick: f64,
    /// Sum over weapons of shots × damage per shot
    pub damage_per_tick: f64,
    pub shots_per_tick: f64,
    /// Sum over weapons; the accuracy proxy for hit chance
    pub tracking_speed: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShipDesign {
    id: DesignId,
    name: String,
    chasis: Chasis,
    weapons: Vec<Weapon>,
    engines: Vec<Engine>,
    defences: Vec<Defence>,
    stats: DesignStats,
}

impl ShipDesign {
    /// Assemble and validate a design
    ///
    /// Fails with `InvalidDesign` when a slot count or slot size is
    /// exceeded, a stat is negative or not finite, or the design ends up
    /// with no hit points.
    pub fn new(
        id: DesignId,
        name: impl Into<String>,
        chasis: Chasis,
        weapons: Vec<Weapon>,
        engines: Vec<Engine>,
        defences: Vec<Defence>,
    ) -> Result<Self> {
        let name = name.into();
        validate_layout(&name, &chasis, &weapons, &engines)?;
        validate_stats(&name, &chasis, &weapons, &engines, &defences)?;

        let stats = DesignStats {
            mass: chasis.mass + total_mass(&weapons) + total_mass(&engines) + total_mass(&defences),
            cost: chasis.cost + total_cost(&weapons) + total_cost(&engines) + total_cost(&defences),
            hit_points: chasis.hit_points + defences.iter().map(|d| d.hit_points).sum::<f64>(),
            thrust: engines.iter().map(|e| e.thrust).sum(),
            regen_per_tick: defences.iter().map(|d| d.regen_per_tick).sum(),
            damage_per_tick: weapons.iter().map(Weapon::damage_per_tick).sum(),
            shots_per_tick: weapons.iter().map(|w| w.shots_per_tick).sum(),
            tracking_speed: weapons.iter().map(|w| w.tracking_speed).sum(),
        };

        if stats.hit_points <= 0.0 {
            return Err(BattleError::invalid_design(
                &name,
                "total hit points must be positive",
            ));
        }

        Ok(Self {
            id,
            name,
            chasis,
            weapons,
            engines,
            defences,
            stats,
        })
    }

    /// Start a design on the given chasis
    pub fn builder(id: DesignId, name: impl Into<String>, chasis: Chasis) -> DesignBuilder {
        DesignBuilder {
            id,
            name: name.into(),
            chasis,
            weapons: Vec::new(),
            engines: Vec::new(),
            defences: Vec::new(),
        }
    }

    pub fn id(&self) -> DesignId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chasis(&self) -> &Chasis {
        &self.chasis
    }

    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    pub fn engines(&self) -> &[Engine] {
        &self.engines
    }

    pub fn defences(&self) -> &[Defence] {
        &self.defences
    }

    pub fn stats(&self) -> &DesignStats {
        &self.stats
    }

    /// Per-unit hit points (chasis + defences)
    pub fn hit_points(&self) -> f64 {
        self.stats.hit_points
    }

    pub fn thrust(&self) -> f64 {
        self.stats.thrust
    }

    pub fn regen_per_tick(&self) -> f64 {
        self.stats.regen_per_tick
    }

    pub fn damage_per_tick(&self) -> f64 {
        self.stats.damage_per_tick
    }

    pub fn tracking_speed(&self) -> f64 {
        self.stats.tracking_speed
    }

    /// Largest weapon mounted, if the design is armed
    pub fn largest_weapon_size(&self) -> Option<ComponentSize> {
        self.weapons.iter().map(|w| w.size).max()
    }

    pub fn is_armed(&self) -> bool {
        self.stats.damage_per_tick > 0.0
    }
}

impl ShipComponent for ShipDesign {
    fn mass(&self) -> f64 {
        self.stats.mass
    }

    fn cost(&self) -> f64 {
        self.stats.cost
    }

    fn size(&self) -> ComponentSize {
        self.chasis.size
    }
}

/// Incremental construction of a `ShipDesign`
#[derive(Debug, Clone)]
pub struct DesignBuilder {
    id: DesignId,
    name: String,
    chasis: Chasis,
    weapons: Vec<Weapon>,
    engines: Vec<Engine>,
    defences: Vec<Defence>,
}

impl DesignBuilder {
    pub fn weapon(mut self, weapon: Weapon) -> Self {
        self.weapons.push(weapon);
        self
    }

    pub fn engine(mut self, engine: Engine) -> Self {
        self.engines.push(engine);
        self
    }

    pub fn defence(mut self, defence: Defence) -> Self {
        self.defences.push(defence);
        self
    }

    pub fn build(self) -> Result<ShipDesign> {
        ShipDesign::new(
            self.id,
            self.name,
            self.chasis,
            self.weapons,
            self.engines,
            self.defences,
        )
    }
}

fn validate_layout(
    name: &str,
    chasis: &Chasis,
    weapons: &[Weapon],
    engines: &[Engine],
) -> Result<()> {
    if weapons.len() > chasis.weapon_slots as usize {
        return Err(BattleError::invalid_design(
            name,
            format!(
                "{} weapons but only {} weapon slots",
                weapons.len(),
                chasis.weapon_slots
            ),
        ));
    }
    if let Some(weapon) = weapons.iter().find(|w| w.size > chasis.weapon_slot_size) {
        return Err(BattleError::invalid_design(
            name,
            format!(
                "{} weapon does not fit {} weapon slots",
                weapon.size, chasis.weapon_slot_size
            ),
        ));
    }

    if engines.len() > chasis.engine_slots as usize {
        return Err(BattleError::invalid_design(
            name,
            format!(
                "{} engines but only {} engine slots",
                engines.len(),
                chasis.engine_slots
            ),
        ));
    }
    if let Some(engine) = engines.iter().find(|e| e.size > chasis.engine_slot_size) {
        return Err(BattleError::invalid_design(
            name,
            format!(
                "{} engine does not fit {} engine slots",
                engine.size, chasis.engine_slot_size
            ),
        ));
    }

    Ok(())
}

fn validate_stats(
    name: &str,
    chasis: &Chasis,
    weapons: &[Weapon],
    engines: &[Engine],
    defences: &[Defence],
) -> Result<()> {
    let mut values = vec![
        ("chasis mass", chasis.mass),
        ("chasis cost", chasis.cost),
        ("chasis hit points", chasis.hit_points),
    ];
    for w in weapons {
        values.extend([
            ("weapon mass", w.mass),
            ("weapon cost", w.cost),
            ("shots per tick", w.shots_per_tick),
            ("damage per shot", w.damage_per_shot),
            ("tracking speed", w.tracking_speed),
        ]);
    }
    for e in engines {
        values.extend([
            ("engine mass", e.mass),
            ("engine cost", e.cost),
            ("thrust", e.thrust),
        ]);
    }
    for d in defences {
        values.extend([
            ("defence mass", d.mass),
            ("defence cost", d.cost),
            ("defence hit points", d.hit_points),
            ("regen per tick", d.regen_per_tick),
        ]);
    }

    match values.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
        Some((label, value)) => Err(BattleError::invalid_design(
            name,
            format!("{} must be a non-negative number, got {}", label, value),
        )),
        None => Ok(()),
    }
}
