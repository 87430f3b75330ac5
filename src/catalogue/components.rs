//! Ship component stat records
//!
//! Every item that can be attached to a ship is a component. Components
//! are plain immutable records; the catalogue owns them and designs copy
//! the ones they use.

use serde::{Deserialize, Serialize};

/// Hull and slot size class
///
/// Ordered, so a slot of a given size accepts components of that size or
/// smaller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentSize {
    /// Scouts
    Small,
    /// Destroyers, bombers
    Medium,
    /// Cruisers
    Large,
    /// Suncruisers, starbases
    Capital,
}

impl std::fmt::Display for ComponentSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ComponentSize::Small => "small",
            ComponentSize::Medium => "medium",
            ComponentSize::Large => "large",
            ComponentSize::Capital => "capital",
        };
        write!(f, "{}", name)
    }
}

/// Shared capabilities of everything that can be bolted onto a hull
pub trait ShipComponent {
    /// Mass, used for evasiveness
    fn mass(&self) -> f64;
    /// Cost of attaching the component
    fn cost(&self) -> f64;
    fn size(&self) -> ComponentSize;
}

/// Hull: base hit points and slot layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chasis {
    pub size: ComponentSize,
    pub mass: f64,
    pub cost: f64,
    /// Base hit points of the ship type
    pub hit_points: f64,
    pub engine_slots: u32,
    /// Largest engine the hull can mount
    pub engine_slot_size: ComponentSize,
    pub weapon_slots: u32,
    /// Largest weapon the hull can mount
    pub weapon_slot_size: ComponentSize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub size: ComponentSize,
    pub mass: f64,
    pub cost: f64,
    pub shots_per_tick: f64,
    /// Hit points removed by each shot that connects
    pub damage_per_shot: f64,
    /// Higher value means a higher chance to hit
    pub tracking_speed: f64,
}

impl Weapon {
    /// Expected output per tick if every shot hits
    pub fn damage_per_tick(&self) -> f64 {
        self.shots_per_tick * self.damage_per_shot
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Engine {
    pub size: ComponentSize,
    pub mass: f64,
    pub cost: f64,
    pub thrust: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defence {
    pub size: ComponentSize,
    pub mass: f64,
    pub cost: f64,
    /// Hit points granted, if any
    pub hit_points: f64,
    /// Hit points regenerated per tick, if any
    pub regen_per_tick: f64,
}

macro_rules! impl_ship_component {
    ($($ty:ty),*) => {
        $(
            impl ShipComponent for $ty {
                fn mass(&self) -> f64 {
                    self.mass
                }

                fn cost(&self) -> f64 {
                    self.cost
                }

                fn size(&self) -> ComponentSize {
                    self.size
                }
            }
        )*
    };
}

impl_ship_component!(Chasis, Weapon, Engine, Defence);

/// Total mass of a list of components
pub fn total_mass<C: ShipComponent>(components: &[C]) -> f64 {
    components.iter().map(ShipComponent::mass).sum()
}

/// Total cost of a list of components
pub fn total_cost<C: ShipComponent>(components: &[C]) -> f64 {
    components.iter().map(ShipComponent::cost).sum()
}
