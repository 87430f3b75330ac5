//! Component catalogue: named stat tables for every component kind
//!
//! The catalogue is read-only once built. Designs are assembled from it by
//! name, either in code or from `DesignSpec` records in a scenario file.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalogue::components::{Chasis, ComponentSize, Defence, Engine, Weapon};
use crate::core::error::{BattleError, Result};
use crate::core::types::DesignId;
use crate::fleet::design::ShipDesign;

/// Catalogue of all available components, keyed by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentCatalogue {
    chasis: BTreeMap<String, Chasis>,
    weapons: BTreeMap<String, Weapon>,
    engines: BTreeMap<String, Engine>,
    defences: BTreeMap<String, Defence>,
}

/// Design expressed as component names, resolved against a catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSpec {
    pub id: u32,
    pub name: String,
    pub chasis: String,
    #[serde(default)]
    pub weapons: Vec<String>,
    #[serde(default)]
    pub engines: Vec<String>,
    #[serde(default)]
    pub defences: Vec<String>,
}

impl ComponentCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in starter components
    pub fn with_defaults() -> Self {
        let mut catalogue = Self::new();

        catalogue.add_chasis(
            "Scout",
            Chasis {
                size: ComponentSize::Small,
                mass: 1500.0,
                cost: 1500.0,
                hit_points: 5.0,
                engine_slots: 2,
                engine_slot_size: ComponentSize::Small,
                weapon_slots: 4,
                weapon_slot_size: ComponentSize::Small,
            },
        );

        catalogue.add_weapon(
            "SmallProjectile",
            Weapon {
                size: ComponentSize::Small,
                mass: 5.0,
                cost: 50.0,
                shots_per_tick: 5.0,
                damage_per_shot: 1.0,
                tracking_speed: 500.0,
            },
        );

        catalogue.add_engine(
            "SmallThruster",
            Engine {
                size: ComponentSize::Small,
                mass: 5.0,
                cost: 500.0,
                thrust: 5.0,
            },
        );

        catalogue.add_defence(
            "SmallArmour",
            Defence {
                size: ComponentSize::Small,
                mass: 50.0,
                cost: 50.0,
                hit_points: 10.0,
                regen_per_tick: 0.0,
            },
        );

        catalogue
    }

    /// Load a catalogue from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse a catalogue from a TOML string
    ///
    /// Tables are keyed by component name:
    /// `[weapons.SmallProjectile]`, `[chasis.Scout]`, ...
    pub fn parse_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn add_chasis(&mut self, name: impl Into<String>, chasis: Chasis) {
        self.chasis.insert(name.into(), chasis);
    }

    pub fn add_weapon(&mut self, name: impl Into<String>, weapon: Weapon) {
        self.weapons.insert(name.into(), weapon);
    }

    pub fn add_engine(&mut self, name: impl Into<String>, engine: Engine) {
        self.engines.insert(name.into(), engine);
    }

    pub fn add_defence(&mut self, name: impl Into<String>, defence: Defence) {
        self.defences.insert(name.into(), defence);
    }

    /// Add every component of `other`, replacing same-named entries
    pub fn extend(&mut self, other: ComponentCatalogue) {
        self.chasis.extend(other.chasis);
        self.weapons.extend(other.weapons);
        self.engines.extend(other.engines);
        self.defences.extend(other.defences);
    }

    pub fn chasis(&self, name: &str) -> Result<&Chasis> {
        self.chasis.get(name).ok_or_else(|| unknown("chasis", name))
    }

    pub fn weapon(&self, name: &str) -> Result<&Weapon> {
        self.weapons.get(name).ok_or_else(|| unknown("weapon", name))
    }

    pub fn engine(&self, name: &str) -> Result<&Engine> {
        self.engines.get(name).ok_or_else(|| unknown("engine", name))
    }

    pub fn defence(&self, name: &str) -> Result<&Defence> {
        self.defences.get(name).ok_or_else(|| unknown("defence", name))
    }

    /// Names of every component, grouped by kind
    pub fn component_names(&self) -> impl Iterator<Item = (&'static str, &str)> {
        let chasis = self.chasis.keys().map(|k| ("chasis", k.as_str()));
        let weapons = self.weapons.keys().map(|k| ("weapon", k.as_str()));
        let engines = self.engines.keys().map(|k| ("engine", k.as_str()));
        let defences = self.defences.keys().map(|k| ("defence", k.as_str()));
        chasis.chain(weapons).chain(engines).chain(defences)
    }

    /// Resolve a named design into a validated `ShipDesign`
    pub fn build_design(&self, spec: &DesignSpec) -> Result<ShipDesign> {
        let chasis = self.chasis(&spec.chasis)?.clone();
        let weapons = spec
            .weapons
            .iter()
            .map(|n| self.weapon(n).cloned())
            .collect::<Result<Vec<_>>>()?;
        let engines = spec
            .engines
            .iter()
            .map(|n| self.engine(n).cloned())
            .collect::<Result<Vec<_>>>()?;
        let defences = spec
            .defences
            .iter()
            .map(|n| self.defence(n).cloned())
            .collect::<Result<Vec<_>>>()?;

        ShipDesign::new(
            DesignId::new(spec.id),
            spec.name.clone(),
            chasis,
            weapons,
            engines,
            defences,
        )
    }
}

fn unknown(kind: &'static str, name: &str) -> BattleError {
    BattleError::UnknownComponent {
        kind,
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::components::ShipComponent;

    fn scout_spec() -> DesignSpec {
        DesignSpec {
            id: 1,
            name: "Scout Mk1".into(),
            chasis: "Scout".into(),
            weapons: vec!["SmallProjectile".into(), "SmallProjectile".into()],
            engines: vec!["SmallThruster".into()],
            defences: vec!["SmallArmour".into()],
        }
    }

    #[test]
    fn test_defaults_contain_starter_components() {
        let catalogue = ComponentCatalogue::with_defaults();
        assert_eq!(catalogue.chasis("Scout").unwrap().hit_points, 5.0);
        assert_eq!(catalogue.weapon("SmallProjectile").unwrap().tracking_speed, 500.0);
        assert_eq!(catalogue.engine("SmallThruster").unwrap().thrust, 5.0);
        assert_eq!(catalogue.defence("SmallArmour").unwrap().hit_points, 10.0);
        assert_eq!(catalogue.component_names().count(), 4);
    }

    #[test]
    fn test_build_design_from_spec() {
        let catalogue = ComponentCatalogue::with_defaults();
        let design = catalogue.build_design(&scout_spec()).unwrap();
        assert_eq!(design.id(), DesignId::new(1));
        assert_eq!(design.name(), "Scout Mk1");
        assert_eq!(design.cost(), 2150.0);
        assert_eq!(design.weapons().len(), 2);
    }

    #[test]
    fn test_unknown_component_reported() {
        let catalogue = ComponentCatalogue::with_defaults();
        let mut spec = scout_spec();
        spec.weapons.push("DeathRay".into());
        match catalogue.build_design(&spec) {
            Err(BattleError::UnknownComponent { kind, name }) => {
                assert_eq!(kind, "weapon");
                assert_eq!(name, "DeathRay");
            }
            other => panic!("expected unknown component, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_toml_catalogue() {
        let toml_str = r#"
            [chasis.Frigate]
            size = "medium"
            mass = 4000.0
            cost = 3500.0
            hit_points = 40.0
            engine_slots = 2
            engine_slot_size = "medium"
            weapon_slots = 3
            weapon_slot_size = "medium"

            [weapons.Railgun]
            size = "medium"
            mass = 40.0
            cost = 400.0
            shots_per_tick = 1.0
            damage_per_shot = 12.0
            tracking_speed = 300.0

            [defences.Shield]
            size = "medium"
            mass = 30.0
            cost = 600.0
            hit_points = 20.0
            regen_per_tick = 2.0
        "#;

        let mut catalogue = ComponentCatalogue::with_defaults();
        catalogue.extend(ComponentCatalogue::parse_toml(toml_str).unwrap());

        assert_eq!(catalogue.chasis("Frigate").unwrap().size, ComponentSize::Medium);
        assert_eq!(catalogue.weapon("Railgun").unwrap().damage_per_tick(), 12.0);
        assert_eq!(catalogue.defence("Shield").unwrap().regen_per_tick, 2.0);
        assert!(catalogue.chasis("Scout").is_ok());
    }

    #[test]
    fn test_invalid_toml_reported() {
        let result = ComponentCatalogue::parse_toml("[weapons.Broken]\nsize = \"tiny\"");
        assert!(matches!(result, Err(BattleError::TomlError(_))));
    }
}
