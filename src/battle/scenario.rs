//! Scenario files: catalogue, designs, fleets and config in one TOML
//!
//! ```toml
//! tick_cap = 500
//!
//! [config]
//! targeting = "focus_weakest"
//!
//! [[designs]]
//! id = 1
//! name = "Scout Mk1"
//! chasis = "Scout"
//! weapons = ["SmallProjectile", "SmallProjectile"]
//!
//! [[attackers]]
//! name = "First Fleet"
//! chunks = [{ design = "Scout Mk1", count = 100000 }]
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::battle::execution::{Battle, BattleSetup, FleetSetup};
use crate::catalogue::{ComponentCatalogue, DesignSpec};
use crate::core::config::BattleConfig;
use crate::core::error::{BattleError, Result};
use crate::core::types::Tick;
use crate::fleet::ShipDesign;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub tick_cap: Option<Tick>,
    #[serde(default)]
    pub config: BattleConfig,
    /// Extra components on top of the built-in catalogue
    #[serde(default)]
    pub catalogue: Option<ComponentCatalogue>,
    #[serde(default)]
    pub designs: Vec<DesignSpec>,
    #[serde(default)]
    pub attackers: Vec<FleetSpec>,
    #[serde(default)]
    pub defenders: Vec<FleetSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FleetSpec {
    pub name: String,
    #[serde(default)]
    pub chunks: Vec<ChunkSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkSpec {
    /// Design name
    pub design: String,
    pub count: u64,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    pub fn parse_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Built-in components plus the scenario's own
    pub fn catalogue(&self) -> ComponentCatalogue {
        let mut catalogue = ComponentCatalogue::with_defaults();
        if let Some(extra) = &self.catalogue {
            catalogue.extend(extra.clone());
        }
        catalogue
    }

    /// Resolve every design, keyed by name
    pub fn designs(&self) -> Result<HashMap<String, Arc<ShipDesign>>> {
        let catalogue = self.catalogue();
        let mut designs = HashMap::new();
        let mut ids = HashSet::new();
        for spec in &self.designs {
            if !ids.insert(spec.id) {
                return Err(BattleError::invalid_design(
                    &spec.name,
                    format!("design id {} is declared twice", spec.id),
                ));
            }
            let design = Arc::new(catalogue.build_design(spec)?);
            if designs.insert(spec.name.clone(), design).is_some() {
                return Err(BattleError::invalid_design(
                    &spec.name,
                    "design name is declared twice",
                ));
            }
        }
        Ok(designs)
    }

    /// Validate everything and create the battle
    pub fn build(&self) -> Result<Battle> {
        let designs = self.designs()?;
        let fleets = |specs: &[FleetSpec]| -> Result<Vec<FleetSetup>> {
            let mut setups = Vec::with_capacity(specs.len());
            for spec in specs {
                let mut setup = FleetSetup::new(spec.name.clone());
                for chunk in &spec.chunks {
                    let design = designs
                        .get(&chunk.design)
                        .ok_or_else(|| BattleError::UnknownDesign(chunk.design.clone()))?;
                    setup = setup.with_ships(design.clone(), chunk.count);
                }
                setups.push(setup);
            }
            Ok(setups)
        };

        let setup = BattleSetup {
            attackers: fleets(&self.attackers)?,
            defenders: fleets(&self.defenders)?,
            tick_cap: self.tick_cap,
        };
        Battle::new(setup, self.config.clone())
    }
}
