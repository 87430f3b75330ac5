//! Component catalogue - static stat tables for ship parts

pub mod components;
pub mod registry;

pub use components::{Chasis, ComponentSize, Defence, Engine, ShipComponent, Weapon};
pub use registry::{ComponentCatalogue, DesignSpec};
