//! Fleet Battle - aggregate combat for fleets of hundreds of thousands of ships

pub mod battle;
pub mod catalogue;
pub mod core;
pub mod fleet;
