use thiserror::Error;

use crate::core::types::{ChunkId, Side, Tick};

#[derive(Error, Debug)]
pub enum BattleError {
    #[error("Invalid ship design '{design}': {reason}")]
    InvalidDesign { design: String, reason: String },

    #[error("The {0} side has no ships")]
    EmptyFleet(Side),

    #[error("Battle already concluded at tick {tick} ({outcome})")]
    TickOnConcludedBattle { tick: Tick, outcome: String },

    #[error("Ledger invariant violated for chunk {chunk:?}: {detail}")]
    NegativeOrOverflowCount { chunk: ChunkId, detail: String },

    #[error("Unknown {kind} component: {name}")]
    UnknownComponent { kind: &'static str, name: String },

    #[error("Unknown ship design: {0}")]
    UnknownDesign(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl BattleError {
    pub(crate) fn invalid_design(design: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDesign {
            design: design.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn ledger(chunk: ChunkId, detail: impl Into<String>) -> Self {
        Self::NegativeOrOverflowCount {
            chunk,
            detail: detail.into(),
        }
    }

    /// True for errors that indicate a resolution bug rather than bad input
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::NegativeOrOverflowCount { .. })
    }
}

pub type Result<T> = std::result::Result<T, BattleError>;
