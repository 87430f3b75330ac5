//! Target selection for one side's chunks against the opposing side
//!
//! Pure function of the snapshot: the same chunks always produce the same
//! assignments, which keeps battles replayable.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalogue::{ComponentSize, ShipComponent};
use crate::core::types::ChunkId;
use crate::fleet::FleetChunk;

/// How attacking chunks pick their targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetingPolicy {
    /// Everyone fires at the opposing chunk with the fewest ships left,
    /// oldest chunk first on ties
    #[default]
    FocusWeakest,
    /// Like `FocusWeakest`, but prefer hulls of the attacker's largest
    /// weapon size when any are left
    SizeMatched,
    /// Split fire over every opposing chunk in proportion to its ship count
    Proportional,
}

/// Fraction of an attacker's fire aimed at one chunk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetShare {
    pub target: ChunkId,
    pub share: f64,
}

/// Targets of one attacking chunk for the current tick
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub attacker: ChunkId,
    pub targets: Vec<TargetShare>,
}

/// Side-wide selection, computed once and then handed to each attacker
enum Selection {
    Nothing,
    Single(ChunkId),
    BySize {
        by_size: BTreeMap<ComponentSize, ChunkId>,
        fallback: ChunkId,
    },
    Spread(Vec<TargetShare>),
}

impl Selection {
    fn build(candidates: &[&FleetChunk], policy: TargetingPolicy) -> Self {
        let Some(fallback) = weakest(candidates.iter().copied()) else {
            return Selection::Nothing;
        };

        match policy {
            TargetingPolicy::FocusWeakest => Selection::Single(fallback),
            TargetingPolicy::SizeMatched => {
                let mut by_size: BTreeMap<ComponentSize, Vec<&FleetChunk>> = BTreeMap::new();
                for &chunk in candidates {
                    by_size.entry(chunk.design().size()).or_default().push(chunk);
                }
                let by_size = by_size
                    .into_iter()
                    .filter_map(|(size, chunks)| Some((size, weakest(chunks.into_iter())?)))
                    .collect();
                Selection::BySize { by_size, fallback }
            }
            TargetingPolicy::Proportional => {
                let total: u128 = candidates.iter().map(|c| u128::from(c.alive())).sum();
                let shares = candidates
                    .iter()
                    .map(|c| TargetShare {
                        target: c.id(),
                        share: c.alive() as f64 / total as f64,
                    })
                    .collect();
                Selection::Spread(shares)
            }
        }
    }

    fn targets_for(&self, attacker: &FleetChunk) -> Vec<TargetShare> {
        let single = |target| vec![TargetShare { target, share: 1.0 }];
        match self {
            Selection::Nothing => Vec::new(),
            Selection::Single(target) => single(*target),
            Selection::BySize { by_size, fallback } => {
                let preferred = attacker
                    .design()
                    .largest_weapon_size()
                    .and_then(|size| by_size.get(&size));
                single(*preferred.unwrap_or(fallback))
            }
            Selection::Spread(shares) => shares.clone(),
        }
    }
}

/// Lowest live count wins; ties go to the lowest (oldest) chunk id
fn weakest<'a>(chunks: impl Iterator<Item = &'a FleetChunk>) -> Option<ChunkId> {
    chunks
        .filter(|c| !c.is_destroyed())
        .min_by_key(|c| (c.alive(), c.id()))
        .map(FleetChunk::id)
}

/// Assign targets to every armed chunk in `attackers`
///
/// Unarmed chunks deal no damage and get no assignment. With no live
/// opposing chunks every assignment has an empty target list.
pub fn resolve_targets(
    attackers: &[&FleetChunk],
    defenders: &[&FleetChunk],
    policy: TargetingPolicy,
    parallel: bool,
) -> Vec<Assignment> {
    let live: Vec<&FleetChunk> = defenders
        .iter()
        .copied()
        .filter(|c| !c.is_destroyed())
        .collect();
    let selection = Selection::build(&live, policy);

    let assign = |attacker: &&FleetChunk| Assignment {
        attacker: attacker.id(),
        targets: selection.targets_for(attacker),
    };
    let armed = |attacker: &&&FleetChunk| !attacker.is_destroyed() && attacker.design().is_armed();

    if parallel {
        attackers.par_iter().filter(armed).map(assign).collect()
    } else {
        attackers.iter().filter(armed).map(assign).collect()
    }
}
