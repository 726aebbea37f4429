use serde::{Deserialize, Serialize};

/// Heuristic policy knobs.
///
/// The defaults are empirically tuned against the live arena; they are policy,
/// not contract, and every consumer takes them by reference so a harness can
/// override individual values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tunables {
    /// Base score for growing onto a cell directly adjacent to an enemy organ.
    /// Large enough to outrank every non-defensive category.
    pub close_defense_base: i32,
    /// Score penalty for expanding onto a cell one of our own harvesters
    /// feeds from.
    pub harvested_penalty: i32,
    /// Minimum projected territory gain along a sporer's line before growing
    /// a new sporer is worth the three-organ investment.
    pub sporer_min_gain: i32,
    /// A sporer line cell must be at least this many steps out to count
    /// toward the line's score.
    pub sporer_min_reach: usize,
    /// Score of the guaranteed WAIT fallback.
    pub wait_score: i32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            close_defense_base: 1000,
            harvested_penalty: 5,
            sporer_min_gain: 8,
            sporer_min_reach: 3,
            wait_score: 1,
        }
    }
}
