//! Per-game switches, counters and risk accumulators

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::card::SpendCategory;

/// One-time unlocks, cooldowns and risk counters. Initialized at game start
/// and never reset until a new game begins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    pub rent_hiked: bool,
    pub side_hustle_unlocked: bool,
    pub bootcamp_done: bool,
    pub market_habit_active: bool,

    // === Cooldowns ===
    /// Rounds of layoff (no paycheck) still to serve
    pub layoff_rounds_left: u32,
    /// Rounds of injury recovery still to serve
    pub slip_recovery_rounds: u32,
    /// Consecutive rounds with an unpaid dental checkup
    pub dental_misses: u32,
    pub dental_bomb_pending: bool,
    /// Round of the last performance review (0 = never)
    pub last_performance_review: u32,

    // === Risk ===
    pub burnout_risk: u32,
    pub layoff_risk: u32,

    // === Victory ===
    pub offered_victory: bool,
    /// The victory offer fires once the round counter passes this value
    pub next_victory_round: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    pub health: bool,
}

/// Consecutive under-funded rounds per variable category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableTracker {
    missed: FxHashMap<SpendCategory, u32>,
}

impl VariableTracker {
    pub fn missed_rounds(&self, category: SpendCategory) -> u32 {
        self.missed.get(&category).copied().unwrap_or(0)
    }

    /// Bump and return the new miss count.
    pub fn record_miss(&mut self, category: SpendCategory) -> u32 {
        let entry = self.missed.entry(category).or_insert(0);
        *entry += 1;
        *entry
    }

    pub fn reset(&mut self, category: SpendCategory) {
        self.missed.insert(category, 0);
    }
}
