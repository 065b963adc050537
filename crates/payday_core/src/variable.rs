//! Variable spending evaluator
//!
//! Food and entertainment move QoL with diminishing returns above their base
//! spend and with growing penalties for every consecutive round below it.

use serde::{Deserialize, Serialize};

use crate::config::VariableRules;
use crate::model::{Deck, Dollars, SpendCategory, VariableTracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "qol", rename_all = "snake_case")]
pub enum VariableEffect {
    Boost(i32),
    /// Base covered, boost rounded down to nothing
    HeldSteady,
    Penalty(i32),
    /// Under base but still inside the grace period
    Tolerated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOutcome {
    pub category: SpendCategory,
    pub spend: Dollars,
    pub missed_rounds: u32,
    pub effect: VariableEffect,
}

impl CategoryOutcome {
    pub fn qol_delta(&self) -> i32 {
        match self.effect {
            VariableEffect::Boost(boost) => boost,
            VariableEffect::Penalty(penalty) => -penalty,
            VariableEffect::HeldSteady | VariableEffect::Tolerated => 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableOutcome {
    pub categories: Vec<CategoryOutcome>,
}

impl VariableOutcome {
    pub fn qol_delta(&self) -> i32 {
        self.categories.iter().map(CategoryOutcome::qol_delta).sum()
    }
}

/// `round(max_boost * sqrt(min(1, spend / max_spend)))`, zero for no spend
pub fn calc_boost(spend: Dollars, max_spend: Dollars, max_boost: i32) -> i32 {
    if spend <= 0 || max_spend <= 0 {
        return 0;
    }
    let ratio = (spend as f64 / max_spend as f64).min(1.0);
    (f64::from(max_boost) * ratio.sqrt()).round() as i32
}

/// Penalty after `missed` consecutive under-funded rounds, at most `cap`
pub fn miss_penalty(category: SpendCategory, missed: u32, cap: i32) -> i32 {
    let missed = missed.min(1_000) as i32;
    match category {
        SpendCategory::Food => (6 + missed * 5).min(cap),
        SpendCategory::Entertainment if missed >= 2 => (3 * (missed - 1) + 1).min(cap),
        SpendCategory::Entertainment => 0,
    }
}

pub fn category_spend(deck: &Deck, category: SpendCategory) -> Dollars {
    deck.cards()
        .iter()
        .filter(|c| c.meta.category == Some(category))
        .map(|c| c.paid())
        .sum()
}

/// Score one round of variable spending. Updates the miss counters; the
/// caller applies [`VariableOutcome::qol_delta`] once.
pub fn evaluate(deck: &Deck, rules: &VariableRules, tracker: &mut VariableTracker) -> VariableOutcome {
    let categories = SpendCategory::ALL
        .iter()
        .map(|&category| {
            let rule = rules.rule(category);
            let spend = category_spend(deck, category);

            if spend >= rule.base {
                tracker.reset(category);
                let boost = calc_boost(spend, rule.max, rule.qol_boost_max);
                CategoryOutcome {
                    category,
                    spend,
                    missed_rounds: 0,
                    effect: if boost > 0 {
                        VariableEffect::Boost(boost)
                    } else {
                        VariableEffect::HeldSteady
                    },
                }
            } else {
                let missed_rounds = tracker.record_miss(category);
                let penalty = miss_penalty(category, missed_rounds, rule.penalty_cap);
                CategoryOutcome {
                    category,
                    spend,
                    missed_rounds,
                    effect: if penalty > 0 {
                        VariableEffect::Penalty(penalty)
                    } else {
                        VariableEffect::Tolerated
                    },
                }
            }
        })
        .collect();

    VariableOutcome { categories }
}
