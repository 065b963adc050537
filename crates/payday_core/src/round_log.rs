//! Causal log for a finished round
//!
//! Pure reporting: reads what happened and turns it into "Because you ..."
//! lines. Nothing here touches the ledger or the deck.

use serde::{Deserialize, Serialize};

use crate::config::VariableRules;
use crate::model::{Card, CardId, CardKind, Dollars, RoundLog, SavingsBucket};
use crate::variable::{VariableEffect, VariableOutcome};

/// A missed obligation that was turned into debt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtConversion {
    pub card_id: CardId,
    pub title: String,
    pub kind: CardKind,
    /// Unpaid part of the bill
    pub owed: Dollars,
    pub debt_added: Dollars,
    pub qol_penalty: i32,
}

/// Everything the log is built from
#[derive(Debug, Clone, Copy)]
pub struct RoundFacts<'a> {
    pub round: u32,
    pub cards: &'a [Card],
    pub conversions: &'a [DebtConversion],
    pub variable: &'a VariableOutcome,
    pub rules: &'a VariableRules,
    /// Savings balances that stay put in their own bucket
    pub kept_savings: &'a [(SavingsBucket, Dollars)],
    pub swept_cash: Dollars,
}

pub fn build_round_log(facts: &RoundFacts<'_>) -> RoundLog {
    let mut lines = Vec::new();
    let mut total_credit = 0;

    for card in facts.cards.iter().filter(|c| !c.is_savings()) {
        let paid = card.paid();
        let credit = card.credit_paid();
        total_credit += credit;

        if card.kind == CardKind::Variable {
            continue;
        }
        let title = card.title.to_lowercase();
        if paid >= card.amount {
            if credit > 0 {
                lines.push(format!(
                    "Because you put ${credit} of {} on credit, your debt grew and interest can pile up.",
                    card.title
                ));
            } else {
                lines.push(format!(
                    "Because you paid {} in full, you avoided fees and protected your credit score.",
                    card.title
                ));
            }
        } else if card.optional {
            lines.push(format!(
                "Because you skipped {title}, you're still exposed if something goes wrong."
            ));
        } else {
            let left = (card.amount - paid).max(0);
            lines.push(format!(
                "Because you skipped {title}, ${left} will follow you and can trigger penalties."
            ));
        }
    }

    for conversion in facts.conversions {
        let title = conversion.title.to_lowercase();
        let penalty = conversion.debt_added - conversion.owed;
        if conversion.kind == CardKind::Fixed && penalty > 0 {
            lines.push(format!(
                "Because you missed {title}, debt jumped by ${} (${} bill + ${penalty} penalty) and QoL dropped.",
                conversion.debt_added, conversion.owed
            ));
        } else {
            lines.push(format!(
                "Because you missed {title}, ${} moved to debt and QoL dropped.",
                conversion.debt_added
            ));
        }
    }

    if total_credit > 0 {
        lines.push(format!(
            "Because you used credit this round, your balance grew by ${total_credit}; paying it off soon avoids interest."
        ));
    }

    for outcome in &facts.variable.categories {
        let label = facts.rules.rule(outcome.category).title.to_lowercase();
        lines.push(match outcome.effect {
            VariableEffect::Boost(boost) => format!(
                "Because you spent ${} on {label}, QoL rose by {boost} (diminishing returns).",
                outcome.spend
            ),
            VariableEffect::HeldSteady => {
                format!("Because you covered {label}, QoL held steady.")
            }
            VariableEffect::Penalty(penalty) => format!(
                "Because you underfunded {label} for {} round(s), QoL fell by {penalty}.",
                outcome.missed_rounds
            ),
            VariableEffect::Tolerated => format!(
                "Because you spent only ${} on {label}, QoL didn't improve; wait too long and it will drop.",
                outcome.spend
            ),
        });
    }

    for &(bucket, balance) in facts.kept_savings {
        match bucket {
            SavingsBucket::Vacation => lines.push(format!(
                "Because you set aside money for your vacation fund, ${balance} stays in your HYSA-style trip fund earning interest and can be scheduled for next round."
            )),
            SavingsBucket::Retirement => lines.push(format!(
                "Because you invested for retirement, ${balance} stays locked in your nest egg earning market returns."
            )),
            _ => {}
        }
    }

    if facts.swept_cash > 0 {
        lines.push(format!(
            "Because you swept ${} of leftover balance into your emergency fund, it will start earning interest instead of sitting idle.",
            facts.swept_cash
        ));
    }

    RoundLog {
        round: facts.round,
        lines,
    }
}
