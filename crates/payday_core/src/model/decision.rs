//! Player decision points
//!
//! The engine never blocks. When it needs an answer it parks in a paused
//! state carrying one of these descriptors, and the caller resumes it through
//! the matching `confirm_*` operation on [`crate::Game`].

use serde::{Deserialize, Serialize};

use super::card::CardKind;
use super::ids::CardId;
use super::ledger::Dollars;

/// An obligation that becomes debt if the round is advanced now
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObligationPreview {
    pub card_id: CardId,
    pub title: String,
    pub kind: CardKind,
    /// Unpaid part of the bill
    pub owed: Dollars,
    /// Debt that will actually be recorded (owed + penalty, or debt-on-miss)
    pub debt_added: Dollars,
    pub qol_penalty: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingDecision {
    /// Unpaid bills are about to convert into debt plus penalties
    Obligations { obligations: Vec<ObligationPreview> },
    /// Take a paid break or push through
    Burnout { break_cost: Dollars },
    /// Auto-allocate a windfall or take it all as cash
    Bonus { amount: Dollars },
    /// A full year survived: exit as a winner or keep going
    Victory { round: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    Obligations,
    Burnout,
    Bonus,
    Victory,
}

impl PendingDecision {
    pub fn kind(&self) -> DecisionKind {
        match self {
            PendingDecision::Obligations { .. } => DecisionKind::Obligations,
            PendingDecision::Burnout { .. } => DecisionKind::Burnout,
            PendingDecision::Bonus { .. } => DecisionKind::Bonus,
            PendingDecision::Victory { .. } => DecisionKind::Victory,
        }
    }

    /// Question to put in front of the player
    pub fn prompt(&self) -> String {
        match self {
            PendingDecision::Obligations { obligations } => {
                let total: Dollars = obligations.iter().map(|o| o.debt_added).sum();
                format!(
                    "You have {} unpaid expense(s) that will become ${total} of debt + penalties. Continue?",
                    obligations.len()
                )
            }
            PendingDecision::Burnout { break_cost } => format!(
                "Burnout warning! Take a mental health break (lose ${break_cost}, QoL +10) or push through?"
            ),
            PendingDecision::Bonus { amount } => format!(
                "Unexpected bonus! +${amount}. Auto-allocate 50% to debt, 30% to savings, 20% to cash?"
            ),
            PendingDecision::Victory { round } => format!(
                "You've survived a full year (now at round {round})! Exit with your victory recap or keep playing?"
            ),
        }
    }
}

impl std::fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionKind::Obligations => write!(f, "unpaid obligations"),
            DecisionKind::Burnout => write!(f, "burnout"),
            DecisionKind::Bonus => write!(f, "bonus allocation"),
            DecisionKind::Victory => write!(f, "victory"),
        }
    }
}
