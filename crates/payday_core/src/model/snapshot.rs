//! Read-only views handed to the presentation layer

use serde::{Deserialize, Serialize};

use super::card::Card;
use super::decision::PendingDecision;
use super::ledger::{DebtRecord, Dollars, Savings};
use super::schedule::ScheduledWithdrawal;

/// Causal story of a finished round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundLog {
    pub round: u32,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    AwaitingDecision { decision: PendingDecision },
    GameOver { reason: String },
    Victory,
}

/// Everything a UI needs to draw the board after a mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub round: u32,
    pub job_pay: Dollars,
    pub rent: Dollars,
    pub cash: Dollars,
    pub debt: Dollars,
    pub qol: i32,
    pub savings: Savings,
    pub liquidity: Dollars,
    pub nest_egg: Dollars,
    pub net_worth: Dollars,
    pub health_coverage: bool,
    pub retirement_match_this_round: Dollars,
    pub last_market_factor: f64,
    pub cards: Vec<Card>,
    pub debt_records: Vec<DebtRecord>,
    pub scheduled_withdrawals: Vec<ScheduledWithdrawal>,
    pub last_log: Option<RoundLog>,
    pub notices: Vec<String>,
    pub status: GameStatus,
}

/// Where the nest egg leaves the player at the end of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetirementOutlook {
    EarlyRetirement,
    OnTrack,
    Comfortable,
    WorkingForever,
}

impl RetirementOutlook {
    pub fn from_balance(balance: Dollars) -> Self {
        match balance {
            b if b >= 4_000 => RetirementOutlook::EarlyRetirement,
            b if b >= 2_000 => RetirementOutlook::OnTrack,
            b if b >= 500 => RetirementOutlook::Comfortable,
            _ => RetirementOutlook::WorkingForever,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RetirementOutlook::EarlyRetirement => "Early retirement at 55!",
            RetirementOutlook::OnTrack => "On track for 65.",
            RetirementOutlook::Comfortable => "Comfortable but keep investing.",
            RetirementOutlook::WorkingForever => "You will be working until you are 82.",
        }
    }
}

/// Final net worth picture shown on exit or game over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndgameSummary {
    pub victory: bool,
    pub round: u32,
    pub qol: i32,
    pub net_worth: Dollars,
    pub liquidity: Dollars,
    pub nest_egg: Dollars,
    pub debt: Dollars,
    pub cash: Dollars,
    pub savings: Savings,
    pub outlook: RetirementOutlook,
}
