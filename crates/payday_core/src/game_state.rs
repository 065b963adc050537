use serde::{Deserialize, Serialize};

use crate::config::{GameConfig, HousingOption, JobOption};
use crate::error::{ConfigError, GameError};
use crate::model::{
    Coverage, DebtCorrelation, DebtRecordId, Deck, Dollars, EndgameSummary, Flags, GameSnapshot,
    GameStatus, IdAllocator, Ledger, PendingDecision, RetirementOutlook, RoundLog,
    ScheduledWithdrawal, VariableTracker,
};

/// Where the round state machine currently sits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    AwaitingInput,
    AwaitingDecision { decision: PendingDecision },
    GameOver { reason: String },
    Victory,
}

/// Stage of the event engine to resume from after a mid-round decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStep {
    SlipRecovery,
    MarketHabit,
    WinterSlip,
    HeatingSpike,
    Burnout,
    PerformanceReview,
    Layoff,
    Bonus,
    RentHike,
    CarBreakdown,
}

impl EventStep {
    pub const FIRST: EventStep = EventStep::SlipRecovery;

    pub fn next(self) -> Option<EventStep> {
        Some(match self {
            EventStep::SlipRecovery => EventStep::MarketHabit,
            EventStep::MarketHabit => EventStep::WinterSlip,
            EventStep::WinterSlip => EventStep::HeatingSpike,
            EventStep::HeatingSpike => EventStep::Burnout,
            EventStep::Burnout => EventStep::PerformanceReview,
            EventStep::PerformanceReview => EventStep::Layoff,
            EventStep::Layoff => EventStep::Bonus,
            EventStep::Bonus => EventStep::RentHike,
            EventStep::RentHike => EventStep::CarBreakdown,
            EventStep::CarBreakdown => return None,
        })
    }
}

/// The whole game, owned in one place and passed explicitly to every operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub round: u32,
    pub qol: i32,
    pub job: JobOption,
    pub home: HousingOption,
    pub ledger: Ledger,
    pub deck: Deck,
    pub flags: Flags,
    pub coverage: Coverage,
    pub variable_tracker: VariableTracker,
    pub scheduled_withdrawals: Vec<ScheduledWithdrawal>,
    pub retirement_match_this_round: Dollars,
    pub last_market_factor: f64,
    pub last_log: Option<RoundLog>,
    /// Advisory messages not yet shown to the player
    pub notices: Vec<String>,
    pub phase: Phase,
    /// Where the event engine stopped for a burnout or bonus decision
    pub(crate) event_cursor: Option<EventStep>,
    pub(crate) ids: IdAllocator,
}

impl GameState {
    /// Fresh state before the first round starts.
    pub fn new(config: &GameConfig, difficulty_id: &str, housing_id: &str) -> Result<Self, ConfigError> {
        config.validate()?;
        let job = config.job(difficulty_id)?.clone();
        let home = config.home(housing_id)?.clone();

        Ok(Self {
            round: 1,
            qol: config.starting_qol.clamp(0, 100),
            job,
            home,
            ledger: Ledger::with_cash(config.starting_cash),
            deck: Deck::default(),
            flags: Flags {
                next_victory_round: config.rounds_per_year,
                ..Default::default()
            },
            coverage: Coverage::default(),
            variable_tracker: VariableTracker::default(),
            scheduled_withdrawals: Vec::new(),
            retirement_match_this_round: 0,
            last_market_factor: 1.0,
            last_log: None,
            notices: Vec::new(),
            phase: Phase::AwaitingInput,
            event_cursor: None,
            ids: IdAllocator::default(),
        })
    }

    // === Phase ===

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver { .. } | Phase::Victory)
    }

    pub fn pending_decision(&self) -> Option<&PendingDecision> {
        match &self.phase {
            Phase::AwaitingDecision { decision } => Some(decision),
            _ => None,
        }
    }

    /// Gate for player actions: only legal while waiting for input.
    pub fn ensure_accepting_input(&self) -> Result<(), GameError> {
        match &self.phase {
            Phase::AwaitingInput => Ok(()),
            Phase::AwaitingDecision { decision } => Err(GameError::DecisionPending(decision.kind())),
            Phase::GameOver { .. } | Phase::Victory => Err(GameError::GameOver),
        }
    }

    pub fn status(&self) -> GameStatus {
        match &self.phase {
            Phase::AwaitingInput => GameStatus::InProgress,
            Phase::AwaitingDecision { decision } => GameStatus::AwaitingDecision {
                decision: decision.clone(),
            },
            Phase::GameOver { reason } => GameStatus::GameOver {
                reason: reason.clone(),
            },
            Phase::Victory => GameStatus::Victory,
        }
    }

    // === QoL ===

    /// Clamp QoL into `[0, 100]`. Hitting zero ends the game on the spot.
    pub fn adjust_qol(&mut self, delta: i32) {
        if self.is_over() {
            return;
        }
        self.qol = (self.qol + delta).clamp(0, 100);
        if self.qol == 0 {
            tracing::info!(round = self.round, "quality of life hit zero");
            self.phase = Phase::GameOver {
                reason: "Game Over: Your Quality of Life hit zero.".into(),
            };
        }
    }

    // === Money ===

    /// Record debt and keep the debt card target in sync.
    pub fn record_debt(
        &mut self,
        amount: Dollars,
        reason: impl Into<String>,
        correlation: DebtCorrelation,
    ) -> DebtRecordId {
        let id = self.ledger.record_debt(amount, reason, correlation);
        self.deck.sync_debt_card(self.ledger.debt);
        id
    }

    /// Rent + utilities + car + student loan, plus the health premium when covered
    pub fn monthly_fixed_estimate(&self, config: &GameConfig) -> Dollars {
        let bills = &config.bills;
        let health = if self.coverage.health {
            bills.health_premium
        } else {
            0
        };
        self.home.cost + bills.utilities + bills.car_payment + bills.student_loan + health
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(round = self.round, "{message}");
        self.notices.push(message);
    }

    // === Views ===

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            round: self.round,
            job_pay: self.job.pay,
            rent: self.home.cost,
            cash: self.ledger.cash,
            debt: self.ledger.debt,
            qol: self.qol,
            savings: self.ledger.savings,
            liquidity: self.ledger.liquidity(),
            nest_egg: self.ledger.nest_egg(),
            net_worth: self.ledger.net_worth(),
            health_coverage: self.coverage.health,
            retirement_match_this_round: self.retirement_match_this_round,
            last_market_factor: self.last_market_factor,
            cards: self.deck.cards().to_vec(),
            debt_records: self.ledger.debt_records.clone(),
            scheduled_withdrawals: self.scheduled_withdrawals.clone(),
            last_log: self.last_log.clone(),
            notices: self.notices.clone(),
            status: self.status(),
        }
    }

    pub fn endgame_summary(&self) -> EndgameSummary {
        EndgameSummary {
            victory: self.phase == Phase::Victory,
            round: self.round,
            qol: self.qol,
            net_worth: self.ledger.net_worth(),
            liquidity: self.ledger.liquidity(),
            nest_egg: self.ledger.nest_egg(),
            debt: self.ledger.debt,
            cash: self.ledger.cash,
            savings: self.ledger.savings,
            outlook: RetirementOutlook::from_balance(self.ledger.nest_egg()),
        }
    }
}
