//! The public game handle
//!
//! [`Game`] owns the configuration, the state aggregate and the random source.
//! Every mutating call is a transaction: the state is checkpointed first and
//! restored if the call fails, so a rejected action never leaves a trace.

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::events::{resolve_bonus, resolve_burnout};
use crate::game_state::{GameState, Phase};
use crate::model::{
    CardId, DecisionKind, Dollars, EndgameSummary, GameSnapshot, Payment, PaymentId,
    PaymentMethod, PendingDecision, SavingsBucket,
};
use crate::payments::{self, PaymentReceipt};
use crate::random::RandomSource;
use crate::resolver::{self, RoundOutcome};
use crate::scheduler::{self, WithdrawalOutcome};

#[derive(Debug, Clone)]
pub struct Game<R: RandomSource = SmallRng> {
    config: GameConfig,
    state: GameState,
    rng: R,
}

impl Game<SmallRng> {
    /// Start a seeded game and open round 1.
    pub fn new(config: GameConfig, difficulty_id: &str, housing_id: &str, seed: u64) -> Result<Self> {
        Self::with_random(config, difficulty_id, housing_id, SmallRng::seed_from_u64(seed))
    }
}

impl<R: RandomSource> Game<R> {
    /// Start a game driven by `rng` and open round 1.
    pub fn with_random(config: GameConfig, difficulty_id: &str, housing_id: &str, rng: R) -> Result<Self> {
        let state = GameState::new(&config, difficulty_id, housing_id)?;
        let mut game = Self { config, state, rng };

        tracing::info!(
            job = %game.state.job.label,
            pay = game.state.job.pay,
            home = %game.state.home.label,
            rent = game.state.home.cost,
            "starting game"
        );
        resolver::start_round(&mut game.state, &game.config, &mut game.rng);
        Ok(game)
    }

    // === Transactions ===

    /// Run `op` against the state, rolling every change back on error.
    fn transact<T>(
        &mut self,
        op: impl FnOnce(&mut GameState, &GameConfig, &mut R) -> Result<T>,
    ) -> Result<T> {
        let checkpoint = self.state.clone();
        match op(&mut self.state, &self.config, &mut self.rng) {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::debug!(round = checkpoint.round, %err, "action rejected");
                self.state = checkpoint;
                Err(err)
            }
        }
    }

    /// Answer-side gate: the game must be paused on a decision of `kind`.
    fn expect_decision(&self, kind: DecisionKind) -> Result<PendingDecision> {
        match &self.state.phase {
            Phase::GameOver { .. } | Phase::Victory => Err(GameError::GameOver),
            Phase::AwaitingDecision { decision } if decision.kind() == kind => Ok(decision.clone()),
            _ => Err(GameError::NoPendingDecision(kind)),
        }
    }

    // === Player actions ===

    pub fn apply_payment(
        &mut self,
        card_id: CardId,
        amount: Dollars,
        method: PaymentMethod,
    ) -> Result<PaymentReceipt> {
        self.transact(|state, config, rng| {
            state.ensure_accepting_input()?;
            payments::apply_payment(state, config, rng, card_id, amount, method)
        })
    }

    pub fn pay_card_in_full(&mut self, card_id: CardId) -> Result<PaymentReceipt> {
        self.transact(|state, config, rng| {
            state.ensure_accepting_input()?;
            payments::pay_in_full(state, config, rng, card_id)
        })
    }

    pub fn undo_payment(&mut self, card_id: CardId, payment_id: PaymentId) -> Result<Payment> {
        self.transact(|state, _, _| {
            state.ensure_accepting_input()?;
            payments::undo_payment(state, card_id, payment_id)
        })
    }

    pub fn request_withdrawal(
        &mut self,
        bucket: SavingsBucket,
        amount: Dollars,
    ) -> Result<WithdrawalOutcome> {
        self.transact(|state, config, _| {
            state.ensure_accepting_input()?;
            Ok(scheduler::request_withdrawal(state, config, bucket, amount)?)
        })
    }

    /// End the round. Pauses first when unpaid bills would become debt.
    pub fn advance_round(&mut self) -> Result<RoundOutcome> {
        self.transact(|state, config, rng| {
            state.ensure_accepting_input()?;
            Ok(resolver::advance(state, config, rng))
        })
    }

    // === Decisions ===

    /// Accept the debt conversion and resolve the round, or back out unchanged.
    pub fn confirm_pending_obligations(&mut self, accept: bool) -> Result<RoundOutcome> {
        self.expect_decision(DecisionKind::Obligations)?;
        self.transact(|state, config, rng| {
            if !accept {
                tracing::debug!(round = state.round, "advance cancelled");
                state.phase = Phase::AwaitingInput;
                return Ok(RoundOutcome::Cancelled);
            }
            Ok(resolver::resolve_round(state, config, rng))
        })
    }

    pub fn confirm_burnout_choice(&mut self, take_break: bool) -> Result<RoundOutcome> {
        let decision = self.expect_decision(DecisionKind::Burnout)?;
        self.transact(|state, config, rng| {
            if let PendingDecision::Burnout { break_cost } = decision {
                resolve_burnout(state, &config.event_costs, break_cost, take_break);
            }
            Ok(resolver::resume_events(state, config, rng))
        })
    }

    pub fn confirm_bonus_allocation(&mut self, auto_allocate: bool) -> Result<RoundOutcome> {
        let decision = self.expect_decision(DecisionKind::Bonus)?;
        self.transact(|state, config, rng| {
            if let PendingDecision::Bonus { amount } = decision {
                resolve_bonus(state, &config.event_costs, amount, auto_allocate);
            }
            Ok(resolver::resume_events(state, config, rng))
        })
    }

    /// `true` plays on into the next year, `false` retires as a winner.
    pub fn confirm_victory_continue(&mut self, keep_playing: bool) -> Result<RoundOutcome> {
        self.expect_decision(DecisionKind::Victory)?;
        self.transact(|state, config, rng| {
            Ok(resolver::finish_year(state, config, rng, keep_playing))
        })
    }

    // === Queries ===

    pub fn pending_decision(&self) -> Option<&PendingDecision> {
        self.state.pending_decision()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn round(&self) -> u32 {
        self.state.round
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Drain advisory messages accumulated since the last call.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.state.notices)
    }

    pub fn endgame_summary(&self) -> EndgameSummary {
        self.state.endgame_summary()
    }

    /// Mutable access for tests that need to stage a specific situation.
    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}
