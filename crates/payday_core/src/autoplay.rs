//! Scripted players
//!
//! Deterministic policies that drive a [`Game`] through its public API, used
//! for batch statistics, benchmarks and long-running property tests.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::Result;
use crate::game::Game;
use crate::model::{
    Card, CardKind, Dollars, EndgameSummary, GameStatus, OnPaidEffect, PaymentMethod,
    PendingDecision, SavingsBucket, TrackKey,
};
use crate::random::RandomSource;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Bills, bare-minimum spending, every spare dollar saved
    Frugal,
    /// Bills, base spending, retirement up to the match, some self-improvement
    #[default]
    Balanced,
    /// Bills on whatever pays for them, maximum fun, no savings
    Spender,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Frugal, Strategy::Balanced, Strategy::Spender];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Frugal => "frugal",
            Strategy::Balanced => "balanced",
            Strategy::Spender => "spender",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown strategy '{s}' (expected frugal, balanced or spender)"))
    }
}

/// Knobs for a scripted game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoplayOptions {
    pub strategy: Strategy,
    pub difficulty: String,
    pub housing: String,
    /// Stop once the round counter passes this value
    pub max_round: u32,
}

impl Default for AutoplayOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::Balanced,
            difficulty: "med".into(),
            housing: "apt".into(),
            max_round: 27,
        }
    }
}

/// Plays turns and answers prompts for one strategy
#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    pub strategy: Strategy,
    /// Keep playing through victory offers until this round
    pub max_round: u32,
}

impl Autopilot {
    pub fn new(strategy: Strategy, max_round: u32) -> Self {
        Self {
            strategy,
            max_round,
        }
    }

    /// Spend the current round's money according to the strategy.
    pub fn play_turn<R: RandomSource>(&self, game: &mut Game<R>) {
        let cards: Vec<Card> = game.state().deck.cards().to_vec();

        // Obligations first, in the order they appeared
        for card in cards.iter().filter(|c| is_obligation(c)) {
            if card.remaining().unwrap_or(0) > 0 {
                self.attempt(game.pay_card_in_full(card.id));
            }
        }

        for card in cards.iter().filter(|c| c.kind == CardKind::Variable) {
            let target = self.variable_target(game, card);
            self.pay_cash(game, card, target);
        }

        for card in cards.iter().filter(|c| c.kind == CardKind::Opportunity) {
            if self.wants(game, card) {
                self.pay_cash(game, card, card.amount);
            }
        }

        if self.strategy != Strategy::Spender {
            if let Some(debt_card) = game.state().deck.debt_card().cloned() {
                let spare = game.state().ledger.cash - self.cash_reserve(game);
                self.pay_cash(game, &debt_card, spare.min(debt_card.remaining().unwrap_or(0)));
            }
        }

        for &(bucket, share) in self.savings_plan() {
            let Some(goal) = game.state().deck.goal_for(bucket).cloned() else {
                continue;
            };
            let amount = match bucket {
                SavingsBucket::Retirement => goal.amount.min(game.state().ledger.cash),
                _ => (game.state().ledger.cash as f64 * share) as Dollars,
            };
            self.pay_cash(game, &goal, amount);
        }
    }

    /// Answer whatever the game is waiting on.
    pub fn decide<R: RandomSource>(&self, game: &mut Game<R>, decision: &PendingDecision) -> Result<()> {
        match decision {
            PendingDecision::Obligations { .. } => {
                game.confirm_pending_obligations(true)?;
            }
            PendingDecision::Burnout { break_cost } => {
                let take_break = match self.strategy {
                    Strategy::Frugal => game.state().ledger.cash >= *break_cost,
                    Strategy::Balanced | Strategy::Spender => true,
                };
                game.confirm_burnout_choice(take_break)?;
            }
            PendingDecision::Bonus { .. } => {
                game.confirm_bonus_allocation(self.strategy != Strategy::Spender)?;
            }
            PendingDecision::Victory { round } => {
                game.confirm_victory_continue(*round < self.max_round)?;
            }
        }
        Ok(())
    }

    fn attempt<T>(&self, result: Result<T>) {
        if let Err(err) = result {
            tracing::trace!(strategy = %self.strategy, %err, "autopilot action rejected");
        }
    }

    fn pay_cash<R: RandomSource>(&self, game: &mut Game<R>, card: &Card, amount: Dollars) {
        let amount = amount.min(game.state().ledger.cash);
        if amount > 0 {
            self.attempt(game.apply_payment(card.id, amount, PaymentMethod::Cash));
        }
    }

    fn cash_reserve<R: RandomSource>(&self, game: &Game<R>) -> Dollars {
        match self.strategy {
            Strategy::Frugal => 0,
            _ => game.config().bills.utilities + game.config().variable.food.base,
        }
    }

    fn variable_target<R: RandomSource>(&self, game: &Game<R>, card: &Card) -> Dollars {
        let rules = &game.config().variable;
        match (self.strategy, card.meta.category) {
            (Strategy::Spender, Some(_)) => card.meta.max.unwrap_or(card.amount),
            (Strategy::Spender, None) => card.amount,
            (_, Some(category)) if card.meta.base.is_some() => rules.rule(category).base,
            (Strategy::Balanced, None) if !card.optional => card.amount,
            _ => 0,
        }
    }

    fn wants<R: RandomSource>(&self, game: &Game<R>, card: &Card) -> bool {
        let state = game.state();
        let comfortable = state.qol > 45;
        if card.meta.track == Some(TrackKey::DentalCheckup) {
            return self.strategy != Strategy::Spender;
        }
        match (self.strategy, card.on_paid) {
            (_, Some(OnPaidEffect::NegotiateRentHike { .. })) => true,
            (_, Some(OnPaidEffect::AskForRaise)) => true,
            (Strategy::Frugal, Some(OnPaidEffect::OvertimeBlock | OnPaidEffect::SideHustleShift)) => {
                comfortable
            }
            (Strategy::Balanced, Some(OnPaidEffect::EnrollHealthInsurance)) => true,
            (Strategy::Balanced, Some(OnPaidEffect::SkillBootcamp)) => comfortable,
            (Strategy::Spender, Some(OnPaidEffect::FarmersMarketHabit)) => true,
            _ => false,
        }
    }

    /// Goal buckets in deposit order with the share of remaining cash for each
    fn savings_plan(&self) -> &'static [(SavingsBucket, f64)] {
        match self.strategy {
            Strategy::Frugal => &[(SavingsBucket::Retirement, 1.0), (SavingsBucket::Hysa, 0.5)],
            Strategy::Balanced => &[(SavingsBucket::Retirement, 1.0)],
            Strategy::Spender => &[],
        }
    }
}

/// Cards that turn into debt when left unpaid
fn is_obligation(card: &Card) -> bool {
    !card.optional && !card.is_debt_card() && card.creates_debt_on_miss()
}

/// Result of one scripted game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub seed: u64,
    pub strategy: Strategy,
    pub status: GameStatus,
    pub endgame: EndgameSummary,
}

impl GameSummary {
    pub fn is_victory(&self) -> bool {
        matches!(self.status, GameStatus::Victory)
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.status, GameStatus::GameOver { .. })
    }
}

/// Play one seeded game to the end (or to `max_round`).
pub fn play_game(config: &GameConfig, options: &AutoplayOptions, seed: u64) -> Result<GameSummary> {
    let mut game = Game::new(config.clone(), &options.difficulty, &options.housing, seed)?;
    play_to_end(&mut game, options)?;

    let summary = GameSummary {
        seed,
        strategy: options.strategy,
        status: game.state().status(),
        endgame: game.endgame_summary(),
    };
    tracing::debug!(
        seed,
        strategy = %options.strategy,
        round = summary.endgame.round,
        net_worth = summary.endgame.net_worth,
        "autoplay game finished"
    );
    Ok(summary)
}

/// Drive any game with the autopilot until it ends or passes `max_round`.
pub fn play_to_end<R: RandomSource>(game: &mut Game<R>, options: &AutoplayOptions) -> Result<()> {
    let pilot = Autopilot::new(options.strategy, options.max_round);
    while !game.is_over() {
        if let Some(decision) = game.pending_decision().cloned() {
            pilot.decide(game, &decision)?;
            continue;
        }
        if game.round() > options.max_round {
            break;
        }
        pilot.play_turn(game);
        game.advance_round()?;
        game.take_notices();
    }
    Ok(())
}

/// Aggregate over many seeded games
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub strategy: Strategy,
    pub games: usize,
    pub victories: usize,
    pub game_overs: usize,
    pub mean_net_worth: f64,
    pub median_net_worth: Dollars,
    pub min_net_worth: Dollars,
    pub max_net_worth: Dollars,
    pub mean_final_qol: f64,
    pub mean_debt: f64,
}

impl BatchSummary {
    pub fn from_games(strategy: Strategy, results: &[GameSummary]) -> Self {
        let games = results.len();
        let mut net_worths: Vec<Dollars> = results.iter().map(|r| r.endgame.net_worth).collect();
        net_worths.sort_unstable();
        let mean = |f: &dyn Fn(&GameSummary) -> f64| {
            if games == 0 {
                0.0
            } else {
                results.iter().map(f).sum::<f64>() / games as f64
            }
        };

        Self {
            strategy,
            games,
            victories: results.iter().filter(|r| r.is_victory()).count(),
            game_overs: results.iter().filter(|r| r.is_game_over()).count(),
            mean_net_worth: mean(&|r: &GameSummary| r.endgame.net_worth as f64),
            median_net_worth: net_worths.get(games / 2).copied().unwrap_or(0),
            min_net_worth: net_worths.first().copied().unwrap_or(0),
            max_net_worth: net_worths.last().copied().unwrap_or(0),
            mean_final_qol: mean(&|r: &GameSummary| f64::from(r.endgame.qol)),
            mean_debt: mean(&|r: &GameSummary| r.endgame.debt as f64),
        }
    }
}

/// Play `games` games with seeds `base_seed..base_seed + games`.
pub fn simulate_games(
    config: &GameConfig,
    options: &AutoplayOptions,
    games: usize,
    base_seed: u64,
) -> Result<(BatchSummary, Vec<GameSummary>)> {
    let seeds = base_seed..base_seed + games as u64;

    #[cfg(feature = "parallel")]
    let results: Result<Vec<GameSummary>> = seeds
        .into_par_iter()
        .map(|seed| play_game(config, options, seed))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let results: Result<Vec<GameSummary>> = seeds
        .map(|seed| play_game(config, options, seed))
        .collect();

    let results = results?;
    let summary = BatchSummary::from_games(options.strategy, &results);
    tracing::info!(
        strategy = %options.strategy,
        games,
        victories = summary.victories,
        game_overs = summary.game_overs,
        mean_net_worth = summary.mean_net_worth,
        "batch finished"
    );
    Ok((summary, results))
}
