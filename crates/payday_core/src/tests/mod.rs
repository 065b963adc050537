//! Integration tests for the payday engine
//!
//! Tests are organized by topic:
//! - `scenarios` - Full-game walkthroughs through the public `Game` API
//! - `payments` - Payment acceptance, caps, debt card and undo
//! - `deck` - Card generation rules per round
//! - `events` - Event engine draws, pauses and decisions
//! - `variable` - Variable spending scoring
//! - `savings` - Interest, market factor and withdrawals
//! - `properties` - Invariants over many seeded games

mod events;
mod savings;
mod scenarios;

use crate::config::GameConfig;
use crate::game::Game;
use crate::game_state::GameState;
use crate::model::{CardId, PendingDecision};
use crate::random::ScriptedRandom;
use crate::resolver::RoundOutcome;

/// Game where no random event ever fires
pub(crate) fn quiet_game(difficulty: &str, housing: &str) -> Game<ScriptedRandom> {
    quiet_game_with(GameConfig::default(), difficulty, housing)
}

pub(crate) fn quiet_game_with(
    config: GameConfig,
    difficulty: &str,
    housing: &str,
) -> Game<ScriptedRandom> {
    Game::with_random(config, difficulty, housing, ScriptedRandom::quiet()).unwrap()
}

/// Bare state for exercising one subsystem directly
pub(crate) fn fresh_state(round: u32) -> (GameConfig, GameState) {
    let config = GameConfig::default();
    let mut state = GameState::new(&config, "med", "apt").unwrap();
    state.round = round;
    (config, state)
}

pub(crate) fn card_id<R: crate::random::RandomSource>(game: &Game<R>, title: &str) -> CardId {
    game.state()
        .deck
        .find_by_title(title)
        .unwrap_or_else(|| panic!("no card titled {title}"))
        .id
}

/// Advance, accepting any debt conversion on the way.
pub(crate) fn advance_confirming<R: crate::random::RandomSource>(game: &mut Game<R>) -> RoundOutcome {
    match game.advance_round().unwrap() {
        RoundOutcome::DecisionRequired {
            decision: PendingDecision::Obligations { .. },
        } => game.confirm_pending_obligations(true).unwrap(),
        outcome => outcome,
    }
}

/// Pay every bill that is still owed in full, then food and fun at base.
pub(crate) fn pay_essentials<R: crate::random::RandomSource>(game: &mut Game<R>) {
    let owed: Vec<CardId> = game
        .state()
        .deck
        .cards()
        .iter()
        .filter(|c| c.creates_debt_on_miss() && !c.is_debt_card() && !c.is_paid_in_full())
        .map(|c| c.id)
        .collect();
    for id in owed {
        game.pay_card_in_full(id).unwrap();
    }
    let groceries = card_id(game, "Groceries");
    let fun = card_id(game, "Fun / Entertainment");
    game.apply_payment(groceries, 120, crate::model::PaymentMethod::Cash)
        .unwrap();
    game.apply_payment(fun, 60, crate::model::PaymentMethod::Cash)
        .unwrap();
}
