//! Round-based personal finance game engine
//!
//! Each round the player gets paid, faces a deck of bills, spending, savings
//! goals, opportunities and surprise events, and drops cash or credit on them.
//! Advancing the round turns missed bills into debt, scores variable spending
//! against quality of life, accrues interest and market returns, and writes a
//! causal log of what happened and why.
//!
//! The engine is headless and never blocks: when it needs an answer it parks
//! on a [`PendingDecision`] until the matching `confirm_*` call arrives.
//!
//! # Example
//!
//! ```ignore
//! use payday_core::{GameBuilder, PaymentMethod};
//!
//! let mut game = GameBuilder::new().difficulty("med").housing("apt").seed(42).build()?;
//! let rent = game.state().deck.find_by_title("Rent").unwrap().id;
//! game.pay_card_in_full(rent)?;
//! game.advance_round()?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod autoplay;
pub mod deck;
pub mod effects;
pub mod error;
pub mod events;
pub mod game;
pub mod game_state;
pub mod interest;
pub mod payments;
pub mod random;
pub mod resolver;
pub mod round_log;
pub mod scheduler;
pub mod variable;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use autoplay::{AutoplayOptions, BatchSummary, GameSummary, Strategy, play_game, simulate_games};
pub use config::{GameBuilder, GameConfig};
pub use error::{ConfigError, GameError, InvalidOperation, Result};
pub use game::Game;
pub use game_state::{GameState, Phase};
pub use model::{
    CardId, Dollars, GameSnapshot, GameStatus, PaymentId, PaymentMethod, PendingDecision,
    SavingsBucket,
};
pub use payments::PaymentReceipt;
pub use random::{RandomSource, ScriptedRandom};
pub use resolver::RoundOutcome;
pub use scheduler::WithdrawalOutcome;
