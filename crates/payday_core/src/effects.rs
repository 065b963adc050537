//! One-shot card effects
//!
//! Dispatch table for [`OnPaidEffect`]. An effect runs inside the same
//! transaction as the payment that triggered it, so an `Err` here undoes the
//! payment as well.

use crate::config::{GameConfig, OpportunityCosts};
use crate::error::{GameError, Result};
use crate::game_state::GameState;
use crate::model::{Dollars, OnPaidEffect};
use crate::random::RandomSource;

/// Pay after a raise of `pct`, rounded to whole dollars
pub fn raised_pay(pay: Dollars, pct: f64) -> Dollars {
    (pay as f64 * (1.0 + pct)).round() as Dollars
}

/// Coin flip between the small and the large raise
pub(crate) fn random_raise<R: RandomSource + ?Sized>(rng: &mut R, costs: &OpportunityCosts) -> f64 {
    if rng.chance(0.5) {
        costs.raise_small
    } else {
        costs.raise_large
    }
}

pub fn apply_effect<R: RandomSource + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
    effect: OnPaidEffect,
) -> Result<()> {
    let costs = &config.opportunities;
    tracing::debug!(round = state.round, ?effect, "card effect fired");

    match effect {
        OnPaidEffect::EnrollHealthInsurance => {
            state.coverage.health = true;
            state.notify("Health insurance activated. Premium will recur.");
        }
        OnPaidEffect::SkillBootcamp => {
            state.flags.bootcamp_done = true;
            state.job.pay = raised_pay(state.job.pay, costs.bootcamp_raise);
            state.adjust_qol(-costs.bootcamp_qol);
            state.notify("Bootcamp complete! Salary bumped.");
        }
        OnPaidEffect::AskForRaise => {
            let pct = random_raise(rng, costs);
            state.job.pay = raised_pay(state.job.pay, pct);
            state.adjust_qol(-costs.ask_raise_qol);
            state.notify("Negotiation paid off with a raise!");
        }
        OnPaidEffect::OvertimeBlock => {
            state.ledger.credit_cash(costs.overtime_pay);
            state.adjust_qol(-costs.overtime_qol);
            state.flags.burnout_risk += 1;
            state.notify(format!(
                "Overtime complete: +${} cash, QoL -{}.",
                costs.overtime_pay, costs.overtime_qol
            ));
        }
        OnPaidEffect::FarmersMarketHabit => {
            state.flags.market_habit_active = true;
            state.adjust_qol(costs.market_habit_qol);
            state.notify("Market habit started.");
        }
        OnPaidEffect::StartSideHustle => {
            state.flags.side_hustle_unlocked = true;
            state.adjust_qol(-costs.side_hustle_setup_qol);
            state.notify("Side hustle unlocked.");
        }
        OnPaidEffect::SideHustleShift => {
            state.ledger.credit_cash(costs.side_hustle_shift_pay);
            state.adjust_qol(-costs.side_hustle_shift_qol);
            state.notify(format!("Side hustle shift paid ${}.", costs.side_hustle_shift_pay));
        }
        OnPaidEffect::NegotiateRentHike { reduction } => {
            if !state.flags.rent_hiked {
                return Err(GameError::EffectFailed {
                    effect,
                    reason: "rent has not been raised",
                });
            }
            state.home.cost = (state.home.cost - reduction).max(0);
            state.notify("Negotiation helped reduce rent.");
        }
    }
    Ok(())
}
