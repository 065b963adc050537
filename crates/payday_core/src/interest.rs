//! Per-round interest and market returns
//!
//! Liquid buckets earn a flat APY split evenly across the rounds of a year.
//! Retirement earns its base APY scaled by a fresh market factor each round,
//! which can be negative but never wipes out more than the balance.

use crate::config::GameConfig;
use crate::game_state::GameState;
use crate::model::{Dollars, SavingsBucket};
use crate::random::RandomSource;

/// How the market treated the nest egg this round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketMood {
    Rally,
    Dip,
    Wobble,
}

impl MarketMood {
    /// `None` for an unremarkable round
    pub fn classify(factor: f64) -> Option<MarketMood> {
        if factor >= 1.1 {
            Some(MarketMood::Rally)
        } else if factor <= 0.2 {
            Some(MarketMood::Dip)
        } else if factor < 0.6 {
            Some(MarketMood::Wobble)
        } else {
            None
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            MarketMood::Rally => "Market Rally! Portfolio up.",
            MarketMood::Dip => "Market Dip. Portfolio stagnant.",
            MarketMood::Wobble => "Market dip. Portfolio wobbled.",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterestReport {
    pub earned: Vec<(SavingsBucket, Dollars)>,
    /// Signed retirement change; `None` when the nest egg was empty
    pub retirement_change: Option<Dollars>,
    pub market_factor: f64,
    pub mood: Option<MarketMood>,
}

impl InterestReport {
    pub fn messages(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(mood) = self.mood {
            out.push(mood.message().to_string());
        }
        for (bucket, gain) in &self.earned {
            out.push(format!("${gain} in {} interest", bucket.label()));
        }
        match self.retirement_change {
            Some(0) => out.push("Retirement held steady this round.".into()),
            Some(change) if change > 0 => out.push(format!("Retirement grew +${change}")),
            Some(change) => out.push(format!("Retirement lost -${}", change.abs())),
            None => {}
        }
        out
    }
}

/// Interest on `balance` for one round at `apy`, floored to whole dollars.
pub fn round_interest(balance: Dollars, apy: f64, rounds_per_year: u32) -> Dollars {
    (balance as f64 * apy / f64::from(rounds_per_year.max(1))).floor() as Dollars
}

pub fn apply_interest<R: RandomSource + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
) -> InterestReport {
    let rates = &config.savings;
    let mut report = InterestReport {
        market_factor: 1.0,
        ..Default::default()
    };

    for (bucket, apy) in [
        (SavingsBucket::Emergency, rates.emergency_apy),
        (SavingsBucket::Hysa, rates.hysa_apy),
        (SavingsBucket::Vacation, rates.vacation_apy),
    ] {
        let gain = round_interest(state.ledger.balance(bucket), apy, config.rounds_per_year);
        if gain > 0 {
            state.ledger.deposit(bucket, gain);
            report.earned.push((bucket, gain));
        }
    }

    let balance = state.ledger.nest_egg();
    if balance > 0 {
        let factor = rng.between(rates.market_factor_min, rates.market_factor_max);
        let rate = rates.retirement_base_apy / f64::from(config.rounds_per_year.max(1)) * factor;
        let change = ((balance as f64 * rate).floor() as Dollars).max(-balance);

        if change > 0 {
            state.ledger.deposit(SavingsBucket::Retirement, change);
        } else if change < 0 {
            state.ledger.savings.retirement -= -change;
        }

        report.market_factor = factor;
        report.retirement_change = Some(change);
        report.mood = MarketMood::classify(factor);
    }
    state.last_market_factor = report.market_factor;

    tracing::debug!(
        round = state.round,
        factor = report.market_factor,
        retirement_change = ?report.retirement_change,
        "interest applied"
    );
    report
}
