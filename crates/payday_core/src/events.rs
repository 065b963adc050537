//! Stochastic life events
//!
//! Runs once per round after the deck is generated, as an ordered list of
//! independent checks. Burnout and bonus need a player answer: the engine
//! parks on a [`PendingDecision`] and remembers the next step so the round
//! can pick up exactly where it stopped.

use crate::config::{EventCosts, GameConfig};
use crate::deck::add_card;
use crate::effects::{random_raise, raised_pay};
use crate::game_state::{EventStep, GameState};
use crate::model::{CardKind, DebtCorrelation, Dollars, OnPaidEffect, PendingDecision, SavingsBucket};
use crate::random::RandomSource;

/// How far the event engine got this round
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventFlow {
    Completed,
    Paused(PendingDecision),
    GameOver,
}

/// Run the event checks starting at `from`.
///
/// On a pause the step after the one that asked is stored in
/// `state.event_cursor`; the caller puts the decision into the phase.
pub fn run_events<R: RandomSource + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
    from: EventStep,
) -> EventFlow {
    let mut step = Some(from);
    while let Some(current) = step {
        if state.is_over() {
            return EventFlow::GameOver;
        }
        if let Some(decision) = run_step(state, config, rng, current) {
            state.event_cursor = current.next();
            tracing::info!(round = state.round, kind = %decision.kind(), "event needs a decision");
            return EventFlow::Paused(decision);
        }
        step = current.next();
    }
    state.event_cursor = None;
    if state.is_over() {
        EventFlow::GameOver
    } else {
        EventFlow::Completed
    }
}

fn run_step<R: RandomSource + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
    step: EventStep,
) -> Option<PendingDecision> {
    let odds = &config.events;
    let costs = &config.event_costs;
    match step {
        EventStep::SlipRecovery => {
            if state.flags.slip_recovery_rounds > 0 {
                state.adjust_qol(-1);
                state.flags.slip_recovery_rounds -= 1;
            }
        }
        EventStep::MarketHabit => {
            if state.flags.market_habit_active && config.is_summer(state.round) {
                state.adjust_qol(config.opportunities.market_habit_qol);
            }
        }
        EventStep::WinterSlip => {
            if config.is_winter(state.round) && rng.chance(odds.winter_slip) {
                slip_on_ice(state, costs);
            }
        }
        EventStep::HeatingSpike => {
            if config.is_winter(state.round) && rng.chance(odds.heating_spike) {
                add_card(state, CardKind::Event, "Winter Heating Spike", costs.heating_spike, |c| {
                    c.note("Cold snap drove utilities up this round.")
                        .debt_on_miss(costs.heating_spike)
                });
                state.adjust_qol(-costs.heating_spike_qol);
            }
        }
        EventStep::Burnout => {
            if state.qol < odds.burnout_qol_below && rng.chance(odds.burnout) {
                let break_cost = (state.job.pay as f64 / 2.0).round() as Dollars;
                return Some(PendingDecision::Burnout { break_cost });
            }
        }
        EventStep::PerformanceReview => performance_review(state, config, rng),
        EventStep::Layoff => {
            let chance = odds.layoff_base + odds.layoff_per_risk * f64::from(state.flags.layoff_risk);
            if rng.chance(chance) {
                layoff(state, config, rng);
            }
        }
        EventStep::Bonus => {
            if rng.chance(odds.bonus) {
                return Some(PendingDecision::Bonus {
                    amount: state.job.pay,
                });
            }
        }
        EventStep::RentHike => {
            if !state.flags.rent_hiked && state.round >= odds.rent_hike_round {
                rent_hike(state, config);
            }
        }
        EventStep::CarBreakdown => {
            if rng.chance(odds.car_breakdown) {
                add_card(state, CardKind::Event, "Car Breakdown", costs.car_breakdown, |c| {
                    c.note("Tow + repair. Pay now or it becomes debt.")
                        .debt_on_miss(costs.car_breakdown)
                });
                state.adjust_qol(-costs.car_breakdown_qol);
            }
        }
    }
    None
}

fn slip_on_ice(state: &mut GameState, costs: &EventCosts) {
    if state.coverage.health {
        add_card(state, CardKind::Event, "Slip on the Ice (Copay)", costs.slip_copay, |c| {
            c.note("Health insurance covers most of this injury.")
                .debt_on_miss(costs.slip_copay)
        });
        state.adjust_qol(-costs.slip_copay_qol);
    } else {
        add_card(
            state,
            CardKind::Event,
            "Medical Bill: Slip on the Ice",
            costs.slip_uninsured,
            |c| {
                c.note("No insurance, so a big medical bill hits.")
                    .debt_on_miss(costs.slip_uninsured)
            },
        );
        state.adjust_qol(-costs.slip_uninsured_qol);
    }
    state.flags.slip_recovery_rounds = costs.slip_recovery_rounds;
}

fn performance_review<R: RandomSource + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
) {
    let odds = &config.events;
    let costs = &config.event_costs;
    if state.round - state.flags.last_performance_review.min(state.round) < odds.review_interval {
        return;
    }
    state.flags.last_performance_review = state.round;

    if state.qol >= odds.review_good_qol {
        let pct = random_raise(rng, &config.opportunities);
        state.job.pay = raised_pay(state.job.pay, pct);
        state.adjust_qol(costs.review_raise_qol);
        state.notify("Great performance review! Salary up.");
    } else if state.qol < odds.review_poor_qol {
        state.adjust_qol(-costs.review_poor_qol);
        state.flags.layoff_risk += 1;
        state.notify("Performance review was rough. Job risk increased.");
    } else {
        state.notify("Performance review neutral.");
    }
}

fn layoff<R: RandomSource + ?Sized>(state: &mut GameState, config: &GameConfig, rng: &mut R) {
    let costs = &config.event_costs;
    let rounds = costs.layoff_min_rounds + rng.below(costs.layoff_extra_rounds);
    state.flags.layoff_rounds_left = state.flags.layoff_rounds_left.max(rounds);

    let buffer = state.monthly_fixed_estimate(config) * costs.layoff_buffer_months;
    let buffered = state.ledger.liquidity() >= buffer;
    if buffered {
        state.adjust_qol(-costs.layoff_buffered_qol);
    } else {
        state.adjust_qol(-costs.layoff_unbuffered_qol);
        state.record_debt(
            costs.layoff_bridge_debt,
            "Borrowed to cover bills during layoff",
            DebtCorrelation::default(),
        );
    }
    state.flags.layoff_risk = state.flags.layoff_risk.saturating_sub(1);

    tracing::info!(round = state.round, rounds, buffered, "layoff");
    state.notify(format!("Company layoffs: no pay for {rounds} rounds."));
}

fn rent_hike(state: &mut GameState, config: &GameConfig) {
    let costs = &config.event_costs;
    let bump = ((state.home.cost as f64 * costs.rent_hike_pct).round() as Dollars)
        .max(costs.rent_hike_min);
    state.home.cost += bump;
    state.flags.rent_hiked = true;

    let negotiate = &config.opportunities;
    let reduction = (bump as f64 * negotiate.negotiate_rent_share).round() as Dollars;
    add_card(
        state,
        CardKind::Opportunity,
        "Negotiate Rent Hike",
        negotiate.negotiate_rent,
        |c| {
            c.optional()
                .note("Pay to negotiate; success trims the increase.")
                .on_paid(OnPaidEffect::NegotiateRentHike { reduction })
        },
    );
    state.notify(format!("Rent increased at renewal (+${bump})."));
}

// === Decisions ===

/// Take a paid break (cash, or debt when cash is short) or push through.
pub fn resolve_burnout(
    state: &mut GameState,
    costs: &EventCosts,
    break_cost: Dollars,
    take_break: bool,
) {
    if take_break {
        if state.ledger.cash >= break_cost {
            state.ledger.cash -= break_cost;
        } else {
            state.record_debt(
                break_cost,
                "Mental health break on credit",
                DebtCorrelation::default(),
            );
        }
        state.adjust_qol(costs.burnout_break_qol);
        state.flags.burnout_risk = 0;
        state.notify("You took a break and feel better.");
    } else {
        state.flags.burnout_risk += 1;
        state.adjust_qol(-costs.burnout_push_qol);
        if state.flags.burnout_risk >= costs.burnout_push_limit {
            state.flags.layoff_rounds_left =
                state.flags.layoff_rounds_left.max(costs.burnout_layoff_rounds);
            state.adjust_qol(-costs.burnout_layoff_qol);
            state.flags.burnout_risk = 0;
            state.notify("Burnout forced you off work for a while.");
        }
    }
}

/// Split of an auto-allocated bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusSplit {
    pub to_debt: Dollars,
    pub to_savings: Dollars,
    pub to_cash: Dollars,
}

impl BonusSplit {
    /// A share toward debt (never more than is owed), a share to savings,
    /// the rest to cash
    pub fn auto(bonus: Dollars, debt: Dollars, costs: &EventCosts) -> Self {
        let to_debt = debt
            .max(0)
            .min((bonus as f64 * costs.bonus_debt_share).round() as Dollars);
        let to_savings = (bonus as f64 * costs.bonus_savings_share).round() as Dollars;
        Self {
            to_debt,
            to_savings,
            to_cash: bonus - to_debt - to_savings,
        }
    }
}

pub fn resolve_bonus(
    state: &mut GameState,
    costs: &EventCosts,
    amount: Dollars,
    auto_allocate: bool,
) {
    if auto_allocate {
        let split = BonusSplit::auto(amount, state.ledger.debt, costs);
        if split.to_debt > 0 {
            state.record_debt(
                -split.to_debt,
                "Bonus applied to debt",
                DebtCorrelation::default(),
            );
            if state.ledger.debt <= 0 {
                state.deck.remove_debt_card();
            }
        }
        state.ledger.deposit(SavingsBucket::Emergency, split.to_savings);
        state.ledger.credit_cash(split.to_cash);
    } else {
        state.ledger.credit_cash(amount);
    }
    state.notify("Bonus received!");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bonus_split_caps_debt_share() {
        let costs = EventCosts::default();
        let split = BonusSplit::auto(1900, 300, &costs);
        assert_eq!(split.to_debt, 300);
        assert_eq!(split.to_savings, 570);
        assert_eq!(split.to_cash, 1030);

        let split = BonusSplit::auto(1900, 5000, &costs);
        assert_eq!(split.to_debt, 950);
        assert_eq!(split.to_cash, 380);
    }
}
