//! Card deck generation
//!
//! Runs once at the start of every round, after old cards have been aged.
//! Rules are evaluated in a fixed order: fixed bills, the debt card, variable
//! spending, savings goals, opportunities, then forced events.

use crate::config::GameConfig;
use crate::game_state::GameState;
use crate::model::{
    Card, CardKind, CardMeta, DEBT_CARD_TTL, Dollars, OnPaidEffect, SavingsBucket, SpendCategory,
    TrackKey,
};
use crate::random::RandomSource;

pub const RENT: &str = "Rent";
pub const UTILITIES: &str = "Utilities";
pub const CAR_PAYMENT: &str = "Car Payment";
pub const STUDENT_LOAN: &str = "Student Loan";
pub const DEBT_BALANCE: &str = "Debt Balance";
pub const HEALTH_PREMIUM: &str = "Health Insurance Premium";

pub fn generate_cards<R: RandomSource + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
) {
    add_fixed_bills(state, config);
    sync_debt_card(state);
    add_variable_cards(state, config);
    add_goal_cards(state, config);
    if state.round >= config.unlocks.opportunity_round {
        add_opportunities(state, config);
    }
    add_forced_events(state, config, rng);

    tracing::debug!(round = state.round, cards = state.deck.len(), "deck generated");
}

/// Allocate an id and push a card built by `build`.
pub(crate) fn add_card(
    state: &mut GameState,
    kind: CardKind,
    title: &str,
    amount: Dollars,
    build: impl FnOnce(Card) -> Card,
) {
    let id = state.ids.card();
    state.deck.push(build(Card::new(id, kind, title, amount)));
}

fn add_fixed_bills(state: &mut GameState, config: &GameConfig) {
    let bills = &config.bills;
    if state.round % bills.cycle != 1 % bills.cycle {
        return;
    }
    let schedule = [
        (RENT, state.home.cost, ""),
        (UTILITIES, bills.utilities, ""),
        (CAR_PAYMENT, bills.car_payment, "Monthly auto loan."),
        (STUDENT_LOAN, bills.student_loan, "Monthly student loan payment."),
    ];
    for (title, amount, note) in schedule {
        if !state.deck.has_active(title) {
            add_card(state, CardKind::Fixed, title, amount, |c| {
                c.ttl(bills.ttl).note(note)
            });
        }
    }
}

fn sync_debt_card(state: &mut GameState) {
    let debt = state.ledger.debt;
    if debt <= 0 {
        state.deck.remove_debt_card();
    } else if state.deck.debt_card().is_some() {
        state.deck.sync_debt_card(debt);
    } else {
        add_card(state, CardKind::Fixed, DEBT_BALANCE, debt, |c| {
            c.ttl(DEBT_CARD_TTL)
                .note("Pay with cash to reduce your debt.")
                .meta(CardMeta {
                    debt_card: true,
                    ..Default::default()
                })
        });
    }
}

fn add_variable_cards(state: &mut GameState, config: &GameConfig) {
    let rules = &config.variable;
    let food = &rules.food;
    let fun = &rules.entertainment;

    add_card(state, CardKind::Variable, "Groceries", food.card_amount, |c| {
        c.meta(CardMeta {
            category: Some(SpendCategory::Food),
            base: Some(food.base),
            max: Some(food.max),
            ..Default::default()
        })
    });
    add_card(state, CardKind::Variable, "Fun / Entertainment", fun.card_amount, |c| {
        c.meta(CardMeta {
            category: Some(SpendCategory::Entertainment),
            base: Some(fun.base),
            max: Some(fun.max),
            ..Default::default()
        })
    });
    add_card(state, CardKind::Variable, "Gas & Transit", rules.transit, |c| c);
    add_card(state, CardKind::Variable, "Dining Out", rules.dining_out, |c| {
        c.optional().meta(CardMeta {
            category: Some(SpendCategory::Food),
            ..Default::default()
        })
    });
}

fn add_goal_cards(state: &mut GameState, config: &GameConfig) {
    let goals = [
        (
            "Emergency Fund / Savings",
            SavingsBucket::Emergency,
            "0.01% APY; withdraw anytime.",
        ),
        (
            "High-Yield Savings Account (HYSA)",
            SavingsBucket::Hysa,
            "3.5% APY; withdrawals arrive next round.",
        ),
        (
            "Vacation Fund",
            SavingsBucket::Vacation,
            "HYSA-like rate; withdrawals arrive next round.",
        ),
        (
            "Retirement Contribution",
            SavingsBucket::Retirement,
            "Employer match on cash; locked with market swings.",
        ),
    ];
    for (title, bucket, note) in goals {
        let amount = config.goals.target(bucket);
        add_card(state, CardKind::Goal, title, amount, |c| {
            c.optional().note(note).meta(CardMeta {
                savings_type: Some(bucket),
                ..Default::default()
            })
        });
    }
}

fn add_opportunities(state: &mut GameState, config: &GameConfig) {
    let round = state.round;
    let costs = &config.opportunities;

    if round % costs.dental_cycle == 1 % costs.dental_cycle {
        add_card(
            state,
            CardKind::Opportunity,
            "Dental Checkup",
            costs.dental_checkup,
            |c| {
                c.optional()
                    .note("Small cost now to avoid big dental bill later.")
                    .meta(CardMeta {
                        track: Some(TrackKey::DentalCheckup),
                        ..Default::default()
                    })
            },
        );
    }

    if !state.coverage.health {
        add_card(
            state,
            CardKind::Opportunity,
            "Enroll: Health Insurance",
            costs.health_enrollment,
            |c| {
                c.optional()
                    .note("Pay once to unlock health coverage; monthly premiums will appear.")
                    .on_paid(OnPaidEffect::EnrollHealthInsurance)
            },
        );
    } else if !state.deck.has_active(HEALTH_PREMIUM) {
        let premium = config.bills.health_premium;
        add_card(state, CardKind::Fixed, HEALTH_PREMIUM, premium, |c| {
            c.ttl(config.bills.ttl)
                .note("Keeps medical events cheaper.")
        });
    }

    if !state.flags.bootcamp_done && round > config.unlocks.opportunity_round {
        add_card(state, CardKind::Opportunity, "Skill Bootcamp", costs.bootcamp, |c| {
            c.optional()
                .note("Invest in skills; raises salary ~10%.")
                .on_paid(OnPaidEffect::SkillBootcamp)
        });
    }

    if round % costs.raise_cycle == 1 % costs.raise_cycle {
        add_card(state, CardKind::Opportunity, "Ask for a Raise", costs.token, |c| {
            c.optional()
                .note("Drop a $1 bill to try for +5-10% salary.")
                .on_paid(OnPaidEffect::AskForRaise)
        });
    }

    add_card(state, CardKind::Opportunity, "Overtime Block", costs.token, |c| {
        c.optional()
            .note(format!(
                "Drop ${} to work overtime: +${} cash, QoL -{} (raises burnout risk).",
                costs.token, costs.overtime_pay, costs.overtime_qol
            ))
            .on_paid(OnPaidEffect::OvertimeBlock)
    });

    if config.is_summer(round) && !state.flags.market_habit_active {
        add_card(
            state,
            CardKind::Opportunity,
            "Farmers' Market Habit",
            costs.farmers_market,
            |c| {
                c.optional()
                    .note("Buy local goodies. QoL +1 each summer round while active.")
                    .on_paid(OnPaidEffect::FarmersMarketHabit)
            },
        );
    }

    if !state.flags.side_hustle_unlocked && round > costs.side_hustle_after_round {
        add_card(
            state,
            CardKind::Opportunity,
            "Start a Side Hustle",
            costs.side_hustle_setup,
            |c| {
                c.optional()
                    .note(format!(
                        "Upfront setup. Unlocks future shift card (+${}, QoL -{}).",
                        costs.side_hustle_shift_pay, costs.side_hustle_shift_qol
                    ))
                    .on_paid(OnPaidEffect::StartSideHustle)
            },
        );
    } else if state.flags.side_hustle_unlocked {
        add_card(
            state,
            CardKind::Opportunity,
            "Take a Side Hustle Shift",
            costs.token,
            |c| {
                c.optional()
                    .note(format!(
                        "Drop a ${} bill to spend time. Gain ${}, QoL -{}.",
                        costs.token, costs.side_hustle_shift_pay, costs.side_hustle_shift_qol
                    ))
                    .on_paid(OnPaidEffect::SideHustleShift)
            },
        );
    }
}

fn add_forced_events<R: RandomSource + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
) {
    let costs = &config.event_costs;
    if state.flags.dental_bomb_pending {
        add_card(
            state,
            CardKind::Event,
            "Dental Time Bomb",
            costs.dental_bomb,
            |c| {
                c.note("Skipping checkups caught up to you.")
                    .debt_on_miss(costs.dental_bomb)
            },
        );
        state.adjust_qol(-costs.dental_bomb_qol);
        state.flags.dental_bomb_pending = false;
    }

    if state.round >= config.unlocks.event_round && rng.chance(config.events.speeding_ticket) {
        add_card(
            state,
            CardKind::Event,
            "Speeding Ticket",
            costs.speeding_ticket,
            |c| {
                c.note("Pay promptly or it becomes debt.")
                    .debt_on_miss(costs.speeding_ticket)
            },
        );
    }
}
