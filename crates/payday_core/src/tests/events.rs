//! Event engine draws, pauses and decisions

use super::fresh_state;
use crate::events::{EventFlow, resolve_bonus, resolve_burnout, run_events};
use crate::game_state::EventStep;
use crate::model::{OnPaidEffect, PendingDecision, SavingsBucket};
use crate::random::ScriptedRandom;

/// Test an uninsured winter slip together with the round-13+ rent hike
#[test]
fn test_uninsured_slip_and_rent_hike() {
    let (config, mut state) = fresh_state(25);
    // slip hits, heating misses, everything else falls back to "no"
    let mut rng = ScriptedRandom::new([0.1, 0.9]);

    let flow = run_events(&mut state, &config, &mut rng, EventStep::FIRST);

    assert_eq!(flow, EventFlow::Completed);
    let bill = state.deck.find_by_title("Medical Bill: Slip on the Ice").unwrap();
    assert_eq!(bill.amount, 3000);
    assert_eq!(bill.debt_on_miss, Some(3000));
    assert_eq!(state.qol, 45);
    assert_eq!(state.flags.slip_recovery_rounds, 1);
    assert_eq!(state.flags.last_performance_review, 25);

    assert!(state.flags.rent_hiked);
    assert_eq!(state.home.cost, 1712);
    let negotiate = state.deck.find_by_title("Negotiate Rent Hike").unwrap();
    assert_eq!(negotiate.amount, 75);
    assert_eq!(
        negotiate.on_paid,
        Some(OnPaidEffect::NegotiateRentHike { reduction: 56 })
    );

    // Recovery costs a point next time, and the hike never repeats
    run_events(&mut state, &config, &mut ScriptedRandom::quiet(), EventStep::FIRST);
    assert_eq!(state.qol, 44);
    assert_eq!(state.flags.slip_recovery_rounds, 0);
    assert_eq!(state.home.cost, 1712);
}

/// Test that health coverage turns the slip into a copay
#[test]
fn test_insured_slip_is_a_copay() {
    let (config, mut state) = fresh_state(2);
    state.coverage.health = true;
    let flow = run_events(
        &mut state,
        &config,
        &mut ScriptedRandom::new([0.1]),
        EventStep::FIRST,
    );

    assert_eq!(flow, EventFlow::Completed);
    let copay = state.deck.find_by_title("Slip on the Ice (Copay)").unwrap();
    assert_eq!(copay.amount, 100);
    assert_eq!(state.qol, 47);
}

/// Test that burnout pauses the engine and the break resumes it
#[test]
fn test_burnout_pause_and_break_on_credit() {
    let (config, mut state) = fresh_state(7);
    state.qol = 30;
    let mut rng = ScriptedRandom::new([0.1]);

    let flow = run_events(&mut state, &config, &mut rng, EventStep::FIRST);
    assert_eq!(
        flow,
        EventFlow::Paused(PendingDecision::Burnout { break_cost: 950 })
    );
    assert_eq!(state.event_cursor, Some(EventStep::PerformanceReview));

    // 500 cash can't cover it, so the break goes on credit
    resolve_burnout(&mut state, &config.event_costs, 950, true);
    assert_eq!(state.ledger.cash, 500);
    assert_eq!(state.ledger.debt, 950);
    assert_eq!(
        state.ledger.debt_records[0].reason,
        "Mental health break on credit"
    );
    assert_eq!(state.qol, 40);

    let cursor = state.event_cursor.take().unwrap();
    let flow = run_events(&mut state, &config, &mut rng, cursor);
    assert_eq!(flow, EventFlow::Completed);
    assert_eq!(state.event_cursor, None);
    assert_eq!(state.flags.last_performance_review, 7);
    assert_eq!(state.qol, 40);
}

/// Test that pushing through burnout twice forces time off
#[test]
fn test_pushing_through_burnout_twice() {
    let (config, mut state) = fresh_state(7);
    state.qol = 30;

    resolve_burnout(&mut state, &config.event_costs, 950, false);
    assert_eq!(state.flags.burnout_risk, 1);
    assert_eq!(state.qol, 27);

    resolve_burnout(&mut state, &config.event_costs, 950, false);
    assert_eq!(state.flags.burnout_risk, 0);
    assert_eq!(state.flags.layoff_rounds_left, 2);
    assert_eq!(state.qol, 19);
}

/// Test the three outcomes of a performance review
#[test]
fn test_performance_review_outcomes() {
    let (config, mut state) = fresh_state(7);
    state.qol = 70;
    run_events(
        &mut state,
        &config,
        &mut ScriptedRandom::new([0.1]),
        EventStep::FIRST,
    );
    assert_eq!(state.job.pay, 1995);
    assert_eq!(state.qol, 72);

    let (config, mut state) = fresh_state(7);
    state.qol = 38;
    run_events(&mut state, &config, &mut ScriptedRandom::quiet(), EventStep::FIRST);
    assert_eq!(state.qol, 35);
    assert_eq!(state.flags.layoff_risk, 1);

    // Reviews only come around every six rounds
    let (config, mut state) = fresh_state(7);
    state.qol = 38;
    state.flags.last_performance_review = 3;
    run_events(&mut state, &config, &mut ScriptedRandom::quiet(), EventStep::FIRST);
    assert_eq!(state.qol, 38);
}

/// Test layoffs with and without a savings buffer
#[test]
fn test_layoff_buffer() {
    let (config, mut state) = fresh_state(7);
    // layoff hits, duration roll picks 3 rounds
    run_events(
        &mut state,
        &config,
        &mut ScriptedRandom::new([0.01, 0.5]),
        EventStep::FIRST,
    );
    assert_eq!(state.flags.layoff_rounds_left, 3);
    assert_eq!(state.qol, 44);
    assert_eq!(state.ledger.debt, 200);

    let (config, mut state) = fresh_state(7);
    state.ledger.deposit(SavingsBucket::Emergency, 8_000);
    state.flags.layoff_risk = 2;
    run_events(
        &mut state,
        &config,
        &mut ScriptedRandom::new([0.01, 0.0]),
        EventStep::FIRST,
    );
    assert_eq!(state.flags.layoff_rounds_left, 2);
    assert_eq!(state.qol, 48);
    assert_eq!(state.ledger.debt, 0);
    assert_eq!(state.flags.layoff_risk, 1);
}

/// Test bonus allocation with and without outstanding debt
#[test]
fn test_bonus_allocation() {
    let (config, mut state) = fresh_state(7);
    state.record_debt(300, "Credit used on Rent", Default::default());
    resolve_bonus(&mut state, &config.event_costs, 1900, true);
    assert_eq!(state.ledger.debt, 0);
    assert!(state.ledger.debt_is_consistent());
    assert_eq!(state.ledger.savings.emergency, 570);
    assert_eq!(state.ledger.cash, 500 + 1030);

    let (config, mut state) = fresh_state(7);
    resolve_bonus(&mut state, &config.event_costs, 1900, false);
    assert_eq!(state.ledger.cash, 2400);
    assert_eq!(state.ledger.savings.emergency, 0);
}

/// Test that a game over stops the engine mid-list
#[test]
fn test_game_over_stops_events() {
    let (config, mut state) = fresh_state(25);
    state.qol = 5;
    // slip takes the last 5 QoL; nothing after it may draw
    let mut rng = ScriptedRandom::new([0.1]);

    let flow = run_events(&mut state, &config, &mut rng, EventStep::FIRST);

    assert_eq!(flow, EventFlow::GameOver);
    assert!(state.is_over());
    assert_eq!(rng.consumed(), 1);
    assert!(!state.flags.rent_hiked);
}

/// Test the winter heating spike and a car breakdown in the same round
#[test]
fn test_heating_spike_and_car_breakdown() {
    let (config, mut state) = fresh_state(25);
    // slip misses, heating hits, layoff and bonus miss, car breaks down
    let mut rng = ScriptedRandom::new([0.9, 0.05, 0.9, 0.9, 0.01]);

    let flow = run_events(&mut state, &config, &mut rng, EventStep::FIRST);

    assert_eq!(flow, EventFlow::Completed);
    assert_eq!(rng.remaining(), 0);
    let heating = state.deck.find_by_title("Winter Heating Spike").unwrap();
    assert_eq!(heating.amount, 80);
    assert_eq!(heating.debt_on_miss, Some(80));
    let car = state.deck.find_by_title("Car Breakdown").unwrap();
    assert_eq!(car.amount, 400);
    assert_eq!(car.debt_on_miss, Some(400));
    assert_eq!(state.qol, 50 - 1 - 4);
}

/// Test that the heating spike only happens in winter
#[test]
fn test_no_heating_spike_outside_winter() {
    let (config, mut state) = fresh_state(11);
    run_events(
        &mut state,
        &config,
        &mut ScriptedRandom::new([0.05]),
        EventStep::FIRST,
    );
    assert!(state.deck.find_by_title("Winter Heating Spike").is_none());
}

/// Test the farmers' market habit lifting QoL in summer rounds only
#[test]
fn test_market_habit_pays_off_in_summer() {
    let (config, mut state) = fresh_state(11);
    state.flags.market_habit_active = true;
    run_events(&mut state, &config, &mut ScriptedRandom::quiet(), EventStep::FIRST);
    assert_eq!(state.qol, 51);

    let (config, mut state) = fresh_state(17);
    state.flags.market_habit_active = true;
    run_events(&mut state, &config, &mut ScriptedRandom::quiet(), EventStep::FIRST);
    assert_eq!(state.qol, 50);

    let (config, mut state) = fresh_state(11);
    run_events(&mut state, &config, &mut ScriptedRandom::quiet(), EventStep::FIRST);
    assert_eq!(state.qol, 50);
}

/// Test that event bills and QoL hits follow the config
#[test]
fn test_event_costs_come_from_config() {
    let (mut config, mut state) = fresh_state(25);
    config.event_costs.car_breakdown = 650;
    config.event_costs.car_breakdown_qol = 10;
    config.event_costs.rent_hike_pct = 0.10;

    run_events(
        &mut state,
        &config,
        &mut ScriptedRandom::new([0.9, 0.9, 0.9, 0.9, 0.01]),
        EventStep::FIRST,
    );

    let car = state.deck.find_by_title("Car Breakdown").unwrap();
    assert_eq!(car.amount, 650);
    assert_eq!(car.debt_on_miss, Some(650));
    assert_eq!(state.qol, 40);
    assert_eq!(state.home.cost, 1760);
}
