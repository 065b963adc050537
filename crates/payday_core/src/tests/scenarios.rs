//! Full-game walkthroughs driven through the public `Game` API

use super::{advance_confirming, card_id, pay_essentials, quiet_game, quiet_game_with};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::model::{CardKind, DecisionKind, GameStatus, PaymentMethod, PendingDecision};
use crate::resolver::RoundOutcome;

/// Test the opening round of a mid-career apartment game
#[test]
fn test_new_game_opens_round_one() {
    let game = quiet_game("med", "apt");
    let state = game.state();

    assert_eq!(game.round(), 1);
    assert_eq!(state.ledger.cash, 2400);
    assert_eq!(state.ledger.debt, 0);
    assert_eq!(state.qol, 50);
    assert!(game.pending_decision().is_none());

    let fixed: Vec<(&str, i64, u32)> = state
        .deck
        .of_kind(CardKind::Fixed)
        .map(|c| (c.title.as_str(), c.amount, c.rounds_left))
        .collect();
    assert_eq!(
        fixed,
        vec![
            ("Rent", 1600, 2),
            ("Utilities", 50, 2),
            ("Car Payment", 750, 2),
            ("Student Loan", 200, 2),
        ]
    );
    assert_eq!(state.deck.of_kind(CardKind::Variable).count(), 4);
    assert_eq!(state.deck.of_kind(CardKind::Goal).count(), 4);
    assert_eq!(state.deck.of_kind(CardKind::Opportunity).count(), 0);
    assert_eq!(state.deck.len(), 12);

    let notices = game.snapshot().notices;
    assert!(notices.contains(&"Payday! +$1900".to_string()));
}

/// Test that paying rent in full takes it out of cash
#[test]
fn test_pay_rent_in_full() {
    let mut game = quiet_game("med", "apt");
    let rent = card_id(&game, "Rent");

    let receipt = game.pay_card_in_full(rent).unwrap();

    assert_eq!(receipt.amount, 1600);
    assert_eq!(receipt.method, PaymentMethod::Cash);
    assert!(!receipt.effect_fired);
    assert_eq!(game.state().ledger.cash, 800);
    assert!(game.state().deck.get(rent).unwrap().is_paid_in_full());
}

/// Test that leaving a fixed bill unpaid past its deadline adds debt and a penalty
#[test]
fn test_missed_bill_becomes_debt_with_penalty() {
    let mut game = quiet_game("med", "apt");

    // Round 1: feed yourself, leave the bills for round 3
    let groceries = card_id(&game, "Groceries");
    let fun = card_id(&game, "Fun / Entertainment");
    game.apply_payment(groceries, 120, PaymentMethod::Cash).unwrap();
    game.apply_payment(fun, 60, PaymentMethod::Cash).unwrap();
    assert_eq!(
        game.advance_round().unwrap(),
        RoundOutcome::Ready { round: 3 }
    );
    assert_eq!(game.state().qol, 62);
    assert_eq!(game.state().ledger.savings.emergency, 2220);

    // Round 3: cover everything except the student loan
    assert_eq!(game.state().ledger.cash, 1900);
    game.pay_card_in_full(card_id(&game, "Rent")).unwrap();
    game.pay_card_in_full(card_id(&game, "Utilities")).unwrap();
    let car = game.pay_card_in_full(card_id(&game, "Car Payment")).unwrap();
    assert_eq!(car.method, PaymentMethod::Credit);
    assert_eq!(game.state().ledger.debt, 750);
    let groceries = card_id(&game, "Groceries");
    let fun = card_id(&game, "Fun / Entertainment");
    game.apply_payment(groceries, 120, PaymentMethod::Cash).unwrap();
    game.apply_payment(fun, 60, PaymentMethod::Cash).unwrap();

    let loan = card_id(&game, "Student Loan");
    let outcome = game.advance_round().unwrap();
    let RoundOutcome::DecisionRequired {
        decision: PendingDecision::Obligations { obligations },
    } = outcome
    else {
        panic!("expected an obligations prompt, got {outcome:?}");
    };
    assert_eq!(obligations.len(), 1);
    assert_eq!(obligations[0].card_id, loan);
    assert_eq!(obligations[0].owed, 200);
    assert_eq!(obligations[0].debt_added, 250);
    assert_eq!(obligations[0].qol_penalty, 5);

    let outcome = game.confirm_pending_obligations(true).unwrap();
    assert_eq!(outcome, RoundOutcome::Ready { round: 5 });

    let state = game.state();
    assert_eq!(state.ledger.debt, 1000);
    assert!(state.ledger.debt_is_consistent());
    assert_eq!(state.qol, 62 - 5 + 12);
    let missed = state.ledger.debt_records.last().unwrap();
    assert_eq!(missed.amount, 250);
    assert_eq!(missed.card_id, Some(loan));
    assert_eq!(missed.reason, "Unpaid Student Loan (includes $50 penalty)");

    // The debt card follows the new balance
    assert_eq!(state.deck.debt_card().unwrap().amount, 1000);

    let log = state.last_log.as_ref().unwrap();
    assert_eq!(log.round, 3);
    assert!(log.lines.iter().any(|l| l
        == "Because you missed student loan, debt jumped by $250 ($200 bill + $50 penalty) and QoL dropped."));
}

/// Test that declining the obligations prompt leaves the round untouched
#[test]
fn test_declining_obligations_changes_nothing() {
    let mut game = quiet_game("med", "apt");
    advance_confirming(&mut game);
    assert_eq!(game.round(), 3);

    let before = game.snapshot();
    let outcome = game.advance_round().unwrap();
    assert!(matches!(outcome, RoundOutcome::DecisionRequired { .. }));

    // Nothing else is allowed while the prompt is open
    let rent = card_id(&game, "Rent");
    assert_eq!(
        game.pay_card_in_full(rent).unwrap_err(),
        GameError::DecisionPending(DecisionKind::Obligations)
    );
    assert_eq!(
        game.confirm_bonus_allocation(true).unwrap_err(),
        GameError::NoPendingDecision(DecisionKind::Bonus)
    );

    assert_eq!(
        game.confirm_pending_obligations(false).unwrap(),
        RoundOutcome::Cancelled
    );
    assert_eq!(game.snapshot(), before);
    assert!(game.pay_card_in_full(rent).is_ok());
}

/// Test that quality of life hitting zero ends the game and freezes it
#[test]
fn test_zero_qol_ends_game() {
    let mut game = quiet_game("med", "apt");

    // Round 1 unfunded: food -11, entertainment grace
    game.advance_round().unwrap();
    assert_eq!(game.state().qol, 39);

    // Round 3: four bills missed (-20), then food -15 and entertainment -4
    let outcome = advance_confirming(&mut game);
    let RoundOutcome::GameOver { reason } = outcome else {
        panic!("expected game over, got {outcome:?}");
    };
    assert!(reason.contains("Quality of Life"));
    assert!(game.is_over());
    assert_eq!(game.state().qol, 0);
    assert_eq!(game.round(), 3);
    assert!(matches!(game.snapshot().status, GameStatus::GameOver { .. }));

    let groceries = card_id(&game, "Groceries");
    assert_eq!(
        game.apply_payment(groceries, 10, PaymentMethod::Cash)
            .unwrap_err(),
        GameError::GameOver
    );
    assert_eq!(game.advance_round().unwrap_err(), GameError::GameOver);
    assert_eq!(
        game.confirm_victory_continue(true).unwrap_err(),
        GameError::GameOver
    );
    assert!(!game.endgame_summary().victory);
}

/// Test the year-end offer: keep playing once, then retire a winner
#[test]
fn test_victory_offer_and_retirement() {
    let config = GameConfig {
        rounds_per_year: 4,
        ..GameConfig::default()
    };
    let mut game = quiet_game_with(config, "easy", "shared");

    pay_essentials(&mut game);
    assert_eq!(advance_confirming(&mut game), RoundOutcome::Ready { round: 3 });

    pay_essentials(&mut game);
    assert_eq!(
        advance_confirming(&mut game),
        RoundOutcome::DecisionRequired {
            decision: PendingDecision::Victory { round: 5 }
        }
    );
    assert_eq!(
        game.confirm_victory_continue(true).unwrap(),
        RoundOutcome::Ready { round: 5 }
    );
    assert_eq!(game.state().flags.next_victory_round, 8);

    pay_essentials(&mut game);
    assert_eq!(advance_confirming(&mut game), RoundOutcome::Ready { round: 7 });

    pay_essentials(&mut game);
    assert_eq!(
        advance_confirming(&mut game),
        RoundOutcome::DecisionRequired {
            decision: PendingDecision::Victory { round: 9 }
        }
    );
    assert_eq!(
        game.confirm_victory_continue(false).unwrap(),
        RoundOutcome::Victory
    );

    assert!(game.is_over());
    assert_eq!(game.snapshot().status, GameStatus::Victory);
    let summary = game.endgame_summary();
    assert!(summary.victory);
    assert_eq!(summary.round, 9);
    assert_eq!(game.advance_round().unwrap_err(), GameError::GameOver);
}

/// Test that a bonus parks the round until the allocation is chosen
#[test]
fn test_bonus_pauses_round_until_allocated() {
    let mut config = GameConfig::default();
    config.unlocks.event_round = 1;
    config.events.bonus = 1.0;
    let mut game = quiet_game_with(config, "med", "apt");

    assert_eq!(
        game.pending_decision(),
        Some(&PendingDecision::Bonus { amount: 1900 })
    );
    let rent = card_id(&game, "Rent");
    assert_eq!(
        game.pay_card_in_full(rent).unwrap_err(),
        GameError::DecisionPending(DecisionKind::Bonus)
    );
    assert_eq!(
        game.confirm_burnout_choice(true).unwrap_err(),
        GameError::NoPendingDecision(DecisionKind::Burnout)
    );

    let outcome = game.confirm_bonus_allocation(true).unwrap();
    assert_eq!(outcome, RoundOutcome::Ready { round: 1 });
    assert_eq!(game.state().ledger.cash, 2400 + 1330);
    assert_eq!(game.state().ledger.savings.emergency, 570);
    assert_eq!(game.state().ledger.debt, 0);
    assert!(game.pay_card_in_full(rent).is_ok());
}

/// Test that a burnout break is paid from cash and the round carries on
#[test]
fn test_burnout_break_resumes_events() {
    let mut config = GameConfig::default();
    config.unlocks.event_round = 1;
    config.events.burnout = 1.0;
    config.events.burnout_qol_below = 101;
    let mut game = quiet_game_with(config, "med", "apt");

    assert_eq!(
        game.pending_decision(),
        Some(&PendingDecision::Burnout { break_cost: 950 })
    );
    let outcome = game.confirm_burnout_choice(true).unwrap();

    assert_eq!(outcome, RoundOutcome::Ready { round: 1 });
    assert_eq!(game.state().ledger.cash, 2400 - 950);
    assert_eq!(game.state().qol, 60);
    assert_eq!(game.state().flags.burnout_risk, 0);
    assert!(game.pending_decision().is_none());
}

/// Test that opening a round past the unlock runs the event engine
#[test]
fn test_round_start_runs_events_after_unlock() {
    let mut game = quiet_game("easy", "shared");
    for _ in 0..3 {
        pay_essentials(&mut game);
        advance_confirming(&mut game);
    }

    assert_eq!(game.round(), 7);
    assert!(game.pending_decision().is_none());
    assert_eq!(game.state().flags.last_performance_review, 7);
}

/// Test that notices drain once read
#[test]
fn test_take_notices_drains() {
    let mut game = quiet_game("med", "apt");
    assert!(!game.take_notices().is_empty());
    assert!(game.take_notices().is_empty());
}

/// Test that the snapshot serializes with its status tag
#[test]
fn test_snapshot_serializes() {
    let game = quiet_game("med", "apt");
    let json = serde_json::to_string(&game.snapshot()).unwrap();
    assert!(json.contains(r#""status":"in_progress""#));
    assert!(json.contains(r#""title":"Rent""#));
}
