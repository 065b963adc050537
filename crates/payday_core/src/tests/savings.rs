//! Interest, market swings and withdrawals

use super::{advance_confirming, card_id, fresh_state, quiet_game};
use crate::error::{GameError, InvalidOperation};
use crate::interest::{MarketMood, apply_interest};
use crate::model::{PaymentMethod, SavingsBucket, ScheduledWithdrawal};
use crate::random::ScriptedRandom;
use crate::scheduler::WithdrawalOutcome;

/// Test that liquid buckets earn interest without touching the market
#[test]
fn test_hysa_interest() {
    let (config, mut state) = fresh_state(3);
    state.ledger.deposit(SavingsBucket::Hysa, 10_000);
    let mut rng = ScriptedRandom::quiet();

    let report = apply_interest(&mut state, &config, &mut rng);

    assert_eq!(report.earned, vec![(SavingsBucket::Hysa, 13)]);
    assert_eq!(state.ledger.savings.hysa, 10_013);
    assert_eq!(report.retirement_change, None);
    assert_eq!(rng.consumed(), 0);
    assert_eq!(report.messages(), vec!["$13 in HYSA interest".to_string()]);
}

/// Test market factor swings on the retirement balance
#[test]
fn test_retirement_market_swing() {
    let (config, mut state) = fresh_state(3);
    state.ledger.deposit(SavingsBucket::Retirement, 1_000);

    // lowest factor: -0.25
    let report = apply_interest(&mut state, &config, &mut ScriptedRandom::new([0.0]));
    assert_eq!(report.retirement_change, Some(-1));
    assert_eq!(report.mood, Some(MarketMood::Dip));
    assert_eq!(state.ledger.savings.retirement, 999);
    assert!((state.last_market_factor - -0.25).abs() < 1e-9);

    // near the top: ~1.498
    let report = apply_interest(&mut state, &config, &mut ScriptedRandom::quiet());
    assert_eq!(report.mood, Some(MarketMood::Rally));
    assert_eq!(report.retirement_change, Some(5));
    assert_eq!(state.ledger.savings.retirement, 1_004);
}

/// Test that a crash never takes more than the balance
#[test]
fn test_retirement_loss_is_clamped() {
    let (mut config, mut state) = fresh_state(3);
    config.savings.market_factor_min = -1_000.0;
    config.savings.market_factor_max = -1_000.0;
    state.ledger.deposit(SavingsBucket::Retirement, 100);

    let report = apply_interest(&mut state, &config, &mut ScriptedRandom::quiet());

    assert_eq!(report.retirement_change, Some(-100));
    assert_eq!(state.ledger.savings.retirement, 0);
}

/// Test scheduled and immediate withdrawals across a round boundary
#[test]
fn test_withdrawals() {
    let mut game = quiet_game("med", "apt");
    let hysa = card_id(&game, "High-Yield Savings Account (HYSA)");
    game.apply_payment(hysa, 200, PaymentMethod::Cash).unwrap();

    let outcome = game.request_withdrawal(SavingsBucket::Hysa, 150).unwrap();
    assert_eq!(
        outcome,
        WithdrawalOutcome::Scheduled(ScheduledWithdrawal {
            amount: 150,
            source: SavingsBucket::Hysa,
            round_due: 3,
        })
    );
    assert_eq!(game.state().ledger.savings.hysa, 50);
    assert_eq!(game.state().ledger.cash, 2200);

    for (bucket, amount, expected) in [
        (SavingsBucket::Retirement, 10, InvalidOperation::RetirementLocked),
        (SavingsBucket::Hysa, 0, InvalidOperation::NonPositiveAmount),
        (
            SavingsBucket::Other,
            10,
            InvalidOperation::NotWithdrawable(SavingsBucket::Other),
        ),
        (
            SavingsBucket::Hysa,
            500,
            InvalidOperation::InsufficientFunds {
                bucket: SavingsBucket::Hysa,
                requested: 500,
                available: 50,
            },
        ),
    ] {
        assert_eq!(
            game.request_withdrawal(bucket, amount).unwrap_err(),
            GameError::Invalid(expected)
        );
    }

    advance_confirming(&mut game);
    assert_eq!(game.round(), 3);
    assert_eq!(game.state().ledger.cash, 1900 + 150);
    assert!(game.state().scheduled_withdrawals.is_empty());

    // Leftover round-1 cash was swept into the emergency fund
    assert_eq!(game.state().ledger.savings.emergency, 2200);
    let outcome = game.request_withdrawal(SavingsBucket::Emergency, 300).unwrap();
    assert_eq!(
        outcome,
        WithdrawalOutcome::Immediate {
            bucket: SavingsBucket::Emergency,
            amount: 300,
        }
    );
    assert_eq!(game.state().ledger.cash, 2050 + 300);
    assert_eq!(game.state().ledger.savings.emergency, 1900);
}
