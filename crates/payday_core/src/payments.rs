//! Payment acceptance and undo
//!
//! Every accepted payment lands on its card's payment stack together with
//! enough detail (method, bucket, employer match) to be reversed exactly.
//! Checks run before anything is touched; callers still wrap these calls in
//! a transaction so that a failing effect rolls the payment back.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::effects::apply_effect;
use crate::error::{GameError, InvalidOperation, Result};
use crate::game_state::GameState;
use crate::model::{
    Card, CardId, CardKind, DebtCorrelation, Dollars, Payment, PaymentId, PaymentMethod,
    SavingsBucket,
};
use crate::random::RandomSource;

/// What an accepted payment did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub card_id: CardId,
    pub payment_id: PaymentId,
    /// Amount actually applied after clamping to the card's cap
    pub amount: Dollars,
    pub method: PaymentMethod,
    pub employer_match: Dollars,
    pub effect_fired: bool,
    /// The debt card was paid off and left the deck
    pub card_removed: bool,
}

fn card(state: &GameState, card_id: CardId) -> Result<&Card> {
    state
        .deck
        .get(card_id)
        .ok_or(GameError::CardNotFound(card_id))
}

/// Drop `requested` dollars of cash, or the whole remainder on credit.
pub fn apply_payment<R: RandomSource + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
    card_id: CardId,
    requested: Dollars,
    method: PaymentMethod,
) -> Result<PaymentReceipt> {
    let card = card(state, card_id)?;

    if method == PaymentMethod::Cash && requested <= 0 {
        return Err(InvalidOperation::NonPositiveAmount.into());
    }
    let remaining = card.remaining();
    if remaining.is_some_and(|r| r <= 0) {
        return Err(InvalidOperation::AlreadyMaxed.into());
    }

    let amount = match method {
        PaymentMethod::Credit => {
            if card.kind == CardKind::Goal || card.is_savings() {
                return Err(InvalidOperation::CreditOnGoal.into());
            }
            if card.is_debt_card() {
                return Err(InvalidOperation::CreditOnDebt.into());
            }
            remaining.unwrap_or(0)
        }
        PaymentMethod::Cash => {
            let amount = remaining.map_or(requested, |r| requested.min(r));
            if amount > state.ledger.cash {
                return Err(InvalidOperation::InsufficientCash {
                    requested: amount,
                    available: state.ledger.cash,
                }
                .into());
            }
            amount
        }
    };
    if amount <= 0 {
        return Err(InvalidOperation::NonPositiveAmount.into());
    }

    commit(state, config, rng, card_id, amount, method)
}

/// Pay whatever is left up to the cap: cash when it covers it, otherwise credit.
pub fn pay_in_full<R: RandomSource + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
    card_id: CardId,
) -> Result<PaymentReceipt> {
    let card = card(state, card_id)?;
    if card.is_savings() {
        return Err(InvalidOperation::SavingsNeedsBills.into());
    }

    let remaining = card.remaining().unwrap_or(0);
    if remaining <= 0 {
        return Err(InvalidOperation::AlreadyMaxed.into());
    }

    let method = if state.ledger.cash >= remaining {
        PaymentMethod::Cash
    } else if card.kind == CardKind::Goal || card.is_debt_card() {
        return Err(InvalidOperation::InsufficientCash {
            requested: remaining,
            available: state.ledger.cash,
        }
        .into());
    } else {
        PaymentMethod::Credit
    };

    commit(state, config, rng, card_id, remaining, method)
}

/// Apply an already validated payment to the ledger and the card.
fn commit<R: RandomSource + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
    card_id: CardId,
    amount: Dollars,
    method: PaymentMethod,
) -> Result<PaymentReceipt> {
    let (title, savings_type, is_debt_card) = {
        let card = card(state, card_id)?;
        (card.title.clone(), card.meta.savings_type, card.is_debt_card())
    };
    let payment_id = state.ids.payment();

    match method {
        PaymentMethod::Cash => state.ledger.debit_cash(amount)?,
        PaymentMethod::Credit => {
            state.record_debt(
                amount,
                format!("Credit used on {title}"),
                DebtCorrelation::payment(payment_id),
            );
        }
    }

    let employer_match = match savings_type {
        Some(bucket) => {
            state.ledger.deposit(bucket, amount);
            employer_match(state, config, bucket, amount, method)
        }
        None => 0,
    };

    let card = state
        .deck
        .get_mut(card_id)
        .ok_or(GameError::CardNotFound(card_id))?;
    card.payments.push(Payment {
        id: payment_id,
        amount,
        method,
        savings_type: savings_type.unwrap_or(SavingsBucket::Other),
        employer_match,
    });
    let pending_effect = match card.on_paid {
        Some(effect) if !card.fulfilled && card.is_paid_in_full() => {
            card.fulfilled = true;
            Some(effect)
        }
        _ => None,
    };

    let mut card_removed = false;
    if is_debt_card {
        state.record_debt(
            -amount,
            format!("Paid down {title}"),
            DebtCorrelation::payment(payment_id),
        );
        if state.ledger.debt <= 0 {
            state.deck.remove_debt_card();
            state.notify("Debt paid off!");
            card_removed = true;
        }
    }

    if let Some(effect) = pending_effect {
        apply_effect(state, config, rng, effect)?;
    }

    tracing::debug!(
        round = state.round,
        card = %title,
        amount,
        ?method,
        employer_match,
        "payment accepted"
    );

    Ok(PaymentReceipt {
        card_id,
        payment_id,
        amount,
        method,
        employer_match,
        effect_fired: pending_effect.is_some(),
        card_removed,
    })
}

/// Match cash retirement deposits until the per-round cap is used up.
pub fn employer_match(
    state: &mut GameState,
    config: &GameConfig,
    bucket: SavingsBucket,
    amount: Dollars,
    method: PaymentMethod,
) -> Dollars {
    if bucket != SavingsBucket::Retirement || method != PaymentMethod::Cash {
        return 0;
    }
    let rules = &config.employer_match;
    let cap_left = rules.cap_per_round - state.retirement_match_this_round;
    if cap_left <= 0 {
        return 0;
    }

    let matched = cap_left.min((amount as f64 * rules.percent).round() as Dollars);
    if matched > 0 {
        state.ledger.deposit(SavingsBucket::Retirement, matched);
        state.retirement_match_this_round += matched;
        state.notify(format!("Employer matched ${matched}! (Free Money)"));
    }
    matched
}

/// Reverse a payment exactly. Returns the removed payment.
pub fn undo_payment(state: &mut GameState, card_id: CardId, payment_id: PaymentId) -> Result<Payment> {
    let card = card(state, card_id)?;
    let payment = *card.payment(payment_id).ok_or(GameError::PaymentNotFound {
        card_id,
        payment_id,
    })?;
    let is_goal = card.is_savings();
    let is_debt_card = card.is_debt_card();

    if card.fulfilled && card.on_paid.is_some() {
        return Err(InvalidOperation::EffectLocked { card_id }.into());
    }
    if payment.method == PaymentMethod::Credit {
        let recorded = state
            .ledger
            .debt_record_for(payment_id)
            .map_or(0, |d| d.amount);
        if state.ledger.debt - recorded < 0 {
            return Err(InvalidOperation::DebtAlreadyRepaid.into());
        }
    }
    if is_goal {
        let bucket = payment.savings_type;
        let needed = if bucket == SavingsBucket::Retirement {
            payment.amount + payment.employer_match
        } else {
            payment.amount
        };
        if state.ledger.balance(bucket) < needed {
            return Err(InvalidOperation::DepositAlreadySpent { bucket }.into());
        }
    }

    match payment.method {
        PaymentMethod::Credit => {
            state.ledger.remove_debt_record(payment_id);
        }
        PaymentMethod::Cash => state.ledger.credit_cash(payment.amount),
    }
    if is_debt_card {
        state.ledger.remove_debt_record(payment_id);
    }
    if is_goal {
        state.ledger.withdraw(payment.savings_type, payment.amount)?;
        if payment.employer_match > 0 {
            state
                .ledger
                .withdraw(SavingsBucket::Retirement, payment.employer_match)?;
            state.retirement_match_this_round =
                (state.retirement_match_this_round - payment.employer_match).max(0);
        }
    }

    if let Some(card) = state.deck.get_mut(card_id) {
        card.payments.retain(|p| p.id != payment_id);
    }
    state.deck.sync_debt_card(state.ledger.debt);

    tracing::debug!(round = state.round, ?card_id, ?payment_id, "payment undone");
    Ok(payment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_serializes_method_in_snake_case() {
        let receipt = PaymentReceipt {
            card_id: CardId(3),
            payment_id: PaymentId(9),
            amount: 50,
            method: PaymentMethod::Credit,
            employer_match: 0,
            effect_fired: false,
            card_removed: false,
        };
        let json = serde_json::to_string(&receipt).unwrap();
        assert!(json.contains(r#""method":"credit""#));
    }
}
