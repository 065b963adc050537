//! Savings withdrawals
//!
//! Emergency money lands in cash right away. HYSA and vacation withdrawals
//! leave the bucket now and arrive a few rounds later. Retirement is locked.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::InvalidOperation;
use crate::game_state::GameState;
use crate::model::{Dollars, SavingsBucket, ScheduledWithdrawal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WithdrawalOutcome {
    Immediate {
        bucket: SavingsBucket,
        amount: Dollars,
    },
    Scheduled(ScheduledWithdrawal),
}

pub fn request_withdrawal(
    state: &mut GameState,
    config: &GameConfig,
    bucket: SavingsBucket,
    amount: Dollars,
) -> Result<WithdrawalOutcome, InvalidOperation> {
    if amount <= 0 {
        return Err(InvalidOperation::NonPositiveAmount);
    }
    match bucket {
        SavingsBucket::Retirement => return Err(InvalidOperation::RetirementLocked),
        SavingsBucket::Other => return Err(InvalidOperation::NotWithdrawable(bucket)),
        SavingsBucket::Emergency | SavingsBucket::Hysa | SavingsBucket::Vacation => {}
    }

    state.ledger.withdraw(bucket, amount)?;

    if bucket == SavingsBucket::Emergency {
        state.ledger.credit_cash(amount);
        state.notify(format!("Withdrew ${amount} to your balance."));
        return Ok(WithdrawalOutcome::Immediate { bucket, amount });
    }

    let scheduled = ScheduledWithdrawal {
        amount,
        source: bucket,
        round_due: state.round + config.withdrawal_delay_rounds,
    };
    state.scheduled_withdrawals.push(scheduled);
    state.notify(format!(
        "Scheduled ${amount} from {} for next round.",
        bucket.label()
    ));
    Ok(WithdrawalOutcome::Scheduled(scheduled))
}

/// Pay out every withdrawal that is due by the current round.
pub fn process_due(state: &mut GameState) -> Vec<ScheduledWithdrawal> {
    let round = state.round;
    let (arriving, waiting): (Vec<_>, Vec<_>) = state
        .scheduled_withdrawals
        .drain(..)
        .partition(|w| round >= w.round_due);
    state.scheduled_withdrawals = waiting;

    for withdrawal in &arriving {
        state.ledger.credit_cash(withdrawal.amount);
        state.notify(format!(
            "${} from {} landed in your balance.",
            withdrawal.amount,
            withdrawal.source.label()
        ));
    }
    arriving
}
