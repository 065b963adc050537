//! Ledger: cash, debt and savings buckets
//!
//! The ledger owns every dollar in the game. Debt is tracked twice, as a
//! running total and as an ordered list of records, and the two must always
//! agree. Paydowns are stored as negative records so undo can restore them.

use serde::{Deserialize, Serialize};

use super::ids::{CardId, DebtRecordId, PaymentId};
use crate::error::InvalidOperation;

/// Whole dollars. Every amount in the game is an integer.
pub type Dollars = i64;

/// Savings silos a goal card can deposit into
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavingsBucket {
    /// Withdraw anytime, near-zero interest
    Emergency,
    /// High-yield savings; withdrawals land later
    Hysa,
    /// Trip fund with HYSA-like interest
    Vacation,
    /// Locked nest egg exposed to market swings
    Retirement,
    Other,
}

impl SavingsBucket {
    pub const ALL: [SavingsBucket; 5] = [
        SavingsBucket::Emergency,
        SavingsBucket::Hysa,
        SavingsBucket::Vacation,
        SavingsBucket::Retirement,
        SavingsBucket::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SavingsBucket::Emergency => "Emergency Fund",
            SavingsBucket::Hysa => "HYSA",
            SavingsBucket::Vacation => "Vacation Fund",
            SavingsBucket::Retirement => "Retirement",
            SavingsBucket::Other => "Other Savings",
        }
    }

    /// Liquid buckets count toward liquidity (and the layoff buffer).
    pub fn is_liquid(self) -> bool {
        matches!(
            self,
            SavingsBucket::Emergency | SavingsBucket::Hysa | SavingsBucket::Vacation
        )
    }
}

/// Balances for every savings bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Savings {
    pub emergency: Dollars,
    pub hysa: Dollars,
    pub vacation: Dollars,
    pub retirement: Dollars,
    pub other: Dollars,
}

impl Savings {
    pub fn get(&self, bucket: SavingsBucket) -> Dollars {
        match bucket {
            SavingsBucket::Emergency => self.emergency,
            SavingsBucket::Hysa => self.hysa,
            SavingsBucket::Vacation => self.vacation,
            SavingsBucket::Retirement => self.retirement,
            SavingsBucket::Other => self.other,
        }
    }

    fn slot(&mut self, bucket: SavingsBucket) -> &mut Dollars {
        match bucket {
            SavingsBucket::Emergency => &mut self.emergency,
            SavingsBucket::Hysa => &mut self.hysa,
            SavingsBucket::Vacation => &mut self.vacation,
            SavingsBucket::Retirement => &mut self.retirement,
            SavingsBucket::Other => &mut self.other,
        }
    }

    pub fn total(&self) -> Dollars {
        SavingsBucket::ALL.iter().map(|b| self.get(*b)).sum()
    }
}

/// What a debt record is tied to, for undo and reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtCorrelation {
    pub payment_id: Option<PaymentId>,
    pub card_id: Option<CardId>,
}

impl DebtCorrelation {
    pub fn payment(payment_id: PaymentId) -> Self {
        Self {
            payment_id: Some(payment_id),
            card_id: None,
        }
    }

    pub fn card(card_id: CardId) -> Self {
        Self {
            payment_id: None,
            card_id: Some(card_id),
        }
    }
}

/// A single change to outstanding debt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtRecord {
    pub id: DebtRecordId,
    /// Positive when borrowing, negative when paying down
    pub amount: Dollars,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<PaymentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<CardId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub cash: Dollars,
    pub debt: Dollars,
    pub debt_records: Vec<DebtRecord>,
    pub savings: Savings,
    next_record_id: u32,
}

impl Ledger {
    pub fn with_cash(cash: Dollars) -> Self {
        Self {
            cash,
            ..Default::default()
        }
    }

    /// Add money to a bucket. Negative amounts are ignored and the balance
    /// never drops below zero.
    pub fn deposit(&mut self, bucket: SavingsBucket, amount: Dollars) -> Dollars {
        let slot = self.savings.slot(bucket);
        *slot = (*slot + amount.max(0)).max(0);
        *slot
    }

    pub fn withdraw(
        &mut self,
        bucket: SavingsBucket,
        amount: Dollars,
    ) -> Result<Dollars, InvalidOperation> {
        if amount <= 0 {
            return Err(InvalidOperation::NonPositiveAmount);
        }
        let slot = self.savings.slot(bucket);
        if amount > *slot {
            return Err(InvalidOperation::InsufficientFunds {
                bucket,
                requested: amount,
                available: *slot,
            });
        }
        *slot -= amount;
        Ok(*slot)
    }

    pub fn balance(&self, bucket: SavingsBucket) -> Dollars {
        self.savings.get(bucket)
    }

    /// Take cash out of the wallet, refusing to go negative.
    pub fn debit_cash(&mut self, amount: Dollars) -> Result<(), InvalidOperation> {
        if amount > self.cash {
            return Err(InvalidOperation::InsufficientCash {
                requested: amount,
                available: self.cash,
            });
        }
        self.cash -= amount;
        Ok(())
    }

    pub fn credit_cash(&mut self, amount: Dollars) {
        self.cash += amount;
    }

    /// Append a debt record and adjust the running total.
    ///
    /// Callers that own a debt card must re-sync it afterwards; see
    /// [`crate::game_state::GameState::record_debt`].
    pub fn record_debt(
        &mut self,
        amount: Dollars,
        reason: impl Into<String>,
        correlation: DebtCorrelation,
    ) -> DebtRecordId {
        self.next_record_id += 1;
        let id = DebtRecordId(self.next_record_id);
        self.debt += amount;
        self.debt_records.push(DebtRecord {
            id,
            amount,
            reason: reason.into(),
            payment_id: correlation.payment_id,
            card_id: correlation.card_id,
        });
        id
    }

    pub fn debt_record_for(&self, payment_id: PaymentId) -> Option<&DebtRecord> {
        self.debt_records
            .iter()
            .find(|d| d.payment_id == Some(payment_id))
    }

    /// Drop the record tied to a payment, reversing its effect on `debt`.
    /// Missing records are a no-op.
    pub fn remove_debt_record(&mut self, payment_id: PaymentId) -> Option<DebtRecord> {
        let idx = self
            .debt_records
            .iter()
            .position(|d| d.payment_id == Some(payment_id))?;
        let record = self.debt_records.remove(idx);
        self.debt -= record.amount;
        Some(record)
    }

    pub fn debt_is_consistent(&self) -> bool {
        self.debt == self.debt_records.iter().map(|d| d.amount).sum::<Dollars>()
    }

    // === Derived totals ===

    pub fn liquid_savings(&self) -> Dollars {
        self.savings.emergency + self.savings.hysa + self.savings.vacation
    }

    pub fn liquidity(&self) -> Dollars {
        self.cash + self.liquid_savings()
    }

    pub fn nest_egg(&self) -> Dollars {
        self.savings.retirement
    }

    pub fn net_worth(&self) -> Dollars {
        self.liquidity() + self.nest_egg() - self.debt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_withdraw_rejects_overdraw() {
        let mut ledger = Ledger::default();
        ledger.deposit(SavingsBucket::Hysa, 100);

        let err = ledger.withdraw(SavingsBucket::Hysa, 101).unwrap_err();
        assert!(matches!(err, InvalidOperation::InsufficientFunds { .. }));
        assert_eq!(ledger.balance(SavingsBucket::Hysa), 100);

        assert_eq!(ledger.withdraw(SavingsBucket::Hysa, 40).unwrap(), 60);
    }

    #[test]
    fn test_deposit_ignores_negative_amounts() {
        let mut ledger = Ledger::default();
        ledger.deposit(SavingsBucket::Emergency, 50);
        assert_eq!(ledger.deposit(SavingsBucket::Emergency, -80), 50);
    }

    #[test]
    fn test_debt_records_track_total() {
        let mut ledger = Ledger::default();
        ledger.record_debt(300, "Credit used on Rent", DebtCorrelation::payment(PaymentId(7)));
        ledger.record_debt(-100, "Paid down debt", DebtCorrelation::payment(PaymentId(8)));
        assert_eq!(ledger.debt, 200);
        assert!(ledger.debt_is_consistent());

        let removed = ledger.remove_debt_record(PaymentId(8)).unwrap();
        assert_eq!(removed.amount, -100);
        assert_eq!(ledger.debt, 300);
        assert!(ledger.debt_is_consistent());

        assert!(ledger.remove_debt_record(PaymentId(99)).is_none());
        assert_eq!(ledger.debt, 300);
    }

    #[test]
    fn test_derived_totals() {
        let mut ledger = Ledger::with_cash(200);
        ledger.deposit(SavingsBucket::Emergency, 100);
        ledger.deposit(SavingsBucket::Vacation, 50);
        ledger.deposit(SavingsBucket::Retirement, 1_000);
        ledger.record_debt(400, "Layoff", DebtCorrelation::default());

        assert_eq!(ledger.liquid_savings(), 150);
        assert_eq!(ledger.liquidity(), 350);
        assert_eq!(ledger.nest_egg(), 1_000);
        assert_eq!(ledger.net_worth(), 950);
    }
}
