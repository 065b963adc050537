//! Cards, payments and one-shot effects
//!
//! A card is a round-scoped obligation or opportunity. Players drop discrete
//! payments on it; the payment stack is kept so every payment can be undone.

use serde::{Deserialize, Serialize};

use super::ids::{CardId, PaymentId};
use super::ledger::{Dollars, SavingsBucket};

/// TTL given to the debt card. It is never aged, the value only has to be large.
pub const DEBT_CARD_TTL: u32 = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    #[serde(rename = "fixed")]
    Fixed,
    #[serde(rename = "var")]
    Variable,
    #[serde(rename = "goal")]
    Goal,
    #[serde(rename = "event")]
    Event,
    #[serde(rename = "opp")]
    Opportunity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Credit,
}

/// Variable spending categories that feed the QoL formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendCategory {
    Food,
    Entertainment,
}

impl SpendCategory {
    pub const ALL: [SpendCategory; 2] = [SpendCategory::Food, SpendCategory::Entertainment];
}

/// Cards whose outcome is inspected at round end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKey {
    DentalCheckup,
}

/// One-shot side effect fired the first time a card is paid in full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OnPaidEffect {
    EnrollHealthInsurance,
    SkillBootcamp,
    AskForRaise,
    OvertimeBlock,
    FarmersMarketHabit,
    StartSideHustle,
    SideHustleShift,
    /// Refunds `reduction` of a previous rent hike
    NegotiateRentHike { reduction: Dollars },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub amount: Dollars,
    pub method: PaymentMethod,
    pub savings_type: SavingsBucket,
    /// Employer match deposited alongside this payment, clawed back on undo
    #[serde(default)]
    pub employer_match: Dollars,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<SpendCategory>,
    /// Spend needed to hold QoL steady
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<Dollars>,
    /// Payment cap; replaces `amount` as the cap when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Dollars>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings_type: Option<SavingsBucket>,
    #[serde(default)]
    pub debt_card: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<TrackKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub kind: CardKind,
    pub title: String,
    pub amount: Dollars,
    pub optional: bool,
    #[serde(default)]
    pub note: String,
    pub rounds_left: u32,
    pub payments: Vec<Payment>,
    /// Set once `on_paid` has fired
    pub fulfilled: bool,
    /// Debt added when missed, instead of `owed + penalty`
    pub debt_on_miss: Option<Dollars>,
    pub meta: CardMeta,
    pub on_paid: Option<OnPaidEffect>,
}

impl Card {
    pub fn new(id: CardId, kind: CardKind, title: impl Into<String>, amount: Dollars) -> Self {
        Self {
            id,
            kind,
            title: title.into(),
            amount,
            optional: false,
            note: String::new(),
            rounds_left: 1,
            payments: Vec::new(),
            fulfilled: false,
            debt_on_miss: None,
            meta: CardMeta::default(),
            on_paid: None,
        }
    }

    // === Builder helpers ===

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    #[must_use]
    pub fn ttl(mut self, rounds: u32) -> Self {
        self.rounds_left = rounds;
        self
    }

    #[must_use]
    pub fn debt_on_miss(mut self, amount: Dollars) -> Self {
        self.debt_on_miss = Some(amount);
        self
    }

    #[must_use]
    pub fn meta(mut self, meta: CardMeta) -> Self {
        self.meta = meta;
        self
    }

    #[must_use]
    pub fn on_paid(mut self, effect: OnPaidEffect) -> Self {
        self.on_paid = Some(effect);
        self
    }

    // === Queries ===

    pub fn paid(&self) -> Dollars {
        self.payments.iter().map(|p| p.amount).sum()
    }

    pub fn credit_paid(&self) -> Dollars {
        self.payments
            .iter()
            .filter(|p| p.method == PaymentMethod::Credit)
            .map(|p| p.amount)
            .sum()
    }

    pub fn is_savings(&self) -> bool {
        self.meta.savings_type.is_some()
    }

    pub fn is_debt_card(&self) -> bool {
        self.meta.debt_card
    }

    /// Payment cap. `None` means unbounded (savings goals).
    pub fn cap(&self) -> Option<Dollars> {
        if self.is_savings() {
            None
        } else {
            Some(self.meta.max.unwrap_or(self.amount))
        }
    }

    /// What can still be paid this round. `None` means unbounded.
    pub fn remaining(&self) -> Option<Dollars> {
        self.cap().map(|cap| (cap - self.paid()).max(0))
    }

    pub fn is_paid_in_full(&self) -> bool {
        self.paid() >= self.amount
    }

    /// Fixed bills and anything carrying a debt-on-miss amount
    pub fn creates_debt_on_miss(&self) -> bool {
        self.kind == CardKind::Fixed || self.debt_on_miss.is_some()
    }

    /// Unpaid obligation that expires at the end of this round
    pub fn is_expiring_obligation(&self) -> bool {
        self.kind != CardKind::Goal
            && !self.is_debt_card()
            && self.creates_debt_on_miss()
            && self.rounds_left <= 1
            && self.paid() < self.amount
    }

    pub fn payment(&self, payment_id: PaymentId) -> Option<&Payment> {
        self.payments.iter().find(|p| p.id == payment_id)
    }
}
