mod card;
mod deck;
mod decision;
mod flags;
mod ids;
mod ledger;
mod schedule;
mod snapshot;

pub use card::{
    Card, CardKind, CardMeta, DEBT_CARD_TTL, OnPaidEffect, Payment, PaymentMethod, SpendCategory,
    TrackKey,
};
pub use deck::Deck;
pub use decision::{DecisionKind, ObligationPreview, PendingDecision};
pub use flags::{Coverage, Flags, VariableTracker};
pub use ids::{CardId, DebtRecordId, IdAllocator, PaymentId};
pub use ledger::{DebtCorrelation, DebtRecord, Dollars, Ledger, Savings, SavingsBucket};
pub use schedule::ScheduledWithdrawal;
pub use snapshot::{EndgameSummary, GameSnapshot, GameStatus, RetirementOutlook, RoundLog};
