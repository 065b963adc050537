use std::fmt;

use crate::model::{CardId, DecisionKind, Dollars, OnPaidEffect, PaymentId, SavingsBucket};

/// Rejected player actions. Always recoverable: state is left untouched and
/// the `Display` text is the advisory message for the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidOperation {
    /// The card has already received its cap this round
    AlreadyMaxed,
    InsufficientCash {
        requested: Dollars,
        available: Dollars,
    },
    InsufficientFunds {
        bucket: SavingsBucket,
        requested: Dollars,
        available: Dollars,
    },
    NonPositiveAmount,
    CreditOnGoal,
    CreditOnDebt,
    /// Pay-in-full is not offered for savings goals
    SavingsNeedsBills,
    RetirementLocked,
    NotWithdrawable(SavingsBucket),
    /// Undoing the payment would leave the savings bucket short
    DepositAlreadySpent {
        bucket: SavingsBucket,
    },
    /// Undoing the credit charge would push debt below zero
    DebtAlreadyRepaid,
    /// The card's one-shot effect has fired, its payments are final
    EffectLocked {
        card_id: CardId,
    },
}

impl fmt::Display for InvalidOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidOperation::AlreadyMaxed => {
                write!(f, "you've already maxed this out for the round")
            }
            InvalidOperation::InsufficientCash {
                requested,
                available,
            } => write!(f, "not enough cash (need ${requested}, have ${available})"),
            InvalidOperation::InsufficientFunds {
                bucket,
                requested,
                available,
            } => write!(
                f,
                "cannot withdraw ${requested} from {} (balance ${available})",
                bucket.label()
            ),
            InvalidOperation::NonPositiveAmount => write!(f, "drop a bill to pay"),
            InvalidOperation::CreditOnGoal => write!(f, "can't save with credit"),
            InvalidOperation::CreditOnDebt => write!(f, "can't pay debt with more debt"),
            InvalidOperation::SavingsNeedsBills => {
                write!(f, "drop a bill to deposit into savings")
            }
            InvalidOperation::RetirementLocked => {
                write!(f, "retirement funds are locked until retirement age (59½)")
            }
            InvalidOperation::NotWithdrawable(bucket) => {
                write!(f, "{} does not support withdrawals", bucket.label())
            }
            InvalidOperation::DepositAlreadySpent { bucket } => write!(
                f,
                "that deposit has already been withdrawn from {}",
                bucket.label()
            ),
            InvalidOperation::DebtAlreadyRepaid => {
                write!(f, "that charge has already been paid off")
            }
            InvalidOperation::EffectLocked { card_id } => {
                write!(f, "card {card_id:?} already took effect; its payments are final")
            }
        }
    }
}

impl std::error::Error for InvalidOperation {}

/// Invalid game configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    UnknownDifficulty(String),
    UnknownHousing(String),
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownDifficulty(id) => write!(f, "unknown difficulty '{id}'"),
            ConfigError::UnknownHousing(id) => write!(f, "unknown housing '{id}'"),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid config value for {field}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    Invalid(InvalidOperation),
    Config(ConfigError),
    CardNotFound(CardId),
    PaymentNotFound {
        card_id: CardId,
        payment_id: PaymentId,
    },
    /// A decision must be answered before anything else happens
    DecisionPending(DecisionKind),
    /// The confirm call does not match the decision being waited on
    NoPendingDecision(DecisionKind),
    /// A one-shot card effect could not be applied; the payment was rolled back
    EffectFailed {
        effect: OnPaidEffect,
        reason: &'static str,
    },
    /// The game has ended; nothing can change any more
    GameOver,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Invalid(e) => write!(f, "{e}"),
            GameError::Config(e) => write!(f, "{e}"),
            GameError::CardNotFound(id) => write!(f, "card {id:?} not found"),
            GameError::PaymentNotFound {
                card_id,
                payment_id,
            } => write!(f, "payment {payment_id:?} not found on card {card_id:?}"),
            GameError::DecisionPending(kind) => {
                write!(f, "a {kind} decision is waiting for an answer")
            }
            GameError::NoPendingDecision(kind) => {
                write!(f, "no {kind} decision is waiting for an answer")
            }
            GameError::EffectFailed { effect, reason } => {
                write!(f, "effect {effect:?} failed: {reason}")
            }
            GameError::GameOver => write!(f, "the game is over"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Invalid(e) => Some(e),
            GameError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InvalidOperation> for GameError {
    fn from(err: InvalidOperation) -> Self {
        GameError::Invalid(err)
    }
}

impl From<ConfigError> for GameError {
    fn from(err: ConfigError) -> Self {
        GameError::Config(err)
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
