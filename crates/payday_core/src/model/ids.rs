//! Unique identifiers for game entities
//!
//! Each entity type has its own ID type to provide type safety and prevent
//! mixing up different kinds of identifiers.

use serde::{Deserialize, Serialize};

/// Unique identifier for a Card within a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

/// Unique identifier for a Payment within a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PaymentId(pub u32);

/// Unique identifier for a DebtRecord within a ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DebtRecordId(pub u32);

/// Monotonic allocator shared by cards and payments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn card(&mut self) -> CardId {
        CardId(self.bump())
    }

    pub fn payment(&mut self) -> PaymentId {
        PaymentId(self.bump())
    }

    fn bump(&mut self) -> u32 {
        self.next += 1;
        self.next
    }
}
