use serde::{Deserialize, Serialize};

use super::ledger::{Dollars, SavingsBucket};

/// A savings withdrawal that lands in cash at the start of `round_due`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledWithdrawal {
    pub amount: Dollars,
    pub source: SavingsBucket,
    pub round_due: u32,
}
