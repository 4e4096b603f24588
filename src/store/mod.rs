//! Storage ports.
//!
//! The settlement core never talks to a database. Callers hand it snapshots
//! through [`ExpenseSource`] and may persist the outcome through
//! [`SettlementSink`]. [`memory::MemoryStore`] implements both for the CLI
//! and for tests.

pub mod memory;

use crate::core::currency::CurrencyCode;
use crate::core::error::StoreError;
use crate::core::expense::{ExpenseSnapshot, GroupId};
use crate::settlement::record::SettlementRecord;

/// Read side: the expenses of a group in one currency.
pub trait ExpenseSource {
    /// Snapshot of the group's expenses in `currency` and all their shares.
    ///
    /// The snapshot is read-only for the duration of one computation.
    fn snapshot(&self, group: GroupId, currency: &CurrencyCode) -> Result<ExpenseSnapshot, StoreError>;
}

/// Write side: where computed settlements are recorded.
pub trait SettlementSink {
    fn record_settlements(&mut self, records: Vec<SettlementRecord>) -> Result<(), StoreError>;
}
