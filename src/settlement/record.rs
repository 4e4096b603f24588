use crate::core::currency::CurrencyCode;
use crate::core::expense::GroupId;
use crate::core::money::MinorUnits;
use crate::core::participant::ParticipantId;
use crate::settlement::payment::Payment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Lifecycle of a persisted settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    Pending,
    Completed,
    Cancelled,
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SettlementStatus::Pending => "pending",
            SettlementStatus::Completed => "completed",
            SettlementStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Errors arising from settlement status changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    #[error("settlement {id} is {from} and cannot become {to}")]
    InvalidTransition {
        id: Uuid,
        from: SettlementStatus,
        to: SettlementStatus,
    },
}

/// A payment the group has recorded as an obligation.
///
/// Records start out [`SettlementStatus::Pending`]. Only pending records can
/// be completed or cancelled; both are final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    id: Uuid,
    group_id: GroupId,
    from: ParticipantId,
    to: ParticipantId,
    amount: MinorUnits,
    currency: CurrencyCode,
    status: SettlementStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SettlementRecord {
    /// Create a pending record for a payment.
    pub fn pending(group_id: GroupId, payment: &Payment) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            group_id,
            from: payment.from,
            to: payment.to,
            amount: payment.amount,
            currency: payment.currency.clone(),
            status: SettlementStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the payment as made.
    pub fn complete(&mut self) -> Result<(), StatusError> {
        self.transition(SettlementStatus::Completed)
    }

    /// Withdraw the obligation, e.g. because expenses changed.
    pub fn cancel(&mut self) -> Result<(), StatusError> {
        self.transition(SettlementStatus::Cancelled)
    }

    fn transition(&mut self, to: SettlementStatus) -> Result<(), StatusError> {
        if self.status != SettlementStatus::Pending {
            return Err(StatusError::InvalidTransition {
                id: self.id,
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    /// Who pays.
    pub fn debtor(&self) -> ParticipantId {
        self.from
    }

    /// Who gets paid.
    pub fn creditor(&self) -> ParticipantId {
        self.to
    }

    pub fn amount(&self) -> MinorUnits {
        self.amount
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn status(&self) -> SettlementStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// The payment this record stands for.
    pub fn payment(&self) -> Payment {
        Payment::new(self.from, self.to, self.amount, self.currency.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SettlementRecord {
        SettlementRecord::pending(
            GroupId::new(1),
            &Payment::new(
                ParticipantId::new(2),
                ParticipantId::new(1),
                300,
                CurrencyCode::new("EUR"),
            ),
        )
    }

    #[test]
    fn test_record_starts_pending() {
        let rec = record();
        assert_eq!(rec.status(), SettlementStatus::Pending);
        assert_eq!(rec.amount(), 300);
        assert_eq!(rec.payment().from, ParticipantId::new(2));
    }

    #[test]
    fn test_complete_pending() {
        let mut rec = record();
        rec.complete().unwrap();
        assert_eq!(rec.status(), SettlementStatus::Completed);
        assert!(rec.updated_at() >= rec.created_at());
    }

    #[test]
    fn test_completed_cannot_be_cancelled() {
        let mut rec = record();
        rec.complete().unwrap();
        let err = rec.cancel().unwrap_err();
        assert_eq!(
            err,
            StatusError::InvalidTransition {
                id: rec.id(),
                from: SettlementStatus::Completed,
                to: SettlementStatus::Cancelled,
            }
        );
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&SettlementStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }
}
