use crate::core::currency::CurrencyCode;
use crate::core::money::MinorUnits;
use crate::core::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A directed transfer that settles part of the group's balances.
///
/// `from` is the debtor, `to` the creditor. Amounts produced by the optimizer
/// are always positive and `from != to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: MinorUnits,
    pub currency: CurrencyCode,
}

impl Payment {
    pub fn new(
        from: ParticipantId,
        to: ParticipantId,
        amount: MinorUnits,
        currency: CurrencyCode,
    ) -> Self {
        Self {
            from,
            to,
            amount,
            currency,
        }
    }
}

impl fmt::Display for Payment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}: {} {}", self.from, self.to, self.amount, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_display() {
        let payment = Payment::new(
            ParticipantId::new(2),
            ParticipantId::new(1),
            300,
            CurrencyCode::new("EUR"),
        );
        assert_eq!(payment.to_string(), "#2 → #1: 300 EUR");
    }
}
