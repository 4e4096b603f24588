use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a participant (group member) in an expense group.
///
/// The identity is opaque: it only serves as a mapping key. Its ordering
/// exists so that settlement output is reproducible when balances tie.
///
/// # Examples
///
/// ```
/// use grouppay_engine::core::participant::ParticipantId;
///
/// let alice = ParticipantId::new(1);
/// let bob = ParticipantId::new(2);
/// assert_ne!(alice, bob);
/// assert!(alice < bob);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(i64);

impl ParticipantId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric identity (e.g. the chat user id).
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<i64> for ParticipantId {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}
