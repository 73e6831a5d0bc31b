//! Strongly-typed identifier wrappers.
//!
//! Owners are chat-platform users identified by a numeric snowflake id.
//! Market browsing sessions are identified by a UUID v7 minted when the
//! session opens. Wrapping both in newtypes prevents accidental mixing
//! of identifiers at compile time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a pet owner (chat-platform user snowflake).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct OwnerId(pub u64);

impl OwnerId {
    /// Wrap a raw snowflake id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Return the raw snowflake id.
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for OwnerId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<OwnerId> for u64 {
    fn from(id: OwnerId) -> Self {
        id.0
    }
}

/// Unique identifier for a market browsing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MarketSessionId(pub Uuid);

impl MarketSessionId {
    /// Create a new session identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for MarketSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for MarketSessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for MarketSessionId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_id_roundtrip() {
        let id = OwnerId::new(123_456_789);
        assert_eq!(id.into_inner(), 123_456_789);
        assert_eq!(id.to_string(), "123456789");
    }

    #[test]
    fn owner_id_from_u64() {
        let id: OwnerId = 42_u64.into();
        assert_eq!(u64::from(id), 42);
    }

    #[test]
    fn market_session_ids_are_unique() {
        assert_ne!(MarketSessionId::new(), MarketSessionId::new());
    }
}
