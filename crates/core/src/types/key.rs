//! Customer key type.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The unique key of a customer record.
///
/// Keys are random UUIDs. Once a key has been assigned to a record it never
/// changes; the domain models expose it through a read accessor only.
///
/// ## Examples
///
/// ```
/// use reef_core::CustomerKey;
///
/// let key = CustomerKey::new();
/// let same = CustomerKey::parse(&key.to_string()).unwrap();
/// assert_eq!(key, same);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerKey(Uuid);

impl CustomerKey {
    /// Generate a fresh random key.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse a key from its canonical string form.
    ///
    /// # Errors
    ///
    /// Returns `uuid::Error` if the input is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for CustomerKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CustomerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CustomerKey {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<CustomerKey> for Uuid {
    fn from(key: CustomerKey) -> Self {
        key.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keys_are_distinct() {
        assert_ne!(CustomerKey::new(), CustomerKey::new());
    }

    #[test]
    fn test_parse_roundtrip() {
        let key = CustomerKey::new();
        let parsed = CustomerKey::parse(&key.to_string()).unwrap();
        assert_eq!(key, parsed);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(CustomerKey::parse("not-a-key").is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let key = CustomerKey::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"550e8400-e29b-41d4-a716-446655440000\"");

        let back: CustomerKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
