//! Customer domain types.
//!
//! Two kinds of record share one key space: identified customers and the
//! anonymous records created for guest flows. [`AnyCustomer`] is the tagged
//! union a polymorphic lookup returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use reef_core::{CustomerKey, Email, MemberId};

/// An identified customer record.
///
/// The key is assigned at construction and never changes; there is no
/// setter for it. `was_cancelled` is set by the service when a
/// pre-persistence observer vetoes the operation - the record is then
/// handed back unpersisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    key: CustomerKey,
    /// Customer's first name.
    pub first_name: String,
    /// Customer's last name.
    pub last_name: String,
    /// Contact address, when one has been captured.
    pub email: Option<Email>,
    /// Link to the host platform's member account, when one exists.
    pub member_id: Option<MemberId>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
    was_cancelled: bool,
}

impl Customer {
    /// Construct a new customer with a fresh key. Nothing is persisted.
    #[must_use]
    pub fn new(
        first_name: &str,
        last_name: &str,
        email: Option<Email>,
        member_id: Option<MemberId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            key: CustomerKey::new(),
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            email,
            member_id,
            created_at: now,
            updated_at: now,
            was_cancelled: false,
        }
    }

    /// The record's unique key.
    #[must_use]
    pub const fn key(&self) -> CustomerKey {
        self.key
    }

    /// True when a pre-persistence observer vetoed the operation that
    /// produced this record; the record was not written.
    #[must_use]
    pub const fn was_cancelled(&self) -> bool {
        self.was_cancelled
    }

    /// First and last name joined for display.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }

    pub(crate) fn mark_cancelled(&mut self) {
        self.was_cancelled = true;
    }
}

/// A customer record with no member linkage, created implicitly for guest
/// flows such as anonymous checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymousCustomer {
    key: CustomerKey,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// Last time the guest session showed activity.
    pub last_activity_at: DateTime<Utc>,
}

impl AnonymousCustomer {
    /// Construct a new anonymous customer with a fresh key.
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            key: CustomerKey::new(),
            created_at: now,
            last_activity_at: now,
        }
    }

    /// The record's unique key.
    #[must_use]
    pub const fn key(&self) -> CustomerKey {
        self.key
    }

    /// Record guest activity now.
    pub fn touch_activity(&mut self) {
        self.last_activity_at = Utc::now();
    }
}

impl Default for AnonymousCustomer {
    fn default() -> Self {
        Self::new()
    }
}

/// Either kind of customer record, as returned by polymorphic lookups.
///
/// The discriminant is the presence of member linkage capability: an
/// anonymous record can never carry a member id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnyCustomer {
    /// A guest record from the anonymous store.
    Anonymous(AnonymousCustomer),
    /// An identified record from the customer store.
    Registered(Customer),
}

impl AnyCustomer {
    /// The record's unique key, whichever variant this is.
    #[must_use]
    pub const fn key(&self) -> CustomerKey {
        match self {
            Self::Anonymous(anonymous) => anonymous.key(),
            Self::Registered(customer) => customer.key(),
        }
    }

    /// True for the anonymous variant.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous(_))
    }

    /// The member linkage, present only on registered records that carry
    /// one.
    #[must_use]
    pub const fn member_id(&self) -> Option<MemberId> {
        match self {
            Self::Anonymous(_) => None,
            Self::Registered(customer) => customer.member_id,
        }
    }
}
