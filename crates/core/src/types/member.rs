//! Member id type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The identifier a customer carries when linked to an authenticated member
/// of the host platform.
///
/// Anonymous customers have no member id; on identified customers it is
/// optional because a record can be created before the member account
/// exists.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MemberId(i32);

impl MemberId {
    /// Create a member id from its raw value.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Get the underlying i32 value.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for MemberId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl From<MemberId> for i32 {
    fn from(id: MemberId) -> Self {
        id.0
    }
}
