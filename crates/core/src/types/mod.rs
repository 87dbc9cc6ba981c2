//! Shared newtype wrappers.
//!
//! These types prevent accidentally mixing identifiers from different
//! entity spaces and keep validation at the edges.

mod email;
mod key;
mod member;

pub use email::{Email, EmailError};
pub use key::CustomerKey;
pub use member::MemberId;
