//! Customer service errors.

use thiserror::Error;

use crate::store::StoreError;

/// Errors returned by [`super::CustomerService`] operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A storage failure, propagated unchanged from the backing store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The mutation lock was poisoned by a panicking thread.
    #[error("customer mutation lock poisoned")]
    LockPoisoned,
}
