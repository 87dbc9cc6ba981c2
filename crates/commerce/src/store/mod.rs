//! Storage collaborator contracts.
//!
//! The commerce layer does not talk to a database directly; it drives an
//! injected [`UnitOfWorkProvider`]. A unit of work is one transactional
//! session: repositories obtained from it stage writes, and
//! [`UnitOfWork::commit`] persists everything staged atomically. Dropping
//! a session without committing discards its staged writes.
//!
//! [`memory`] provides an in-memory reference implementation used by tests
//! and local development.

pub mod memory;

use thiserror::Error;

use reef_core::{CustomerKey, MemberId};

use crate::models::{AnonymousCustomer, Customer};

/// Errors surfaced by a storage backend.
///
/// The service layer propagates these unchanged - there is no retry or
/// recovery above the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Opaque backend failure (connection loss, constraint violation, ...).
    #[error("storage backend error: {0}")]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),

    /// Shared store state was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    /// Wrap an arbitrary error as an opaque backend failure.
    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(error))
    }
}

/// Data-access gateway for identified customers, scoped to one unit of
/// work.
pub trait CustomerRepository {
    /// Stage an upsert of the given customer.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend rejects the write.
    fn add_or_update(&mut self, customer: &Customer) -> Result<(), StoreError>;

    /// Stage a delete of the given customer.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend rejects the write.
    fn delete(&mut self, customer: &Customer) -> Result<(), StoreError>;

    /// Fetch a customer by key. Absent keys yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the read fails.
    fn get(&self, key: CustomerKey) -> Result<Option<Customer>, StoreError>;

    /// Fetch the customers matching `keys`; an empty key list fetches every
    /// customer. Unknown keys are skipped, not errors.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the read fails.
    fn get_all(&self, keys: &[CustomerKey]) -> Result<Vec<Customer>, StoreError>;

    /// Fetch the customer linked to the given member id, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the read fails.
    fn get_by_member_id(&self, member_id: MemberId) -> Result<Option<Customer>, StoreError>;
}

/// Data-access gateway for anonymous customers, scoped to one unit of
/// work.
pub trait AnonymousCustomerRepository {
    /// Stage an upsert of the given anonymous record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend rejects the write.
    fn add_or_update(&mut self, customer: &AnonymousCustomer) -> Result<(), StoreError>;

    /// Stage a delete of the given anonymous record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend rejects the write.
    fn delete(&mut self, customer: &AnonymousCustomer) -> Result<(), StoreError>;

    /// Fetch an anonymous record by key. Absent keys yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the read fails.
    fn get(&self, key: CustomerKey) -> Result<Option<AnonymousCustomer>, StoreError>;
}

/// One transactional session against the backing store.
///
/// Repositories obtained from the session stage their writes inside it;
/// nothing is visible to other sessions until [`UnitOfWork::commit`]
/// applies the whole set atomically.
pub trait UnitOfWork {
    /// The identified-customer repository for this session.
    fn customers(&mut self) -> &mut dyn CustomerRepository;

    /// The anonymous-customer repository for this session.
    fn anonymous_customers(&mut self) -> &mut dyn AnonymousCustomerRepository;

    /// Persist everything staged in this session, atomically. Consumes the
    /// session either way.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails; no staged write is
    /// applied in that case.
    fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

/// Source of transactional sessions.
pub trait UnitOfWorkProvider: Send + Sync {
    /// Open a fresh unit of work.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a session cannot be opened.
    fn unit_of_work(&self) -> Result<Box<dyn UnitOfWork + '_>, StoreError>;
}
