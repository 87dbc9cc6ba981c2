//! Customer service.
//!
//! Every mutating operation follows the same lifecycle: optional
//! cancellable pre-event, then the write lock, one unit of work, commit,
//! unlock, post-event. A veto from a pre-event observer is a business
//! outcome, not an error: the record comes back unpersisted with its
//! cancelled flag set, and neither the lock nor the store is touched.
//!
//! Mutations across ALL customers serialize through the one write lock,
//! regardless of which keys they target. Reads bypass the lock and query
//! the store directly; "not found" is `Ok(None)`, never an error.

mod error;

pub use error::ServiceError;

use std::sync::{Arc, RwLock, RwLockWriteGuard};

use reef_core::{CustomerKey, Email, MemberId};

use crate::events::ObserverRegistry;
use crate::models::{AnonymousCustomer, AnyCustomer, Customer};
use crate::store::{UnitOfWork, UnitOfWorkProvider};

/// Service for customer persistence and lifecycle events.
pub struct CustomerService {
    provider: Arc<dyn UnitOfWorkProvider>,
    observers: ObserverRegistry,
    lock: RwLock<()>,
}

impl CustomerService {
    /// Create a service with no observers.
    #[must_use]
    pub fn new(provider: Arc<dyn UnitOfWorkProvider>) -> Self {
        Self::with_observers(provider, ObserverRegistry::new())
    }

    /// Create a service with the given observer registry.
    #[must_use]
    pub fn with_observers(
        provider: Arc<dyn UnitOfWorkProvider>,
        observers: ObserverRegistry,
    ) -> Self {
        Self {
            provider,
            observers,
            lock: RwLock::new(()),
        }
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Construct and persist a new anonymous customer.
    ///
    /// Used by guest flows; no events fire.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the store fails or the lock is poisoned.
    pub fn create_anonymous_customer(&self) -> Result<AnonymousCustomer, ServiceError> {
        let anonymous = AnonymousCustomer::new();
        {
            let _guard = self.write_guard()?;
            let mut uow = self.provider.unit_of_work()?;
            uow.anonymous_customers().add_or_update(&anonymous)?;
            uow.commit()?;
        }
        tracing::debug!(key = %anonymous.key(), "created anonymous customer");
        Ok(anonymous)
    }

    /// Construct a customer WITHOUT persisting it.
    ///
    /// Observers are notified that the record exists; nothing is written.
    #[must_use]
    pub fn create_customer(
        &self,
        first_name: &str,
        last_name: &str,
        email: Option<Email>,
        member_id: Option<MemberId>,
    ) -> Customer {
        let customer = Customer::new(first_name, last_name, email, member_id);
        self.observers.notify_created(&customer);
        customer
    }

    /// Construct a customer and persist it.
    ///
    /// Observers get a chance to veto before anything is written. On veto
    /// the customer is returned with [`Customer::was_cancelled`] set and
    /// zero writes performed - no error, no lock acquired.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the store fails or the lock is poisoned.
    pub fn create_customer_with_key(
        &self,
        first_name: &str,
        last_name: &str,
        email: Option<Email>,
        member_id: Option<MemberId>,
    ) -> Result<Customer, ServiceError> {
        let mut customer = Customer::new(first_name, last_name, email, member_id);

        if let Err(cancellation) = self.observers.notify_creating(&customer) {
            tracing::debug!(
                key = %customer.key(),
                reason = %cancellation,
                "customer creation vetoed"
            );
            customer.mark_cancelled();
            return Ok(customer);
        }

        {
            let _guard = self.write_guard()?;
            let mut uow = self.provider.unit_of_work()?;
            uow.customers().add_or_update(&customer)?;
            uow.commit()?;
        }

        tracing::debug!(
            key = %customer.key(),
            email = ?customer.email.as_ref().map(Email::redacted),
            "created customer"
        );
        self.observers.notify_created(&customer);
        Ok(customer)
    }

    /// Construct and persist a customer linked to the given member, with a
    /// blank profile.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the store fails or the lock is poisoned.
    pub fn create_customer_for_member(
        &self,
        member_id: MemberId,
    ) -> Result<Customer, ServiceError> {
        self.create_customer_with_key("", "", None, Some(member_id))
    }

    // =========================================================================
    // Save & Delete
    // =========================================================================

    /// Upsert a single customer.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the store fails or the lock is poisoned.
    pub fn save(&self, customer: &Customer, raise_events: bool) -> Result<(), ServiceError> {
        self.save_many(std::slice::from_ref(customer), raise_events)
    }

    /// Upsert a batch of customers in one transaction.
    ///
    /// When `raise_events` is set, `saving`/`saved` fire once for the whole
    /// batch, not per item.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the store fails or the lock is poisoned;
    /// no item is persisted in that case.
    pub fn save_many(&self, customers: &[Customer], raise_events: bool) -> Result<(), ServiceError> {
        if raise_events {
            self.observers.notify_saving(customers);
        }

        {
            let _guard = self.write_guard()?;
            let mut uow = self.provider.unit_of_work()?;
            let repository = uow.customers();
            for customer in customers {
                repository.add_or_update(customer)?;
            }
            uow.commit()?;
        }

        if raise_events {
            self.observers.notify_saved(customers);
        }
        tracing::debug!(count = customers.len(), "saved customers");
        Ok(())
    }

    /// Delete a single customer.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the store fails or the lock is poisoned.
    pub fn delete(&self, customer: &Customer, raise_events: bool) -> Result<(), ServiceError> {
        self.delete_many(std::slice::from_ref(customer), raise_events)
    }

    /// Delete a batch of customers in one transaction.
    ///
    /// Event semantics mirror [`CustomerService::save_many`].
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the store fails or the lock is poisoned;
    /// no item is deleted in that case.
    pub fn delete_many(
        &self,
        customers: &[Customer],
        raise_events: bool,
    ) -> Result<(), ServiceError> {
        if raise_events {
            self.observers.notify_deleting(customers);
        }

        {
            let _guard = self.write_guard()?;
            let mut uow = self.provider.unit_of_work()?;
            let repository = uow.customers();
            for customer in customers {
                repository.delete(customer)?;
            }
            uow.commit()?;
        }

        if raise_events {
            self.observers.notify_deleted(customers);
        }
        tracing::debug!(count = customers.len(), "deleted customers");
        Ok(())
    }

    // =========================================================================
    // Conversion
    // =========================================================================

    /// Convert an anonymous record into an identified customer.
    ///
    /// On observer veto the would-be customer is returned with its
    /// cancelled flag set and zero writes performed. Otherwise the new
    /// customer is persisted and the anonymous record deleted in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the store fails or the lock is poisoned.
    pub fn convert_anonymous(
        &self,
        anonymous: &AnonymousCustomer,
        first_name: &str,
        last_name: &str,
        email: Option<Email>,
        member_id: Option<MemberId>,
    ) -> Result<Customer, ServiceError> {
        let mut customer = Customer::new(first_name, last_name, email, member_id);

        if let Err(cancellation) = self.observers.notify_converting(anonymous) {
            tracing::debug!(
                key = %anonymous.key(),
                reason = %cancellation,
                "anonymous conversion vetoed"
            );
            customer.mark_cancelled();
            return Ok(customer);
        }

        {
            let _guard = self.write_guard()?;
            let mut uow = self.provider.unit_of_work()?;
            uow.customers().add_or_update(&customer)?;
            uow.anonymous_customers().delete(anonymous)?;
            uow.commit()?;
        }

        tracing::debug!(
            from = %anonymous.key(),
            to = %customer.key(),
            "converted anonymous customer"
        );
        self.observers.notify_converted(&customer);
        Ok(customer)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Fetch a customer by key. `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the store fails.
    pub fn get_by_key(&self, key: CustomerKey) -> Result<Option<Customer>, ServiceError> {
        let mut uow = self.provider.unit_of_work()?;
        Ok(uow.customers().get(key)?)
    }

    /// Fetch the customers matching the given keys; unknown keys are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the store fails.
    pub fn get_by_keys(&self, keys: &[CustomerKey]) -> Result<Vec<Customer>, ServiceError> {
        let mut uow = self.provider.unit_of_work()?;
        Ok(uow.customers().get_all(keys)?)
    }

    /// Fetch every customer.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the store fails.
    pub fn get_all(&self) -> Result<Vec<Customer>, ServiceError> {
        let mut uow = self.provider.unit_of_work()?;
        Ok(uow.customers().get_all(&[])?)
    }

    /// Fetch the customer linked to the given member id, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the store fails.
    pub fn get_by_member_id(
        &self,
        member_id: MemberId,
    ) -> Result<Option<Customer>, ServiceError> {
        let mut uow = self.provider.unit_of_work()?;
        Ok(uow.customers().get_by_member_id(member_id)?)
    }

    /// Fetch whichever record owns the key, anonymous or identified.
    ///
    /// Guest sessions dominate these lookups, so the anonymous store is
    /// checked first.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the store fails.
    pub fn get_any_by_key(&self, key: CustomerKey) -> Result<Option<AnyCustomer>, ServiceError> {
        let mut uow = self.provider.unit_of_work()?;
        if let Some(anonymous) = uow.anonymous_customers().get(key)? {
            return Ok(Some(AnyCustomer::Anonymous(anonymous)));
        }
        Ok(uow.customers().get(key)?.map(AnyCustomer::Registered))
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, ()>, ServiceError> {
        self.lock.write().map_err(|_| ServiceError::LockPoisoned)
    }
}
