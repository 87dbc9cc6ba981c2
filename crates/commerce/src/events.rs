//! Customer lifecycle events.
//!
//! The service notifies registered observers around every lifecycle
//! transition. Pre-events (`creating`, `converting`) can veto the
//! operation by returning a [`Cancellation`]; the service then hands the
//! record back unpersisted with its cancelled flag set. Post-events are
//! fire-and-forget notifications. Batch operations notify once with the
//! whole batch, never per item.
//!
//! The registry is plain instance state injected into the service - there
//! is no process-global subscription list, so tests and tenants get
//! isolated hook sets.

use core::fmt;
use std::sync::Arc;

use crate::models::{AnonymousCustomer, Customer};

/// The structured reason an observer vetoed an operation.
///
/// A veto is a legitimate business outcome, not an error: the service
/// returns the affected record with `was_cancelled()` set instead of
/// failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cancellation {
    reason: String,
}

impl Cancellation {
    /// Create a cancellation with a human-readable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The reason the operation was vetoed.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for Cancellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)
    }
}

/// Hooks around customer lifecycle transitions.
///
/// Every method has a no-op default, so observers implement only what
/// they care about.
pub trait CustomerObserver: Send + Sync {
    /// Called before a customer is persisted for the first time. Returning
    /// a [`Cancellation`] stops the write.
    fn creating(&self, _customer: &Customer) -> Result<(), Cancellation> {
        Ok(())
    }

    /// Called after a customer has been created. Also fires for customers
    /// constructed without persistence.
    fn created(&self, _customer: &Customer) {}

    /// Called before an anonymous record is converted into a customer.
    /// Returning a [`Cancellation`] stops the conversion.
    fn converting(&self, _anonymous: &AnonymousCustomer) -> Result<(), Cancellation> {
        Ok(())
    }

    /// Called after an anonymous record has been converted.
    fn converted(&self, _customer: &Customer) {}

    /// Called once before a save batch is written.
    fn saving(&self, _customers: &[Customer]) {}

    /// Called once after a save batch has committed.
    fn saved(&self, _customers: &[Customer]) {}

    /// Called once before a delete batch is written.
    fn deleting(&self, _customers: &[Customer]) {}

    /// Called once after a delete batch has committed.
    fn deleted(&self, _customers: &[Customer]) {}
}

/// An ordered set of [`CustomerObserver`]s scoped to one service instance.
#[derive(Default, Clone)]
pub struct ObserverRegistry {
    observers: Vec<Arc<dyn CustomerObserver>>,
}

impl ObserverRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observer. Observers are notified in registration order.
    pub fn register(&mut self, observer: Arc<dyn CustomerObserver>) {
        self.observers.push(observer);
    }

    /// Number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// True when no observers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Run the `creating` pre-event. The first veto short-circuits the
    /// remaining observers.
    pub(crate) fn notify_creating(&self, customer: &Customer) -> Result<(), Cancellation> {
        self.observers
            .iter()
            .try_for_each(|observer| observer.creating(customer))
    }

    pub(crate) fn notify_created(&self, customer: &Customer) {
        for observer in &self.observers {
            observer.created(customer);
        }
    }

    /// Run the `converting` pre-event. The first veto short-circuits the
    /// remaining observers.
    pub(crate) fn notify_converting(
        &self,
        anonymous: &AnonymousCustomer,
    ) -> Result<(), Cancellation> {
        self.observers
            .iter()
            .try_for_each(|observer| observer.converting(anonymous))
    }

    pub(crate) fn notify_converted(&self, customer: &Customer) {
        for observer in &self.observers {
            observer.converted(customer);
        }
    }

    pub(crate) fn notify_saving(&self, customers: &[Customer]) {
        for observer in &self.observers {
            observer.saving(customers);
        }
    }

    pub(crate) fn notify_saved(&self, customers: &[Customer]) {
        for observer in &self.observers {
            observer.saved(customers);
        }
    }

    pub(crate) fn notify_deleting(&self, customers: &[Customer]) {
        for observer in &self.observers {
            observer.deleting(customers);
        }
    }

    pub(crate) fn notify_deleted(&self, customers: &[Customer]) {
        for observer in &self.observers {
            observer.deleted(customers);
        }
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    struct Recorder {
        creating_calls: AtomicUsize,
        created_calls: AtomicUsize,
        veto: bool,
    }

    impl CustomerObserver for Recorder {
        fn creating(&self, _customer: &Customer) -> Result<(), Cancellation> {
            self.creating_calls.fetch_add(1, Ordering::SeqCst);
            if self.veto {
                Err(Cancellation::new("blocked"))
            } else {
                Ok(())
            }
        }

        fn created(&self, _customer: &Customer) {
            self.created_calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_first_veto_short_circuits() {
        let first = Arc::new(Recorder {
            veto: true,
            ..Recorder::default()
        });
        let second = Arc::new(Recorder::default());

        let mut registry = ObserverRegistry::new();
        registry.register(first.clone());
        registry.register(second.clone());

        let customer = Customer::new("Pat", "Smith", None, None);
        let outcome = registry.notify_creating(&customer);

        assert_eq!(outcome, Err(Cancellation::new("blocked")));
        assert_eq!(outcome.unwrap_err().reason(), "blocked");
        assert_eq!(registry.len(), 2);
        assert_eq!(first.creating_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.creating_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_notifications_reach_every_observer() {
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());

        let mut registry = ObserverRegistry::new();
        registry.register(first.clone());
        registry.register(second.clone());

        let customer = Customer::new("Pat", "Smith", None, None);
        registry.notify_created(&customer);

        assert_eq!(first.created_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.created_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_registry_proceeds() {
        let registry = ObserverRegistry::new();
        let customer = Customer::new("Pat", "Smith", None, None);
        assert!(registry.notify_creating(&customer).is_ok());
        assert!(registry.is_empty());
    }
}
