//! In-memory reference store.
//!
//! `MemoryStore` implements the storage contracts against two hash maps
//! behind one `RwLock`. Each unit of work takes a snapshot of the tables
//! when it opens and stages its writes as an operation log; commit replays
//! the log onto the shared tables under the write lock, so a session sees
//! its own staged writes but other sessions see nothing until commit.
//!
//! This is a reference implementation for tests and local development,
//! not a storage engine.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use reef_core::{CustomerKey, MemberId};

use super::{
    AnonymousCustomerRepository, CustomerRepository, StoreError, UnitOfWork, UnitOfWorkProvider,
};
use crate::models::{AnonymousCustomer, Customer};

#[derive(Debug, Default)]
struct Tables {
    customers: HashMap<CustomerKey, Customer>,
    anonymous: HashMap<CustomerKey, AnonymousCustomer>,
}

/// In-memory [`UnitOfWorkProvider`].
///
/// Cheap to clone; clones share the same tables.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed identified customers.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if the table lock is poisoned.
    pub fn customer_count(&self) -> Result<usize, StoreError> {
        let tables = self.tables.read().map_err(|_| StoreError::Poisoned)?;
        Ok(tables.customers.len())
    }

    /// Number of committed anonymous customers.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if the table lock is poisoned.
    pub fn anonymous_count(&self) -> Result<usize, StoreError> {
        let tables = self.tables.read().map_err(|_| StoreError::Poisoned)?;
        Ok(tables.anonymous.len())
    }
}

impl UnitOfWorkProvider for MemoryStore {
    fn unit_of_work(&self) -> Result<Box<dyn UnitOfWork + '_>, StoreError> {
        let (customers, anonymous) = {
            let tables = self.tables.read().map_err(|_| StoreError::Poisoned)?;
            (tables.customers.clone(), tables.anonymous.clone())
        };
        Ok(Box::new(MemoryUnitOfWork {
            tables: Arc::clone(&self.tables),
            customers: MemoryCustomerRepository {
                base: customers,
                staged: Vec::new(),
            },
            anonymous: MemoryAnonymousCustomerRepository {
                base: anonymous,
                staged: Vec::new(),
            },
        }))
    }
}

enum CustomerOp {
    Upsert(Customer),
    Delete(CustomerKey),
}

enum AnonymousOp {
    Upsert(AnonymousCustomer),
    Delete(CustomerKey),
}

/// One snapshot-isolated session over a [`MemoryStore`].
struct MemoryUnitOfWork {
    tables: Arc<RwLock<Tables>>,
    customers: MemoryCustomerRepository,
    anonymous: MemoryAnonymousCustomerRepository,
}

impl UnitOfWork for MemoryUnitOfWork {
    fn customers(&mut self) -> &mut dyn CustomerRepository {
        &mut self.customers
    }

    fn anonymous_customers(&mut self) -> &mut dyn AnonymousCustomerRepository {
        &mut self.anonymous
    }

    fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let Self {
            tables,
            customers,
            anonymous,
        } = *self;

        let mut tables = tables.write().map_err(|_| StoreError::Poisoned)?;
        for op in customers.staged {
            match op {
                CustomerOp::Upsert(customer) => {
                    tables.customers.insert(customer.key(), customer);
                }
                CustomerOp::Delete(key) => {
                    tables.customers.remove(&key);
                }
            }
        }
        for op in anonymous.staged {
            match op {
                AnonymousOp::Upsert(record) => {
                    tables.anonymous.insert(record.key(), record);
                }
                AnonymousOp::Delete(key) => {
                    tables.anonymous.remove(&key);
                }
            }
        }
        Ok(())
    }
}

struct MemoryCustomerRepository {
    base: HashMap<CustomerKey, Customer>,
    staged: Vec<CustomerOp>,
}

impl MemoryCustomerRepository {
    /// The snapshot with this session's staged operations replayed on top.
    fn merged(&self) -> HashMap<CustomerKey, Customer> {
        let mut view = self.base.clone();
        for op in &self.staged {
            match op {
                CustomerOp::Upsert(customer) => {
                    view.insert(customer.key(), customer.clone());
                }
                CustomerOp::Delete(key) => {
                    view.remove(key);
                }
            }
        }
        view
    }
}

impl CustomerRepository for MemoryCustomerRepository {
    fn add_or_update(&mut self, customer: &Customer) -> Result<(), StoreError> {
        self.staged.push(CustomerOp::Upsert(customer.clone()));
        Ok(())
    }

    fn delete(&mut self, customer: &Customer) -> Result<(), StoreError> {
        self.staged.push(CustomerOp::Delete(customer.key()));
        Ok(())
    }

    fn get(&self, key: CustomerKey) -> Result<Option<Customer>, StoreError> {
        Ok(self.merged().remove(&key))
    }

    fn get_all(&self, keys: &[CustomerKey]) -> Result<Vec<Customer>, StoreError> {
        let mut view = self.merged();
        if keys.is_empty() {
            return Ok(view.into_values().collect());
        }
        Ok(keys.iter().filter_map(|key| view.remove(key)).collect())
    }

    fn get_by_member_id(&self, member_id: MemberId) -> Result<Option<Customer>, StoreError> {
        Ok(self
            .merged()
            .into_values()
            .find(|customer| customer.member_id == Some(member_id)))
    }
}

struct MemoryAnonymousCustomerRepository {
    base: HashMap<CustomerKey, AnonymousCustomer>,
    staged: Vec<AnonymousOp>,
}

impl MemoryAnonymousCustomerRepository {
    fn merged(&self) -> HashMap<CustomerKey, AnonymousCustomer> {
        let mut view = self.base.clone();
        for op in &self.staged {
            match op {
                AnonymousOp::Upsert(record) => {
                    view.insert(record.key(), record.clone());
                }
                AnonymousOp::Delete(key) => {
                    view.remove(key);
                }
            }
        }
        view
    }
}

impl AnonymousCustomerRepository for MemoryAnonymousCustomerRepository {
    fn add_or_update(&mut self, customer: &AnonymousCustomer) -> Result<(), StoreError> {
        self.staged.push(AnonymousOp::Upsert(customer.clone()));
        Ok(())
    }

    fn delete(&mut self, customer: &AnonymousCustomer) -> Result<(), StoreError> {
        self.staged.push(AnonymousOp::Delete(customer.key()));
        Ok(())
    }

    fn get(&self, key: CustomerKey) -> Result<Option<AnonymousCustomer>, StoreError> {
        Ok(self.merged().remove(&key))
    }
}
