//! Reef Commerce - customer persistence layer.
//!
//! This crate owns the customer domain models and the services that move
//! them in and out of a transactional store. The store itself is abstract:
//! callers inject a [`store::UnitOfWorkProvider`] and the service drives it
//! through unit-of-work sessions. An in-memory reference provider ships in
//! [`store::memory`].
//!
//! # Architecture
//!
//! - [`models`] - `Customer`, `AnonymousCustomer`, and the `AnyCustomer`
//!   sum type over both
//! - [`events`] - injectable observer registry; pre-events can veto a
//!   mutation, post-events are fire-and-forget
//! - [`store`] - collaborator contracts (unit of work, repositories) and
//!   the in-memory reference store
//! - [`services`] - `CustomerService`, serializing every mutation through
//!   one write lock
//!
//! # Concurrency
//!
//! Callers are plain threads; there are no async boundaries. All mutating
//! operations across all customers serialize through a single write lock,
//! trading throughput for correctness. Reads bypass the lock entirely.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod events;
pub mod models;
pub mod services;
pub mod store;

pub use events::{Cancellation, CustomerObserver, ObserverRegistry};
pub use models::{AnonymousCustomer, AnyCustomer, Customer};
pub use services::customers::{CustomerService, ServiceError};
pub use store::{StoreError, UnitOfWork, UnitOfWorkProvider};
