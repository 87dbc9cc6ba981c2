//! Customer domain models.

mod customer;

pub use customer::{AnonymousCustomer, AnyCustomer, Customer};
