//! Reef Core - Shared types and text utilities.
//!
//! This crate provides the common vocabulary used across the Reef
//! components:
//! - `commerce` - Customer persistence services
//! - `integration-tests` - Cross-crate test suites
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no locking. This keeps it lightweight and allows it to
//! be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe keys, member ids, and emails
//! - [`text`] - Stateless string helpers (path slashes, prefix/suffix
//!   assertions, invariant comparisons, GUID-shape checks, multi-replace)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod text;
pub mod types;

pub use types::*;
