//! Core domain model for circ.
//!
//! This crate defines the circulation data model (members, catalog
//! entities, physical copies, loans, reservations, fines, staff, and the
//! audit log), the SQLite schema with its referential-integrity rules,
//! and the demo seed data.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod model;
pub mod schema;

pub use error::{Error, Result};
