//! Domain model for the registration core.
//!
//! # Responsibility
//! - Define canonical catalog and student data structures.
//! - Own input normalization for user-supplied identity fields.
//!
//! # Invariants
//! - Catalog records are immutable after seeding.
//! - Every id is a store-assigned `INTEGER PRIMARY KEY` rowid.

pub mod catalog;
pub mod student;
