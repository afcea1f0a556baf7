//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository constructors verify schema readiness before first use.
//! - Repository APIs return semantic errors (`StudentNotFound`,
//!   `DuplicateEmail`) in addition to DB transport errors.
//! - Multi-row writes are all-or-nothing.

pub mod catalog_repo;
pub mod student_repo;
