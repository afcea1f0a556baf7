//! Catalog domain model: professors and the subjects they teach.
//!
//! # Invariants
//! - Catalog rows are created by the seed procedure and never mutated by
//!   CRUD paths.
//! - Every subject belongs to exactly one professor and carries a fixed
//!   credit count.

use serde::{Deserialize, Serialize};

/// Stable identifier for a professor row.
pub type ProfessorId = i64;

/// Stable identifier for a subject row.
pub type SubjectId = i64;

/// Credit count carried by every catalog subject.
pub const SUBJECT_CREDITS: i64 = 3;

/// A professor as seeded into the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professor {
    pub id: ProfessorId,
    pub name: String,
}

/// Subject read model with its professor already resolved.
///
/// Returned by catalog queries and by selection validation so downstream
/// code never needs a second professor lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub id: SubjectId,
    pub name: String,
    pub credits: i64,
    pub professor_id: ProfessorId,
    pub professor_name: String,
}
