//! Core domain logic for the campus course-registration system.
//! This crate is the single source of truth for enrollment invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::catalog::{Professor, ProfessorId, SubjectId, SubjectRecord, SUBJECT_CREDITS};
pub use model::student::{StudentId, StudentIdentity, StudentInput, StudentValidationError};
pub use repo::catalog_repo::{CatalogRepository, RepoError, RepoResult, SqliteCatalogRepository};
pub use repo::student_repo::{
    RosterEntry, SqliteStudentRepository, StudentDetail, StudentRepository,
};
pub use service::enrollment::{
    validate_subject_selection, EnrollmentError, ValidatedSelection, REQUIRED_SUBJECTS,
};
pub use service::student_service::{StudentRow, StudentService, StudentServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
