//! Enrollment selection validator.
//!
//! # Responsibility
//! - Normalize a raw subject-id selection into exactly three valid
//!   subjects taught by three distinct professors.
//!
//! # Invariants
//! - Validation is pure over a catalog snapshot; it never writes.
//! - Normalization order is first-seen request order.
//! - Every failure is detected before any persistence happens.

use crate::model::catalog::{SubjectId, SubjectRecord};
use crate::repo::catalog_repo::{CatalogRepository, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Number of subjects every student must be enrolled in.
pub const REQUIRED_SUBJECTS: usize = 3;

/// Selection failures, all detected before any write.
#[derive(Debug)]
pub enum EnrollmentError {
    /// Fewer than three distinct subjects remained after normalization.
    InvalidSelectionCount { distinct: usize },
    /// A requested subject id does not resolve against the catalog.
    UnknownSubject(SubjectId),
    /// Two selected subjects are taught by the same professor.
    DuplicateProfessor { professor_name: String },
    /// Catalog lookup failure.
    Repo(RepoError),
}

impl Display for EnrollmentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSelectionCount { distinct } => write!(
                f,
                "exactly {REQUIRED_SUBJECTS} distinct subjects must be selected, got {distinct}"
            ),
            Self::UnknownSubject(id) => write!(f, "unknown subject: {id}"),
            Self::DuplicateProfessor { professor_name } => {
                write!(f, "professor selected more than once: {professor_name}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EnrollmentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for EnrollmentError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// A normalized selection of exactly [`REQUIRED_SUBJECTS`] subjects, each
/// carrying its resolved professor.
///
/// Construction goes through [`validate_subject_selection`] only, so
/// holding a value is proof the selection passed every rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSelection {
    subjects: Vec<SubjectRecord>,
}

impl ValidatedSelection {
    /// The validated subjects in first-seen request order.
    pub fn subjects(&self) -> &[SubjectRecord] {
        &self.subjects
    }

    /// The validated subject ids in first-seen request order.
    pub fn subject_ids(&self) -> Vec<SubjectId> {
        self.subjects.iter().map(|subject| subject.id).collect()
    }
}

/// Validates a raw subject-id selection against the catalog.
///
/// # Contract
/// 1. De-duplicates preserving first-seen order and truncates to the first
///    [`REQUIRED_SUBJECTS`] distinct ids.
/// 2. Fails with `InvalidSelectionCount` when fewer remain.
/// 3. Fails with `UnknownSubject` for ids missing from the catalog.
/// 4. Fails with `DuplicateProfessor` when the resolved professors are not
///    pairwise distinct.
///
/// # Errors
/// Besides the rule failures above, catalog lookup errors propagate as
/// `EnrollmentError::Repo`.
pub fn validate_subject_selection(
    catalog: &impl CatalogRepository,
    requested: &[SubjectId],
) -> Result<ValidatedSelection, EnrollmentError> {
    let cleaned = normalize_selection(requested);
    if cleaned.len() < REQUIRED_SUBJECTS {
        return Err(EnrollmentError::InvalidSelectionCount {
            distinct: cleaned.len(),
        });
    }

    let records = catalog.find_subjects(&cleaned)?;
    let mut subjects = Vec::with_capacity(REQUIRED_SUBJECTS);
    for id in &cleaned {
        let record = records
            .iter()
            .find(|record| record.id == *id)
            .ok_or(EnrollmentError::UnknownSubject(*id))?;
        subjects.push(record.clone());
    }

    for (position, subject) in subjects.iter().enumerate() {
        if subjects[position + 1..]
            .iter()
            .any(|other| other.professor_id == subject.professor_id)
        {
            return Err(EnrollmentError::DuplicateProfessor {
                professor_name: subject.professor_name.clone(),
            });
        }
    }

    Ok(ValidatedSelection { subjects })
}

/// De-duplicates preserving first-seen order, keeping at most
/// [`REQUIRED_SUBJECTS`] distinct ids.
fn normalize_selection(requested: &[SubjectId]) -> Vec<SubjectId> {
    let mut cleaned = Vec::with_capacity(REQUIRED_SUBJECTS);
    for id in requested {
        if !cleaned.contains(id) {
            cleaned.push(*id);
        }
        if cleaned.len() == REQUIRED_SUBJECTS {
            break;
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::normalize_selection;

    #[test]
    fn normalize_keeps_first_seen_order() {
        assert_eq!(normalize_selection(&[5, 2, 5, 9]), vec![5, 2, 9]);
    }

    #[test]
    fn normalize_truncates_after_three_distinct() {
        assert_eq!(normalize_selection(&[1, 2, 3, 4, 5]), vec![1, 2, 3]);
    }

    #[test]
    fn normalize_handles_short_and_empty_input() {
        assert_eq!(normalize_selection(&[7, 7]), vec![7]);
        assert!(normalize_selection(&[]).is_empty());
    }
}
