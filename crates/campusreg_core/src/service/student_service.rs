//! Student registration use-case service.
//!
//! # Responsibility
//! - Expose the CRUD operation surface consumed by external adapters.
//! - Run input normalization and selection validation before every write.
//! - Resolve classmates per (student, subject) pair for roster rendering.
//!
//! # Invariants
//! - Service APIs never bypass validator or repository contracts.
//! - Create/update re-read the written student and return the read model.
//! - Classmate lists exclude the requesting student and keep enrollment
//!   creation order.

use crate::model::catalog::{Professor, SubjectId, SubjectRecord};
use crate::model::student::{StudentId, StudentInput, StudentValidationError};
use crate::repo::catalog_repo::{CatalogRepository, RepoError};
use crate::repo::student_repo::{RosterEntry, StudentDetail, StudentRepository};
use crate::service::enrollment::{validate_subject_selection, EnrollmentError};
use log::info;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for student registration use-cases.
#[derive(Debug)]
pub enum StudentServiceError {
    /// Required field missing or malformed before any lookup.
    InvalidInput(StudentValidationError),
    /// Subject selection violated an enrollment rule.
    Selection(EnrollmentError),
    /// Email uniqueness violation at write time.
    DuplicateEmail(String),
    /// Target student does not exist.
    StudentNotFound(StudentId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for StudentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "{err}"),
            Self::Selection(err) => write!(f, "{err}"),
            Self::DuplicateEmail(email) => write!(f, "email already registered: `{email}`"),
            Self::StudentNotFound(id) => write!(f, "student not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent student state: {details}"),
        }
    }
}

impl Error for StudentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::Selection(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StudentValidationError> for StudentServiceError {
    fn from(value: StudentValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<EnrollmentError> for StudentServiceError {
    fn from(value: EnrollmentError) -> Self {
        match value {
            EnrollmentError::Repo(err) => Self::from(err),
            other => Self::Selection(other),
        }
    }
}

impl From<RepoError> for StudentServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateEmail(email) => Self::DuplicateEmail(email),
            RepoError::StudentNotFound(id) => Self::StudentNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Roster read model: one student with classmates resolved per subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentRow {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub created_at: i64,
    /// Enrolled subjects in enrollment creation order.
    pub subjects: Vec<SubjectRecord>,
    /// Classmate names per enrolled subject, requesting student excluded.
    pub classmates_by_subject: BTreeMap<SubjectId, Vec<String>>,
}

/// Registration service facade over a repository implementation.
pub struct StudentService<R: StudentRepository + CatalogRepository> {
    repo: R,
}

impl<R: StudentRepository + CatalogRepository> StudentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a student enrolled in exactly three validated subjects.
    ///
    /// # Contract
    /// - Identity normalization and selection validation run before the
    ///   write; the write itself is one atomic unit.
    /// - Returns the persisted read model.
    pub fn create_student(
        &mut self,
        input: &StudentInput,
    ) -> Result<StudentDetail, StudentServiceError> {
        let identity = input.identity()?;
        let selection = validate_subject_selection(&self.repo, &input.subject_ids)?;

        let id = self
            .repo
            .create_student(&identity, &selection.subject_ids())?;
        info!("event=student_create module=service status=ok student_id={id}");

        self.repo
            .get_student(id)?
            .ok_or(StudentServiceError::InconsistentState(
                "created student not found in read-back",
            ))
    }

    /// Replaces a student's identity and full enrollment set.
    ///
    /// Calling update twice with the same payload leaves the same final
    /// enrollment set.
    pub fn update_student(
        &mut self,
        id: StudentId,
        input: &StudentInput,
    ) -> Result<StudentDetail, StudentServiceError> {
        let identity = input.identity()?;
        let selection = validate_subject_selection(&self.repo, &input.subject_ids)?;

        self.repo
            .update_student(id, &identity, &selection.subject_ids())?;
        info!("event=student_update module=service status=ok student_id={id}");

        self.repo
            .get_student(id)?
            .ok_or(StudentServiceError::InconsistentState(
                "updated student not found in read-back",
            ))
    }

    /// Deletes a student together with all enrollment rows.
    pub fn delete_student(&mut self, id: StudentId) -> Result<(), StudentServiceError> {
        self.repo.delete_student(id)?;
        info!("event=student_delete module=service status=ok student_id={id}");
        Ok(())
    }

    /// Gets one student with enrollments. `Ok(None)` when missing; the
    /// caller decides how to surface absence.
    pub fn get_student(&self, id: StudentId) -> Result<Option<StudentDetail>, StudentServiceError> {
        Ok(self.repo.get_student(id)?)
    }

    /// Lists subjects with resolved professor, ordered by name.
    pub fn list_subjects(&self) -> Result<Vec<SubjectRecord>, StudentServiceError> {
        Ok(self.repo.list_subjects()?)
    }

    /// Lists the seeded professors in catalog order.
    pub fn list_professors(&self) -> Result<Vec<Professor>, StudentServiceError> {
        Ok(self.repo.list_professors()?)
    }

    /// Resolves the classmates of one (student, subject) pair: every other
    /// student enrolled in the subject, in enrollment creation order.
    pub fn classmates(
        &self,
        subject_id: SubjectId,
        requesting_student: StudentId,
    ) -> Result<Vec<String>, StudentServiceError> {
        let roster = self.repo.subject_roster(subject_id)?;
        Ok(classmate_names(&roster, requesting_student))
    }

    /// Builds the full roster read model: every student with subjects and
    /// per-subject classmates.
    ///
    /// Each subject's roster is fetched once per call and reused across
    /// rows, so rendering N students costs one roster query per distinct
    /// subject rather than one per (student, subject) pair.
    pub fn list_students(&self) -> Result<Vec<StudentRow>, StudentServiceError> {
        let students = self.repo.list_students()?;

        let mut rosters: HashMap<SubjectId, Vec<RosterEntry>> = HashMap::new();
        let mut rows = Vec::with_capacity(students.len());
        for student in students {
            let mut classmates_by_subject = BTreeMap::new();
            for subject in &student.subjects {
                if !rosters.contains_key(&subject.id) {
                    rosters.insert(subject.id, self.repo.subject_roster(subject.id)?);
                }
                classmates_by_subject
                    .insert(subject.id, classmate_names(&rosters[&subject.id], student.id));
            }
            rows.push(StudentRow {
                id: student.id,
                name: student.name,
                email: student.email,
                created_at: student.created_at,
                subjects: student.subjects,
                classmates_by_subject,
            });
        }
        Ok(rows)
    }
}

fn classmate_names(roster: &[RosterEntry], requesting_student: StudentId) -> Vec<String> {
    roster
        .iter()
        .filter(|entry| entry.student_id != requesting_student)
        .map(|entry| entry.student_name.clone())
        .collect()
}
