//! Student domain model and identity normalization.
//!
//! # Responsibility
//! - Define the raw request payload shape and the normalized identity pair.
//! - Normalize and validate user-supplied name/email before any lookup
//!   or write happens.
//!
//! # Invariants
//! - `email` is globally unique across students (enforced by storage).
//! - Identity fields are trimmed; emails are lowercased before persistence.

use crate::model::catalog::SubjectId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

// Minimal shape check only; deliverability is not core's concern.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Stable identifier for a student row.
pub type StudentId = i64;

/// Raw create/update payload as submitted by external callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentInput {
    pub name: String,
    pub email: String,
    pub subject_ids: Vec<SubjectId>,
}

impl StudentInput {
    /// Normalizes the identity fields of this payload.
    ///
    /// # Errors
    /// Returns a [`StudentValidationError`] when a required field is missing
    /// or the email has no plausible shape.
    pub fn identity(&self) -> Result<StudentIdentity, StudentValidationError> {
        StudentIdentity::parse(&self.name, &self.email)
    }
}

/// Normalized name/email pair ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentIdentity {
    pub name: String,
    pub email: String,
}

impl StudentIdentity {
    /// Trims and validates user-supplied identity fields.
    ///
    /// # Contract
    /// - `name` must be non-empty after trimming.
    /// - `email` must be non-empty after trimming and match a minimal
    ///   `local@domain.tld` shape; it is stored lowercased.
    pub fn parse(name: &str, email: &str) -> Result<Self, StudentValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StudentValidationError::MissingName);
        }

        let email = email.trim();
        if email.is_empty() {
            return Err(StudentValidationError::MissingEmail);
        }
        if !EMAIL_RE.is_match(email) {
            return Err(StudentValidationError::InvalidEmail(email.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            email: email.to_lowercase(),
        })
    }
}

/// Malformed-input failures detected before any lookup or write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentValidationError {
    MissingName,
    MissingEmail,
    InvalidEmail(String),
}

impl Display for StudentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "student name is required"),
            Self::MissingEmail => write!(f, "student email is required"),
            Self::InvalidEmail(value) => write!(f, "invalid email address: `{value}`"),
        }
    }
}

impl Error for StudentValidationError {}
