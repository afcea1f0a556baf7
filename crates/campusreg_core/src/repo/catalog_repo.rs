//! Catalog repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide read-only access to the seeded professor/subject catalog.
//! - Own the shared repository error type and connection readiness guards.
//!
//! # Invariants
//! - Catalog queries never write.
//! - Subject reads always carry the resolved professor name.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::catalog::{Professor, SubjectId, SubjectRecord};
use crate::model::student::{StudentId, StudentValidationError};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const SUBJECT_SELECT_SQL: &str = "SELECT
    s.id,
    s.name,
    s.credits,
    s.professor_id,
    p.name AS professor_name
FROM subjects s
INNER JOIN professors p ON p.id = s.professor_id";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for registration persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Validation(StudentValidationError),
    StudentNotFound(StudentId),
    DuplicateEmail(String),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::StudentNotFound(id) => write!(f, "student not found: {id}"),
            Self::DuplicateEmail(email) => write!(f, "email already registered: `{email}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection not migrated: schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<StudentValidationError> for RepoError {
    fn from(value: StudentValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Repository interface for catalog reads.
pub trait CatalogRepository {
    /// Lists professors ordered by catalog insertion order.
    fn list_professors(&self) -> RepoResult<Vec<Professor>>;
    /// Lists subjects with resolved professor, ordered by name.
    fn list_subjects(&self) -> RepoResult<Vec<SubjectRecord>>;
    /// Resolves the given subject ids; unknown ids are silently absent
    /// from the result, callers decide how to treat the gap.
    fn find_subjects(&self, ids: &[SubjectId]) -> RepoResult<Vec<SubjectRecord>>;
}

/// SQLite-backed read-only catalog repository.
pub struct SqliteCatalogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCatalogRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_catalog_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CatalogRepository for SqliteCatalogRepository<'_> {
    fn list_professors(&self) -> RepoResult<Vec<Professor>> {
        list_professors_on(self.conn)
    }

    fn list_subjects(&self) -> RepoResult<Vec<SubjectRecord>> {
        list_subjects_on(self.conn)
    }

    fn find_subjects(&self, ids: &[SubjectId]) -> RepoResult<Vec<SubjectRecord>> {
        find_subjects_on(self.conn, ids)
    }
}

pub(crate) fn list_professors_on(conn: &Connection) -> RepoResult<Vec<Professor>> {
    let mut stmt = conn.prepare("SELECT id, name FROM professors ORDER BY id ASC;")?;
    let mut rows = stmt.query([])?;
    let mut professors = Vec::new();
    while let Some(row) = rows.next()? {
        professors.push(Professor {
            id: row.get("id")?,
            name: row.get("name")?,
        });
    }
    Ok(professors)
}

pub(crate) fn list_subjects_on(conn: &Connection) -> RepoResult<Vec<SubjectRecord>> {
    let mut stmt = conn.prepare(&format!(
        "{SUBJECT_SELECT_SQL} ORDER BY s.name COLLATE NOCASE ASC;"
    ))?;
    let mut rows = stmt.query([])?;
    let mut subjects = Vec::new();
    while let Some(row) = rows.next()? {
        subjects.push(parse_subject_row(row)?);
    }
    Ok(subjects)
}

pub(crate) fn find_subjects_on(
    conn: &Connection,
    ids: &[SubjectId],
) -> RepoResult<Vec<SubjectRecord>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let mut stmt = conn.prepare(&format!(
        "{SUBJECT_SELECT_SQL} WHERE s.id IN ({placeholders}) ORDER BY s.id ASC;"
    ))?;
    let bind_values: Vec<Value> = ids.iter().map(|id| Value::Integer(*id)).collect();
    let mut rows = stmt.query(params_from_iter(bind_values))?;
    let mut subjects = Vec::new();
    while let Some(row) = rows.next()? {
        subjects.push(parse_subject_row(row)?);
    }
    Ok(subjects)
}

fn parse_subject_row(row: &Row<'_>) -> RepoResult<SubjectRecord> {
    Ok(SubjectRecord {
        id: row.get("id")?,
        name: row.get("name")?,
        credits: row.get("credits")?,
        professor_id: row.get("professor_id")?,
        professor_name: row.get("professor_name")?,
    })
}

pub(crate) fn ensure_catalog_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    require_table(conn, "professors", &["id", "name"])?;
    require_table(conn, "subjects", &["id", "name", "credits", "professor_id"])?;
    Ok(())
}

pub(crate) fn require_table(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    if !table_exists(conn, table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }
    for &column in columns {
        if !table_has_column(conn, table, column)? {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
