//! Student/enrollment repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide transactional CRUD over students and their enrollment rows.
//! - Own the full-set enrollment replacement logic with atomic semantics.
//!
//! # Invariants
//! - Every multi-row write runs inside one `Immediate` transaction; a
//!   concurrent reader never observes zero or partial enrollments for an
//!   existing student.
//! - Unique-email violations surface as `DuplicateEmail`, distinct from
//!   generic store failures.
//! - Callers pass subject ids that already passed selection validation.

use crate::model::catalog::{Professor, SubjectId, SubjectRecord};
use crate::model::student::{StudentId, StudentIdentity};
use crate::repo::catalog_repo::{
    ensure_catalog_ready, find_subjects_on, list_professors_on, list_subjects_on, require_table,
    CatalogRepository, RepoError, RepoResult,
};
use rusqlite::{params, Connection, ErrorCode, Transaction, TransactionBehavior};

const STUDENT_SELECT_SQL: &str = "SELECT id, name, email, created_at FROM students";

const ENROLLED_SUBJECTS_SQL: &str = "SELECT
    s.id,
    s.name,
    s.credits,
    s.professor_id,
    p.name AS professor_name
FROM enrollments e
INNER JOIN subjects s ON s.id = e.subject_id
INNER JOIN professors p ON p.id = s.professor_id
WHERE e.student_id = ?1
ORDER BY e.id ASC";

/// Student read model: the row plus its enrolled subjects.
///
/// `subjects` keeps enrollment creation order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StudentDetail {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub created_at: i64,
    pub subjects: Vec<SubjectRecord>,
}

/// One enrollment row of a subject roster, resolved to the student name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub student_id: StudentId,
    pub student_name: String,
}

/// Repository interface for student/enrollment persistence.
pub trait StudentRepository {
    /// Inserts a student plus exactly one enrollment row per subject id,
    /// as a single atomic unit.
    fn create_student(
        &mut self,
        identity: &StudentIdentity,
        subject_ids: &[SubjectId],
    ) -> RepoResult<StudentId>;
    /// Atomically replaces the full enrollment set and updates name/email.
    fn update_student(
        &mut self,
        id: StudentId,
        identity: &StudentIdentity,
        subject_ids: &[SubjectId],
    ) -> RepoResult<()>;
    /// Atomically removes all enrollments for the student, then the row.
    fn delete_student(&mut self, id: StudentId) -> RepoResult<()>;
    /// Gets one student with enrolled subjects.
    fn get_student(&self, id: StudentId) -> RepoResult<Option<StudentDetail>>;
    /// Lists students ordered by `created_at DESC, id ASC`.
    fn list_students(&self) -> RepoResult<Vec<StudentDetail>>;
    /// Returns every enrollment of one subject in creation order.
    fn subject_roster(&self, subject_id: SubjectId) -> RepoResult<Vec<RosterEntry>>;
}

/// SQLite-backed student/enrollment repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_catalog_ready(conn)?;
        require_table(conn, "students", &["id", "name", "email", "created_at"])?;
        require_table(conn, "enrollments", &["id", "student_id", "subject_id"])?;
        Ok(Self { conn })
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn create_student(
        &mut self,
        identity: &StudentIdentity,
        subject_ids: &[SubjectId],
    ) -> RepoResult<StudentId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let inserted = tx.execute(
            "INSERT INTO students (name, email) VALUES (?1, ?2);",
            params![identity.name, identity.email],
        );
        map_email_conflict(inserted, &identity.email)?;
        let student_id = tx.last_insert_rowid();

        insert_enrollments(&tx, student_id, subject_ids)?;

        tx.commit()?;
        Ok(student_id)
    }

    fn update_student(
        &mut self,
        id: StudentId,
        identity: &StudentIdentity,
        subject_ids: &[SubjectId],
    ) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !student_exists_in_tx(&tx, id)? {
            return Err(RepoError::StudentNotFound(id));
        }

        // Full-set replacement: delete everything, re-insert the validated
        // selection, then refresh the identity row. All inside one
        // transaction so readers never see a student without enrollments.
        tx.execute("DELETE FROM enrollments WHERE student_id = ?1;", [id])?;
        insert_enrollments(&tx, id, subject_ids)?;

        let updated = tx.execute(
            "UPDATE students SET name = ?2, email = ?3 WHERE id = ?1;",
            params![id, identity.name, identity.email],
        );
        map_email_conflict(updated, &identity.email)?;

        tx.commit()?;
        Ok(())
    }

    fn delete_student(&mut self, id: StudentId) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute("DELETE FROM enrollments WHERE student_id = ?1;", [id])?;
        let changed = tx.execute("DELETE FROM students WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::StudentNotFound(id));
        }

        tx.commit()?;
        Ok(())
    }

    fn get_student(&self, id: StudentId) -> RepoResult<Option<StudentDetail>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            let student_id: StudentId = row.get("id")?;
            return Ok(Some(StudentDetail {
                id: student_id,
                name: row.get("name")?,
                email: row.get("email")?,
                created_at: row.get("created_at")?,
                subjects: load_enrolled_subjects(self.conn, student_id)?,
            }));
        }
        Ok(None)
    }

    fn list_students(&self) -> RepoResult<Vec<StudentDetail>> {
        let mut stmt = self.conn.prepare(&format!(
            "{STUDENT_SELECT_SQL} ORDER BY created_at DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            let student_id: StudentId = row.get("id")?;
            students.push(StudentDetail {
                id: student_id,
                name: row.get("name")?,
                email: row.get("email")?,
                created_at: row.get("created_at")?,
                subjects: load_enrolled_subjects(self.conn, student_id)?,
            });
        }
        Ok(students)
    }

    fn subject_roster(&self, subject_id: SubjectId) -> RepoResult<Vec<RosterEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT e.student_id, st.name
             FROM enrollments e
             INNER JOIN students st ON st.id = e.student_id
             WHERE e.subject_id = ?1
             ORDER BY e.id ASC;",
        )?;
        let mut rows = stmt.query([subject_id])?;
        let mut roster = Vec::new();
        while let Some(row) = rows.next()? {
            roster.push(RosterEntry {
                student_id: row.get(0)?,
                student_name: row.get(1)?,
            });
        }
        Ok(roster)
    }
}

// Validation needs catalog reads over the same connection, so the write
// repository also serves the read-only catalog contract.
impl CatalogRepository for SqliteStudentRepository<'_> {
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

fn insert_enrollments(
    tx: &Transaction<'_>,
    student_id: StudentId,
    subject_ids: &[SubjectId],
) -> RepoResult<()> {
    for subject_id in subject_ids {
        tx.execute(
            "INSERT INTO enrollments (student_id, subject_id) VALUES (?1, ?2);",
            params![student_id, subject_id],
        )?;
    }
    Ok(())
}

fn student_exists_in_tx(tx: &Transaction<'_>, id: StudentId) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM students WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn load_enrolled_subjects(
    conn: &Connection,
    student_id: StudentId,
) -> RepoResult<Vec<SubjectRecord>> {
    let mut stmt = conn.prepare(ENROLLED_SUBJECTS_SQL)?;
    let mut rows = stmt.query([student_id])?;
    let mut subjects = Vec::new();
    while let Some(row) = rows.next()? {
        subjects.push(SubjectRecord {
            id: row.get("id")?,
            name: row.get("name")?,
            credits: row.get("credits")?,
            professor_id: row.get("professor_id")?,
            professor_name: row.get("professor_name")?,
        });
    }
    Ok(subjects)
}

fn map_email_conflict(result: rusqlite::Result<usize>, email: &str) -> RepoResult<usize> {
    match result {
        Ok(changed) => Ok(changed),
        Err(err) if is_email_unique_violation(&err) => {
            Err(RepoError::DuplicateEmail(email.to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

fn is_email_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, Some(message)) => {
            code.code == ErrorCode::ConstraintViolation && message.contains("students.email")
        }
        _ => false,
    }
}
