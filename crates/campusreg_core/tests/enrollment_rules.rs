use campusreg_core::db::{open_db_in_memory, seed_catalog};
use campusreg_core::{
    validate_subject_selection, EnrollmentError, SqliteCatalogRepository, SubjectId,
};
use rusqlite::Connection;

fn seeded_connection() -> Connection {
    let mut conn = open_db_in_memory().unwrap();
    seed_catalog(&mut conn).unwrap();
    conn
}

// Subject ids in catalog order: subjects 0 and 1 share professor 0,
// 2 and 3 share professor 1, and so on.
fn catalog_ids(conn: &Connection) -> Vec<SubjectId> {
    let mut stmt = conn
        .prepare("SELECT id FROM subjects ORDER BY id ASC;")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

#[test]
fn three_subjects_of_distinct_professors_validate() {
    let conn = seeded_connection();
    let ids = catalog_ids(&conn);
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let selection = validate_subject_selection(&repo, &[ids[0], ids[2], ids[4]]).unwrap();

    let subjects = selection.subjects();
    assert_eq!(subjects.len(), 3);
    // First-seen request order is preserved.
    assert_eq!(selection.subject_ids(), vec![ids[0], ids[2], ids[4]]);
    // Each validated subject carries its resolved professor.
    let professor_ids: std::collections::HashSet<i64> =
        subjects.iter().map(|s| s.professor_id).collect();
    assert_eq!(professor_ids.len(), 3);
    assert!(subjects.iter().all(|s| !s.professor_name.is_empty()));
}

#[test]
fn shared_professor_is_rejected() {
    let conn = seeded_connection();
    let ids = catalog_ids(&conn);
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    // Subjects 0 and 1 are both taught by the first professor.
    let err = validate_subject_selection(&repo, &[ids[0], ids[1], ids[4]]).unwrap_err();
    match err {
        EnrollmentError::DuplicateProfessor { professor_name } => {
            assert!(!professor_name.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn fewer_than_three_subjects_are_rejected() {
    let conn = seeded_connection();
    let ids = catalog_ids(&conn);
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let err = validate_subject_selection(&repo, &[ids[0], ids[2]]).unwrap_err();
    assert!(matches!(
        err,
        EnrollmentError::InvalidSelectionCount { distinct: 2 }
    ));

    let err = validate_subject_selection(&repo, &[]).unwrap_err();
    assert!(matches!(
        err,
        EnrollmentError::InvalidSelectionCount { distinct: 0 }
    ));
}

#[test]
fn duplicates_are_removed_before_the_count_check() {
    let conn = seeded_connection();
    let ids = catalog_ids(&conn);
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    // Four entries but only two distinct subjects.
    let err = validate_subject_selection(&repo, &[ids[0], ids[0], ids[2], ids[2]]).unwrap_err();
    assert!(matches!(
        err,
        EnrollmentError::InvalidSelectionCount { distinct: 2 }
    ));

    // Duplicates plus a third distinct subject still validate.
    let selection =
        validate_subject_selection(&repo, &[ids[2], ids[0], ids[2], ids[4]]).unwrap();
    assert_eq!(selection.subject_ids(), vec![ids[2], ids[0], ids[4]]);
}

#[test]
fn oversized_selection_is_truncated_to_first_three_distinct() {
    let conn = seeded_connection();
    let ids = catalog_ids(&conn);
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let selection =
        validate_subject_selection(&repo, &[ids[0], ids[2], ids[4], ids[6], ids[8]]).unwrap();
    assert_eq!(selection.subject_ids(), vec![ids[0], ids[2], ids[4]]);
}

#[test]
fn unknown_subject_id_is_rejected() {
    let conn = seeded_connection();
    let ids = catalog_ids(&conn);
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let err = validate_subject_selection(&repo, &[ids[0], ids[2], 9999]).unwrap_err();
    assert!(matches!(err, EnrollmentError::UnknownSubject(9999)));
}

#[test]
fn ids_beyond_the_first_three_distinct_are_never_resolved() {
    let conn = seeded_connection();
    let ids = catalog_ids(&conn);
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    // The unknown id sits past the truncation point, so it is ignored.
    let selection =
        validate_subject_selection(&repo, &[ids[0], ids[2], ids[4], 9999]).unwrap();
    assert_eq!(selection.subject_ids(), vec![ids[0], ids[2], ids[4]]);
}
