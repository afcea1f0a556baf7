use campusreg_core::db::{open_db_in_memory, seed_catalog, PROFESSOR_NAMES, SUBJECT_NAMES};
use campusreg_core::{CatalogRepository, SqliteCatalogRepository, SUBJECT_CREDITS};
use rusqlite::Connection;

#[test]
fn seed_inserts_five_professors_and_ten_subjects() {
    let mut conn = open_db_in_memory().unwrap();

    let report = seed_catalog(&mut conn).unwrap();
    assert_eq!(report.professors_inserted, PROFESSOR_NAMES.len());
    assert_eq!(report.subjects_inserted, SUBJECT_NAMES.len());

    assert_eq!(count_rows(&conn, "professors"), 5);
    assert_eq!(count_rows(&conn, "subjects"), 10);
}

#[test]
fn seed_rerun_inserts_nothing_and_keeps_counts() {
    let mut conn = open_db_in_memory().unwrap();

    seed_catalog(&mut conn).unwrap();
    let first_ids = subject_ids_in_catalog_order(&conn);

    let second = seed_catalog(&mut conn).unwrap();
    assert_eq!(second.professors_inserted, 0);
    assert_eq!(second.subjects_inserted, 0);

    assert_eq!(count_rows(&conn, "professors"), 5);
    assert_eq!(count_rows(&conn, "subjects"), 10);
    // Existing rows keep their identity across re-runs.
    assert_eq!(subject_ids_in_catalog_order(&conn), first_ids);
}

#[test]
fn seed_assigns_two_subjects_per_professor_in_catalog_order() {
    let mut conn = open_db_in_memory().unwrap();
    seed_catalog(&mut conn).unwrap();

    let professors: Vec<(i64, String)> = {
        let repo = SqliteCatalogRepository::try_new(&conn).unwrap();
        repo.list_professors()
            .unwrap()
            .into_iter()
            .map(|professor| (professor.id, professor.name))
            .collect()
    };
    assert_eq!(professors.len(), 5);

    let mut stmt = conn
        .prepare("SELECT name, credits, professor_id FROM subjects ORDER BY id ASC;")
        .unwrap();
    let subjects: Vec<(String, i64, i64)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(subjects.len(), 10);
    for (idx, (name, credits, professor_id)) in subjects.iter().enumerate() {
        assert_eq!(name, SUBJECT_NAMES[idx]);
        assert_eq!(*credits, SUBJECT_CREDITS);
        // Subject i is taught by professor i / 2.
        assert_eq!(*professor_id, professors[idx / 2].0, "subject {name}");
    }
}

#[test]
fn catalog_listing_resolves_professor_names_sorted_by_subject_name() {
    let mut conn = open_db_in_memory().unwrap();
    seed_catalog(&mut conn).unwrap();

    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();
    let subjects = repo.list_subjects().unwrap();

    assert_eq!(subjects.len(), 10);
    let names: Vec<&str> = subjects.iter().map(|s| s.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort_by_key(|name| name.to_lowercase());
    assert_eq!(names, sorted);

    for subject in &subjects {
        assert!(PROFESSOR_NAMES.contains(&subject.professor_name.as_str()));
        assert_eq!(subject.credits, SUBJECT_CREDITS);
    }
}

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

fn subject_ids_in_catalog_order(conn: &Connection) -> Vec<i64> {
    let mut stmt = conn
        .prepare("SELECT id FROM subjects ORDER BY id ASC;")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}
