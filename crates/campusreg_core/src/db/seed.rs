//! Idempotent catalog seed procedure.
//!
//! # Responsibility
//! - Insert the fixed professor/subject catalog exactly once.
//! - Keep re-runs free of duplicates by looking rows up by name first.
//!
//! # Invariants
//! - The whole seed runs in a single transaction.
//! - Subject at index `i` belongs to professor at index `i / 2`; the catalog
//!   order pairs two subjects per professor. Both arrays are compile-time
//!   constants, so the pairing cannot drift at runtime.

use crate::db::DbResult;
use crate::model::catalog::SUBJECT_CREDITS;
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Transaction};

/// Fixed professor roster, in catalog order.
pub const PROFESSOR_NAMES: [&str; 5] = [
    "Prof. Gomez",
    "Prof. Lopez",
    "Prof. Smith",
    "Prof. Chen",
    "Prof. Alvarez",
];

/// Fixed subject catalog, in catalog order.
pub const SUBJECT_NAMES: [&str; 10] = [
    "Matemáticas I",
    "Programación I",
    "Física I",
    "Química I",
    "Historia Universal",
    "Inglés Técnico",
    "Bases de Datos",
    "Algoritmos",
    "Estadística",
    "Redes I",
];

/// Row counts inserted by one seed run. Re-runs report zeroes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub professors_inserted: usize,
    pub subjects_inserted: usize,
}

/// Seeds the professor/subject catalog, inserting only missing rows.
///
/// # Side effects
/// - Writes catalog rows inside one transaction.
/// - Emits a `seed_catalog` logging event with inserted counts.
pub fn seed_catalog(conn: &mut Connection) -> DbResult<SeedReport> {
    let tx = conn.transaction()?;

    let mut professor_ids = Vec::with_capacity(PROFESSOR_NAMES.len());
    let mut professors_inserted = 0;
    for name in PROFESSOR_NAMES {
        match find_id_by_name(&tx, "professors", name)? {
            Some(id) => professor_ids.push(id),
            None => {
                tx.execute("INSERT INTO professors (name) VALUES (?1);", [name])?;
                professors_inserted += 1;
                professor_ids.push(tx.last_insert_rowid());
            }
        }
    }

    let mut subjects_inserted = 0;
    for (idx, name) in SUBJECT_NAMES.iter().enumerate() {
        if find_id_by_name(&tx, "subjects", name)?.is_none() {
            tx.execute(
                "INSERT INTO subjects (name, credits, professor_id) VALUES (?1, ?2, ?3);",
                params![name, SUBJECT_CREDITS, professor_ids[idx / 2]],
            )?;
            subjects_inserted += 1;
        }
    }

    tx.commit()?;

    info!(
        "event=seed_catalog module=db status=ok professors_inserted={professors_inserted} subjects_inserted={subjects_inserted}"
    );

    Ok(SeedReport {
        professors_inserted,
        subjects_inserted,
    })
}

fn find_id_by_name(tx: &Transaction<'_>, table: &str, name: &str) -> DbResult<Option<i64>> {
    let id = tx
        .query_row(
            &format!("SELECT id FROM {table} WHERE name = ?1;"),
            [name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}
