//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `campusreg_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use campusreg_core::db::{open_db_in_memory, seed_catalog};
use campusreg_core::{default_log_level, init_logging};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A tiny probe validating core crate wiring independently from any
    // HTTP/UI adapter: initialize logging, open a throwaway database and
    // seed the catalog.
    let log_dir = std::env::temp_dir().join("campusreg-cli");
    let log_dir = log_dir.to_str().ok_or("temp dir is not valid UTF-8")?;
    init_logging(default_log_level(), log_dir)?;
    println!("campusreg_core log_dir={log_dir}");

    println!("campusreg_core ping={}", campusreg_core::ping());
    println!("campusreg_core version={}", campusreg_core::core_version());

    let mut conn = open_db_in_memory()?;
    let report = seed_catalog(&mut conn)?;
    println!(
        "seed professors_inserted={} subjects_inserted={}",
        report.professors_inserted, report.subjects_inserted
    );
    Ok(())
}
