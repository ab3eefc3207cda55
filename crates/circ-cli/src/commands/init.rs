use anyhow::{Context, Result};
use std::path::Path;

use circ_core::schema::Database;

/// Create the database (and its parent directory) and apply migrations.
pub fn run_init(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }

    let db = Database::open(db_path).context("Failed to open database")?;

    let tables = db.table_counts().context("Failed to inspect schema")?;
    println!("✓ Catalog database ready: {}", db_path.display());
    println!("  {} tables", tables.len());
    println!("\nRun `circ seed` to load the demo catalog.");

    Ok(())
}
