use anyhow::{Context, Result};
use std::path::Path;

use circ_core::schema::{seed_demo_data, Database};

/// Load the illustrative demo catalog.
pub fn run_seed(db_path: &Path) -> Result<()> {
    let db = Database::open(db_path).context("Failed to open database")?;

    seed_demo_data(&db).context(
        "Failed to seed demo catalog (already seeded? seeding is not an upsert)",
    )?;

    println!("✓ Demo catalog loaded into {}", db_path.display());
    for (table, count) in db.table_counts()? {
        println!("  {table:<14} {count:>4} rows");
    }

    Ok(())
}
