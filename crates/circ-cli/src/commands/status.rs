use anyhow::{Context, Result};
use std::path::Path;

use circ_core::schema::Database;

/// Show table-by-table row counts and circulation highlights.
pub fn show_status(db_path: &Path) -> Result<()> {
    let db = Database::open(db_path).context("Failed to open database")?;

    let counts = db.table_counts()?;
    let summary = db.circulation_summary()?;

    println!("\n📚 Circulation Status\n");
    println!("  Database: {}", db_path.display());
    println!();
    for (table, count) in &counts {
        println!("  {table:<14} {count:>4} rows");
    }
    println!();
    println!("  Overdue loans:       {}", summary.overdue_loans);
    println!("  Active reservations: {}", summary.active_reservations);
    println!("  Pending fines:       {}", summary.pending_fines);

    if counts.iter().all(|(_, n)| *n == 0) {
        println!("\n  Empty catalog. Run `circ seed` to load the demo data.");
    }

    Ok(())
}
