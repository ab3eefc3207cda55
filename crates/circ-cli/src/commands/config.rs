use anyhow::Result;

use crate::config;

/// Show the current effective configuration.
pub fn show_config() -> Result<()> {
    let cfg = config::Config::load()?;

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!(
        "File exists: {}\n",
        if exists { "yes" } else { "no (using defaults)" }
    );

    println!("Settings:");
    println!("  database_path: {}", cfg.database_path.display());

    println!("\nPriority: CLI args > ENV vars (CIRC_*) > Config file > Defaults");

    Ok(())
}

/// Show the config file path.
pub fn show_config_path() -> Result<()> {
    println!("{}", config::config_file_path().display());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure circ.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
