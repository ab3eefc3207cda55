pub mod db;
pub mod migrations;
pub mod seed;

pub use db::{CirculationSummary, Database};
pub use seed::seed_demo_data;
