pub mod config;
pub mod init;
pub mod seed;
pub mod status;

pub use config::{init_config, show_config, show_config_path};
pub use init::run_init;
pub use seed::run_seed;
pub use status::show_status;
