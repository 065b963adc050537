//! Command-line front end for the payday engine
//!
//! Runs autopiloted games and batches, loads YAML configs and sets up
//! logging. All game rules live in `payday_core`.

pub mod commands;
pub mod logging;
pub mod report;
pub mod settings;

pub use commands::{run_batch, run_config, run_play};
pub use logging::init_logging;
pub use settings::{default_data_dir, load_config};
