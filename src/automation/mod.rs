//! Playing the game.
//!
//! This module provides:
//! - Configuration loaded from config.json
//! - The `GameHost` boundary and its Windows implementation
//! - The session state machine and the run entry point
//! - Attempt records (CSV) and diagnostic images

pub mod config;
pub mod csv_writer;
pub mod diagnostics;
pub mod input;
pub mod platform;
pub mod runner;
pub mod state;
#[cfg(test)]
pub mod testing;

pub use config::{get_config, init_config, SweeperConfig};
pub use platform::{ClickKind, GameHost, WindowInfo};
#[cfg(windows)]
pub use runner::run;
pub use runner::run_session;
pub use state::{RunOutcome, SessionController, SessionState};
