//! Runner: main entry point for a bot run.
//!
//! Creates the session folder, runs the state machine to completion and logs
//! the final result.

use anyhow::{anyhow, Result};
use chrono::Local;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::fs;
use std::path::{Path, PathBuf};

use crate::automation::config::SweeperConfig;
use crate::automation::csv_writer::init_csv;
use crate::automation::platform::GameHost;
use crate::automation::state::{RunOutcome, SessionController};
use crate::recognition::ClassificationTable;

/// Creates `output_dir/YYYYMMDD_HHMMSS/`.
fn create_session_dir(output_dir: &Path) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let session_dir = output_dir.join(&timestamp);
    fs::create_dir_all(&session_dir)
        .map_err(|e| anyhow!("Failed to create session directory: {}", e))?;
    Ok(session_dir)
}

/// Plays on `host` until the board is won or every attempt is lost.
pub fn run_session<H: GameHost>(
    host: H,
    config: &SweeperConfig,
    table: &ClassificationTable,
    output_dir: &Path,
) -> Result<RunOutcome> {
    let session_dir = create_session_dir(output_dir)?;
    crate::set_session_log(Some(session_dir.join("session.log")));

    let csv_path = session_dir.join("attempts.csv");
    if let Err(e) = init_csv(&csv_path) {
        crate::set_session_log(None);
        return Err(anyhow!("Failed to initialize CSV file: {}", e));
    }

    crate::log(&format!("Session folder: {}", session_dir.display()));
    crate::log(&format!("Attempt records: {}", csv_path.display()));

    let mut ctl = SessionController::new(
        host,
        config.clone(),
        table,
        SmallRng::from_os_rng(),
        session_dir,
    );

    let result = loop {
        match ctl.step() {
            Ok(true) => {}
            Ok(false) => {
                break ctl
                    .outcome()
                    .ok_or_else(|| anyhow!("Run stopped in state {}", ctl.state));
            }
            Err(e) => {
                crate::log(&format!("Run failed in state {}: {:#}", ctl.state, e));
                break Err(e);
            }
        }
    };

    match &result {
        Ok(RunOutcome::Won { attempt }) => {
            crate::log(&format!("Result: won on attempt {}", attempt));
        }
        Ok(RunOutcome::Exhausted { attempts }) => {
            crate::log(&format!("Result: lost all {} attempt(s)", attempts));
        }
        Err(_) => {}
    }

    crate::set_session_log(None);
    result
}

/// Finds the game window and plays it with the global configuration.
#[cfg(windows)]
pub fn run() -> Result<RunOutcome> {
    use crate::automation::config::get_config;
    use crate::automation::platform::WindowsHost;
    use crate::capture::{activate_window, find_window};
    use crate::recognition::get_table;

    let config = get_config();
    let window = find_window(&config.window_title)?;
    activate_window(&window, config.timing.activate_ms);

    let host = WindowsHost::new(&window, config.timing);
    run_session(host, config, get_table(), &crate::paths::get_output_dir())
}
