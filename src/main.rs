//! Minesweeper Bot
//!
//! Plays Minesweeper from screen pixels only: captures the game window,
//! classifies every tile by its perceptual hash, picks a move with two local
//! rules (or a random guess) and clicks it with synthetic input.

// The play loop is only reachable from the Windows entry point
#[cfg_attr(not(windows), allow(dead_code))]
mod automation;
#[cfg_attr(not(windows), allow(dead_code))]
mod board;
#[cfg_attr(not(windows), allow(dead_code))]
mod capture;
#[cfg_attr(not(windows), allow(dead_code))]
mod error;
mod paths;
#[cfg_attr(not(windows), allow(dead_code))]
mod recognition;
#[cfg_attr(not(windows), allow(dead_code))]
mod solver;

use anyhow::Result;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

/// Log file of the active run, if any.
static SESSION_LOG: Mutex<Option<PathBuf>> = Mutex::new(None);

fn append_line(path: &std::path::Path, line: &str) {
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = file.write_all(line.as_bytes());
    }
}

/// Logs a message to the console, the log file and the active session log.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    append_line(&paths::get_logs_dir().join("minesweeper_bot.log"), &line);
    if let Ok(session) = SESSION_LOG.lock() {
        if let Some(path) = session.as_ref() {
            append_line(path, &line);
        }
    }
}

/// Starts or stops mirroring log lines into a session's own log file.
#[cfg_attr(not(windows), allow(dead_code))]
pub fn set_session_log(path: Option<PathBuf>) {
    if let Ok(mut session) = SESSION_LOG.lock() {
        *session = path;
    }
}

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = if let Some(loc) = panic_info.location() {
            format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column())
        } else {
            String::new()
        };
        let log_msg = format!("[PANIC]{} {}\n", location, msg);
        eprintln!("{}", log_msg);
        append_line(
            &paths::get_logs_dir().join("minesweeper_bot.log"),
            &log_msg,
        );
    }));
}

#[cfg(windows)]
fn main() -> Result<ExitCode> {
    use automation::RunOutcome;
    use error::SweepError;

    install_panic_hook();

    unsafe {
        windows::Win32::System::WinRT::RoInitialize(
            windows::Win32::System::WinRT::RO_INIT_MULTITHREADED,
        )?
    };

    paths::ensure_directories()?;
    automation::init_config();
    recognition::init_table();

    match automation::run() {
        Ok(RunOutcome::Won { .. }) => Ok(ExitCode::SUCCESS),
        Ok(RunOutcome::Exhausted { .. }) => Ok(ExitCode::FAILURE),
        Err(e) => {
            if let Some(SweepError::WindowNotFound(title)) = e.downcast_ref::<SweepError>() {
                log(&format!(
                    "No window titled \"{}\" found. Start the game or set window_title in config.json.",
                    title
                ));
            } else {
                log(&format!("Error: {:#}", e));
            }
            Err(e)
        }
    }
}

#[cfg(not(windows))]
fn main() -> Result<ExitCode> {
    install_panic_hook();
    paths::ensure_directories()?;
    log("Screen capture and input are only implemented for Windows.");
    Err(anyhow::anyhow!("unsupported platform"))
}
