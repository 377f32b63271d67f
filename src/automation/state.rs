//! Session state machine for playing Minesweeper.
//!
//! The state machine sequences through:
//! Idle → Observing → Deciding → Acting → Observing, until the board is won
//! or an attempt is lost. A lost attempt restarts the game while the attempt
//! budget lasts, then the machine ends in Exhausted.

use anyhow::Result;
use chrono::Local;
use rand::Rng;
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::automation::config::SweeperConfig;
use crate::automation::csv_writer::{append_attempt, AttemptRecord};
use crate::automation::diagnostics::{save_frame, save_unmapped_tile};
use crate::automation::platform::{ClickKind, GameHost};
use crate::board::{classify_all, log_board, sample_counter, Board, BoardGeometry, Coord};
use crate::error::SweepError;
use crate::recognition::{ClassificationTable, ImageHash, Tile};
use crate::solver::{decide, Action, Decision, Rule};

/// Why an attempt ended without a win.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossReason {
    /// A bomb tile is visible
    Detonated,
    /// A tile hash was not in the table
    Unclassified,
    /// No move was available but the counter did not read zero
    Stalled,
}

impl LossReason {
    fn as_str(self) -> &'static str {
        match self {
            LossReason::Detonated => "detonated",
            LossReason::Unclassified => "unclassified",
            LossReason::Stalled => "stalled",
        }
    }
}

/// Session state machine states.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Not started yet
    Idle,
    /// Capturing and classifying the board
    Observing,
    /// Choosing the next move
    Deciding,
    /// Clicking the chosen cell
    Acting(Decision),
    /// The board was cleared
    Won,
    /// The current attempt failed
    Lost(LossReason),
    /// Every attempt failed
    Exhausted,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Observing => write!(f, "Observing"),
            SessionState::Deciding => write!(f, "Deciding"),
            SessionState::Acting(d) => write!(f, "Acting: {:?} ({})", d.action, d.rule),
            SessionState::Won => write!(f, "Won"),
            SessionState::Lost(reason) => write!(f, "Lost: {}", reason.as_str()),
            SessionState::Exhausted => write!(f, "Exhausted"),
        }
    }
}

/// Result of a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Won { attempt: u32 },
    Exhausted { attempts: u32 },
}

/// Per-attempt bookkeeping.
#[derive(Debug)]
pub struct Session {
    pub geometry: BoardGeometry,
    /// Board from the latest observation
    pub board: Option<Board>,
    /// Mine-counter hash from the latest observation
    pub counter_hash: Option<ImageHash>,
    /// Frames captured during this attempt
    pub observations: u32,
    /// 1-based attempt number
    pub attempt: u32,
    pub moves: u32,
    pub guesses: u32,
    pub started: Instant,
}

impl Session {
    fn new(geometry: BoardGeometry, attempt: u32) -> Self {
        Self {
            geometry,
            board: None,
            counter_hash: None,
            observations: 0,
            attempt,
            moves: 0,
            guesses: 0,
            started: Instant::now(),
        }
    }
}

/// Drives one game window until it is won or the attempt budget runs out.
pub struct SessionController<'t, H: GameHost, R: Rng> {
    pub state: SessionState,
    host: H,
    rng: R,
    config: SweeperConfig,
    table: &'t ClassificationTable,
    /// Folder for attempts.csv and diagnostic images
    session_dir: PathBuf,
    session: Option<Session>,
    attempts_remaining: u32,
    attempts_used: u32,
}

impl<'t, H: GameHost, R: Rng> SessionController<'t, H, R> {
    pub fn new(
        host: H,
        config: SweeperConfig,
        table: &'t ClassificationTable,
        rng: R,
        session_dir: PathBuf,
    ) -> Self {
        let attempts_remaining = config.max_attempts.max(1);
        Self {
            state: SessionState::Idle,
            host,
            rng,
            config,
            table,
            session_dir,
            session: None,
            attempts_remaining,
            attempts_used: 0,
        }
    }

    /// Advances the state machine by one step.
    ///
    /// Returns `Ok(true)` while the run continues, `Ok(false)` once it is won
    /// or exhausted. Capture and input failures are returned as errors.
    pub fn step(&mut self) -> Result<bool> {
        match self.state.clone() {
            SessionState::Idle => {
                crate::log(&format!(
                    "Starting run: {} attempt(s) on \"{}\"",
                    self.attempts_remaining, self.config.window_title
                ));
                if self.config.start_new_game {
                    self.new_game()?;
                }
                self.begin_attempt()?;
                self.state = SessionState::Observing;
                Ok(true)
            }

            SessionState::Observing => self.observe(),

            SessionState::Deciding => {
                let Some(board) = self.session.as_ref().and_then(|s| s.board.as_ref()) else {
                    return Err(anyhow::anyhow!("Deciding without an observed board"));
                };
                match decide(board, &mut self.rng) {
                    Some(decision) => {
                        self.state = SessionState::Acting(decision);
                    }
                    None => {
                        crate::log(&format!("Anomaly: {}", SweepError::Stalled));
                        self.lose(LossReason::Stalled);
                    }
                }
                Ok(true)
            }

            SessionState::Acting(decision) => {
                self.act(decision)?;
                std::thread::sleep(Duration::from_millis(self.config.timing.turn_delay_ms));
                self.state = SessionState::Observing;
                Ok(true)
            }

            SessionState::Lost(_) => {
                self.attempts_remaining -= 1;
                if self.attempts_remaining == 0 {
                    crate::log(&format!(
                        "Giving up after {} attempt(s)",
                        self.attempts_used
                    ));
                    self.state = SessionState::Exhausted;
                    return Ok(false);
                }
                crate::log(&format!(
                    "{} attempt(s) left, starting a new game",
                    self.attempts_remaining
                ));
                self.new_game()?;
                self.begin_attempt()?;
                self.state = SessionState::Observing;
                Ok(true)
            }

            SessionState::Won | SessionState::Exhausted => Ok(false),
        }
    }

    /// Final outcome, once the run has ended.
    pub fn outcome(&self) -> Option<RunOutcome> {
        match self.state {
            SessionState::Won => Some(RunOutcome::Won {
                attempt: self.attempts_used,
            }),
            SessionState::Exhausted => Some(RunOutcome::Exhausted {
                attempts: self.attempts_used,
            }),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn attempts_remaining(&self) -> u32 {
        self.attempts_remaining
    }

    #[cfg(test)]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[cfg(test)]
    pub fn host(&self) -> &H {
        &self.host
    }

    fn session_mut(&mut self) -> Result<&mut Session> {
        self.session
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("No attempt in progress"))
    }

    /// Re-reads the window geometry and opens a fresh attempt.
    fn begin_attempt(&mut self) -> Result<()> {
        let window = self.host.window_info()?;
        let geometry = BoardGeometry::from_window(&window, &self.config)?;
        self.attempts_used += 1;
        crate::log(&format!(
            "Attempt {}: {}x{} grid",
            self.attempts_used, geometry.columns, geometry.rows
        ));
        self.session = Some(Session::new(geometry, self.attempts_used));
        Ok(())
    }

    fn new_game(&mut self) -> Result<()> {
        self.host.key_press(self.config.new_game)?;
        std::thread::sleep(Duration::from_millis(self.config.timing.new_game_delay_ms));
        Ok(())
    }

    fn observe(&mut self) -> Result<bool> {
        let raster = self.host.capture()?;
        let session = self.session_mut()?;
        session.observations += 1;
        let (geometry, attempt, index) = (session.geometry, session.attempt, session.observations);

        if self.config.save_frames {
            if let Err(e) = save_frame(&self.session_dir, attempt, index, &raster) {
                crate::log(&format!("Warning: {}", e));
            }
        }

        let counter = sample_counter(&raster, &geometry, &self.config.counter_region);
        self.session_mut()?.counter_hash = Some(counter);
        let result = classify_all(&raster, &geometry, self.table, &self.config.blank_probe);

        // The counter reading wins over anything on the board
        if counter == self.config.zero_counter_hash {
            match result {
                Ok(board) => self.sweep(&board)?,
                Err(e) => crate::log(&format!(
                    "Warning: counter reads zero but the board could not be read ({}); skipping sweep",
                    e
                )),
            }
            self.win();
            return Ok(false);
        }

        let board = match result {
            Ok(board) => board,
            Err(SweepError::Classification { x, y, source }) => {
                crate::log(&format!(
                    "Tile ({}, {}) could not be classified: hash {}",
                    x, y, source.hash
                ));
                if self.config.save_unmapped_tiles {
                    match save_unmapped_tile(&self.session_dir, x, y, &source) {
                        Ok(path) => crate::log(&format!("Saved tile to {}", path.display())),
                        Err(e) => crate::log(&format!("Warning: {}", e)),
                    }
                }
                self.lose(LossReason::Unclassified);
                return Ok(true);
            }
            Err(e) => return Err(e.into()),
        };

        crate::log(&format!(
            "Board {}x{}: {} unknown, {} flagged, counter {}",
            board.width(),
            board.height(),
            board.count(Tile::Unknown),
            board.count(Tile::Flag),
            counter
        ));
        if self.config.log_board {
            log_board(&board);
        }

        if board.has_bomb() {
            crate::log("Bomb visible on the board");
            self.lose(LossReason::Detonated);
            return Ok(true);
        }

        self.session_mut()?.board = Some(board);
        self.state = SessionState::Deciding;
        Ok(true)
    }

    /// Reveals every remaining unknown cell.
    fn sweep(&mut self, board: &Board) -> Result<()> {
        let unknown = board.cells_with(Tile::Unknown);
        crate::log(&format!(
            "Counter reads zero, revealing {} remaining cell(s)",
            unknown.len()
        ));
        for coord in unknown {
            self.click_cell(ClickKind::Left, coord)?;
        }
        Ok(())
    }

    fn act(&mut self, decision: Decision) -> Result<()> {
        let (kind, verb) = match decision.action {
            Action::Flag(_) => (ClickKind::Right, "Flag"),
            Action::Reveal(_) => (ClickKind::Left, "Reveal"),
        };
        let coord = decision.action.coord();
        match decision.source {
            Some(source) => crate::log(&format!(
                "{} {} ({} from {})",
                verb, coord, decision.rule, source
            )),
            None => crate::log(&format!("{} {} ({})", verb, coord, decision.rule)),
        }

        self.click_cell(kind, coord)?;
        if decision.rule == Rule::RandomGuess {
            self.session_mut()?.guesses += 1;
        }
        Ok(())
    }

    fn click_cell(&mut self, kind: ClickKind, coord: Coord) -> Result<()> {
        let session = self.session_mut()?;
        let (x, y) = session.geometry.cell_center(coord);
        session.moves += 1;
        self.host.click(kind, x, y)
    }

    fn win(&mut self) {
        self.record("won", "");
        if let Some(session) = &self.session {
            crate::log(&format!(
                "Won on attempt {} after {} move(s) in {:.1}s",
                session.attempt,
                session.moves,
                session.started.elapsed().as_secs_f32()
            ));
        }
        self.state = SessionState::Won;
    }

    fn lose(&mut self, reason: LossReason) {
        self.record("lost", reason.as_str());
        let counter = self
            .session
            .as_ref()
            .and_then(|s| s.counter_hash)
            .map_or_else(|| "-".to_string(), |h| h.to_string());
        crate::log(&format!(
            "Attempt {} lost ({}), counter {}",
            self.attempts_used,
            reason.as_str(),
            counter
        ));
        self.state = SessionState::Lost(reason);
    }

    fn record(&self, outcome: &'static str, loss_reason: &'static str) {
        let Some(session) = &self.session else {
            return;
        };
        let record = AttemptRecord {
            attempt: session.attempt,
            finished_at: Local::now(),
            outcome,
            loss_reason,
            moves: session.moves,
            guesses: session.guesses,
            duration_ms: session.started.elapsed().as_millis(),
        };
        // Records are secondary; a write failure doesn't end the run
        if let Err(e) = append_attempt(&self.session_dir.join("attempts.csv"), &record) {
            crate::log(&format!("Warning: Failed to record attempt: {}", e));
        }
    }
}
