//! Configuration types for the bot.
//!
//! Loads settings from config.json at startup. Provides window and grid
//! geometry, recognition parameters, the attempt budget, and input timing.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::board::CounterRegion;
use crate::recognition::{BlankProbe, ExtraTileHash, ImageHash};

/// Global configuration instance, initialized once at startup.
static CONFIG: OnceLock<SweeperConfig> = OnceLock::new();

/// Virtual-key code of F2 (new game in the reference skin).
const VK_F2: u16 = 0x71;

/// Key combination that starts a new game.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Shortcut {
    /// Virtual-key code
    pub key: u16,
    /// Virtual-key code of a modifier held during the press
    pub modifier: Option<u16>,
}

impl Default for Shortcut {
    fn default() -> Self {
        Self {
            key: VK_F2,
            modifier: None,
        }
    }
}

/// Settle delays around synthetic input, in milliseconds.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct InputTiming {
    /// Between press and release of a button or key
    pub press_ms: u64,
    /// After the release
    pub release_ms: u64,
    /// After bringing the window to the foreground
    pub activate_ms: u64,
    /// After each move, before capturing again
    pub turn_delay_ms: u64,
    /// After the new-game shortcut, before capturing again
    pub new_game_delay_ms: u64,
}

impl Default for InputTiming {
    fn default() -> Self {
        Self {
            press_ms: 25,
            release_ms: 25,
            activate_ms: 200,
            turn_delay_ms: 150,
            new_game_delay_ms: 500,
        }
    }
}

/// Complete bot configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SweeperConfig {
    /// Exact title of the game window
    pub window_title: String,
    /// Tile edge length in pixels
    pub tile_size: u32,
    /// Height of the UI strip above the grid
    pub header_height: u32,
    /// Height of the UI strip below the grid
    pub footer_height: u32,
    /// Where the remaining-mine counter is drawn
    pub counter_region: CounterRegion,
    /// Counter hash meaning "0 mines left"
    pub zero_counter_hash: ImageHash,
    /// Open/unrevealed disambiguation for flat tiles
    pub blank_probe: BlankProbe,
    /// Number of attempts before giving up
    pub max_attempts: u32,
    /// Press the new-game shortcut before the first attempt
    pub start_new_game: bool,
    pub new_game: Shortcut,
    pub timing: InputTiming,
    /// Save tiles with unknown hashes into the session folder
    pub save_unmapped_tiles: bool,
    /// Save every observed frame into the session folder
    pub save_frames: bool,
    /// Log the classified board every turn
    pub log_board: bool,
    /// Additional hash → tile entries
    pub extra_tile_hashes: Vec<ExtraTileHash>,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            window_title: "Minesweeper".to_string(),
            tile_size: 32,
            header_height: 22,
            footer_height: 31,
            counter_region: CounterRegion::default(),
            zero_counter_hash: ImageHash(0xFF8F2737373787CF),
            blank_probe: BlankProbe::default(),
            max_attempts: 10,
            start_new_game: true,
            new_game: Shortcut::default(),
            timing: InputTiming::default(),
            save_unmapped_tiles: true,
            save_frames: false,
            log_board: true,
            extra_tile_hashes: Vec::new(),
        }
    }
}

impl SweeperConfig {
    /// Parses config JSON, filling missing keys with defaults.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        let mut config: SweeperConfig = serde_json::from_str(contents)?;
        if config.max_attempts == 0 {
            crate::log("max_attempts must be positive, using 1");
            config.max_attempts = 1;
        }
        Ok(config)
    }
}

/// Loads configuration from config.json or returns defaults.
/// Looks for config.json in the same directory as the executable.
fn load_config() -> SweeperConfig {
    let config_path = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("config.json")))
        .unwrap_or_else(|| Path::new("config.json").to_path_buf());

    crate::log(&format!("Looking for config at: {}", config_path.display()));

    if config_path.exists() {
        match fs::read_to_string(&config_path) {
            Ok(contents) => match SweeperConfig::from_json(&contents) {
                Ok(config) => {
                    crate::log("Config loaded from config.json");
                    return config;
                }
                Err(e) => {
                    crate::log(&format!(
                        "Failed to parse config.json: {}. Using defaults.",
                        e
                    ));
                }
            },
            Err(e) => {
                crate::log(&format!(
                    "Failed to read config.json: {}. Using defaults.",
                    e
                ));
            }
        }
    } else {
        crate::log("config.json not found. Using default config.");
    }

    SweeperConfig::default()
}

/// Initializes the global configuration. Call once at startup.
pub fn init_config() {
    let _ = get_config();
}

/// Returns the global configuration, loading it on first use.
pub fn get_config() -> &'static SweeperConfig {
    CONFIG.get_or_init(load_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::Tile;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = SweeperConfig::from_json(r#"{"window_title": "Mines", "max_attempts": 3}"#)
            .unwrap();
        assert_eq!(config.window_title, "Mines");
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.tile_size, 32);
        assert_eq!(config.blank_probe.brightness_threshold, 180);
        assert_eq!(config.zero_counter_hash, ImageHash(0xFF8F2737373787CF));
        assert_eq!(config.timing.turn_delay_ms, 150);
        assert!(config.save_unmapped_tiles);
        assert!(!config.save_frames);
    }

    #[test]
    fn test_zero_attempts_raised_to_one() {
        let config = SweeperConfig::from_json(r#"{"max_attempts": 0}"#).unwrap();
        assert_eq!(config.max_attempts, 1);
    }

    #[test]
    fn test_nested_sections() {
        let json = r#"{
            "zero_counter_hash": "00000000000000FF",
            "timing": {"press_ms": 5},
            "new_game": {"key": 78, "modifier": 17},
            "extra_tile_hashes": [{"hash": "0123456789ABCDEF", "tile": 64}]
        }"#;
        let config = SweeperConfig::from_json(json).unwrap();
        assert_eq!(config.zero_counter_hash, ImageHash(0xFF));
        assert_eq!(config.timing.press_ms, 5);
        assert_eq!(config.timing.release_ms, 25);
        assert_eq!(config.new_game.key, 78);
        assert_eq!(config.new_game.modifier, Some(17));
        assert_eq!(config.extra_tile_hashes.len(), 1);
        assert_eq!(config.extra_tile_hashes[0].tile, Tile::Bomb);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(SweeperConfig::from_json("{ not json").is_err());
        assert!(SweeperConfig::from_json(r#"{"zero_counter_hash": "xyz"}"#).is_err());
    }

    #[test]
    fn test_default_round_trips_through_json() {
        let json = serde_json::to_string_pretty(&SweeperConfig::default()).unwrap();
        let config = SweeperConfig::from_json(&json).unwrap();
        assert_eq!(config.window_title, "Minesweeper");
        assert_eq!(config.new_game.key, VK_F2);
    }
}
