//! The boundary between the play loop and the operating system.
//!
//! The session controller only talks to a `GameHost`: it asks for captures,
//! clicks, key presses and the current window geometry. The Windows
//! implementation lives in `WindowsHost`; tests drive the controller with a
//! scripted host.

use anyhow::Result;

use crate::automation::config::Shortcut;
use crate::capture::RasterBuffer;

/// Placement of the game window's client area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowInfo {
    /// OS window handle
    pub id: isize,
    /// Process owning the window
    pub owner_pid: u32,
    /// Screen coordinates of the client area's top-left corner
    pub origin_x: i32,
    pub origin_y: i32,
    /// Client area size in pixels
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickKind {
    Left,
    Right,
}

/// Screen and input collaborator for the session controller.
pub trait GameHost {
    /// Current geometry of the game window.
    fn window_info(&mut self) -> Result<WindowInfo>;
    /// Captures the window's client area.
    fn capture(&mut self) -> Result<RasterBuffer>;
    /// Press/release pair at absolute screen coordinates.
    fn click(&mut self, kind: ClickKind, screen_x: i32, screen_y: i32) -> Result<()>;
    /// Presses a key, holding the shortcut's modifier if any.
    fn key_press(&mut self, shortcut: Shortcut) -> Result<()>;
}

#[cfg(windows)]
pub use windows_host::WindowsHost;

#[cfg(windows)]
mod windows_host {
    use anyhow::{anyhow, Result};
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::WindowsAndMessaging::IsWindow;

    use super::{ClickKind, GameHost, WindowInfo};
    use crate::automation::config::{InputTiming, Shortcut};
    use crate::automation::input::{click_at_screen, press_key};
    use crate::capture::{capture_window_to_raster, window_info, RasterBuffer};

    /// Drives the real game window through Win32.
    pub struct WindowsHost {
        hwnd: HWND,
        timing: InputTiming,
    }

    impl WindowsHost {
        pub fn new(window: &WindowInfo, timing: InputTiming) -> Self {
            Self {
                hwnd: HWND(window.id as *mut std::ffi::c_void),
                timing,
            }
        }

        fn ensure_window(&self) -> Result<()> {
            if unsafe { IsWindow(self.hwnd).as_bool() } {
                Ok(())
            } else {
                Err(anyhow!("Game window no longer exists"))
            }
        }
    }

    impl GameHost for WindowsHost {
        fn window_info(&mut self) -> Result<WindowInfo> {
            self.ensure_window()?;
            window_info(self.hwnd)
        }

        fn capture(&mut self) -> Result<RasterBuffer> {
            self.ensure_window()?;
            capture_window_to_raster(self.hwnd)
        }

        fn click(&mut self, kind: ClickKind, screen_x: i32, screen_y: i32) -> Result<()> {
            self.ensure_window()?;
            click_at_screen(kind, screen_x, screen_y, &self.timing)
        }

        fn key_press(&mut self, shortcut: Shortcut) -> Result<()> {
            self.ensure_window()?;
            press_key(shortcut, &self.timing)
        }
    }
}
