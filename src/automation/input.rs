//! Mouse and keyboard input simulation.
//!
//! Uses SendInput, which simulates hardware-level input. It moves the real
//! cursor, and the game window must be in the foreground.

use anyhow::Result;
use std::time::Duration;

use super::config::Shortcut;

#[cfg(windows)]
pub use sendinput::{click_at_screen, press_key};

/// One keyboard event of a shortcut press (virtual-key code).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyStroke {
    Down(u16),
    Up(u16),
}

/// Presses a shortcut through `send`: modifier down, key down, hold, key up,
/// modifier up.
///
/// Once the modifier is down it is always released, even when a key event
/// fails; the first error is returned.
pub fn press_shortcut<F>(shortcut: Shortcut, hold: Duration, mut send: F) -> Result<()>
where
    F: FnMut(KeyStroke) -> Result<()>,
{
    if let Some(modifier) = shortcut.modifier {
        send(KeyStroke::Down(modifier))?;
    }

    let tapped = match send(KeyStroke::Down(shortcut.key)) {
        Ok(()) => {
            std::thread::sleep(hold);
            send(KeyStroke::Up(shortcut.key))
        }
        Err(e) => Err(e),
    };

    let released = match shortcut.modifier {
        Some(modifier) => send(KeyStroke::Up(modifier)),
        None => Ok(()),
    };

    tapped.and(released)
}

#[cfg(windows)]
mod sendinput {
    use anyhow::{anyhow, Result};
    use std::time::Duration;

    use windows::Win32::UI::Input::KeyboardAndMouse::{
        SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBDINPUT, KEYBD_EVENT_FLAGS,
        KEYEVENTF_KEYUP, MOUSEEVENTF_ABSOLUTE, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP,
        MOUSEEVENTF_MOVE, MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP, MOUSE_EVENT_FLAGS,
        MOUSEINPUT, VIRTUAL_KEY,
    };
    use windows::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN};

    use super::{press_shortcut, KeyStroke};
    use crate::automation::config::{InputTiming, Shortcut};
    use crate::automation::platform::ClickKind;

    fn send(inputs: &[INPUT]) -> Result<()> {
        let sent = unsafe { SendInput(inputs, std::mem::size_of::<INPUT>() as i32) };
        if sent as usize != inputs.len() {
            return Err(anyhow!(
                "SendInput accepted {} of {} events",
                sent,
                inputs.len()
            ));
        }
        Ok(())
    }

    fn mouse_event(norm_x: i32, norm_y: i32, flags: MOUSE_EVENT_FLAGS) -> INPUT {
        INPUT {
            r#type: INPUT_MOUSE,
            Anonymous: INPUT_0 {
                mi: MOUSEINPUT {
                    dx: norm_x,
                    dy: norm_y,
                    dwFlags: flags | MOUSEEVENTF_ABSOLUTE | MOUSEEVENTF_MOVE,
                    ..Default::default()
                },
            },
        }
    }

    fn key_event(stroke: KeyStroke) -> INPUT {
        let (key, flags) = match stroke {
            KeyStroke::Down(key) => (key, KEYBD_EVENT_FLAGS(0)),
            KeyStroke::Up(key) => (key, KEYEVENTF_KEYUP),
        };
        INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: VIRTUAL_KEY(key),
                    dwFlags: flags,
                    ..Default::default()
                },
            },
        }
    }

    /// Clicks at absolute screen coordinates.
    ///
    /// Each event carries the absolute position, normalized to 0..65535 as
    /// MOUSEEVENTF_ABSOLUTE requires.
    pub fn click_at_screen(
        kind: ClickKind,
        screen_x: i32,
        screen_y: i32,
        timing: &InputTiming,
    ) -> Result<()> {
        let screen_width = unsafe { GetSystemMetrics(SM_CXSCREEN) };
        let screen_height = unsafe { GetSystemMetrics(SM_CYSCREEN) };
        if screen_width <= 0 || screen_height <= 0 {
            return Err(anyhow!("Could not read screen size"));
        }

        let norm_x = ((screen_x as i64 * 65535) / screen_width as i64) as i32;
        let norm_y = ((screen_y as i64 * 65535) / screen_height as i64) as i32;

        let (down, up) = match kind {
            ClickKind::Left => (MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP),
            ClickKind::Right => (MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP),
        };

        send(&[mouse_event(norm_x, norm_y, MOUSE_EVENT_FLAGS(0))])?;
        send(&[mouse_event(norm_x, norm_y, down)])?;
        std::thread::sleep(Duration::from_millis(timing.press_ms));
        send(&[mouse_event(norm_x, norm_y, up)])?;
        std::thread::sleep(Duration::from_millis(timing.release_ms));
        Ok(())
    }

    /// Presses and releases a key, holding the shortcut's modifier around it.
    pub fn press_key(shortcut: Shortcut, timing: &InputTiming) -> Result<()> {
        let result = press_shortcut(
            shortcut,
            Duration::from_millis(timing.press_ms),
            |stroke| send(&[key_event(stroke)]),
        );
        std::thread::sleep(Duration::from_millis(timing.release_ms));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    const CTRL: u16 = 0x11;
    const KEY_N: u16 = 0x4E;

    fn ctrl_n() -> Shortcut {
        Shortcut {
            key: KEY_N,
            modifier: Some(CTRL),
        }
    }

    /// Records strokes, failing the ones listed in `fail`.
    fn press(shortcut: Shortcut, fail: &[KeyStroke]) -> (Result<()>, Vec<KeyStroke>) {
        let mut sent = Vec::new();
        let result = press_shortcut(shortcut, Duration::ZERO, |stroke| {
            sent.push(stroke);
            if fail.contains(&stroke) {
                Err(anyhow!("rejected {:?}", stroke))
            } else {
                Ok(())
            }
        });
        (result, sent)
    }

    #[test]
    fn test_shortcut_order() {
        let (result, sent) = press(ctrl_n(), &[]);
        assert!(result.is_ok());
        assert_eq!(
            sent,
            vec![
                KeyStroke::Down(CTRL),
                KeyStroke::Down(KEY_N),
                KeyStroke::Up(KEY_N),
                KeyStroke::Up(CTRL),
            ]
        );
    }

    #[test]
    fn test_plain_key_has_no_modifier_events() {
        let shortcut = Shortcut {
            key: 0x71,
            modifier: None,
        };
        let (result, sent) = press(shortcut, &[]);
        assert!(result.is_ok());
        assert_eq!(sent, vec![KeyStroke::Down(0x71), KeyStroke::Up(0x71)]);
    }

    #[test]
    fn test_modifier_released_when_key_up_fails() {
        let (result, sent) = press(ctrl_n(), &[KeyStroke::Up(KEY_N)]);
        assert!(result.is_err());
        assert_eq!(sent.last(), Some(&KeyStroke::Up(CTRL)));
    }

    #[test]
    fn test_modifier_released_when_key_down_fails() {
        let (result, sent) = press(ctrl_n(), &[KeyStroke::Down(KEY_N)]);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Down(78)"));
        assert_eq!(
            sent,
            vec![
                KeyStroke::Down(CTRL),
                KeyStroke::Down(KEY_N),
                KeyStroke::Up(CTRL),
            ]
        );
    }

    #[test]
    fn test_failed_modifier_sends_nothing_else() {
        let (result, sent) = press(ctrl_n(), &[KeyStroke::Down(CTRL)]);
        assert!(result.is_err());
        assert_eq!(sent, vec![KeyStroke::Down(CTRL)]);
    }
}
