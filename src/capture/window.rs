//! Window discovery: finds the game window by its exact title.

use anyhow::{anyhow, Result};
use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;
use std::time::Duration;

use windows::Win32::Foundation::{BOOL, HWND, LPARAM, POINT, RECT, TRUE};
use windows::Win32::Graphics::Gdi::ClientToScreen;
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetClientRect, GetWindowRect, GetWindowTextLengthW, GetWindowTextW,
    GetWindowThreadProcessId, IsWindowVisible, SetForegroundWindow,
};

use crate::automation::platform::WindowInfo;
use crate::error::SweepError;

fn window_title(hwnd: HWND) -> String {
    unsafe {
        let title_len = GetWindowTextLengthW(hwnd);
        if title_len <= 0 {
            return String::new();
        }
        let mut title_buf: Vec<u16> = vec![0; (title_len + 1) as usize];
        let copied = GetWindowTextW(hwnd, &mut title_buf).max(0) as usize;
        OsString::from_wide(&title_buf[..copied])
            .to_string_lossy()
            .to_string()
    }
}

/// Finds the first visible top-level window whose title equals `title`.
///
/// Returns `SweepError::WindowNotFound` when no window matches.
pub fn find_window(title: &str) -> Result<WindowInfo> {
    struct EnumData<'a> {
        title: &'a str,
        hwnd: Option<HWND>,
    }

    unsafe extern "system" fn enum_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
        unsafe {
            let data = &mut *(lparam.0 as *mut EnumData);

            if !IsWindowVisible(hwnd).as_bool() {
                return TRUE;
            }
            if window_title(hwnd) == data.title {
                data.hwnd = Some(hwnd);
                return BOOL(0); // Stop enumeration
            }
            TRUE
        }
    }

    crate::log(&format!("Searching for window \"{}\"...", title));
    let mut data = EnumData { title, hwnd: None };
    unsafe {
        // EnumWindows reports FALSE when the callback stops it early
        let _ = EnumWindows(Some(enum_callback), LPARAM(&mut data as *mut _ as isize));
    }

    let hwnd = data
        .hwnd
        .ok_or_else(|| SweepError::WindowNotFound(title.to_string()))?;
    let info = window_info(hwnd)?;
    crate::log(&format!(
        "Found window {:?} (pid {}): client {}x{} at ({}, {})",
        hwnd, info.owner_pid, info.width, info.height, info.origin_x, info.origin_y
    ));
    Ok(info)
}

/// Reads the client area's screen position and size.
pub fn window_info(hwnd: HWND) -> Result<WindowInfo> {
    let mut client_rect = RECT::default();
    unsafe { GetClientRect(hwnd, &mut client_rect)? };

    let mut origin = POINT { x: 0, y: 0 };
    unsafe {
        if !ClientToScreen(hwnd, &mut origin).as_bool() {
            return Err(anyhow!("ClientToScreen failed"));
        }
    }

    let mut owner_pid: u32 = 0;
    unsafe { GetWindowThreadProcessId(hwnd, Some(&mut owner_pid)) };

    Ok(WindowInfo {
        id: hwnd.0 as isize,
        owner_pid,
        origin_x: origin.x,
        origin_y: origin.y,
        width: (client_rect.right - client_rect.left).max(0) as u32,
        height: (client_rect.bottom - client_rect.top).max(0) as u32,
    })
}

/// Offset of the client area from the window's top-left corner.
///
/// Window captures include the title bar and borders; this is where the
/// client area starts inside them.
pub fn client_offset(hwnd: HWND) -> Result<POINT> {
    let mut client_origin = POINT { x: 0, y: 0 };
    unsafe {
        if !ClientToScreen(hwnd, &mut client_origin).as_bool() {
            return Err(anyhow!("ClientToScreen failed"));
        }
    }

    let mut window_rect = RECT::default();
    unsafe { GetWindowRect(hwnd, &mut window_rect)? };

    Ok(POINT {
        x: client_origin.x - window_rect.left,
        y: client_origin.y - window_rect.top,
    })
}

/// Brings the window to the foreground and waits for it to settle.
pub fn activate_window(window: &WindowInfo, settle_ms: u64) {
    let hwnd = HWND(window.id as *mut std::ffi::c_void);
    crate::log("Bringing window to foreground...");
    unsafe {
        let _ = SetForegroundWindow(hwnd);
    }
    std::thread::sleep(Duration::from_millis(settle_ms));
}
