//! Windows console host.

use std::ffi::c_void;

use windows::Win32::Foundation::{BOOL, HANDLE};
use windows::Win32::System::Console::{
    GetConsoleCursorInfo, GetConsoleMode, GetStdHandle, SetConsoleCursorInfo, SetConsoleMode,
    CONSOLE_CURSOR_INFO, CONSOLE_MODE, STD_INPUT_HANDLE, STD_OUTPUT_HANDLE,
};

use super::{ConsoleError, ConsoleHandle, ConsoleHost, CursorInfo, Result, StdStream};

/// The console attached to this process.
#[derive(Clone, Copy, Debug, Default)]
pub struct Win32Console;

impl Win32Console {
    pub fn new() -> Self {
        Self
    }
}

fn to_handle(handle: ConsoleHandle) -> Result<HANDLE> {
    let h = HANDLE(handle.0 as *mut c_void);
    if h.is_invalid() || h.0.is_null() {
        return Err(ConsoleError::InvalidHandle);
    }
    Ok(h)
}

fn win32_error(call: &'static str) -> impl FnOnce(windows::core::Error) -> ConsoleError {
    move |source| ConsoleError::Win32 { call, source }
}

impl ConsoleHost for Win32Console {
    fn std_handle(&self, stream: StdStream) -> Option<ConsoleHandle> {
        let which = match stream {
            StdStream::Input => STD_INPUT_HANDLE,
            StdStream::Output => STD_OUTPUT_HANDLE,
        };

        // A detached process gets a null handle, a failed lookup an invalid one
        let h = unsafe { GetStdHandle(which) }.ok()?;
        if h.is_invalid() || h.0.is_null() {
            return None;
        }
        Some(ConsoleHandle(h.0 as isize))
    }

    fn cursor_info(&self, handle: ConsoleHandle) -> Result<CursorInfo> {
        let h = to_handle(handle)?;
        let mut ci = CONSOLE_CURSOR_INFO::default();
        unsafe {
            GetConsoleCursorInfo(h, &mut ci).map_err(win32_error("GetConsoleCursorInfo"))?;
        }
        Ok(CursorInfo {
            size: ci.dwSize,
            visible: ci.bVisible.as_bool(),
        })
    }

    fn set_cursor_info(&mut self, handle: ConsoleHandle, info: CursorInfo) -> Result<()> {
        let h = to_handle(handle)?;
        let ci = CONSOLE_CURSOR_INFO {
            dwSize: info.size,
            bVisible: BOOL::from(info.visible),
        };
        unsafe {
            SetConsoleCursorInfo(h, &ci).map_err(win32_error("SetConsoleCursorInfo"))?;
        }
        Ok(())
    }

    fn mode(&self, handle: ConsoleHandle) -> Result<u32> {
        let h = to_handle(handle)?;
        let mut mode = CONSOLE_MODE(0);
        unsafe {
            GetConsoleMode(h, &mut mode).map_err(win32_error("GetConsoleMode"))?;
        }
        Ok(mode.0)
    }

    fn set_mode(&mut self, handle: ConsoleHandle, mode: u32) -> Result<()> {
        let h = to_handle(handle)?;
        unsafe {
            SetConsoleMode(h, CONSOLE_MODE(mode)).map_err(win32_error("SetConsoleMode"))?;
        }
        Ok(())
    }
}
