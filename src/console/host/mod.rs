//! Host terminal I/O surface.
//!
//! [`ConsoleHost`] is the only way this crate touches the real terminal. Every
//! call may fail; callers in this crate treat failures as "leave things as
//! they are" rather than surfacing them.
//!
//! Backends:
//!
//! - **win32**: the Windows console API (Windows only)
//! - **ansi**: crossterm-driven emulation for other platforms
//! - **memory**: in-memory console for headless runs and tests

use std::io;
use thiserror::Error;

#[cfg(not(windows))]
pub mod ansi;
pub mod memory;
#[cfg(windows)]
pub mod win32;

#[cfg(not(windows))]
pub use ansi::AnsiConsole;
pub use memory::MemoryConsole;
#[cfg(windows)]
pub use win32::Win32Console;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Invalid console handle")]
    InvalidHandle,

    #[cfg(windows)]
    #[error("{call} failed: {source}")]
    Win32 {
        call: &'static str,
        #[source]
        source: windows::core::Error,
    },

    #[error("Console I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("{0} is not supported by this console")]
    Unsupported(&'static str),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;

/// Opaque identifier of a console input or output stream.
///
/// Handles are borrowed from the host; nothing in this crate closes them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConsoleHandle(pub isize);

/// Standard streams a host can resolve to a handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StdStream {
    Input,
    Output,
}

/// Cursor size (percentage of the cell) and visibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CursorInfo {
    pub size: u32,
    pub visible: bool,
}

impl Default for CursorInfo {
    fn default() -> Self {
        // conhost's out-of-the-box cursor
        Self {
            size: 25,
            visible: true,
        }
    }
}

/// Low-level access to a host console.
///
/// Modes are exchanged as raw bits so that callers can round-trip values
/// they do not understand.
pub trait ConsoleHost {
    /// Resolve a standard stream, or `None` when the process has no console.
    fn std_handle(&self, stream: StdStream) -> Option<ConsoleHandle>;

    fn cursor_info(&self, handle: ConsoleHandle) -> Result<CursorInfo>;

    fn set_cursor_info(&mut self, handle: ConsoleHandle, info: CursorInfo) -> Result<()>;

    fn mode(&self, handle: ConsoleHandle) -> Result<u32>;

    fn set_mode(&mut self, handle: ConsoleHandle, mode: u32) -> Result<()>;
}

/// Host for the current platform.
#[cfg(windows)]
pub type NativeConsole = Win32Console;

/// Host for the current platform.
#[cfg(not(windows))]
pub type NativeConsole = AnsiConsole;
