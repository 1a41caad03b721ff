//! Low-level console negotiation.
//!
//! - **host**: access to the host console (Win32, crossterm, in-memory)
//! - **modes**: input/output mode bits and host terminal identity
//! - **mouse**: mouse input policy
//! - **cursor**: cursor size and visibility control
//! - **input_mode**: swapping between host and application input modes
//!
//! # Architecture
//!
//! ```text
//! Console (session::console)
//! ├── ConsoleHost (host I/O)
//! ├── CursorController
//! ├── InputModeCache
//! └── resolve_mouse_mode (pure)
//! ```

pub mod cursor;
pub mod host;
pub mod input_mode;
pub mod modes;
pub mod mouse;

pub use cursor::{CursorController, CursorStyle};
pub use host::{ConsoleError, ConsoleHandle, ConsoleHost, CursorInfo, MemoryConsole, NativeConsole, StdStream};
pub use input_mode::InputModeCache;
pub use modes::{HostKind, ModeFlags, OutputModeFlags};
pub use mouse::resolve_mouse_mode;
