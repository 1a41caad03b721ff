//! conscope - scoped console state for interactive line editors
//!
//! conscope lets a line editor take over the host console while it edits and
//! hand it back untouched afterwards:
//!
//! - **Cursor style**: default and enhanced cursor sizes, learned from the
//!   host's own cursor, with a lock for redraws
//! - **Input modes**: switch between the host's input mode and the editor's
//! - **Mouse policy**: off/on/auto, adjusted per host terminal
//! - **Scoped sessions**: guards that restore the exact previous state on drop
//!
//! # Example
//!
//! ```
//! use conscope::config::TerminalConfig;
//! use conscope::console::{CursorStyle, HostKind, MemoryConsole, ModeFlags};
//! use conscope::session::Console;
//!
//! let host = MemoryConsole::new().with_input_mode(0x7);
//! let mut console = Console::new(host.clone(), &TerminalConfig::default(), HostKind::LegacyConsole);
//!
//! {
//!     let mut guard = console.enter(None, true);
//!     assert_eq!(ModeFlags::from_raw(host.input_mode()), ModeFlags::WINDOW_INPUT);
//!     guard.set_cursor_style(None, Some(CursorStyle::Enhanced), None);
//! }
//! assert_eq!(host.input_mode(), 0x7);
//! ```

pub mod config;
pub mod console;
pub mod session;
pub mod shadow;

pub use config::{Config, MouseInput, TerminalConfig};
pub use console::{ConsoleHost, CursorStyle, HostKind, ModeFlags};
pub use session::{Console, ConsoleModeGuard, PrinterSession, PrinterSlot, SessionError, TerminalOut};
pub use shadow::ShadowBool;
