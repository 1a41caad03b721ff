//! Scoped sessions.
//!
//! - **console**: `Console` state and the editing-mode guard
//! - **printer**: printer sessions over a terminal lifecycle
//! - **terminal_out**: the console's own terminal lifecycle
//!
//! Both session kinds restore what they changed when dropped, including
//! while unwinding.

use thiserror::Error;

pub mod console;
pub mod printer;
pub mod terminal_out;

pub use console::{Console, ConsoleModeGuard};
pub use printer::{PrinterSession, PrinterSlot, TerminalOut};
pub use terminal_out::ConsoleOut;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("A printer session is already active")]
    PrinterActive,
}
