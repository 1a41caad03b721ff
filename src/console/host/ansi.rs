//! crossterm-backed console for non-Windows hosts.
//!
//! There is no console API to query here, so the backend keeps the last
//! state it applied and reports that. Writes are translated to the nearest
//! terminal equivalent:
//!
//! - cursor visibility: `Show` / `Hide`
//! - cursor size: the user's own shape for the size first reported, then a
//!   steady block at 50% and above and an underscore below
//! - clearing line or echo input: raw mode
//! - mouse input: mouse capture

use std::io::{self, Write};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::{execute, terminal};
use tracing::debug;

use super::{ConsoleError, ConsoleHandle, ConsoleHost, CursorInfo, Result, StdStream};
use crate::console::modes::{ModeFlags, OutputModeFlags};

const INPUT: ConsoleHandle = ConsoleHandle(0);
const OUTPUT: ConsoleHandle = ConsoleHandle(1);

/// Terminal cursor shape standing in for a console cursor size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CursorShape {
    UserDefault,
    Block,
    Underscore,
}

impl CursorShape {
    fn for_size(size: u32, user_size: u32) -> Self {
        if size == user_size {
            CursorShape::UserDefault
        } else if size >= 50 {
            CursorShape::Block
        } else {
            CursorShape::Underscore
        }
    }

    fn command(self) -> SetCursorStyle {
        match self {
            CursorShape::UserDefault => SetCursorStyle::DefaultUserShape,
            CursorShape::Block => SetCursorStyle::SteadyBlock,
            CursorShape::Underscore => SetCursorStyle::SteadyUnderScore,
        }
    }
}

/// Terminal changes needed to move between two input modes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct InputChange {
    raw: Option<bool>,
    mouse_capture: Option<bool>,
}

impl InputChange {
    fn between(old: ModeFlags, new: ModeFlags, raw: bool) -> Self {
        let want_raw = !new.contains(ModeFlags::LINE_INPUT | ModeFlags::ECHO_INPUT);
        let mouse = new.contains(ModeFlags::MOUSE_INPUT);
        Self {
            raw: (want_raw != raw).then_some(want_raw),
            mouse_capture: (mouse != old.contains(ModeFlags::MOUSE_INPUT)).then_some(mouse),
        }
    }
}

pub struct AnsiConsole {
    cursor: CursorInfo,
    /// Size reported before anything changed the cursor
    user_size: u32,
    input_mode: ModeFlags,
    output_mode: OutputModeFlags,
    raw: bool,
}

impl Default for AnsiConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl AnsiConsole {
    pub fn new() -> Self {
        let cursor = CursorInfo::default();
        Self {
            cursor,
            user_size: cursor.size,
            // A cooked tty: line editing and echo handled by the driver
            input_mode: ModeFlags::PROCESSED_INPUT | ModeFlags::LINE_INPUT | ModeFlags::ECHO_INPUT,
            output_mode: OutputModeFlags::PROCESSED_OUTPUT
                | OutputModeFlags::WRAP_AT_EOL_OUTPUT
                | OutputModeFlags::VIRTUAL_TERMINAL_PROCESSING,
            raw: false,
        }
    }

    fn apply_input_mode(&mut self, old: ModeFlags, new: ModeFlags) -> io::Result<()> {
        let change = InputChange::between(old, new, self.raw);

        if let Some(raw) = change.raw {
            if raw {
                terminal::enable_raw_mode()?;
            } else {
                terminal::disable_raw_mode()?;
            }
            self.raw = raw;
        }

        if let Some(capture) = change.mouse_capture {
            let mut stdout = io::stdout();
            if capture {
                execute!(stdout, EnableMouseCapture)?;
            } else {
                execute!(stdout, DisableMouseCapture)?;
            }
        }
        Ok(())
    }
}

impl ConsoleHost for AnsiConsole {
    fn std_handle(&self, stream: StdStream) -> Option<ConsoleHandle> {
        Some(match stream {
            StdStream::Input => INPUT,
            StdStream::Output => OUTPUT,
        })
    }

    fn cursor_info(&self, handle: ConsoleHandle) -> Result<CursorInfo> {
        if handle != OUTPUT {
            return Err(ConsoleError::InvalidHandle);
        }
        Ok(self.cursor)
    }

    fn set_cursor_info(&mut self, handle: ConsoleHandle, info: CursorInfo) -> Result<()> {
        if handle != OUTPUT {
            return Err(ConsoleError::InvalidHandle);
        }

        let mut stdout = io::stdout();
        let shape = CursorShape::for_size(info.size, self.user_size);
        execute!(stdout, shape.command())?;
        if info.visible {
            execute!(stdout, Show)?;
        } else {
            execute!(stdout, Hide)?;
        }
        stdout.flush()?;

        debug!("ansi cursor {:?}, visible {}", shape, info.visible);
        self.cursor = info;
        Ok(())
    }

    fn mode(&self, handle: ConsoleHandle) -> Result<u32> {
        match handle {
            INPUT => Ok(self.input_mode.bits()),
            OUTPUT => Ok(self.output_mode.bits()),
            _ => Err(ConsoleError::InvalidHandle),
        }
    }

    fn set_mode(&mut self, handle: ConsoleHandle, mode: u32) -> Result<()> {
        match handle {
            INPUT => {
                let new = ModeFlags::from_raw(mode);
                self.apply_input_mode(self.input_mode, new)?;
                debug!("ansi input mode {} -> {}", self.input_mode, new);
                self.input_mode = new;
                Ok(())
            }
            OUTPUT => {
                // Output processing is always on for a tty; only remember it
                self.output_mode = OutputModeFlags::from_bits_retain(mode);
                Ok(())
            }
            _ => Err(ConsoleError::InvalidHandle),
        }
    }
}

impl Drop for AnsiConsole {
    fn drop(&mut self) {
        if self.raw {
            let _ = terminal::disable_raw_mode();
        }
    }
}
