//! In-memory console.
//!
//! Clones share the same state, so a test can hand one clone to a `Console`
//! and inspect the other afterwards.

use std::cell::RefCell;
use std::rc::Rc;

use super::{ConsoleError, ConsoleHandle, ConsoleHost, CursorInfo, Result, StdStream};

pub const INPUT_HANDLE: ConsoleHandle = ConsoleHandle(10);
pub const OUTPUT_HANDLE: ConsoleHandle = ConsoleHandle(11);

/// A write recorded by [`MemoryConsole`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleWrite {
    Cursor(ConsoleHandle, CursorInfo),
    Mode(ConsoleHandle, u32),
}

#[derive(Debug)]
struct MemoryState {
    input_mode: u32,
    output_mode: u32,
    cursor: CursorInfo,
    attached: bool,
    fail_reads: bool,
    fail_writes: bool,
    writes: Vec<ConsoleWrite>,
}

#[derive(Clone, Debug)]
pub struct MemoryConsole {
    state: Rc<RefCell<MemoryState>>,
}

impl Default for MemoryConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(MemoryState {
                input_mode: 0,
                output_mode: 0,
                cursor: CursorInfo::default(),
                attached: true,
                fail_reads: false,
                fail_writes: false,
                writes: Vec::new(),
            })),
        }
    }

    pub fn with_input_mode(self, mode: u32) -> Self {
        self.state.borrow_mut().input_mode = mode;
        self
    }

    pub fn with_cursor(self, cursor: CursorInfo) -> Self {
        self.state.borrow_mut().cursor = cursor;
        self
    }

    pub fn input_mode(&self) -> u32 {
        self.state.borrow().input_mode
    }

    pub fn output_mode(&self) -> u32 {
        self.state.borrow().output_mode
    }

    pub fn cursor(&self) -> CursorInfo {
        self.state.borrow().cursor
    }

    /// Change the input mode behind the back of any caller, as another
    /// program sharing the console would.
    pub fn poke_input_mode(&self, mode: u32) {
        self.state.borrow_mut().input_mode = mode;
    }

    pub fn poke_output_mode(&self, mode: u32) {
        self.state.borrow_mut().output_mode = mode;
    }

    pub fn poke_cursor(&self, cursor: CursorInfo) {
        self.state.borrow_mut().cursor = cursor;
    }

    /// Simulate a process without a console.
    pub fn set_attached(&self, attached: bool) {
        self.state.borrow_mut().attached = attached;
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.state.borrow_mut().fail_reads = fail;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.state.borrow_mut().fail_writes = fail;
    }

    pub fn writes(&self) -> Vec<ConsoleWrite> {
        self.state.borrow().writes.clone()
    }

    pub fn clear_writes(&self) {
        self.state.borrow_mut().writes.clear();
    }
}

impl ConsoleHost for MemoryConsole {
    fn std_handle(&self, stream: StdStream) -> Option<ConsoleHandle> {
        if !self.state.borrow().attached {
            return None;
        }
        Some(match stream {
            StdStream::Input => INPUT_HANDLE,
            StdStream::Output => OUTPUT_HANDLE,
        })
    }

    fn cursor_info(&self, handle: ConsoleHandle) -> Result<CursorInfo> {
        let state = self.state.borrow();
        if state.fail_reads {
            return Err(ConsoleError::Unsupported("GetConsoleCursorInfo"));
        }
        if handle != OUTPUT_HANDLE {
            return Err(ConsoleError::InvalidHandle);
        }
        Ok(state.cursor)
    }

    fn set_cursor_info(&mut self, handle: ConsoleHandle, info: CursorInfo) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err(ConsoleError::Unsupported("SetConsoleCursorInfo"));
        }
        if handle != OUTPUT_HANDLE {
            return Err(ConsoleError::InvalidHandle);
        }
        state.cursor = info;
        state.writes.push(ConsoleWrite::Cursor(handle, info));
        Ok(())
    }

    fn mode(&self, handle: ConsoleHandle) -> Result<u32> {
        let state = self.state.borrow();
        if state.fail_reads {
            return Err(ConsoleError::Unsupported("GetConsoleMode"));
        }
        match handle {
            INPUT_HANDLE => Ok(state.input_mode),
            OUTPUT_HANDLE => Ok(state.output_mode),
            _ => Err(ConsoleError::InvalidHandle),
        }
    }

    fn set_mode(&mut self, handle: ConsoleHandle, mode: u32) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err(ConsoleError::Unsupported("SetConsoleMode"));
        }
        match handle {
            INPUT_HANDLE => state.input_mode = mode,
            OUTPUT_HANDLE => state.output_mode = mode,
            _ => return Err(ConsoleError::InvalidHandle),
        }
        state.writes.push(ConsoleWrite::Mode(handle, mode));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let console = MemoryConsole::new().with_input_mode(0x7);
        let mut other = console.clone();

        other.set_mode(INPUT_HANDLE, 0x18).unwrap();
        assert_eq!(console.input_mode(), 0x18);
        assert_eq!(console.writes(), vec![ConsoleWrite::Mode(INPUT_HANDLE, 0x18)]);
    }

    #[test]
    fn test_detached_and_failing() {
        let console = MemoryConsole::new();
        console.set_attached(false);
        assert_eq!(console.std_handle(StdStream::Input), None);

        console.set_attached(true);
        console.set_fail_reads(true);
        assert!(console.mode(INPUT_HANDLE).is_err());
        assert!(console.cursor_info(OUTPUT_HANDLE).is_err());
    }
}
