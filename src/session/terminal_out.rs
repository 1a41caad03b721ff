//! Console output lifecycle.

use tracing::debug;

use super::printer::TerminalOut;
use crate::console::{ConsoleHandle, ConsoleHost, OutputModeFlags, StdStream};

/// Terminal output on the console's stdout.
///
/// `begin` turns on VT processing so escape sequences reach the host intact;
/// `end` writes back the output mode exactly as `begin` found it.
pub struct ConsoleOut<H: ConsoleHost> {
    host: H,
    handle: Option<ConsoleHandle>,
    prev_mode: Option<u32>,
}

impl<H: ConsoleHost> ConsoleOut<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            handle: None,
            prev_mode: None,
        }
    }

    pub fn handle(&self) -> Option<ConsoleHandle> {
        self.handle
    }
}

impl<H: ConsoleHost> TerminalOut for ConsoleOut<H> {
    fn open(&mut self) {
        self.handle = self.host.std_handle(StdStream::Output);
    }

    fn begin(&mut self) {
        let Some(handle) = self.handle else {
            return;
        };
        let Ok(raw) = self.host.mode(handle) else {
            debug!("cannot read console output mode");
            return;
        };
        self.prev_mode = Some(raw);

        let mode = OutputModeFlags::from_bits_retain(raw)
            | OutputModeFlags::PROCESSED_OUTPUT
            | OutputModeFlags::VIRTUAL_TERMINAL_PROCESSING;
        if mode.bits() != raw {
            if let Err(e) = self.host.set_mode(handle, mode.bits()) {
                debug!("cannot enable VT processing: {}", e);
            }
        }
    }

    fn end(&mut self) {
        if let (Some(handle), Some(mode)) = (self.handle, self.prev_mode.take()) {
            if let Err(e) = self.host.set_mode(handle, mode) {
                debug!("cannot restore console output mode: {}", e);
            }
        }
    }

    fn close(&mut self) {
        self.handle = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::host::memory::OUTPUT_HANDLE;
    use crate::console::MemoryConsole;
    use crate::session::{PrinterSession, PrinterSlot};

    #[test]
    fn test_output_mode_restored() {
        let host = MemoryConsole::new();
        host.poke_output_mode(0x8002);
        let mut out = ConsoleOut::new(host.clone());
        let mut slot = PrinterSlot::new();

        {
            let _session = PrinterSession::begin(&mut out, &mut slot, ()).unwrap();
            assert_eq!(host.output_mode(), 0x8007);
        }

        assert_eq!(host.output_mode(), 0x8002);
        assert_eq!(out.handle(), None);
    }

    #[test]
    fn test_vt_already_enabled() {
        let host = MemoryConsole::new();
        host.poke_output_mode(0x0007);
        let mut out = ConsoleOut::new(host.clone());

        out.open();
        assert_eq!(out.handle(), Some(OUTPUT_HANDLE));
        out.begin();
        assert!(host.writes().is_empty());
        out.end();
        out.close();
        assert_eq!(host.output_mode(), 0x0007);
    }

    #[test]
    fn test_no_console() {
        let host = MemoryConsole::new();
        host.set_attached(false);
        let mut out = ConsoleOut::new(host.clone());

        out.open();
        out.begin();
        out.end();
        out.close();
        assert!(host.writes().is_empty());
    }
}
