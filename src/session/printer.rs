//! Printer sessions.
//!
//! A printer session brackets output to a terminal: it runs the terminal's
//! open/begin hooks, installs the printer as the active one, and on drop runs
//! end/close and empties the slot again.

use tracing::{debug, error};

use super::SessionError;

/// Lifecycle hooks of a terminal output, run in the order
/// open, begin, ..., end, close.
pub trait TerminalOut {
    fn open(&mut self);
    fn begin(&mut self);
    fn end(&mut self);
    fn close(&mut self);
}

/// Holds the printer of the active session, if any.
#[derive(Debug)]
pub struct PrinterSlot<P> {
    active: Option<P>,
}

impl<P> Default for PrinterSlot<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> PrinterSlot<P> {
    pub fn new() -> Self {
        Self { active: None }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&P> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut P> {
        self.active.as_mut()
    }
}

pub struct PrinterSession<'a, T: TerminalOut + ?Sized, P> {
    terminal: &'a mut T,
    slot: &'a mut PrinterSlot<P>,
}

impl<'a, T: TerminalOut + ?Sized, P> PrinterSession<'a, T, P> {
    /// Start printing to `terminal` with `printer`.
    ///
    /// Fails without touching the terminal if the slot already holds a
    /// printer: two sessions overlapping is a bug in the caller. This is an
    /// error rather than a debug assertion in every build, since the slot is
    /// exclusively borrowed and only a leaked session can leave it occupied.
    pub fn begin(
        terminal: &'a mut T,
        slot: &'a mut PrinterSlot<P>,
        printer: P,
    ) -> Result<Self, SessionError> {
        if slot.is_active() {
            error!("printer session started while another is active");
            return Err(SessionError::PrinterActive);
        }

        terminal.open();
        terminal.begin();
        slot.active = Some(printer);
        debug!("printer session started");

        Ok(Self { terminal, slot })
    }

    pub fn printer(&self) -> Option<&P> {
        self.slot.active()
    }

    pub fn printer_mut(&mut self) -> Option<&mut P> {
        self.slot.active_mut()
    }

    pub fn terminal(&mut self) -> &mut T {
        &mut *self.terminal
    }
}

impl<'a, T: TerminalOut + ?Sized, P> Drop for PrinterSession<'a, T, P> {
    fn drop(&mut self) {
        self.terminal.end();
        self.terminal.close();
        self.slot.active = None;
        debug!("printer session ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingTerminal {
        calls: Vec<&'static str>,
    }

    impl TerminalOut for RecordingTerminal {
        fn open(&mut self) {
            self.calls.push("open");
        }
        fn begin(&mut self) {
            self.calls.push("begin");
        }
        fn end(&mut self) {
            self.calls.push("end");
        }
        fn close(&mut self) {
            self.calls.push("close");
        }
    }

    #[test]
    fn test_lifecycle_order() {
        let mut terminal = RecordingTerminal::default();
        let mut slot = PrinterSlot::new();

        {
            let mut session = PrinterSession::begin(&mut terminal, &mut slot, "printer").unwrap();
            assert_eq!(session.printer(), Some(&"printer"));
            assert_eq!(session.terminal().calls, ["open", "begin"]);
        }

        assert_eq!(terminal.calls, ["open", "begin", "end", "close"]);
    }

    #[test]
    fn test_slot_cleared_on_release() {
        // The slot is emptied by the session itself rather than left for the
        // next session to trip over
        let mut terminal = RecordingTerminal::default();
        let mut slot = PrinterSlot::new();

        drop(PrinterSession::begin(&mut terminal, &mut slot, 1).unwrap());
        assert!(!slot.is_active());

        let session = PrinterSession::begin(&mut terminal, &mut slot, 2).unwrap();
        assert_eq!(session.printer(), Some(&2));
    }

    #[test]
    fn test_overlapping_session_rejected_before_hooks() {
        let mut first = RecordingTerminal::default();
        let mut second = RecordingTerminal::default();
        let mut slot = PrinterSlot::new();

        // A session that never ran its release leaves the slot occupied
        std::mem::forget(PrinterSession::begin(&mut first, &mut slot, "first").unwrap());
        assert!(slot.is_active());

        let rejected = matches!(
            PrinterSession::begin(&mut second, &mut slot, "second"),
            Err(SessionError::PrinterActive)
        );
        assert!(rejected);
        assert!(second.calls.is_empty());
        assert_eq!(slot.active(), Some(&"first"));
    }

    #[test]
    fn test_printer_mut() {
        let mut terminal = RecordingTerminal::default();
        let mut slot = PrinterSlot::new();
        let mut session = PrinterSession::begin(&mut terminal, &mut slot, String::from("a")).unwrap();
        if let Some(printer) = session.printer_mut() {
            printer.push('b');
        }
        assert_eq!(session.printer().map(String::as_str), Some("ab"));
    }
}
