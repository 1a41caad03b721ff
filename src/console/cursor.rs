//! Cursor size and visibility control.
//!
//! The controller switches the cursor between the host's default size and an
//! alternate ("enhanced") size used to show a distinct editing mode such as
//! overwrite. The default size is taken from the first cursor it ever sees:
//! legacy-style console cursors report their real size, but the newer cursor
//! shapes all report 25, so later readings are unreliable once anything has
//! touched the cursor.

use tracing::{debug, error};

use super::host::{ConsoleHandle, ConsoleHost, StdStream};

/// Which cursor size to show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorStyle {
    Default,
    Enhanced,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CursorSizes {
    default: u32,
    alternate: u32,
}

impl CursorSizes {
    fn from_default(default: u32) -> Self {
        let alternate = if default >= 75 { 50 } else { 100 };
        Self { default, alternate }
    }
}

#[derive(Debug)]
pub struct CursorController {
    sizes: Option<CursorSizes>,
    enhanced: bool,
    locked: bool,
    last_visible: bool,
}

impl Default for CursorController {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorController {
    pub fn new() -> Self {
        Self {
            sizes: None,
            enhanced: false,
            locked: false,
            last_visible: true,
        }
    }

    /// Cached default size, once a cursor has been observed.
    pub fn default_size(&self) -> Option<u32> {
        self.sizes.map(|s| s.default)
    }

    pub fn alternate_size(&self) -> Option<u32> {
        self.sizes.map(|s| s.alternate)
    }

    /// Whether the enhanced size is the one last applied.
    pub fn is_enhanced(&self) -> bool {
        self.enhanced
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Set or clear the lock and return the previous state.
    ///
    /// While locked every style change is ignored. Locking twice means two
    /// owners think they hold the cursor, which is a bug in the caller.
    pub fn lock(&mut self, lock: bool) -> bool {
        debug_assert!(!(lock && self.locked), "cursor already locked");
        if lock && self.locked {
            error!("cursor already locked");
        }
        let was_locked = self.locked;
        self.locked = lock;
        was_locked
    }

    /// Change cursor style and/or visibility; returns the visibility the
    /// cursor had before the call.
    ///
    /// `None` leaves the corresponding property as it is (for `style`, the
    /// last applied style is reapplied). Failing to read or write the cursor
    /// makes the call a no-op.
    pub fn set_style<H: ConsoleHost + ?Sized>(
        &mut self,
        host: &mut H,
        handle: Option<ConsoleHandle>,
        style: Option<CursorStyle>,
        visible: Option<bool>,
        adjust: bool,
    ) -> bool {
        let Some(handle) = handle.or_else(|| host.std_handle(StdStream::Output)) else {
            return self.last_visible;
        };

        let mut info = match host.cursor_info(handle) {
            Ok(info) => info,
            Err(e) => {
                debug!("cursor info unavailable: {}", e);
                return self.last_visible;
            }
        };
        let was_visible = info.visible;
        self.last_visible = was_visible;

        let sizes = *self.sizes.get_or_insert_with(|| {
            let sizes = CursorSizes::from_default(info.size);
            debug!("default cursor size {}, alternate {}", sizes.default, sizes.alternate);
            sizes
        });

        if self.locked || !adjust {
            return was_visible;
        }
        if style.is_none() && visible.is_none() {
            return was_visible;
        }

        if let Some(style) = style {
            self.enhanced = style == CursorStyle::Enhanced;
        }

        info.size = if self.enhanced { sizes.alternate } else { sizes.default };
        if let Some(visible) = visible {
            info.visible = visible;
        }

        match host.set_cursor_info(handle, info) {
            Ok(()) => self.last_visible = info.visible,
            Err(e) => debug!("failed to set cursor info: {}", e),
        }

        was_visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::host::memory::{ConsoleWrite, OUTPUT_HANDLE};
    use crate::console::host::{CursorInfo, MemoryConsole};

    fn console(size: u32) -> MemoryConsole {
        MemoryConsole::new().with_cursor(CursorInfo { size, visible: true })
    }

    #[test]
    fn test_alternate_size_heuristic() {
        let mut host = console(25);
        let mut cursor = CursorController::new();
        cursor.set_style(&mut host, None, None, None, true);
        assert_eq!(cursor.default_size(), Some(25));
        assert_eq!(cursor.alternate_size(), Some(100));

        let mut host = console(75);
        let mut cursor = CursorController::new();
        cursor.set_style(&mut host, None, None, None, true);
        assert_eq!(cursor.alternate_size(), Some(50));

        let mut host = console(100);
        let mut cursor = CursorController::new();
        cursor.set_style(&mut host, None, None, None, true);
        assert_eq!(cursor.alternate_size(), Some(50));
    }

    #[test]
    fn test_default_size_captured_once() {
        let mut host = console(25);
        let mut cursor = CursorController::new();

        for size in [25, 100, 50, 1, 75] {
            host.poke_cursor(CursorInfo { size, visible: true });
            cursor.set_style(&mut host, None, Some(CursorStyle::Default), None, true);
            assert_eq!(cursor.default_size(), Some(25));
            assert_eq!(cursor.alternate_size(), Some(100));
            assert_eq!(host.cursor().size, 25);
        }
    }

    #[test]
    fn test_toggle_enhanced() {
        let mut host = console(25);
        let mut cursor = CursorController::new();

        let was_visible = cursor.set_style(&mut host, None, Some(CursorStyle::Enhanced), Some(false), true);
        assert!(was_visible);
        assert_eq!(host.cursor(), CursorInfo { size: 100, visible: false });
        assert!(cursor.is_enhanced());

        // Visibility only: size follows the last style
        let was_visible = cursor.set_style(&mut host, None, None, Some(true), true);
        assert!(!was_visible);
        assert_eq!(host.cursor(), CursorInfo { size: 100, visible: true });

        cursor.set_style(&mut host, None, Some(CursorStyle::Default), None, true);
        assert_eq!(host.cursor(), CursorInfo { size: 25, visible: true });
        assert!(!cursor.is_enhanced());
    }

    #[test]
    fn test_unspecified_is_noop() {
        let mut host = console(25);
        let mut cursor = CursorController::new();
        assert!(cursor.set_style(&mut host, None, None, None, true));
        assert!(host.writes().is_empty());
    }

    #[test]
    fn test_disabled_adjust_is_noop() {
        let mut host = console(50);
        let mut cursor = CursorController::new();
        assert!(cursor.set_style(&mut host, None, Some(CursorStyle::Enhanced), Some(false), false));
        assert!(host.writes().is_empty());
        // The default size is still learned
        assert_eq!(cursor.default_size(), Some(50));
    }

    #[test]
    fn test_locked_is_noop() {
        let mut host = console(25);
        let mut cursor = CursorController::new();
        assert!(!cursor.lock(true));
        assert!(cursor.is_locked());

        let was_visible = cursor.set_style(&mut host, None, Some(CursorStyle::Enhanced), Some(false), true);
        assert!(was_visible);
        assert!(host.writes().is_empty());
        assert!(!cursor.is_enhanced());

        assert!(cursor.lock(false));
        cursor.set_style(&mut host, None, Some(CursorStyle::Enhanced), None, true);
        assert_eq!(
            host.writes(),
            vec![ConsoleWrite::Cursor(OUTPUT_HANDLE, CursorInfo { size: 100, visible: true })]
        );
    }

    #[test]
    fn test_unlock_when_unlocked_is_allowed() {
        let mut cursor = CursorController::new();
        assert!(!cursor.lock(false));
        assert!(!cursor.lock(true));
        assert!(cursor.lock(false));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "cursor already locked")]
    fn test_double_lock_detected() {
        let mut cursor = CursorController::new();
        cursor.lock(true);
        cursor.lock(true);
    }

    #[test]
    fn test_read_failure_degrades() {
        let mut host = console(25);
        let mut cursor = CursorController::new();
        host.set_fail_reads(true);

        assert!(cursor.set_style(&mut host, None, Some(CursorStyle::Enhanced), Some(false), true));
        assert_eq!(cursor.default_size(), None);
        assert!(host.writes().is_empty());

        // The first good reading is still the one that sets the default
        host.set_fail_reads(false);
        host.poke_cursor(CursorInfo { size: 80, visible: false });
        assert!(!cursor.set_style(&mut host, None, None, Some(true), true));
        assert_eq!(cursor.default_size(), Some(80));
        assert_eq!(host.cursor(), CursorInfo { size: 80, visible: true });
    }

    #[test]
    fn test_write_failure_keeps_state() {
        let mut host = console(25);
        let mut cursor = CursorController::new();
        host.set_fail_writes(true);

        assert!(cursor.set_style(&mut host, None, Some(CursorStyle::Enhanced), Some(false), true));
        assert_eq!(host.cursor(), CursorInfo { size: 25, visible: true });
    }
}
