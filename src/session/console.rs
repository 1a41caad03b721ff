//! Console state owned by an editing session.
//!
//! [`Console`] holds everything that must survive between editing sessions:
//! the cursor controller, the cached input modes, and whether the editor is
//! currently accepting mouse input. [`Console::enter`] switches the input mode
//! for editing and returns a guard that puts the original mode back when it
//! is dropped.

use tracing::{debug, info, warn};

use crate::config::{MouseInput, TerminalConfig};
use crate::console::{
    resolve_mouse_mode, ConsoleHandle, ConsoleHost, CursorController, CursorStyle, HostKind,
    InputModeCache, ModeFlags, StdStream,
};
use crate::shadow::ShadowBool;

pub struct Console<H: ConsoleHost> {
    host: H,
    host_kind: HostKind,
    mouse_input: MouseInput,
    adjust_cursor_style: ShadowBool,
    cursor: CursorController,
    input_modes: InputModeCache,
    accept_mouse_input: bool,
}

impl<H: ConsoleHost> Console<H> {
    pub fn new(host: H, config: &TerminalConfig, host_kind: HostKind) -> Self {
        let mut adjust_cursor_style = ShadowBool::new(true);
        adjust_cursor_style.set_implicit(config.adjust_cursor_style);

        Self {
            host,
            host_kind,
            mouse_input: config.mouse_input,
            adjust_cursor_style,
            cursor: CursorController::new(),
            input_modes: InputModeCache::new(),
            accept_mouse_input: false,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_kind(&self) -> HostKind {
        self.host_kind
    }

    pub fn set_host_kind(&mut self, host_kind: HostKind) {
        self.host_kind = host_kind;
    }

    pub fn mouse_input(&self) -> MouseInput {
        self.mouse_input
    }

    /// Pick up changed settings. An explicit cursor style override survives.
    pub fn apply_config(&mut self, config: &TerminalConfig) {
        self.mouse_input = config.mouse_input;
        self.adjust_cursor_style.set_implicit(config.adjust_cursor_style);
    }

    /// Override the configured "adjust cursor style" setting for this
    /// console, or go back to the configured value with `None`.
    pub fn override_adjust_cursor_style(&mut self, value: Option<bool>) {
        match value {
            Some(value) => self.adjust_cursor_style.set_explicit(value),
            None => self.adjust_cursor_style.clear_explicit(),
        }
    }

    pub fn adjust_cursor_style(&self) -> bool {
        self.adjust_cursor_style.get()
    }

    /// Whether the editor currently takes mouse input.
    pub fn accept_mouse_input(&self) -> bool {
        self.accept_mouse_input
    }

    pub fn cursor(&self) -> &CursorController {
        &self.cursor
    }

    pub fn input_modes(&self) -> &InputModeCache {
        &self.input_modes
    }

    /// See [`CursorController::set_style`]. `handle` defaults to stdout.
    pub fn set_cursor_style(
        &mut self,
        handle: Option<ConsoleHandle>,
        style: Option<CursorStyle>,
        visible: Option<bool>,
    ) -> bool {
        let adjust = self.adjust_cursor_style.get();
        self.cursor.set_style(&mut self.host, handle, style, visible, adjust)
    }

    /// See [`CursorController::lock`].
    pub fn lock_cursor(&mut self, lock: bool) -> bool {
        self.cursor.lock(lock)
    }

    pub fn is_cursor_locked(&self) -> bool {
        self.cursor.is_locked()
    }

    pub fn remember_host_mode(&mut self, mode: ModeFlags) {
        self.input_modes.remember_host_mode(mode);
    }

    pub fn use_host_input_mode(&mut self) {
        self.input_modes.activate_host_mode(&mut self.host);
    }

    pub fn use_application_input_mode(&mut self) {
        self.input_modes.activate_application_mode(&mut self.host);
    }

    /// Input mode an editing session would apply on top of `mode`.
    pub fn editing_mode(&self, mode: ModeFlags, accept_mouse_input: bool) -> ModeFlags {
        let mut working = mode - ModeFlags::SESSION_CLEARED;
        working |= ModeFlags::WINDOW_INPUT;
        resolve_mouse_mode(working, accept_mouse_input, self.mouse_input, self.host_kind)
    }

    /// Switch the console into editing mode until the guard is dropped.
    ///
    /// `handle` defaults to stdin. The guard borrows the console mutably, so
    /// only one can exist at a time.
    pub fn enter(
        &mut self,
        handle: Option<ConsoleHandle>,
        accept_mouse_input: bool,
    ) -> ConsoleModeGuard<'_, H> {
        let handle = handle.or_else(|| self.host.std_handle(StdStream::Input));

        let prev_mode = match handle {
            Some(handle) => match self.host.mode(handle) {
                Ok(raw) => Some(ModeFlags::from_raw(raw)),
                Err(e) => {
                    warn!("cannot read console input mode: {}", e);
                    None
                }
            },
            None => {
                debug!("no console input handle");
                None
            }
        };
        if let Some(mode) = prev_mode {
            self.input_modes.remember_host_mode(mode);
        }

        let prev_accept_mouse_input = self.accept_mouse_input;
        self.accept_mouse_input = accept_mouse_input;

        let mut applied_mode = None;
        if let (Some(handle), Some(mode)) = (handle, prev_mode) {
            let working = self.editing_mode(mode, accept_mouse_input);
            match self.host.set_mode(handle, working.bits()) {
                Ok(()) => {
                    info!("console mode {} -> {}", mode, working);
                    applied_mode = Some(working);
                }
                Err(e) => warn!("cannot set console input mode: {}", e),
            }
        }

        ConsoleModeGuard {
            console: self,
            handle,
            prev_mode,
            applied_mode,
            prev_accept_mouse_input,
        }
    }
}

/// Editing-mode scope returned by [`Console::enter`].
///
/// Dropping the guard writes back the exact mode bits read on entry and
/// restores the previous mouse acceptance, on every exit path.
pub struct ConsoleModeGuard<'a, H: ConsoleHost> {
    console: &'a mut Console<H>,
    handle: Option<ConsoleHandle>,
    prev_mode: Option<ModeFlags>,
    applied_mode: Option<ModeFlags>,
    prev_accept_mouse_input: bool,
}

impl<'a, H: ConsoleHost> ConsoleModeGuard<'a, H> {
    /// Mode read on entry, restored on drop.
    pub fn previous_mode(&self) -> Option<ModeFlags> {
        self.prev_mode
    }

    /// Mode applied for editing, if the host accepted it.
    pub fn applied_mode(&self) -> Option<ModeFlags> {
        self.applied_mode
    }

    pub fn accept_mouse_input(&self) -> bool {
        self.console.accept_mouse_input
    }

    pub fn host(&self) -> &H {
        &self.console.host
    }

    pub fn set_cursor_style(
        &mut self,
        handle: Option<ConsoleHandle>,
        style: Option<CursorStyle>,
        visible: Option<bool>,
    ) -> bool {
        self.console.set_cursor_style(handle, style, visible)
    }

    pub fn lock_cursor(&mut self, lock: bool) -> bool {
        self.console.lock_cursor(lock)
    }

    pub fn is_cursor_locked(&self) -> bool {
        self.console.is_cursor_locked()
    }

    pub fn use_host_input_mode(&mut self) {
        self.console.use_host_input_mode();
    }

    pub fn use_application_input_mode(&mut self) {
        self.console.use_application_input_mode();
    }
}

impl<'a, H: ConsoleHost> Drop for ConsoleModeGuard<'a, H> {
    fn drop(&mut self) {
        if let (Some(handle), Some(mode)) = (self.handle, self.prev_mode) {
            match self.console.host.set_mode(handle, mode.bits()) {
                Ok(()) => info!("console mode restored to {}", mode),
                Err(e) => warn!("cannot restore console input mode: {}", e),
            }
        }
        self.console.accept_mouse_input = self.prev_accept_mouse_input;
        self.console.input_modes.invalidate();
    }
}
