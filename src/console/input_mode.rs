//! Host/application input mode swapping.
//!
//! The editor runs with its own input mode but must hand the host's mode back
//! whenever control returns to the shell (for example while a command runs),
//! then pick its own mode up again afterwards.

use tracing::debug;

use super::host::{ConsoleHost, StdStream};
use super::modes::ModeFlags;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Active {
    Host,
    Application,
}

#[derive(Debug, Default)]
pub struct InputModeCache {
    host: Option<ModeFlags>,
    application: Option<ModeFlags>,
    active: Option<Active>,
}

impl InputModeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the host's own input mode, e.g. as read on entering a session.
    pub fn remember_host_mode(&mut self, mode: ModeFlags) {
        self.host = Some(mode);
        self.active = None;
    }

    pub fn host_mode(&self) -> Option<ModeFlags> {
        self.host
    }

    pub fn application_mode(&self) -> Option<ModeFlags> {
        self.application
    }

    /// Forget which mode was last activated, after something else has set
    /// the input mode directly.
    pub fn invalidate(&mut self) {
        self.active = None;
    }

    /// Hand the input mode back to the host.
    ///
    /// The mode in effect is assumed to be the application's and is kept so
    /// [`activate_application_mode`](Self::activate_application_mode) can
    /// return to it.
    pub fn activate_host_mode<H: ConsoleHost + ?Sized>(&mut self, host: &mut H) {
        if self.active == Some(Active::Host) {
            return;
        }
        let Some(handle) = host.std_handle(StdStream::Input) else {
            return;
        };

        let captured = match host.mode(handle) {
            Ok(raw) => {
                self.application = Some(ModeFlags::from_raw(raw));
                true
            }
            Err(e) => {
                debug!("cannot read application input mode: {}", e);
                false
            }
        };

        match self.host {
            Some(mode) => {
                if let Err(e) = host.set_mode(handle, mode.bits()) {
                    debug!("failed to restore host input mode: {}", e);
                    return;
                }
                debug!("host input mode {}", mode);
            }
            // Nothing to restore; only settled once the current mode is known
            None if !captured => return,
            None => {}
        }
        self.active = Some(Active::Host);
    }

    /// Take the input mode back for the application.
    ///
    /// If the host mode was never recorded, the current mode is recorded as
    /// the host's first so it cannot be lost.
    pub fn activate_application_mode<H: ConsoleHost + ?Sized>(&mut self, host: &mut H) {
        if self.active == Some(Active::Application) {
            return;
        }
        let Some(handle) = host.std_handle(StdStream::Input) else {
            return;
        };

        if self.host.is_none() {
            match host.mode(handle) {
                Ok(raw) => self.host = Some(ModeFlags::from_raw(raw)),
                Err(e) => debug!("cannot read host input mode: {}", e),
            }
        }

        match self.application {
            Some(mode) => {
                if let Err(e) = host.set_mode(handle, mode.bits()) {
                    debug!("failed to restore application input mode: {}", e);
                    return;
                }
                debug!("application input mode {}", mode);
            }
            // The host baseline must be seeded before this counts as done,
            // so a failed read is retried on the next call
            None if self.host.is_none() => return,
            None => {}
        }
        self.active = Some(Active::Application);
    }
}
