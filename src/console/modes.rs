//! Console mode bits and host terminal identity.

use std::env;
use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Input mode of a console input stream.
    ///
    /// Values match the Win32 `ENABLE_*` input mode bits. Unnamed bits are
    /// retained, so a mode read from the host always writes back unchanged.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ModeFlags: u32 {
        const PROCESSED_INPUT        = 0x0001;
        const LINE_INPUT             = 0x0002;
        const ECHO_INPUT             = 0x0004;
        const WINDOW_INPUT           = 0x0008;
        const MOUSE_INPUT            = 0x0010;
        const INSERT_MODE            = 0x0020;
        const QUICK_EDIT             = 0x0040;
        const EXTENDED_FLAGS         = 0x0080;
        const AUTO_POSITION          = 0x0100;
        const VIRTUAL_TERMINAL_INPUT = 0x0200;
    }
}

bitflags! {
    /// Output mode of a console screen buffer (Win32 `ENABLE_*` output bits).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct OutputModeFlags: u32 {
        const PROCESSED_OUTPUT            = 0x0001;
        const WRAP_AT_EOL_OUTPUT          = 0x0002;
        const VIRTUAL_TERMINAL_PROCESSING = 0x0004;
        const DISABLE_NEWLINE_AUTO_RETURN = 0x0008;
        const LVB_GRID_WORLDWIDE          = 0x0010;
    }
}

impl ModeFlags {
    /// Bits a console session clears before applying the mouse policy.
    pub const SESSION_CLEARED: Self = Self::PROCESSED_INPUT
        .union(Self::LINE_INPUT)
        .union(Self::ECHO_INPUT)
        .union(Self::MOUSE_INPUT);

    /// Build from raw host bits, keeping bits without a name.
    pub fn from_raw(raw: u32) -> Self {
        Self::from_bits_retain(raw)
    }
}

impl fmt::Display for ModeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.bits())?;
        if !self.is_empty() {
            write!(f, " [")?;
            bitflags::parser::to_writer(self, &mut *f)?;
            write!(f, "]")?;
        }
        Ok(())
    }
}

/// Identity of the terminal program hosting the console.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HostKind {
    /// The default Windows console host (conhost).
    #[default]
    LegacyConsole,
    /// ConEmu-style hosts that wrap a hidden console. They cannot combine
    /// quick-edit with mouse reporting.
    Multiplexer,
    /// Windows Terminal and other modern emulators.
    Modern,
}

impl HostKind {
    /// Guess the host from environment variables set by known terminals.
    pub fn detect() -> Self {
        Self::detect_with(|name| env::var_os(name).is_some())
    }

    fn detect_with(has_var: impl Fn(&str) -> bool) -> Self {
        if has_var("ConEmuPID") || has_var("ConEmuANSI") {
            return HostKind::Multiplexer;
        }

        const MODERN_VARS: &[&str] = &[
            "WT_SESSION",
            "TERM_PROGRAM",
            "ALACRITTY_LOG",
            "ALACRITTY_SOCKET",
            "WEZTERM_PANE",
        ];
        if MODERN_VARS.iter().any(|&name| has_var(name)) {
            return HostKind::Modern;
        }

        HostKind::LegacyConsole
    }

    pub fn name(&self) -> &'static str {
        match self {
            HostKind::LegacyConsole => "Windows Console",
            HostKind::Multiplexer => "ConEmu",
            HostKind::Modern => "Modern terminal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_bits_are_kept() {
        let mode = ModeFlags::from_raw(0x8000_0041);
        assert!(mode.contains(ModeFlags::QUICK_EDIT | ModeFlags::PROCESSED_INPUT));
        assert_eq!(mode.bits(), 0x8000_0041);

        let cleared = mode - ModeFlags::SESSION_CLEARED;
        assert_eq!(cleared.bits(), 0x8000_0040);
    }

    #[test]
    fn test_display() {
        let mode = ModeFlags::LINE_INPUT | ModeFlags::ECHO_INPUT;
        assert_eq!(mode.to_string(), "0x0006 [LINE_INPUT | ECHO_INPUT]");
        assert_eq!(ModeFlags::empty().to_string(), "0x0000");
    }

    fn env(vars: &'static [&'static str]) -> impl Fn(&str) -> bool {
        move |name| vars.iter().any(|v| *v == name)
    }

    #[test]
    fn test_detect_host_kind() {
        assert_eq!(HostKind::detect_with(env(&[])), HostKind::LegacyConsole);
        assert_eq!(HostKind::detect_with(env(&["WT_SESSION"])), HostKind::Modern);
        assert_eq!(HostKind::detect_with(env(&["ConEmuPID"])), HostKind::Multiplexer);
        // ConEmu wins even when it sets TERM_PROGRAM-like variables too
        assert_eq!(
            HostKind::detect_with(env(&["ConEmuANSI", "TERM_PROGRAM"])),
            HostKind::Multiplexer
        );
    }
}
