//! Mouse input policy.
//!
//! Decides whether the application or the host terminal owns the mouse.
//! Hosts disagree on how quick-edit and mouse reporting interact, so the
//! table below is per host rather than one rule:
//!
//! | setting | ConEmu-style host        | other hosts                          |
//! |---------|--------------------------|--------------------------------------|
//! | off     | unchanged                | unchanged                            |
//! | on      | + mouse                  | - quick-edit, + mouse                |
//! | auto    | + mouse                  | + mouse unless quick-edit is set     |

use crate::config::MouseInput;
use crate::console::modes::{HostKind, ModeFlags};

/// Apply the mouse policy to an input mode.
///
/// When `accept_mouse_input` is false the mode is returned unchanged and the
/// host keeps the mouse whatever the setting says.
pub fn resolve_mouse_mode(
    mode: ModeFlags,
    accept_mouse_input: bool,
    setting: MouseInput,
    host: HostKind,
) -> ModeFlags {
    if !accept_mouse_input {
        return mode;
    }

    let mut mode = mode;
    match (setting, host) {
        (MouseInput::Off, _) => {}
        // ConEmu can't mix quick-edit with mouse reporting reliably, and
        // clearing quick-edit there has no effect anyway
        (MouseInput::On | MouseInput::Auto, HostKind::Multiplexer) => {
            mode |= ModeFlags::MOUSE_INPUT;
        }
        (MouseInput::On, _) => {
            mode.remove(ModeFlags::QUICK_EDIT);
            mode |= ModeFlags::MOUSE_INPUT;
        }
        (MouseInput::Auto, _) => {
            if !mode.contains(ModeFlags::QUICK_EDIT) {
                mode |= ModeFlags::MOUSE_INPUT;
            }
        }
    }
    mode
}

#[cfg(test)]
mod tests {
    use super::*;

    const QE: ModeFlags = ModeFlags::QUICK_EDIT;
    const MOUSE: ModeFlags = ModeFlags::MOUSE_INPUT;

    #[test]
    fn test_off_leaves_mode() {
        for host in [HostKind::LegacyConsole, HostKind::Multiplexer, HostKind::Modern] {
            assert_eq!(resolve_mouse_mode(QE, true, MouseInput::Off, host), QE);
        }
    }

    #[test]
    fn test_on() {
        assert_eq!(
            resolve_mouse_mode(QE, true, MouseInput::On, HostKind::LegacyConsole),
            MOUSE
        );
        assert_eq!(
            resolve_mouse_mode(QE, true, MouseInput::On, HostKind::Modern),
            MOUSE
        );
        assert_eq!(
            resolve_mouse_mode(QE, true, MouseInput::On, HostKind::Multiplexer),
            QE | MOUSE
        );
    }

    #[test]
    fn test_auto_respects_quick_edit() {
        assert_eq!(
            resolve_mouse_mode(QE, true, MouseInput::Auto, HostKind::LegacyConsole),
            QE
        );
        assert_eq!(
            resolve_mouse_mode(ModeFlags::empty(), true, MouseInput::Auto, HostKind::LegacyConsole),
            MOUSE
        );
        // ConEmu takes the mouse even with quick-edit set
        assert_eq!(
            resolve_mouse_mode(QE, true, MouseInput::Auto, HostKind::Multiplexer),
            QE | MOUSE
        );
    }

    #[test]
    fn test_not_accepting_defers_to_host() {
        let modes = [
            ModeFlags::empty(),
            QE,
            QE | ModeFlags::WINDOW_INPUT,
            ModeFlags::from_raw(0x8000_0000),
        ];
        for mode in modes {
            for setting in [MouseInput::Off, MouseInput::On, MouseInput::Auto] {
                for host in [HostKind::LegacyConsole, HostKind::Multiplexer, HostKind::Modern] {
                    assert_eq!(resolve_mouse_mode(mode, false, setting, host), mode);
                }
            }
        }
    }

    #[test]
    fn test_other_bits_untouched() {
        let extra = ModeFlags::WINDOW_INPUT | ModeFlags::EXTENDED_FLAGS | ModeFlags::from_raw(0x4000);
        let result = resolve_mouse_mode(QE | extra, true, MouseInput::On, HostKind::LegacyConsole);
        assert_eq!(result, extra | MOUSE);
    }
}
